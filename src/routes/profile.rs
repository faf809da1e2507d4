use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ProfileResponse, UpdateProfileRequest},
    queries::user_queries,
    utils::{extractors::extract_user_id, jwt::Claims},
};

const MIN_PASSWORD_LENGTH: usize = 6;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;

    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Full-record update. The response carries the refreshed record so the
/// client can replace its cached session copy.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let user_id = extract_user_id(&claims)?;

    validate_profile(&payload)?;

    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = user_queries::update_profile(&state.db, user_id, &payload, &password_hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

fn validate_profile(payload: &UpdateProfileRequest) -> Result<()> {
    if payload.first_name.trim().is_empty() {
        return Err(AppError::BadRequest("First name is required".to_string()));
    }

    if payload.last_name.trim().is_empty() {
        return Err(AppError::BadRequest("Last name is required".to_string()));
    }

    if payload.password.len() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpdateProfileRequest {
        UpdateProfileRequest {
            first_name: "Danbi".to_string(),
            last_name: "Choi".to_string(),
            password: "hunter22".to_string(),
            country: "KR".to_string(),
            address1: "1 Book St".to_string(),
            address2: String::new(),
            city: "Seoul".to_string(),
            state: String::new(),
            zipcode: "04524".to_string(),
        }
    }

    #[test]
    fn test_valid_profile_accepted() {
        assert!(validate_profile(&valid_request()).is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = valid_request();
        req.password = "12345".to_string();

        let err = validate_profile(&req).unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut req = valid_request();
        req.first_name = "  ".to_string();
        assert!(validate_profile(&req).is_err());
    }
}
