use axum::{Json, extract::State};

use crate::{
    AppState,
    error::Result,
    models::{AgeCategory, Category},
    queries::category_queries,
};

pub async fn get_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = category_queries::get_all_categories(&state.db).await?;

    Ok(Json(categories))
}

pub async fn get_age_categories(State(state): State<AppState>) -> Result<Json<Vec<AgeCategory>>> {
    let age_categories = category_queries::get_all_age_categories(&state.db).await?;

    Ok(Json(age_categories))
}
