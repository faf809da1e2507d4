use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{FilterRequest, ImageUpload, ProductData, ProductForm, ProductSummary},
    queries::{category_queries, product_queries},
    utils::slug::slugify,
};

/// Upload cap checked before any record mutation.
const MAX_IMAGE_SIZE: usize = 1_000_000;

pub async fn create_product(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProductSummary>> {
    let form = read_product_form(multipart).await?;
    let data = validate_form(form)?;
    check_references(&state, &data).await?;

    let product = product_queries::create_product(&state.db, &data).await?;

    tracing::info!("Product {} created (slug {})", product.id, product.slug);

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ProductSummary>> {
    let form = read_product_form(multipart).await?;
    let data = validate_form(form)?;
    check_references(&state, &data).await?;

    let product = product_queries::update_product(&state.db, product_id, &data)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Json<serde_json::Value>> {
    let deleted = product_queries::delete_product(&state.db, product_id).await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(json!({ "ok": true })))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductSummary>> {
    let product = product_queries::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn get_photo(
    State(state): State<AppState>,
    Path(product_id): Path<i32>,
) -> Result<Response> {
    let row = product_queries::find_image(&state.db, product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    match (row.image, row.image_content_type) {
        (Some(data), Some(content_type)) => {
            Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
        }
        _ => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    Path(page): Path<i64>,
) -> Result<Json<Vec<ProductSummary>>> {
    let products = product_queries::list_page(&state.db, page).await?;

    Ok(Json(products))
}

pub async fn products_count(State(state): State<AppState>) -> Result<Json<i64>> {
    let total = product_queries::count_products(&state.db).await?;

    Ok(Json(total))
}

pub async fn search_products(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<Vec<ProductSummary>>> {
    let products = product_queries::search_products(&state.db, &keyword).await?;

    Ok(Json(products))
}

pub async fn filtered_products(
    State(state): State<AppState>,
    Json(filter): Json<FilterRequest>,
) -> Result<Json<Vec<ProductSummary>>> {
    if let Some((min, max)) = filter.price_range {
        if min > max {
            return Err(AppError::BadRequest("Invalid price range".to_string()));
        }
    }

    let products = product_queries::filter_products(&state.db, &filter).await?;

    Ok(Json(products))
}

pub async fn related_products(
    State(state): State<AppState>,
    Path((product_id, category_id)): Path<(i32, i32)>,
) -> Result<Json<Vec<ProductSummary>>> {
    let products = product_queries::related_products(&state.db, product_id, category_id).await?;

    Ok(Json(products))
}

async fn read_product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);

        match name.as_str() {
            "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image upload: {}", e)))?;

                form.image = Some(ImageUpload {
                    data: data.to_vec(),
                    content_type: content_type
                        .unwrap_or_else(|| "application/octet-stream".to_string()),
                });
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))?;

                match name.as_str() {
                    "title" => form.title = value,
                    "description" => form.description = value,
                    "price" => form.price = value,
                    "category_id" => form.category_id = value,
                    "age_category_id" => form.age_category_id = value,
                    "review_rate" => {
                        form.review_rate = Some(value.parse().map_err(|_| {
                            AppError::BadRequest("Invalid review rate".to_string())
                        })?);
                    }
                    // unknown fields are ignored
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

fn validate_form(form: ProductForm) -> Result<ProductData> {
    if form.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    if let Some(ref image) = form.image {
        if image.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::BadRequest(
                "Image should be less than 1MB in size".to_string(),
            ));
        }
    }

    if form.category_id.trim().is_empty() {
        return Err(AppError::BadRequest("Category is required".to_string()));
    }

    if form.age_category_id.trim().is_empty() {
        return Err(AppError::BadRequest("Age category is required".to_string()));
    }

    if form.description.trim().is_empty() {
        return Err(AppError::BadRequest("Description is required".to_string()));
    }

    if form.price.trim().is_empty() {
        return Err(AppError::BadRequest("Price is required".to_string()));
    }

    let price: Decimal = form
        .price
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid price".to_string()))?;

    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("Price must not be negative".to_string()));
    }

    let category_id: i32 = form
        .category_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid category".to_string()))?;

    let age_category_id: i32 = form
        .age_category_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid age category".to_string()))?;

    let title = form.title.trim().to_string();
    let slug = slugify(&title);

    Ok(ProductData {
        slug,
        title,
        description: form.description.trim().to_string(),
        price,
        category_id,
        age_category_id,
        review_rate: form.review_rate.unwrap_or(0),
        image: form.image,
    })
}

async fn check_references(state: &AppState, data: &ProductData) -> Result<()> {
    if !category_queries::category_exists(&state.db, data.category_id).await? {
        return Err(AppError::BadRequest("Unknown category".to_string()));
    }

    if !category_queries::age_category_exists(&state.db, data.age_category_id).await? {
        return Err(AppError::BadRequest("Unknown age category".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            title: "The Gruffalo".to_string(),
            description: "A mouse takes a stroll through the deep dark wood.".to_string(),
            price: "12.99".to_string(),
            category_id: "1".to_string(),
            age_category_id: "2".to_string(),
            review_rate: Some(4),
            image: None,
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let data = validate_form(valid_form()).unwrap();

        assert_eq!(data.title, "The Gruffalo");
        assert_eq!(data.slug, "the-gruffalo");
        assert_eq!(data.price, Decimal::new(1299, 2));
        assert_eq!(data.category_id, 1);
        assert_eq!(data.age_category_id, 2);
        assert_eq!(data.review_rate, 4);
    }

    #[test]
    fn test_blank_fields_rejected() {
        for (field, message) in [
            ("title", "Title is required"),
            ("category_id", "Category is required"),
            ("age_category_id", "Age category is required"),
            ("description", "Description is required"),
            ("price", "Price is required"),
        ] {
            let mut form = valid_form();
            match field {
                "title" => form.title = "   ".to_string(),
                "category_id" => form.category_id = String::new(),
                "age_category_id" => form.age_category_id = String::new(),
                "description" => form.description = String::new(),
                "price" => form.price = String::new(),
                _ => unreachable!(),
            }

            let err = validate_form(form).unwrap_err();
            assert!(err.to_string().contains(message), "field {}", field);
        }
    }

    #[test]
    fn test_oversize_image_rejected() {
        let mut form = valid_form();
        form.image = Some(ImageUpload {
            data: vec![0u8; MAX_IMAGE_SIZE + 1],
            content_type: "image/png".to_string(),
        });

        let err = validate_form(form).unwrap_err();
        assert!(err.to_string().contains("less than 1MB"));
    }

    #[test]
    fn test_image_at_limit_accepted() {
        let mut form = valid_form();
        form.image = Some(ImageUpload {
            data: vec![0u8; MAX_IMAGE_SIZE],
            content_type: "image/jpeg".to_string(),
        });

        assert!(validate_form(form).is_ok());
    }

    #[test]
    fn test_bad_price_rejected() {
        let mut form = valid_form();
        form.price = "free".to_string();
        assert!(validate_form(form).is_err());

        let mut form = valid_form();
        form.price = "-1.00".to_string();
        assert!(validate_form(form).is_err());
    }

    #[test]
    fn test_review_rate_defaults_to_zero() {
        let mut form = valid_form();
        form.review_rate = None;
        assert_eq!(validate_form(form).unwrap().review_rate, 0);
    }
}
