use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product row without the image columns. List, search, filter and related
/// responses all use this shape so payloads stay bounded; the image itself is
/// served separately by the photo endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub age_category_id: i32,
    pub review_rate: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductImage {
    pub image: Option<Vec<u8>>,
    pub image_content_type: Option<String>,
}

/// Parsed multipart form for product create/update. Validation happens after
/// parsing so field errors are reported by name.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category_id: String,
    pub age_category_id: String,
    pub review_rate: Option<i32>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Validated form ready for persistence.
#[derive(Debug)]
pub struct ProductData {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: i32,
    pub age_category_id: i32,
    pub review_rate: i32,
    pub image: Option<ImageUpload>,
}

/// Filter criteria for `POST /product/filtered`. Absent criteria are omitted
/// from the query, not defaulted.
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub category: Option<i32>,
    pub age_category: Option<i32>,
    /// Inclusive `[min, max]` bounds.
    pub price_range: Option<(Decimal, Decimal)>,
    pub review_rate: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_request_from_json_array_range() {
        let req: FilterRequest =
            serde_json::from_str(r#"{"category": 2, "price_range": ["5.00", "19.99"]}"#).unwrap();

        assert_eq!(req.category, Some(2));
        assert_eq!(req.age_category, None);
        let (min, max) = req.price_range.unwrap();
        assert_eq!(min, Decimal::new(500, 2));
        assert_eq!(max, Decimal::new(1999, 2));
        assert_eq!(req.review_rate, None);
    }

    #[test]
    fn test_filter_request_all_absent() {
        let req: FilterRequest = serde_json::from_str("{}").unwrap();
        assert!(req.category.is_none());
        assert!(req.age_category.is_none());
        assert!(req.price_range.is_none());
        assert!(req.review_rate.is_none());
    }
}
