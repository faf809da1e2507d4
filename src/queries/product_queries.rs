use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{FilterRequest, ProductData, ProductImage, ProductSummary},
};

pub const PAGE_SIZE: i64 = 6;
const RELATED_LIMIT: i64 = 3;

// Image columns are excluded from every listing shape; blobs are only read by
// find_image.
const SUMMARY_COLUMNS: &str = "id, title, slug, description, price, category_id, \
     age_category_id, review_rate, created_at, updated_at";

pub async fn create_product(pool: &PgPool, data: &ProductData) -> Result<ProductSummary> {
    let product = sqlx::query_as::<_, ProductSummary>(&format!(
        "INSERT INTO products
             (title, slug, description, price, category_id, age_category_id,
              review_rate, image, image_content_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {SUMMARY_COLUMNS}"
    ))
    .bind(&data.title)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.age_category_id)
    .bind(data.review_rate)
    .bind(data.image.as_ref().map(|img| img.data.as_slice()))
    .bind(data.image.as_ref().map(|img| img.content_type.as_str()))
    .fetch_one(pool)
    .await?;

    Ok(product)
}

pub async fn update_product(
    pool: &PgPool,
    id: i32,
    data: &ProductData,
) -> Result<Option<ProductSummary>> {
    // A form without an image part keeps the stored blob.
    let product = sqlx::query_as::<_, ProductSummary>(&format!(
        "UPDATE products SET
             title = $1, slug = $2, description = $3, price = $4,
             category_id = $5, age_category_id = $6, review_rate = $7,
             image = COALESCE($8, image),
             image_content_type = COALESCE($9, image_content_type),
             updated_at = NOW()
         WHERE id = $10
         RETURNING {SUMMARY_COLUMNS}"
    ))
    .bind(&data.title)
    .bind(&data.slug)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.age_category_id)
    .bind(data.review_rate)
    .bind(data.image.as_ref().map(|img| img.data.as_slice()))
    .bind(data.image.as_ref().map(|img| img.content_type.as_str()))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Slug is not unique by design; the oldest match wins.
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<ProductSummary>> {
    let product = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products WHERE slug = $1 ORDER BY created_at ASC LIMIT 1"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn find_summaries_by_ids(pool: &PgPool, ids: &[i32]) -> Result<Vec<ProductSummary>> {
    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_image(pool: &PgPool, id: i32) -> Result<Option<ProductImage>> {
    let image = sqlx::query_as::<_, ProductImage>(
        "SELECT image, image_content_type FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(image)
}

pub async fn list_page(pool: &PgPool, page: i64) -> Result<Vec<ProductSummary>> {
    let page = page.max(1);

    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products
         ORDER BY created_at DESC
         LIMIT $1 OFFSET $2"
    ))
    .bind(PAGE_SIZE)
    .bind((page - 1) * PAGE_SIZE)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn count_products(pool: &PgPool) -> Result<i64> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    Ok(total)
}

/// Case-insensitive substring match over title or description.
pub async fn search_products(pool: &PgPool, keyword: &str) -> Result<Vec<ProductSummary>> {
    let pattern = format!("%{}%", keyword);

    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products
         WHERE title ILIKE $1 OR description ILIKE $1
         ORDER BY created_at DESC"
    ))
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

/// Builds the predicate incrementally from the optional criteria; absent
/// criteria are left out entirely.
pub async fn filter_products(pool: &PgPool, filter: &FilterRequest) -> Result<Vec<ProductSummary>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {SUMMARY_COLUMNS} FROM products WHERE 1=1"));

    if let Some(category_id) = filter.category {
        query.push(" AND category_id = ");
        query.push_bind(category_id);
    }

    if let Some(age_category_id) = filter.age_category {
        query.push(" AND age_category_id = ");
        query.push_bind(age_category_id);
    }

    // inclusive on both bounds
    if let Some((min, max)) = filter.price_range {
        query.push(" AND price >= ");
        query.push_bind(min);
        query.push(" AND price <= ");
        query.push_bind(max);
    }

    if let Some(review_rate) = filter.review_rate {
        query.push(" AND review_rate = ");
        query.push_bind(review_rate);
    }

    query.push(" ORDER BY created_at DESC");

    let products = query
        .build_query_as::<ProductSummary>()
        .fetch_all(pool)
        .await?;

    Ok(products)
}

pub async fn related_products(
    pool: &PgPool,
    product_id: i32,
    category_id: i32,
) -> Result<Vec<ProductSummary>> {
    let products = sqlx::query_as::<_, ProductSummary>(&format!(
        "SELECT {SUMMARY_COLUMNS} FROM products
         WHERE category_id = $1 AND id != $2
         ORDER BY created_at DESC
         LIMIT $3"
    ))
    .bind(category_id)
    .bind(product_id)
    .bind(RELATED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(products)
}
