use sqlx::PgPool;

use crate::{error::Result, models::Order};

pub async fn create_order(
    pool: &PgPool,
    buyer_id: i32,
    products: &serde_json::Value,
    payment: &serde_json::Value,
    idempotency_key: Option<&str>,
) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (buyer_id, products, payment, idempotency_key)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(buyer_id)
    .bind(products)
    .bind(payment)
    .bind(idempotency_key)
    .fetch_one(pool)
    .await?;

    Ok(order)
}

pub async fn find_by_idempotency_key(
    pool: &PgPool,
    buyer_id: i32,
    key: &str,
) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE buyer_id = $1 AND idempotency_key = $2",
    )
    .bind(buyer_id)
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(order)
}

pub async fn get_user_orders(pool: &PgPool, buyer_id: i32) -> Result<Vec<Order>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC",
    )
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;

    Ok(orders)
}
