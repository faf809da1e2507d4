use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// DB models

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i32,
    pub buyer_id: i32,
    /// Cart snapshot at purchase time: a JSON array of [`OrderLine`].
    pub products: serde_json::Value,
    /// Opaque gateway receipt as returned by the sale transaction.
    pub payment: serde_json::Value,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One line of the persisted cart snapshot. Unit price is the catalog price
/// at the time of purchase, not the client's copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i32,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
}

// Request types

#[derive(Debug, Deserialize)]
pub struct CartItem {
    pub product_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    /// Single-use payment method token from the gateway's drop-in UI.
    pub nonce: String,
    pub cart: Vec<CartItem>,
    /// Client-chosen key; a retry carrying the same key is acknowledged
    /// without charging again.
    pub idempotency_key: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub ok: bool,
    pub order_id: i32,
}
