use std::collections::HashMap;

use axum::{Extension, Json, extract::State};
use rust_decimal::Decimal;
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CartItem, Order, OrderLine, PaymentRequest, PaymentResponse},
    queries::{order_queries, product_queries},
    services::braintree_service,
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn get_token(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let token = braintree_service::generate_client_token(&state.braintree).await?;

    Ok(Json(json!({ "client_token": token })))
}

/// Checkout: price the cart from the catalog, charge the nonce, persist the
/// order only after the gateway accepts. A decline leaves no trace.
pub async fn process_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>> {
    let user_id = extract_user_id(&claims)?;

    validate_cart(&payload.cart)?;

    // A retried request with the same key acknowledges the already-persisted
    // order instead of charging twice.
    if let Some(ref key) = payload.idempotency_key {
        let existing = order_queries::find_by_idempotency_key(&state.db, user_id, key).await?;
        if let Some(existing) = existing {
            tracing::info!("Duplicate checkout for order {} suppressed", existing.id);
            return Ok(Json(PaymentResponse {
                ok: true,
                order_id: existing.id,
            }));
        }
    }

    let lines = price_cart(&state, &payload.cart).await?;
    let total = order_total(&lines);

    let receipt = braintree_service::submit_sale(&state.braintree, &payload.nonce, total).await?;

    let products = serde_json::to_value(&lines)
        .map_err(|e| AppError::InternalError(format!("Failed to serialize cart: {}", e)))?;

    let order = order_queries::create_order(
        &state.db,
        user_id,
        &products,
        &receipt,
        payload.idempotency_key.as_deref(),
    )
    .await?;

    tracing::info!(
        "Order {} created for user {} (total {})",
        order.id,
        user_id,
        total
    );

    Ok(Json(PaymentResponse {
        ok: true,
        order_id: order.id,
    }))
}

pub async fn get_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Order>>> {
    let user_id = extract_user_id(&claims)?;
    let orders = order_queries::get_user_orders(&state.db, user_id).await?;

    Ok(Json(orders))
}

fn validate_cart(cart: &[CartItem]) -> Result<()> {
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    for item in cart {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for product {}",
                item.product_id
            )));
        }
    }

    Ok(())
}

/// Unit prices come from the catalog, not the client.
async fn price_cart(state: &AppState, cart: &[CartItem]) -> Result<Vec<OrderLine>> {
    let ids: Vec<i32> = cart.iter().map(|item| item.product_id).collect();
    let products = product_queries::find_summaries_by_ids(&state.db, &ids).await?;

    let by_id: HashMap<i32, _> = products.into_iter().map(|p| (p.id, p)).collect();

    cart.iter()
        .map(|item| {
            let product = by_id.get(&item.product_id).ok_or_else(|| {
                AppError::NotFound(format!("Product {} not found", item.product_id))
            })?;

            Ok(OrderLine {
                product_id: product.id,
                title: product.title.clone(),
                unit_price: product.price,
                quantity: item.quantity,
            })
        })
        .collect()
}

fn order_total(lines: &[OrderLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.unit_price * Decimal::from(line.quantity))
        .sum::<Decimal>()
        .round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: &str, quantity: i32) -> OrderLine {
        OrderLine {
            product_id: 1,
            title: "book".to_string(),
            unit_price: unit_price.parse().unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let lines = vec![line("12.99", 2), line("4.50", 1)];
        assert_eq!(order_total(&lines), "30.48".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_total_rounds_to_two_decimals() {
        // 3.333 * 3 = 9.999 -> 10.00
        let lines = vec![line("3.333", 3)];
        assert_eq!(order_total(&lines), Decimal::new(1000, 2));
    }

    #[test]
    fn test_total_of_single_line() {
        let lines = vec![line("7.25", 4)];
        assert_eq!(order_total(&lines), "29.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = validate_cart(&[]).unwrap_err();
        assert!(err.to_string().contains("Cart is empty"));
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let cart = vec![
            CartItem {
                product_id: 7,
                quantity: 0,
            },
        ];
        let err = validate_cart(&cart).unwrap_err();
        assert!(err.to_string().contains("product 7"));

        let cart = vec![
            CartItem {
                product_id: 7,
                quantity: -2,
            },
        ];
        assert!(validate_cart(&cart).is_err());
    }

    #[test]
    fn test_valid_cart_accepted() {
        let cart = vec![
            CartItem {
                product_id: 1,
                quantity: 2,
            },
            CartItem {
                product_id: 2,
                quantity: 1,
            },
        ];
        assert!(validate_cart(&cart).is_ok());
    }
}
