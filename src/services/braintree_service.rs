//! Braintree GraphQL client. Two calls only: client token generation for the
//! hosted drop-in UI, and sale submission with immediate settlement.

use rust_decimal::Decimal;

use crate::{
    config::BraintreeConfig,
    error::{AppError, Result},
};

const BRAINTREE_VERSION: &str = "2019-01-01";

const CLIENT_TOKEN_MUTATION: &str = "mutation CreateClientToken($input: CreateClientTokenInput) {
  createClientToken(input: $input) { clientToken }
}";

const CHARGE_MUTATION: &str = "mutation ChargePaymentMethod($input: ChargePaymentMethodInput!) {
  chargePaymentMethod(input: $input) {
    transaction { id legacyId status amount { value currencyCode } createdAt }
  }
}";

pub async fn generate_client_token(config: &BraintreeConfig) -> Result<String> {
    let body = serde_json::json!({
        "query": CLIENT_TOKEN_MUTATION,
        "variables": { "input": {} },
    });

    let response = post_graphql(config, &body).await?;
    parse_client_token(&response)
}

/// Submits a sale for `amount` against the single-use `nonce`. Braintree
/// settles charges submitted through this mutation immediately. Returns the
/// raw transaction object; it is stored verbatim as the order receipt.
pub async fn submit_sale(
    config: &BraintreeConfig,
    nonce: &str,
    amount: Decimal,
) -> Result<serde_json::Value> {
    let body = serde_json::json!({
        "query": CHARGE_MUTATION,
        "variables": {
            "input": {
                "paymentMethodId": nonce,
                "transaction": { "amount": amount.to_string() },
            },
        },
    });

    let response = post_graphql(config, &body).await?;
    parse_sale_result(&response)
}

async fn post_graphql(
    config: &BraintreeConfig,
    body: &serde_json::Value,
) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let response = client
        .post(&config.api_url)
        .basic_auth(&config.public_key, Some(&config.private_key))
        .header("Braintree-Version", BRAINTREE_VERSION)
        .json(body)
        .send()
        .await
        .map_err(|e| AppError::GatewayError(format!("Braintree request failed: {}", e)))?;

    response
        .json()
        .await
        .map_err(|e| AppError::GatewayError(format!("Failed to parse Braintree response: {}", e)))
}

fn parse_client_token(response: &serde_json::Value) -> Result<String> {
    check_graphql_errors(response)?;

    response
        .pointer("/data/createClientToken/clientToken")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::GatewayError("Braintree response missing clientToken".to_string()))
}

fn parse_sale_result(response: &serde_json::Value) -> Result<serde_json::Value> {
    check_graphql_errors(response)?;

    let transaction = response
        .pointer("/data/chargePaymentMethod/transaction")
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::GatewayError("Braintree response missing transaction".to_string()))?;

    let status = transaction
        .get("status")
        .and_then(|v| v.as_str())
        .unwrap_or("");

    match status {
        "SETTLED" | "SETTLING" | "SUBMITTED_FOR_SETTLEMENT" | "AUTHORIZED" => {
            Ok(transaction.clone())
        }
        other => Err(AppError::GatewayError(format!(
            "Transaction not settled: status {}",
            other
        ))),
    }
}

fn check_graphql_errors(response: &serde_json::Value) -> Result<()> {
    let Some(errors) = response.get("errors").and_then(|v| v.as_array()) else {
        return Ok(());
    };

    if errors.is_empty() {
        return Ok(());
    }

    let message = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join("; ");

    tracing::error!("Braintree API error response: {}", message);

    Err(AppError::GatewayError(if message.is_empty() {
        "Unknown Braintree error".to_string()
    } else {
        message
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_token() {
        let response = serde_json::json!({
            "data": { "createClientToken": { "clientToken": "sandbox_token_abc" } }
        });

        assert_eq!(parse_client_token(&response).unwrap(), "sandbox_token_abc");
    }

    #[test]
    fn test_parse_client_token_missing() {
        let response = serde_json::json!({ "data": { "createClientToken": null } });
        assert!(parse_client_token(&response).is_err());
    }

    #[test]
    fn test_sale_success_returns_receipt() {
        let response = serde_json::json!({
            "data": { "chargePaymentMethod": { "transaction": {
                "id": "dHJhbnNhY3Rpb25fabc",
                "status": "SUBMITTED_FOR_SETTLEMENT",
                "amount": { "value": "34.98", "currencyCode": "USD" }
            } } }
        });

        let receipt = parse_sale_result(&response).unwrap();
        assert_eq!(receipt["id"], "dHJhbnNhY3Rpb25fabc");
        assert_eq!(receipt["amount"]["value"], "34.98");
    }

    #[test]
    fn test_sale_declined_is_gateway_error() {
        let response = serde_json::json!({
            "data": { "chargePaymentMethod": { "transaction": {
                "id": "t1",
                "status": "PROCESSOR_DECLINED"
            } } }
        });

        let err = parse_sale_result(&response).unwrap_err();
        assert!(err.to_string().contains("PROCESSOR_DECLINED"));
    }

    #[test]
    fn test_graphql_errors_propagated_verbatim() {
        let response = serde_json::json!({
            "errors": [
                { "message": "Amount is an invalid format." },
                { "message": "Cannot use a payment method nonce more than once." }
            ]
        });

        let err = parse_sale_result(&response).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Amount is an invalid format."));
        assert!(msg.contains("more than once"));
    }

    #[test]
    fn test_missing_transaction_is_error() {
        let response = serde_json::json!({
            "data": { "chargePaymentMethod": { "transaction": null } }
        });

        assert!(parse_sale_result(&response).is_err());
    }
}
