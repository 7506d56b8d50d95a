use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tessera_core::payment::{PaymentAdapter, PaymentError, PaymentOrder, PaymentOrderStatus};
use tracing::info;
use uuid::Uuid;

/// Validates amounts and delegates order creation to the configured
/// payment adapter, surfacing only the approval redirect URL.
pub struct PaymentService {
    adapter: Arc<dyn PaymentAdapter>,
}

impl PaymentService {
    pub fn new(adapter: Arc<dyn PaymentAdapter>) -> Self {
        Self { adapter }
    }

    /// Create a gateway order for `amount` USD and return the approval
    /// URL the customer must be redirected to.
    pub async fn create_payment(&self, amount: &str) -> Result<String, PaymentError> {
        let amount = amount.trim();
        let value: f64 = amount
            .parse()
            .map_err(|_| PaymentError::InvalidAmount("Invalid amount format".to_string()))?;
        if value <= 0.0 {
            return Err(PaymentError::InvalidAmount(
                "Amount must be greater than 0".to_string(),
            ));
        }

        let order = self
            .adapter
            .create_order(amount, "USD")
            .await
            .map_err(|e| PaymentError::CreationFailed(e.to_string()))?;

        info!("Created payment order {}", order.id);

        order.approval_url.ok_or_else(|| {
            PaymentError::CreationFailed("Approval URL not found in gateway response".to_string())
        })
    }
}

/// PayPal Orders v2 adapter: client-credentials token, one CAPTURE
/// order per payment, approval link extracted from the response.
pub struct PaypalAdapter {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    return_url: String,
    cancel_url: String,
    brand_name: String,
}

impl PaypalAdapter {
    pub fn new(
        base_url: String,
        client_id: String,
        client_secret: String,
        return_url: String,
        cancel_url: String,
        brand_name: String,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            client_id,
            client_secret,
            return_url,
            cancel_url,
            brand_name,
        }
    }

    async fn access_token(&self) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/oauth2/token", self.base_url))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        body["access_token"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| "No access_token in PayPal response".into())
    }
}

#[async_trait]
impl PaymentAdapter for PaypalAdapter {
    async fn create_order(
        &self,
        amount: &str,
        currency: &str,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>> {
        let token = self.access_token().await?;

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "amount": { "currency_code": currency, "value": amount },
                "description": "Payment for Order"
            }],
            "application_context": {
                "return_url": self.return_url,
                "cancel_url": self.cancel_url,
                "brand_name": self.brand_name,
                "landing_page": "BILLING",
                "shipping_preference": "NO_SHIPPING",
                "user_action": "PAY_NOW"
            }
        });

        let response = self
            .client
            .post(format!("{}/v2/checkout/orders", self.base_url))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let order: serde_json::Value = response.json().await?;

        let approval_url = order["links"].as_array().and_then(|links| {
            links
                .iter()
                .find(|link| link["rel"].as_str() == Some("approve"))
                .and_then(|link| link["href"].as_str().map(String::from))
        });

        let status = match order["status"].as_str() {
            Some("COMPLETED") => PaymentOrderStatus::Completed,
            _ => PaymentOrderStatus::Created,
        };

        Ok(PaymentOrder {
            id: order["id"].as_str().unwrap_or_default().to_string(),
            status,
            approval_url,
        })
    }
}

/// Offline adapter for tests and deployments without gateway
/// credentials. The magic amount `999.99` simulates a provider outage.
pub struct MockPaymentAdapter;

#[async_trait]
impl PaymentAdapter for MockPaymentAdapter {
    async fn create_order(
        &self,
        amount: &str,
        _currency: &str,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>> {
        if amount == "999.99" {
            return Err("Simulated payment gateway failure".into());
        }

        let id = format!("MOCK-{}", Uuid::new_v4().simple());
        Ok(PaymentOrder {
            approval_url: Some(format!("https://payments.example.com/approve/{}", id)),
            id,
            status: PaymentOrderStatus::Created,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PaymentService {
        PaymentService::new(Arc::new(MockPaymentAdapter))
    }

    #[tokio::test]
    async fn test_valid_amount_returns_approval_url() {
        let url = service().create_payment("25.00").await.unwrap();
        assert!(url.starts_with("https://payments.example.com/approve/"));
    }

    #[tokio::test]
    async fn test_negative_amount_is_invalid() {
        let err = service().create_payment("-5").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_amount_is_invalid() {
        let err = service().create_payment("twenty").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));

        let err = service().create_payment("").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
    }

    #[tokio::test]
    async fn test_gateway_failure_maps_to_creation_failed() {
        let err = service().create_payment("999.99").await.unwrap_err();
        assert!(matches!(err, PaymentError::CreationFailed(_)));
    }
}
