use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentOrderStatus {
    Created,
    Completed,
    Failed,
}

/// An order registered with the external payment provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// Provider's order id
    pub id: String,
    pub status: PaymentOrderStatus,
    /// Redirect link the customer follows to authorize the payment
    pub approval_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Invalid payment amount: {0}")]
    InvalidAmount(String),

    #[error("Payment creation failed: {0}")]
    CreationFailed(String),
}

#[async_trait]
pub trait PaymentAdapter: Send + Sync {
    /// Create an order with the provider and return it together with
    /// its approval link
    async fn create_order(
        &self,
        amount: &str,
        currency: &str,
    ) -> Result<PaymentOrder, Box<dyn std::error::Error + Send + Sync>>;
}
