use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct PaymentRequest {
    amount: String,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    status: String,
    message: String,
    approval_url: String,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    token: Option<String>,
    #[serde(rename = "PayerID")]
    payer_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events/create-payment", post(create_payment))
        .route("/paypal/success", get(payment_success))
        .route("/paypal/cancel", get(payment_cancelled))
}

async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, AppError> {
    let approval_url = state.payments.create_payment(&request.amount).await?;

    Ok(Json(PaymentResponse {
        status: "success".to_string(),
        message: "Payment created successfully".to_string(),
        approval_url,
    }))
}

/// Gateway redirect target after the customer approves the payment
async fn payment_success(
    Query(query): Query<CallbackQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (Some(token), Some(payer_id)) = (query.token, query.payer_id) else {
        return Err(AppError::ValidationError(
            "Missing required parameters".to_string(),
        ));
    };

    Ok(Json(json!({
        "status": "success",
        "token": token,
        "payerId": payer_id,
    })))
}

/// Gateway redirect target after the customer abandons the payment
async fn payment_cancelled() -> Json<serde_json::Value> {
    Json(json!({
        "status": "cancelled",
        "message": "Payment Cancelled!",
    }))
}
