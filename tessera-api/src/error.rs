use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tessera_booking::BookingError;
use tessera_catalog::CatalogError;
use tessera_core::payment::PaymentError;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    PaymentRequired(String),
    GatewayError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::PaymentRequired(msg) => (StatusCode::PAYMENT_REQUIRED, msg),
            AppError::GatewayError(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let msg = e.to_string();
        match e {
            BookingError::UserNotFound(_)
            | BookingError::EventNotFound(_)
            | BookingError::BookingNotFound(_) => AppError::NotFoundError(msg),
            BookingError::Capacity { .. } | BookingError::AlreadyCancelled => {
                AppError::ConflictError(msg)
            }
            BookingError::PaymentFailed => AppError::PaymentRequired(msg),
            BookingError::Forbidden(_) => AppError::AuthorizationError(msg),
            BookingError::Validation(_) => AppError::ValidationError(msg),
            BookingError::Store(_) => AppError::InternalServerError(msg),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        let msg = e.to_string();
        match e {
            CatalogError::EventNotFound(_) | CatalogError::OrganizerNotFound(_) => {
                AppError::NotFoundError(msg)
            }
            CatalogError::Validation(_) => AppError::ValidationError(msg),
            CatalogError::Forbidden(_) => AppError::AuthorizationError(msg),
            CatalogError::Store(_) => AppError::InternalServerError(msg),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        let msg = e.to_string();
        match e {
            PaymentError::InvalidAmount(_) => AppError::ValidationError(msg),
            PaymentError::CreationFailed(_) => AppError::GatewayError(msg),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
