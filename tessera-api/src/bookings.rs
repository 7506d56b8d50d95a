use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tessera_booking::{BookingConfirmation, BookingRequest};
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CancelBookingRequest {
    booking_id: Uuid,
    user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct PdfQuery {
    #[serde(rename = "requestingUserId")]
    requesting_user_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookEvent", post(book_event))
        .route("/api/cancelBooking", post(cancel_booking))
        .route("/api/booking/{booking_id}/generatePdf", get(generate_pdf))
}

async fn book_event(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<BookingConfirmation>, AppError> {
    let confirmation = state.orchestrator.book_event(request).await?;
    Ok(Json(confirmation))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(request): Json<CancelBookingRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    state
        .orchestrator
        .cancel_booking(request.booking_id, request.user_id)
        .await?;

    Ok(Json(json!({
        "message": "Booking cancelled successfully."
    })))
}

/// GET /api/booking/{id}/generatePdf?requestingUserId=
/// Stream back the printable ticket document
async fn generate_pdf(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<PdfQuery>,
) -> Result<Response, AppError> {
    let booking = state
        .bookings
        .get_booking(booking_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| {
            AppError::NotFoundError(format!("Booking not found with id: {}", booking_id))
        })?;

    if booking.user_id != query.requesting_user_id {
        return Err(AppError::AuthorizationError(format!(
            "This booking does not belong to the user: {}",
            query.requesting_user_id
        )));
    }

    let user = state
        .users
        .get_user(booking.user_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| {
            AppError::NotFoundError(format!("User not found with id: {}", booking.user_id))
        })?;

    // The event rides on the first ticket; a ticketless booking still
    // gets a placeholder document.
    let event = match booking.tickets.first() {
        Some(ticket) => Some(
            state
                .events
                .get_event(ticket.event_id)
                .await
                .map_err(|e| AppError::InternalServerError(e.to_string()))?
                .ok_or_else(|| {
                    AppError::NotFoundError(format!(
                        "Event not found with id: {}",
                        ticket.event_id
                    ))
                })?,
        ),
        None => None,
    };

    let bytes = state
        .renderer
        .render(&booking, event.as_ref(), &user)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"tickets-{}.pdf\"", booking.id),
            ),
        ],
        bytes,
    )
        .into_response())
}
