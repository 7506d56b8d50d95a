use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tessera_catalog::EventDraft;
use tessera_shared::{Event, EventPatch};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::manager_auth_middleware, state::AppState};

#[derive(Debug, Deserialize)]
struct UserQuery {
    #[serde(rename = "userId")]
    user_id: Uuid,
}

#[derive(Debug, Deserialize)]
struct OrganizerQuery {
    #[serde(rename = "organizerId")]
    organizer_id: Uuid,
}

pub fn routes(state: AppState) -> Router<AppState> {
    // Publishing an event is the one organizer-gated route
    let protected = Router::new()
        .route("/api/events/createEvent", post(create_event))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            manager_auth_middleware,
        ));

    Router::new()
        .route("/api/events", get(list_events))
        .route("/api/events/byUser", get(events_by_user))
        .route("/api/events/byOrganizer", get(events_by_organizer))
        .route("/api/events/{event_id}", get(get_event).put(update_event))
        .merge(protected)
}

async fn create_event(
    State(state): State<AppState>,
    Json(draft): Json<EventDraft>,
) -> Result<Json<Event>, AppError> {
    let event = state.catalog.create_event(draft).await?;
    Ok(Json(event))
}

async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.catalog.list_events().await?))
}

async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<Event>, AppError> {
    Ok(Json(state.catalog.get_event(event_id).await?))
}

async fn events_by_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(state.catalog.events_by_user(query.user_id).await?))
}

async fn events_by_organizer(
    State(state): State<AppState>,
    Query(query): Query<OrganizerQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    Ok(Json(
        state.catalog.list_by_organizer(query.organizer_id).await?,
    ))
}

async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, AppError> {
    let event = state
        .catalog
        .update_event(event_id, patch, query.user_id)
        .await?;
    Ok(Json(event))
}
