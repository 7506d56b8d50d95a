use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tessera_shared::User;
use uuid::Uuid;

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/user", get(list_users))
        .route("/api/user/{id}", get(get_user))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state
        .users
        .list_users()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .get_user(id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("User not found with id: {}", id)))?;
    Ok(Json(user))
}
