//! Handlers for the connected-drive cards.

use crate::{
    errors::AppError,
    handlers::{ApiJson, ApiPath},
    models::{
        DEMO_USER_ID, EntityId,
        drive::{Drive, NewDrive},
    },
    services::AppState,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    pub is_connected: Option<bool>,
}

/// GET `/api/drives`
pub async fn list_drives(State(state): State<AppState>) -> Json<Vec<Drive>> {
    Json(state.store.list_drives(DEMO_USER_ID).await)
}

/// GET `/api/drives/{id}`
pub async fn get_drive(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<Drive>, AppError> {
    state
        .store
        .get_drive(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("Drive not found"))
}

/// POST `/api/drives`
pub async fn create_drive(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewDrive>,
) -> Result<(StatusCode, Json<Drive>), AppError> {
    let drive = state.store.create_drive(new).await?;
    Ok((StatusCode::CREATED, Json(drive)))
}

/// PATCH `/api/drives/{id}/toggle`
pub async fn toggle_drive(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(req): ApiJson<ToggleRequest>,
) -> Result<Json<Drive>, AppError> {
    let is_connected = req
        .is_connected
        .ok_or_else(|| AppError::bad_request("isConnected must be a boolean"))?;
    let drive = state.store.toggle_drive_connection(id, is_connected).await?;
    Ok(Json(drive))
}
