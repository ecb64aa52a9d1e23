//! Upload statistics endpoints.

use crate::{
    handlers::ApiJson,
    models::{
        DEMO_USER_ID,
        upload::{DriveUploadSummary, NewUpload, Upload},
    },
    services::AppState,
};
use axum::{Json, extract::State, http::StatusCode};

/// GET `/api/uploads`
pub async fn list_uploads(State(state): State<AppState>) -> Json<Vec<Upload>> {
    Json(state.store.list_uploads(DEMO_USER_ID).await)
}

/// POST `/api/uploads`
pub async fn create_upload(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewUpload>,
) -> (StatusCode, Json<Upload>) {
    let upload = state.store.create_upload(new).await;
    (StatusCode::CREATED, Json(upload))
}

/// GET `/api/uploads/summary`
pub async fn upload_summary(State(state): State<AppState>) -> Json<Vec<DriveUploadSummary>> {
    Json(state.store.upload_summary(DEMO_USER_ID).await)
}
