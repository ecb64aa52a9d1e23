//! Visit counter and preregistration endpoints.

use crate::{
    errors::AppError,
    handlers::ApiJson,
    models::{registration::Registration, stats::Stats},
    services::{AppState, export_service::flatten_registration},
};
use axum::{Json, extract::State};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub visits: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreregisterResponse {
    pub success: bool,
    pub registrations: u64,
    pub feedbacks: u64,
    pub overall_rating: f64,
}

/// `POST /api/stats` (and `GET`): the counters document verbatim.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Stats>, AppError> {
    Ok(Json(state.stats.get_stats().await?))
}

/// `POST /api/visit`
pub async fn record_visit(State(state): State<AppState>) -> Result<Json<VisitResponse>, AppError> {
    let visits = state.stats.record_visit().await?;
    Ok(Json(VisitResponse { visits }))
}

/// `POST /api/preregister`
///
/// Exports the submission first; counters only move once the export went
/// through. The overall rating is recomputed here, any client value is
/// ignored.
pub async fn preregister(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<Json<PreregisterResponse>, AppError> {
    registration.validate()?;

    let row = flatten_registration(&registration);
    state.exporter.export(&row).await?;

    let stats = state.stats.record_registration(&registration).await?;
    Ok(Json(PreregisterResponse {
        success: true,
        registrations: stats.registrations,
        feedbacks: stats.feedbacks,
        overall_rating: stats.overall_rating,
    }))
}
