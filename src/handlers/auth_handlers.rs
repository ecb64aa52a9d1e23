//! `POST /api/auth/login` and `GET /api/auth/me`

use crate::{errors::AppError, handlers::ApiJson, models::user::User, services::AppState};
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(email), Some(password)) = (
        req.email.filter(|e| !e.is_empty()),
        req.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::bad_request("Email and password are required"));
    };

    let token = state.auth.login(&email, &password).await?;
    Ok(Json(LoginResponse { token }))
}

/// Profile of the user behind the `Authorization: Bearer` token.
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<User>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::unauthorized("Missing or invalid token"))?;

    let user = state.auth.authenticate(token).await?;
    Ok(Json(user))
}
