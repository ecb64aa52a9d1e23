//! HTTP handlers, one module per resource.

pub mod auth_handlers;
pub mod drive_handlers;
pub mod file_handlers;
pub mod health_handlers;
pub mod stats_handlers;
pub mod upload_handlers;

use crate::errors::AppError;
use axum::extract::{FromRequest, FromRequestParts};

/// `Json` extractor whose rejections become 400 responses in the API's
/// error shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Path` extractor; malformed ids become 400 responses in the API's error
/// shape.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` extractor with the same rejection handling.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
