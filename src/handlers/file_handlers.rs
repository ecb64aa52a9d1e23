//! Handlers for the file listing, search and trash bin.
//! Lifecycle rules live in `EntityStore`; these only translate shapes.

use crate::{
    errors::AppError,
    handlers::{ApiJson, ApiPath, ApiQuery},
    models::{
        DEMO_USER_ID, EntityId,
        file::{File, FileSort, NewFile, SortDirection},
    },
    services::{AppState, entity_store::FileOrder},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Query params accepted by the active listing.
#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub sort: Option<FileSort>,
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Body of the bulk trash endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashIdsRequest {
    pub file_ids: Vec<EntityId>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct EmptyTrashResponse {
    pub success: bool,
    pub removed: usize,
}

/// Per-id outcome of a bulk operation, in request order.
#[derive(Debug, Serialize)]
pub struct BulkResponse<T> {
    pub success: bool,
    pub results: Vec<T>,
}

/// GET `/api/files`: active files, optionally `?sort=name|size|lastModified&direction=asc|desc`
pub async fn list_files(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<ListFilesQuery>,
) -> Json<Vec<File>> {
    let order = FileOrder {
        sort: q.sort,
        direction: q.direction.unwrap_or_default(),
    };
    Json(state.store.list_files(DEMO_USER_ID, order).await)
}

/// GET `/api/files/deleted`
pub async fn list_deleted_files(State(state): State<AppState>) -> Json<Vec<File>> {
    Json(state.store.list_deleted_files(DEMO_USER_ID).await)
}

/// GET `/api/drives/{id}/files`
pub async fn list_drive_files(
    State(state): State<AppState>,
    ApiPath(drive_id): ApiPath<EntityId>,
) -> Json<Vec<File>> {
    Json(state.store.list_files_by_drive(drive_id).await)
}

/// GET `/api/files/{id}`: trashed files are still readable until purged.
pub async fn get_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<File>, AppError> {
    state
        .store
        .get_file(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found("File not found"))
}

/// GET `/api/files/search?q=`
pub async fn search_files(
    State(state): State<AppState>,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<File>>, AppError> {
    let term = q
        .q
        .filter(|term| !term.is_empty())
        .ok_or_else(|| AppError::bad_request("Search term is required"))?;
    Ok(Json(state.store.search_files(DEMO_USER_ID, &term).await))
}

/// POST `/api/files`
pub async fn create_file(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewFile>,
) -> (StatusCode, Json<File>) {
    let file = state.store.create_file(new).await;
    (StatusCode::CREATED, Json(file))
}

/// DELETE `/api/files/{id}`: move to trash
pub async fn trash_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<File>, AppError> {
    Ok(Json(state.store.soft_delete(id).await?))
}

/// PATCH `/api/files/{id}/restore`
pub async fn restore_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<File>, AppError> {
    Ok(Json(state.store.restore(id).await?))
}

/// DELETE `/api/files/{id}/permanent`
pub async fn purge_file(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.store.permanently_delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE `/api/files/trash/empty`
pub async fn empty_trash(State(state): State<AppState>) -> Json<EmptyTrashResponse> {
    let removed = state.store.empty_trash(DEMO_USER_ID).await;
    Json(EmptyTrashResponse {
        success: true,
        removed,
    })
}

/// POST `/api/files/trash/restore`: `null` marks ids that could not be restored.
pub async fn restore_many(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TrashIdsRequest>,
) -> Json<BulkResponse<Option<File>>> {
    let results = state
        .store
        .restore_many(&req.file_ids)
        .await
        .into_iter()
        .map(Result::ok)
        .collect();
    Json(BulkResponse {
        success: true,
        results,
    })
}

/// POST `/api/files/trash/delete`: `false` marks ids that could not be purged.
pub async fn purge_many(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TrashIdsRequest>,
) -> Json<BulkResponse<bool>> {
    let results = state
        .store
        .purge_many(&req.file_ids)
        .await
        .iter()
        .map(Result::is_ok)
        .collect();
    Json(BulkResponse {
        success: true,
        results,
    })
}
