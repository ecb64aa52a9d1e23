//! Upload statistics records.

use super::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One simulated upload. Write-only analytics; never updated or removed.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: EntityId,
    pub user_id: EntityId,
    pub drive_id: EntityId,
    pub file_id: EntityId,
    pub file_name: String,
    /// Size in KB.
    pub file_size: u64,
    /// Simulated transfer duration in seconds.
    pub upload_time: f64,
    /// Extension-like label ("pdf", "mp4", ...), not the closed file category.
    pub file_type: String,
    pub upload_date: DateTime<Utc>,
}

/// Request body for `POST /api/uploads`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewUpload {
    pub user_id: EntityId,
    pub drive_id: EntityId,
    pub file_id: EntityId,
    pub file_name: String,
    pub file_size: u64,
    pub upload_time: f64,
    pub file_type: String,
}

/// Per-drive aggregate over a user's uploads.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveUploadSummary {
    pub drive_id: EntityId,
    pub uploads: u64,
    /// Sum of file sizes in KB.
    pub total_size: u64,
    /// Mean upload duration in seconds.
    pub average_upload_time: f64,
}
