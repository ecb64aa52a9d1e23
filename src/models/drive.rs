//! Represents a connected cloud drive.

use super::EntityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported cloud providers.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DriveKind {
    Google,
    OneDrive,
    Dropbox,
    ICloud,
}

impl DriveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DriveKind::Google => "google",
            DriveKind::OneDrive => "onedrive",
            DriveKind::Dropbox => "dropbox",
            DriveKind::ICloud => "icloud",
        }
    }
}

/// A cloud account linked to the dashboard.
///
/// Capacities are expressed in megabytes.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Drive {
    /// Store-assigned identifier.
    pub id: EntityId,

    /// Owning user.
    pub user_id: EntityId,

    /// Display name (e.g. "Google Drive").
    pub name: String,

    /// Provider kind.
    #[serde(rename = "type")]
    pub kind: DriveKind,

    /// Account email on the provider side.
    pub email: String,

    /// Total capacity in MB.
    pub total_space: u64,

    /// Used capacity in MB. Never exceeds `total_space`.
    pub used_space: u64,

    /// Whether the dashboard currently shows the drive as connected.
    pub is_connected: bool,

    /// When this drive was linked.
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/drives`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewDrive {
    pub user_id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DriveKind,
    pub email: String,
    pub total_space: u64,
    pub used_space: u64,
    pub is_connected: Option<bool>,
}
