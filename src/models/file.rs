//! Represents a file shown in the dashboard listing.

use super::EntityId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Coarse file category used for icons and search.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Doc,
    Image,
    Video,
    Audio,
    Spreadsheet,
    Archive,
    Presentation,
    Text,
    Other,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::Pdf => "pdf",
            FileKind::Doc => "doc",
            FileKind::Image => "image",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
            FileKind::Spreadsheet => "spreadsheet",
            FileKind::Archive => "archive",
            FileKind::Presentation => "presentation",
            FileKind::Text => "text",
            FileKind::Other => "other",
        }
    }
}

/// A file record living on one of the user's drives.
///
/// `deleted_at` drives the trash lifecycle: `None` means active, `Some` means
/// the file sits in the trash since that instant.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Store-assigned identifier.
    pub id: EntityId,

    /// Drive the file lives on.
    pub drive_id: EntityId,

    /// Owning user.
    pub user_id: EntityId,

    /// Display name, including extension.
    pub name: String,

    /// Folder path on the drive (e.g. "/Projects/2023/").
    pub path: String,

    /// File category.
    #[serde(rename = "type")]
    pub kind: FileKind,

    /// Size in KB.
    pub size: u64,

    /// Free-text modification marker as supplied by the uploader.
    pub last_modified: String,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the file was moved to the trash, if it is there.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Case-insensitive substring match over name, path and type.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.path.to_lowercase().contains(needle)
            || self.kind.as_str().contains(needle)
    }

    /// Best-effort timestamp for `last_modified`; falls back to creation time
    /// when the marker is not a recognizable date.
    pub fn modified_at(&self) -> DateTime<Utc> {
        let raw = self.last_modified.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return ts.with_timezone(&Utc);
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            if let Some(ts) = date.and_hms_opt(0, 0, 0) {
                return ts.and_utc();
            }
        }
        self.created_at
    }
}

/// Request body for `POST /api/files`.
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub drive_id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub size: u64,
    pub last_modified: String,
}

/// Field used to order the active file listing.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FileSort {
    Name,
    Size,
    LastModified,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FileSort {
    pub fn compare(self, a: &File, b: &File) -> Ordering {
        let ord = match self {
            FileSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            FileSort::Size => a.size.cmp(&b.size),
            FileSort::LastModified => a.modified_at().cmp(&b.modified_at()),
        };
        ord.then(a.id.cmp(&b.id))
    }
}
