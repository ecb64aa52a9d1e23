//! src/services/entity_store.rs
//!
//! EntityStore: in-process tables for users, drives, files and upload
//! statistics. Nothing here touches disk; the whole store is rebuilt from
//! seed data on every start.
//!
//! Files follow a small trash lifecycle:
//!
//! ```text
//!   [active] --soft_delete--> [trashed] --restore--> [active]
//!   [trashed] --permanently_delete--> [gone]
//! ```
//!
//! Identifiers come from a per-table counter and are never reused, even
//! after a row is permanently removed.

use crate::models::{
    EntityId,
    drive::{Drive, NewDrive},
    file::{File, FileSort, NewFile, SortDirection},
    upload::{DriveUploadSummary, NewUpload, Upload},
    user::{NewUser, User},
};
use chrono::Utc;
use std::collections::BTreeMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Drive {0} not found")]
    DriveNotFound(EntityId),
    #[error("File {0} not found")]
    FileNotFound(EntityId),
    #[error("File {0} not found: already in the trash")]
    AlreadyTrashed(EntityId),
    #[error("File {0} not found in the trash")]
    NotTrashed(EntityId),
    #[error("Invalid drive data: {0}")]
    InvalidDrive(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One collection: rows ordered by id plus the last id handed out.
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<EntityId, T>,
    last_id: EntityId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    /// Allocate the next id, build the row with it and store it.
    fn insert_with(&mut self, build: impl FnOnce(EntityId) -> T) -> T {
        self.last_id += 1;
        let id = self.last_id;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: EntityId) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| pred(row)).cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    drives: Table<Drive>,
    files: Table<File>,
    uploads: Table<Upload>,
}

/// Ordering requested for the active file listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileOrder {
    pub sort: Option<FileSort>,
    pub direction: SortDirection,
}

/// EntityStore is constructed once at startup and shared behind an `Arc`.
///
/// A single `RwLock` guards all four tables, so each operation sees and
/// leaves a consistent snapshot. Bulk operations take the lock once but
/// still treat every id independently.
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: RwLock<Tables>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- users ---

    pub async fn create_user(&self, new: NewUser) -> User {
        let mut tables = self.tables.write().await;
        let user = tables.users.insert_with(|id| User {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        });
        debug!(user_id = user.id, "created user {}", user.username);
        user
    }

    pub async fn get_user(&self, id: EntityId) -> Option<User> {
        self.tables.read().await.users.get(id)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    // --- drives ---

    pub async fn list_drives(&self, user_id: EntityId) -> Vec<Drive> {
        self.tables
            .read()
            .await
            .drives
            .filter(|drive| drive.user_id == user_id)
    }

    pub async fn get_drive(&self, id: EntityId) -> Option<Drive> {
        self.tables.read().await.drives.get(id)
    }

    /// Link a new drive.
    ///
    /// Rejects empty names and a used capacity larger than the total.
    pub async fn create_drive(&self, new: NewDrive) -> StoreResult<Drive> {
        if new.name.trim().is_empty() {
            return Err(StoreError::InvalidDrive("name must not be empty".into()));
        }
        if new.used_space > new.total_space {
            return Err(StoreError::InvalidDrive(format!(
                "usedSpace ({}) exceeds totalSpace ({})",
                new.used_space, new.total_space
            )));
        }

        let mut tables = self.tables.write().await;
        let drive = tables.drives.insert_with(|id| Drive {
            id,
            user_id: new.user_id,
            name: new.name,
            kind: new.kind,
            email: new.email,
            total_space: new.total_space,
            used_space: new.used_space,
            is_connected: new.is_connected.unwrap_or(true),
            created_at: Utc::now(),
        });
        info!(drive_id = drive.id, kind = drive.kind.as_str(), "linked drive");
        Ok(drive)
    }

    pub async fn toggle_drive_connection(
        &self,
        id: EntityId,
        is_connected: bool,
    ) -> StoreResult<Drive> {
        let mut tables = self.tables.write().await;
        let drive = tables
            .drives
            .rows
            .get_mut(&id)
            .ok_or(StoreError::DriveNotFound(id))?;
        drive.is_connected = is_connected;
        info!(drive_id = id, is_connected, "toggled drive connection");
        Ok(drive.clone())
    }

    // --- files ---

    /// Active (non-trashed) files of a user, optionally ordered.
    pub async fn list_files(&self, user_id: EntityId, order: FileOrder) -> Vec<File> {
        let mut files = self
            .tables
            .read()
            .await
            .files
            .filter(|file| file.user_id == user_id && !file.is_trashed());

        if let Some(sort) = order.sort {
            files.sort_by(|a, b| {
                let ord = sort.compare(a, b);
                match order.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        files
    }

    /// Trashed files of a user.
    pub async fn list_deleted_files(&self, user_id: EntityId) -> Vec<File> {
        self.tables
            .read()
            .await
            .files
            .filter(|file| file.user_id == user_id && file.is_trashed())
    }

    /// Active files stored on one drive.
    pub async fn list_files_by_drive(&self, drive_id: EntityId) -> Vec<File> {
        self.tables
            .read()
            .await
            .files
            .filter(|file| file.drive_id == drive_id && !file.is_trashed())
    }

    /// Fetch any file that still exists, trashed or not.
    pub async fn get_file(&self, id: EntityId) -> Option<File> {
        self.tables.read().await.files.get(id)
    }

    /// Case-insensitive search over name, path and type of active files.
    pub async fn search_files(&self, user_id: EntityId, term: &str) -> Vec<File> {
        let needle = term.to_lowercase();
        let files = self.tables.read().await.files.filter(|file| {
            file.user_id == user_id && !file.is_trashed() && file.matches(&needle)
        });
        debug!(term, hits = files.len(), "searched files");
        files
    }

    pub async fn create_file(&self, new: NewFile) -> File {
        let mut tables = self.tables.write().await;
        let file = tables.files.insert_with(|id| File {
            id,
            drive_id: new.drive_id,
            user_id: new.user_id,
            name: new.name,
            path: new.path,
            kind: new.kind,
            size: new.size,
            last_modified: new.last_modified,
            created_at: Utc::now(),
            deleted_at: None,
        });
        info!(file_id = file.id, drive_id = file.drive_id, "created file");
        file
    }

    /// Move an active file to the trash.
    pub async fn soft_delete(&self, id: EntityId) -> StoreResult<File> {
        let mut tables = self.tables.write().await;
        let file = tables
            .files
            .rows
            .get_mut(&id)
            .ok_or(StoreError::FileNotFound(id))?;
        if file.is_trashed() {
            return Err(StoreError::AlreadyTrashed(id));
        }
        file.deleted_at = Some(Utc::now());
        info!(file_id = id, "moved file to trash");
        Ok(file.clone())
    }

    /// Bring a trashed file back to the active listing.
    pub async fn restore(&self, id: EntityId) -> StoreResult<File> {
        let mut tables = self.tables.write().await;
        restore_locked(&mut tables, id)
    }

    /// Erase a trashed file. Active files are rejected and left in place.
    pub async fn permanently_delete(&self, id: EntityId) -> StoreResult<File> {
        let mut tables = self.tables.write().await;
        purge_locked(&mut tables, id)
    }

    /// Restore each id independently; failures do not undo earlier successes.
    pub async fn restore_many(&self, ids: &[EntityId]) -> Vec<StoreResult<File>> {
        let mut tables = self.tables.write().await;
        ids.iter().map(|&id| restore_locked(&mut tables, id)).collect()
    }

    /// Purge each id independently; failures do not undo earlier successes.
    pub async fn purge_many(&self, ids: &[EntityId]) -> Vec<StoreResult<File>> {
        let mut tables = self.tables.write().await;
        ids.iter().map(|&id| purge_locked(&mut tables, id)).collect()
    }

    /// Purge every trashed file of a user. Returns how many were removed.
    pub async fn empty_trash(&self, user_id: EntityId) -> usize {
        let mut tables = self.tables.write().await;
        let before = tables.files.rows.len();
        tables
            .files
            .rows
            .retain(|_, file| !(file.user_id == user_id && file.is_trashed()));
        let removed = before - tables.files.rows.len();
        info!(user_id, removed, "emptied trash");
        removed
    }

    // --- uploads ---

    pub async fn list_uploads(&self, user_id: EntityId) -> Vec<Upload> {
        self.tables
            .read()
            .await
            .uploads
            .filter(|upload| upload.user_id == user_id)
    }

    pub async fn create_upload(&self, new: NewUpload) -> Upload {
        let mut tables = self.tables.write().await;
        let upload = tables.uploads.insert_with(|id| Upload {
            id,
            user_id: new.user_id,
            drive_id: new.drive_id,
            file_id: new.file_id,
            file_name: new.file_name,
            file_size: new.file_size,
            upload_time: new.upload_time,
            file_type: new.file_type,
            upload_date: Utc::now(),
        });
        debug!(upload_id = upload.id, "recorded upload");
        upload
    }

    /// Per-drive totals over a user's uploads, ordered by drive id.
    pub async fn upload_summary(&self, user_id: EntityId) -> Vec<DriveUploadSummary> {
        let tables = self.tables.read().await;
        let mut per_drive: BTreeMap<EntityId, (u64, u64, f64)> = BTreeMap::new();
        for upload in tables.uploads.rows.values() {
            if upload.user_id != user_id {
                continue;
            }
            let entry = per_drive.entry(upload.drive_id).or_default();
            entry.0 += 1;
            // Sizes come straight from clients; totals pin at u64::MAX.
            entry.1 = entry.1.saturating_add(upload.file_size);
            entry.2 += upload.upload_time;
        }

        per_drive
            .into_iter()
            .map(|(drive_id, (uploads, total_size, total_time))| DriveUploadSummary {
                drive_id,
                uploads,
                total_size,
                average_upload_time: total_time / uploads as f64,
            })
            .collect()
    }
}

fn restore_locked(tables: &mut Tables, id: EntityId) -> StoreResult<File> {
    let file = tables
        .files
        .rows
        .get_mut(&id)
        .ok_or(StoreError::FileNotFound(id))?;
    if !file.is_trashed() {
        return Err(StoreError::NotTrashed(id));
    }
    file.deleted_at = None;
    info!(file_id = id, "restored file from trash");
    Ok(file.clone())
}

fn purge_locked(tables: &mut Tables, id: EntityId) -> StoreResult<File> {
    match tables.files.rows.get(&id) {
        None => return Err(StoreError::FileNotFound(id)),
        Some(file) if !file.is_trashed() => return Err(StoreError::NotTrashed(id)),
        Some(_) => {}
    }
    let file = tables
        .files
        .rows
        .remove(&id)
        .ok_or(StoreError::FileNotFound(id))?;
    info!(file_id = id, "permanently deleted file");
    Ok(file)
}
