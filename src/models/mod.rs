//! Core data models for the drive dashboard service.
//!
//! These entities describe the demo user's connected drives, the synthetic
//! file listing with its trash lifecycle, upload statistics and the shared
//! counters document. They serialize as camelCase JSON via `serde`.

pub mod drive;
pub mod file;
pub mod registration;
pub mod stats;
pub mod upload;
pub mod user;

/// Numeric identifier handed out by the entity store (starts at 1, never reused).
pub type EntityId = u64;

/// Every entity in the demo belongs to this user.
pub const DEMO_USER_ID: EntityId = 1;
