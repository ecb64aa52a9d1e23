//! Represents a dashboard account.

use super::EntityId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user of the dashboard.
///
/// Users are seeded once at startup and never mutated afterwards.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-assigned identifier.
    pub id: EntityId,

    /// Display handle (e.g. "demo").
    pub username: String,

    /// Login email, matched exactly on sign-in.
    pub email: String,

    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When this user was created.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user. The password must already be hashed.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
