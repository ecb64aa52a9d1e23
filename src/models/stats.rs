//! The shared counters document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Site-wide counters persisted as a single JSON document.
///
/// All five fields are always present; the document is rewritten whole on
/// every change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Landing-page visits.
    pub visits: u64,

    /// Completed preregistrations.
    pub registrations: u64,

    /// Preregistrations that carried feedback.
    pub feedbacks: u64,

    /// Last time any counter changed.
    pub last_updated: DateTime<Utc>,

    /// Rolling rating on a 1-5 scale, in steps of 0.5. Zero until the first
    /// registration arrives.
    pub overall_rating: f64,
}

impl Stats {
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            visits: 0,
            registrations: 0,
            feedbacks: 0,
            last_updated: now,
            overall_rating: 0.0,
        }
    }
}
