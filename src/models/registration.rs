//! Preregistration submissions from the reviews page.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Highest star rating a topic can receive.
pub const MAX_TOPIC_RATING: u8 = 5;

#[derive(Debug, Error, PartialEq)]
pub enum RegistrationError {
    #[error("Valid recipient email is required.")]
    MissingEmail,
    #[error("rating for `{0}` must be between 0 and {max}", max = MAX_TOPIC_RATING)]
    RatingOutOfRange(String),
}

/// Answer to one step of the feedback form. A rating of 0 means "not rated".
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TopicFeedback {
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub feedback: String,
}

impl TopicFeedback {
    pub fn is_answered(&self) -> bool {
        self.rating > 0 || !self.feedback.trim().is_empty()
    }
}

/// Request body for `POST /api/preregister`.
///
/// Only `email` and `feedback` are interpreted; every other field is carried
/// through to the export as-is.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Registration {
    pub email: Option<String>,

    /// Feedback keyed by topic (e.g. "designAndUX").
    #[serde(default)]
    pub feedback: Option<BTreeMap<String, TopicFeedback>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Registration {
    /// Requires an email address and topic ratings within range.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if !self.email.as_deref().is_some_and(|e| e.trim().contains('@')) {
            return Err(RegistrationError::MissingEmail);
        }
        match self
            .topics()
            .find(|(_, answer)| answer.rating > MAX_TOPIC_RATING)
        {
            Some((topic, _)) => Err(RegistrationError::RatingOutOfRange(topic.clone())),
            None => Ok(()),
        }
    }

    pub fn topics(&self) -> impl Iterator<Item = (&String, &TopicFeedback)> {
        self.feedback.iter().flatten()
    }

    /// True when at least one topic was rated or commented on.
    pub fn has_feedback(&self) -> bool {
        self.topics().any(|(_, answer)| answer.is_answered())
    }
}
