//! Hands preregistrations to the outside world.
//!
//! A submission is flattened into a single spreadsheet-style row first, so
//! every exporter sees the same columns: all top-level fields except
//! `feedback`, and `<topic>_rating` / `<topic>_feedback` for each feedback
//! topic.

use crate::models::registration::Registration;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

/// One flattened preregistration, keyed by column name.
pub type ExportRow = BTreeMap<String, Value>;

/// Client-computed fields that the server owns and never exports verbatim.
const SERVER_OWNED_FIELDS: &[&str] = &["overallRating"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("export endpoint answered with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait RegistrationExporter: Send + Sync {
    async fn export(&self, row: &ExportRow) -> Result<(), ExportError>;
}

/// Flatten a submission into export columns.
pub fn flatten_registration(registration: &Registration) -> ExportRow {
    let mut row: ExportRow = registration
        .extra
        .iter()
        .filter(|(key, _)| !SERVER_OWNED_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(email) = &registration.email {
        row.insert("email".into(), Value::String(email.clone()));
    }
    for (topic, answer) in registration.topics() {
        row.insert(format!("{}_rating", topic), Value::from(answer.rating));
        row.insert(
            format!("{}_feedback", topic),
            Value::String(answer.feedback.clone()),
        );
    }
    row
}

/// Default exporter: writes the row to the log.
#[derive(Debug, Default)]
pub struct LogExporter;

#[async_trait]
impl RegistrationExporter for LogExporter {
    async fn export(&self, row: &ExportRow) -> Result<(), ExportError> {
        let columns = serde_json::to_string(row).unwrap_or_default();
        info!(columns = row.len(), "preregistration: {}", columns);
        Ok(())
    }
}

/// Posts each row as JSON to a spreadsheet/mail webhook.
#[derive(Debug, Clone)]
pub struct WebhookExporter {
    client: reqwest::Client,
    url: String,
}

impl WebhookExporter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl RegistrationExporter for WebhookExporter {
    async fn export(&self, row: &ExportRow) -> Result<(), ExportError> {
        let response = self.client.post(&self.url).json(row).send().await?;
        if !response.status().is_success() {
            return Err(ExportError::Rejected(response.status().as_u16()));
        }
        info!(url = %self.url, "exported preregistration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feedback_topics_become_columns() {
        let registration: Registration = serde_json::from_value(json!({
            "email": "someone@example.com",
            "fullName": "Some One",
            "country": "Canada",
            "overallRating": 5,
            "feedback": {
                "canSolve": { "rating": 4, "feedback": "yes" },
                "features": { "rating": 0 }
            }
        }))
        .unwrap();

        let row = flatten_registration(&registration);

        assert_eq!(row["email"], json!("someone@example.com"));
        assert_eq!(row["fullName"], json!("Some One"));
        assert_eq!(row["canSolve_rating"], json!(4));
        assert_eq!(row["canSolve_feedback"], json!("yes"));
        assert_eq!(row["features_rating"], json!(0));
        assert_eq!(row["features_feedback"], json!(""));
        assert!(!row.contains_key("feedback"));
        assert!(!row.contains_key("overallRating"));
    }

    #[tokio::test]
    async fn log_exporter_accepts_any_row() {
        let row = flatten_registration(&Registration::default());
        assert!(LogExporter.export(&row).await.is_ok());
    }
}
