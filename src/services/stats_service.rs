//! src/services/stats_service.rs
//!
//! StatsService: owns the site-wide counters document on disk. Every
//! read-modify-write runs under one async mutex so concurrent visits and
//! registrations cannot lose updates, and every write lands in a temp file
//! that is renamed over the document.

use crate::models::{registration::Registration, stats::Stats};
use chrono::Utc;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{fs, sync::Mutex};
use tracing::{debug, info};
use uuid::Uuid;

/// Rating every preregistration contributes on its own.
pub const REGISTRATION_BONUS: f64 = 3.0;

/// Rating assumed for a feedback topic the user skipped.
pub const UNRATED_TOPIC_RATING: f64 = 4.0;

const MIN_RATING: f64 = 1.0;
const MAX_RATING: f64 = 5.0;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats document I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stats document is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Clone, Debug)]
pub struct StatsService {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl StatsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the document as stored, creating it first if it is missing.
    pub async fn get_stats(&self) -> StatsResult<Stats> {
        let _guard = self.lock.lock().await;
        self.load_or_init().await
    }

    /// Count one visit and return the new total.
    pub async fn record_visit(&self) -> StatsResult<u64> {
        let _guard = self.lock.lock().await;
        let mut stats = self.load_or_init().await?;
        stats.visits += 1;
        stats.last_updated = Utc::now();
        self.write(&stats).await?;
        debug!(visits = stats.visits, "recorded visit");
        Ok(stats.visits)
    }

    /// Count a preregistration and fold its ratings into the rolling rating.
    pub async fn record_registration(&self, registration: &Registration) -> StatsResult<Stats> {
        let ratings = submission_ratings(registration);

        let _guard = self.lock.lock().await;
        let mut stats = self.load_or_init().await?;
        stats.overall_rating = rolling_rating(stats.overall_rating, stats.feedbacks, &ratings);
        stats.registrations += 1;
        if registration.has_feedback() {
            stats.feedbacks += 1;
        }
        stats.last_updated = Utc::now();
        self.write(&stats).await?;

        info!(
            registrations = stats.registrations,
            feedbacks = stats.feedbacks,
            overall_rating = stats.overall_rating,
            "recorded registration"
        );
        Ok(stats)
    }

    /// Overwrite the document with zeroed counters.
    pub async fn reset(&self) -> StatsResult<Stats> {
        let _guard = self.lock.lock().await;
        let stats = Stats::empty(Utc::now());
        self.write(&stats).await?;
        info!(path = %self.path.display(), "reset stats document");
        Ok(stats)
    }

    async fn load_or_init(&self) -> StatsResult<Stats> {
        match fs::read(&self.path).await {
            Ok(raw) => Ok(serde_json::from_slice(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let stats = Stats::empty(Utc::now());
                self.write(&stats).await?;
                info!(path = %self.path.display(), "created stats document");
                Ok(stats)
            }
            Err(err) => Err(StatsError::Io(err)),
        }
    }

    /// Write to a sibling temp file, then rename over the document.
    async fn write(&self, stats: &Stats) -> StatsResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&parent).await?;

        let tmp_path = parent.join(format!(".stats-{}.tmp", Uuid::new_v4()));
        let body = serde_json::to_vec_pretty(stats)?;
        if let Err(err) = fs::write(&tmp_path, &body).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StatsError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp_path, &self.path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StatsError::Io(err));
        }
        Ok(())
    }
}

/// Ratings a submission contributes: one per feedback topic plus the
/// registration bonus.
pub fn submission_ratings(registration: &Registration) -> Vec<f64> {
    let mut ratings = Vec::new();
    if registration.has_feedback() {
        ratings.extend(registration.topics().map(|(_, answer)| {
            if answer.rating == 0 {
                UNRATED_TOPIC_RATING
            } else {
                f64::from(answer.rating)
            }
        }));
    }
    ratings.push(REGISTRATION_BONUS);
    ratings
}

/// Weighted running average of the previous rating (weighted by
/// `prev_count`) and the new ratings, rounded to the nearest 0.5.
pub fn rolling_rating(prev_average: f64, prev_count: u64, new_ratings: &[f64]) -> f64 {
    if new_ratings.is_empty() {
        return prev_average;
    }
    let prev_weight = prev_count as f64;
    let total = prev_average * prev_weight + new_ratings.iter().sum::<f64>();
    let average = total / (prev_weight + new_ratings.len() as f64);
    ((average * 2.0).round() / 2.0).clamp(MIN_RATING, MAX_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registration::TopicFeedback;
    use rstest::rstest;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn registration(feedback: &[(&str, u8, &str)]) -> Registration {
        let topics: BTreeMap<String, TopicFeedback> = feedback
            .iter()
            .map(|(topic, rating, text)| {
                (
                    topic.to_string(),
                    TopicFeedback {
                        rating: *rating,
                        feedback: text.to_string(),
                    },
                )
            })
            .collect();
        Registration {
            email: Some("someone@example.com".into()),
            feedback: (!topics.is_empty()).then_some(topics),
            ..Default::default()
        }
    }

    #[rstest]
    #[case(4.5, 5, &[5.0, 5.0, 4.0, 4.0, 5.0, 3.0], 4.5)]
    #[case(0.0, 0, &[3.0], 3.0)]
    #[case(2.0, 1, &[5.0, 5.0], 4.0)]
    #[case(1.0, 10, &[2.0], 1.0)]
    #[case(4.0, 3, &[], 4.0)]
    fn rolling_rating_rounds_to_half_stars(
        #[case] prev: f64,
        #[case] count: u64,
        #[case] ratings: &[f64],
        #[case] expected: f64,
    ) {
        assert_eq!(rolling_rating(prev, count, ratings), expected);
    }

    #[test]
    fn unrated_topics_count_as_four() {
        let reg = registration(&[("canSolve", 0, "nice"), ("features", 5, "")]);
        assert_eq!(submission_ratings(&reg), vec![4.0, 5.0, REGISTRATION_BONUS]);
    }

    #[test]
    fn empty_feedback_contributes_only_bonus() {
        let reg = registration(&[("canSolve", 0, "  ")]);
        assert!(!reg.has_feedback());
        assert_eq!(submission_ratings(&reg), vec![REGISTRATION_BONUS]);
    }

    #[tokio::test]
    async fn missing_document_is_created_with_all_fields() {
        let dir = tempdir().unwrap();
        let service = StatsService::new(dir.path().join("data/stats.json"));

        let stats = service.get_stats().await.unwrap();
        assert_eq!(stats.visits, 0);
        assert_eq!(stats.overall_rating, 0.0);

        let raw = std::fs::read_to_string(service.path()).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for key in ["visits", "registrations", "feedbacks", "lastUpdated", "overallRating"] {
            assert!(doc.get(key).is_some(), "missing {key}");
        }
    }

    #[tokio::test]
    async fn visits_increment_by_one_each_call() {
        let dir = tempdir().unwrap();
        let service = StatsService::new(dir.path().join("stats.json"));
        let before = service.get_stats().await.unwrap();

        assert_eq!(service.record_visit().await.unwrap(), 1);
        let first = service.get_stats().await.unwrap();
        assert_eq!(service.record_visit().await.unwrap(), 2);
        let second = service.get_stats().await.unwrap();

        assert_eq!(second.visits, before.visits + 2);
        assert!(first.last_updated >= before.last_updated);
        assert!(second.last_updated >= first.last_updated);
    }

    #[tokio::test]
    async fn concurrent_visits_are_not_lost() {
        let dir = tempdir().unwrap();
        let service = StatsService::new(dir.path().join("stats.json"));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.record_visit().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(service.get_stats().await.unwrap().visits, 20);
    }

    #[tokio::test]
    async fn registration_updates_counters_and_rating() {
        let dir = tempdir().unwrap();
        let service = StatsService::new(dir.path().join("stats.json"));

        let plain = service.record_registration(&registration(&[])).await.unwrap();
        assert_eq!(plain.registrations, 1);
        assert_eq!(plain.feedbacks, 0);
        assert_eq!(plain.overall_rating, 3.0);

        let rated = registration(&[("designAndUX", 5, "love it"), ("features", 5, "")]);
        let stats = service.record_registration(&rated).await.unwrap();
        assert_eq!(stats.registrations, 2);
        assert_eq!(stats.feedbacks, 1);
        // prev 3.0 has zero weight: (5 + 5 + 3) / 3 = 4.33 -> 4.5
        assert_eq!(stats.overall_rating, 4.5);
        assert_eq!(service.get_stats().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn malformed_document_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let service = StatsService::new(path);

        assert!(matches!(
            service.record_visit().await,
            Err(StatsError::Json(_))
        ));
    }

    #[tokio::test]
    async fn reset_zeroes_counters() {
        let dir = tempdir().unwrap();
        let service = StatsService::new(dir.path().join("stats.json"));
        service.record_visit().await.unwrap();

        let stats = service.reset().await.unwrap();
        assert_eq!(stats.visits, 0);
        assert_eq!(service.get_stats().await.unwrap().visits, 0);
    }
}
