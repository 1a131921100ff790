//! Feature vectors and the baseline score.
//!
//! Each task becomes `[duration_minutes, due_timestamp_secs, title_chars,
//! priority]`. The score is the plain mean of those four numbers, truncated.
//! This is a simplified linear baseline, not a learned ranking: in practice
//! the due timestamp dominates, so later deadlines score higher.

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::task::{Task, TaskDraft, DEFAULT_DURATION_MINUTES, NORMAL_PRIORITY};

/// Anything the engine can rank.
///
/// Accessors return `None` for absent values; the engine substitutes
/// defaults (30 minutes, now, priority 2).
pub trait Rankable {
    fn title(&self) -> &str;
    fn estimated_duration(&self) -> Option<u32>;
    fn due_date(&self) -> Option<DateTime<Utc>>;
    fn priority(&self) -> Option<i64>;
    fn set_priority(&mut self, priority: i64);
}

impl Rankable for Task {
    fn title(&self) -> &str {
        &self.title
    }
    fn estimated_duration(&self) -> Option<u32> {
        Some(self.estimated_duration)
    }
    fn due_date(&self) -> Option<DateTime<Utc>> {
        Some(self.due_date)
    }
    fn priority(&self) -> Option<i64> {
        Some(self.priority)
    }
    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }
}

impl Rankable for TaskDraft {
    fn title(&self) -> &str {
        &self.title
    }
    fn estimated_duration(&self) -> Option<u32> {
        Some(self.estimated_duration)
    }
    fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }
    fn priority(&self) -> Option<i64> {
        Some(self.priority)
    }
    fn set_priority(&mut self, priority: i64) {
        self.priority = priority;
    }
}

/// `[duration, due timestamp, title length, priority]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; 4]);

impl FeatureVector {
    /// Build the vector for one task.
    ///
    /// Zero durations and blank titles are malformed.
    pub fn from_task<T: Rankable>(task: &T, now: DateTime<Utc>) -> Result<Self, String> {
        let duration = task.estimated_duration().unwrap_or(DEFAULT_DURATION_MINUTES);
        if duration == 0 {
            return Err("estimated duration must be positive".into());
        }

        let title = task.title();
        if title.trim().is_empty() {
            return Err("title must not be empty".into());
        }

        let due = task.due_date().unwrap_or(now);
        let timestamp = due.timestamp_micros() as f64 / 1_000_000.0;

        Ok(Self([
            f64::from(duration),
            timestamp,
            title.chars().count() as f64,
            task.priority().unwrap_or(NORMAL_PRIORITY) as f64,
        ]))
    }

    /// Arithmetic mean of the four features.
    pub fn mean(&self) -> f64 {
        self.0.iter().sum::<f64>() / self.0.len() as f64
    }
}

/// Feature vectors for every task, failing on the first malformed entry.
pub fn extract_features<T: Rankable>(
    tasks: &[T],
    now: DateTime<Utc>,
) -> Result<Vec<FeatureVector>, EngineError> {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            FeatureVector::from_task(task, now)
                .map_err(|message| EngineError::Feature { index, message })
        })
        .collect()
}

/// Integer scores, one per feature vector.
///
/// `_preferences` is accepted so callers can later bias scores; the baseline
/// ignores it so that scores depend only on the four features.
pub fn calculate_priorities(
    features: &[FeatureVector],
    _preferences: &super::UserPreferences,
) -> Result<Vec<i64>, EngineError> {
    features
        .iter()
        .enumerate()
        .map(|(index, fv)| {
            let score = fv.mean();
            if !score.is_finite() || score.abs() >= i64::MAX as f64 {
                return Err(EngineError::Scoring { index, score });
            }
            Ok(score.trunc() as i64)
        })
        .collect()
}
