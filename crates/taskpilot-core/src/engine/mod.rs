//! Prioritization & scheduling engine.
//!
//! This module provides:
//! - Ranking of task collections by a baseline feature score
//! - Free-slot suggestion against an existing schedule
//!
//! Both public operations degrade instead of failing: ranking returns the
//! input untouched, slot suggestion returns `None`. Failures are logged.

mod features;
mod slots;

pub use features::{calculate_priorities, extract_features, FeatureVector, Rankable};
pub use slots::{select_optimal_slot, BusySpan, GapSlotFinder, NoSlots, SlotFinder};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::error::EngineError;
use crate::task::Task;

/// Free-form user settings the engine may consult.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserPreferences(serde_json::Map<String, serde_json::Value>);

impl UserPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ranks tasks and proposes time slots.
///
/// Holds no mutable state; share it freely across tasks and threads.
#[derive(Clone)]
pub struct Engine {
    slots: Arc<dyn SlotFinder>,
}

impl Engine {
    /// Engine with the default [`GapSlotFinder`].
    pub fn new() -> Self {
        Self::with_slot_finder(Arc::new(GapSlotFinder::new()))
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::with_slot_finder(Arc::new(GapSlotFinder::from_config(config)))
    }

    pub fn with_slot_finder(slots: Arc<dyn SlotFinder>) -> Self {
        Self { slots }
    }

    /// Score every task, overwrite its priority with the score, and sort by
    /// score, highest first.
    ///
    /// Note the direction: a higher score sorts first even though a lower
    /// stored priority means "more urgent" elsewhere. If any task cannot be
    /// scored, the input is returned unchanged.
    pub async fn prioritize<T: Rankable>(
        &self,
        tasks: Vec<T>,
        preferences: &UserPreferences,
    ) -> Vec<T> {
        self.prioritize_at(tasks, preferences, Utc::now()).await
    }

    /// [`prioritize`](Self::prioritize) with an explicit "now" for tasks
    /// lacking a due date.
    pub async fn prioritize_at<T: Rankable>(
        &self,
        tasks: Vec<T>,
        preferences: &UserPreferences,
        now: DateTime<Utc>,
    ) -> Vec<T> {
        let scores = match score_tasks(&tasks, preferences, now) {
            Ok(scores) => scores,
            Err(e) => {
                warn!(error = %e, "prioritization failed, returning tasks unchanged");
                return tasks;
            }
        };

        let mut ranked: Vec<(i64, T)> = scores.into_iter().zip(tasks).collect();
        for (score, task) in ranked.iter_mut() {
            task.set_priority(*score);
        }
        ranked.sort_by_key(|(score, _)| Reverse(*score));

        debug!(
            count = ranked.len(),
            preferences = preferences.len(),
            "prioritized tasks"
        );
        ranked.into_iter().map(|(_, task)| task).collect()
    }

    /// Suggest a start time for `task` that avoids `existing_schedule`.
    ///
    /// Returns the candidate closest to now, or `None` when there is none or
    /// the search fails.
    pub async fn suggest_time_slot(
        &self,
        task: &Task,
        existing_schedule: &[Task],
    ) -> Option<DateTime<Utc>> {
        self.suggest_time_slot_at(task, existing_schedule, Utc::now())
            .await
    }

    /// [`suggest_time_slot`](Self::suggest_time_slot) anchored at `now`.
    pub async fn suggest_time_slot_at(
        &self,
        task: &Task,
        existing_schedule: &[Task],
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self.slots.candidates(task, existing_schedule, now) {
            Ok(candidates) => {
                let slot = select_optimal_slot(&candidates, now);
                debug!(candidates = candidates.len(), slot = ?slot, "slot search finished");
                slot
            }
            Err(e) => {
                warn!(error = %e, "slot suggestion failed");
                None
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

fn score_tasks<T: Rankable>(
    tasks: &[T],
    preferences: &UserPreferences,
    now: DateTime<Utc>,
) -> Result<Vec<i64>, EngineError> {
    let features = extract_features(tasks, now)?;
    calculate_priorities(&features, preferences)
}
