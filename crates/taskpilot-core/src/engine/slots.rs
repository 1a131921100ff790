//! Free-slot search over an existing schedule.
//!
//! Schedule entries are busy spans `[due_date, due_date + duration)`. A
//! [`SlotFinder`] turns them into candidate start times for a new task.

use chrono::{DateTime, Duration, Utc};

use crate::config::SchedulerConfig;
use crate::error::EngineError;
use crate::task::Task;

/// Source of candidate start times for a task.
pub trait SlotFinder: Send + Sync {
    fn candidates(
        &self,
        task: &Task,
        schedule: &[Task],
        now: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EngineError>;
}

/// Finder that never proposes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlots;

impl SlotFinder for NoSlots {
    fn candidates(
        &self,
        _task: &Task,
        _schedule: &[Task],
        _now: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EngineError> {
        Ok(Vec::new())
    }
}

/// A busy span on the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusySpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusySpan {
    pub fn from_task(task: &Task) -> Result<Self, EngineError> {
        let end = task.end_time().ok_or(EngineError::SpanOverflow {
            due_date: task.due_date,
        })?;
        Ok(Self {
            start: task.due_date,
            end,
        })
    }
}

/// Gap-based finder anchored at "now".
///
/// Proposes the start of every gap in `[now, now + horizon)` that can hold
/// the task (and is at least `min_gap_minutes` long).
#[derive(Debug, Clone)]
pub struct GapSlotFinder {
    horizon_hours: i64,
    min_gap_minutes: i64,
}

impl GapSlotFinder {
    /// 24 hour horizon, 15 minute minimum gap.
    pub fn new() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            horizon_hours: config.horizon_hours,
            min_gap_minutes: config.min_gap_minutes,
        }
    }

    pub fn with_horizon(mut self, hours: i64) -> Self {
        self.horizon_hours = hours;
        self
    }

    /// Free intervals between busy spans within `[window_start, window_end)`.
    ///
    /// Returned sorted by start time.
    pub fn find_gaps(
        &self,
        busy: &[BusySpan],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
        min_minutes: i64,
    ) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let mut gaps = Vec::new();

        let mut sorted: Vec<_> = busy.to_vec();
        sorted.sort_by_key(|s| s.start);

        let mut last_end = window_start;
        for span in &sorted {
            if span.end <= last_end {
                continue;
            }
            if span.start >= window_end {
                break;
            }

            if span.start > last_end && (span.start - last_end).num_minutes() >= min_minutes {
                gaps.push((last_end, span.start));
            }
            last_end = span.end.min(window_end);
        }

        if last_end < window_end && (window_end - last_end).num_minutes() >= min_minutes {
            gaps.push((last_end, window_end));
        }

        gaps
    }
}

impl Default for GapSlotFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotFinder for GapSlotFinder {
    fn candidates(
        &self,
        task: &Task,
        schedule: &[Task],
        now: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>, EngineError> {
        let horizon = Duration::try_hours(self.horizon_hours)
            .filter(|_| self.horizon_hours > 0)
            .ok_or(EngineError::InvalidHorizon {
                hours: self.horizon_hours,
            })?;
        let window_end = now
            .checked_add_signed(horizon)
            .ok_or(EngineError::InvalidHorizon {
                hours: self.horizon_hours,
            })?;

        // a task already on the schedule does not block itself
        let busy: Vec<BusySpan> = schedule
            .iter()
            .filter(|entry| task.id.is_none() || entry.id != task.id)
            .map(BusySpan::from_task)
            .collect::<Result<_, _>>()?;

        let needed = self
            .min_gap_minutes
            .max(i64::from(task.estimated_duration));

        Ok(self
            .find_gaps(&busy, now, window_end, needed)
            .into_iter()
            .map(|(start, _)| start)
            .collect())
    }
}

/// The candidate closest to `now`, if any.
pub fn select_optimal_slot(
    candidates: &[DateTime<Utc>],
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .copied()
        .min_by_key(|slot| (*slot - now).abs())
}
