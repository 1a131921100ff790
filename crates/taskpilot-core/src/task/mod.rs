//! Task records shared by the extractor and the engine.
//!
//! A [`TaskDraft`] is what the extractor produces from free text: it has no
//! identifier and may lack a due date. A [`Task`] is the stored shape handed
//! to the engine, always carrying a due date and a positive duration.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::error::ValidationError;

/// High urgency (lower number = more urgent).
pub const HIGH_PRIORITY: i64 = 1;
/// Normal urgency.
pub const NORMAL_PRIORITY: i64 = 2;
/// Estimated duration used when nothing else is known.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;
/// Category assigned when nothing else is known.
pub const DEFAULT_CATEGORY: &str = "general";
/// Title used when no usable title text remains.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// Lifecycle label of a task.
///
/// Valid transitions:
/// - PENDING → IN_PROGRESS | DONE | ARCHIVED
/// - IN_PROGRESS → PENDING | DONE | ARCHIVED
/// - DONE → PENDING (reopen) | ARCHIVED
/// - ARCHIVED is terminal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
    Archived,
}

impl TaskStatus {
    /// Check if a transition is valid.
    pub fn can_transition_to(&self, to: &TaskStatus) -> bool {
        match self {
            TaskStatus::Pending => !matches!(to, TaskStatus::Pending),
            TaskStatus::InProgress => !matches!(to, TaskStatus::InProgress),
            TaskStatus::Done => matches!(to, TaskStatus::Pending | TaskStatus::Archived),
            TaskStatus::Archived => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an invalid status transition is attempted.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid status transition: {from} → {to}")]
pub struct StatusTransitionError {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Unpersisted task produced by the extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    /// Set only when a date/time phrase was recognized in the text
    pub due_date: Option<DateTime<Utc>>,
    pub priority: i64,
    pub category: String,
    /// Minutes
    pub estimated_duration: u32,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: UNTITLED_TASK.to_string(),
            due_date: None,
            priority: NORMAL_PRIORITY,
            category: DEFAULT_CATEGORY.to_string(),
            estimated_duration: DEFAULT_DURATION_MINUTES,
        }
    }
}

/// A task record as owned by the (external) store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Assigned by the owning store; `None` before persistence
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    /// 1 = high, 2 = normal; holds the ranking score after prioritization
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub status: TaskStatus,
    /// Minutes
    #[serde(default = "default_duration")]
    pub estimated_duration: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub recurring_pattern: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub user_id: String,
}

fn default_priority() -> i64 {
    NORMAL_PRIORITY
}
fn default_category() -> String {
    DEFAULT_CATEGORY.into()
}
fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl Task {
    /// Create a pending task with default priority, category and duration.
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        let title = title.into();
        Task {
            id: None,
            title: if title.trim().is_empty() {
                UNTITLED_TASK.to_string()
            } else {
                title
            },
            description: None,
            due_date,
            priority: NORMAL_PRIORITY,
            category: DEFAULT_CATEGORY.to_string(),
            status: TaskStatus::Pending,
            estimated_duration: DEFAULT_DURATION_MINUTES,
            tags: Vec::new(),
            recurring: false,
            recurring_pattern: None,
            created_at: now,
            updated_at: now,
            user_id: user_id.into(),
        }
    }

    /// Promote an extracted draft into a task owned by `user_id`.
    ///
    /// A draft without a due date is scheduled for one day after `now`.
    pub fn from_draft(draft: TaskDraft, user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let due_date = draft.due_date.unwrap_or(now + Duration::days(1));
        let mut task = Task::new(draft.title, due_date, user_id);
        task.priority = draft.priority;
        task.category = draft.category;
        task.estimated_duration = draft.estimated_duration.max(1);
        task.created_at = now;
        task.updated_at = now;
        task
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.estimated_duration = minutes;
        self
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_recurrence(mut self, pattern: impl Into<String>) -> Self {
        self.recurring = true;
        self.recurring_pattern = Some(pattern.into());
        self
    }

    /// Add a tag unless an equal tag is already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.updated_at = Utc::now();
        true
    }

    /// Move to a new lifecycle status.
    pub fn set_status(&mut self, status: TaskStatus) -> Result<(), StatusTransitionError> {
        if !self.status.can_transition_to(&status) {
            return Err(StatusTransitionError {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Pending or in progress.
    pub fn is_open(&self) -> bool {
        matches!(self.status, TaskStatus::Pending | TaskStatus::InProgress)
    }

    /// End of the span this task occupies on a schedule.
    ///
    /// `None` when the end falls past the representable calendar.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.due_date
            .checked_add_signed(Duration::minutes(i64::from(self.estimated_duration)))
    }

    /// Check the invariants a stored task must hold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".into(),
                message: "must not be empty".into(),
            });
        }
        if self.estimated_duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "estimated_duration".into(),
                message: "must be a positive number of minutes".into(),
            });
        }
        if self.recurring_pattern.is_some() && !self.recurring {
            return Err(ValidationError::InvalidValue {
                field: "recurring_pattern".into(),
                message: "set on a task that is not recurring".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_defaults() {
        let draft = TaskDraft::default();
        assert_eq!(draft.title, "Untitled Task");
        assert_eq!(draft.priority, NORMAL_PRIORITY);
        assert_eq!(draft.category, "general");
        assert_eq!(draft.estimated_duration, 30);
        assert!(draft.due_date.is_none());
    }

    #[test]
    fn task_new_falls_back_to_untitled() {
        let task = Task::new("   ", Utc::now(), "u1");
        assert_eq!(task.title, UNTITLED_TASK);
        assert!(task.id.is_none());
        assert_eq!(task.status, TaskStatus::Pending);
    }

    #[test]
    fn from_draft_keeps_fields() {
        let now = Utc::now();
        let due = now + Duration::hours(3);
        let draft = TaskDraft {
            title: "Write report".into(),
            due_date: Some(due),
            priority: HIGH_PRIORITY,
            category: "work".into(),
            estimated_duration: 45,
        };

        let task = Task::from_draft(draft, "user-7", now);
        assert_eq!(task.title, "Write report");
        assert_eq!(task.due_date, due);
        assert_eq!(task.priority, HIGH_PRIORITY);
        assert_eq!(task.category, "work");
        assert_eq!(task.estimated_duration, 45);
        assert_eq!(task.user_id, "user-7");
        assert_eq!(task.created_at, now);
        assert!(task.id.is_none());
    }

    #[test]
    fn from_draft_without_due_date_defaults_to_tomorrow() {
        let now = Utc::now();
        let task = Task::from_draft(TaskDraft::default(), "u", now);
        assert_eq!(task.due_date, now + Duration::days(1));
    }

    #[test]
    fn tags_are_deduplicated() {
        let mut task = Task::new("Tagged", Utc::now(), "u");
        assert!(task.add_tag("home"));
        assert!(!task.add_tag("home"));
        assert!(task.add_tag("errand"));
        assert_eq!(task.tags, vec!["home", "errand"]);
    }

    #[test]
    fn status_transitions() {
        let mut task = Task::new("Lifecycle", Utc::now(), "u");
        assert!(task.is_open());
        task.set_status(TaskStatus::InProgress).unwrap();
        task.set_status(TaskStatus::Done).unwrap();
        assert!(!task.is_open());
        task.set_status(TaskStatus::Archived).unwrap();

        let err = task.set_status(TaskStatus::Pending).unwrap_err();
        assert_eq!(err.from, TaskStatus::Archived);
        assert_eq!(err.to, TaskStatus::Pending);
    }

    #[test]
    fn done_cannot_go_back_to_in_progress() {
        assert!(!TaskStatus::Done.can_transition_to(&TaskStatus::InProgress));
        assert!(TaskStatus::Done.can_transition_to(&TaskStatus::Pending));
    }

    #[test]
    fn end_time_adds_duration() {
        let due = Utc::now();
        let task = Task::new("Span", due, "u").with_duration(90);
        assert_eq!(task.end_time(), Some(due + Duration::minutes(90)));
    }

    #[test]
    fn end_time_past_calendar_end_is_none() {
        let due = DateTime::<Utc>::MAX_UTC - Duration::minutes(5);
        let task = Task::new("Far", due, "u").with_duration(30);
        assert_eq!(task.end_time(), None);
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let task = Task::new("Zero", Utc::now(), "u").with_duration(0);
        assert!(task.validate().is_err());
        assert!(Task::new("Ok", Utc::now(), "u").validate().is_ok());
    }

    #[test]
    fn validate_rejects_orphan_recurrence_pattern() {
        let mut task = Task::new("Weekly sync", Utc::now(), "u").with_recurrence("weekly");
        assert!(task.validate().is_ok());
        task.recurring = false;
        assert!(task.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"title":"Pay rent","due_date":"2026-11-01T09:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.priority, NORMAL_PRIORITY);
        assert_eq!(task.category, "general");
        assert_eq!(task.estimated_duration, 30);
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.id.is_none());
        assert!(!task.recurring);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }
}
