//! Natural-language task extraction.
//!
//! Turns free text such as `"Send invoice to ACME tomorrow, urgent"` into a
//! [`TaskDraft`]:
//! 1. The [`TextAnalyzer`] tokenizes the text and labels DATE/TIME spans
//! 2. Every DATE/TIME span is resolved to a point in time; the last one wins
//! 3. Priority comes from the urgency vocabulary in the raw text
//! 4. The title is every token outside a DATE/TIME span

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::ExtractorConfig;
use crate::error::{AnalyzerError, ParseError};
use crate::nlp::{DateParser, Document, LexiconAnalyzer, NaturalDateParser, TextAnalyzer};
use crate::task::{TaskDraft, HIGH_PRIORITY, NORMAL_PRIORITY, UNTITLED_TASK};

/// Words that upgrade a task to high priority.
pub const URGENCY_WORDS: [&str; 4] = ["urgent", "asap", "important", "critical"];

/// Extracts task drafts from free text.
///
/// Cheap to clone; the analyzer and date parser are shared.
#[derive(Clone)]
pub struct TaskExtractor {
    analyzer: Arc<dyn TextAnalyzer>,
    dates: Arc<dyn DateParser>,
    config: ExtractorConfig,
}

impl TaskExtractor {
    pub fn new(analyzer: Arc<dyn TextAnalyzer>, dates: Arc<dyn DateParser>) -> Self {
        Self {
            analyzer,
            dates,
            config: ExtractorConfig::default(),
        }
    }

    /// Build with the bundled [`LexiconAnalyzer`] and [`NaturalDateParser`].
    ///
    /// Performs the analyzer's one-time initialization; an error here should
    /// abort startup.
    pub fn with_defaults(config: ExtractorConfig) -> Result<Self, AnalyzerError> {
        let analyzer = LexiconAnalyzer::load()?;
        Ok(Self::new(Arc::new(analyzer), Arc::new(NaturalDateParser::new())).with_config(config))
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse `text` relative to the current time.
    pub fn parse_task(&self, text: &str) -> Result<TaskDraft, ParseError> {
        self.parse_task_at(text, Utc::now())
    }

    /// Parse `text` with relative dates resolved against `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the analyzer fails; no partial draft is
    /// produced.
    pub fn parse_task_at(&self, text: &str, now: DateTime<Utc>) -> Result<TaskDraft, ParseError> {
        let doc = self.analyze(text)?;

        let mut due_date = None;
        for entity in doc.temporal_entities() {
            due_date = Some(self.resolve_date(&entity.text, now));
        }

        let draft = TaskDraft {
            title: extract_title(&doc),
            due_date,
            priority: determine_priority(text),
            category: self.config.default_category.clone(),
            estimated_duration: self.config.default_duration_minutes,
        };

        debug!(
            title = %draft.title,
            due_date = ?draft.due_date,
            priority = draft.priority,
            "parsed task"
        );
        Ok(draft)
    }

    fn analyze(&self, text: &str) -> Result<Document, ParseError> {
        let result = self.analyzer.analyze(text).and_then(|doc| {
            let class = self.analyzer.classify(text)?;
            debug!(label = %class.label, score = class.score, "classified task text");
            Ok(doc)
        });

        result.map_err(|e| {
            error!(error = %e, "failed to analyze task text");
            ParseError::Analysis(e)
        })
    }

    /// Resolve one date/time span.
    ///
    /// Exact relative phrases first, then the date parser, then tomorrow.
    fn resolve_date(&self, span: &str, now: DateTime<Utc>) -> DateTime<Utc> {
        if let Some(date) = relative_term(span, now) {
            return date;
        }

        match self.dates.parse(span, now) {
            Ok(date) => date,
            Err(e) => {
                debug!(error = %e, "falling back to tomorrow");
                now + Duration::days(1)
            }
        }
    }
}

impl std::fmt::Debug for TaskExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExtractor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Whole-phrase, case-insensitive lookup of the relative-date table.
fn relative_term(span: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match span.to_lowercase().as_str() {
        "today" => Some(now),
        "tomorrow" => Some(now + Duration::days(1)),
        "next week" => Some(now + Duration::weeks(1)),
        _ => None,
    }
}

/// 1 (high) if the lowercased text contains any urgency word, else 2.
///
/// Substring match on the raw text, so "URGENT!!" and "importantly" both count.
pub fn determine_priority(text: &str) -> i64 {
    let lower = text.to_lowercase();
    if URGENCY_WORDS.iter().any(|word| lower.contains(word)) {
        HIGH_PRIORITY
    } else {
        NORMAL_PRIORITY
    }
}

/// Join every non-DATE/TIME token with single spaces.
pub fn extract_title(doc: &Document) -> String {
    let title = doc
        .tokens
        .iter()
        .filter(|t| !t.is_temporal())
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    match title.trim() {
        "" => UNTITLED_TASK.to_string(),
        trimmed => trimmed.to_string(),
    }
}
