//! Text-understanding capabilities used by the extractor.
//!
//! The extractor never looks inside a model. It talks to two injected
//! capabilities:
//! - [`TextAnalyzer`]: tokenization with entity labels, plus a classification
//!   signal
//! - [`DateParser`]: best-effort resolution of a date phrase to a point in time
//!
//! [`LexiconAnalyzer`] and [`NaturalDateParser`] are the bundled rule-based
//! implementations. A model-backed analyzer plugs in through the same trait.

mod date;
mod lexicon;

pub use date::NaturalDateParser;
pub use lexicon::LexiconAnalyzer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, DateParseError};

/// Entity category attached to a token or span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Date,
    Time,
    Person,
    /// Any other model-specific label
    Other(String),
}

impl EntityLabel {
    /// DATE and TIME spans feed due-date resolution and are dropped from titles.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Time)
    }
}

/// A single token of the analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Label of the entity this token belongs to, if any
    pub entity: Option<EntityLabel>,
}

impl Token {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            entity: None,
        }
    }

    pub fn labeled(text: impl Into<String>, label: EntityLabel) -> Self {
        Self {
            text: text.into(),
            entity: Some(label),
        }
    }

    pub fn is_temporal(&self) -> bool {
        self.entity.as_ref().is_some_and(EntityLabel::is_temporal)
    }
}

/// A recognized span of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offsets into the analyzed text
    pub start: usize,
    pub end: usize,
}

/// Result of running a [`TextAnalyzer`] over a string.
///
/// Entities are in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

impl Document {
    pub fn new(tokens: Vec<Token>, entities: Vec<Entity>) -> Self {
        Self { tokens, entities }
    }

    /// Entities labeled DATE or TIME, in document order.
    pub fn temporal_entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.label.is_temporal())
    }
}

/// Whole-text classification signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            label: "UNKNOWN".into(),
            score: 0.0,
        }
    }
}

/// Entity recognition and classification over raw text.
///
/// Implementations are constructed once at startup and shared read-only.
pub trait TextAnalyzer: Send + Sync {
    /// Tokenize `text` and label date/time (and other) entities.
    fn analyze(&self, text: &str) -> Result<Document, AnalyzerError>;

    /// Classify the whole text.
    fn classify(&self, text: &str) -> Result<Classification, AnalyzerError>;
}

/// Natural-language date parsing.
///
/// Failure must be signalled; callers apply their own fallback.
pub trait DateParser: Send + Sync {
    fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DateParseError>;
}
