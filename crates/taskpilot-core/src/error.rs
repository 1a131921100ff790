//! Core error types for taskpilot-core.
//!
//! Extraction failures are surfaced to callers as [`ParseError`]. Engine
//! failures are represented as [`EngineError`] internally but never cross the
//! engine's public boundary.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskpilot-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Task extraction failed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Text analyzer could not be constructed or run
    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

}

/// Failure to turn free text into a task draft.
///
/// No partial draft accompanies this error.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The text-understanding capability failed on this input
    #[error("failed to analyze task text: {0}")]
    Analysis(#[source] AnalyzerError),
}

/// Errors raised by a [`TextAnalyzer`](crate::nlp::TextAnalyzer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// One-time model/lexicon initialization failed
    #[error("analyzer initialization failed: {0}")]
    Init(String),

    /// Entity recognition failed
    #[error("entity recognition failed: {0}")]
    Recognition(String),

    /// Classification failed
    #[error("classification failed: {0}")]
    Classification(String),
}

/// A date phrase could not be resolved to a point in time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date expression: '{text}'")]
pub struct DateParseError {
    pub text: String,
}

impl DateParseError {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Internal failures of the prioritization & scheduling engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A task could not be turned into a feature vector
    #[error("malformed task at index {index}: {message}")]
    Feature { index: usize, message: String },

    /// A feature vector produced an unusable score
    #[error("score for task at index {index} is not finite ({score})")]
    Scoring { index: usize, score: f64 },

    /// Slot search horizon is not a positive span
    #[error("invalid slot search horizon: {hours} hours")]
    InvalidHorizon { hours: i64 },

    /// A schedule entry ends past the representable calendar
    #[error("schedule entry due {due_date} overflows the calendar")]
    SpanOverflow { due_date: DateTime<Utc> },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be located or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
