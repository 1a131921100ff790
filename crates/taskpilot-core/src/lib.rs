//! # Taskpilot Core Library
//!
//! This library turns free-text task descriptions into structured tasks,
//! ranks a user's tasks, and proposes free time slots. The `taskpilot` CLI
//! is a thin driver over the same library.
//!
//! ## Architecture
//!
//! - **Extractor**: text → [`TaskDraft`] via an injected [`TextAnalyzer`]
//!   (entity recognition and classification) and [`DateParser`]
//! - **Engine**: feature-based ranking and gap-based slot suggestion; never
//!   fails at its public boundary
//! - **Config**: TOML configuration under `~/.config/taskpilot/`
//!
//! ## Key Components
//!
//! - [`TaskExtractor`]: natural-language task parser
//! - [`Engine`]: prioritization and scheduling
//! - [`Task`]: task record owned by an external store
//! - [`Config`]: application configuration management

pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod nlp;
pub mod task;

pub use config::{Config, ExtractorConfig, SchedulerConfig};
pub use engine::{Engine, GapSlotFinder, NoSlots, Rankable, SlotFinder, UserPreferences};
pub use error::{
    AnalyzerError, ConfigError, CoreError, DateParseError, EngineError, ParseError,
    ValidationError,
};
pub use extractor::TaskExtractor;
pub use nlp::{DateParser, Document, LexiconAnalyzer, NaturalDateParser, TextAnalyzer};
pub use task::{Task, TaskDraft, TaskStatus};
