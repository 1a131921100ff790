//! Rule-based analyzer that recognizes date and time phrases.
//!
//! Tokenization splits words from punctuation ("Call mom, asap" becomes
//! `Call` `mom` `,` `asap`). A token inherits the label of the first entity
//! span it overlaps, so `friday's` is temporal as a whole.

use regex::Regex;
use tracing::debug;

use super::{Classification, Document, Entity, EntityLabel, TextAnalyzer, Token};
use crate::error::AnalyzerError;

const TOKEN_PATTERN: &str = r"\w+(?:[-'’]\w+)*|[^\w\s]";

const MONTHS: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const WEEKDAYS: &str = r"(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";

/// Span patterns, tried in this order. Overlaps resolve to the earliest,
/// then longest, match.
fn span_patterns() -> Vec<(String, EntityLabel)> {
    vec![
        (
            r"\b\d{4}-\d{2}-\d{2}(?:[t ]\d{1,2}:\d{2}(?::\d{2})?(?:z|[+-]\d{2}:\d{2})?)?\b".into(),
            EntityLabel::Date,
        ),
        (r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b".into(), EntityLabel::Date),
        (
            format!(r"\b{MONTHS}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b"),
            EntityLabel::Date,
        ),
        (
            format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{MONTHS}(?:,?\s+\d{{4}})?\b"),
            EntityLabel::Date,
        ),
        (
            format!(r"\b(?:next|this|last)\s+(?:week|month|year|{WEEKDAYS})\b"),
            EntityLabel::Date,
        ),
        (r"\b(?:today|tonight|tomorrow|yesterday)\b".into(), EntityLabel::Date),
        (format!(r"\b{WEEKDAYS}\b"), EntityLabel::Date),
        (
            r"\bin\s+(?:\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten)\s+(?:minutes?|hours?|days?|weeks?|months?)\b".into(),
            EntityLabel::Date,
        ),
        (
            r"\b(?:the\s+)?end\s+of\s+(?:the\s+)?(?:day|week|month)\b".into(),
            EntityLabel::Date,
        ),
        (
            r"\b\d{1,2}(?::\d{2})?\s*(?:[ap]\.m\.|[ap]m\b)".into(),
            EntityLabel::Time,
        ),
        (r"\b(?:[01]?\d|2[0-3]):[0-5]\d\b".into(), EntityLabel::Time),
        (r"\b(?:noon|midnight)\b".into(), EntityLabel::Time),
    ]
}

/// Lexicon-driven [`TextAnalyzer`].
///
/// Carries no classifier; [`TextAnalyzer::classify`] always reports
/// [`Classification::unknown`].
#[derive(Debug)]
pub struct LexiconAnalyzer {
    tokens: Regex,
    spans: Vec<(Regex, EntityLabel)>,
}

impl LexiconAnalyzer {
    /// Compile the lexicon. Call once at startup and share the result.
    pub fn load() -> Result<Self, AnalyzerError> {
        let tokens = Regex::new(TOKEN_PATTERN).map_err(|e| AnalyzerError::Init(e.to_string()))?;
        let spans = span_patterns()
            .into_iter()
            .map(|(pattern, label)| {
                Regex::new(&format!("(?i){pattern}"))
                    .map(|re| (re, label))
                    .map_err(|e| AnalyzerError::Init(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(patterns = spans.len(), "lexicon analyzer loaded");
        Ok(Self { tokens, spans })
    }

    fn find_entities(&self, text: &str) -> Vec<Entity> {
        let mut found: Vec<Entity> = self
            .spans
            .iter()
            .flat_map(|(re, label)| {
                re.find_iter(text).map(move |m| Entity {
                    text: m.as_str().to_string(),
                    label: label.clone(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect();

        found.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

        let mut entities: Vec<Entity> = Vec::with_capacity(found.len());
        for entity in found {
            if entities.last().is_some_and(|prev| entity.start < prev.end) {
                continue;
            }
            entities.push(entity);
        }
        entities
    }
}

impl TextAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Result<Document, AnalyzerError> {
        let entities = self.find_entities(text);

        let tokens = self
            .tokens
            .find_iter(text)
            .map(|m| {
                let label = entities
                    .iter()
                    .find(|e| m.start() < e.end && e.start < m.end())
                    .map(|e| e.label.clone());
                Token {
                    text: m.as_str().to_string(),
                    entity: label,
                }
            })
            .collect();

        Ok(Document::new(tokens, entities))
    }

    fn classify(&self, _text: &str) -> Result<Classification, AnalyzerError> {
        Ok(Classification::unknown())
    }
}
