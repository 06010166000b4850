use std::collections::HashMap;

use super::{LanguageModel, Unigram};

/// Errors from [`MemoryLanguageModel::from_text`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: expected `reading value score [raw_value]`, got {got:?}")]
    MalformedLine { line: usize, got: String },
    #[error("line {line}: invalid score {got:?}")]
    InvalidScore {
        line: usize,
        got: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Hash-map-backed language model.
///
/// Suited for user phrases, test fixtures, and small add-on tables; the main
/// dictionary of a shipping input method lives behind its own
/// [`LanguageModel`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryLanguageModel {
    entries: HashMap<String, Vec<Unigram>>,
}

impl MemoryLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<Unigram>)>) -> Self {
        let mut model = Self::new();
        for (reading, unigrams) in entries {
            model.entries.entry(reading).or_default().extend(unigrams);
        }
        model
    }

    /// Parse a whitespace-separated unigram table.
    ///
    /// One unigram per line: `reading value score`, with an optional fourth
    /// `raw_value` column. `#` starts a comment; blank lines are skipped.
    pub fn from_text(text: &str) -> Result<Self, ParseError> {
        let mut model = Self::new();
        for (idx, raw_line) in text.lines().enumerate() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || ParseError::MalformedLine {
                line: idx + 1,
                got: raw_line.to_string(),
            };
            let mut fields = line.split_whitespace();
            let (Some(reading), Some(value), Some(score)) =
                (fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed());
            };
            let parsed: f64 = score.parse().map_err(|source| ParseError::InvalidScore {
                line: idx + 1,
                got: score.to_string(),
                source,
            })?;
            let unigram = match fields.next() {
                Some(raw_value) => Unigram::with_raw_value(value, raw_value, parsed),
                None => Unigram::new(value, parsed),
            };
            if fields.next().is_some() {
                return Err(malformed());
            }
            model.insert(reading, unigram);
        }
        Ok(model)
    }

    pub fn insert(&mut self, reading: impl Into<String>, unigram: Unigram) {
        self.entries.entry(reading.into()).or_default().push(unigram);
    }
}

impl LanguageModel for MemoryLanguageModel {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        self.entries.get(reading).cloned().unwrap_or_default()
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.entries.get(reading).is_some_and(|u| !u.is_empty())
    }
}
