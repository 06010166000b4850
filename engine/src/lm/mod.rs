//! Language-model seam: unigram values and the lookup trait.
//!
//! The grid talks to the model through [`ScoreRanked`], which guarantees
//! descending-score order for every unigram list it hands out.

mod memory;

pub use memory::{MemoryLanguageModel, ParseError};

/// A single language-model entry for a combined reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Unigram {
    /// Displayed form.
    pub value: String,
    /// Underlying form when it differs from the displayed one
    /// (e.g. candidates that expand to punctuation).
    pub raw_value: String,
    /// Additive score, typically a negative log probability.
    pub score: f64,
}

impl Unigram {
    /// Unigram whose raw value equals its displayed value.
    pub fn new(value: impl Into<String>, score: f64) -> Self {
        let value = value.into();
        Self {
            raw_value: value.clone(),
            value,
            score,
        }
    }

    pub fn with_raw_value(
        value: impl Into<String>,
        raw_value: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            value: value.into(),
            raw_value: raw_value.into(),
            score,
        }
    }
}

/// Candidate source for combined readings.
///
/// Both operations are total: a reading the model does not know yields an
/// empty list or `false`, never an error.
pub trait LanguageModel {
    /// All unigrams for `reading`, in the model's own order.
    fn unigrams(&self, reading: &str) -> Vec<Unigram>;

    /// Whether `reading` has at least one unigram. Override when the model
    /// can answer without materializing the list.
    fn has_unigrams(&self, reading: &str) -> bool {
        !self.unigrams(reading).is_empty()
    }
}

/// Adapter that returns unigrams sorted by descending score.
///
/// The sort is stable, so ties keep the underlying model's order. The node
/// selection logic relies on `unigrams()[0]` being the top-scoring
/// candidate.
pub struct ScoreRanked<'a> {
    inner: &'a dyn LanguageModel,
}

impl<'a> ScoreRanked<'a> {
    pub fn new(inner: &'a dyn LanguageModel) -> Self {
        Self { inner }
    }
}

impl LanguageModel for ScoreRanked<'_> {
    fn unigrams(&self, reading: &str) -> Vec<Unigram> {
        let mut unigrams = self.inner.unigrams(reading);
        unigrams.sort_by(|a, b| b.score.total_cmp(&a.score));
        unigrams
    }

    fn has_unigrams(&self, reading: &str) -> bool {
        self.inner.has_unigrams(reading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unsorted;

    impl LanguageModel for Unsorted {
        fn unigrams(&self, reading: &str) -> Vec<Unigram> {
            match reading {
                "duo" => vec![
                    Unigram::new("多", -4.0),
                    Unigram::new("朵", -2.0),
                    Unigram::new("躲", -3.0),
                ],
                "tie" => vec![
                    Unigram::new("first", -1.0),
                    Unigram::new("second", -1.0),
                    Unigram::new("third", -2.0),
                ],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn test_ranked_descending() {
        let ranked = ScoreRanked::new(&Unsorted);
        let values: Vec<String> = ranked
            .unigrams("duo")
            .into_iter()
            .map(|u| u.value)
            .collect();
        assert_eq!(values, vec!["朵", "躲", "多"]);
    }

    #[test]
    fn test_ranked_ties_keep_model_order() {
        let ranked = ScoreRanked::new(&Unsorted);
        let values: Vec<String> = ranked
            .unigrams("tie")
            .into_iter()
            .map(|u| u.value)
            .collect();
        assert_eq!(values, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_has_unigrams_delegates() {
        let ranked = ScoreRanked::new(&Unsorted);
        assert!(ranked.has_unigrams("duo"));
        assert!(!ranked.has_unigrams("wu"));
    }
}
