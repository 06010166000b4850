use std::cell::RefCell;
use std::rc::Rc;

use crate::lm::Unigram;

/// Score assigned to a hard-pinned candidate. Language-model scores are
/// negative log probabilities, so zero outweighs any competing span. A model
/// that legitimately produces non-negative scores breaks this dominance.
pub const OVERRIDING_SCORE: f64 = 0.0;

/// Shared handle to a lattice node.
///
/// The span that stores a node, any walk result that chose it, and
/// overlapping-node queries all hold the same allocation; selection and
/// override changes are visible to every holder. Identity is by pointer
/// (`Rc::ptr_eq`), not by content.
pub type NodeRef = Rc<RefCell<Node>>;

/// How a user selection affects the node's score in the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverrideType {
    /// No override; the node scores as its selected unigram.
    #[default]
    None,
    /// Hard pin: the node scores [`OVERRIDING_SCORE`], so the walk must take
    /// it whenever the lattice allows.
    HighScore,
    /// Soft correction: the node scores as its top-ranked unigram regardless
    /// of the selection, so a genuinely better longer span can still win.
    TopUnigramScore,
}

/// One lattice vertex: candidate unigrams over a combined reading.
#[derive(Debug, Clone)]
pub struct Node {
    reading: String,
    spanning_length: usize,
    unigrams: Vec<Unigram>,
    current_index: usize,
    override_type: OverrideType,
}

impl Node {
    /// `unigrams` must be in descending-score order (the `ScoreRanked`
    /// adapter's output) and non-empty for any node that enters a span.
    pub fn new(reading: impl Into<String>, spanning_length: usize, unigrams: Vec<Unigram>) -> Self {
        Self {
            reading: reading.into(),
            spanning_length,
            unigrams,
            current_index: 0,
            override_type: OverrideType::None,
        }
    }

    pub fn reading(&self) -> &str {
        &self.reading
    }

    /// Number of readings this node covers.
    pub fn spanning_length(&self) -> usize {
        self.spanning_length
    }

    pub fn unigrams(&self) -> &[Unigram] {
        &self.unigrams
    }

    pub fn current_unigram(&self) -> Option<&Unigram> {
        self.unigrams.get(self.current_index)
    }

    /// Displayed value of the selected unigram.
    pub fn value(&self) -> &str {
        self.current_unigram().map_or("", |u| u.value.as_str())
    }

    /// Score contributed to the walk, depending on the override state.
    pub fn score(&self) -> f64 {
        if self.unigrams.is_empty() {
            return 0.0;
        }
        match self.override_type {
            OverrideType::HighScore => OVERRIDING_SCORE,
            OverrideType::TopUnigramScore => self.unigrams[0].score,
            OverrideType::None => self.unigrams[self.current_index].score,
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.override_type != OverrideType::None
    }

    pub fn override_type(&self) -> OverrideType {
        self.override_type
    }

    /// Select the first unigram whose value equals `value` and record the
    /// override. Returns `false` when no unigram matches.
    ///
    /// Panics when `override_type` is `None`: clearing an override goes
    /// through [`Node::reset`].
    pub fn select_override_unigram(&mut self, value: &str, override_type: OverrideType) -> bool {
        assert!(
            override_type != OverrideType::None,
            "an override must change the node's scoring"
        );
        match self.unigrams.iter().position(|u| u.value == value) {
            Some(index) => {
                self.current_index = index;
                self.override_type = override_type;
                true
            }
            None => false,
        }
    }

    /// Back to the top-ranked unigram with no override.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.override_type = OverrideType::None;
    }
}
