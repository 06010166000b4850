//! Sentence-composition core for a phonetic input method.
//!
//! Typed readings go into a [`composer::ReadingGrid`], which keeps a lattice
//! of candidate words over every window of adjacent readings and finds the
//! most likely segmentation with a longest-path walk. Candidate lookup is
//! delegated to a [`lm::LanguageModel`] implementation supplied by the host.
//!
//! The crate performs no I/O of its own. Composition and refresh are
//! instrumented with `tracing` spans; they surface through whatever
//! subscriber the host has installed.

pub mod composer;
pub mod lm;

pub use composer::{
    Candidate, Node, NodeRef, OverrideType, ReadingGrid, WalkResult, MAX_SPAN_LENGTH,
    OVERRIDING_SCORE,
};
pub use lm::{LanguageModel, MemoryLanguageModel, ParseError, ScoreRanked, Unigram};
