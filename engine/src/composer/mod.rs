//! Sentence composition over a span lattice.
//!
//! A [`ReadingGrid`] holds the typed readings plus every candidate node the
//! language model offers for windows of adjacent readings. [`ReadingGrid::walk`]
//! finds the maximum-score segmentation of the whole sequence; user overrides
//! pin or bias individual nodes and survive later edits.

mod grid;
mod node;
mod span;
mod testutil;
mod walk;

#[cfg(test)]
mod tests;

pub use grid::{Candidate, ReadingGrid};
pub use node::{Node, NodeRef, OverrideType, OVERRIDING_SCORE};
pub use span::{Span, MAX_SPAN_LENGTH};
pub use walk::WalkResult;
