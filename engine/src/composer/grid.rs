use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug_span;

use crate::lm::{LanguageModel, ScoreRanked};

use super::node::{Node, NodeRef, OverrideType};
use super::span::{Span, MAX_SPAN_LENGTH};

const DEFAULT_SEPARATOR: &str = "-";

/// A candidate presented to the user: the combined reading it covers plus
/// the unigram's displayed and raw forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub reading: String,
    pub value: String,
    pub raw_value: String,
}

/// A node together with the index of the span that stores it.
#[derive(Clone)]
pub(super) struct NodeInSpan {
    pub(super) node: NodeRef,
    pub(super) span_index: usize,
}

/// The mutable reading sequence and its span lattice.
///
/// `spans[i]` holds every candidate node that begins at reading `i`; a node
/// of spanning length `s` covers `readings[i..i + s]`, joined by the
/// separator. After every mutation the lattice is repaired around the edit
/// point and refreshed from the language model, so `spans.len()` always
/// equals `readings.len()` and every stored node's reading matches the
/// current sequence.
///
/// The grid is single-threaded and non-reentrant; nodes are shared with walk
/// results through [`NodeRef`], and override mutations flow through that
/// shared ownership.
pub struct ReadingGrid<'a> {
    pub(super) cursor: usize,
    pub(super) separator: String,
    pub(super) readings: Vec<String>,
    pub(super) spans: Vec<Span>,
    pub(super) lm: ScoreRanked<'a>,
}

impl<'a> ReadingGrid<'a> {
    /// The model is borrowed for the grid's lifetime and never mutated.
    pub fn new(lm: &'a dyn LanguageModel) -> Self {
        Self {
            cursor: 0,
            separator: DEFAULT_SEPARATOR.to_string(),
            readings: Vec::new(),
            spans: Vec::new(),
            lm: ScoreRanked::new(lm),
        }
    }

    pub fn clear(&mut self) {
        self.cursor = 0;
        self.readings.clear();
        self.spans.clear();
    }

    /// Number of readings (and spans) in the grid.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn readings(&self) -> &[String] {
        &self.readings
    }

    pub fn reading_separator(&self) -> &str {
        &self.separator
    }

    /// Panics when `cursor` is past the end of the readings.
    pub fn set_cursor(&mut self, cursor: usize) {
        assert!(cursor <= self.readings.len(), "cursor out of range");
        self.cursor = cursor;
    }

    /// Takes effect on the next refresh; readings of existing nodes keep the
    /// separator they were built with.
    pub fn set_reading_separator(&mut self, separator: impl Into<String>) {
        self.separator = separator.into();
    }

    /// Insert `reading` at the cursor and advance it.
    ///
    /// Returns `false`, leaving the grid unchanged, for the empty string,
    /// for a reading equal to the separator, and for a reading the language
    /// model has no unigrams for.
    pub fn insert_reading(&mut self, reading: &str) -> bool {
        if reading.is_empty() || reading == self.separator {
            return false;
        }
        if !self.lm.has_unigrams(reading) {
            return false;
        }

        self.readings.insert(self.cursor, reading.to_string());
        self.expand_grid_at(self.cursor);
        self.update();
        // The cursor moves only after the refresh: `update` centers its
        // window on the pre-insertion cursor.
        self.cursor += 1;
        true
    }

    /// Remove the reading left of the cursor. Returns `false` at the head.
    pub fn delete_reading_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }

        self.readings.remove(self.cursor - 1);
        // The decrement must precede the shrink and the refresh.
        self.cursor -= 1;
        self.shrink_grid_at(self.cursor);
        self.update();
        true
    }

    /// Remove the reading right of the cursor. Returns `false` at the end.
    pub fn delete_reading_after_cursor(&mut self) -> bool {
        if self.cursor == self.readings.len() {
            return false;
        }

        self.readings.remove(self.cursor);
        self.shrink_grid_at(self.cursor);
        self.update();
        true
    }

    /// First node overlapping `cursor` that satisfies `predicate`.
    ///
    /// Panics when `cursor` is past the end of the readings.
    pub fn find_in_span(
        &self,
        cursor: usize,
        predicate: impl Fn(&NodeRef) -> bool,
    ) -> Option<NodeRef> {
        assert!(cursor <= self.readings.len(), "cursor out of range");
        self.overlapping_nodes_at(self.anchored(cursor))
            .into_iter()
            .map(|nis| nis.node)
            .find(predicate)
    }

    /// Every unigram of every node overlapping `loc`, longer spans first.
    ///
    /// Same-length nodes keep the overlap order (nodes starting at `loc`
    /// before nodes extending through it); within a node, unigrams are in
    /// descending-score order. An out-of-range `loc` yields an empty list.
    pub fn candidates_at(&self, loc: usize) -> Vec<Candidate> {
        let mut result = Vec::new();
        if self.readings.is_empty() || loc > self.readings.len() {
            return result;
        }

        let mut nodes = self.overlapping_nodes_at(self.anchored(loc));
        nodes.sort_by_key(|nis| std::cmp::Reverse(nis.node.borrow().spanning_length()));

        for nis in &nodes {
            let node = nis.node.borrow();
            for unigram in node.unigrams() {
                result.push(Candidate {
                    reading: node.reading().to_string(),
                    value: unigram.value.clone(),
                    raw_value: unigram.raw_value.clone(),
                });
            }
        }
        result
    }

    /// Override with an explicit reading filter: only nodes whose combined
    /// reading equals `candidate.reading` are considered.
    pub fn override_candidate(
        &mut self,
        loc: usize,
        candidate: &Candidate,
        override_type: OverrideType,
    ) -> bool {
        self.override_matching(loc, Some(&candidate.reading), &candidate.value, override_type)
    }

    /// Override matching on the displayed value alone.
    pub fn override_candidate_with_value(
        &mut self,
        loc: usize,
        value: &str,
        override_type: OverrideType,
    ) -> bool {
        self.override_matching(loc, None, value, override_type)
    }

    fn override_matching(
        &mut self,
        loc: usize,
        reading: Option<&str>,
        value: &str,
        override_type: OverrideType,
    ) -> bool {
        if loc > self.readings.len() {
            return false;
        }

        let mut overridden: Option<NodeInSpan> = None;
        for nis in self.overlapping_nodes_at(self.anchored(loc)) {
            if let Some(filter) = reading {
                if nis.node.borrow().reading() != filter {
                    continue;
                }
            }
            if nis
                .node
                .borrow_mut()
                .select_override_unigram(value, override_type)
            {
                overridden = Some(nis);
                break;
            }
        }

        let Some(overridden) = overridden else {
            return false;
        };

        // The override commits to this node's whole extent. A node that
        // overlaps the extent cannot be walked together with the overridden
        // one, so any stale override on it is cleared; otherwise it would
        // silently bias walks after later edits.
        let begin = overridden.span_index;
        let end = (begin + overridden.node.borrow().spanning_length()).min(self.spans.len());
        for i in begin..end {
            for nis in self.overlapping_nodes_at(i) {
                if !Rc::ptr_eq(&nis.node, &overridden.node) {
                    nis.node.borrow_mut().reset();
                }
            }
        }
        true
    }

    /// All nodes covering position `loc`: first those starting at `loc` in
    /// ascending length, then those starting earlier and extending through
    /// it.
    pub(super) fn overlapping_nodes_at(&self, loc: usize) -> Vec<NodeInSpan> {
        let mut results = Vec::new();
        if self.spans.is_empty() || loc >= self.spans.len() {
            return results;
        }

        for length in 1..=self.spans[loc].max_length() {
            if let Some(node) = self.spans[loc].node_of(length) {
                results.push(NodeInSpan {
                    node: Rc::clone(node),
                    span_index: loc,
                });
            }
        }

        let begin = loc - loc.min(MAX_SPAN_LENGTH - 1);
        for i in begin..loc {
            let begin_length = loc - i + 1;
            for length in begin_length..=self.spans[i].max_length() {
                if let Some(node) = self.spans[i].node_of(length) {
                    results.push(NodeInSpan {
                        node: Rc::clone(node),
                        span_index: i,
                    });
                }
            }
        }

        results
    }

    /// End-of-grid locations address the last span.
    fn anchored(&self, loc: usize) -> usize {
        if loc == self.readings.len() {
            loc.saturating_sub(1)
        } else {
            loc
        }
    }

    fn expand_grid_at(&mut self, loc: usize) {
        let at_edge = loc == 0 || loc == self.spans.len();
        self.spans.insert(loc, Span::new());
        if !at_edge {
            self.remove_affected_nodes(loc);
        }
    }

    fn shrink_grid_at(&mut self, loc: usize) {
        if loc == self.spans.len() {
            return;
        }
        self.spans.remove(loc);
        self.remove_affected_nodes(loc);
    }

    /// Drop nodes broken by a span spliced in or out at `loc`.
    ///
    /// A node starting at `i < loc` that reached `loc` or beyond no longer
    /// covers contiguous readings:
    ///
    /// ```text
    /// span index  0   1   2   3          0   1   2   3   4
    ///                 (---)                  (---)
    ///                 (-------)     =>       (----   ----)
    ///             (-----------)          (--------   ----)
    /// ```
    ///
    /// Only spans within `MAX_SPAN_LENGTH - 1` positions of `loc` can hold
    /// such nodes. A splice at the head clears the head span itself; the
    /// following refresh rebuilds it.
    fn remove_affected_nodes(&mut self, loc: usize) {
        if self.spans.is_empty() {
            return;
        }
        let begin = loc.saturating_sub(MAX_SPAN_LENGTH - 1);
        let end = loc.saturating_sub(1);
        for i in begin..=end {
            self.spans[i].remove_nodes_of_or_longer_than(loc - i + 1);
        }
    }

    fn combined_reading(&self, pos: usize, length: usize) -> String {
        self.readings[pos..pos + length].join(&self.separator)
    }

    fn has_node_at(&self, loc: usize, length: usize, reading: &str) -> bool {
        if loc >= self.spans.len() {
            return false;
        }
        match self.spans[loc].node_of(length) {
            Some(node) => node.borrow().reading() == reading,
            None => false,
        }
    }

    /// Refresh the lattice around the cursor.
    ///
    /// Queries the language model for every combined reading of length
    /// `1..=MAX_SPAN_LENGTH` starting within `MAX_SPAN_LENGTH` positions of
    /// the cursor, skipping cells that already hold a node with a matching
    /// reading. One edit therefore touches O(MAX_SPAN_LENGTH²) cells, not
    /// the whole grid.
    fn update(&mut self) {
        let _span = debug_span!(
            "update",
            cursor = self.cursor,
            readings = self.readings.len()
        )
        .entered();

        let begin = self.cursor.saturating_sub(MAX_SPAN_LENGTH);
        let end = (self.cursor + MAX_SPAN_LENGTH).min(self.readings.len());
        for pos in begin..end {
            for length in 1..=MAX_SPAN_LENGTH.min(end - pos) {
                let combined = self.combined_reading(pos, length);
                if self.has_node_at(pos, length, &combined) {
                    continue;
                }
                let unigrams = self.lm.unigrams(&combined);
                if unigrams.is_empty() {
                    continue;
                }
                self.spans[pos].add(Rc::new(RefCell::new(Node::new(
                    combined, length, unigrams,
                ))));
            }
        }
    }
}
