use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, debug_span};

use super::grid::ReadingGrid;
use super::node::NodeRef;

/// Per-position state of the relaxation sweep: the best accumulated score
/// and the back-pointer for path reconstruction.
#[derive(Clone)]
struct VertexState {
    from_index: usize,
    from_node: Option<NodeRef>,
    max_score: f64,
}

impl Default for VertexState {
    fn default() -> Self {
        Self {
            from_index: 0,
            from_node: None,
            max_score: f64::NEG_INFINITY,
        }
    }
}

/// The maximum-score covering of the readings, plus search diagnostics.
///
/// Holds the same node allocations as the grid's spans, so overrides applied
/// after the walk are visible through the result (and vice versa).
#[derive(Debug, Clone, Default)]
pub struct WalkResult {
    /// Chosen nodes, left to right; their spanning lengths sum to
    /// `total_readings`.
    pub nodes: Vec<NodeRef>,
    /// Reading positions processed by the sweep.
    pub vertices: usize,
    /// Relaxations attempted.
    pub edges: usize,
    pub elapsed_microseconds: u64,
    pub total_readings: usize,
}

impl WalkResult {
    pub fn values_as_strings(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|n| n.borrow().value().to_string())
            .collect()
    }

    pub fn readings_as_strings(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|n| n.borrow().reading().to_string())
            .collect()
    }

    /// Locate the node covering `cursor`.
    ///
    /// Returns the node's index and the reading position immediately past
    /// it. Cursor 0 maps to the first node; a cursor on the last node's
    /// readings, or right at the end of the composition, maps to the last
    /// node with `total_readings` as the past-node position.
    pub fn find_node_at(&self, cursor: usize) -> Option<(usize, usize)> {
        if self.nodes.is_empty() || cursor > self.total_readings {
            return None;
        }

        if cursor == 0 {
            return Some((0, self.nodes[0].borrow().spanning_length()));
        }

        // Covers both the cursor-at-end and cursor-on-last-reading cases;
        // the prefix-sum loop below never accumulates past the end, so the
        // end-of-composition cursor is only reachable here.
        if cursor >= self.total_readings - 1 {
            return Some((self.nodes.len() - 1, self.total_readings));
        }

        let mut accumulated = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            accumulated += node.borrow().spanning_length();
            if accumulated > cursor {
                return Some((i, accumulated));
            }
        }
        None
    }
}

impl ReadingGrid<'_> {
    /// Find the highest-scoring path covering all readings.
    ///
    /// The lattice is a DAG whose edges all point forward, so sweeping the
    /// positions in index order relaxes them in topological order and one
    /// pass suffices; with log-probability scores the longest path is the
    /// most likely segmentation. Runs in O(|V| + |E|), which keeps the walk
    /// cheap even for a large grid.
    ///
    /// Panics if a position is unreachable, which only happens when the
    /// language model claims a reading has unigrams but returns none.
    pub fn walk(&self) -> WalkResult {
        let mut result = WalkResult::default();
        if self.spans.is_empty() {
            return result;
        }

        let _span = debug_span!("walk", readings = self.readings.len()).entered();
        let start = Instant::now();

        let reading_len = self.readings.len();
        let mut viterbi: Vec<VertexState> = vec![VertexState::default(); reading_len + 1];
        viterbi[0].max_score = 0.0;

        for i in 0..reading_len {
            result.vertices += 1;

            let span = &self.spans[i];
            for span_len in 1..=span.max_length() {
                let Some(node) = span.node_of(span_len) else {
                    continue;
                };
                result.edges += 1;

                // Relax: take the path through this node when it beats the
                // best known score at the destination position.
                let score = viterbi[i].max_score + node.borrow().score();
                let target = &mut viterbi[i + span_len];
                if score > target.max_score {
                    target.max_score = score;
                    target.from_index = i;
                    target.from_node = Some(Rc::clone(node));
                }
            }
        }

        let mut total_reading_len = 0;
        let mut curr = reading_len;
        while curr > 0 {
            let state = &viterbi[curr];
            let node = state
                .from_node
                .clone()
                .expect("every position in the lattice is reachable");
            total_reading_len += node.borrow().spanning_length();
            result.nodes.push(node);
            curr = state.from_index;
        }
        result.nodes.reverse();
        debug_assert_eq!(total_reading_len, reading_len);
        result.total_readings = total_reading_len;

        result.elapsed_microseconds = start.elapsed().as_micros() as u64;
        debug!(
            vertices = result.vertices,
            edges = result.edges,
            elapsed_us = result.elapsed_microseconds
        );
        result
    }
}
