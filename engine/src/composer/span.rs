use super::node::NodeRef;

/// Maximum number of readings a single node may cover.
///
/// This is a contract, not a tuning knob: it sizes the per-position slot
/// array and bounds both the refresh window and the invalidation window
/// after an edit.
pub const MAX_SPAN_LENGTH: usize = 10;

/// The nodes that begin at one reading position, one slot per spanning
/// length.
#[derive(Debug, Clone, Default)]
pub struct Span {
    nodes: [Option<NodeRef>; MAX_SPAN_LENGTH],
    max_length: usize,
}

impl Span {
    pub fn new() -> Self {
        Self::default()
    }

    /// Largest occupied spanning length, 0 when the span is empty.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Store `node` in the slot for its spanning length, replacing any prior
    /// occupant.
    pub fn add(&mut self, node: NodeRef) {
        let length = node.borrow().spanning_length();
        assert!(
            (1..=MAX_SPAN_LENGTH).contains(&length),
            "spanning length {length} out of range"
        );
        self.nodes[length - 1] = Some(node);
        if length > self.max_length {
            self.max_length = length;
        }
    }

    /// The node of exactly `length`, if any. `length` must be in
    /// `1..=MAX_SPAN_LENGTH`.
    pub fn node_of(&self, length: usize) -> Option<&NodeRef> {
        assert!(
            (1..=MAX_SPAN_LENGTH).contains(&length),
            "spanning length {length} out of range"
        );
        self.nodes[length - 1].as_ref()
    }

    /// Drop every node of `length` or longer and recompute `max_length`
    /// from the surviving slots.
    pub fn remove_nodes_of_or_longer_than(&mut self, length: usize) {
        assert!(
            (1..=MAX_SPAN_LENGTH).contains(&length),
            "spanning length {length} out of range"
        );
        for slot in &mut self.nodes[length - 1..] {
            *slot = None;
        }
        self.max_length = self.nodes[..length - 1]
            .iter()
            .rposition(|slot| slot.is_some())
            .map_or(0, |i| i + 1);
    }

    pub fn clear(&mut self) {
        self.nodes = Default::default();
        self.max_length = 0;
    }
}
