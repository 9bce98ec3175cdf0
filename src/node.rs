//! Node representation for the radix trie.
//!
//! Nodes live in a slab arena and refer to each other by index, so structural
//! edits (splitting an edge, merging a chain, pruning a leaf) rewire a single
//! parent-held slot instead of patching back-references. Each node stores its
//! incoming edge label, two registration flags, a pair of parallel arrays for
//! child selection, and the value slot for caller data.

use slab::Slab;
use smallvec::SmallVec;

/// Index of a node within the arena.
pub(crate) type NodeId = usize;

/// Arena of nodes. Slab keeps indices stable across insertions and removals.
pub(crate) type Arena = Slab<Node>;

/// Labels of at most this many bytes are stored inline in the node record;
/// longer labels spill to a separately owned heap buffer.
pub(crate) const LABEL_INLINE: usize = 16;

/// An edge label: the bytes consumed along a node's incoming edge, excluding
/// the discriminator byte recorded in the parent.
pub(crate) type Label = SmallVec<[u8; LABEL_INLINE]>;

/// Upper bound on the number of children of a single node. Discriminator
/// bytes are unique among siblings, so a node branches at most once per
/// distinct byte value.
pub(crate) const MAX_BRANCH: usize = 256;

/// One branch point / compressed path segment.
///
/// `keys` holds the discriminator bytes sorted ascending and `children` the
/// matching arena indices; the two arrays always have the same length and
/// grow in lockstep. Keeping the bytes in their own array makes child lookup
/// a binary search over a contiguous byte run.
#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) label: Label,
    /// The path from the root through this node is a registered key.
    pub(crate) is_word: bool,
    /// The key is a prefix wildcard. Implies `is_word`.
    pub(crate) is_wildcard: bool,
    keys: Vec<u8>,
    children: Vec<NodeId>,
    /// Value slot, allocated when the node first becomes a word.
    pub(crate) value: Option<Box<[u8]>>,
}

impl Node {
    /// Creates a node with the given label, no children and no registration.
    pub(crate) fn new(label: Label) -> Self {
        Node {
            label,
            is_word: false,
            is_wildcard: false,
            keys: Vec::new(),
            children: Vec::new(),
            value: None,
        }
    }

    pub(crate) fn child_count(&self) -> usize {
        self.keys.len()
    }

    /// Capacity of the children arrays (slots, not occupancy).
    pub(crate) fn child_capacity(&self) -> usize {
        self.keys.capacity()
    }

    pub(crate) fn key_at(&self, idx: usize) -> u8 {
        self.keys[idx]
    }

    pub(crate) fn child_at(&self, idx: usize) -> NodeId {
        self.children[idx]
    }

    /// Binary-searches the discriminator array for `key`.
    pub(crate) fn find_child(&self, key: u8) -> Option<(usize, NodeId)> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|idx| (idx, self.children[idx]))
    }

    /// Inserts a child keyed by the discriminator byte `key`, keeping the
    /// arrays sorted. The discriminator must not already be present.
    pub(crate) fn insert_child(&mut self, key: u8, child: NodeId) {
        debug_assert!(self.keys.len() < MAX_BRANCH);
        if self.keys.len() == self.keys.capacity() {
            // Double capacity, clamped to the branching bound.
            let target = (self.keys.capacity() * 2).clamp(1, MAX_BRANCH);
            self.keys.reserve_exact(target - self.keys.len());
            self.children.reserve_exact(target - self.children.len());
        }
        let idx = match self.keys.binary_search(&key) {
            Err(idx) => idx,
            Ok(_) => unreachable!("duplicate discriminator byte {key:#04x}"),
        };
        self.keys.insert(idx, key);
        self.children.insert(idx, child);
    }

    /// Removes the child at `idx`, shifting the remaining entries down, and
    /// returns its arena index.
    pub(crate) fn remove_child_at(&mut self, idx: usize) -> NodeId {
        self.keys.remove(idx);
        let child = self.children.remove(idx);
        if self.keys.capacity() > 4 && self.keys.len() * 4 <= self.keys.capacity() {
            let target = (self.keys.len() * 2).max(4);
            self.keys.shrink_to(target);
            self.children.shrink_to(target);
        }
        child
    }

    /// Replaces the child reference at `idx`, keeping its discriminator byte.
    pub(crate) fn replace_child_at(&mut self, idx: usize, child: NodeId) {
        self.children[idx] = child;
    }

    /// Registers this node as a word (and optionally a wildcard) and returns
    /// its value slot. Flags are monotonic and an existing slot is reused, so
    /// re-marking an already registered node is a no-op apart from the
    /// wildcard upgrade.
    pub(crate) fn mark_word(&mut self, wildcard: bool, value_size: usize) -> &mut [u8] {
        self.is_word = true;
        if wildcard {
            self.is_wildcard = true;
        }
        let slot = self
            .value
            .get_or_insert_with(|| vec![0u8; value_size].into_boxed_slice());
        &mut slot[..]
    }

    /// The value slot; empty for nodes that are not words.
    pub(crate) fn slot(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }

    /// Unregisters this node and releases its value slot.
    pub(crate) fn clear_word(&mut self) {
        self.is_word = false;
        self.is_wildcard = false;
        self.value = None;
    }
}
