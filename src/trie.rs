//! The main trie implementation.
//!
//! This module contains the `Trie` type, which provides the primary API for
//! working with the radix tree: registration, lookup, removal and iteration.

use crate::iter::Iter;
use crate::node::{Arena, Label, Node, NodeId};
use crate::util::common_prefix_len;
use crate::Error;

/// A compact mutable radix trie keyed by byte sequences.
///
/// Keys sharing prefixes share paths, and maximal chains of single-child,
/// non-terminal nodes are collapsed into one multi-byte edge label. Every key
/// may carry caller data in a value slot of the size configured at
/// construction, and may be registered as a *prefix wildcard*: a lookup that
/// runs past the wildcard without a more specific match resolves to it.
///
/// All nodes live in an arena owned by this handle; dropping the trie
/// releases the whole graph.
pub struct Trie {
    nodes: Arena,
    /// Sentinel node whose single child is the true root, so the root can be
    /// rewired like any other child.
    sentinel: NodeId,
    value_size: usize,
    len: usize,
}

impl Trie {
    /// Creates a new, empty trie reserving `value_size` bytes of caller data
    /// per registered key.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let trie = Trie::new(8);
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.value_size(), 8);
    /// ```
    pub fn new(value_size: usize) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.insert(Node::new(Label::new()));
        let mut sentinel = Node::new(Label::new());
        sentinel.insert_child(0, root);
        let sentinel = nodes.insert(sentinel);
        Trie {
            nodes,
            sentinel,
            value_size,
            len: 0,
        }
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no key is registered.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the configured value-slot size in bytes.
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Removes every key, keeping the handle and its configuration.
    pub fn clear(&mut self) {
        self.nodes.clear();
        let root = self.nodes.insert(Node::new(Label::new()));
        let mut sentinel = Node::new(Label::new());
        sentinel.insert_child(0, root);
        self.sentinel = self.nodes.insert(sentinel);
        self.len = 0;
    }

    pub(crate) fn root(&self) -> NodeId {
        self.nodes[self.sentinel].child_at(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registers `key` and returns its value slot.
    ///
    /// Idempotent: re-inserting a registered key creates no node and returns
    /// the slot handed out by the original insertion, contents intact. The
    /// empty key is valid and registers the root path.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let mut trie = Trie::new(2);
    /// trie.insert(b"hello").copy_from_slice(b"hi");
    ///
    /// assert_eq!(trie.find(b"hello"), Some(&b"hi"[..]));
    /// assert_eq!(trie.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &[u8]) -> &mut [u8] {
        self.insert_impl(key, false)
    }

    /// Registers `key` as a prefix wildcard and returns its value slot.
    ///
    /// Any probe that `key` is a prefix of resolves to this entry unless a
    /// deeper registered key or wildcard matches first. On an already
    /// registered key this upgrades the entry; the wildcard flag is never
    /// cleared by a later plain [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let mut trie = Trie::new(0);
    /// trie.insert_wildcard(b"img/");
    ///
    /// assert!(trie.contains(b"img/logo.png"));
    /// assert!(!trie.contains(b"im"));
    /// ```
    pub fn insert_wildcard(&mut self, key: &[u8]) -> &mut [u8] {
        self.insert_impl(key, true)
    }

    fn insert_impl(&mut self, key: &[u8], wildcard: bool) -> &mut [u8] {
        let mut parent = self.sentinel;
        let mut parent_idx = 0;
        let mut node = self.root();
        let mut key = key;

        // Descend along the longest registered prefix of `key`.
        loop {
            let n = &self.nodes[node];
            let matched = common_prefix_len(key, &n.label);
            if matched < n.label.len() {
                // Diverged inside this node's label: split the edge there.
                node = self.split(parent, parent_idx, node, matched);
                key = &key[matched..];
                break;
            }
            key = &key[matched..];
            if key.is_empty() {
                break;
            }
            match self.nodes[node].find_child(key[0]) {
                Some((idx, child)) => {
                    parent = node;
                    parent_idx = idx;
                    node = child;
                    key = &key[1..];
                }
                None => break,
            }
        }

        if !key.is_empty() {
            // Unmatched trailing bytes: prolong the path with one leaf. The
            // first byte becomes the discriminator, the rest the label.
            let leaf = self.nodes.insert(Node::new(Label::from_slice(&key[1..])));
            self.nodes[node].insert_child(key[0], leaf);
            node = leaf;
        }

        if !self.nodes[node].is_word {
            self.len += 1;
        }
        let value_size = self.value_size;
        self.nodes[node].mark_word(wildcard, value_size)
    }

    /// Splits `node`'s label at `at`: a new intermediate node takes over the
    /// first `at` label bytes and `node` keeps the remainder past the
    /// diverging byte, becoming the intermediate's sole child. Returns the
    /// intermediate, which now sits in `node`'s former slot under `parent`.
    fn split(&mut self, parent: NodeId, parent_idx: usize, node: NodeId, at: usize) -> NodeId {
        let (prefix, diverge) = {
            let n = &mut self.nodes[node];
            let prefix = Label::from_slice(&n.label[..at]);
            let diverge = n.label[at];
            let rest = Label::from_slice(&n.label[at + 1..]);
            n.label = rest;
            (prefix, diverge)
        };
        let mut mid = Node::new(prefix);
        mid.insert_child(diverge, node);
        let mid = self.nodes.insert(mid);
        self.nodes[parent].replace_child_at(parent_idx, mid);
        mid
    }

    /// Finds the most specific match for `key`: the exact entry if one is
    /// registered, otherwise the deepest wildcard passed on the way down.
    fn locate(&self, key: &[u8]) -> Option<NodeId> {
        let mut wildcard = None;
        let mut node = self.root();
        let mut key = key;
        loop {
            let n = &self.nodes[node];
            let matched = common_prefix_len(key, &n.label);
            if matched < n.label.len() {
                // Label mismatch (or probe exhausted mid-label).
                break;
            }
            key = &key[matched..];
            if key.is_empty() {
                if n.is_word {
                    return Some(node);
                }
                break;
            }
            if n.is_wildcard {
                // Deeper wildcards overwrite shallower ones.
                wildcard = Some(node);
            }
            match n.find_child(key[0]) {
                Some((_, child)) => {
                    node = child;
                    key = &key[1..];
                }
                None => break,
            }
        }
        wildcard
    }

    /// Returns the value slot for the most specific match of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let mut trie = Trie::new(1);
    /// trie.insert(b"key")[0] = 7;
    ///
    /// assert_eq!(trie.find(b"key"), Some(&[7u8][..]));
    /// assert_eq!(trie.find(b"ke"), None);
    /// ```
    pub fn find(&self, key: &[u8]) -> Option<&[u8]> {
        self.locate(key).and_then(|id| self.nodes[id].value.as_deref())
    }

    /// Mutable variant of [`find`](Self::find).
    pub fn find_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        let id = self.locate(key)?;
        self.nodes[id].value.as_deref_mut()
    }

    /// Returns `true` if `key` resolves to a registered entry, exactly or
    /// through a prefix wildcard.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let mut trie = Trie::new(0);
    /// trie.insert(b"car");
    ///
    /// assert!(trie.contains(b"car"));
    /// assert!(!trie.contains(b"ca"));
    /// ```
    pub fn contains(&self, key: &[u8]) -> bool {
        self.locate(key).is_some()
    }

    /// Finds the node registered exactly for `key` together with its parent
    /// and grandparent slots. Wildcards do not apply here.
    fn locate_exact(&self, key: &[u8]) -> Option<ExactMatch> {
        let mut grandparent = None;
        let mut parent = self.sentinel;
        let mut parent_idx = 0;
        let mut node = self.root();
        let mut key = key;
        loop {
            let n = &self.nodes[node];
            let matched = common_prefix_len(key, &n.label);
            if matched < n.label.len() {
                return None;
            }
            key = &key[matched..];
            if key.is_empty() {
                return n.is_word.then_some(ExactMatch {
                    node,
                    parent,
                    parent_idx,
                    grandparent,
                });
            }
            let (idx, child) = n.find_child(key[0])?;
            grandparent = Some((parent, parent_idx));
            parent = node;
            parent_idx = idx;
            node = child;
            key = &key[1..];
        }
    }

    /// Unregisters `key`.
    ///
    /// Only exact entries are removed; a probe that merely resolves through a
    /// wildcard reports [`Error::KeyNotFound`] and leaves the wildcard alone.
    /// Removal restores compaction: a node left with a single child and no
    /// registration is merged into that child, and pruning a leaf may trigger
    /// the same merge once on its parent.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::{Error, Trie};
    ///
    /// let mut trie = Trie::new(0);
    /// trie.insert(b"hello");
    ///
    /// assert_eq!(trie.remove(b"hello"), Ok(()));
    /// assert_eq!(trie.remove(b"hello"), Err(Error::KeyNotFound));
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> Result<(), Error> {
        let m = self.locate_exact(key).ok_or(Error::KeyNotFound)?;
        self.nodes[m.node].clear_word();
        self.len -= 1;

        match self.nodes[m.node].child_count() {
            // Still a branch point; clearing the flags was enough.
            2.. => {}
            // Single child: collapse the node into it.
            1 => self.cut(m.node, m.parent, m.parent_idx),
            0 => {
                // A leaf. The true root stays put even when bare, so an
                // emptied trie keeps its two-node skeleton.
                if m.node == self.root() {
                    return Ok(());
                }
                self.nodes[m.parent].remove_child_at(m.parent_idx);
                self.nodes.remove(m.node);

                // Pruning may leave the parent a non-word chain link; merge
                // it in turn. One level suffices: the merge removes the very
                // condition that triggered it.
                if let Some((gp, gp_idx)) = m.grandparent {
                    let p = &self.nodes[m.parent];
                    if gp != self.sentinel && p.child_count() == 1 && !p.is_word {
                        self.cut(m.parent, gp, gp_idx);
                    }
                }
            }
        }
        Ok(())
    }

    /// Collapses `node` (no registration, exactly one child) into that child:
    /// the child's label becomes `label ++ discriminator ++ child label` and
    /// the child takes `node`'s slot under `parent`.
    fn cut(&mut self, node: NodeId, parent: NodeId, parent_idx: usize) {
        let removed = self.nodes.remove(node);
        debug_assert!(!removed.is_word);
        debug_assert_eq!(removed.child_count(), 1);

        let child = removed.child_at(0);
        let disc = removed.key_at(0);
        let mut label = removed.label;
        label.push(disc);
        let c = &mut self.nodes[child];
        label.extend_from_slice(&c.label);
        c.label = label;
        self.nodes[parent].replace_child_at(parent_idx, child);
    }

    /// Returns a streaming iterator over `(key, value slot)` pairs in
    /// byte-lexicographic key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_compact::Trie;
    ///
    /// let mut trie = Trie::new(0);
    /// trie.insert(b"cat");
    /// trie.insert(b"car");
    ///
    /// let mut iter = trie.iter();
    /// assert_eq!(iter.next().map(|(k, _)| k.to_vec()), Some(b"car".to_vec()));
    /// assert_eq!(iter.next().map(|(k, _)| k.to_vec()), Some(b"cat".to_vec()));
    /// assert!(iter.next().is_none());
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Collects every registered key in byte-lexicographic order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        let mut keys = Vec::with_capacity(self.len);
        let mut iter = self.iter();
        while let Some((key, _)) = iter.next() {
            keys.push(key.to_vec());
        }
        keys
    }
}

impl Default for Trie {
    /// An empty trie with no value slots (`value_size` 0).
    fn default() -> Self {
        Self::new(0)
    }
}

/// An exact-match node and the two ancestor slots above it. Nodes carry no
/// parent references, so removal re-derives both on the way down: merging
/// after a leaf prune rewires the grandparent's child slot.
struct ExactMatch {
    node: NodeId,
    parent: NodeId,
    parent_idx: usize,
    grandparent: Option<(NodeId, usize)>,
}

#[cfg(test)]
impl Trie {
    /// Walks the node graph and panics on any structural-invariant violation:
    /// unsorted or duplicated discriminators, chain nodes that should have
    /// been merged, registration flags out of sync with value slots, or
    /// arena entries unreachable from the root.
    pub(crate) fn assert_invariants(&self) {
        fn walk(trie: &Trie, id: NodeId, is_root: bool, seen: &mut usize) {
            *seen += 1;
            let n = trie.node(id);
            if n.is_wildcard {
                assert!(n.is_word, "wildcard flag without word flag");
            }
            assert_eq!(
                n.is_word,
                n.value.is_some(),
                "value slot out of sync with word flag"
            );
            if !is_root && !n.is_word {
                assert!(
                    n.child_count() >= 2,
                    "unmerged chain node with {} child(ren)",
                    n.child_count()
                );
            }
            for idx in 0..n.child_count() {
                if idx > 0 {
                    assert!(
                        n.key_at(idx - 1) < n.key_at(idx),
                        "discriminators out of order"
                    );
                }
                walk(trie, n.child_at(idx), false, seen);
            }
        }

        let mut seen = 1; // the sentinel
        walk(self, self.root(), true, &mut seen);
        assert_eq!(seen, self.node_count(), "arena holds unreachable nodes");
    }
}
