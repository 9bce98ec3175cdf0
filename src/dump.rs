//! Human-readable rendering of the node graph, for debugging only.

use std::fmt::{self, Write};

use crate::node::{Node, NodeId};
use crate::trie::Trie;

impl Trie {
    /// Renders the node graph as indented text, one edge per line.
    ///
    /// Each line shows the discriminator byte, the edge label, the child
    /// array occupancy/capacity, and flag letters: `W` word, `*` wildcard,
    /// `E` label embedded inline. The format is a debugging aid, not a
    /// stable contract.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let root = self.root();
        let n = self.node(root);
        let _ = writeln!(
            out,
            "root \"{}\" children={}/{} <{}>",
            n.label.escape_ascii(),
            n.child_count(),
            n.child_capacity(),
            flags(n),
        );
        self.dump_node(&mut out, root, 1);
        out
    }

    fn dump_node(&self, out: &mut String, id: NodeId, level: usize) {
        let n = self.node(id);
        for idx in 0..n.child_count() {
            let child_id = n.child_at(idx);
            let child = self.node(child_id);
            for _ in 0..level {
                out.push_str("    ");
            }
            let _ = writeln!(
                out,
                "[{}]->\"{}\" children={}/{} <{}>",
                n.key_at(idx).escape_ascii(),
                child.label.escape_ascii(),
                child.child_count(),
                child.child_capacity(),
                flags(child),
            );
            self.dump_node(out, child_id, level + 1);
        }
    }
}

fn flags(n: &Node) -> String {
    let mut s = String::new();
    if n.is_word {
        s.push('W');
    }
    if n.is_wildcard {
        s.push('*');
    }
    if !n.label.spilled() {
        s.push('E');
    }
    s
}

impl fmt::Debug for Trie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trie")
            .field("len", &self.len())
            .field("value_size", &self.value_size())
            .finish_non_exhaustive()
    }
}
