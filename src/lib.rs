//! # radix_compact
//!
//! A compact mutable radix trie keyed by arbitrary byte sequences.
//!
//! This crate provides a compressed prefix tree (also known as a radix tree or
//! patricia trie) that keeps itself compact under mutation: chains of
//! single-child, non-terminal nodes are collapsed into multi-byte edge labels,
//! and removal re-merges whatever a deletion leaves degenerate.
//!
//! ## Features
//!
//! - **O(key length) operations**: lookup, insertion and removal each walk a
//!   single root-to-node path, selecting children by binary search over
//!   sorted discriminator bytes
//! - **Prefix wildcards**: a key registered as a wildcard answers lookups for
//!   every key it prefixes, unless a deeper registered key or wildcard wins
//! - **Per-key value slots**: each registered key owns a fixed-size byte slot
//!   sized at construction, handed back on insertion and lookup
//! - **Ordered iteration**: a streaming iterator yields keys in
//!   byte-lexicographic order from one reusable key buffer
//!
//! ## Example
//!
//! ```rust
//! use radix_compact::Trie;
//!
//! // Reserve a 2-byte value slot per key
//! let mut trie = Trie::new(2);
//!
//! trie.insert(b"romane").copy_from_slice(b"r1");
//! trie.insert(b"romanus").copy_from_slice(b"r2");
//! trie.insert_wildcard(b"rub").copy_from_slice(b"w*");
//!
//! assert_eq!(trie.find(b"romane"), Some(&b"r1"[..]));
//! // No exact entry, but the "rub" wildcard prefixes it
//! assert_eq!(trie.find(b"rubicon"), Some(&b"w*"[..]));
//! assert_eq!(trie.find(b"roman"), None);
//! ```

mod dump;
mod iter;
mod node;
mod trie;
mod util;

// Re-export public types
pub use crate::iter::Iter;
pub use crate::trie::Trie;

/// Errors that can occur in trie operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The key is not registered in the trie.
    #[error("key not found")]
    KeyNotFound,
}
