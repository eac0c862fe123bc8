//! Node identity and kind types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in the privilege graph.
///
/// The kernel owns no other node data. Identifiers are 64 bits wide;
/// deployments with a small identifier space may narrow them to 32 bits
/// through [`NodeId::as_u32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new NodeId.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the identifier as a u64.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Get the identifier narrowed to a u32 (high bits are discarded).
    pub const fn as_u32(&self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id as u64)
    }
}

/// A node or edge kind label (e.g. `User`, `Group`, `MemberOf`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Kind(String);

impl Kind {
    /// Create a new kind from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the kind label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Kind {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// An ordered, duplicate-free list of kinds.
///
/// Used both as the kind labels of a node and as a kind filter. Kind lists are
/// short (a handful of labels), so membership is a linear scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kinds(Vec<Kind>);

impl Kinds {
    /// Create an empty kind list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind, ignoring duplicates.
    pub fn add(&mut self, kind: Kind) {
        if !self.0.contains(&kind) {
            self.0.push(kind);
        }
    }

    /// Builder-style [`Kinds::add`].
    pub fn with(mut self, kind: impl Into<Kind>) -> Self {
        self.add(kind.into());
        self
    }

    /// Check whether a kind is present.
    pub fn contains(&self, kind: &Kind) -> bool {
        self.0.contains(kind)
    }

    /// Check whether any of `others` is present.
    pub fn contains_one_of(&self, others: &Kinds) -> bool {
        others.0.iter().any(|kind| self.contains(kind))
    }

    /// Check whether a node with these kinds passes `filter`.
    ///
    /// An empty filter accepts every node.
    pub fn matches_filter(&self, filter: &Kinds) -> bool {
        filter.is_empty() || self.contains_one_of(filter)
    }

    /// Number of kinds.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the kinds.
    pub fn iter(&self) -> impl Iterator<Item = &Kind> {
        self.0.iter()
    }
}

impl<K: Into<Kind>> FromIterator<K> for Kinds {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut kinds = Kinds::new();
        for kind in iter {
            kinds.add(kind.into());
        }
        kinds
    }
}

/// A node reference: identifier plus kind labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    /// Node identifier.
    pub id: NodeId,
    /// Kind labels of the node.
    pub kinds: Kinds,
}

impl Node {
    /// Create a new node.
    pub fn new(id: impl Into<NodeId>, kinds: Kinds) -> Self {
        Self {
            id: id.into(),
            kinds,
        }
    }
}
