//! Serializable export of resolved impact sets.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::policy::ResolutionPolicy;
use crate::types::NodeId;
use crate::IMPACT_KERNEL_SCHEMA_VERSION;

/// One resolved node and its impact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactEntry {
    /// Resolved node.
    pub node: NodeId,
    /// Impact-worthy nodes reachable below it, ascending.
    pub impact: Vec<NodeId>,
}

impl ImpactEntry {
    /// Create a new entry.
    pub fn new(node: NodeId, impact: Vec<NodeId>) -> Self {
        Self { node, impact }
    }
}

/// Resolved impact sets of an aggregator, with a content fingerprint.
///
/// Two aggregators fed the same paths and queried for the same nodes produce
/// identical fingerprints regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSnapshot {
    /// Schema version.
    pub schema_version: String,
    /// Resolution policy identifier.
    pub policy_id: String,
    /// Resolution policy parameter hash.
    pub params_hash: String,
    /// Entries ordered by node.
    pub entries: Vec<ImpactEntry>,
    /// xxh64 of the canonical entries.
    pub fingerprint: String,
}

impl ImpactSnapshot {
    /// Build a snapshot, ordering entries by node.
    pub fn new(policy: &ResolutionPolicy, mut entries: Vec<ImpactEntry>) -> Self {
        entries.sort_by_key(|entry| entry.node);
        let fingerprint = canonical_hash_hex(&entries);

        Self {
            schema_version: IMPACT_KERNEL_SCHEMA_VERSION.to_string(),
            policy_id: policy.policy_id().to_string(),
            params_hash: policy.params_hash(),
            entries,
            fingerprint,
        }
    }

    /// Impact of a node, if it was resolved.
    pub fn get(&self, node: NodeId) -> Option<&[NodeId]> {
        self.entries
            .binary_search_by_key(&node, |entry| entry.node)
            .ok()
            .map(|index| self.entries[index].impact.as_slice())
    }

    /// Number of resolved nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
