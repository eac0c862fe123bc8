//! Universal group lookup.
//!
//! Every domain carries groups that implicitly contain everyone in scope
//! ("Authenticated Users", "Everyone"). A set whose expansion reaches one of
//! them cannot discriminate principals, so the calculator needs to know their
//! identifiers. Where they live is the host's business; the calculator only
//! sees [`UniversalGroupLookup`].

use std::collections::{HashMap, HashSet};

use crate::cardinality::{Id, Provider};
use crate::policy::CrossProductPolicy;
use crate::types::NodeId;

/// Error type for universal group lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The domain is unknown to the backend.
    #[error("Domain not found: {0}")]
    DomainNotFound(String),
    /// The domain is known but none of its universal groups are.
    #[error("No universal groups found for domain: {0}")]
    GroupNotFound(String),
    /// The backend failed.
    #[error("Lookup backend error: {0}")]
    Backend(String),
}

/// Resolves a domain's universal groups to node identifiers.
pub trait UniversalGroupLookup {
    /// Identifiers of the universal groups of `domain`.
    fn universal_groups(
        &self,
        domain: &str,
        policy: &CrossProductPolicy,
    ) -> Result<Vec<NodeId>, LookupError>;
}

/// In-memory lookup keyed by object id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUniversalGroups {
    by_object_id: HashMap<String, NodeId>,
    domains: HashSet<String>,
}

impl InMemoryUniversalGroups {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a domain.
    pub fn add_domain(&mut self, domain: impl Into<String>) {
        self.domains.insert(domain.into());
    }

    /// Register a group by object id, e.g. `CONTOSO.LOCAL-S-1-1-0`.
    pub fn insert(&mut self, object_id: impl Into<String>, id: impl Into<NodeId>) {
        self.by_object_id.insert(object_id.into(), id.into());
    }

    /// Register a domain and its universal groups under the policy's suffixes.
    ///
    /// `ids` pairs with `policy.universal_group_suffixes` in order; extra ids
    /// are ignored.
    pub fn with_domain(
        mut self,
        domain: &str,
        policy: &CrossProductPolicy,
        ids: &[NodeId],
    ) -> Self {
        self.add_domain(domain);
        for (object_id, id) in policy.universal_object_ids(domain).into_iter().zip(ids) {
            self.insert(object_id, *id);
        }
        self
    }
}

impl UniversalGroupLookup for InMemoryUniversalGroups {
    fn universal_groups(
        &self,
        domain: &str,
        policy: &CrossProductPolicy,
    ) -> Result<Vec<NodeId>, LookupError> {
        if !self.domains.contains(domain) {
            return Err(LookupError::DomainNotFound(domain.to_string()));
        }

        let found: Vec<NodeId> = policy
            .universal_object_ids(domain)
            .iter()
            .filter_map(|object_id| self.by_object_id.get(object_id).copied())
            .collect();

        if found.is_empty() {
            return Err(LookupError::GroupNotFound(domain.to_string()));
        }
        Ok(found)
    }
}

/// Whether any of `universal` is a member of `members`.
pub fn has_universal_member<T: Id, P: Provider<T>>(members: &P, universal: &[T]) -> bool {
    universal.iter().any(|id| members.contains(*id))
}
