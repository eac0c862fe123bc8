//! Cross-product policy: what counts as a group and which groups are universal.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::types::Kinds;
use crate::DEFAULT_CROSS_PRODUCT_POLICY_VERSION;

/// Object-id suffix of the "Authenticated Users" group.
pub const AUTHENTICATED_USERS_SUFFIX: &str = "-S-1-5-11";

/// Object-id suffix of the "Everyone" group.
pub const EVERYONE_SUFFIX: &str = "-S-1-1-0";

/// Cross-product policy version 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossProductPolicy {
    /// Policy version identifier.
    pub version: String,
    /// Kinds that make a first-degree node group-like (expanded through the
    /// group-membership aggregator).
    pub group_kinds: Kinds,
    /// Object-id suffixes that identify a domain's universal groups.
    pub universal_group_suffixes: Vec<String>,
}

impl CrossProductPolicy {
    /// Object ids of the universal groups for a domain.
    pub fn universal_object_ids(&self, domain: &str) -> Vec<String> {
        self.universal_group_suffixes
            .iter()
            .map(|suffix| format!("{domain}{suffix}"))
            .collect()
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Hash of the policy parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for CrossProductPolicy {
    fn default() -> Self {
        Self {
            version: DEFAULT_CROSS_PRODUCT_POLICY_VERSION.to_string(),
            group_kinds: Kinds::new().with("Group").with("LocalGroup"),
            universal_group_suffixes: vec![
                AUTHENTICATED_USERS_SUFFIX.to_string(),
                EVERYONE_SUFFIX.to_string(),
            ],
        }
    }
}
