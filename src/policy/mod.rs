//! Resolution and cross-product policy definitions.

pub mod resolution;
pub mod cross_product;

pub use resolution::{ResolutionPolicy, Propagation, LateInsertPolicy};
pub use cross_product::{CrossProductPolicy, AUTHENTICATED_USERS_SUFFIX, EVERYONE_SUFFIX};

/// Error type for policy parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    /// Unknown propagation strategy.
    #[error("Invalid propagation strategy: {0:?} (expected fixed_point or two_pass)")]
    InvalidPropagation(String),
    /// Unknown late insert policy.
    #[error("Invalid late insert policy: {0:?} (expected trust or invalidate)")]
    InvalidLateInsertPolicy(String),
}
