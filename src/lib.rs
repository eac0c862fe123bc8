//! # impact-kernel
//!
//! Transitive impact aggregation over directory privilege graphs.
//!
//! The kernel answers two questions for attack-path analysis:
//!
//! > Which impact-worthy nodes are reachable below a given node?
//!
//! > Which principals satisfy *every* precondition of a compound privilege?
//!
//! ## Core Contract
//!
//! 1. A traversal driver feeds walked paths (full or shortcut) into an
//!    [`Aggregator`](impact::Aggregator)
//! 2. `cardinality(ids)` resolves complete transitive impact sets on demand,
//!    without recursion, through cycles
//! 3. The [`CrossProductCalculator`] intersects first-degree principal sets
//!    through group membership, ignoring sets that reach a universal group
//!
//! ## Architecture
//!
//! ```text
//! Traversal → PathSegment → add_path / add_shortcut → Aggregator
//!                                                        ↓
//!                    cardinality(ids) → resolve → Provider (roaring bitmap)
//!                                                        ↓
//!                    CrossProductCalculator ← UniversalGroupLookup
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same paths in any order, inserted before the first query → identical
//!   impact sets
//! - Repeated queries without intervening inserts → identical results
//! - Snapshots are ordered by node and fingerprinted with xxh64

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod cardinality;
pub mod policy;
pub mod impact;
pub mod cross_product;
pub mod canonical;
pub mod telemetry;

// Re-exports
pub use types::{NodeId, Kind, Kinds, Node, PathSegment, WalkReverse};
pub use cardinality::{Id, Provider, Bitmap32, Bitmap64};
pub use policy::{
    ResolutionPolicy, Propagation, LateInsertPolicy, CrossProductPolicy, PolicyError,
    AUTHENTICATED_USERS_SUFFIX, EVERYONE_SUFFIX,
};
pub use impact::{
    PathAggregator, Aggregator, Aggregator32, Aggregator64, ThreadSafeAggregator,
    ImpactSnapshot, ImpactEntry,
};
pub use cross_product::{
    CrossProductCalculator, UniversalGroupLookup, InMemoryUniversalGroups, LookupError,
    has_universal_member,
};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};
pub use telemetry::init_tracing;

/// Schema version for exported snapshots.
/// Increment on breaking changes to any serialized type.
pub const IMPACT_KERNEL_SCHEMA_VERSION: &str = "1.0.0";

/// Default resolution policy version identifier.
pub const DEFAULT_RESOLUTION_POLICY_VERSION: &str = "resolution_policy_v1";

/// Default cross-product policy version identifier.
pub const DEFAULT_CROSS_PRODUCT_POLICY_VERSION: &str = "cross_product_policy_v1";
