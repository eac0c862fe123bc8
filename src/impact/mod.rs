//! Impact aggregation.
//!
//! An aggregator accumulates, across many walked paths, each node's set of
//! impact-worthy nodes below it, then resolves full transitive closures on
//! demand.
//!
//! ## Full paths and shortcuts
//!
//! The traversal driver classifies every walked path:
//!
//! - A **full path** encodes its whole downstream chain. Every node on it
//!   receives the impact-worthy nodes strictly below it.
//! - A **shortcut** ends at a node whose subtree was already explored from
//!   elsewhere. Ancestors receive what is below them on this walk, plus a
//!   *dependency* on the terminal's own eventual impact set.
//!
//! ## Resolution
//!
//! ```text
//! add_path / add_shortcut  →  impact sets + dependency sets
//!                                   ↓
//! cardinality(ids)  →  resolve (explicit-stack DFS over dependencies)
//!                                   ↓
//!                      completion propagation → resolved (cached)
//! ```
//!
//! All inserts must precede the first query unless the aggregator runs with
//! [`LateInsertPolicy::Invalidate`](crate::policy::LateInsertPolicy).

pub mod aggregator;
pub mod thread_safe;
pub mod snapshot;

use crate::cardinality::{Id, Provider};
use crate::types::{Kinds, PathSegment};

pub use aggregator::Aggregator;
pub use thread_safe::ThreadSafeAggregator;
pub use snapshot::{ImpactSnapshot, ImpactEntry};

/// Aggregator over 32-bit identifiers backed by roaring bitmaps.
pub type Aggregator32 = Aggregator<u32, crate::cardinality::Bitmap32>;

/// Aggregator over 64-bit identifiers backed by roaring treemaps.
pub type Aggregator64 = Aggregator<u64, crate::cardinality::Bitmap64>;

/// Cardinality aggregator for full and shortcut paths.
pub trait PathAggregator {
    /// Identifier width.
    type Id: Id;
    /// Container type for impact sets.
    type Provider: Provider<Self::Id>;

    /// Record a fully walked path ending at `path`.
    ///
    /// Only nodes whose kinds pass `impact_kinds` are counted as impact; an
    /// empty filter counts every node.
    fn add_path(&mut self, path: &PathSegment, impact_kinds: &Kinds);

    /// Record a truncated path whose terminal was explored from elsewhere.
    fn add_shortcut(&mut self, path: &PathSegment, impact_kinds: &Kinds);

    /// Union of the resolved impact sets of `targets`.
    fn cardinality(&mut self, targets: &[Self::Id]) -> Self::Provider;

    /// Whether an impact set exists for `target`.
    fn contains(&self, target: Self::Id) -> bool;
}
