//! Cardinality containers.
//!
//! The kernel programs against the [`Provider`] capability rather than a
//! concrete bitmap, so the identifier width and container representation can
//! be chosen per deployment:
//!
//! | Container | Identifier | Use |
//! |-----------|------------|-----|
//! | [`Bitmap32`] | `u32` | Graphs whose identifiers fit in 32 bits (compact, fastest) |
//! | [`Bitmap64`] | `u64` | Full 64-bit identifier space |
//! | `BTreeSet<T>` | any [`Id`] | Small sets and tests |

pub mod bitmap;

use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hash;

use crate::types::NodeId;

pub use bitmap::{Bitmap32, Bitmap64};

/// An unsigned identifier width usable as a container element.
pub trait Id: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Convert a graph node identifier into this width.
    fn from_node_id(id: NodeId) -> Self;

    /// Widen back into a graph node identifier.
    fn to_node_id(self) -> NodeId;
}

impl Id for u32 {
    fn from_node_id(id: NodeId) -> Self {
        id.as_u32()
    }

    fn to_node_id(self) -> NodeId {
        NodeId::from(self)
    }
}

impl Id for u64 {
    fn from_node_id(id: NodeId) -> Self {
        id.as_u64()
    }

    fn to_node_id(self) -> NodeId {
        NodeId::new(self)
    }
}

/// Integer-set capability used for impact sets and group expansions.
///
/// All mutating set operations are in place; the right-hand operand is
/// borrowed.
pub trait Provider<T: Id>: Clone + Default + fmt::Debug + Send + Sync {
    /// Insert one value. Returns whether it was newly added.
    fn insert(&mut self, value: T) -> bool;

    /// Remove one value. Returns whether it was present.
    fn remove(&mut self, value: T) -> bool;

    /// Union `other` into this set.
    fn or(&mut self, other: &Self);

    /// Intersect this set with `other`.
    fn and(&mut self, other: &Self);

    /// Symmetric difference with `other`.
    fn xor(&mut self, other: &Self);

    /// Membership test.
    fn contains(&self, value: T) -> bool;

    /// Number of members.
    fn cardinality(&self) -> u64;

    /// Visit members in ascending order until `delegate` returns `false`.
    fn each<F: FnMut(T) -> bool>(&self, delegate: F);

    /// Members in ascending order.
    fn slice(&self) -> Vec<T>;

    /// Remove every member.
    fn clear(&mut self);

    /// Insert every value in `values`.
    fn add(&mut self, values: &[T]) {
        for value in values {
            self.insert(*value);
        }
    }

    /// Whether the set has no members.
    fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Build a set from values.
    fn of(values: &[T]) -> Self {
        let mut provider = Self::default();
        provider.add(values);
        provider
    }
}

impl<T: Id> Provider<T> for BTreeSet<T> {
    fn insert(&mut self, value: T) -> bool {
        BTreeSet::insert(self, value)
    }

    fn remove(&mut self, value: T) -> bool {
        BTreeSet::remove(self, &value)
    }

    fn or(&mut self, other: &Self) {
        self.extend(other.iter().copied());
    }

    fn and(&mut self, other: &Self) {
        self.retain(|value| other.contains(value));
    }

    fn xor(&mut self, other: &Self) {
        for value in other {
            if !BTreeSet::remove(self, value) {
                BTreeSet::insert(self, *value);
            }
        }
    }

    fn contains(&self, value: T) -> bool {
        BTreeSet::contains(self, &value)
    }

    fn cardinality(&self) -> u64 {
        self.len() as u64
    }

    fn each<F: FnMut(T) -> bool>(&self, mut delegate: F) {
        for value in self.iter() {
            if !delegate(*value) {
                break;
            }
        }
    }

    fn slice(&self) -> Vec<T> {
        self.iter().copied().collect()
    }

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }
}
