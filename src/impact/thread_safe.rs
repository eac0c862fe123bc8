//! Mutex-guarded aggregator facade.
//!
//! Every call, including `cardinality`, takes the same exclusive lock:
//! resolution mutates dependency and resolved state, so a reader/writer split
//! buys nothing.

use std::sync::Arc;
use parking_lot::Mutex;

use crate::types::{Kinds, PathSegment};

use super::PathAggregator;

/// Shared, serialized handle to an aggregator.
///
/// Clones share the same underlying aggregator.
///
/// # Example
///
/// ```rust
/// use std::thread;
/// use impact_kernel::{Aggregator64, ThreadSafeAggregator, PathSegment, Node, Kinds};
///
/// let kinds = Kinds::new().with("User");
/// let shared = ThreadSafeAggregator::new(Aggregator64::new());
///
/// let handles: Vec<_> = (0..4u64)
///     .map(|worker| {
///         let shared = shared.clone();
///         let kinds = kinds.clone();
///         thread::spawn(move || {
///             let path = PathSegment::chain([
///                 Node::new(100u64, kinds.clone()),
///                 Node::new(worker, kinds.clone()),
///             ]).unwrap();
///             shared.add_path(&path, &kinds);
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(shared.cardinality(&[100]).len(), 4);
/// ```
#[derive(Debug)]
pub struct ThreadSafeAggregator<A> {
    inner: Arc<Mutex<A>>,
}

impl<A> Clone for ThreadSafeAggregator<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: PathAggregator> ThreadSafeAggregator<A> {
    /// Wrap an aggregator.
    pub fn new(aggregator: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(aggregator)),
        }
    }

    /// Record a full path.
    pub fn add_path(&self, path: &PathSegment, impact_kinds: &Kinds) {
        self.inner.lock().add_path(path, impact_kinds);
    }

    /// Record a shortcut path.
    pub fn add_shortcut(&self, path: &PathSegment, impact_kinds: &Kinds) {
        self.inner.lock().add_shortcut(path, impact_kinds);
    }

    /// Union of the resolved impact sets of `targets`.
    pub fn cardinality(&self, targets: &[A::Id]) -> A::Provider {
        self.inner.lock().cardinality(targets)
    }

    /// Whether an impact set exists for `target`.
    pub fn contains(&self, target: A::Id) -> bool {
        self.inner.lock().contains(target)
    }

    /// Run `f` with exclusive access to the wrapped aggregator.
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Unwrap the aggregator if this is the last handle.
    pub fn try_into_inner(self) -> Result<A, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<A: PathAggregator> PathAggregator for ThreadSafeAggregator<A> {
    type Id = A::Id;
    type Provider = A::Provider;

    fn add_path(&mut self, path: &PathSegment, impact_kinds: &Kinds) {
        self.inner.lock().add_path(path, impact_kinds);
    }

    fn add_shortcut(&mut self, path: &PathSegment, impact_kinds: &Kinds) {
        self.inner.lock().add_shortcut(path, impact_kinds);
    }

    fn cardinality(&mut self, targets: &[A::Id]) -> A::Provider {
        self.inner.lock().cardinality(targets)
    }

    fn contains(&self, target: A::Id) -> bool {
        self.inner.lock().contains(target)
    }
}
