//! Single-threaded impact aggregator.

use std::collections::HashMap;
use std::time::Instant;

use crate::cardinality::{Id, Provider};
use crate::policy::{LateInsertPolicy, ResolutionPolicy};
use crate::types::{Kinds, PathSegment};

use super::snapshot::{ImpactEntry, ImpactSnapshot};
use super::PathAggregator;

/// Cursor tracking the resolution of one node within a single `resolve` call.
#[derive(Debug)]
struct Resolution<T> {
    /// Node being resolved.
    target: T,
    /// Nodes whose impact sets receive this node's impact once settled.
    completions: Vec<T>,
    /// Dependencies not yet visited.
    dependencies: Vec<T>,
}

/// Cardinality aggregator for paths and shortcut paths.
///
/// Owns three collections:
///
/// - `impacts`: per-node impact set, created lazily, only ever grown
/// - `dependencies`: per-node set of shortcut terminals whose impact must be
///   merged in; consumed at resolution
/// - `resolved`: nodes whose impact set is known complete
///
/// Not internally synchronized; wrap in
/// [`ThreadSafeAggregator`](super::ThreadSafeAggregator) to share across
/// threads.
///
/// # Example
///
/// ```rust
/// use impact_kernel::{Aggregator64, PathAggregator, PathSegment, Node, Kinds};
///
/// let user = Kinds::new().with("User");
/// let mut aggregator = Aggregator64::new();
///
/// let path = PathSegment::chain([
///     Node::new(1u64, user.clone()),
///     Node::new(2u64, user.clone()),
/// ]).unwrap();
/// aggregator.add_path(&path, &user);
///
/// assert_eq!(aggregator.cardinality(&[1]).iter().collect::<Vec<_>>(), vec![2]);
/// ```
#[derive(Debug, Clone)]
pub struct Aggregator<T: Id, P: Provider<T>> {
    impacts: HashMap<T, P>,
    dependencies: HashMap<T, P>,
    resolved: P,
    policy: ResolutionPolicy,
    warned_late_insert: bool,
}

impl<T: Id, P: Provider<T>> Aggregator<T, P> {
    /// Create an aggregator with the default resolution policy.
    pub fn new() -> Self {
        Self::with_policy(ResolutionPolicy::default())
    }

    /// Create an aggregator with an explicit resolution policy.
    pub fn with_policy(policy: ResolutionPolicy) -> Self {
        Self {
            impacts: HashMap::new(),
            dependencies: HashMap::new(),
            resolved: P::default(),
            policy,
            warned_late_insert: false,
        }
    }

    /// The resolution policy in effect.
    pub fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    /// Nodes whose impact set is known complete.
    pub fn resolved(&self) -> &P {
        &self.resolved
    }

    /// Number of nodes with an impact set.
    pub fn len(&self) -> usize {
        self.impacts.len()
    }

    /// Whether no impact set has been created.
    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    /// Export every resolved impact set.
    pub fn snapshot(&self) -> ImpactSnapshot {
        let mut entries = Vec::with_capacity(self.resolved.cardinality() as usize);
        self.resolved.each(|target| {
            if let Some(impact) = self.impacts.get(&target) {
                entries.push(ImpactEntry::new(
                    target.to_node_id(),
                    impact.slice().into_iter().map(Id::to_node_id).collect(),
                ));
            }
            true
        });
        ImpactSnapshot::new(&self.policy, entries)
    }

    fn impact_mut(&mut self, target: T) -> &mut P {
        self.impacts.entry(target).or_default()
    }

    fn push_dependency(&mut self, target: T, dependency: T) {
        self.dependencies.entry(target).or_default().insert(dependency);
    }

    /// Dependencies of `target` in ascending order.
    ///
    /// Under [`LateInsertPolicy::Trust`] the dependency set is consumed; under
    /// `Invalidate` it is kept for later re-resolution.
    fn take_dependencies(&mut self, target: T) -> Vec<T> {
        match self.policy.late_inserts {
            LateInsertPolicy::Trust => self
                .dependencies
                .remove(&target)
                .map(|dependencies| dependencies.slice())
                .unwrap_or_default(),
            LateInsertPolicy::Invalidate => self
                .dependencies
                .get(&target)
                .map(Provider::slice)
                .unwrap_or_default(),
        }
    }

    /// Merge the impact set of `source` into the impact set of `target`.
    ///
    /// Returns whether `target` grew.
    fn merge_impact(&mut self, target: T, source: T) -> bool {
        if target == source {
            return false;
        }

        match self.impacts.remove(&source) {
            Some(impact) => {
                let completion = self.impact_mut(target);
                let before = completion.cardinality();
                completion.or(&impact);
                let grew = completion.cardinality() != before;

                self.impacts.insert(source, impact);
                grew
            }
            None => false,
        }
    }

    fn before_insert(&mut self) {
        if self.resolved.is_empty() {
            return;
        }

        match self.policy.late_inserts {
            LateInsertPolicy::Invalidate => self.resolved.clear(),
            LateInsertPolicy::Trust if !self.warned_late_insert => {
                self.warned_late_insert = true;
                tracing::warn!(
                    resolved = self.resolved.cardinality(),
                    "Path inserted after resolution; cached impact sets will not reflect it"
                );
            }
            LateInsertPolicy::Trust => {}
        }
    }

    /// Roll impact-worthy nodes up the trunk chain of `path`.
    fn insert(&mut self, path: &PathSegment, impact_kinds: &Kinds, shortcut: bool) {
        self.before_insert();

        let terminal = T::from_node_id(path.id());
        let mut impacting = Vec::with_capacity(path.depth() + 1);

        if path.kinds().matches_filter(impact_kinds) {
            impacting.push(terminal);
        }

        for cursor in path.walk_reverse().skip(1) {
            let cursor_id = T::from_node_id(cursor.id());

            // The terminal was not walked past, so every ancestor waits on it
            if shortcut {
                self.push_dependency(cursor_id, terminal);
            }

            if !impacting.is_empty() {
                self.impact_mut(cursor_id).add(&impacting);
            }

            if cursor.kinds().matches_filter(impact_kinds) {
                impacting.push(cursor_id);
            }
        }
    }

    /// Resolve the full impact set of `target` and everything it depends on.
    ///
    /// Uses an explicit stack so deep or cyclic nesting cannot exhaust the
    /// call stack. A dependency already on the stack (a cycle) is not
    /// descended into again; the waiting node is registered as one of its
    /// completions instead.
    fn resolve(&mut self, target: T) {
        self.impact_mut(target);

        let dependencies = self.take_dependencies(target);
        let mut resolutions = vec![Resolution {
            target,
            completions: Vec::new(),
            dependencies,
        }];
        let mut in_progress: HashMap<T, usize> = HashMap::from([(target, 0)]);
        let mut stack = vec![0usize];

        while let Some(&top) = stack.last() {
            let Some(dependency) = resolutions[top].dependencies.pop() else {
                stack.pop();
                continue;
            };
            let waiting = resolutions[top].target;

            if self.resolved.contains(dependency) {
                self.merge_impact(waiting, dependency);
            } else if let Some(&index) = in_progress.get(&dependency) {
                resolutions[index].completions.push(waiting);
            } else {
                self.impact_mut(dependency);
                let dependencies = self.take_dependencies(dependency);

                in_progress.insert(dependency, resolutions.len());
                stack.push(resolutions.len());
                resolutions.push(Resolution {
                    target: dependency,
                    completions: vec![waiting],
                    dependencies,
                });
            }
        }

        let rounds = self.propagate(&resolutions);

        for resolution in &resolutions {
            self.resolved.insert(resolution.target);
        }

        tracing::trace!(
            node = %target,
            records = resolutions.len(),
            propagation_rounds = rounds,
            "Resolved impact"
        );
    }

    /// Push each record's impact into its completions.
    ///
    /// Records are visited in reverse discovery order, so a chain discovered
    /// depth-first settles in one round; further rounds carry impact around
    /// cycles and across diamonds. Returns the number of rounds run.
    fn propagate(&mut self, resolutions: &[Resolution<T>]) -> usize {
        let max_rounds = self.policy.propagation.max_rounds();
        let mut rounds = 0;

        loop {
            rounds += 1;
            let mut changed = false;

            for resolution in resolutions.iter().rev() {
                for &completion in &resolution.completions {
                    changed |= self.merge_impact(completion, resolution.target);
                }
            }

            let done = match max_rounds {
                Some(max) => rounds >= max,
                None => !changed,
            };
            if done {
                return rounds;
            }
        }
    }
}

impl<T: Id, P: Provider<T>> Default for Aggregator<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Id, P: Provider<T>> PathAggregator for Aggregator<T, P> {
    type Id = T;
    type Provider = P;

    fn add_path(&mut self, path: &PathSegment, impact_kinds: &Kinds) {
        self.insert(path, impact_kinds, false);
    }

    fn add_shortcut(&mut self, path: &PathSegment, impact_kinds: &Kinds) {
        self.insert(path, impact_kinds, true);
    }

    fn cardinality(&mut self, targets: &[T]) -> P {
        tracing::debug!(num_targets = targets.len(), "Calculating impact cardinality");
        let start = Instant::now();

        let mut impact = P::default();
        for &target in targets {
            if !self.resolved.contains(target) {
                self.resolve(target);
            }

            if let Some(resolved) = self.impacts.get(&target) {
                impact.or(resolved);
            }
        }

        tracing::debug!(
            num_targets = targets.len(),
            num_results = impact.cardinality(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Calculated impact cardinality"
        );

        impact
    }

    fn contains(&self, target: T) -> bool {
        self.impacts.contains_key(&target)
    }
}
