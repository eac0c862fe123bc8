//! Cross-product set calculator.
//!
//! Compound privileges need a principal to satisfy several preconditions at
//! once: write access to an object *and* enrollment rights on a template, for
//! instance. Each precondition yields a first-degree set of principals, many
//! of them groups. The calculator finds the principals that satisfy every
//! precondition, through transitive group membership, without materializing
//! the full expansion of the reference set.
//!
//! Group expansions come from a [`PathAggregator`] fed with group-membership
//! paths: the impact set of a group is its transitive membership.

pub mod universal;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cardinality::{Id, Provider};
use crate::impact::PathAggregator;
use crate::policy::CrossProductPolicy;
use crate::types::Node;

pub use universal::{has_universal_member, InMemoryUniversalGroups, LookupError, UniversalGroupLookup};

/// One input set, prepared for intersection.
struct Prepared<P> {
    first_degree: P,
    unrolled: P,
    group_like: P,
}

/// Expansion lookups with a per-call size cache.
struct Expansions<'a, A: PathAggregator> {
    aggregator: &'a mut A,
    sizes: HashMap<A::Id, u64>,
}

impl<'a, A: PathAggregator> Expansions<'a, A> {
    fn new(aggregator: &'a mut A) -> Self {
        Self {
            aggregator,
            sizes: HashMap::new(),
        }
    }

    fn members(&mut self, group: A::Id) -> A::Provider {
        let members = self.aggregator.cardinality(&[group]);
        self.sizes.insert(group, members.cardinality());
        members
    }

    fn size(&mut self, id: A::Id) -> u64 {
        if let Some(size) = self.sizes.get(&id) {
            return *size;
        }
        self.members(id).cardinality()
    }
}

/// Cross-product calculator.
///
/// ## Algorithm
///
/// 1. Fewer than two sets: warn and return nothing
/// 2. Unroll each set (first-degree members plus group expansions); drop
///    sets whose unrolled form reaches a universal group
/// 3. No survivors: union of every first-degree set. One survivor: its
///    first-degree set
/// 4. `check` = intersection of the unrolled sets of every survivor but the
///    first (the reference)
/// 5. Reference members found in `check` qualify directly; the expansions of
///    the remaining groups go into a remainder
/// 6. Groups in the remainder, smallest expansion first: a group found in
///    `check` qualifies and its members leave the remainder with it
/// 7. What is left of the remainder qualifies if found in `check`
pub struct CrossProductCalculator<L: UniversalGroupLookup> {
    lookup: Arc<L>,
    policy: CrossProductPolicy,
}

impl<L: UniversalGroupLookup> CrossProductCalculator<L> {
    /// Create a calculator with the default policy.
    pub fn new(lookup: Arc<L>) -> Self {
        Self::with_policy(lookup, CrossProductPolicy::default())
    }

    /// Create a calculator with an explicit policy.
    pub fn with_policy(lookup: Arc<L>, policy: CrossProductPolicy) -> Self {
        Self { lookup, policy }
    }

    /// Get the policy.
    pub fn policy(&self) -> &CrossProductPolicy {
        &self.policy
    }

    /// Cross product of first-degree node sets.
    ///
    /// A node is group-like when its kinds intersect the policy's group kinds.
    pub fn node_sets<A: PathAggregator>(
        &self,
        expansions: &mut A,
        domain: &str,
        node_sets: &[&[Node]],
    ) -> A::Provider {
        if node_sets.len() < 2 {
            warn!(num_sets = node_sets.len(), "Cross products require at least 2 node sets");
            return A::Provider::default();
        }

        let started = Instant::now();
        let mut expansions = Expansions::new(expansions);
        let prepared: Vec<_> = node_sets
            .iter()
            .map(|nodes| {
                let mut set = Prepared {
                    first_degree: A::Provider::default(),
                    unrolled: A::Provider::default(),
                    group_like: A::Provider::default(),
                };
                for node in nodes.iter() {
                    let id = <A::Id as Id>::from_node_id(node.id);
                    set.first_degree.insert(id);
                    set.unrolled.insert(id);
                    if node.kinds.contains_one_of(&self.policy.group_kinds) {
                        set.group_like.insert(id);
                        set.unrolled.or(&expansions.members(id));
                    }
                }
                set
            })
            .collect();

        let result = self.combine(&mut expansions, domain, prepared);
        debug!(
            num_sets = node_sets.len(),
            num_results = result.cardinality(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Calculated cross product of node sets"
        );
        result
    }

    /// Cross product of first-degree id sets.
    ///
    /// Without kinds to go by, an id is group-like when its expansion is
    /// non-empty.
    pub fn bitmaps<A: PathAggregator>(
        &self,
        expansions: &mut A,
        domain: &str,
        sets: &[A::Provider],
    ) -> A::Provider {
        if sets.len() < 2 {
            warn!(num_sets = sets.len(), "Cross products require at least 2 node sets");
            return A::Provider::default();
        }

        let started = Instant::now();
        let mut expansions = Expansions::new(expansions);
        let prepared: Vec<_> = sets
            .iter()
            .map(|first_degree| {
                let mut unrolled = first_degree.clone();
                let mut group_like = A::Provider::default();
                for id in first_degree.slice() {
                    let members = expansions.members(id);
                    if !members.is_empty() {
                        group_like.insert(id);
                        unrolled.or(&members);
                    }
                }
                Prepared {
                    first_degree: first_degree.clone(),
                    unrolled,
                    group_like,
                }
            })
            .collect();

        let result = self.combine(&mut expansions, domain, prepared);
        debug!(
            num_sets = sets.len(),
            num_results = result.cardinality(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Calculated cross product of bitmaps"
        );
        result
    }

    fn universal_groups<T: Id>(&self, domain: &str) -> Vec<T> {
        match self.lookup.universal_groups(domain, &self.policy) {
            Ok(ids) => ids.into_iter().map(T::from_node_id).collect(),
            Err(error) => {
                warn!(%domain, %error, "Universal group lookup failed, treating every set as discriminating");
                Vec::new()
            }
        }
    }

    fn combine<A: PathAggregator>(
        &self,
        expansions: &mut Expansions<'_, A>,
        domain: &str,
        prepared: Vec<Prepared<A::Provider>>,
    ) -> A::Provider {
        let universal = self.universal_groups::<A::Id>(domain);
        let (survivors, discarded): (Vec<_>, Vec<_>) = prepared
            .into_iter()
            .partition(|set| !has_universal_member(&set.unrolled, &universal));

        match survivors.len() {
            0 => {
                debug!(num_sets = discarded.len(), "Every set reaches a universal group");
                let mut union = A::Provider::default();
                for set in &discarded {
                    union.or(&set.first_degree);
                }
                return union;
            }
            1 => {
                debug!(num_discarded = discarded.len(), "Only one set avoids universal groups");
                return survivors[0].first_degree.clone();
            }
            _ => {}
        }

        let reference = &survivors[0];
        let mut check = survivors[1].unrolled.clone();
        for set in &survivors[2..] {
            check.and(&set.unrolled);
        }

        let mut results = A::Provider::default();
        let mut remainder = A::Provider::default();
        for id in reference.first_degree.slice() {
            if check.contains(id) {
                results.insert(id);
            } else if reference.group_like.contains(id) {
                remainder.or(&expansions.members(id));
            }
        }

        let mut groups: Vec<(u64, A::Id)> = Vec::new();
        for id in remainder.slice() {
            let size = expansions.size(id);
            if size > 0 {
                groups.push((size, id));
            }
        }
        groups.sort_unstable();

        for (_, group) in groups {
            if !remainder.contains(group) {
                continue;
            }
            remainder.remove(group);
            if check.contains(group) {
                results.insert(group);
                remainder.xor(&expansions.members(group));
            }
        }

        remainder.each(|id| {
            if check.contains(id) {
                results.insert(id);
            }
            true
        });

        results
    }
}
