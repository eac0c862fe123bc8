//! Property tests for impact resolution: order independence, monotonicity,
//! cycle safety and idempotent re-query.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use impact_kernel::{
    Aggregator64, Kinds, Node, PathAggregator, PathSegment, Provider, ResolutionPolicy,
};

const NODES: u64 = 12;

type Walk = (Vec<u64>, bool);

fn path(ids: &[u64]) -> PathSegment {
    PathSegment::chain(ids.iter().map(|&id| Node::new(id, Kinds::new().with("User")))).unwrap()
}

fn aggregate(walks: &[Walk], policy: ResolutionPolicy) -> Aggregator64 {
    let mut aggregator = Aggregator64::with_policy(policy);
    let filter = Kinds::new();
    for (ids, shortcut) in walks {
        if *shortcut {
            aggregator.add_shortcut(&path(ids), &filter);
        } else {
            aggregator.add_path(&path(ids), &filter);
        }
    }
    aggregator
}

/// Impact of `target` computed directly from the walks, without caching.
fn closure(walks: &[Walk], target: u64) -> Vec<u64> {
    let mut below: HashMap<u64, BTreeSet<u64>> = HashMap::new();
    let mut waits_on: HashMap<u64, BTreeSet<u64>> = HashMap::new();
    for (ids, shortcut) in walks {
        let terminal = ids[ids.len() - 1];
        for (index, id) in ids[..ids.len() - 1].iter().enumerate() {
            below.entry(*id).or_default().extend(&ids[index + 1..]);
            if *shortcut {
                waits_on.entry(*id).or_default().insert(terminal);
            }
        }
    }

    let mut impact = BTreeSet::new();
    let mut seen = BTreeSet::from([target]);
    let mut stack = vec![target];
    while let Some(node) = stack.pop() {
        impact.extend(below.get(&node).into_iter().flatten());
        for dependency in waits_on.get(&node).into_iter().flatten() {
            if seen.insert(*dependency) {
                stack.push(*dependency);
            }
        }
    }
    impact.into_iter().collect()
}

fn walk_strategy() -> impl Strategy<Value = Walk> {
    (prop::collection::vec(0..NODES, 1..6), any::<bool>())
}

fn walks_strategy() -> impl Strategy<Value = Vec<Walk>> {
    prop::collection::vec(walk_strategy(), 0..16)
}

fn query_order() -> impl Strategy<Value = Vec<u64>> {
    Just((0..NODES).collect::<Vec<_>>()).prop_shuffle()
}

// =============================================================================
// Order independence
// =============================================================================
proptest! {
    #[test]
    fn insertion_and_query_order_do_not_matter(
        walks in walks_strategy().prop_shuffle(),
        order in query_order(),
    ) {
        let mut aggregator = aggregate(&walks, ResolutionPolicy::default());
        for target in order {
            prop_assert_eq!(aggregator.cardinality(&[target]).slice(), closure(&walks, target));
        }
    }

    #[test]
    fn shuffled_walks_resolve_identically(
        (walks, shuffled) in walks_strategy()
            .prop_flat_map(|walks| (Just(walks.clone()), Just(walks).prop_shuffle())),
    ) {
        let mut original = aggregate(&walks, ResolutionPolicy::default());
        let mut reordered = aggregate(&shuffled, ResolutionPolicy::default());
        for target in 0..NODES {
            prop_assert_eq!(
                original.cardinality(&[target]).slice(),
                reordered.cardinality(&[target]).slice()
            );
        }
    }
}

// =============================================================================
// Monotonicity
// =============================================================================
proptest! {
    #[test]
    fn more_walks_never_shrink_impact(
        walks in walks_strategy(),
        extra in walks_strategy(),
    ) {
        let mut smaller = aggregate(&walks, ResolutionPolicy::default());
        let combined: Vec<Walk> = walks.iter().cloned().chain(extra).collect();
        let mut larger = aggregate(&combined, ResolutionPolicy::default());

        for target in 0..NODES {
            let before: BTreeSet<u64> = smaller.cardinality(&[target]).slice().into_iter().collect();
            let after: BTreeSet<u64> = larger.cardinality(&[target]).slice().into_iter().collect();
            prop_assert!(before.is_subset(&after), "node {} lost impact", target);
        }
    }
}

// =============================================================================
// Cycle safety
// =============================================================================
proptest! {
    #[test]
    fn shortcut_cycles_resolve_to_the_whole_ring(
        ring in prop::collection::btree_set(0..NODES, 2..8),
        policy in prop_oneof![Just(ResolutionPolicy::default()), Just(ResolutionPolicy::two_pass())],
    ) {
        let ring: Vec<u64> = ring.into_iter().collect();
        let mut walks: Vec<Walk> = Vec::new();
        for (index, node) in ring.iter().enumerate() {
            let next = ring[(index + 1) % ring.len()];
            walks.push((vec![*node, next], true));
            walks.push((vec![*node, 100 + node], false));
        }

        let mut expected: Vec<u64> = ring.iter().flat_map(|node| [*node, 100 + node]).collect();
        expected.sort_unstable();

        let mut aggregator = aggregate(&walks, policy);
        for node in &ring {
            prop_assert_eq!(aggregator.cardinality(&[*node]).slice(), expected.clone());
        }
    }
}

// =============================================================================
// Idempotent re-query
// =============================================================================
proptest! {
    #[test]
    fn requery_returns_identical_results(
        walks in walks_strategy(),
        order in query_order(),
        policy in prop_oneof![Just(ResolutionPolicy::default()), Just(ResolutionPolicy::two_pass())],
    ) {
        let mut aggregator = aggregate(&walks, policy);
        let first: Vec<Vec<u64>> = order.iter().map(|target| aggregator.cardinality(&[*target]).slice()).collect();
        let second: Vec<Vec<u64>> = order.iter().map(|target| aggregator.cardinality(&[*target]).slice()).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn union_query_matches_individual_queries(
        walks in walks_strategy(),
        targets in prop::collection::vec(0..NODES, 1..4),
    ) {
        let mut batched = aggregate(&walks, ResolutionPolicy::default());
        let mut single = aggregate(&walks, ResolutionPolicy::default());

        let mut expected = BTreeSet::new();
        for target in &targets {
            expected.extend(single.cardinality(&[*target]).slice());
        }
        prop_assert_eq!(batched.cardinality(&targets).slice(), expected.into_iter().collect::<Vec<_>>());
    }
}
