//! Performance benchmarks for impact resolution and cross products.
//!
//! Run with: `cargo bench --bench resolution`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Path insert | <2µs | Depth 8, roaring treemap |
//! | Cold resolve | Linear in dependency records | Explicit stack, no recursion |
//! | Cached query | <1µs + set copy | Resolved set hit |
//! | Cross product | Dominated by group expansion | Per-call size cache |

use criterion::{
    black_box, criterion_group, criterion_main,
    BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::sync::Arc;
use std::thread;

use impact_kernel::{
    Aggregator32, Aggregator64, CrossProductCalculator, CrossProductPolicy,
    InMemoryUniversalGroups, Kinds, Node, NodeId, PathAggregator, PathSegment,
    ResolutionPolicy, ThreadSafeAggregator,
};

fn kinds() -> Kinds {
    Kinds::new().with("User")
}

fn path(ids: &[u64]) -> PathSegment {
    PathSegment::chain(ids.iter().map(|&id| Node::new(id, kinds()))).unwrap()
}

/// Chain of `length` shortcuts, each link carrying one leaf.
fn shortcut_chain(length: u64) -> Vec<(PathSegment, bool)> {
    let mut walks = Vec::with_capacity(length as usize * 2);
    for link in 0..length {
        walks.push((path(&[link, link + 1]), true));
        walks.push((path(&[link, 1_000_000 + link]), false));
    }
    walks
}

fn feed<A: PathAggregator>(aggregator: &mut A, walks: &[(PathSegment, bool)]) {
    let filter = kinds();
    for (walk, shortcut) in walks {
        if *shortcut {
            aggregator.add_shortcut(walk, &filter);
        } else {
            aggregator.add_path(walk, &filter);
        }
    }
}

/// Benchmark path insertion.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for depth in [2u64, 8, 32] {
        let walk = path(&(0..depth).collect::<Vec<_>>());
        let filter = kinds();

        group.throughput(Throughput::Elements(depth));
        group.bench_with_input(BenchmarkId::new("depth", depth), &walk, |b, walk| {
            b.iter_batched(
                Aggregator64::new,
                |mut aggregator| {
                    aggregator.add_path(black_box(walk), &filter);
                    aggregator
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark cold resolution of a shortcut chain under both strategies.
fn bench_cold_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("cold_resolve");

    for length in [100u64, 1_000, 10_000] {
        let walks = shortcut_chain(length);

        for (name, policy) in [
            ("fixed_point", ResolutionPolicy::default()),
            ("two_pass", ResolutionPolicy::two_pass()),
        ] {
            group.throughput(Throughput::Elements(length));
            group.bench_with_input(BenchmarkId::new(name, length), &walks, |b, walks| {
                b.iter_batched(
                    || {
                        let mut aggregator = Aggregator64::with_policy(policy.clone());
                        feed(&mut aggregator, walks);
                        aggregator
                    },
                    |mut aggregator| aggregator.cardinality(black_box(&[0])),
                    BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

/// Benchmark queries answered from the resolved set.
fn bench_cached_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("cached_query");

    for length in [100u64, 10_000] {
        let mut aggregator = Aggregator64::new();
        feed(&mut aggregator, &shortcut_chain(length));
        aggregator.cardinality(&[0]);

        group.throughput(Throughput::Elements(1));
        group.bench_function(BenchmarkId::new("chain", length), |b| {
            b.iter(|| aggregator.cardinality(black_box(&[length / 2])))
        });
    }

    group.finish();
}

/// Benchmark the cross product against nested group expansions.
fn bench_cross_product(c: &mut Criterion) {
    let policy = CrossProductPolicy::default();
    let lookup = InMemoryUniversalGroups::new().with_domain(
        "BENCH.LOCAL",
        &policy,
        &[NodeId::new(900_000), NodeId::new(900_001)],
    );
    let calculator = CrossProductCalculator::with_policy(Arc::new(lookup), policy);

    let mut group = c.benchmark_group("cross_product");

    for groups in [10u64, 100, 1_000] {
        // Group g contains subgroup 10_000 + g, which holds 20 users
        let mut expansions = Aggregator32::new();
        let all = Kinds::new();
        for g in 0..groups {
            for member in 0..20 {
                let chain = [
                    Node::new(g, Kinds::new().with("Group")),
                    Node::new(10_000 + g, Kinds::new().with("Group")),
                    Node::new(100_000 + g * 20 + member, kinds()),
                ];
                expansions.add_path(&PathSegment::chain(chain).unwrap(), &all);
            }
        }

        let first: Vec<Node> = (0..groups).map(|g| Node::new(g, Kinds::new().with("Group"))).collect();
        let second: Vec<Node> = (0..groups)
            .step_by(2)
            .map(|g| Node::new(10_000 + g, Kinds::new().with("Group")))
            .collect();

        group.throughput(Throughput::Elements(groups));
        group.bench_function(BenchmarkId::new("groups", groups), |b| {
            b.iter(|| {
                calculator.node_sets(
                    &mut expansions,
                    "BENCH.LOCAL",
                    black_box(&[&first[..], &second[..]]),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark lock contention on the thread-safe facade.
fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");

    for num_threads in [1usize, 4, 8] {
        group.throughput(Throughput::Elements(num_threads as u64 * 100));
        group.bench_with_input(
            BenchmarkId::new("threads", num_threads),
            &num_threads,
            |b, &n| {
                b.iter(|| {
                    let shared = ThreadSafeAggregator::new(Aggregator64::new());
                    let handles: Vec<_> = (0..n as u64)
                        .map(|worker| {
                            let shared = shared.clone();
                            thread::spawn(move || {
                                for leaf in 0..100u64 {
                                    shared.add_path(&path(&[0, 1 + worker, 1_000 + worker * 100 + leaf]), &kinds());
                                }
                            })
                        })
                        .collect();

                    for h in handles {
                        h.join().unwrap();
                    }
                    shared.cardinality(&[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_cold_resolve,
    bench_cached_query,
    bench_cross_product,
    bench_contention,
);
criterion_main!(benches);
