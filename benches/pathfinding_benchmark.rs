use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use warmpath::algo::{build_view, find_paths, EdgeFilter, PathConfig};
use warmpath::graph::{Edge, EdgeKind, EntityId, InMemoryGraph};
use warmpath::scope_edges;

/// Random graph with `nodes` entities and an average out-degree of `degree`
fn random_edges(nodes: usize, degree: usize, seed: u64) -> Vec<Edge> {
    let mut rng = StdRng::seed_from_u64(seed);
    let kinds = [
        EdgeKind::KNOWS,
        EdgeKind::OWNER,
        EdgeKind::PORTFOLIO_CONNECTION,
        EdgeKind::LINKEDIN_INDUSTRY_CONNECTION,
    ];
    let mut edges = Vec::with_capacity(nodes * degree);
    for _ in 0..nodes * degree {
        let source = rng.gen_range(0..nodes);
        let mut target = rng.gen_range(0..nodes);
        if target == source {
            target = (target + 1) % nodes;
        }
        edges.push(Edge::new(
            format!("e{}", source),
            format!("e{}", target),
            kinds[rng.gen_range(0..kinds.len())],
            rng.gen_range(0.3..1.0),
        ));
    }
    edges
}

/// Benchmark find_paths over growing hop bounds
fn bench_find_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_paths");
    let edges = random_edges(2_000, 8, 42);
    let view = build_view(&edges, &EdgeFilter::default());

    for max_hops in [2usize, 3, 4].iter() {
        let config = PathConfig {
            max_hops: *max_hops,
            min_strength: 0.2,
            max_results: 10,
            ..PathConfig::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(max_hops), max_hops, |b, _| {
            b.iter(|| {
                let paths = find_paths(&view, &["e0", "e1", "e2"], "e999", &config).unwrap();
                criterion::black_box(paths.len());
            });
        });
    }
    group.finish();
}

/// Benchmark view construction (adjacency build) per request
fn bench_build_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_view");

    for size in [1_000usize, 10_000, 50_000].iter() {
        let edges = random_edges(*size / 8, 8, 7);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let view = build_view(&edges, &EdgeFilter { kinds: None, bidirectional: true });
                criterion::black_box(view.edge_count());
            });
        });
    }
    group.finish();
}

/// Benchmark progressive scoping against the in-memory store
fn bench_scope_edges(c: &mut Criterion) {
    let graph = InMemoryGraph::from_parts(Vec::new(), random_edges(5_000, 6, 3)).unwrap();
    let sources = vec![EntityId::new("e0"), EntityId::new("e1")];

    c.bench_function("scope_edges_3_hops", |b| {
        b.iter(|| {
            let edges = scope_edges(&graph, &sources, 3, false).unwrap();
            criterion::black_box(edges.len());
        });
    });
}

criterion_group!(
    benches,
    bench_find_paths,
    bench_build_view,
    bench_scope_edges,
);
criterion_main!(benches);
