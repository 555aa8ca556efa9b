//! Criterion benchmarks for route search.
//!
//! Bundled examples measure the solver on the known problems; seeded random
//! graphs show how search effort grows with graph size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_flowpath::cp::SolverConfig;
use u_flowpath::instances::{random_connected, Example};
use u_flowpath::network::{CostObjective, FlowNetworkBuilder};
use u_flowpath::route::RouteRunner;

fn bench_examples(c: &mut Criterion) {
    let mut group = c.benchmark_group("examples");
    group.sample_size(10);

    let config = SolverConfig::default();
    for example in Example::all() {
        let graph = example.graph();
        group.bench_with_input(BenchmarkId::from_parameter(example), &graph, |b, g| {
            b.iter(|| {
                let result = RouteRunner::run(black_box(g), black_box(&config));
                black_box(result)
            })
        });
    }
    group.finish();
}

fn bench_random(c: &mut Criterion) {
    let mut group = c.benchmark_group("random");
    group.sample_size(10);

    let config = SolverConfig::default().with_node_limit(200_000);
    for &(nodes, extra, dests) in &[(6, 2, 2), (8, 3, 2), (8, 3, 3)] {
        let graph = match random_connected(42, nodes, extra, dests, 9) {
            Ok(graph) => graph,
            Err(e) => panic!("random graph: {e}"),
        };
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_e{}_d{}", nodes, extra, dests), nodes),
            &graph,
            |b, g| {
                b.iter(|| {
                    let result = RouteRunner::run(black_box(g), black_box(&config));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_model_build(c: &mut Criterion) {
    let graph = Example::Branching.graph();
    c.bench_function("build_branching_model", |b| {
        b.iter(|| {
            let mut network = FlowNetworkBuilder::build(black_box(&graph));
            CostObjective::impose(&mut network);
            black_box(network)
        })
    });
}

criterion_group!(benches, bench_examples, bench_random, bench_model_build);
criterion_main!(benches);
