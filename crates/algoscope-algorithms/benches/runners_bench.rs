//! Benchmarks for the instrumented runners
//!
//! Measures the overhead of step emission for the sorting runners and the
//! graph runners on the reference topology.

use algoscope_algorithms::{
    Algorithm, Dataset, DatasetGenerator, GeneratorOptions, Graph, Recorder, Scenario,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Benchmark every sort over the same random arrays at several sizes
fn bench_sorts(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorts");
    let mut generator = DatasetGenerator::new(GeneratorOptions::default().with_seed(42));

    for &size in &[16usize, 64, 256] {
        let dataset = generator.generate(Scenario::Sorting, size);
        group.throughput(Throughput::Elements(size as u64));
        for algorithm in Algorithm::SORTS {
            group.bench_with_input(
                BenchmarkId::new(algorithm.id(), size),
                &dataset,
                |b, dataset| {
                    b.iter(|| {
                        let run = algorithm.prepare(black_box(dataset.clone())).unwrap();
                        let mut recorder = Recorder::new();
                        let _ = run.execute(&mut recorder);
                        recorder.into_steps().len()
                    })
                },
            );
        }
    }
    group.finish();
}

/// Benchmark searches with a target guaranteed to be present
fn bench_searches(c: &mut Criterion) {
    let mut group = c.benchmark_group("searches");
    let mut generator = DatasetGenerator::new(GeneratorOptions::default().with_seed(7));
    let (dataset, target) = generator.search_case(1024);
    let target = target.unwrap_or_default();

    for algorithm in [
        Algorithm::LinearSearch { target },
        Algorithm::BinarySearch { target },
    ] {
        group.bench_function(algorithm.id(), |b| {
            b.iter(|| algorithm.record(black_box(dataset.clone())).unwrap().len())
        });
    }
    group.finish();
}

/// Benchmark graph runners on the reference topology
fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");
    let graph = Dataset::Graph(Graph::reference());

    for algorithm in [Algorithm::ShortestPath { source: 0 }, Algorithm::MinimumSpanningTree] {
        group.bench_function(algorithm.id(), |b| {
            b.iter(|| algorithm.record(black_box(graph.clone())).unwrap().len())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sorts, bench_searches, bench_graph);
criterion_main!(benches);
