//! Benchmarks for beat-row resolution.
//!
//! The ticker resolves the pattern on every tick, so this has to stay cheap
//! even for large, heavily connected graphs.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tunkul::graph::{GridPos, PatternGraph};

/// A `side` × `side` grid, each node linked right and down, with wrap-around
/// edges making plenty of cycles.
fn lattice(side: i32) -> PatternGraph {
    let mut graph = PatternGraph::with_beat_length(64).unwrap();
    let mut ids = Vec::new();
    for j in 0..side {
        for i in 0..side {
            ids.push(graph.add_node(GridPos::new(i, j)));
        }
    }
    let at = |i: i32, j: i32| ids[(j.rem_euclid(side) * side + i.rem_euclid(side)) as usize];
    for j in 0..side {
        for i in 0..side {
            graph.connect(at(i, j), at(i + 1, j)).unwrap();
            graph.connect(at(i, j), at(i, j + 1)).unwrap();
        }
    }
    graph.set_start_node(at(0, 0)).unwrap();
    graph
}

pub fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/resolve");

    for side in [4, 16, 32] {
        let graph = lattice(side);
        group.bench_with_input(
            BenchmarkId::new("lattice", side * side),
            &graph,
            |b, graph| b.iter(|| black_box(graph.beat_row())),
        );
    }

    group.finish();
}
