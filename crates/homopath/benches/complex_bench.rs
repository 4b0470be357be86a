//! Criterion benches for complex construction, basis extraction and
//! path vectorisation on punctured grids.
//!
//! Results live under `target/criterion`.

use std::collections::HashMap;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use homopath::api::{
    to_edge_vector, BoundaryOperators, Cell, GridComplex, HomologyBasis, SolveCfg, VertexId,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

fn layouts() -> Vec<(usize, Vec<Cell>)> {
    vec![
        (8, vec![Cell::new(4, 4)]),
        (12, vec![Cell::new(3, 3), Cell::new(8, 8)]),
        (16, vec![Cell::new(4, 4), Cell::new(4, 11), Cell::new(11, 7)]),
    ]
}

fn random_walk(complex: &GridComplex, steps: usize, rng: &mut StdRng) -> Vec<VertexId> {
    let mut adj: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for e in complex.edges() {
        adj.entry(e.from).or_default().push(e.to);
        adj.entry(e.to).or_default().push(e.from);
    }
    let Some(mut at) = complex.source() else {
        return Vec::new();
    };
    let mut walk = vec![at];
    for _ in 0..steps {
        match adj.get(&at).and_then(|n| n.choose(rng)) {
            Some(&next) => {
                walk.push(next);
                at = next;
            }
            None => break,
        }
    }
    walk
}

fn bench_complex(c: &mut Criterion) {
    let cfg = SolveCfg::default();
    let mut group = c.benchmark_group("complex");
    for (n, holes) in layouts() {
        let label = format!("{n}x{n}/{}", holes.len());
        group.bench_function(BenchmarkId::new("build", &label), |b| {
            b.iter(|| GridComplex::new(n, n, holes.iter().copied()).unwrap())
        });
        let complex = GridComplex::new(n, n, holes.iter().copied()).unwrap();
        group.bench_function(BenchmarkId::new("operators", &label), |b| {
            b.iter(|| BoundaryOperators::new(&complex, cfg.boundary_tol).unwrap())
        });
        let ops = BoundaryOperators::new(&complex, cfg.boundary_tol).unwrap();
        group.bench_function(BenchmarkId::new("basis", &label), |b| {
            b.iter(|| HomologyBasis::compute(&ops, cfg.kernel_tol).unwrap())
        });
    }
    group.finish();
}

fn bench_vectorize(c: &mut Criterion) {
    let complex = GridComplex::new(12, 12, [Cell::new(3, 3), Cell::new(8, 8)]).unwrap();
    let ops = BoundaryOperators::new(&complex, 1e-9).unwrap();
    let basis = HomologyBasis::compute(&ops, 1e-6).unwrap();
    let mut group = c.benchmark_group("vectorize");
    for steps in [32usize, 256] {
        group.bench_function(BenchmarkId::new("walk_project", steps), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter_batched(
                || random_walk(&complex, steps, &mut rng),
                |walk| {
                    let x = to_edge_vector(&complex, &walk).unwrap();
                    basis.project(&x)
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_complex, bench_vectorize);
criterion_main!(benches);
