use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use faer::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scfaccel_linalg::{FaerLu, LinearSolver, Matrix};

/// Bordered DIIS-like system: random symmetric block plus a -1 border
fn bordered_system(n: usize, seed: u64) -> Matrix<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = Matrix::zeros(n + 1, n + 1);
    for j in 0..n {
        for k in 0..=j {
            let v = rng.random::<f64>();
            b[[k, j]] = v;
            b[[j, k]] = v;
        }
        b[[n, j]] = -1.0;
        b[[j, n]] = -1.0;
    }
    b
}

fn bench_dense_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("bordered_solve");

    for &n in &[4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("faer_lu_solver", n), &n, |bench, &n| {
            let mut solver = FaerLu::new();
            bench.iter_batched(
                || {
                    let mut rhs = vec![0.0; n + 1];
                    rhs[n] = -1.0;
                    (bordered_system(n, 42), rhs)
                },
                |(mut a, mut rhs)| {
                    solver.solve_in_place(&mut a, &mut rhs).unwrap();
                },
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("faer_factor_only", n), &n, |bench, &n| {
            bench.iter_batched(
                || {
                    let b = bordered_system(n, 42);
                    Mat::from_fn(n + 1, n + 1, |i, j| b[[i, j]])
                },
                |m| {
                    m.partial_piv_lu();
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_dense_solve);
criterion_main!(benches);
