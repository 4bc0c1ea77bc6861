use num_complex::Complex64;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scfaccel_linalg::{gesv, FaerLu, LinalgError, LinearSolver, LuOptions, Matrix, Scalar};

fn random_system<T: Scalar>(
    n: usize,
    seed: u64,
    sample: impl Fn(&mut ChaCha8Rng) -> T,
) -> (Matrix<T>, Vec<T>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows = (0..n)
        .map(|_| (0..n).map(|_| sample(&mut rng)).collect())
        .collect();
    let b = (0..n).map(|_| sample(&mut rng)).collect();
    (Matrix::from_rows(rows), b)
}

fn max_residual<T: Scalar>(a: &Matrix<T>, x: &[T], b: &[T]) -> f64 {
    let n = a.nrows();
    (0..n)
        .map(|i| {
            let ax = (0..n).fold(T::zero(), |acc, j| acc + a[[i, j]] * x[j]);
            (ax - b[i]).abs_val()
        })
        .fold(0.0, f64::max)
}

#[test]
fn test_random_real_systems() {
    for (n, seed) in [(1, 0), (4, 1), (11, 2), (32, 3)] {
        let (a, b) = random_system(n, seed, |rng| rng.random::<f64>() - 0.5);
        let mut lu = a.clone();
        let mut x = b.clone();
        gesv(&mut lu, &mut x).unwrap();
        assert!(max_residual(&a, &x, &b) < 1e-10, "n = {n}");
    }
}

#[test]
fn test_random_complex_systems() {
    for (n, seed) in [(2, 10), (9, 11), (24, 12)] {
        let (a, b) = random_system(n, seed, |rng| {
            Complex64::new(rng.random::<f64>() - 0.5, rng.random::<f64>() - 0.5)
        });
        let mut lu = a.clone();
        let mut x = b.clone();
        gesv(&mut lu, &mut x).unwrap();
        assert!(max_residual(&a, &x, &b) < 1e-10, "n = {n}");
    }
}

#[test]
fn test_solver_is_reusable() {
    let mut solver = FaerLu::new();
    for seed in 0..3 {
        let (a, b) = random_system(5, seed, |rng| rng.random::<f64>());
        let mut lu = a.clone();
        let mut x = b.clone();
        solver.solve_in_place(&mut lu, &mut x).unwrap();
        assert!(max_residual(&a, &x, &b) < 1e-10);
    }
}

#[test]
fn test_rank_deficient_random_matrix() {
    // duplicate a row: exactly rank deficient
    let (a, _) = random_system(4, 99, |rng| rng.random::<f64>());
    let mut rows: Vec<Vec<f64>> = (0..4)
        .map(|i| (0..4).map(|j| a[[i, j]]).collect())
        .collect();
    rows[3] = rows[1].clone();
    let mut singular = Matrix::from_rows(rows);
    let mut b = vec![1.0; 4];

    let err = FaerLu::with_options(LuOptions::with_rtol(1e-12))
        .solve_in_place(&mut singular, &mut b)
        .unwrap_err();
    assert!(matches!(err, LinalgError::SingularMatrix { .. }));
}
