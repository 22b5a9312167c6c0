//! Integration tests for the LSNMF driver.
//!
//! These exercise the full alternating loop: stopping behavior, iteration
//! caps, dense/sparse agreement, and reconstruction quality on small
//! synthetic inputs.

use nnmf_core::DenseMatrix;
use nnmf_factorize::{Lsnmf, LsnmfError, Matrix, SeedStrategy};
use nnmf_sparse::CsrMatrix;

fn dense(values: Vec<f64>, shape: (usize, usize)) -> Matrix<f64> {
    Matrix::from(DenseMatrix::from_vec(values, shape).unwrap())
}

fn sparse_of(m: &Matrix<f64>) -> Matrix<f64> {
    Matrix::from(CsrMatrix::from_dense(&m.to_dense(), 0.0).unwrap())
}

fn ones_seed(m: usize, rank: usize, n: usize) -> SeedStrategy<f64> {
    SeedStrategy::Fixed {
        w: Matrix::from(DenseMatrix::<f64>::ones((m, rank))),
        h: Matrix::from(DenseMatrix::<f64>::ones((rank, n))),
    }
}

#[test]
fn test_rank_one_scenario() {
    // V = [[1,2],[3,4],[5,6]], rank 1, fixed all-ones seed
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));

    let fit = Lsnmf::new(1)
        .max_iter(50)
        .min_residuals(1e-4)
        .seed(ones_seed(3, 1, 2))
        .factorize(&v)
        .unwrap();

    assert!(fit.basis().is_nonnegative());
    assert!(fit.coef().is_nonnegative());
    assert!(fit.n_iter() <= 50);

    // The approximation must beat the trivial zero factorization
    let error = fit.residual_norm(&v).unwrap();
    assert!(error < v.frobenius_norm());

    // V is nearly rank one, so the fit should be tight
    assert!(error / v.frobenius_norm() < 0.1, "relative error {error}");
}

#[test]
fn test_max_iter_zero_boundary() {
    // A cap of zero still admits exactly one outer iteration: the
    // predicate rejects only once the count exceeds the cap.
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));
    let seed = ones_seed(3, 1, 2);

    let fit = Lsnmf::new(1)
        .max_iter(0)
        .seed(seed.clone())
        .factorize(&v)
        .unwrap();

    assert_eq!(fit.n_iter(), 0);

    // The single update must have moved the factors off the seed
    if let SeedStrategy::Fixed { w, .. } = seed {
        assert!(!fit.basis().all_eq(&w));
    }
}

#[test]
fn test_iteration_cap_is_honored() {
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));

    for cap in [1, 3, 7] {
        let fit = Lsnmf::new(1)
            .max_iter(cap)
            .min_residuals(1e-12)
            .seed(ones_seed(3, 1, 2))
            .factorize(&v)
            .unwrap();
        assert!(fit.n_iter() <= cap);
    }
}

#[test]
fn test_objective_non_increasing_with_longer_runs() {
    // With a deterministic seed, letting the loop run longer can only
    // improve (or hold) the projected-gradient objective.
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));

    let mut previous = f64::INFINITY;
    for cap in [0, 2, 5, 15] {
        let fit = Lsnmf::new(1)
            .max_iter(cap)
            .min_residuals(1e-12)
            .seed(ones_seed(3, 1, 2))
            .factorize(&v)
            .unwrap();
        let obj = fit.final_obj();
        assert!(
            obj <= previous + 1e-6,
            "objective rose from {previous} to {obj} at cap {cap}"
        );
        previous = obj;
    }
}

#[test]
fn test_converges_on_exact_low_rank_input() {
    // V = W* · H* with exact nonnegative rank-2 factors
    let w_star = dense(vec![1.0, 0.5, 2.0, 1.0, 0.0, 3.0, 1.5, 2.5], (4, 2));
    let h_star = dense(vec![1.0, 2.0, 0.5, 0.0, 1.0, 2.0], (2, 3));
    let v = w_star.matmul(&h_star).unwrap();

    let fit = Lsnmf::new(2)
        .max_iter(200)
        .min_residuals(0.05)
        .seed(ones_seed(4, 2, 3))
        .factorize(&v)
        .unwrap();

    // The residual criterion must fire before the cap
    assert!(fit.n_iter() < 200, "did not converge: {} iters", fit.n_iter());

    let error = fit.residual_norm(&v).unwrap();
    assert!(error / v.frobenius_norm() < 0.2, "relative error {error}");
}

#[test]
fn test_dense_and_sparse_runs_agree() {
    // One outer iteration over identical numeric content must produce
    // entrywise-equal factors whether V, W, H are dense or sparse.
    let v_dense = dense(vec![1.0, 0.0, 2.0, 3.0, 0.0, 4.0], (3, 2));
    let v_sparse = sparse_of(&v_dense);

    let w0 = dense(vec![1.0, 1.0, 1.0], (3, 1));
    let h0 = dense(vec![1.0, 1.0], (1, 2));

    let dense_fit = Lsnmf::new(1)
        .max_iter(0)
        .seed(SeedStrategy::Fixed {
            w: w0.clone(),
            h: h0.clone(),
        })
        .factorize(&v_dense)
        .unwrap();

    let sparse_fit = Lsnmf::new(1)
        .max_iter(0)
        .seed(SeedStrategy::Fixed {
            w: sparse_of(&w0),
            h: sparse_of(&h0),
        })
        .factorize(&v_sparse)
        .unwrap();

    let (m, rank) = dense_fit.basis().shape();
    for i in 0..m {
        for r in 0..rank {
            let a = dense_fit.basis().get(i, r).unwrap();
            let b = sparse_fit.basis().get(i, r).unwrap();
            assert!((a - b).abs() < 1e-9, "W[{i},{r}]: {a} vs {b}");
        }
    }

    let (rank, n) = dense_fit.coef().shape();
    for r in 0..rank {
        for j in 0..n {
            let a = dense_fit.coef().get(r, j).unwrap();
            let b = sparse_fit.coef().get(r, j).unwrap();
            assert!((a - b).abs() < 1e-9, "H[{r},{j}]: {a} vs {b}");
        }
    }

    assert!((dense_fit.final_obj() - sparse_fit.final_obj()).abs() < 1e-9);
}

#[test]
fn test_multi_run_tracking() {
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));

    let fit = Lsnmf::new(1)
        .max_iter(5)
        .n_run(3)
        .track(true)
        .factorize(&v)
        .unwrap();

    let tracker = fit.tracker().expect("tracking was enabled");
    assert_eq!(tracker.len(), 3);
    for snapshot in tracker.runs() {
        assert_eq!(snapshot.basis.shape(), (3, 1));
        assert_eq!(snapshot.coef.shape(), (1, 2));
        assert!(snapshot.basis.is_nonnegative());
        assert!(snapshot.coef.is_nonnegative());
    }
}

#[test]
fn test_tracking_disabled_for_single_run() {
    let v = dense(vec![1.0, 2.0, 3.0, 4.0], (2, 2));

    let fit = Lsnmf::new(1)
        .max_iter(3)
        .track(true)
        .factorize(&v)
        .unwrap();

    // Tracking is only meaningful across multiple runs
    assert!(fit.tracker().is_none());
}

#[test]
fn test_objective_stride_still_terminates() {
    let v = dense(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2));

    let fit = Lsnmf::new(1)
        .max_iter(9)
        .test_conv(3)
        .seed(ones_seed(3, 1, 2))
        .factorize(&v)
        .unwrap();

    assert!(fit.n_iter() <= 9);
    assert!(fit.basis().is_nonnegative());
    assert!(fit.coef().is_nonnegative());
}

#[test]
fn test_validation_failures() {
    let v = dense(vec![1.0, 2.0, 3.0, 4.0], (2, 2));

    assert!(matches!(
        Lsnmf::new(0).factorize(&v),
        Err(LsnmfError::InvalidRank(0))
    ));

    assert!(matches!(
        Lsnmf::<f64>::new(1).n_run(0).factorize(&v),
        Err(LsnmfError::InvalidRuns(0))
    ));

    let negative = dense(vec![1.0, 2.0, -3.0, 4.0], (2, 2));
    assert!(matches!(
        Lsnmf::new(1).max_iter(2).factorize(&negative),
        Err(LsnmfError::NegativeInput { row: 1, col: 0 })
    ));
}

#[test]
fn test_sparse_input_with_nndsvd_seed() {
    let v_dense = dense(vec![1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 0.0, 4.0, 5.0], (3, 3));
    let v = sparse_of(&v_dense);

    let fit = Lsnmf::new(2)
        .max_iter(30)
        .seed(SeedStrategy::Nndsvd)
        .factorize(&v)
        .unwrap();

    assert!(fit.basis().is_nonnegative());
    assert!(fit.coef().is_nonnegative());

    let error = fit.residual_norm(&v).unwrap();
    assert!(error < v.frobenius_norm());
}
