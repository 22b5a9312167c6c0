//! LSNMF: alternating nonnegative least squares using projected gradients.
//!
//! Factorizes a nonnegative matrix `V ≈ W·H` by alternating between two
//! bound-constrained least-squares subproblems (solve for H with W fixed,
//! then the symmetric problem for W on the transposed system), each solved
//! with the projected-gradient method of Lin (2007). Treating the `m`
//! independent nonnegative least-squares columns of a subproblem together
//! keeps everything matrix-based and shares the constant Gram matrices
//! across inner iterations.
//!
//! The per-iteration work of a subproblem is finding a step size `alpha`
//! satisfying a sufficient-decrease condition; stationarity is measured by
//! the norm of the active projected gradient (see [`crate::pgrad`]), which
//! also drives the global stopping criterion.
//!
//! # Examples
//!
//! ```no_run
//! use nnmf_core::DenseMatrix;
//! use nnmf_factorize::{Lsnmf, Matrix, SeedStrategy};
//!
//! let v = Matrix::from(DenseMatrix::<f64>::random_uniform((30, 20), 0.0, 1.0));
//!
//! let fit = Lsnmf::new(4)
//!     .max_iter(50)
//!     .min_residuals(1e-4)
//!     .seed(SeedStrategy::Random)
//!     .factorize(&v)?;
//!
//! println!("converged after {} iterations", fit.n_iter());
//! # Ok::<(), nnmf_factorize::LsnmfError>(())
//! ```
//!
//! Reference: Lin, C.-J. (2007). Projected gradient methods for
//! nonnegative matrix factorization. Neural Computation, 19(10), 2756-79.

use crate::fit::LsnmfFit;
use crate::matrix::{Matrix, MatrixError};
use crate::pgrad;
use crate::seed::{initialize, SeedError, SeedStrategy};
use crate::track::RunTracker;
use scirs2_core::ndarray_ext::ScalarOperand;
use scirs2_core::numeric::{Float, FloatConst, NumAssign, NumCast};
use std::iter::Sum;
use thiserror::Error;

/// Inner-iteration cap for each subproblem solve.
const SUBPROBLEM_MAX_ITER: usize = 1000;

/// Maximum step-size trials per line search.
const MAX_SEARCH_TRIALS: usize = 20;

#[derive(Error, Debug)]
pub enum LsnmfError {
    #[error("Invalid rank: {0}")]
    InvalidRank(usize),

    #[error("Invalid number of runs: {0}")]
    InvalidRuns(usize),

    #[error("Input matrix has a negative entry at ({row}, {col})")]
    NegativeInput { row: usize, col: usize },

    #[error("Matrix operation failed: {0}")]
    Matrix(#[from] MatrixError),

    #[error("Seeding failed: {0}")]
    Seed(#[from] SeedError),
}

/// Per-factor subproblem tolerances, adapted across outer iterations.
///
/// A tolerance is multiplied by 0.1 whenever its subproblem converges in a
/// single inner iteration, tightening the next solve.
#[derive(Debug, Clone, Copy)]
struct Tolerances<T> {
    eps_w: T,
    eps_h: T,
}

/// Line-search regime, decided by the first step-size trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchMode {
    /// The initial step was too long: shrink until decrease is sufficient.
    Shrinking,
    /// The initial step already decreased: grow until it stops helping.
    Growing,
}

/// LSNMF configuration.
///
/// Built with [`Lsnmf::new`] plus the chained setters, then executed with
/// [`Lsnmf::factorize`].
#[derive(Debug, Clone)]
pub struct Lsnmf<T> {
    rank: usize,
    max_iter: Option<usize>,
    min_residuals: Option<f64>,
    n_run: usize,
    test_conv: usize,
    track: bool,
    seed: SeedStrategy<T>,
}

impl<T> Lsnmf<T> {
    /// Configuration with the given factorization rank and defaults:
    /// no iteration cap, `min_residuals = 0.001`, one run, objective
    /// recomputed every iteration, no tracking, random seeding.
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            max_iter: None,
            min_residuals: None,
            n_run: 1,
            test_conv: 0,
            track: false,
            seed: SeedStrategy::Random,
        }
    }

    /// Hard cap on outer iterations.
    ///
    /// `max_iter(0)` still performs exactly one outer iteration: the
    /// stopping predicate rejects only when the iteration count exceeds
    /// the cap, which cannot hold before the first update.
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Relative convergence threshold: the loop stops once the objective
    /// drops below `min_residuals * init_grad`. Defaults to 0.001.
    pub fn min_residuals(mut self, min_residuals: f64) -> Self {
        self.min_residuals = Some(min_residuals);
        self
    }

    /// Number of independent runs. The returned fit carries the factors of
    /// the last run; enable [`track`](Self::track) to keep all of them.
    pub fn n_run(mut self, n_run: usize) -> Self {
        self.n_run = n_run;
        self
    }

    /// Objective re-evaluation stride: with a nonzero stride the objective
    /// is recomputed only every `test_conv` iterations and the stale value
    /// is reused in between. Zero (the default) recomputes every iteration.
    pub fn test_conv(mut self, test_conv: usize) -> Self {
        self.test_conv = test_conv;
        self
    }

    /// Record per-run factors. Only meaningful together with `n_run > 1`.
    pub fn track(mut self, track: bool) -> Self {
        self.track = track;
        self
    }

    /// Seeding strategy producing the initial factor pair.
    pub fn seed(mut self, seed: SeedStrategy<T>) -> Self {
        self.seed = seed;
        self
    }
}

impl<T> Lsnmf<T>
where
    T: Float
        + FloatConst
        + NumCast
        + NumAssign
        + Sum
        + ScalarOperand
        + Send
        + Sync
        + std::fmt::Display
        + 'static,
{
    /// Compute the factorization.
    ///
    /// Runs `n_run` independent trials sequentially; each trial seeds a
    /// fresh factor pair and iterates until the stopping criterion or the
    /// iteration cap. Exhausting the cap is a normal outcome reported
    /// through the fit, never an error.
    ///
    /// # Errors
    ///
    /// Fails fast on a zero rank, a zero run count, a negative entry in
    /// `v`, or a seeding failure. With no `max_iter` the loop runs until
    /// the residual criterion holds; callers wanting guaranteed
    /// termination must set a cap.
    pub fn factorize(&self, v: &Matrix<T>) -> Result<LsnmfFit<T>, LsnmfError> {
        if self.rank == 0 {
            return Err(LsnmfError::InvalidRank(self.rank));
        }
        if self.n_run == 0 {
            return Err(LsnmfError::InvalidRuns(self.n_run));
        }
        if let Some((row, col)) = v.first_negative() {
            return Err(LsnmfError::NegativeInput { row, col });
        }

        let min_residuals = T::from(self.min_residuals.unwrap_or(0.001)).unwrap();

        let mut tracker = if self.track && self.n_run > 1 {
            Some(RunTracker::new())
        } else {
            None
        };

        let mut last_run = None;

        for run in 0..self.n_run {
            let (mut w, mut h) = initialize(v, self.rank, &self.seed)?;

            let ht = h.transpose();
            let mut gw = w.matmul(&h.matmul(&ht)?)?.sub(&v.matmul(&ht)?)?;
            let wt = w.transpose();
            let mut gh = wt.matmul(&w)?.matmul(&h)?.sub(&wt.matmul(v)?)?;

            let init_grad = gw.vstack(&gh.transpose())?.frobenius_norm();
            let eps = T::from(0.001).unwrap().max(min_residuals) * init_grad;
            let mut tol = Tolerances {
                eps_w: eps,
                eps_h: eps,
            };

            let mut cobj = pgrad::stacked_norm(&gw, &w, &gh, &h)?;
            let mut iter: usize = 0;

            while self.keep_iterating(cobj, iter, init_grad, min_residuals) {
                self.update(v, &mut w, &mut h, &mut gw, &mut gh, &mut tol)?;
                if self.test_conv == 0 || iter % self.test_conv == 0 {
                    cobj = pgrad::stacked_norm(&gw, &w, &gh, &h)?;
                }
                tracing::debug!(
                    run = run as u64,
                    iter = iter as u64,
                    objective = %cobj,
                    "outer iteration complete"
                );
                iter += 1;
            }

            tracing::info!(
                run = run as u64,
                iterations = (iter - 1) as u64,
                objective = %cobj,
                "run finished"
            );

            if let Some(t) = tracker.as_mut() {
                t.add(w.clone(), h.clone());
            }

            last_run = Some((w, h, iter - 1, cobj));
        }

        let (w, h, n_iter, final_obj) = last_run.expect("n_run >= 1 was validated");
        Ok(LsnmfFit::new(w, h, n_iter, final_obj, tracker))
    }

    /// Stopping predicate: keep iterating unless the cap is exceeded or
    /// the objective has dropped below the relative threshold.
    fn keep_iterating(&self, cobj: T, iter: usize, init_grad: T, min_residuals: T) -> bool {
        if let Some(cap) = self.max_iter {
            if iter > cap {
                return false;
            }
        }
        if iter > 0 && cobj < min_residuals * init_grad {
            return false;
        }
        true
    }

    /// One outer iteration: update W on the transposed system, then H.
    fn update(
        &self,
        v: &Matrix<T>,
        w: &mut Matrix<T>,
        h: &mut Matrix<T>,
        gw: &mut Matrix<T>,
        gh: &mut Matrix<T>,
        tol: &mut Tolerances<T>,
    ) -> Result<(), LsnmfError> {
        let tenth = T::from(0.1).unwrap();

        let (wt, gwt, inner) = subproblem(
            &v.transpose(),
            &h.transpose(),
            &w.transpose(),
            tol.eps_w,
            SUBPROBLEM_MAX_ITER,
        )?;
        *w = wt.transpose();
        *gw = gwt.transpose();
        if inner == 1 {
            tol.eps_w = tenth * tol.eps_w;
        }

        let (h_new, gh_new, inner) = subproblem(v, w, h, tol.eps_h, SUBPROBLEM_MAX_ITER)?;
        *h = h_new;
        *gh = gh_new;
        if inner == 1 {
            tol.eps_h = tenth * tol.eps_h;
        }

        Ok(())
    }
}

/// Solve one bound-constrained nonnegative least-squares subproblem.
///
/// Minimizes `0.5·‖konst − basis·H‖²` over `H >= 0` starting from
/// `h_init`, using projected gradients with an adaptive backtracking step.
/// The constant products `basisᵗ·konst` and `basisᵗ·basis` are formed once
/// and shared by every inner iteration.
///
/// Returns the updated factor, its gradient, and the zero-based index of
/// the last inner iteration entered. Exhausting `max_iter` is a soft stop:
/// the current iterate is returned and the caller reads the iteration
/// count to adapt its tolerance.
pub fn subproblem<T>(
    konst: &Matrix<T>,
    basis: &Matrix<T>,
    h_init: &Matrix<T>,
    eps: T,
    max_iter: usize,
) -> Result<(Matrix<T>, Matrix<T>, usize), MatrixError>
where
    T: Float + 'static,
{
    let basis_t = basis.transpose();
    let btc = basis_t.matmul(konst)?;
    let btb = basis_t.matmul(basis)?;

    let mut h = h_init.clone();
    // Step size, shared across inner iterations; beta is the shrink rate.
    // A smaller beta reduces the step more aggressively per trial but can
    // overshoot into steps that are too small.
    let mut alpha = T::one();
    let beta = T::from(0.1).unwrap();

    let mut grad = btb.matmul(&h)?.sub(&btc)?;
    let mut inner = 0;

    for iter in 0..max_iter {
        inner = iter;

        if pgrad::projected_norm(&grad, &h)? < eps {
            break;
        }

        line_search(&btb, &mut h, &grad, &mut alpha, beta)?;

        if iter + 1 < max_iter {
            grad = btb.matmul(&h)?.sub(&btc)?;
        }
    }

    Ok((h, grad, inner))
}

/// Search for a step size `alpha` satisfying sufficient decrease, then
/// apply the accepted projected step to `h`.
fn line_search<T>(
    btb: &Matrix<T>,
    h: &mut Matrix<T>,
    grad: &Matrix<T>,
    alpha: &mut T,
    beta: T,
) -> Result<(), MatrixError>
where
    T: Float + 'static,
{
    let sigma = T::from(0.99).unwrap();
    let half = T::from(0.5).unwrap();

    let mut mode = None;
    let mut h_prev = h.clone();

    for _trial in 0..MAX_SEARCH_TRIALS {
        let hn = h.sub(&grad.scale(*alpha))?.max_scalar(T::zero());
        let d = hn.sub(h)?;

        let gradd = grad.mul_sum(&d)?;
        let dqd = btb.matmul(&d)?.mul_sum(&d)?;
        // Exactly zero counts as insufficient
        let suff_decr = sigma * gradd + half * dqd < T::zero();

        // The first trial fixes the search regime for this line search
        let mode = *mode.get_or_insert(if suff_decr {
            SearchMode::Growing
        } else {
            SearchMode::Shrinking
        });

        match mode {
            SearchMode::Shrinking => {
                if suff_decr {
                    *h = hn;
                    break;
                }
                *alpha = *alpha * beta;
            }
            SearchMode::Growing => {
                // Stop growing when decrease fails or the proposal stalls
                // on a plateau, and keep the previous accepted step.
                if !suff_decr || h_prev.all_eq(&hn) {
                    *h = h_prev;
                    break;
                }
                *alpha = *alpha / beta;
                h_prev = hn;
            }
        }
    }

    Ok(())
}
