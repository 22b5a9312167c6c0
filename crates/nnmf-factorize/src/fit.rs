//! Fitted factorization results.

use crate::matrix::{Matrix, MatrixError};
use crate::track::RunTracker;
use scirs2_core::numeric::Float;

/// A fitted factorization `V ≈ W·H`.
///
/// Carries the final factors of the last run together with the iteration
/// count and the final objective (active projected-gradient norm). When
/// tracking was enabled, per-run factors are available via [`tracker`].
///
/// [`tracker`]: LsnmfFit::tracker
#[derive(Debug, Clone)]
pub struct LsnmfFit<T> {
    basis: Matrix<T>,
    coef: Matrix<T>,
    n_iter: usize,
    final_obj: T,
    tracker: Option<RunTracker<T>>,
}

impl<T> LsnmfFit<T>
where
    T: Float + 'static,
{
    pub(crate) fn new(
        basis: Matrix<T>,
        coef: Matrix<T>,
        n_iter: usize,
        final_obj: T,
        tracker: Option<RunTracker<T>>,
    ) -> Self {
        Self {
            basis,
            coef,
            n_iter,
            final_obj,
            tracker,
        }
    }

    /// Basis matrix W of shape (m, rank).
    pub fn basis(&self) -> &Matrix<T> {
        &self.basis
    }

    /// Coefficient matrix H of shape (rank, n).
    pub fn coef(&self) -> &Matrix<T> {
        &self.coef
    }

    /// Number of outer iterations actually performed by the last run.
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Final objective value (active projected-gradient norm).
    pub fn final_obj(&self) -> T {
        self.final_obj
    }

    /// Per-run factor snapshots, when tracking was enabled.
    pub fn tracker(&self) -> Option<&RunTracker<T>> {
        self.tracker.as_ref()
    }

    /// Reconstruct the approximation `W·H`.
    ///
    /// # Errors
    ///
    /// Propagates a shape mismatch from the product; cannot occur for a
    /// fit produced by the driver.
    pub fn fitted(&self) -> Result<Matrix<T>, MatrixError> {
        self.basis.matmul(&self.coef)
    }

    /// Residual Frobenius norm `‖V − W·H‖`.
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch when `v` does not match the fitted shape.
    pub fn residual_norm(&self, v: &Matrix<T>) -> Result<T, MatrixError> {
        Ok(v.sub(&self.fitted()?)?.frobenius_norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnmf_core::DenseMatrix;

    #[test]
    fn test_fitted_and_residual() {
        let w = Matrix::from(DenseMatrix::from_vec(vec![1.0, 2.0], (2, 1)).unwrap());
        let h = Matrix::from(DenseMatrix::from_vec(vec![3.0, 4.0], (1, 2)).unwrap());
        let fit = LsnmfFit::new(w, h, 7, 0.5, None);

        let approx = fit.fitted().unwrap();
        assert_eq!(approx.get(0, 0), Some(3.0));
        assert_eq!(approx.get(1, 1), Some(8.0));

        let v = Matrix::from(DenseMatrix::from_vec(vec![3.0, 4.0, 6.0, 8.0], (2, 2)).unwrap());
        assert!(fit.residual_norm(&v).unwrap() < 1e-12);

        assert_eq!(fit.n_iter(), 7);
        assert_eq!(fit.final_obj(), 0.5);
        assert!(fit.tracker().is_none());
    }

    #[test]
    fn test_residual_shape_mismatch() {
        let w = Matrix::from(DenseMatrix::<f64>::ones((2, 1)));
        let h = Matrix::from(DenseMatrix::<f64>::ones((1, 2)));
        let fit = LsnmfFit::new(w, h, 1, 0.0, None);

        let v = Matrix::from(DenseMatrix::<f64>::ones((3, 3)));
        assert!(fit.residual_norm(&v).is_err());
    }
}
