//! Projected-gradient extraction and norms.
//!
//! The LSNMF stopping machinery measures stationarity through the "active"
//! part of a gradient: an entry `G[i,j]` counts iff `G[i,j] < 0` or the
//! paired factor entry `X[i,j] > 0`. Entries at the nonnegativity boundary
//! with a nonnegative gradient cannot move and are excluded.
//!
//! [`extract`] keeps the active entries and zeroes the rest, preserving
//! shape and representation; [`projected_norm`] is the Frobenius norm of
//! that extraction. For sparse gradients only the structural non-zeros are
//! visited - an absent entry is zero, so it fails `g < 0` and contributes
//! zero under `x > 0` either way.

use crate::matrix::{Matrix, MatrixError};
use nnmf_core::DenseMatrix;
use nnmf_sparse::CsrMatrix;
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::numeric::Float;

/// Extract the active projected-gradient entries of `grad`.
///
/// Returns a matrix of `grad`'s shape and representation where entry
/// `(i, j)` is `grad[i, j]` when `grad[i, j] < 0 || factor[i, j] > 0`,
/// and zero otherwise.
///
/// # Errors
///
/// Returns [`MatrixError::ShapeMismatch`] when the shapes differ.
///
/// # Examples
///
/// ```
/// use nnmf_core::DenseMatrix;
/// use nnmf_factorize::{pgrad, Matrix};
///
/// let grad = Matrix::from(DenseMatrix::from_vec(vec![-1.0, 2.0, 3.0, -4.0], (2, 2)).unwrap());
/// let factor = Matrix::from(DenseMatrix::from_vec(vec![0.0, 0.0, 1.0, 1.0], (2, 2)).unwrap());
///
/// let active = pgrad::extract(&grad, &factor).unwrap();
/// assert_eq!(active.get(0, 0), Some(-1.0)); // negative gradient
/// assert_eq!(active.get(0, 1), Some(0.0));  // at the boundary, pushed outward
/// assert_eq!(active.get(1, 0), Some(3.0));  // interior point
/// ```
pub fn extract<T>(grad: &Matrix<T>, factor: &Matrix<T>) -> Result<Matrix<T>, MatrixError>
where
    T: Float + 'static,
{
    if grad.shape() != factor.shape() {
        let (m1, n1) = grad.shape();
        let (m2, n2) = factor.shape();
        return Err(MatrixError::ShapeMismatch {
            op: "extract",
            m1,
            n1,
            m2,
            n2,
        });
    }

    match grad {
        Matrix::Dense(g) => {
            let data = Array2::from_shape_fn(g.shape(), |(i, j)| {
                let gv = g[(i, j)];
                let xv = factor.get(i, j).unwrap_or_else(T::zero);
                if gv < T::zero() || xv > T::zero() {
                    gv
                } else {
                    T::zero()
                }
            });
            Ok(Matrix::Dense(DenseMatrix::from_array(data)))
        }
        Matrix::Sparse(g) => {
            let (m, n) = g.shape();
            let mut row_ptr = Vec::with_capacity(m + 1);
            let mut col_indices = Vec::new();
            let mut values = Vec::new();

            row_ptr.push(0);
            for i in 0..m {
                if let Some((cols, vals)) = g.row(i) {
                    for (&j, &gv) in cols.iter().zip(vals) {
                        let xv = factor.get(i, j).unwrap_or_else(T::zero);
                        if gv < T::zero() || xv > T::zero() {
                            col_indices.push(j);
                            values.push(gv);
                        }
                    }
                }
                row_ptr.push(col_indices.len());
            }

            Ok(Matrix::Sparse(CsrMatrix::new(
                row_ptr,
                col_indices,
                values,
                (m, n),
            )?))
        }
    }
}

/// Active projected-gradient norm: the Frobenius norm of [`extract`].
///
/// Drives both the subproblem stopping tolerance and the global
/// convergence test.
pub fn projected_norm<T>(grad: &Matrix<T>, factor: &Matrix<T>) -> Result<T, MatrixError>
where
    T: Float + 'static,
{
    Ok(extract(grad, factor)?.frobenius_norm())
}

/// Combined norm over both factors' active extractions.
///
/// Equals the Frobenius norm of the concatenated extractions:
/// `√(‖extract(gW, W)‖² + ‖extract(gH, H)‖²)`.
pub fn stacked_norm<T>(
    gw: &Matrix<T>,
    w: &Matrix<T>,
    gh: &Matrix<T>,
    h: &Matrix<T>,
) -> Result<T, MatrixError>
where
    T: Float + 'static,
{
    let norm_w = projected_norm(gw, w)?;
    let norm_h = projected_norm(gh, h)?;
    Ok((norm_w * norm_w + norm_h * norm_h).sqrt())
}
