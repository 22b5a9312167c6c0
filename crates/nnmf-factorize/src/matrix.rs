//! Polymorphic matrix representation over dense and sparse storage.
//!
//! The factorization core is written against [`Matrix<T>`], a tagged
//! variant unifying [`DenseMatrix`] and [`CsrMatrix`]. Every operation is
//! defined for both representations and for mixed operands, with identical
//! numeric semantics:
//!
//! - products pick the structural path (SpMM for sparse x dense, the
//!   transpose identity for dense x sparse, sparse x sparse stays sparse)
//! - elementwise arithmetic densifies a sparse operand, since a difference
//!   of sparse matrices is generally not sparse
//! - comparisons and multiply-and-sum normalize the sparse operand first
//!   and walk its structure
//!
//! # Examples
//!
//! ```
//! use nnmf_core::DenseMatrix;
//! use nnmf_factorize::Matrix;
//!
//! let a = Matrix::from(DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap());
//! let b = a.transpose();
//!
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.shape(), (2, 2));
//! assert_eq!(c.get(0, 0), Some(5.0));
//! ```

use nnmf_core::DenseMatrix;
use nnmf_sparse::{norms, CsrError, CsrMatrix};
use scirs2_core::numeric::{Float, Num};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("Shape mismatch: cannot {op} ({m1}, {n1}) with ({m2}, {n2})")]
    ShapeMismatch {
        op: &'static str,
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },

    #[error("Dense backend error: {0}")]
    Backend(String),

    #[error("Sparse backend error: {0}")]
    Csr(#[from] CsrError),
}

fn backend(e: anyhow::Error) -> MatrixError {
    MatrixError::Backend(e.to_string())
}

/// A matrix stored either densely or in CSR format.
///
/// Operations are dispatched on the variant tag; no representation
/// inspection happens inside the inner loops of the solver.
#[derive(Debug, Clone)]
pub enum Matrix<T> {
    /// Dense storage - every element in memory
    Dense(DenseMatrix<T>),
    /// CSR storage - structural non-zeros only
    Sparse(CsrMatrix<T>),
}

impl<T> From<DenseMatrix<T>> for Matrix<T> {
    fn from(dense: DenseMatrix<T>) -> Self {
        Matrix::Dense(dense)
    }
}

impl<T> From<CsrMatrix<T>> for Matrix<T> {
    fn from(sparse: CsrMatrix<T>) -> Self {
        Matrix::Sparse(sparse)
    }
}

impl<T> Matrix<T>
where
    T: Clone + Num,
{
    /// Shape as `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(d) => d.shape(),
            Matrix::Sparse(s) => s.shape(),
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.shape().0
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.shape().1
    }

    /// Whether this matrix uses sparse storage.
    pub fn is_sparse(&self) -> bool {
        matches!(self, Matrix::Sparse(_))
    }

    /// Borrow the dense representation, if this is a dense matrix.
    pub fn as_dense(&self) -> Option<&DenseMatrix<T>> {
        match self {
            Matrix::Dense(d) => Some(d),
            Matrix::Sparse(_) => None,
        }
    }

    /// Borrow the sparse representation, if this is a sparse matrix.
    pub fn as_sparse(&self) -> Option<&CsrMatrix<T>> {
        match self {
            Matrix::Sparse(s) => Some(s),
            Matrix::Dense(_) => None,
        }
    }
}

impl<T> Matrix<T>
where
    T: Float + 'static,
{
    /// Read one element. Out-of-bounds positions return `None`;
    /// structurally absent sparse entries read as zero.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        match self {
            Matrix::Dense(d) => d.get(row, col).copied(),
            Matrix::Sparse(s) => s.get(row, col),
        }
    }

    fn entry(&self, row: usize, col: usize) -> T {
        self.get(row, col).unwrap_or_else(T::zero)
    }

    /// Dense copy of this matrix regardless of representation.
    pub fn to_dense(&self) -> DenseMatrix<T> {
        match self {
            Matrix::Dense(d) => d.clone(),
            Matrix::Sparse(s) => s.to_dense(),
        }
    }

    /// Matrix product `C = A * B`.
    ///
    /// Representation of the result: sparse only when both operands are
    /// sparse, dense otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when inner dimensions differ.
    pub fn matmul(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.ncols() != other.nrows() {
            let (m1, n1) = self.shape();
            let (m2, n2) = other.shape();
            return Err(MatrixError::ShapeMismatch {
                op: "multiply",
                m1,
                n1,
                m2,
                n2,
            });
        }

        match (self, other) {
            (Matrix::Dense(a), Matrix::Dense(b)) => {
                Ok(Matrix::Dense(a.matmul(b).map_err(backend)?))
            }
            (Matrix::Sparse(a), Matrix::Dense(b)) => Ok(Matrix::Dense(a.spmm(b)?)),
            (Matrix::Dense(a), Matrix::Sparse(b)) => {
                // A * B = (B^T * A^T)^T keeps the product on the SpMM path
                let ct = b.transpose().spmm(&a.transpose())?;
                Ok(Matrix::Dense(ct.transpose()))
            }
            (Matrix::Sparse(a), Matrix::Sparse(b)) => Ok(Matrix::Sparse(a.spspmm(b)?)),
        }
    }

    /// Transposed copy, preserving the representation.
    pub fn transpose(&self) -> Self {
        match self {
            Matrix::Dense(d) => Matrix::Dense(d.transpose()),
            Matrix::Sparse(s) => Matrix::Sparse(s.transpose()),
        }
    }

    /// Elementwise difference `A - B`. A sparse operand is densified.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when shapes differ.
    pub fn sub(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.shape() != other.shape() {
            let (m1, n1) = self.shape();
            let (m2, n2) = other.shape();
            return Err(MatrixError::ShapeMismatch {
                op: "subtract",
                m1,
                n1,
                m2,
                n2,
            });
        }

        match (self, other) {
            (Matrix::Dense(a), Matrix::Dense(b)) => {
                Ok(Matrix::Dense(a.sub(b).map_err(backend)?))
            }
            _ => Ok(Matrix::Dense(
                self.to_dense().sub(&other.to_dense()).map_err(backend)?,
            )),
        }
    }

    /// Multiply every element by a scalar, preserving the representation.
    pub fn scale(&self, alpha: T) -> Self {
        match self {
            Matrix::Dense(d) => Matrix::Dense(d.scale(alpha)),
            Matrix::Sparse(s) => Matrix::Sparse(s.scale(alpha)),
        }
    }

    /// Elementwise maximum with a scalar.
    ///
    /// For a sparse matrix and `threshold <= 0` the structure is preserved
    /// (absent entries are zero and `max(0, threshold) = 0`); a positive
    /// threshold would promote every absent entry, so that case densifies.
    pub fn max_scalar(&self, threshold: T) -> Self {
        match self {
            Matrix::Dense(d) => Matrix::Dense(d.max_scalar(threshold)),
            Matrix::Sparse(s) if threshold <= T::zero() => {
                Matrix::Sparse(s.clamp_min(threshold))
            }
            Matrix::Sparse(s) => Matrix::Dense(s.to_dense().max_scalar(threshold)),
        }
    }

    /// Elementwise product followed by a full sum: `Σᵢⱼ Aᵢⱼ·Bᵢⱼ`.
    ///
    /// When either operand is sparse, the sum runs over that operand's
    /// structure only (products vanish wherever it is zero).
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when shapes differ.
    pub fn mul_sum(&self, other: &Self) -> Result<T, MatrixError> {
        if self.shape() != other.shape() {
            let (m1, n1) = self.shape();
            let (m2, n2) = other.shape();
            return Err(MatrixError::ShapeMismatch {
                op: "multiply-sum",
                m1,
                n1,
                m2,
                n2,
            });
        }

        // Normalize the sparse operand first
        let total = match (self, other) {
            (Matrix::Dense(a), Matrix::Dense(b)) => a.mul_sum(b).map_err(backend)?,
            (Matrix::Sparse(s), dense_side) | (dense_side, Matrix::Sparse(s)) => s
                .iter()
                .fold(T::zero(), |acc, (i, j, &v)| acc + v * dense_side.entry(i, j)),
        };
        Ok(total)
    }

    /// Frobenius norm.
    pub fn frobenius_norm(&self) -> T {
        match self {
            Matrix::Dense(d) => d.frobenius_norm(),
            Matrix::Sparse(s) => norms::frobenius_norm_csr(s),
        }
    }

    /// Stack another matrix below this one, producing a dense result.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::ShapeMismatch`] when column counts differ.
    pub fn vstack(&self, bottom: &Self) -> Result<Self, MatrixError> {
        if self.ncols() != bottom.ncols() {
            let (m1, n1) = self.shape();
            let (m2, n2) = bottom.shape();
            return Err(MatrixError::ShapeMismatch {
                op: "stack",
                m1,
                n1,
                m2,
                n2,
            });
        }
        Ok(Matrix::Dense(
            self.to_dense()
                .vstack(&bottom.to_dense())
                .map_err(backend)?,
        ))
    }

    /// Exact elementwise equality across representations.
    ///
    /// The sparse operand (when there is exactly one) is normalized to the
    /// left and every position is compared, so mixed comparisons agree with
    /// their dense equivalents. Matrices of different shapes are unequal.
    pub fn all_eq(&self, other: &Self) -> bool {
        if self.shape() != other.shape() {
            return false;
        }

        match (self, other) {
            (Matrix::Dense(a), Matrix::Dense(b)) => a.all_eq(b),
            (Matrix::Sparse(s), dense_side) | (dense_side, Matrix::Sparse(s)) => {
                let (m, n) = s.shape();
                for i in 0..m {
                    for j in 0..n {
                        if s.get(i, j) != Some(dense_side.entry(i, j)) {
                            return false;
                        }
                    }
                }
                true
            }
        }
    }

    /// Position of the first negative entry in row-major order, if any.
    ///
    /// For sparse matrices only stored entries are inspected; absent
    /// entries are zero and never negative.
    pub fn first_negative(&self) -> Option<(usize, usize)> {
        match self {
            Matrix::Dense(d) => d.first_negative(),
            Matrix::Sparse(s) => s
                .iter()
                .find(|&(_, _, &v)| v < T::zero())
                .map(|(i, j, _)| (i, j)),
        }
    }

    /// Whether every entry is `>= 0`.
    pub fn is_nonnegative(&self) -> bool {
        self.first_negative().is_none()
    }
}
