//! CSR (Compressed Sparse Row) matrix format.
//!
//! CSR is optimized for row-wise traversal and is the storage format the
//! factorization layer uses for sparse operands.
//!
//! # Format
//!
//! For an m×n sparse matrix with nnz non-zeros:
//! - `row_ptr`: `Vec<usize>` of length m+1 - row_ptr\[i\] points to start of row i
//! - `col_indices`: `Vec<usize>` of length nnz - column index for each non-zero
//! - `values`: `Vec<T>` of length nnz - the non-zero values
//! - `shape`: (m, n) - dimensions of the matrix
//!
//! # Examples
//!
//! ```
//! use nnmf_sparse::CsrMatrix;
//!
//! // Create a 3×4 sparse matrix:
//! // [1.0  0   2.0  0  ]
//! // [0    3.0 0    0  ]
//! // [4.0  0   0    5.0]
//!
//! let row_ptr = vec![0, 2, 3, 5];
//! let col_indices = vec![0, 2, 1, 0, 3];
//! let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
//!
//! let csr = CsrMatrix::new(row_ptr, col_indices, values, (3, 4)).unwrap();
//! assert_eq!(csr.nnz(), 5);
//! ```

use nnmf_core::DenseMatrix;
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::numeric::Float;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsrError {
    #[error("Invalid row pointers: length {len} for {nrows} rows (expected {expected})")]
    InvalidRowPtr {
        len: usize,
        nrows: usize,
        expected: usize,
    },

    #[error("Row pointer not sorted at index {idx}: {curr} > {next}")]
    RowPtrNotSorted {
        idx: usize,
        curr: usize,
        next: usize,
    },

    #[error("Length mismatch: {col_indices} col_indices but {values} values")]
    LengthMismatch { col_indices: usize, values: usize },

    #[error("Column index out of bounds: {col_idx} >= {ncols}")]
    ColIndexOutOfBounds { col_idx: usize, ncols: usize },

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Matrix shape mismatch: cannot multiply {m1}x{n1} by {m2}x{n2}")]
    MatrixShapeMismatch {
        m1: usize,
        n1: usize,
        m2: usize,
        n2: usize,
    },
}

/// CSR (Compressed Sparse Row) matrix.
///
/// Row-major compressed storage; all operations below touch only the
/// stored entries where possible.
#[derive(Debug, Clone)]
pub struct CsrMatrix<T> {
    /// Row pointers: row_ptr[i] = start index of row i in col_indices/values
    /// Length: nrows + 1, with row_ptr[nrows] = nnz
    row_ptr: Vec<usize>,

    /// Column indices for each non-zero element
    col_indices: Vec<usize>,

    /// Values of non-zero elements
    values: Vec<T>,

    /// Shape: (nrows, ncols)
    shape: (usize, usize),
}

impl<T: Clone> CsrMatrix<T> {
    /// Create a new CSR matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the shape has a zero dimension
    /// - `row_ptr` has the wrong length or is not monotonically increasing
    /// - `col_indices` and `values` lengths differ
    /// - any column index is out of bounds
    pub fn new(
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        shape: (usize, usize),
    ) -> Result<Self, CsrError> {
        let (nrows, ncols) = shape;

        if nrows == 0 || ncols == 0 {
            return Err(CsrError::InvalidShape(
                "Shape cannot have zeros".to_string(),
            ));
        }

        if row_ptr.len() != nrows + 1 {
            return Err(CsrError::InvalidRowPtr {
                len: row_ptr.len(),
                nrows,
                expected: nrows + 1,
            });
        }

        if col_indices.len() != values.len() {
            return Err(CsrError::LengthMismatch {
                col_indices: col_indices.len(),
                values: values.len(),
            });
        }

        for i in 0..nrows {
            if row_ptr[i] > row_ptr[i + 1] {
                return Err(CsrError::RowPtrNotSorted {
                    idx: i,
                    curr: row_ptr[i],
                    next: row_ptr[i + 1],
                });
            }
        }

        let nnz = col_indices.len();
        if row_ptr[nrows] != nnz {
            return Err(CsrError::InvalidRowPtr {
                len: row_ptr[nrows],
                nrows,
                expected: nnz,
            });
        }

        for &col_idx in &col_indices {
            if col_idx >= ncols {
                return Err(CsrError::ColIndexOutOfBounds { col_idx, ncols });
            }
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            shape,
        })
    }

    /// Create an empty CSR matrix with a given shape.
    pub fn zeros(shape: (usize, usize)) -> Result<Self, CsrError> {
        let (nrows, ncols) = shape;
        if nrows == 0 || ncols == 0 {
            return Err(CsrError::InvalidShape(
                "Shape cannot have zeros".to_string(),
            ));
        }

        Ok(Self {
            row_ptr: vec![0; nrows + 1],
            col_indices: Vec::new(),
            values: Vec::new(),
            shape,
        })
    }

    /// Number of stored (non-zero) elements.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Shape of the matrix as (nrows, ncols).
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.shape.0
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.shape.1
    }

    /// Row pointer slice.
    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    /// Column index slice.
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Stored values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Density (nnz / total elements).
    pub fn density(&self) -> f64 {
        let total = self.nrows() * self.ncols();
        self.nnz() as f64 / total as f64
    }

    /// Get a row as (col_indices, values) slices.
    pub fn row(&self, i: usize) -> Option<(&[usize], &[T])> {
        if i >= self.nrows() {
            return None;
        }

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        Some((&self.col_indices[start..end], &self.values[start..end]))
    }

    /// Iterate stored entries as `(row, col, &value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        (0..self.nrows()).flat_map(move |row| {
            (self.row_ptr[row]..self.row_ptr[row + 1])
                .map(move |idx| (row, self.col_indices[idx], &self.values[idx]))
        })
    }
}

impl<T: Float> CsrMatrix<T> {
    /// Read a single element. Structurally absent entries read as zero;
    /// out-of-bounds positions return `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.nrows() || col >= self.ncols() {
            return None;
        }

        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        for idx in start..end {
            if self.col_indices[idx] == col {
                return Some(self.values[idx]);
            }
        }
        Some(T::zero())
    }

    /// Create CSR from a dense matrix, keeping elements with
    /// `|value| > threshold`.
    pub fn from_dense(dense: &DenseMatrix<T>, threshold: T) -> Result<Self, CsrError> {
        let (nrows, ncols) = dense.shape();

        let mut row_ptr = Vec::with_capacity(nrows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);
        for i in 0..nrows {
            for j in 0..ncols {
                let value = dense[(i, j)];
                if value.abs() > threshold {
                    col_indices.push(j);
                    values.push(value);
                }
            }
            row_ptr.push(col_indices.len());
        }

        Self::new(row_ptr, col_indices, values, (nrows, ncols))
    }

    /// Convert to a dense matrix.
    pub fn to_dense(&self) -> DenseMatrix<T> {
        let mut data = Array2::zeros(self.shape);
        for (row, col, &value) in self.iter() {
            data[[row, col]] = value;
        }
        DenseMatrix::from_array(data)
    }

    /// Transposed copy in CSR format.
    ///
    /// Uses a counting sort over column indices, O(nnz + n).
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_sparse::CsrMatrix;
    ///
    /// let csr = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], (2, 3))
    ///     .unwrap();
    /// let t = csr.transpose();
    ///
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.get(2, 0), Some(2.0));
    /// assert_eq!(t.get(1, 1), Some(3.0));
    /// ```
    pub fn transpose(&self) -> Self {
        let (m, n) = self.shape;
        let nnz = self.nnz();

        // Count entries per result row (one per original column)
        let mut row_counts = vec![0usize; n];
        for &col in &self.col_indices {
            row_counts[col] += 1;
        }

        let mut row_ptr = vec![0usize; n + 1];
        for i in 0..n {
            row_ptr[i + 1] = row_ptr[i] + row_counts[i];
        }

        let mut col_indices = vec![0usize; nnz];
        let mut values = vec![T::zero(); nnz];
        let mut next = row_ptr[..n].to_vec();

        for row in 0..m {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_indices[idx];
                let pos = next[col];
                col_indices[pos] = row;
                values[pos] = self.values[idx];
                next[col] += 1;
            }
        }

        Self {
            row_ptr,
            col_indices,
            values,
            shape: (n, m),
        }
    }

    /// Multiply every stored value by a scalar.
    pub fn scale(&self, alpha: T) -> Self {
        Self {
            row_ptr: self.row_ptr.clone(),
            col_indices: self.col_indices.clone(),
            values: self.values.iter().map(|&v| v * alpha).collect(),
            shape: self.shape,
        }
    }

    /// Elementwise maximum of stored values with a scalar.
    ///
    /// Structurally absent entries stay absent (value zero), so this is
    /// only equivalent to the dense operation for `threshold <= 0` — which
    /// covers the nonnegative projection `max(·, 0)`.
    pub fn clamp_min(&self, threshold: T) -> Self {
        Self {
            row_ptr: self.row_ptr.clone(),
            col_indices: self.col_indices.clone(),
            values: self.values.iter().map(|&v| v.max(threshold)).collect(),
            shape: self.shape,
        }
    }

    /// Sparse × dense product: `C = A * B` with dense result.
    ///
    /// # Errors
    ///
    /// Returns an error if `A.ncols != B.nrows`.
    ///
    /// # Complexity
    ///
    /// O(nnz × k) where k is the number of columns in B.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    /// use nnmf_sparse::CsrMatrix;
    ///
    /// // A: [1 0 2]
    /// //    [0 3 0]
    /// let a = CsrMatrix::new(vec![0, 2, 3], vec![0, 2, 1], vec![1.0, 2.0, 3.0], (2, 3))
    ///     .unwrap();
    /// let b = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (3, 2)).unwrap();
    ///
    /// let c = a.spmm(&b).unwrap();
    /// assert_eq!(c[(0, 0)], 11.0);
    /// assert_eq!(c[(1, 1)], 12.0);
    /// ```
    pub fn spmm(&self, b: &DenseMatrix<T>) -> Result<DenseMatrix<T>, CsrError>
    where
        T: 'static,
    {
        let (b_rows, b_cols) = b.shape();
        if self.ncols() != b_rows {
            return Err(CsrError::MatrixShapeMismatch {
                m1: self.nrows(),
                n1: self.ncols(),
                m2: b_rows,
                n2: b_cols,
            });
        }

        let mut c = Array2::<T>::zeros((self.nrows(), b_cols));

        for row in 0..self.nrows() {
            let start = self.row_ptr[row];
            let end = self.row_ptr[row + 1];

            for k in 0..b_cols {
                let mut sum = T::zero();
                for idx in start..end {
                    let col = self.col_indices[idx];
                    sum = sum + self.values[idx] * b[(col, k)];
                }
                c[[row, k]] = sum;
            }
        }

        Ok(DenseMatrix::from_array(c))
    }

    /// Sparse × sparse product: `C = A * B` with sparse result.
    ///
    /// Uses hash-based row accumulation; output rows are column-sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if `A.ncols != B.nrows`.
    pub fn spspmm(&self, b: &CsrMatrix<T>) -> Result<CsrMatrix<T>, CsrError> {
        if self.ncols() != b.nrows() {
            return Err(CsrError::MatrixShapeMismatch {
                m1: self.nrows(),
                n1: self.ncols(),
                m2: b.nrows(),
                n2: b.ncols(),
            });
        }

        let m = self.nrows();
        let k = b.ncols();

        use std::collections::HashMap;

        let mut result_row_ptr = vec![0];
        let mut result_col_indices = Vec::new();
        let mut result_values = Vec::new();

        for i in 0..m {
            let mut row_map: HashMap<usize, T> = HashMap::new();

            for a_idx in self.row_ptr[i]..self.row_ptr[i + 1] {
                let j = self.col_indices[a_idx];
                let a_val = self.values[a_idx];

                for b_idx in b.row_ptr[j]..b.row_ptr[j + 1] {
                    let col = b.col_indices[b_idx];
                    let entry = row_map.entry(col).or_insert_with(T::zero);
                    *entry = *entry + a_val * b.values[b_idx];
                }
            }

            let mut row_entries: Vec<_> = row_map.into_iter().collect();
            row_entries.sort_by_key(|(col, _)| *col);

            for (col, val) in row_entries {
                if val != T::zero() {
                    result_col_indices.push(col);
                    result_values.push(val);
                }
            }

            result_row_ptr.push(result_col_indices.len());
        }

        CsrMatrix::new(result_row_ptr, result_col_indices, result_values, (m, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix<f64> {
        // [1.0  0   2.0  0  ]
        // [0    3.0 0    0  ]
        // [4.0  0   0    5.0]
        CsrMatrix::new(
            vec![0, 2, 3, 5],
            vec![0, 2, 1, 0, 3],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            (3, 4),
        )
        .unwrap()
    }

    #[test]
    fn test_csr_creation() {
        let csr = sample();
        assert_eq!(csr.nnz(), 5);
        assert_eq!(csr.shape(), (3, 4));
    }

    #[test]
    fn test_csr_invalid_row_ptr() {
        let result = CsrMatrix::new(vec![0, 2], vec![0, 1], vec![1.0, 2.0], (3, 4));
        assert!(matches!(result, Err(CsrError::InvalidRowPtr { .. })));
    }

    #[test]
    fn test_csr_unsorted_row_ptr() {
        let result = CsrMatrix::new(vec![0, 2, 1, 2], vec![0, 1], vec![1.0, 2.0], (3, 4));
        assert!(matches!(result, Err(CsrError::RowPtrNotSorted { .. })));
    }

    #[test]
    fn test_csr_col_out_of_bounds() {
        let result = CsrMatrix::new(vec![0, 1, 1, 1], vec![9], vec![1.0], (3, 4));
        assert!(matches!(result, Err(CsrError::ColIndexOutOfBounds { .. })));
    }

    #[test]
    fn test_csr_get() {
        let csr = sample();
        assert_eq!(csr.get(0, 0), Some(1.0));
        assert_eq!(csr.get(0, 1), Some(0.0));
        assert_eq!(csr.get(2, 3), Some(5.0));
        assert_eq!(csr.get(3, 0), None);
    }

    #[test]
    fn test_csr_iter() {
        let csr = sample();
        let entries: Vec<_> = csr.iter().map(|(r, c, &v)| (r, c, v)).collect();
        assert_eq!(
            entries,
            vec![
                (0, 0, 1.0),
                (0, 2, 2.0),
                (1, 1, 3.0),
                (2, 0, 4.0),
                (2, 3, 5.0)
            ]
        );
    }

    #[test]
    fn test_dense_round_trip() {
        let csr = sample();
        let dense = csr.to_dense();
        assert_eq!(dense[(0, 0)], 1.0);
        assert_eq!(dense[(1, 1)], 3.0);
        assert_eq!(dense[(2, 2)], 0.0);

        let back = CsrMatrix::from_dense(&dense, 0.0).unwrap();
        assert_eq!(back.nnz(), csr.nnz());
        assert_eq!(back.to_dense().as_array(), dense.as_array());
    }

    #[test]
    fn test_transpose() {
        let csr = sample();
        let t = csr.transpose();
        assert_eq!(t.shape(), (4, 3));
        assert_eq!(t.get(0, 0), Some(1.0));
        assert_eq!(t.get(0, 2), Some(4.0));
        assert_eq!(t.get(3, 2), Some(5.0));
        assert_eq!(t.get(2, 1), Some(0.0));

        // Transposing twice restores the original
        let tt = t.transpose();
        assert_eq!(tt.to_dense().as_array(), csr.to_dense().as_array());
    }

    #[test]
    fn test_spmm_matches_dense() {
        let csr = sample();
        let b = DenseMatrix::from_vec(
            vec![1.0, 2.0, 0.5, 1.0, 3.0, 0.0, 1.0, 1.0],
            (4, 2),
        )
        .unwrap();

        let sparse_product = csr.spmm(&b).unwrap();
        let dense_product = csr.to_dense().matmul(&b).unwrap();

        assert_eq!(sparse_product.as_array(), dense_product.as_array());
    }

    #[test]
    fn test_spmm_shape_mismatch() {
        let csr = sample();
        let b = DenseMatrix::<f64>::ones((3, 2));
        assert!(matches!(
            csr.spmm(&b),
            Err(CsrError::MatrixShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_spspmm_matches_dense() {
        let a = sample();
        let b = a.transpose();

        let sparse_product = a.spspmm(&b).unwrap();
        let dense_product = a.to_dense().matmul(&b.to_dense()).unwrap();

        assert_eq!(sparse_product.shape(), (3, 3));
        assert_eq!(
            sparse_product.to_dense().as_array(),
            dense_product.as_array()
        );
    }

    #[test]
    fn test_scale_and_clamp_min() {
        let csr = CsrMatrix::new(
            vec![0, 2, 3],
            vec![0, 1, 1],
            vec![-1.0, 2.0, -3.0],
            (2, 2),
        )
        .unwrap();

        let scaled = csr.scale(2.0);
        assert_eq!(scaled.values(), &[-2.0, 4.0, -6.0]);

        let clamped = csr.clamp_min(0.0);
        assert_eq!(clamped.values(), &[0.0, 2.0, 0.0]);
        assert_eq!(clamped.nnz(), 3);
    }

    #[test]
    fn test_zeros() {
        let csr = CsrMatrix::<f64>::zeros((5, 5)).unwrap();
        assert_eq!(csr.nnz(), 0);
        assert_eq!(csr.get(2, 2), Some(0.0));
    }

    #[test]
    fn test_density() {
        let csr = sample();
        assert!((csr.density() - 5.0 / 12.0).abs() < 1e-12);
    }
}
