//! Norms over sparse matrices.
//!
//! All norms here are O(nnz): they fold over stored values only, which is
//! exact because absent entries are zero and contribute nothing.
//!
//! # Examples
//!
//! ```
//! use nnmf_sparse::{norms, CsrMatrix};
//!
//! let csr = CsrMatrix::new(vec![0, 1, 2], vec![0, 1], vec![3.0, 4.0], (2, 2)).unwrap();
//! assert!((norms::frobenius_norm_csr(&csr) - 5.0_f64).abs() < 1e-10);
//! ```

use crate::CsrMatrix;
use scirs2_core::numeric::Float;

/// Frobenius norm of a CSR matrix: `‖A‖_F = √(Σᵢⱼ |aᵢⱼ|²)`.
pub fn frobenius_norm_csr<T: Float>(matrix: &CsrMatrix<T>) -> T {
    matrix
        .values()
        .iter()
        .fold(T::zero(), |acc, &val| acc + val * val)
        .sqrt()
}

/// L1 norm of a CSR matrix: `‖A‖_1 = Σᵢⱼ |aᵢⱼ|`.
pub fn l1_norm_csr<T: Float>(matrix: &CsrMatrix<T>) -> T {
    matrix
        .values()
        .iter()
        .fold(T::zero(), |acc, &val| acc + val.abs())
}

/// Infinity norm (maximum absolute stored value) of a CSR matrix.
///
/// Returns zero for a matrix with no stored entries.
pub fn infinity_norm_csr<T: Float>(matrix: &CsrMatrix<T>) -> T {
    matrix
        .values()
        .iter()
        .fold(T::zero(), |acc, &val| acc.max(val.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix<f64> {
        CsrMatrix::new(
            vec![0, 2, 3],
            vec![0, 2, 1],
            vec![1.0, -2.0, 2.0],
            (2, 3),
        )
        .unwrap()
    }

    #[test]
    fn test_frobenius_norm() {
        let csr = sample();
        assert!((frobenius_norm_csr(&csr) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_l1_norm() {
        let csr = sample();
        assert!((l1_norm_csr(&csr) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_infinity_norm() {
        let csr = sample();
        assert!((infinity_norm_csr(&csr) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_matrix_norms() {
        let csr = CsrMatrix::<f64>::zeros((3, 3)).unwrap();
        assert_eq!(frobenius_norm_csr(&csr), 0.0);
        assert_eq!(l1_norm_csr(&csr), 0.0);
        assert_eq!(infinity_norm_csr(&csr), 0.0);
    }

    #[test]
    fn test_matches_dense_norm() {
        let csr = sample();
        let dense = csr.to_dense();
        assert!((frobenius_norm_csr(&csr) - dense.frobenius_norm()).abs() < 1e-12);
    }
}
