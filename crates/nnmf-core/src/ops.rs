//! Shape compatibility checks shared across the workspace.
//!
//! The dense container, the CSR container, and the polymorphic matrix
//! layer all validate operand shapes through these helpers so the error
//! messages stay uniform.

use anyhow::Result;

/// Check that two matrices can be multiplied, returning the result shape.
///
/// # Errors
///
/// Returns an error when the inner dimensions differ.
///
/// # Examples
///
/// ```
/// use nnmf_core::check_matmul_compatible;
///
/// let out = check_matmul_compatible((3, 4), (4, 2)).unwrap();
/// assert_eq!(out, (3, 2));
/// assert!(check_matmul_compatible((3, 4), (5, 2)).is_err());
/// ```
pub fn check_matmul_compatible(
    a_shape: (usize, usize),
    b_shape: (usize, usize),
) -> Result<(usize, usize)> {
    let (m1, n1) = a_shape;
    let (m2, n2) = b_shape;

    if n1 != m2 {
        anyhow::bail!(
            "Matrix dimensions incompatible for multiplication: ({}, {}) x ({}, {})",
            m1,
            n1,
            m2,
            n2
        );
    }

    Ok((m1, n2))
}

/// Check that two matrices share a shape for elementwise operations.
///
/// # Errors
///
/// Returns an error when the shapes differ.
pub fn check_same_shape(a_shape: (usize, usize), b_shape: (usize, usize)) -> Result<()> {
    if a_shape != b_shape {
        anyhow::bail!(
            "Shape mismatch for elementwise operation: {:?} vs {:?}",
            a_shape,
            b_shape
        );
    }
    Ok(())
}
