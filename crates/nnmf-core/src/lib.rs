//! # nnmf-core
//!
//! Dense matrix container and shape utilities for the NNMF stack.
//!
//! This crate provides the foundational building blocks shared by the rest
//! of the workspace:
//!
//! - **Dense matrix representation** ([`DenseMatrix`]) backed by
//!   `scirs2_core::ndarray_ext::Array2`
//! - **Shape compatibility checks** ([`ops`]) reused by the sparse and
//!   factorization crates
//!
//! ## SciRS2 Integration
//!
//! All array operations go through `scirs2-core`. Direct use of `ndarray`,
//! `rand`, or `num-traits` is not permitted anywhere in the workspace.
//!
//! ## Quick Start
//!
//! ```
//! use nnmf_core::DenseMatrix;
//!
//! let a = DenseMatrix::<f64>::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
//! let b = DenseMatrix::<f64>::ones((2, 2));
//!
//! let c = a.matmul(&b).unwrap();
//! assert_eq!(c.shape(), (2, 2));
//! assert_eq!(c[(0, 0)], 3.0);
//! ```

pub mod dense;
pub mod ops;

#[cfg(test)]
mod property_tests;

pub use dense::DenseMatrix;
pub use ops::{check_matmul_compatible, check_same_shape};
