//! # nnmf-factorize - Nonnegative Matrix Factorization
//!
//! Alternating nonnegative least-squares factorization `V ≈ W·H` using
//! projected gradients (LSNMF), over matrices stored densely or in CSR
//! format with identical numeric behavior.
//!
//! ## Overview
//!
//! The algorithm alternates between the two bound-constrained
//! least-squares subproblems (H with W fixed, then W on the transposed
//! system), each solved by the projected-gradient method with an adaptive
//! backtracking line search. Stationarity is measured by the norm of the
//! active projected gradient, which also drives both the per-subproblem
//! tolerances and the global stopping criterion. It converges faster than
//! the popular multiplicative-update approach.
//!
//! **Components:**
//!
//! - [`Lsnmf`] - configuration and the alternating outer loop
//! - [`subproblem`] - one projected-gradient nonnegative least-squares
//!   solve, usable standalone
//! - [`pgrad`] - active projected-gradient extraction and norms
//! - [`Matrix`] - dense/sparse polymorphic matrix representation
//! - [`SeedStrategy`] - initial factor generation (random, fixed,
//!   column-averaging, NNDSVD)
//! - [`LsnmfFit`] / [`RunTracker`] - results and per-run history
//!
//! ## Quick Start
//!
//! ```no_run
//! use nnmf_core::DenseMatrix;
//! use nnmf_factorize::{Lsnmf, Matrix, SeedStrategy};
//!
//! let v = Matrix::from(DenseMatrix::<f64>::random_uniform((100, 40), 0.0, 1.0));
//!
//! let fit = Lsnmf::new(8)
//!     .max_iter(100)
//!     .min_residuals(1e-4)
//!     .seed(SeedStrategy::Nndsvd)
//!     .factorize(&v)?;
//!
//! println!("iterations: {}", fit.n_iter());
//! println!("final objective: {}", fit.final_obj());
//! let error = fit.residual_norm(&v)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Sparse Input
//!
//! ```
//! use nnmf_core::DenseMatrix;
//! use nnmf_sparse::CsrMatrix;
//! use nnmf_factorize::{Lsnmf, Matrix};
//!
//! let dense = DenseMatrix::from_vec(vec![1.0, 0.0, 0.0, 2.0], (2, 2)).unwrap();
//! let v = Matrix::from(CsrMatrix::from_dense(&dense, 0.0).unwrap());
//!
//! let fit = Lsnmf::new(1).max_iter(20).factorize(&v).unwrap();
//! assert!(fit.basis().is_nonnegative());
//! ```
//!
//! ## SciRS2 Integration
//!
//! Linear algebra for NNDSVD seeding uses `scirs2_linalg`; random number
//! generation uses `scirs2_core::random`. Direct use of `ndarray` or
//! `rand` is not permitted in this workspace.
//!
//! ## References
//!
//! - Lin, C.-J. (2007), "Projected gradient methods for nonnegative
//!   matrix factorization", Neural Computation 19(10)
//! - Boutsidis & Gallopoulos (2008), "SVD based initialization: A head
//!   start for nonnegative matrix factorization"

pub mod fit;
pub mod lsnmf;
pub mod matrix;
pub mod pgrad;
pub mod seed;
pub mod track;


// Re-exports
pub use fit::LsnmfFit;
pub use lsnmf::{subproblem, Lsnmf, LsnmfError};
pub use matrix::{Matrix, MatrixError};
pub use seed::{SeedError, SeedStrategy};
pub use track::{FactorSnapshot, RunTracker};
