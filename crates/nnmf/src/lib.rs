//! # NNMF - Nonnegative Matrix Factorization
//!
//! Alternating nonnegative least-squares factorization `V ≈ W·H` using
//! projected gradients (LSNMF), over dense and sparse matrices.
//!
//! This is the meta crate re-exporting the NNMF stack for convenient
//! access:
//!
//! - [`core`] - dense matrix container and shape utilities
//! - [`sparse`] - CSR matrices, conversions, products, norms
//! - [`factorize`] - the LSNMF driver, subproblem solver,
//!   projected-gradient metric, seeding, fit wrapper, and run tracker
//!
//! ## Quick Start
//!
//! ```no_run
//! use nnmf::prelude::*;
//!
//! let v = Matrix::from(DenseMatrix::<f64>::random_uniform((100, 40), 0.0, 1.0));
//!
//! let fit = Lsnmf::new(8)
//!     .max_iter(100)
//!     .min_residuals(1e-4)
//!     .factorize(&v)?;
//!
//! println!("iterations: {}", fit.n_iter());
//! # Ok::<(), nnmf::factorize::LsnmfError>(())
//! ```
//!
//! ## Sparse Input
//!
//! ```
//! use nnmf::prelude::*;
//!
//! let dense = DenseMatrix::from_vec(vec![1.0, 0.0, 0.0, 2.0], (2, 2)).unwrap();
//! let v = Matrix::from(CsrMatrix::from_dense(&dense, 0.0).unwrap());
//!
//! let fit = Lsnmf::new(1).max_iter(20).factorize(&v).unwrap();
//! assert!(fit.basis().is_nonnegative());
//! ```

/// Dense matrix container and shape utilities.
pub mod core {
    pub use nnmf_core::*;
}

/// CSR sparse matrix support.
pub mod sparse {
    pub use nnmf_sparse::*;
}

/// The LSNMF factorization core.
pub mod factorize {
    pub use nnmf_factorize::*;
}

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use nnmf_core::DenseMatrix;
    pub use nnmf_factorize::{
        subproblem, FactorSnapshot, Lsnmf, LsnmfError, LsnmfFit, Matrix, RunTracker, SeedStrategy,
    };
    pub use nnmf_sparse::CsrMatrix;
}
