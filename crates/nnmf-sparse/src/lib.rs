//! # nnmf-sparse
//!
//! CSR (Compressed Sparse Row) matrix support for the NNMF stack.
//!
//! The factorization layer treats sparse and dense matrices uniformly;
//! this crate supplies the sparse half of that contract:
//!
//! - **Validated CSR construction** ([`CsrMatrix`]) with a typed error
//!   taxonomy ([`CsrError`])
//! - **Dense interop**: `from_dense` / `to_dense` against
//!   [`nnmf_core::DenseMatrix`]
//! - **Products**: SpMM against a dense right-hand side and
//!   sparse x sparse multiply
//! - **Structural iteration and norms** over stored entries only, O(nnz)
//!
//! ## Quick Start
//!
//! ```
//! use nnmf_sparse::CsrMatrix;
//!
//! // [1.0  0   2.0]
//! // [0    3.0 0  ]
//! let csr = CsrMatrix::new(
//!     vec![0, 2, 3],
//!     vec![0, 2, 1],
//!     vec![1.0, 2.0, 3.0],
//!     (2, 3),
//! ).unwrap();
//!
//! assert_eq!(csr.nnz(), 3);
//! assert_eq!(csr.get(0, 2), Some(2.0));
//! assert_eq!(csr.get(1, 0), Some(0.0));
//! ```

pub mod csr;
pub mod norms;

pub use csr::{CsrError, CsrMatrix};
