//! Initialization strategies for the factor pair (W, H).
//!
//! The driver obtains its starting point from a [`SeedStrategy`]:
//!
//! - [`SeedStrategy::Random`] - uniform values in `[0, 1)`
//! - [`SeedStrategy::Fixed`] - caller-supplied factors, shape-checked
//! - [`SeedStrategy::RandomVcol`] - columns of W are means of randomly
//!   chosen columns of V, rows of H means of randomly chosen rows; keeps
//!   the seed on the scale of the data
//! - [`SeedStrategy::Nndsvd`] - SVD-based nonnegative double SVD
//!   (Boutsidis & Gallopoulos, 2008), deterministic for a given V
//!
//! Every strategy returns nonnegative factors of shapes `(m, rank)` and
//! `(rank, n)`. All strategies produce dense factors except `Fixed`, which
//! passes through the representation it was given.

use crate::matrix::Matrix;
use nnmf_core::DenseMatrix;
use scirs2_core::ndarray_ext::{Array2, ScalarOperand};
use scirs2_core::numeric::{Float, FloatConst, NumAssign, NumCast};
use scirs2_core::random::quick::random_f64;
use scirs2_linalg::svd;
use std::iter::Sum;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error(
        "Fixed seed shape mismatch: expected W ({m}, {rank}) and H ({rank}, {n}), \
         got W {got_w:?} and H {got_h:?}"
    )]
    ShapeMismatch {
        m: usize,
        n: usize,
        rank: usize,
        got_w: (usize, usize),
        got_h: (usize, usize),
    },

    #[error("Rank {rank} exceeds the {available} singular values available for NNDSVD")]
    RankExceedsSpectrum { rank: usize, available: usize },

    #[error("Singular value decomposition failed: {0}")]
    Svd(String),
}

/// Strategy producing the initial factor pair.
#[derive(Debug, Clone)]
pub enum SeedStrategy<T> {
    /// Uniform random values in `[0, 1)`.
    Random,
    /// Caller-supplied factors.
    Fixed { w: Matrix<T>, h: Matrix<T> },
    /// Column/row averaging of the input matrix. `None` selects the
    /// defaults `⌈n/5⌉` columns and `⌈m/5⌉` rows.
    RandomVcol {
        p_col: Option<usize>,
        p_row: Option<usize>,
    },
    /// Nonnegative double SVD.
    Nndsvd,
}

/// Produce an initial `(W, H)` pair for `V ≈ W·H` with the given rank.
///
/// # Errors
///
/// Returns an error for a `Fixed` seed with wrong shapes, or for `Nndsvd`
/// when the rank exceeds the available spectrum or the SVD fails.
pub fn initialize<T>(
    v: &Matrix<T>,
    rank: usize,
    strategy: &SeedStrategy<T>,
) -> Result<(Matrix<T>, Matrix<T>), SeedError>
where
    T: Float + FloatConst + NumCast + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
{
    let (m, n) = v.shape();

    match strategy {
        SeedStrategy::Random => {
            let w = DenseMatrix::random_uniform((m, rank), 0.0, 1.0);
            let h = DenseMatrix::random_uniform((rank, n), 0.0, 1.0);
            Ok((Matrix::Dense(w), Matrix::Dense(h)))
        }
        SeedStrategy::Fixed { w, h } => {
            if w.shape() != (m, rank) || h.shape() != (rank, n) {
                return Err(SeedError::ShapeMismatch {
                    m,
                    n,
                    rank,
                    got_w: w.shape(),
                    got_h: h.shape(),
                });
            }
            Ok((w.clone(), h.clone()))
        }
        SeedStrategy::RandomVcol { p_col, p_row } => Ok(random_vcol(v, rank, *p_col, *p_row)),
        SeedStrategy::Nndsvd => nndsvd(v, rank),
    }
}

/// Pick a random index in `[0, bound)`.
fn random_index(bound: usize) -> usize {
    ((random_f64() * bound as f64) as usize).min(bound - 1)
}

fn random_vcol<T>(
    v: &Matrix<T>,
    rank: usize,
    p_col: Option<usize>,
    p_row: Option<usize>,
) -> (Matrix<T>, Matrix<T>)
where
    T: Float + 'static,
{
    let (m, n) = v.shape();
    let p_col = p_col.unwrap_or_else(|| n.div_ceil(5)).clamp(1, n);
    let p_row = p_row.unwrap_or_else(|| m.div_ceil(5)).clamp(1, m);

    let col_weight = T::from(p_col).unwrap().recip();
    let row_weight = T::from(p_row).unwrap().recip();

    let mut w = Array2::<T>::zeros((m, rank));
    for r in 0..rank {
        for _ in 0..p_col {
            let c = random_index(n);
            for i in 0..m {
                let entry = v.get(i, c).unwrap_or_else(T::zero);
                w[[i, r]] = w[[i, r]] + entry * col_weight;
            }
        }
    }

    let mut h = Array2::<T>::zeros((rank, n));
    for r in 0..rank {
        for _ in 0..p_row {
            let row = random_index(m);
            for j in 0..n {
                let entry = v.get(row, j).unwrap_or_else(T::zero);
                h[[r, j]] = h[[r, j]] + entry * row_weight;
            }
        }
    }

    (
        Matrix::Dense(DenseMatrix::from_array(w)),
        Matrix::Dense(DenseMatrix::from_array(h)),
    )
}

fn l2_norm<T: Float>(xs: &[T]) -> T {
    xs.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
}

fn nndsvd<T>(v: &Matrix<T>, rank: usize) -> Result<(Matrix<T>, Matrix<T>), SeedError>
where
    T: Float + FloatConst + NumCast + NumAssign + Sum + ScalarOperand + Send + Sync + 'static,
{
    let (m, n) = v.shape();
    let dense = v.to_dense();

    let (u, s, vt) =
        svd(&dense.as_array().view(), false, None).map_err(|e| SeedError::Svd(e.to_string()))?;

    let available = s.len();
    if rank > available {
        return Err(SeedError::RankExceedsSpectrum { rank, available });
    }

    let mut w = Array2::<T>::zeros((m, rank));
    let mut h = Array2::<T>::zeros((rank, n));

    // Leading pair: singular vectors of a nonnegative matrix can be chosen
    // nonnegative, so absolute values are safe here.
    let lead = s[0].sqrt();
    for i in 0..m {
        w[[i, 0]] = lead * u[[i, 0]].abs();
    }
    for j in 0..n {
        h[[0, j]] = lead * vt[[0, j]].abs();
    }

    for r in 1..rank {
        let mut u_pos = vec![T::zero(); m];
        let mut u_neg = vec![T::zero(); m];
        for i in 0..m {
            let x = u[[i, r]];
            if x > T::zero() {
                u_pos[i] = x;
            } else {
                u_neg[i] = -x;
            }
        }

        let mut v_pos = vec![T::zero(); n];
        let mut v_neg = vec![T::zero(); n];
        for j in 0..n {
            let x = vt[[r, j]];
            if x > T::zero() {
                v_pos[j] = x;
            } else {
                v_neg[j] = -x;
            }
        }

        let n_up = l2_norm(&u_pos);
        let n_un = l2_norm(&u_neg);
        let n_vp = l2_norm(&v_pos);
        let n_vn = l2_norm(&v_neg);

        let term_pos = n_up * n_vp;
        let term_neg = n_un * n_vn;

        let (uu, vv, n_u, n_v, term) = if term_pos >= term_neg {
            (&u_pos, &v_pos, n_up, n_vp, term_pos)
        } else {
            (&u_neg, &v_neg, n_un, n_vn, term_neg)
        };

        if n_u > T::epsilon() && n_v > T::epsilon() {
            let scale = (s[r] * term).sqrt();
            let wu = scale / n_u;
            let hv = scale / n_v;
            for i in 0..m {
                w[[i, r]] = wu * uu[i];
            }
            for j in 0..n {
                h[[r, j]] = hv * vv[j];
            }
        }
    }

    Ok((
        Matrix::Dense(DenseMatrix::from_array(w)),
        Matrix::Dense(DenseMatrix::from_array(h)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_v() -> Matrix<f64> {
        Matrix::from(
            DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0], (4, 2)).unwrap(),
        )
    }

    #[test]
    fn test_random_shapes_and_nonnegativity() {
        let v = sample_v();
        let (w, h) = initialize(&v, 3, &SeedStrategy::Random).unwrap();

        assert_eq!(w.shape(), (4, 3));
        assert_eq!(h.shape(), (3, 2));
        assert!(w.is_nonnegative());
        assert!(h.is_nonnegative());
    }

    #[test]
    fn test_fixed_passthrough() {
        let v = sample_v();
        let w = Matrix::from(DenseMatrix::<f64>::ones((4, 2)));
        let h = Matrix::from(DenseMatrix::<f64>::ones((2, 2)));

        let (w_out, h_out) = initialize(
            &v,
            2,
            &SeedStrategy::Fixed {
                w: w.clone(),
                h: h.clone(),
            },
        )
        .unwrap();

        assert!(w_out.all_eq(&w));
        assert!(h_out.all_eq(&h));
    }

    #[test]
    fn test_fixed_shape_mismatch() {
        let v = sample_v();
        let w = Matrix::from(DenseMatrix::<f64>::ones((4, 3)));
        let h = Matrix::from(DenseMatrix::<f64>::ones((2, 2)));

        let result = initialize(&v, 2, &SeedStrategy::Fixed { w, h });
        assert!(matches!(result, Err(SeedError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_random_vcol_stays_on_data_scale() {
        let v = sample_v();
        let (w, h) = initialize(
            &v,
            2,
            &SeedStrategy::RandomVcol {
                p_col: Some(2),
                p_row: Some(2),
            },
        )
        .unwrap();

        assert_eq!(w.shape(), (4, 2));
        assert_eq!(h.shape(), (2, 2));
        assert!(w.is_nonnegative());
        assert!(h.is_nonnegative());

        // Each W column is a mean of V columns, so it is bounded by V's range
        let max_v = 8.0;
        for i in 0..4 {
            for r in 0..2 {
                assert!(w.get(i, r).unwrap() <= max_v);
            }
        }
    }

    #[test]
    fn test_nndsvd_shapes_and_nonnegativity() {
        let v = sample_v();
        let (w, h) = initialize(&v, 2, &SeedStrategy::Nndsvd).unwrap();

        assert_eq!(w.shape(), (4, 2));
        assert_eq!(h.shape(), (2, 2));
        assert!(w.is_nonnegative());
        assert!(h.is_nonnegative());

        // The leading component must be nontrivial for a nonzero matrix
        assert!(w.to_dense().frobenius_norm() > 0.0);
        assert!(h.to_dense().frobenius_norm() > 0.0);
    }

    #[test]
    fn test_nndsvd_rank_exceeds_spectrum() {
        let v = sample_v();
        let result = initialize(&v, 3, &SeedStrategy::Nndsvd);
        assert!(matches!(
            result,
            Err(SeedError::RankExceedsSpectrum { .. })
        ));
    }
}
