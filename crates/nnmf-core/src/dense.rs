//! Dense matrix implementation backed by scirs2-core arrays.
//!
//! `DenseMatrix<T>` wraps a two-dimensional `scirs2_core` array and exposes
//! the operation set the factorization layer is written against: products,
//! transposes, elementwise arithmetic, clamping, norms, and row-wise
//! concatenation.
//!
//! # SciRS2 Integration
//!
//! All array operations use `scirs2_core::ndarray_ext` and
//! `scirs2_core::random`. Direct use of `ndarray` or `rand` is not
//! permitted in this workspace.

use crate::ops::{check_matmul_compatible, check_same_shape};
use scirs2_core::ndarray_ext::Array2;
use scirs2_core::numeric::{Float, Num, NumCast};

/// Dense matrix backed by scirs2-core's two-dimensional array.
///
/// This is the primary dense container in the NNMF stack. Matrices use
/// C-contiguous (row-major) layout.
///
/// # Examples
///
/// ```
/// use nnmf_core::DenseMatrix;
///
/// let m = DenseMatrix::<f64>::zeros((2, 3));
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.nrows(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DenseMatrix<T> {
    /// Underlying array storage (via scirs2-core)
    pub(crate) data: Array2<T>,
}

impl<T> DenseMatrix<T>
where
    T: Clone + Num,
{
    /// Create a matrix from an existing two-dimensional array.
    pub fn from_array(array: Array2<T>) -> Self {
        Self { data: array }
    }

    /// Create a matrix from a vector in row-major order.
    ///
    /// # Errors
    ///
    /// Returns an error if `vec.len()` does not equal `rows * cols`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], (2, 3)).unwrap();
    /// assert_eq!(m[(1, 2)], 6.0);
    /// ```
    pub fn from_vec(vec: Vec<T>, shape: (usize, usize)) -> anyhow::Result<Self> {
        let (rows, cols) = shape;
        if vec.len() != rows * cols {
            anyhow::bail!(
                "Shape ({}, {}) requires {} elements, but got {}",
                rows,
                cols,
                rows * cols,
                vec.len()
            );
        }
        let array = Array2::from_shape_vec((rows, cols), vec)?;
        Ok(Self { data: array })
    }

    /// Create a matrix filled with a single value.
    pub fn from_elem(shape: (usize, usize), value: T) -> Self {
        Self {
            data: Array2::from_elem(shape, value),
        }
    }

    /// Create a matrix of zeros.
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            data: Array2::zeros(shape),
        }
    }

    /// Create a matrix of ones.
    pub fn ones(shape: (usize, usize)) -> Self {
        Self {
            data: Array2::ones(shape),
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// Shape as `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.data.nrows(), self.data.ncols())
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<T> {
        &self.data
    }

    /// Mutably borrow the underlying array.
    pub fn as_array_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    /// Get an element, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.data.get((row, col))
    }

    /// Get a mutable element, or `None` when out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.data.get_mut((row, col))
    }
}

impl<T> DenseMatrix<T>
where
    T: Float + NumCast,
{
    /// Create a matrix with uniformly distributed random values in
    /// `[low, high)`.
    ///
    /// Uses `scirs2_core::random` for RNG (never `rand` directly).
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let m = DenseMatrix::<f64>::random_uniform((3, 4), 0.0, 1.0);
    /// assert_eq!(m.shape(), (3, 4));
    /// assert!(m.as_array().iter().all(|&x| (0.0..1.0).contains(&x)));
    /// ```
    pub fn random_uniform(shape: (usize, usize), low: f64, high: f64) -> Self {
        use scirs2_core::random::quick::random_f64;
        let range = high - low;
        let data = Array2::from_shape_fn(shape, |_| {
            T::from(low + random_f64() * range).unwrap()
        });
        Self { data }
    }
}

impl<T> DenseMatrix<T>
where
    T: Float + 'static,
{
    /// Transposed copy of this matrix.
    pub fn transpose(&self) -> Self {
        Self {
            data: self.data.t().to_owned(),
        }
    }

    /// Matrix product `C = A * B`.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner dimensions do not match.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let a = DenseMatrix::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2)).unwrap();
    /// let b = DenseMatrix::from_vec(vec![5.0, 6.0, 7.0, 8.0], (2, 2)).unwrap();
    ///
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c[(0, 0)], 19.0);
    /// assert_eq!(c[(1, 1)], 50.0);
    /// ```
    pub fn matmul(&self, other: &Self) -> anyhow::Result<Self> {
        check_matmul_compatible(self.shape(), other.shape())?;
        Ok(Self {
            data: self.data.dot(&other.data),
        })
    }

    /// Elementwise (Hadamard) product.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ.
    pub fn hadamard(&self, other: &Self) -> anyhow::Result<Self> {
        check_same_shape(self.shape(), other.shape())?;
        Ok(Self {
            data: &self.data * &other.data,
        })
    }

    /// Elementwise difference `A - B`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ.
    pub fn sub(&self, other: &Self) -> anyhow::Result<Self> {
        check_same_shape(self.shape(), other.shape())?;
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    /// Multiply every element by a scalar.
    pub fn scale(&self, alpha: T) -> Self {
        Self {
            data: self.data.mapv(|x| x * alpha),
        }
    }

    /// Elementwise maximum with a scalar.
    ///
    /// `max_scalar(0)` is the projection onto the nonnegative orthant.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_vec(vec![-1.0, 2.0, -3.0, 4.0], (2, 2)).unwrap();
    /// let p = m.max_scalar(0.0);
    /// assert_eq!(p[(0, 0)], 0.0);
    /// assert_eq!(p[(0, 1)], 2.0);
    /// ```
    pub fn max_scalar(&self, threshold: T) -> Self {
        Self {
            data: self.data.mapv(|x| x.max(threshold)),
        }
    }

    /// Elementwise product followed by a full sum: `Σᵢⱼ Aᵢⱼ·Bᵢⱼ`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes differ.
    pub fn mul_sum(&self, other: &Self) -> anyhow::Result<T> {
        check_same_shape(self.shape(), other.shape())?;
        Ok(self
            .data
            .iter()
            .zip(other.data.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Frobenius norm: `√(Σᵢⱼ Aᵢⱼ²)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let m = DenseMatrix::from_vec(vec![3.0, 0.0, 0.0, 4.0], (2, 2)).unwrap();
    /// assert!((m.frobenius_norm() - 5.0_f64).abs() < 1e-10);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Stack another matrix below this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the column counts differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use nnmf_core::DenseMatrix;
    ///
    /// let top = DenseMatrix::<f64>::ones((2, 3));
    /// let bottom = DenseMatrix::<f64>::zeros((1, 3));
    /// let stacked = top.vstack(&bottom).unwrap();
    /// assert_eq!(stacked.shape(), (3, 3));
    /// ```
    pub fn vstack(&self, bottom: &Self) -> anyhow::Result<Self> {
        if self.ncols() != bottom.ncols() {
            anyhow::bail!(
                "Cannot stack matrices with {} and {} columns",
                self.ncols(),
                bottom.ncols()
            );
        }
        let rows = self.nrows() + bottom.nrows();
        let cols = self.ncols();
        let data: Vec<T> = self
            .data
            .iter()
            .chain(bottom.data.iter())
            .copied()
            .collect();
        let array = Array2::from_shape_vec((rows, cols), data)?;
        Ok(Self { data: array })
    }

    /// Exact elementwise equality. False when shapes differ.
    pub fn all_eq(&self, other: &Self) -> bool {
        self.data == other.data
    }

    /// Position of the first negative entry in row-major order, if any.
    pub fn first_negative(&self) -> Option<(usize, usize)> {
        let cols = self.ncols();
        self.data
            .iter()
            .position(|&x| x < T::zero())
            .map(|idx| (idx / cols, idx % cols))
    }
}

impl<T> std::ops::Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[[index.0, index.1]]
    }
}

impl<T> std::ops::IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.data[[index.0, index.1]]
    }
}
