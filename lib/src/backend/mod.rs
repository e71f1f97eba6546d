//! # Backend Abstraction
//!
//! This module provides a trait-based abstraction over computation backends so
//! that fitted transformers and models can evaluate on any tensor storage
//! without code changes.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations inference needs are exposed
//!   (broadcasting for scalers, column selection for feature selectors,
//!   matrix-vector products for linear models).
//! - **Zero-cost generics**: backend selection happens at compile time via type
//!   parameters, avoiding runtime dispatch overhead.
//! - **Type-safe tensor handling**: each backend defines its own tensor types
//!   which are wrapped by [`Tensor1D`] and [`Tensor2D`].
//!
//! ## Available Backends
//!
//! | Backend      | Feature | Use Case                          |
//! |--------------|---------|-----------------------------------|
//! | `CpuBackend` | `cpu`   | Default, pure-Rust implementation |
//!
//! ## Example
//!
//! ```rust
//! use regression_grader::backend::{CpuBackend, Tensor1D, Tensor2D};
//!
//! let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0]);
//! let w: Tensor2D<CpuBackend> = Tensor2D::new(vec![0.5, 0.5, 0.5, 0.5], 2, 2);
//!
//! let y = w.dot(&x);
//! assert_eq!(y.to_vec(), vec![1.5, 1.5]);
//! ```

use crate::preprocessing::PreprocessingError;

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
/// Pure-Rust CPU backend implementation with zero external dependencies.
pub use cpu::{CpuBackend, CpuTensor2D};

/// Scalar value representation and arithmetic operations.
pub mod scalar;
/// One-dimensional tensor abstraction.
pub mod tensor1d;
/// Two-dimensional tensor abstraction.
pub mod tensor2d;

pub use scalar::{Scalar, ScalarOps};
pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the operations needed for inference.
///
/// # Type Parameters
///
/// - `Scalar`: Primitive numeric type with arithmetic capabilities
/// - `Tensor1D`: One-dimensional array representation
/// - `Tensor2D`: Two-dimensional, row-major matrix representation
///
/// # Safety Guarantees
///
/// - Shape-checked operations (`matvec`, broadcasting) panic on mismatch;
///   callers in this crate validate shapes first and surface a
///   [`PreprocessingError`] instead.
/// - Tensor types are `Clone + Send + Sync`.
pub trait Backend: Clone + Copy + 'static {
    /// Scalar type supporting arithmetic operations.
    type Scalar: ScalarOps + Clone;

    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Creates a 2D tensor filled with zeros of given dimensions.
    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Element-wise operations (1D) ---

    /// Element-wise subtraction of two 1D tensors.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Element-wise multiplication of two 1D tensors.
    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Adds a scalar to each element of tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D;

    /// Element-wise absolute value.
    fn abs_1d(t: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Element-wise operations (2D) ---

    /// Adds a scalar to each element of 2D tensor.
    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D;

    // --- Reductions ---

    /// Computes the arithmetic mean of all elements in a 1D tensor.
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    /// Computes the sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar;

    // --- Scalar operations ---

    /// Creates a backend-specific scalar from an f64 value.
    fn scalar_f64(value: f64) -> Self::Scalar;

    // --- Data access ---

    /// Converts a 1D tensor to a Vec of f64 values.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Flattens a 2D tensor into a 1D tensor in row-major order.
    fn ravel_2d(x: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Linear algebra ---

    /// Matrix-vector multiplication `y = A * x`.
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Column-wise operations (for preprocessing) ---

    /// Minimum value of each column, as a 1D tensor of length `cols`.
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Maximum value of each column, as a 1D tensor of length `cols`.
    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Broadcasting operations ---

    /// `Result[i, j] = t[i, j] - v[j]`
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] * v[j]`
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] / v[j]`
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// `Result[i, j] = t[i, j] + v[j]`
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    // --- Column manipulation operations ---

    /// Horizontally concatenate 2D tensors (stack columns side by side).
    ///
    /// All input tensors must have the same number of rows.
    ///
    /// ```ignore
    /// // [[1, 2]] + [[3]] -> [[1, 2, 3]]
    /// let c = B::hcat_2d(&[a, b])?; // shape (1, 3)
    /// ```
    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError>;

    /// Extract specific columns from a 2D tensor, preserving row order.
    ///
    /// # Panics
    /// Panics if any column index is out of bounds.
    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D;
}
