use super::scalar::Scalar;
use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D tensor representation (`B::Tensor1D`) while carrying
/// phantom type information about its originating backend.
///
/// # Precision semantics
/// - Constructors accept `Vec<f32>`, the precision grading data is stored in
/// - Values are converted to the backend's native precision (`f64` on CPU)
/// - `to_vec()` returns `Vec<f64>` for host interoperability
///
/// # Example
/// ```
/// use regression_grader::backend::{CpuBackend, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0f32, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
/// assert_eq!(x.mean().to_f64(), 2.0);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from a vector of `f32` values.
    pub fn new(data: Vec<f32>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros of specified length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    /// Computes element-wise subtraction: `self - other`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            data: B::sub_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Computes the arithmetic mean of all elements in the tensor.
    pub fn mean(&self) -> Scalar<B> {
        Scalar {
            data: B::mean_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Computes the sum of all elements in the tensor.
    pub fn sum(&self) -> Scalar<B> {
        Scalar {
            data: B::sum_all_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Converts the tensor to a standard Rust `Vec<f64>`.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Computes the dot product between two tensors.
    ///
    /// # Example
    /// ```
    /// use regression_grader::backend::{CpuBackend, Tensor1D};
    ///
    /// let a = Tensor1D::<CpuBackend>::new(vec![1.0f32, 2.0, 3.0]);
    /// let b = Tensor1D::<CpuBackend>::new(vec![4.0f32, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b).to_f64(), 32.0);
    /// ```
    pub fn dot(&self, other: &Self) -> Scalar<B> {
        let prod = B::mul_1d(&self.data, &other.data);
        Scalar {
            data: B::sum_all_1d(&prod),
            backend: PhantomData,
        }
    }

    /// Element-wise product.
    pub fn mul(&self, other: &Self) -> Self {
        Self {
            data: B::mul_1d(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Computes element-wise absolute value.
    pub fn abs(&self) -> Self {
        Self {
            data: B::abs_1d(&self.data),
            backend: PhantomData,
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds a scalar to every element.
    pub fn add_scalar(&self, a: &Scalar<B>) -> Self {
        Self {
            data: B::add_scalar_1d(&self.data, &a.data),
            backend: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_sub_abs_mean() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 5.0, 2.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0, 2.0]);
        let err = a.sub(&b).abs();
        assert_eq!(err.to_vec(), vec![1.0, 2.0, 0.0]);
        assert_eq!(err.mean().to_f64(), 1.0);
        assert_eq!(err.sum().to_f64(), 3.0);
    }

    #[test]
    fn test_add_scalar() {
        let a = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let shifted = a.add_scalar(&Scalar::new(0.5));
        assert_eq!(shifted.to_vec(), vec![1.5, 2.5]);
    }

    #[test]
    fn test_zeros_is_empty() {
        assert!(Tensor1D::<CpuBackend>::zeros(0).is_empty());
        assert_eq!(Tensor1D::<CpuBackend>::zeros(2).to_vec(), vec![0.0, 0.0]);
    }
}
