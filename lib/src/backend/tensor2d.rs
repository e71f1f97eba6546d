use super::tensor1d::Tensor1D;
use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use std::marker::PhantomData;

/// Backend-typed, row-major 2D tensor.
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a tensor from row-major `f32` data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: B::zeros_2d(rows, cols),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_backend(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Matrix-vector product `self · other`.
    pub fn dot(&self, other: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D {
            data: B::matvec(&self.data, &other.data),
            backend: PhantomData,
        }
    }

    /// Flattens into a row-major 1D tensor.
    pub fn ravel(&self) -> Tensor1D<B> {
        Tensor1D {
            data: B::ravel_2d(&self.data),
            backend: PhantomData,
        }
    }

    /// Keeps the given columns, in the given order.
    pub fn select_columns(&self, columns: &[usize]) -> Result<Self, PreprocessingError> {
        let (_, cols) = self.shape();
        if let Some(&bad) = columns.iter().find(|&&c| c >= cols) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "Column index {} out of bounds for {} columns",
                bad, cols
            )));
        }
        Ok(Self::from_backend(B::select_columns_2d(&self.data, columns)))
    }

    /// Stacks tensors side by side.
    pub fn hcat(tensors: &[Self]) -> Result<Self, PreprocessingError> {
        let raw: Vec<B::Tensor2D> = tensors.iter().map(|t| t.data.clone()).collect();
        B::hcat_2d(&raw).map(Self::from_backend)
    }

    /// Copies a single column out as a 1D tensor.
    pub fn column(&self, index: usize) -> Result<Tensor1D<B>, PreprocessingError> {
        Ok(self.select_columns(&[index])?.ravel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_shape_and_dot() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
        assert_eq!(m.shape(), (3, 2));
        let y = m.dot(&Tensor1D::new(vec![1.0, -1.0]));
        assert_eq!(y.to_vec(), vec![-1.0, -1.0, -1.0]);
    }

    #[test]
    fn test_select_columns_out_of_bounds() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0], 1, 2);
        assert!(matches!(
            m.select_columns(&[2]),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_column_and_hcat() {
        let m = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
        assert_eq!(m.column(1).unwrap().to_vec(), vec![2.0, 4.0]);

        let swapped = Tensor2D::hcat(&[
            m.select_columns(&[1]).unwrap(),
            m.select_columns(&[0]).unwrap(),
        ])
        .unwrap();
        assert_eq!(swapped.ravel().to_vec(), vec![2.0, 1.0, 4.0, 3.0]);
    }
}
