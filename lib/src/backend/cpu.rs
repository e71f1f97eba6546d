use super::Backend;
use crate::preprocessing::PreprocessingError;

/// Pure-Rust CPU backend. Stores everything as `f64`.
#[derive(Clone, Debug, Copy)]
pub struct CpuBackend;

/// Row-major matrix: `(data, rows, cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuTensor2D(pub Vec<f64>, pub usize, pub usize);

impl CpuTensor2D {
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        assert_eq!(data.len(), rows * cols, "Inconsistent shape");
        Self(data, rows, cols)
    }

    fn map_rows(&self, v: &[f64], op: impl Fn(f64, f64) -> f64) -> Self {
        let CpuTensor2D(data, rows, cols) = self;
        assert_eq!(v.len(), *cols, "Broadcast vector must have one entry per column");
        let out = data
            .chunks(*cols.max(&1))
            .flat_map(|row| row.iter().zip(v).map(|(&x, &y)| op(x, y)))
            .collect();
        CpuTensor2D::new(out, *rows, *cols)
    }

    fn col_fold(&self, init: f64, op: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        let CpuTensor2D(data, rows, cols) = self;
        let mut acc = vec![init; *cols];
        for i in 0..*rows {
            for (j, slot) in acc.iter_mut().enumerate() {
                *slot = op(*slot, data[i * cols + j]);
            }
        }
        acc
    }
}

impl From<&[Vec<f64>]> for CpuTensor2D {
    fn from(x: &[Vec<f64>]) -> Self {
        if x.is_empty() {
            return CpuTensor2D::new(Vec::new(), 0, 0);
        }
        let rows = x.len();
        let cols = x[0].len();
        assert!(
            x.iter().all(|row| row.len() == cols),
            "All rows must have same length"
        );
        let data: Vec<f64> = x.iter().flat_map(|row| row.iter()).copied().collect();
        CpuTensor2D::new(data, rows, cols)
    }
}

impl Backend for CpuBackend {
    type Scalar = f64;
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    // --- Constructors ---
    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.; len]
    }

    fn zeros_2d(rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(vec![0.; rows * cols], rows, cols)
    }

    fn from_vec_1d(data: Vec<f32>) -> Self::Tensor1D {
        data.into_iter().map(f64::from).collect()
    }

    fn from_vec_2d(data: Vec<f32>, rows: usize, cols: usize) -> Self::Tensor2D {
        CpuTensor2D::new(data.into_iter().map(f64::from).collect(), rows, cols)
    }

    // --- Element-wise ops ---
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a - b).collect()
    }

    fn mul_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "Length mismatch");
        a.iter().zip(b.iter()).map(|(a, b)| a * b).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: &Self::Scalar) -> Self::Tensor1D {
        t.iter().map(|x| x + s).collect()
    }

    fn abs_1d(t: &Self::Tensor1D) -> Self::Tensor1D {
        t.iter().map(|x| x.abs()).collect()
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: &Self::Scalar) -> Self::Tensor2D {
        CpuTensor2D::new(t.0.iter().map(|x| *x + s).collect(), t.1, t.2)
    }

    // --- Reductions ---
    fn mean_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>() / t.len() as f64
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> Self::Scalar {
        t.iter().sum::<f64>()
    }

    fn scalar_f64(value: f64) -> Self::Scalar {
        value
    }

    // --- Access ---
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.1, t.2)
    }

    fn ravel_2d(x: &Self::Tensor2D) -> Self::Tensor1D {
        x.0.clone()
    }

    fn matvec(a: &CpuTensor2D, x: &Vec<f64>) -> Vec<f64> {
        let CpuTensor2D(data, rows, cols) = a;
        assert_eq!(*cols, x.len(), "matvec: A.cols() != x.len()");
        let mut result = Vec::with_capacity(*rows);
        for i in 0..*rows {
            let mut sum = 0.0;
            for j in 0..*cols {
                sum += data[i * *cols + j] * x[j];
            }
            result.push(sum);
        }
        result
    }

    // --- Column-wise ---
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.col_fold(f64::INFINITY, f64::min)
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.col_fold(f64::NEG_INFINITY, f64::max)
    }

    // --- Broadcasting ---
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, y| x - y)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, y| x * y)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, y| x / y)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t.map_rows(v, |x, y| x + y)
    }

    // --- Column manipulation ---
    fn hcat_2d(tensors: &[Self::Tensor2D]) -> Result<Self::Tensor2D, PreprocessingError> {
        let Some(first) = tensors.first() else {
            return Err(PreprocessingError::EmptyData(
                "Cannot concatenate an empty list of tensors".to_string(),
            ));
        };
        let rows = first.1;
        if let Some(bad) = tensors.iter().find(|t| t.1 != rows) {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", rows),
                got: format!("{} rows", bad.1),
            });
        }

        let total_cols: usize = tensors.iter().map(|t| t.2).sum();
        let mut data = Vec::with_capacity(rows * total_cols);
        for i in 0..rows {
            for t in tensors {
                data.extend_from_slice(&t.0[i * t.2..(i + 1) * t.2]);
            }
        }
        Ok(CpuTensor2D::new(data, rows, total_cols))
    }

    fn select_columns_2d(t: &Self::Tensor2D, columns: &[usize]) -> Self::Tensor2D {
        let CpuTensor2D(data, rows, cols) = t;
        assert!(
            columns.iter().all(|&c| c < *cols),
            "Column index out of bounds"
        );
        let mut out = Vec::with_capacity(rows * columns.len());
        for i in 0..*rows {
            for &c in columns {
                out.push(data[i * cols + c]);
            }
        }
        CpuTensor2D::new(out, *rows, columns.len())
    }
}
