//! On-disk grading frames.
//!
//! Both types are bincode-encoded and validated on load, so a frame that
//! decodes is always rectangular.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::PreprocessingError;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::path::Path;

/// Row-major feature matrix with column names.
///
/// Categorical columns hold non-negative integer codes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub n_rows: usize,
    pub n_cols: usize,
    pub data: Vec<f32>,
}

impl FeatureFrame {
    /// Builds a frame from rows.
    ///
    /// ```
    /// use regression_grader::dataset::FeatureFrame;
    ///
    /// let frame = FeatureFrame::from_rows(
    ///     vec!["fuel".into(), "price".into()],
    ///     &[vec![0.0, 5.6], vec![1.0, 9.5]],
    /// ).unwrap();
    /// assert_eq!((frame.n_rows, frame.n_cols), (2, 2));
    /// ```
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f32>]) -> Result<Self, PreprocessingError> {
        let n_cols = columns.len();
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        let frame = Self {
            columns,
            n_rows: rows.len(),
            n_cols,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.columns.len() != self.n_cols {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} column names", self.n_cols),
                got: format!("{} column names", self.columns.len()),
            });
        }
        if self.n_values()? != self.data.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{}x{} values", self.n_rows, self.n_cols),
                got: format!("{} values", self.data.len()),
            });
        }
        Ok(())
    }

    fn n_values(&self) -> Result<usize, PreprocessingError> {
        self.n_rows
            .checked_mul(self.n_cols)
            .ok_or_else(|| PreprocessingError::InvalidShape {
                expected: "a frame size that fits in memory".to_string(),
                got: format!("{}x{}", self.n_rows, self.n_cols),
            })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        let frame = Self::from_bytes(&bytes)?;
        frame.validate()?;
        Ok(frame)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Copies `rows` into a backend tensor.
    pub fn tensor_rows<B: Backend>(
        &self,
        rows: Range<usize>,
    ) -> Result<Tensor2D<B>, PreprocessingError> {
        let out_of_range = || PreprocessingError::InvalidShape {
            expected: format!("rows within 0..{}", self.n_rows),
            got: format!("{:?}", rows),
        };
        let start = rows.start.checked_mul(self.n_cols).ok_or_else(out_of_range)?;
        let end = rows.end.checked_mul(self.n_cols).ok_or_else(out_of_range)?;
        let values = self.data.get(start..end).ok_or_else(out_of_range)?;
        Ok(Tensor2D::new(values.to_vec(), rows.len(), self.n_cols))
    }
}

/// Named regression target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetSeries {
    pub name: String,
    pub values: Vec<f32>,
}

impl TargetSeries {
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(&bytes)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn tensor_rows<B: Backend>(&self, rows: Range<usize>) -> Tensor1D<B> {
        Tensor1D::new(self.values[rows].to_vec())
    }
}
