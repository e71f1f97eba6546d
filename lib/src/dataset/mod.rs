//! Dataset abstractions for grading.
//!
//! This module provides a generic [`Dataset`] trait for uniform access to
//! `(X, y)` pairs and the on-disk frames the grading files hold.
//!
//! # Core Concepts
//!
//! - **Dataset**: a source of `(X, y)` pairs where `X` is a feature matrix of
//!   shape `(n_samples, n_features)` and `y` is a target vector of shape `(n_samples,)`.
//! - **Split**: one feature frame and its target, e.g. the held-out test set.
//!
//! # Example
//!
//! ```rust
//! use regression_grader::dataset::{Dataset, FeatureFrame, LabeledSplit, TargetSeries};
//! use regression_grader::backend::CpuBackend;
//!
//! let x = FeatureFrame::from_rows(vec!["price".into()], &[vec![1.0], vec![2.0]]).unwrap();
//! let y = TargetSeries::new("selling_price", vec![0.5, 1.0]);
//! let split = LabeledSplit::new(x, y);
//!
//! let (x, y) = split.to_tensors::<CpuBackend>().unwrap();
//! assert_eq!(x.shape(), (2, 1));
//! assert_eq!(y.len(), 2);
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::PreprocessingError;
use std::{fmt::Debug, ops::Range};

pub mod frame;
pub use self::frame::{FeatureFrame, TargetSeries};

/// Abstract interface for a labeled dataset.
///
/// # Associated Types
///
/// - `Error`: error type returned when accessing data (must implement [`Debug`])
pub trait Dataset {
    /// Error type returned when accessing data.
    type Error: Debug + 'static;

    /// Returns the total number of samples in the dataset, if known.
    fn len(&self) -> Option<usize>;

    /// Checks whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Fetches a contiguous range of samples as tensors.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error>;

    /// Fetches every sample at once.
    fn to_tensors<B: Backend>(&self) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        self.get_batch(0..self.len().unwrap_or(0))
    }
}

/// Features paired with their target.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSplit {
    pub x: FeatureFrame,
    pub y: TargetSeries,
}

impl LabeledSplit {
    pub fn new(x: FeatureFrame, y: TargetSeries) -> Self {
        Self { x, y }
    }
}

impl Dataset for LabeledSplit {
    type Error = PreprocessingError;

    fn len(&self) -> Option<usize> {
        Some(self.x.n_rows)
    }

    /// # Errors
    /// [`PreprocessingError::InvalidShape`] if the target and feature row
    /// counts differ or `range` runs past the end.
    fn get_batch<B: Backend>(
        &self,
        range: Range<usize>,
    ) -> Result<(Tensor2D<B>, Tensor1D<B>), Self::Error> {
        if self.y.len() != self.x.n_rows {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("target '{}' with {} rows", self.y.name, self.x.n_rows),
                got: format!("{} rows", self.y.len()),
            });
        }
        if range.start > range.end || range.end > self.x.n_rows {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("rows within 0..{}", self.x.n_rows),
                got: format!("{:?}", range),
            });
        }
        Ok((self.x.tensor_rows(range.clone())?, self.y.tensor_rows(range)))
    }
}

/// The held-out data the harness scores on.
#[derive(Clone, Debug, PartialEq)]
pub struct GradingData {
    pub train: LabeledSplit,
    pub test: LabeledSplit,
}
