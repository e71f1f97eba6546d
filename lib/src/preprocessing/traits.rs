//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted, carries hyperparameters and learns from data.
//! - [`SupervisedTransformer`]: like [`Transformer`] but needs the target to fit.
//! - [`FittedTransformer`]: after fitting; ready for inference and serialization.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Type Parameters
/// - `B`: The backend (e.g., `CpuBackend`) used for computation.
/// - `Params`: Serializable representation of learned parameters.
/// - `Fitted`: The corresponding fitted transformer type.
pub trait Transformer<B: Backend>: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<B, Params = Self::Params>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if data is empty, contains invalid values,
    /// or has a shape the transformer cannot handle.
    fn fit(&self, data: &Tensor2D<B>) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Transformers whose fit depends on the regression target (feature selectors).
pub trait SupervisedTransformer<B: Backend>: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<B, Params = Self::Params>;

    /// Fit using features and the aligned target vector.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidShape`] if `target.len()` differs
    /// from the number of rows.
    fn fit(
        &self,
        data: &Tensor2D<B>,
        target: &Tensor1D<B>,
    ) -> Result<Self::Fitted, PreprocessingError>;
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` use the same bincode encoding as model artifacts.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the input shape doesn't match the
    /// number of features seen during fit, or the input contains values the
    /// transformer cannot map.
    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of features produced by `transform`.
    fn n_features_out(&self) -> usize;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

/// Checks the column count of `data` against what a transformer was fitted on.
pub(crate) fn check_features<B: Backend>(
    data: &Tensor2D<B>,
    expected: usize,
) -> Result<(), PreprocessingError> {
    let (_, cols) = data.shape();
    if cols != expected {
        return Err(PreprocessingError::FeatureMismatch {
            expected_features: expected,
            got_features: cols,
        });
    }
    Ok(())
}
