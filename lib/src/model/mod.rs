//! Fitted estimators used at the end of a pipeline.
//!
//! Estimators carry their state in the type system. Only the `Fitted` state
//! exists here: the harness never trains, it reconstructs estimators from
//! stored parameters and predicts.

pub mod linear;

use crate::backend::Backend;
use crate::preprocessing::PreprocessingError;
use crate::serialization::SerializableParams;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains only inference parameters: no optimizer state,
/// loss function, or training hyperparameters.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;

/// Inference interface of a trained model.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Plain-data representation written to disk.
    type ParamsRepr: SerializableParams;

    /// Predict a single sample.
    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle, PreprocessingError>;

    /// Predict every row of a batch.
    fn predict_batch(&self, input: &Self::InputBatch)
        -> Result<Self::OutputBatch, PreprocessingError>;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the model parameters with bincode.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), PreprocessingError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a model saved by [`InferenceModel::save_to_file`].
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::ParamsRepr::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

pub use linear::{LinearModel, LinearRegressionConfig, SerializableLinearParams};
