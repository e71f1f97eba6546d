//! Linear regression for inference.
//!
//! - [`LinearRegressionConfig`]: hyperparameters recorded in a pipeline template.
//! - [`LinearModel<B, Fitted>`]: inference-only, serializable predictor `y = X·w + b`.
//!
//! Works with any backend implementing [`Backend`].

pub use crate::backend::scalar::{Scalar, ScalarOps};
pub use crate::backend::tensor1d::Tensor1D;
pub use crate::backend::tensor2d::Tensor2D;
pub use crate::backend::Backend;
pub use crate::model::{Fitted, InferenceModel};
use crate::preprocessing::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Hyperparameters of an unfitted linear regression stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionConfig {
    pub fit_intercept: bool,
}

impl Default for LinearRegressionConfig {
    fn default() -> Self {
        Self {
            fit_intercept: true,
        }
    }
}

impl LinearRegressionConfig {
    /// sklearn-style repr.
    pub fn describe(&self) -> String {
        if self.fit_intercept {
            "LinearRegression()".to_string()
        } else {
            "LinearRegression(fit_intercept=False)".to_string()
        }
    }
}

/// Parameters of a linear model: weights and bias.
#[derive(Clone)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

/// Serializable representation of linear model parameters.
///
/// Converts internal backend-specific tensors into plain `Vec<f32>` for storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f32>,
    pub bias: f32,
}

impl SerializableLinearParams {
    /// Checks there is at least one weight and every value is finite.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.weights.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Linear model has no weights".to_string(),
            ));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "Linear model parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        let weights = params
            .weights
            .to_vec()
            .into_iter()
            .map(|x| x as f32)
            .collect();
        let bias = params.bias.to_f64() as f32;
        Self { weights, bias }
    }
}

impl<B: Backend> TryFrom<SerializableLinearParams> for LinearParams<B> {
    type Error = PreprocessingError;

    fn try_from(value: SerializableLinearParams) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            weights: Tensor1D::<B>::new(value.weights),
            bias: Scalar::<B>::new(value.bias as f64),
        })
    }
}

/// A linear model with state encoded at the type level.
///
/// With `S = Fitted` it implements [`InferenceModel`] and can be serialized
/// or used for prediction.
#[derive(Clone)]
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend> LinearModel<B, Fitted> {
    /// Creates a fitted linear model from trained parameters.
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData::<Fitted>,
        }
    }

    /// Number of features the weights expect.
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    pub fn params(&self) -> &LinearParams<B> {
        &self.params
    }
}

/// Implements inference for a trained linear model: `y = w^T x + b`.
///
/// - Single-sample input: [`Tensor1D<B>`] → output: [`Scalar<B>`]
/// - Batch input: [`Tensor2D<B>`] → output: [`Tensor1D<B>`]
impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle, PreprocessingError> {
        if input.len() != self.n_features() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: input.len(),
            });
        }
        Ok(self.params.weights.dot(input) + self.params.bias)
    }

    fn predict_batch(
        &self,
        input: &Self::InputBatch,
    ) -> Result<Self::OutputBatch, PreprocessingError> {
        let (_, cols) = input.shape();
        if cols != self.n_features() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: cols,
            });
        }
        Ok(input
            .dot(&self.params.weights)
            .add_scalar(&self.params.bias))
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, PreprocessingError> {
        let internal_params = LinearParams::<B>::try_from(params)?;
        Ok(Self::new(internal_params))
    }
}
