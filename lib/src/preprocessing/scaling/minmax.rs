//! Min-Max Scaler.
//!
//! Transforms features by scaling each feature to a given range (default [0, 1]).
//!
//! ```text
//! X_scaled = (X - X_min) / (X_max - X_min) * (max - min) + min
//! ```
//!
//! # Example
//! ```ignore
//! let scaler = MinMaxScaler::<CpuBackend>::new().with_range(0.0, 1.0);
//! let fitted = scaler.fit(&data)?;
//! let scaled = fitted.transform(&data)?;
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_features, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Configuration for MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Minimum value of the target range.
    pub min: f64,
    /// Maximum value of the target range.
    pub max: f64,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl MinMaxScalerConfig {
    /// sklearn-style repr.
    pub fn describe(&self) -> String {
        if *self == Self::default() {
            "MinMaxScaler()".to_string()
        } else {
            format!("MinMaxScaler(feature_range=({}, {}))", self.min, self.max)
        }
    }
}

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Configuration options.
    pub config: MinMaxScalerConfig,
    /// Minimum of each feature.
    pub min_: Vec<f64>,
    /// Maximum of each feature.
    pub max_: Vec<f64>,
    /// Scale factor for each feature: (max - min) / (feature_max - feature_min).
    pub scale_: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

impl MinMaxScalerParams {
    /// Checks every per-feature vector has `n_features` finite values.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        let n = self.n_features;
        if self.min_.len() != n || self.max_.len() != n || self.scale_.len() != n {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} per-feature values", n),
                got: format!(
                    "min={}, max={}, scale={}",
                    self.min_.len(),
                    self.max_.len(),
                    self.scale_.len()
                ),
            });
        }
        let values = self.min_.iter().chain(&self.max_).chain(&self.scale_);
        if values.into_iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "MinMaxScaler parameters must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// MinMaxScaler transformer (unfitted).
#[derive(Clone)]
pub struct MinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    /// Create a new MinMaxScaler with default range [0, 1].
    pub fn new() -> Self {
        Self {
            config: MinMaxScalerConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set the target range for scaling.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        assert!(max > min, "max must be greater than min");
        self.config.min = min;
        self.config.max = max;
        self
    }
}

impl<B: Backend> Transformer<B> for MinMaxScaler<B> {
    type Params = MinMaxScalerParams;
    type Fitted = FittedMinMaxScaler<B>;

    fn fit(&self, data: &Tensor2D<B>) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit MinMaxScaler on empty data".to_string(),
            ));
        }

        let min_vals = B::to_vec_1d(&B::col_min_2d(&data.data));
        let max_vals = B::to_vec_1d(&B::col_max_2d(&data.data));

        let target_range = self.config.max - self.config.min;
        let scale_vals: Vec<f64> = min_vals
            .iter()
            .zip(max_vals.iter())
            .map(|(&min, &max)| {
                let range = max - min;
                if range == 0.0 {
                    1.0 // Constant feature: scale by 1 to avoid division by zero
                } else {
                    target_range / range
                }
            })
            .collect();

        FittedMinMaxScaler::from_params(MinMaxScalerParams {
            config: self.config.clone(),
            min_: min_vals,
            max_: max_vals,
            scale_: scale_vals,
            n_features: cols,
        })
    }
}

/// Fitted MinMaxScaler ready for inference.
#[derive(Clone)]
pub struct FittedMinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    min_: Tensor1D<B>,
    max_: Tensor1D<B>,
    scale_: Tensor1D<B>,
    n_features: usize,
}

impl<B: Backend> FittedMinMaxScaler<B> {
    /// Get the minimum values for each feature.
    pub fn min(&self) -> &Tensor1D<B> {
        &self.min_
    }

    /// Get the scale factor for each feature.
    pub fn scale(&self) -> &Tensor1D<B> {
        &self.scale_
    }

    /// Get the data range (max - min) for each feature.
    pub fn data_range(&self) -> Tensor1D<B> {
        self.max_.sub(&self.min_)
    }
}

fn to_tensor<B: Backend>(values: &[f64]) -> Tensor1D<B> {
    Tensor1D::new(values.iter().map(|&x| x as f32).collect())
}

impl<B: Backend> FittedTransformer<B> for FittedMinMaxScaler<B> {
    type Params = MinMaxScalerParams;

    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        check_features(data, self.n_features)?;

        // X_scaled = (X - X_min) * scale_ + target_min
        let centered = B::broadcast_sub_1d_to_2d_rows(&data.data, &self.min_.data);
        let scaled = B::broadcast_mul_1d_to_2d_rows(&centered, &self.scale_.data);
        let result = B::add_scalar_2d(&scaled, &B::scalar_f64(self.config.min));

        Ok(Tensor2D::from_backend(result))
    }

    fn extract_params(&self) -> Self::Params {
        MinMaxScalerParams {
            config: self.config.clone(),
            min_: self.min_.to_vec(),
            max_: self.max_.to_vec(),
            scale_: self.scale_.to_vec(),
            n_features: self.n_features,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.validate()?;
        let n = params.n_features;

        Ok(Self {
            min_: to_tensor(&params.min_),
            max_: to_tensor(&params.max_),
            scale_: to_tensor(&params.scale_),
            config: params.config,
            n_features: n,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn n_features_out(&self) -> usize {
        self.n_features
    }
}
