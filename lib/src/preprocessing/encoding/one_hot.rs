//! One-hot encoding for categorical features.
//!
//! Transforms categorical integer values to one-hot (dummy) encoded vectors.

use crate::backend::{Backend, Tensor2D};
use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_features, FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::marker::PhantomData;

/// Hyperparameters of a [`OneHotEncoder`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderConfig {
    /// How to handle unknown categories during transform.
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoderConfig {
    /// sklearn-style repr, e.g. `OneHotEncoder(handle_unknown='ignore')`.
    pub fn describe(&self) -> String {
        match self.handle_unknown {
            HandleUnknown::Error => "OneHotEncoder()".to_string(),
            other => format!("OneHotEncoder(handle_unknown='{}')", other.as_str()),
        }
    }
}

/// One-hot encoder for categorical features.
///
/// Each input column is treated as a categorical feature; the encoder learns
/// the sorted unique codes present in each column during fitting.
///
/// # Example
/// ```ignore
/// let data = Tensor2D::new(vec![0.0, 1.0, 2.0], 3, 1);
/// let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data)?;
///
/// // [[1, 0, 0],
/// //  [0, 1, 0],
/// //  [0, 0, 1]]
/// let encoded = fitted.transform(&data)?;
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder<B: Backend> {
    config: OneHotEncoderConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> OneHotEncoder<B> {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self {
            config: OneHotEncoderConfig::default(),
            _backend: PhantomData,
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.config.handle_unknown = strategy;
        self
    }
}

impl<B: Backend> Default for OneHotEncoder<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Categories (sorted unique codes) for each input column.
    pub categories_: Vec<Vec<f32>>,
    /// Number of input features.
    pub n_features_in: usize,
    /// Handle unknown strategy.
    pub handle_unknown: HandleUnknown,
}

impl OneHotEncoderParams {
    /// Checks there is one strictly increasing category list per input column.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.categories_.len() != self.n_features_in {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} category lists", self.n_features_in),
                got: format!("{} category lists", self.categories_.len()),
            });
        }
        for (col, cats) in self.categories_.iter().enumerate() {
            if cats.is_empty() {
                return Err(PreprocessingError::EmptyData(format!(
                    "Column {} has no categories",
                    col
                )));
            }
            if cats.windows(2).any(|w| !(w[0] < w[1])) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "Categories of column {} must be sorted and unique",
                    col
                )));
            }
        }
        Ok(())
    }
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone)]
pub struct FittedOneHotEncoder<B: Backend> {
    categories_: Vec<Vec<f32>>,
    /// Number of output columns contributed by each input column.
    n_values_: Vec<usize>,
    n_features_out: usize,
    n_features_in: usize,
    handle_unknown: HandleUnknown,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedOneHotEncoder<B> {
    /// Get the categories learned for each feature.
    pub fn categories(&self) -> &[Vec<f32>] {
        &self.categories_
    }

    /// Get the number of categories per input feature.
    pub fn n_values(&self) -> &[usize] {
        &self.n_values_
    }
}

fn check_code(val: f32, row: usize, col: usize) -> Result<i64, PreprocessingError> {
    if !val.is_finite() || val < 0.0 || val.fract() != 0.0 {
        return Err(PreprocessingError::InvalidParameter(format!(
            "OneHotEncoder expects non-negative integer values, got {} at ({}, {})",
            val, row, col
        )));
    }
    Ok(val as i64)
}

impl<B: Backend> Transformer<B> for OneHotEncoder<B> {
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder<B>;

    fn fit(&self, data: &Tensor2D<B>) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let data_vec = data.ravel().to_vec();
        let mut categories_: Vec<Vec<f32>> = Vec::with_capacity(cols);

        for col in 0..cols {
            let mut col_cats: BTreeSet<i64> = BTreeSet::new();
            for row in 0..rows {
                col_cats.insert(check_code(data_vec[row * cols + col] as f32, row, col)?);
            }
            categories_.push(col_cats.into_iter().map(|x| x as f32).collect());
        }

        FittedOneHotEncoder::from_params(OneHotEncoderParams {
            categories_,
            n_features_in: cols,
            handle_unknown: self.config.handle_unknown,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedOneHotEncoder<B> {
    type Params = OneHotEncoderParams;

    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        check_features(data, self.n_features_in)?;
        let (rows, cols) = data.shape();

        if rows == 0 {
            return Ok(Tensor2D::zeros(0, self.n_features_out));
        }

        let data_vec = data.ravel().to_vec();
        let mut result = vec![0.0f32; rows * self.n_features_out];

        for row in 0..rows {
            let mut out_col_offset = 0;
            for col in 0..cols {
                let val = data_vec[row * cols + col] as f32;
                let cats = &self.categories_[col];

                match cats.iter().position(|&c| (c - val).abs() < 1e-6) {
                    Some(idx) => {
                        result[row * self.n_features_out + out_col_offset + idx] = 1.0;
                    }
                    None if self.handle_unknown == HandleUnknown::Error => {
                        return Err(PreprocessingError::InvalidParameter(format!(
                            "Unknown category {} in column {}",
                            val, col
                        )));
                    }
                    // With Ignore, leave as zeros
                    None => {}
                }

                out_col_offset += self.n_values_[col];
            }
        }

        Ok(Tensor2D::new(result, rows, self.n_features_out))
    }

    fn extract_params(&self) -> Self::Params {
        OneHotEncoderParams {
            categories_: self.categories_.clone(),
            n_features_in: self.n_features_in,
            handle_unknown: self.handle_unknown,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.validate()?;
        let n_values_: Vec<usize> = params.categories_.iter().map(Vec::len).collect();
        let n_features_out = n_values_.iter().sum();

        Ok(FittedOneHotEncoder {
            categories_: params.categories_,
            n_values_,
            n_features_out,
            n_features_in: params.n_features_in,
            handle_unknown: params.handle_unknown,
            _backend: PhantomData,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.n_features_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_one_hot_encoder_single_column() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0], 3, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_in(), 1);
        assert_eq!(fitted.n_features_out(), 3);
        assert_eq!(fitted.categories()[0], vec![0.0f32, 1.0, 2.0]);

        let vals = fitted.transform(&data).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_missing_category() {
        // category 1 never appears
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 2.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_features_out(), 2);
        assert_eq!(fitted.categories()[0], vec![0.0f32, 2.0]);

        let vals = fitted.transform(&data).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_multiple_columns() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0, 0.0, 1.0, 0.0], 3, 2);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        assert_eq!(fitted.n_values(), &[3, 2]);
        assert_eq!(fitted.n_features_out(), 5);

        let vals = fitted.transform(&data).unwrap().ravel().to_vec();
        // row 0: col0=0 -> [1,0,0], col1=1 -> [0,1]
        assert_eq!(&vals[..5], &[1.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_encoder_unknown_error() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0], 2, 1);
        let test = Tensor2D::<CpuBackend>::new(vec![2.0f32], 1, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_one_hot_encoder_unknown_ignore() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0], 2, 1);
        let test = Tensor2D::<CpuBackend>::new(vec![2.0f32], 1, 1);

        let fitted = OneHotEncoder::<CpuBackend>::new()
            .with_handle_unknown(HandleUnknown::Ignore)
            .fit(&train)
            .unwrap();

        let vals = fitted.transform(&test).unwrap().ravel().to_vec();
        assert_eq!(vals, vec![0.0, 0.0]);
    }

    #[test]
    fn test_one_hot_encoder_invalid_codes() {
        for bad in [-1.0f32, 0.5, f32::NAN] {
            let data = Tensor2D::<CpuBackend>::new(vec![bad, 1.0], 2, 1);
            assert!(OneHotEncoder::<CpuBackend>::new().fit(&data).is_err());
        }
    }

    #[test]
    fn test_one_hot_encoder_empty_data() {
        let data = Tensor2D::<CpuBackend>::zeros(0, 2);
        assert!(matches!(
            OneHotEncoder::<CpuBackend>::new().fit(&data),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_one_hot_encoder_empty_transform() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0], 2, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        let result = fitted.transform(&Tensor2D::zeros(0, 1)).unwrap();
        assert_eq!(result.shape(), (0, 2));
    }

    #[test]
    fn test_one_hot_encoder_feature_mismatch() {
        let train = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0, 3.0], 2, 2);
        let test = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0], 1, 3);

        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&train).unwrap();
        assert!(matches!(
            fitted.transform(&test),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_one_hot_encoder_params_roundtrip() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0], 3, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        let params = fitted.extract_params();
        assert_eq!(params.n_features_in, 1);
        assert_eq!(params.categories_[0], vec![0.0f32, 1.0, 2.0]);

        let restored = FittedOneHotEncoder::<CpuBackend>::from_params(params).unwrap();
        assert_eq!(restored.n_features_out(), 3);
    }

    #[test]
    fn test_one_hot_encoder_from_params_inconsistent() {
        let params = OneHotEncoderParams {
            categories_: vec![vec![0.0f32, 1.0]],
            n_features_in: 2,
            handle_unknown: HandleUnknown::Error,
        };
        assert!(FittedOneHotEncoder::<CpuBackend>::from_params(params).is_err());
    }

    #[test]
    fn test_one_hot_encoder_save_load_file() {
        let data = Tensor2D::<CpuBackend>::new(vec![0.0f32, 1.0, 2.0], 3, 1);
        let fitted = OneHotEncoder::<CpuBackend>::new().fit(&data).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("onehot.bin");
        fitted.save_to_file(&path).unwrap();

        let loaded = FittedOneHotEncoder::<CpuBackend>::load_from_file(&path).unwrap();
        assert_eq!(loaded.categories(), fitted.categories());
    }

    #[test]
    fn test_params_validate_categories() {
        let mut params = OneHotEncoderParams {
            categories_: vec![vec![0.0f32, 1.0], vec![2.0]],
            n_features_in: 2,
            handle_unknown: HandleUnknown::Error,
        };
        params.validate().unwrap();

        params.categories_[0] = vec![1.0, 0.0];
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::InvalidParameter(_))
        ));

        params.categories_[0] = vec![];
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_config_describe() {
        assert_eq!(OneHotEncoderConfig::default().describe(), "OneHotEncoder()");
        let ignore = OneHotEncoderConfig {
            handle_unknown: HandleUnknown::Ignore,
        };
        assert_eq!(ignore.describe(), "OneHotEncoder(handle_unknown='ignore')");
    }
}
