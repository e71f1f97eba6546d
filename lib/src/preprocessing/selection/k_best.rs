//! Univariate feature selection.
//!
//! [`SelectKBest`] scores every column against the regression target with
//! [`f_regression`] and keeps the `k` highest-scoring columns.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{check_features, FittedTransformer, SupervisedTransformer};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Number of features to keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KSelection {
    /// Keep every feature.
    All,
    /// Keep the `k` best features.
    K(usize),
}

impl Default for KSelection {
    fn default() -> Self {
        KSelection::K(10)
    }
}

/// Univariate scoring function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFunc {
    /// F-statistic of a univariate linear regression.
    #[default]
    FRegression,
}

impl ScoreFunc {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreFunc::FRegression => "f_regression",
        }
    }
}

/// Hyperparameters of a [`SelectKBest`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectKBestConfig {
    pub k: KSelection,
    pub score_func: ScoreFunc,
}

impl SelectKBestConfig {
    /// sklearn-style repr, e.g. `SelectKBest(k=2, score_func=f_regression)`.
    pub fn describe(&self) -> String {
        let k = match self.k {
            KSelection::All => "'all'".to_string(),
            KSelection::K(k) => k.to_string(),
        };
        format!(
            "SelectKBest(k={}, score_func={})",
            k,
            self.score_func.as_str()
        )
    }
}

/// F-statistic of each column against `target`.
///
/// ```text
/// r = cov(x, y) / (std(x) * std(y))
/// F = r² / (1 - r²) * (n - 2)
/// ```
///
/// Columns with zero variance score 0. A perfectly correlated column scores
/// `f64::INFINITY`.
pub fn f_regression<B: Backend>(
    data: &Tensor2D<B>,
    target: &Tensor1D<B>,
) -> Result<Vec<f64>, PreprocessingError> {
    let (rows, cols) = data.shape();
    if rows != target.len() {
        return Err(PreprocessingError::InvalidShape {
            expected: format!("target of length {}", rows),
            got: format!("length {}", target.len()),
        });
    }
    if rows < 3 {
        return Err(PreprocessingError::EmptyData(format!(
            "f_regression needs at least 3 samples, got {}",
            rows
        )));
    }

    let y_centered = target.add_scalar(&Scalar::new(-target.mean().to_f64()));
    let y_ss = y_centered.dot(&y_centered).to_f64();
    let dof = (rows - 2) as f64;

    let mut scores = Vec::with_capacity(cols);
    for col in 0..cols {
        let x = data.column(col)?;
        let x_centered = x.add_scalar(&Scalar::new(-x.mean().to_f64()));
        let x_ss = x_centered.dot(&x_centered).to_f64();

        if x_ss == 0.0 || y_ss == 0.0 {
            scores.push(0.0);
            continue;
        }

        let r = x_centered.dot(&y_centered).to_f64() / (x_ss * y_ss).sqrt();
        let r2 = (r * r).min(1.0);
        scores.push(if r2 >= 1.0 {
            f64::INFINITY
        } else {
            r2 / (1.0 - r2) * dof
        });
    }
    Ok(scores)
}

/// Indices of the `k` best scores, in ascending column order.
///
/// Ties keep the lower column index.
fn top_k(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut selected: Vec<usize> = order.into_iter().take(k).collect();
    selected.sort_unstable();
    selected
}

/// Select features according to the `k` highest scores.
///
/// # Example
/// ```ignore
/// let selector = SelectKBest::<CpuBackend>::new(KSelection::K(2));
/// let fitted = selector.fit(&x, &y)?;
/// let reduced = fitted.transform(&x)?; // 2 columns
/// ```
#[derive(Clone)]
pub struct SelectKBest<B: Backend> {
    config: SelectKBestConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> SelectKBest<B> {
    pub fn new(k: KSelection) -> Self {
        Self {
            config: SelectKBestConfig {
                k,
                score_func: ScoreFunc::FRegression,
            },
            _backend: PhantomData,
        }
    }
}

/// Serializable parameters for a fitted SelectKBest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectKBestParams {
    /// Hyperparameters the selector was fitted with.
    pub config: SelectKBestConfig,
    /// Score of every input column.
    pub scores_: Vec<f64>,
    /// Kept column indices, strictly increasing.
    pub selected: Vec<usize>,
    /// Number of input features.
    pub n_features_in: usize,
}

impl SelectKBestParams {
    /// Checks the scores, the selection and `k` agree with each other.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.scores_.len() != self.n_features_in {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} scores", self.n_features_in),
                got: format!("{} scores", self.scores_.len()),
            });
        }
        if self.selected.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PreprocessingError::InvalidParameter(
                "Selected columns must be strictly increasing".to_string(),
            ));
        }
        if let Some(&bad) = self.selected.iter().find(|&&c| c >= self.n_features_in) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "Selected column {} out of bounds for {} features",
                bad, self.n_features_in
            )));
        }
        let expected = match self.config.k {
            KSelection::All => self.n_features_in,
            KSelection::K(k) => k,
        };
        if self.selected.len() != expected {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} selected columns for k={:?}", expected, self.config.k),
                got: format!("{} selected columns", self.selected.len()),
            });
        }
        Ok(())
    }
}

/// Fitted SelectKBest ready for inference.
#[derive(Clone)]
pub struct FittedSelectKBest<B: Backend> {
    config: SelectKBestConfig,
    scores_: Vec<f64>,
    selected: Vec<usize>,
    n_features_in: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedSelectKBest<B> {
    pub fn config(&self) -> &SelectKBestConfig {
        &self.config
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores_
    }

    /// Mask of kept columns, sklearn's `get_support()`.
    pub fn support(&self) -> Vec<bool> {
        (0..self.n_features_in)
            .map(|c| self.selected.binary_search(&c).is_ok())
            .collect()
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }
}

impl<B: Backend> SupervisedTransformer<B> for SelectKBest<B> {
    type Params = SelectKBestParams;
    type Fitted = FittedSelectKBest<B>;

    fn fit(
        &self,
        data: &Tensor2D<B>,
        target: &Tensor1D<B>,
    ) -> Result<Self::Fitted, PreprocessingError> {
        let (_, cols) = data.shape();

        let k = match self.config.k {
            KSelection::All => cols,
            KSelection::K(k) if k > cols => {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "k={} is greater than n_features={}",
                    k, cols
                )));
            }
            KSelection::K(k) => k,
        };

        let scores_ = match self.config.score_func {
            ScoreFunc::FRegression => f_regression(data, target)?,
        };
        let selected = top_k(&scores_, k);

        FittedSelectKBest::from_params(SelectKBestParams {
            config: self.config.clone(),
            scores_,
            selected,
            n_features_in: cols,
        })
    }
}

impl<B: Backend> FittedTransformer<B> for FittedSelectKBest<B> {
    type Params = SelectKBestParams;

    fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        check_features(data, self.n_features_in)?;
        data.select_columns(&self.selected)
    }

    fn extract_params(&self) -> Self::Params {
        SelectKBestParams {
            config: self.config.clone(),
            scores_: self.scores_.clone(),
            selected: self.selected.clone(),
            n_features_in: self.n_features_in,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.validate()?;

        Ok(Self {
            config: params.config,
            scores_: params.scores_,
            selected: params.selected,
            n_features_in: params.n_features_in,
            _backend: PhantomData,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn n_features_out(&self) -> usize {
        self.selected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn create_test_data() -> (Tensor2D<CpuBackend>, Tensor1D<CpuBackend>) {
        // col 0: constant, col 1: noisy, col 2: y = 2x
        let x = Tensor2D::new(
            vec![
                1.0f32, 1.0, 1.0, //
                1.0, 3.0, 2.0, //
                1.0, 2.0, 3.0, //
                1.0, 4.0, 4.0,
            ],
            4,
            3,
        );
        let y = Tensor1D::new(vec![2.0, 4.0, 6.0, 8.0]);
        (x, y)
    }

    #[test]
    fn test_f_regression_scores() {
        let (x, y) = create_test_data();
        let scores = f_regression(&x, &y).unwrap();

        assert_eq!(scores[0], 0.0);
        assert!(scores[2].is_infinite());
        // r = 0.8 for the noisy column: F = 0.64 / 0.36 * 2
        assert!((scores[1] - 0.64 / 0.36 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_select_k_best_keeps_original_order() {
        let (x, y) = create_test_data();
        let fitted = SelectKBest::<CpuBackend>::new(KSelection::K(2))
            .fit(&x, &y)
            .unwrap();

        assert_eq!(fitted.selected(), &[1, 2]);
        assert_eq!(fitted.support(), vec![false, true, true]);

        let out = fitted.transform(&x).unwrap();
        assert_eq!(out.shape(), (4, 2));
        assert_eq!(out.column(1).unwrap().to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_select_all() {
        let (x, y) = create_test_data();
        let fitted = SelectKBest::<CpuBackend>::new(KSelection::All)
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.n_features_out(), 3);
    }

    #[test]
    fn test_k_larger_than_features() {
        let (x, y) = create_test_data();
        assert!(matches!(
            SelectKBest::<CpuBackend>::new(KSelection::K(4)).fit(&x, &y),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_target_length_mismatch() {
        let (x, _) = create_test_data();
        let y = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        assert!(matches!(
            SelectKBest::<CpuBackend>::new(KSelection::K(1)).fit(&x, &y),
            Err(PreprocessingError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_top_k_ties_prefer_lower_index() {
        assert_eq!(top_k(&[1.0, 5.0, 5.0, 0.0], 1), vec![1]);
        assert_eq!(top_k(&[1.0, 5.0, 50.0], 2), vec![1, 2]);
    }

    #[test]
    fn test_from_params_validation() {
        let bad_order = SelectKBestParams {
            config: SelectKBestConfig {
                k: KSelection::K(2),
                ..Default::default()
            },
            scores_: vec![1.0, 2.0],
            selected: vec![1, 0],
            n_features_in: 2,
        };
        assert!(FittedSelectKBest::<CpuBackend>::from_params(bad_order).is_err());

        let out_of_bounds = SelectKBestParams {
            config: SelectKBestConfig {
                k: KSelection::K(1),
                ..Default::default()
            },
            scores_: vec![1.0, 2.0],
            selected: vec![2],
            n_features_in: 2,
        };
        assert!(FittedSelectKBest::<CpuBackend>::from_params(out_of_bounds).is_err());
    }

    #[test]
    fn test_validate_selection_matches_k() {
        let mut params = SelectKBestParams {
            config: SelectKBestConfig {
                k: KSelection::All,
                ..Default::default()
            },
            scores_: vec![1.0, 2.0, 3.0],
            selected: vec![0, 1, 2],
            n_features_in: 3,
        };
        params.validate().unwrap();

        params.selected = vec![0, 2];
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::InvalidShape { .. })
        ));

        params.config.k = KSelection::K(2);
        params.validate().unwrap();
    }

    #[test]
    fn test_params_keep_k_all() {
        let (x, y) = create_test_data();
        let fitted = SelectKBest::<CpuBackend>::new(KSelection::All)
            .fit(&x, &y)
            .unwrap();
        let params = fitted.extract_params();
        assert_eq!(params.config.k, KSelection::All);
        assert_eq!(
            FittedSelectKBest::<CpuBackend>::from_params(params).unwrap().config().k,
            KSelection::All
        );
    }

    #[test]
    fn test_feature_mismatch() {
        let (x, y) = create_test_data();
        let fitted = SelectKBest::<CpuBackend>::new(KSelection::K(1))
            .fit(&x, &y)
            .unwrap();
        let wrong = Tensor2D::<CpuBackend>::new(vec![1.0f32, 2.0], 1, 2);
        assert!(matches!(
            fitted.transform(&wrong),
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_params_roundtrip() {
        let (x, y) = create_test_data();
        let fitted = SelectKBest::<CpuBackend>::new(KSelection::K(2))
            .fit(&x, &y)
            .unwrap();
        let params = fitted.extract_params();
        let restored = FittedSelectKBest::<CpuBackend>::from_params(params.clone()).unwrap();
        assert_eq!(restored.extract_params(), params);
    }

    #[test]
    fn test_config_describe() {
        let config = SelectKBestConfig {
            k: KSelection::K(2),
            ..Default::default()
        };
        assert_eq!(config.describe(), "SelectKBest(k=2, score_func=f_regression)");
        let all = SelectKBestConfig {
            k: KSelection::All,
            ..Default::default()
        };
        assert_eq!(all.describe(), "SelectKBest(k='all', score_func=f_regression)");
    }
}
