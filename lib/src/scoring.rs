//! Regression scorers.
//!
//! Scores follow the "greater is better" convention: error metrics are
//! negated, so a perfect model scores `0.0` and worse models score lower.

use crate::backend::{Backend, Scalar, Tensor1D};
use crate::preprocessing::PreprocessingError;
use serde::{Deserialize, Serialize};

/// Scorer used by a search to rank candidates and by `score`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scoring {
    /// `-mean(|y - ŷ|)`
    #[default]
    NegMeanAbsoluteError,
    /// `-mean((y - ŷ)²)`
    NegMeanSquaredError,
    /// `-median(|y - ŷ|)`
    NegMedianAbsoluteError,
    /// Coefficient of determination.
    R2,
}

impl Scoring {
    /// sklearn scorer name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scoring::NegMeanAbsoluteError => "neg_mean_absolute_error",
            Scoring::NegMeanSquaredError => "neg_mean_squared_error",
            Scoring::NegMedianAbsoluteError => "neg_median_absolute_error",
            Scoring::R2 => "r2",
        }
    }

    /// Score predictions against the true target.
    ///
    /// # Errors
    /// [`PreprocessingError::InvalidShape`] if lengths differ,
    /// [`PreprocessingError::EmptyData`] if there are no samples.
    ///
    /// # Example
    /// ```
    /// use regression_grader::backend::{CpuBackend, Tensor1D};
    /// use regression_grader::scoring::Scoring;
    ///
    /// let y = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
    /// let pred = Tensor1D::<CpuBackend>::new(vec![2.0, 2.0, 2.0]);
    /// let score = Scoring::NegMeanAbsoluteError.score(&y, &pred).unwrap();
    /// assert!((score + 2.0 / 3.0).abs() < 1e-12);
    /// ```
    pub fn score<B: Backend>(
        &self,
        y_true: &Tensor1D<B>,
        y_pred: &Tensor1D<B>,
    ) -> Result<f64, PreprocessingError> {
        if y_true.len() != y_pred.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} predictions", y_true.len()),
                got: format!("{} predictions", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot score an empty target".to_string(),
            ));
        }

        let residuals = y_true.sub(y_pred);
        let score = match self {
            Scoring::NegMeanAbsoluteError => -residuals.abs().mean().to_f64(),
            Scoring::NegMeanSquaredError => -residuals.mul(&residuals).mean().to_f64(),
            Scoring::NegMedianAbsoluteError => -median(residuals.abs().to_vec()),
            Scoring::R2 => r2(y_true, &residuals),
        };
        Ok(score)
    }
}

fn median(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// `1 - SS_res / SS_tot`; a constant target scores 1 when predicted
/// exactly and 0 otherwise.
fn r2<B: Backend>(y_true: &Tensor1D<B>, residuals: &Tensor1D<B>) -> f64 {
    let ss_res = residuals.dot(residuals).to_f64();
    let mean = y_true.mean();
    let centered = y_true.add_scalar(&Scalar::new(-mean.to_f64()));
    let ss_tot = centered.dot(&centered).to_f64();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
