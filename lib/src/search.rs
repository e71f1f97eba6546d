//! Cross-validated grid search over a pipeline template.
//!
//! The search itself runs elsewhere; this module holds what it leaves
//! behind ([`GridSearchCvParams`]) and rebuilds the refitted best pipeline
//! for scoring ([`FittedGridSearchCv`]).

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::{FittedPipeline, PipelineParams, PipelineSpec};
use crate::preprocessing::PreprocessingError;
use crate::scoring::Scoring;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A hyperparameter value in a search grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Bool(true) => write!(f, "True"),
            ParamValue::Bool(false) => write!(f, "False"),
            ParamValue::Str(v) => write!(f, "'{}'", v),
        }
    }
}

/// Stage name of a `stage__param` grid key.
fn key_stage(key: &str) -> Option<&str> {
    key.split_once("__").map(|(stage, _)| stage)
}

/// Everything a finished grid search stores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSearchCvParams {
    /// Unfitted pipeline the search cloned for every candidate.
    pub estimator: PipelineSpec,
    /// Candidate grids, keyed `stage__param`.
    pub param_grid: Vec<BTreeMap<String, Vec<ParamValue>>>,
    /// Number of cross-validation folds.
    pub cv: usize,
    pub scoring: Scoring,
    /// Whether the best candidate was refitted on the whole training set.
    pub refit: bool,
    pub best_params: BTreeMap<String, ParamValue>,
    /// Mean cross-validated score of the best candidate.
    pub best_score: f64,
    /// The refitted best pipeline, present when `refit` is set.
    pub best_estimator: Option<PipelineParams>,
}

impl GridSearchCvParams {
    /// Qualified type name of the search wrapper.
    pub const TYPE_NAME: &'static str = "search::GridSearchCV";

    /// sklearn-style repr of the search wrapper.
    pub fn describe(&self) -> String {
        let grids: Vec<String> = self
            .param_grid
            .iter()
            .map(|grid| {
                let entries: Vec<String> = grid
                    .iter()
                    .map(|(key, values)| {
                        let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                        format!("'{}': [{}]", key, values.join(", "))
                    })
                    .collect();
                format!("{{{}}}", entries.join(", "))
            })
            .collect();

        format!(
            "GridSearchCV(cv={}, estimator=Pipeline(steps=[{}]), param_grid=[{}], refit={}, scoring='{}')",
            self.cv,
            self.estimator.describe_steps().join(", "),
            grids.join(", "),
            if self.refit { "True" } else { "False" },
            self.scoring.as_str()
        )
    }

    /// Structural checks run when an artifact is loaded.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if self.cv < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "cv must be at least 2, got {}",
                self.cv
            )));
        }
        if self.estimator.steps.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Search template has no stages".to_string(),
            ));
        }

        let stages = self.estimator.step_names();
        let grid_keys = self.param_grid.iter().flat_map(|grid| grid.keys());
        for key in grid_keys.chain(self.best_params.keys()) {
            match key_stage(key) {
                Some(stage) if stages.contains(&stage) => {}
                _ => {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "Parameter '{}' does not name a template stage",
                        key
                    )));
                }
            }
        }

        match (&self.best_estimator, self.refit) {
            (Some(best), true) => {
                best.validate()?;
                if best.step_names() != stages {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "Best estimator stages {:?} do not match template stages {:?}",
                        best.step_names(),
                        stages
                    )));
                }
                Ok(())
            }
            (None, false) => Ok(()),
            (None, true) => Err(PreprocessingError::InvalidParameter(
                "refit=True but no best estimator stored".to_string(),
            )),
            (Some(_), false) => Err(PreprocessingError::InvalidParameter(
                "refit=False but a best estimator is stored".to_string(),
            )),
        }
    }
}

/// A finished search with its best pipeline rebuilt for inference.
#[derive(Clone)]
pub struct FittedGridSearchCv<B: Backend> {
    estimator: PipelineSpec,
    scoring: Scoring,
    best_params: BTreeMap<String, ParamValue>,
    best_score: f64,
    best_estimator: Option<FittedPipeline<B>>,
}

impl<B: Backend> FittedGridSearchCv<B> {
    pub fn from_params(params: GridSearchCvParams) -> Result<Self, PreprocessingError> {
        params.validate()?;
        let best_estimator = params
            .best_estimator
            .map(FittedPipeline::from_params)
            .transpose()?;

        Ok(Self {
            estimator: params.estimator,
            scoring: params.scoring,
            best_params: params.best_params,
            best_score: params.best_score,
            best_estimator,
        })
    }

    pub fn estimator(&self) -> &PipelineSpec {
        &self.estimator
    }

    pub fn scoring(&self) -> Scoring {
        self.scoring
    }

    pub fn best_params(&self) -> &BTreeMap<String, ParamValue> {
        &self.best_params
    }

    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    fn best(&self) -> Result<&FittedPipeline<B>, PreprocessingError> {
        self.best_estimator.as_ref().ok_or_else(|| {
            PreprocessingError::InvalidParameter(
                "This search was run with refit=False and cannot predict".to_string(),
            )
        })
    }

    pub fn best_estimator(&self) -> Option<&FittedPipeline<B>> {
        self.best_estimator.as_ref()
    }

    /// Predict with the refitted best pipeline.
    pub fn predict(&self, data: &Tensor2D<B>) -> Result<Tensor1D<B>, PreprocessingError> {
        self.best()?.predict(data)
    }

    /// Score the best pipeline on `(data, target)` with the search's scorer.
    ///
    /// Greater is better.
    pub fn score(
        &self,
        data: &Tensor2D<B>,
        target: &Tensor1D<B>,
    ) -> Result<f64, PreprocessingError> {
        let (rows, _) = data.shape();
        if rows != target.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("target of length {}", rows),
                got: format!("length {}", target.len()),
            });
        }
        let predictions = self.predict(data)?;
        self.scoring.score(target, &predictions)
    }
}
