//! The grading harness.
//!
//! Six steps run in order, and the first failure ends the run:
//!
//! 1. [`load_model`]
//! 2. [`verify_components`]
//! 3. [`load_grading_data`]
//! 4. [`verify_scores`]
//! 5. [`read_metrics_file`]
//! 6. [`verify_metrics`]
//!
//! [`run`] chains them and returns a [`GradingReport`].

use crate::backend::CpuBackend;
use crate::config::{GradingConfig, X_TEST_FILE, X_TRAIN_FILE, Y_TEST_FILE, Y_TRAIN_FILE};
use crate::dataset::{Dataset, FeatureFrame, GradingData, LabeledSplit, TargetSeries};
use crate::preprocessing::PreprocessingError;
use crate::report::{self, MetricsRecord};
use crate::search::FittedGridSearchCv;
use crate::serialization::ModelArtifact;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a grading run failed.
#[derive(Debug, Error)]
pub enum GradingError {
    /// A required input file does not exist.
    #[error("Missing artifact: {}", path.display())]
    MissingArtifact { path: PathBuf },
    /// A file exists but could not be decompressed, decoded or validated.
    #[error("Failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: PreprocessingError,
    },
    /// The model could not be evaluated on the grading data.
    #[error("Model evaluation failed: {0}")]
    Evaluation(#[from] PreprocessingError),
    /// A structural or numeric expectation did not hold.
    #[error("{check} failed: {detail}")]
    Assertion { check: &'static str, detail: String },
}

impl GradingError {
    fn assertion(check: &'static str, detail: impl Into<String>) -> Self {
        GradingError::Assertion {
            check,
            detail: detail.into(),
        }
    }
}

/// Outcome of a run in which every check passed.
#[derive(Clone, Debug, Serialize)]
pub struct GradingReport {
    pub type_name: String,
    pub stages: Vec<String>,
    pub train_score: f64,
    pub test_score: f64,
    pub metrics: Vec<MetricsRecord>,
}

fn ensure_exists(path: &Path) -> Result<(), GradingError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(GradingError::MissingArtifact {
            path: path.to_path_buf(),
        })
    }
}

fn load_file<T>(
    path: PathBuf,
    loader: impl FnOnce(&Path) -> Result<T, PreprocessingError>,
) -> Result<T, GradingError> {
    ensure_exists(&path)?;
    loader(&path).map_err(|source| GradingError::Load { path, source })
}

/// Loads and decodes the model artifact.
pub fn load_model(config: &GradingConfig) -> Result<ModelArtifact, GradingError> {
    let path = config.model_path();
    let model = load_file(path.clone(), |p| ModelArtifact::load_from_file(p))?;

    info!(path = %path.display(), type_name = model.type_name(), "Loaded model");
    for stage in model.stage_descriptions() {
        debug!(%stage, "Model stage");
    }
    Ok(model)
}

/// Checks the artifact is a search wrapper whose template holds every
/// required component.
pub fn verify_components(model: &ModelArtifact, config: &GradingConfig) -> Result<(), GradingError> {
    const CHECK: &str = "verify_components";

    let type_name = model.type_name();
    if !type_name.contains(&config.search_marker) {
        return Err(GradingError::assertion(
            CHECK,
            format!(
                "model type '{}' is not a '{}' search",
                type_name, config.search_marker
            ),
        ));
    }

    let stage_components = model.stage_components();
    let missing: Vec<&str> = config
        .required_components
        .iter()
        .map(String::as_str)
        .filter(|required| {
            !stage_components
                .iter()
                .any(|components| components.iter().any(|c| c == required))
        })
        .collect();

    if !missing.is_empty() {
        return Err(GradingError::assertion(
            CHECK,
            format!(
                "missing components {:?} in stages {:?}",
                missing,
                model.stage_descriptions()
            ),
        ));
    }

    info!(
        components = config.required_components.len(),
        "All required components present"
    );
    Ok(())
}

/// Loads the four held-out grading files.
pub fn load_grading_data(config: &GradingConfig) -> Result<GradingData, GradingError> {
    let x_train = load_file(config.grading_file(X_TRAIN_FILE), |p| FeatureFrame::load_from_file(p))?;
    let y_train = load_file(config.grading_file(Y_TRAIN_FILE), |p| TargetSeries::load_from_file(p))?;
    let x_test = load_file(config.grading_file(X_TEST_FILE), |p| FeatureFrame::load_from_file(p))?;
    let y_test = load_file(config.grading_file(Y_TEST_FILE), |p| TargetSeries::load_from_file(p))?;

    info!(
        train_rows = x_train.n_rows,
        test_rows = x_test.n_rows,
        features = x_train.n_cols,
        "Loaded grading data"
    );
    Ok(GradingData {
        train: LabeledSplit::new(x_train, y_train),
        test: LabeledSplit::new(x_test, y_test),
    })
}

/// Scores the refitted best pipeline on both splits and checks the ceilings.
///
/// Returns `(train_score, test_score)`.
pub fn verify_scores(
    model: &ModelArtifact,
    data: &GradingData,
    config: &GradingConfig,
) -> Result<(f64, f64), GradingError> {
    const CHECK: &str = "verify_scores";

    let search = match model {
        ModelArtifact::GridSearchCv(params) => {
            FittedGridSearchCv::<CpuBackend>::from_params(params.clone())?
        }
        ModelArtifact::Pipeline(_) => {
            return Err(GradingError::assertion(
                CHECK,
                format!("model type '{}' has no search scorer", model.type_name()),
            ));
        }
    };

    let (x_train, y_train) = data.train.to_tensors::<CpuBackend>()?;
    let (x_test, y_test) = data.test.to_tensors::<CpuBackend>()?;
    let train_score = search.score(&x_train, &y_train)?;
    let test_score = search.score(&x_test, &y_test)?;

    info!(
        scoring = search.scoring().as_str(),
        train_score, test_score, "Scored model"
    );

    let limits = config.score_limits;
    if !(train_score < limits.train) {
        return Err(GradingError::assertion(
            CHECK,
            format!("train score {} is not below {}", train_score, limits.train),
        ));
    }
    if !(test_score < limits.test) {
        return Err(GradingError::assertion(
            CHECK,
            format!("test score {} is not below {}", test_score, limits.test),
        ));
    }
    Ok((train_score, test_score))
}

/// Reads the metrics report, one record per line.
pub fn read_metrics_file(path: &Path) -> Result<Vec<MetricsRecord>, GradingError> {
    let records = load_file(path.to_path_buf(), |p| report::read_metrics(p))?;
    info!(path = %path.display(), records = records.len(), "Read metrics report");
    Ok(records)
}

/// Checks each expected record against its limits.
pub fn verify_metrics(records: &[MetricsRecord], config: &GradingConfig) -> Result<(), GradingError> {
    const CHECK: &str = "verify_metrics";

    if records.len() < config.metric_limits.len() {
        return Err(GradingError::assertion(
            CHECK,
            format!(
                "expected {} records, found {}",
                config.metric_limits.len(),
                records.len()
            ),
        ));
    }
    if records.len() > config.metric_limits.len() {
        warn!(
            extra = records.len() - config.metric_limits.len(),
            "Ignoring extra metrics records"
        );
    }

    for (index, (record, limits)) in records.iter().zip(&config.metric_limits).enumerate() {
        let fail = |detail: String| {
            GradingError::assertion(CHECK, format!("record {}: {}", index, detail))
        };

        if record.record_type != limits.record_type {
            return Err(fail(format!(
                "type '{}' != '{}'",
                record.record_type, limits.record_type
            )));
        }
        if record.dataset != limits.dataset {
            return Err(fail(format!(
                "dataset '{}' != '{}'",
                record.dataset, limits.dataset
            )));
        }
        if !(record.r2 > limits.r2) {
            return Err(fail(format!("r2 {} is not above {}", record.r2, limits.r2)));
        }
        if !(record.mse < limits.mse) {
            return Err(fail(format!("mse {} is not below {}", record.mse, limits.mse)));
        }
        if !(record.mad < limits.mad) {
            return Err(fail(format!("mad {} is not below {}", record.mad, limits.mad)));
        }
        debug!(index, dataset = %record.dataset, "Metrics record within limits");
    }

    info!("Metrics report within limits");
    Ok(())
}

/// Runs every check in order, stopping at the first failure.
pub fn run(config: &GradingConfig) -> Result<GradingReport, GradingError> {
    let model = load_model(config)?;
    verify_components(&model, config)?;
    let data = load_grading_data(config)?;
    let (train_score, test_score) = verify_scores(&model, &data, config)?;
    let metrics = read_metrics_file(&config.metrics_path())?;
    verify_metrics(&metrics, config)?;

    Ok(GradingReport {
        type_name: model.type_name().to_string(),
        stages: model.stage_descriptions(),
        train_score,
        test_score,
        metrics,
    })
}
