//! A known-good submission written into a temporary grading root.
//!
//! Raw features are `[fuel, present_price]` with `fuel` coded 0/1. The
//! stored best pipeline predicts `3 * fuel + 2 * price + 0.5`, and every
//! target sits a fixed distance from that prediction so the scores land
//! just under the default ceilings.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use regression_grader::config::{
    GradingConfig, X_TEST_FILE, X_TRAIN_FILE, Y_TEST_FILE, Y_TRAIN_FILE,
};
use regression_grader::dataset::{FeatureFrame, TargetSeries};
use regression_grader::model::linear::{LinearRegressionConfig, SerializableLinearParams};
use regression_grader::pipeline::{PipelineParams, PipelineSpec, StepSpec, TransformParams};
use regression_grader::preprocessing::{
    ColumnTransformerConfig, ColumnTransformerParams, HandleUnknown, KSelection,
    MinMaxScalerConfig, MinMaxScalerParams, OneHotEncoderConfig, OneHotEncoderParams, Remainder,
    SelectKBestConfig, SelectKBestParams,
};
use regression_grader::report::{write_metrics, MetricsRecord};
use regression_grader::scoring::Scoring;
use regression_grader::search::{GridSearchCvParams, ParamValue};
use regression_grader::serialization::ModelArtifact;
use tempfile::TempDir;

pub const COLUMNS: [&str; 2] = ["fuel", "present_price"];

pub fn template() -> PipelineSpec {
    PipelineSpec::new()
        .step(
            "preprocess",
            StepSpec::ColumnTransformer(ColumnTransformerConfig {
                columns: vec![0],
                encoder: OneHotEncoderConfig {
                    handle_unknown: HandleUnknown::Ignore,
                },
                remainder: Remainder::Passthrough,
            }),
        )
        .step(
            "selector",
            StepSpec::SelectKBest(SelectKBestConfig {
                k: KSelection::K(2),
                ..Default::default()
            }),
        )
        .step("scaler", StepSpec::MinMaxScaler(MinMaxScalerConfig::default()))
        .step(
            "regressor",
            StepSpec::LinearRegression(LinearRegressionConfig::default()),
        )
}

pub fn best_pipeline() -> PipelineParams {
    PipelineParams {
        transforms: vec![
            (
                "preprocess".to_string(),
                TransformParams::ColumnTransformer(ColumnTransformerParams {
                    columns: vec![0],
                    encoder: OneHotEncoderParams {
                        categories_: vec![vec![0.0, 1.0]],
                        n_features_in: 1,
                        handle_unknown: HandleUnknown::Ignore,
                    },
                    remainder: Remainder::Passthrough,
                    n_features_in: 2,
                }),
            ),
            (
                "selector".to_string(),
                // Output columns are [fuel_0, fuel_1, present_price].
                TransformParams::SelectKBest(SelectKBestParams {
                    config: SelectKBestConfig {
                        k: KSelection::K(2),
                        ..Default::default()
                    },
                    scores_: vec![1.0, 5.0, 50.0],
                    selected: vec![1, 2],
                    n_features_in: 3,
                }),
            ),
            (
                "scaler".to_string(),
                TransformParams::MinMaxScaler(MinMaxScalerParams {
                    config: MinMaxScalerConfig::default(),
                    min_: vec![0.0, 0.0],
                    max_: vec![1.0, 10.0],
                    scale_: vec![1.0, 0.1],
                    n_features: 2,
                }),
            ),
        ],
        estimator: (
            "regressor".to_string(),
            SerializableLinearParams {
                weights: vec![3.0, 20.0],
                bias: 0.5,
            },
        ),
        n_features_in: 2,
    }
}

pub fn search() -> GridSearchCvParams {
    let mut grid = BTreeMap::new();
    grid.insert(
        "selector__k".to_string(),
        vec![ParamValue::Int(1), ParamValue::Int(2), ParamValue::Str("all".into())],
    );
    grid.insert(
        "regressor__fit_intercept".to_string(),
        vec![ParamValue::Bool(true), ParamValue::Bool(false)],
    );

    let mut best_params = BTreeMap::new();
    best_params.insert("selector__k".to_string(), ParamValue::Int(2));
    best_params.insert("regressor__fit_intercept".to_string(), ParamValue::Bool(true));

    GridSearchCvParams {
        estimator: template(),
        param_grid: vec![grid],
        cv: 5,
        scoring: Scoring::NegMeanAbsoluteError,
        refit: true,
        best_params,
        best_score: -1.7,
        best_estimator: Some(best_pipeline()),
    }
}

fn frame(rows: &[Vec<f32>]) -> FeatureFrame {
    let columns = COLUMNS.iter().map(|c| c.to_string()).collect();
    FeatureFrame::from_rows(columns, rows).unwrap()
}

/// Train predictions are 0.5, 23.5, 10.5, 7.5; every error is 1.595.
pub fn train_split() -> (FeatureFrame, TargetSeries) {
    let x = frame(&[
        vec![0.0, 0.0],
        vec![1.0, 10.0],
        vec![0.0, 5.0],
        vec![1.0, 2.0],
    ]);
    let y = TargetSeries::new("selling_price", vec![2.095, 21.905, 12.095, 5.905]);
    (x, y)
}

/// Test predictions are 6.5, 19.5; every error is 2.4295.
pub fn test_split() -> (FeatureFrame, TargetSeries) {
    let x = frame(&[vec![0.0, 3.0], vec![1.0, 8.0]]);
    let y = TargetSeries::new("selling_price", vec![8.9295, 17.0705]);
    (x, y)
}

pub fn record(dataset: &str, r2: f64, mse: f64, mad: f64) -> MetricsRecord {
    MetricsRecord {
        record_type: "metrics".to_string(),
        dataset: dataset.to_string(),
        r2,
        mse,
        mad,
    }
}

pub fn good_metrics() -> Vec<MetricsRecord> {
    vec![
        record("train", 0.9, 5.0, 1.5),
        record("test", 0.8, 30.0, 2.0),
    ]
}

pub fn write_model(root: &Path, model: &ModelArtifact) {
    let config = GradingConfig::default().with_root(root);
    let path = config.model_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    model.save_to_file(&path).unwrap();
}

pub fn write_metrics_file(root: &Path, records: &[MetricsRecord]) {
    let config = GradingConfig::default().with_root(root);
    let path = config.metrics_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    write_metrics(&path, records).unwrap();
}

pub fn write_grading_data(root: &Path) {
    let config = GradingConfig::default().with_root(root);
    std::fs::create_dir_all(config.grading_dir()).unwrap();

    let (x_train, y_train) = train_split();
    let (x_test, y_test) = test_split();
    x_train.save_to_file(config.grading_file(X_TRAIN_FILE)).unwrap();
    y_train.save_to_file(config.grading_file(Y_TRAIN_FILE)).unwrap();
    x_test.save_to_file(config.grading_file(X_TEST_FILE)).unwrap();
    y_test.save_to_file(config.grading_file(Y_TEST_FILE)).unwrap();
}

/// Writes the full known-good submission and returns its root.
pub fn submission() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_model(dir.path(), &ModelArtifact::GridSearchCv(search()));
    write_grading_data(dir.path());
    write_metrics_file(dir.path(), &good_metrics());
    dir
}

pub fn config_for(dir: &TempDir) -> GradingConfig {
    GradingConfig::default().with_root(dir.path())
}
