//! Grading configuration: file locations and acceptance thresholds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model artifact, relative to the grading root.
pub const MODEL_PATH: &str = "files/models/model.pkl.gz";
/// Directory holding the held-out grading frames.
pub const GRADING_DIR: &str = "files/grading";
/// Metrics report written by the training job.
pub const METRICS_PATH: &str = "files/output/metrics.json";

pub const X_TRAIN_FILE: &str = "x_train.pkl";
pub const Y_TRAIN_FILE: &str = "y_train.pkl";
pub const X_TEST_FILE: &str = "x_test.pkl";
pub const Y_TEST_FILE: &str = "y_test.pkl";

/// Marker the artifact type name must contain.
pub const SEARCH_MARKER: &str = "GridSearchCV";

/// Component names that must each appear in some template stage.
pub const REQUIRED_COMPONENTS: [&str; 4] = [
    "OneHotEncoder",
    "SelectKBest",
    "MinMaxScaler",
    "LinearRegression",
];

/// Upper bounds (exclusive) on the model's own score for each split.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreLimits {
    pub train: f64,
    pub test: f64,
}

impl Default for ScoreLimits {
    fn default() -> Self {
        Self {
            train: -1.590,
            test: -2.429,
        }
    }
}

/// Expected contents of one metrics record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricLimits {
    #[serde(rename = "type")]
    pub record_type: String,
    pub dataset: String,
    /// Exclusive lower bound.
    pub r2: f64,
    /// Exclusive upper bound.
    pub mse: f64,
    /// Exclusive upper bound.
    pub mad: f64,
}

impl MetricLimits {
    fn metrics(dataset: &str, r2: f64, mse: f64, mad: f64) -> Self {
        Self {
            record_type: "metrics".to_string(),
            dataset: dataset.to_string(),
            r2,
            mse,
            mad,
        }
    }

    pub fn train() -> Self {
        Self::metrics("train", 0.889, 5.950, 1.600)
    }

    pub fn test() -> Self {
        Self::metrics("test", 0.728, 32.910, 2.430)
    }
}

/// Where the graded artifacts live and what they must satisfy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Directory the fixed relative paths are resolved against.
    pub root: PathBuf,

    pub search_marker: String,

    pub required_components: Vec<String>,

    pub score_limits: ScoreLimits,

    /// Limits for records 0 and 1 of the metrics report, in order.
    pub metric_limits: Vec<MetricLimits>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            search_marker: SEARCH_MARKER.to_string(),
            required_components: REQUIRED_COMPONENTS.iter().map(|c| c.to_string()).collect(),
            score_limits: ScoreLimits::default(),
            metric_limits: vec![MetricLimits::train(), MetricLimits::test()],
        }
    }
}

impl GradingConfig {
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_score_limits(mut self, limits: ScoreLimits) -> Self {
        self.score_limits = limits;
        self
    }

    pub fn with_metric_limits(mut self, limits: Vec<MetricLimits>) -> Self {
        self.metric_limits = limits;
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.root.join(MODEL_PATH)
    }

    pub fn grading_dir(&self) -> PathBuf {
        self.root.join(GRADING_DIR)
    }

    /// Path of one grading file, e.g. [`X_TRAIN_FILE`].
    pub fn grading_file(&self, name: impl AsRef<Path>) -> PathBuf {
        self.grading_dir().join(name)
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.root.join(METRICS_PATH)
    }
}
