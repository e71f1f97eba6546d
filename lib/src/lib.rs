//! # regression-grader
//!
//! Acceptance grading for a trained car-price regression model.
//!
//! A training job leaves behind a serialized hyperparameter search over a
//! preprocessing pipeline plus a metrics report. This crate rebuilds the
//! stored estimator, scores it on held-out grading data and checks both the
//! structure of the model and the reported metrics against fixed limits.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: transformers and models are either unfitted or
//!   fitted, and only fitted ones can transform or predict.
//! - **Plain-data persistence**: every fitted component round-trips through a
//!   serde parameter struct; nothing backend-specific is stored.
//! - **Backend Agnosticism**: the `Backend` trait isolates tensor storage from
//!   pipeline code.
//!
//! ## Quick Start
//!
//! ```no_run
//! use regression_grader::config::GradingConfig;
//! use regression_grader::grading;
//!
//! let config = GradingConfig::default().with_root("/srv/submission");
//! let report = grading::run(&config)?;
//! println!("{} passed with test score {}", report.type_name, report.test_score);
//! # Ok::<(), regression_grader::grading::GradingError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions (`Tensor1D`, `Tensor2D`) and the CPU backend
//! - `preprocessing`: one-hot encoding, column routing, k-best selection, min-max scaling
//! - `model`: fitted linear regression
//! - `pipeline`: stage templates and fitted pipelines
//! - `search`: stored grid-search results
//! - `scoring`: regression scorers
//! - `dataset`: grading frames and labeled splits
//! - `report`: the metrics report
//! - `config`: file locations and thresholds
//! - `grading`: the checks themselves

pub mod backend;

/// File locations and acceptance thresholds.
pub mod config;

/// Grading frames and dataset abstractions.
pub mod dataset;

/// The grading harness.
#[cfg(feature = "cpu")]
pub mod grading;

/// Tracing subscriber setup.
pub mod logging;

/// Fitted estimators.
pub mod model;

/// Pipeline templates and fitted pipelines.
pub mod pipeline;

/// Data preprocessing transformers for regression pipelines.
pub mod preprocessing;

/// Newline-delimited JSON metrics report.
pub mod report;

/// Regression scorers.
pub mod scoring;

/// Stored grid-search results.
pub mod search;

/// Model persistence and format conversion utilities.
pub mod serialization;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, ScalarOps, Tensor1D, Tensor2D};

#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
