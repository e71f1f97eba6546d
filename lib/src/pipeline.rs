//! Ordered, named processing stages ending in a regression estimator.
//!
//! - [`PipelineSpec`]: the unfitted template, stages with hyperparameters only.
//! - [`PipelineParams`]: serializable fitted stages.
//! - [`FittedPipeline`]: reconstructed stages ready for `predict`.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model::linear::{LinearModel, LinearRegressionConfig, SerializableLinearParams};
use crate::model::{Fitted, InferenceModel};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::FittedTransformer;
use crate::preprocessing::{
    ColumnTransformerConfig, ColumnTransformerParams, FittedColumnTransformer,
    FittedMinMaxScaler, FittedOneHotEncoder, FittedSelectKBest, MinMaxScalerConfig,
    MinMaxScalerParams, OneHotEncoderConfig, OneHotEncoderParams, Remainder, SelectKBestConfig,
    SelectKBestParams,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Renders a stage the way a Python `(name, estimator)` tuple prints.
fn render_step(name: &str, description: &str) -> String {
    format!("('{}', {})", name, description)
}

/// One unfitted stage of a pipeline template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepSpec {
    ColumnTransformer(ColumnTransformerConfig),
    OneHotEncoder(OneHotEncoderConfig),
    SelectKBest(SelectKBestConfig),
    MinMaxScaler(MinMaxScalerConfig),
    LinearRegression(LinearRegressionConfig),
}

impl StepSpec {
    /// sklearn-style repr of the stage.
    pub fn describe(&self) -> String {
        match self {
            StepSpec::ColumnTransformer(c) => c.describe(),
            StepSpec::OneHotEncoder(c) => c.describe(),
            StepSpec::SelectKBest(c) => c.describe(),
            StepSpec::MinMaxScaler(c) => c.describe(),
            StepSpec::LinearRegression(c) => c.describe(),
        }
    }

    /// Component type names contained in the stage, outermost first.
    pub fn components(&self) -> Vec<&'static str> {
        match self {
            StepSpec::ColumnTransformer(c) => c.components(),
            StepSpec::OneHotEncoder(_) => vec!["OneHotEncoder"],
            StepSpec::SelectKBest(_) => vec!["SelectKBest"],
            StepSpec::MinMaxScaler(_) => vec!["MinMaxScaler"],
            StepSpec::LinearRegression(_) => vec!["LinearRegression"],
        }
    }
}

/// Unfitted pipeline: the estimator template of a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub steps: Vec<(String, StepSpec)>,
}

impl PipelineSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a named stage.
    pub fn step(mut self, name: impl Into<String>, spec: StepSpec) -> Self {
        self.steps.push((name.into(), spec));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Stage strings, e.g. `('scaler', MinMaxScaler())`.
    pub fn describe_steps(&self) -> Vec<String> {
        self.steps
            .iter()
            .map(|(name, spec)| render_step(name, &spec.describe()))
            .collect()
    }

    pub fn step_components(&self) -> Vec<Vec<&'static str>> {
        self.steps.iter().map(|(_, spec)| spec.components()).collect()
    }
}

/// Fitted parameters of one transform stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TransformParams {
    ColumnTransformer(ColumnTransformerParams),
    OneHotEncoder(OneHotEncoderParams),
    SelectKBest(SelectKBestParams),
    MinMaxScaler(MinMaxScalerParams),
}

impl TransformParams {
    /// Hyperparameters recovered from the fitted state.
    pub fn spec(&self) -> StepSpec {
        match self {
            TransformParams::ColumnTransformer(p) => {
                StepSpec::ColumnTransformer(ColumnTransformerConfig {
                    columns: p.columns.clone(),
                    encoder: OneHotEncoderConfig {
                        handle_unknown: p.encoder.handle_unknown,
                    },
                    remainder: p.remainder,
                })
            }
            TransformParams::OneHotEncoder(p) => StepSpec::OneHotEncoder(OneHotEncoderConfig {
                handle_unknown: p.handle_unknown,
            }),
            TransformParams::SelectKBest(p) => StepSpec::SelectKBest(p.config.clone()),
            TransformParams::MinMaxScaler(p) => StepSpec::MinMaxScaler(p.config.clone()),
        }
    }

    /// Checks the stage's own parameters.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        match self {
            TransformParams::ColumnTransformer(p) => p.validate(),
            TransformParams::OneHotEncoder(p) => p.validate(),
            TransformParams::SelectKBest(p) => p.validate(),
            TransformParams::MinMaxScaler(p) => p.validate(),
        }
    }

    pub fn n_features_in(&self) -> usize {
        match self {
            TransformParams::ColumnTransformer(p) => p.n_features_in,
            TransformParams::OneHotEncoder(p) => p.n_features_in,
            TransformParams::SelectKBest(p) => p.n_features_in,
            TransformParams::MinMaxScaler(p) => p.n_features,
        }
    }

    pub fn n_features_out(&self) -> usize {
        match self {
            TransformParams::ColumnTransformer(p) => {
                let encoded: usize = p.encoder.categories_.iter().map(Vec::len).sum();
                match p.remainder {
                    Remainder::Passthrough => {
                        encoded + p.n_features_in.saturating_sub(p.columns.len())
                    }
                    Remainder::Drop => encoded,
                }
            }
            TransformParams::OneHotEncoder(p) => p.categories_.iter().map(Vec::len).sum(),
            TransformParams::SelectKBest(p) => p.selected.len(),
            TransformParams::MinMaxScaler(p) => p.n_features,
        }
    }
}

/// Serializable representation of a fitted pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Transform stages in application order.
    pub transforms: Vec<(String, TransformParams)>,
    /// Final estimator stage.
    pub estimator: (String, SerializableLinearParams),
    /// Number of features seen during fit.
    pub n_features_in: usize,
}

impl PipelineParams {
    /// Qualified type name of a bare pipeline.
    pub const TYPE_NAME: &'static str = "pipeline::Pipeline";

    /// The template these fitted stages correspond to.
    pub fn spec(&self) -> PipelineSpec {
        let mut spec = PipelineSpec {
            steps: self
                .transforms
                .iter()
                .map(|(name, params)| (name.clone(), params.spec()))
                .collect(),
        };
        spec.steps.push((
            self.estimator.0.clone(),
            StepSpec::LinearRegression(LinearRegressionConfig::default()),
        ));
        spec
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.transforms
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(self.estimator.0.as_str()))
            .collect()
    }

    pub fn describe_steps(&self) -> Vec<String> {
        self.spec().describe_steps()
    }

    pub fn step_components(&self) -> Vec<Vec<&'static str>> {
        self.spec().step_components()
    }

    /// Checks stage names, each stage's parameters, and that stage widths
    /// chain up to the estimator.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        let mut seen = BTreeSet::new();
        for name in self.step_names() {
            if name.is_empty() || !seen.insert(name) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "Pipeline stage names must be unique and non-empty, got '{}'",
                    name
                )));
            }
        }

        let mut width = self.n_features_in;
        for (name, params) in &self.transforms {
            params.validate()?;
            if params.n_features_in() != width {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("stage '{}' taking {} features", name, width),
                    got: format!("{} features", params.n_features_in()),
                });
            }
            width = params.n_features_out();
        }

        let (name, linear) = &self.estimator;
        linear.validate()?;
        if linear.weights.len() != width {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("estimator '{}' with {} weights", name, width),
                got: format!("{} weights", linear.weights.len()),
            });
        }
        Ok(())
    }
}

/// A trait for fitted transformers that can be part of a pipeline.
pub trait PipelineStep<B: Backend>: Clone {
    /// Transform the data.
    fn transform_step(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError>;
    /// Get the step name for debugging.
    fn step_name(&self) -> &'static str;
}

/// A fitted transform stage.
#[derive(Clone)]
pub enum PipelineStepEnum<B: Backend> {
    ColumnTransformer(FittedColumnTransformer<B>),
    OneHotEncoder(FittedOneHotEncoder<B>),
    SelectKBest(FittedSelectKBest<B>),
    MinMaxScaler(FittedMinMaxScaler<B>),
}

impl<B: Backend> PipelineStep<B> for PipelineStepEnum<B> {
    fn transform_step(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        match self {
            PipelineStepEnum::ColumnTransformer(t) => t.transform(data),
            PipelineStepEnum::OneHotEncoder(t) => t.transform(data),
            PipelineStepEnum::SelectKBest(t) => t.transform(data),
            PipelineStepEnum::MinMaxScaler(t) => t.transform(data),
        }
    }

    fn step_name(&self) -> &'static str {
        match self {
            PipelineStepEnum::ColumnTransformer(_) => "ColumnTransformer",
            PipelineStepEnum::OneHotEncoder(_) => "OneHotEncoder",
            PipelineStepEnum::SelectKBest(_) => "SelectKBest",
            PipelineStepEnum::MinMaxScaler(_) => "MinMaxScaler",
        }
    }
}

impl<B: Backend> PipelineStepEnum<B> {
    fn from_params(params: TransformParams) -> Result<Self, PreprocessingError> {
        Ok(match params {
            TransformParams::ColumnTransformer(p) => {
                PipelineStepEnum::ColumnTransformer(FittedColumnTransformer::from_params(p)?)
            }
            TransformParams::OneHotEncoder(p) => {
                PipelineStepEnum::OneHotEncoder(FittedOneHotEncoder::from_params(p)?)
            }
            TransformParams::SelectKBest(p) => {
                PipelineStepEnum::SelectKBest(FittedSelectKBest::from_params(p)?)
            }
            TransformParams::MinMaxScaler(p) => {
                PipelineStepEnum::MinMaxScaler(FittedMinMaxScaler::from_params(p)?)
            }
        })
    }

    fn extract_params(&self) -> TransformParams {
        match self {
            PipelineStepEnum::ColumnTransformer(t) => {
                TransformParams::ColumnTransformer(t.extract_params())
            }
            PipelineStepEnum::OneHotEncoder(t) => TransformParams::OneHotEncoder(t.extract_params()),
            PipelineStepEnum::SelectKBest(t) => TransformParams::SelectKBest(t.extract_params()),
            PipelineStepEnum::MinMaxScaler(t) => TransformParams::MinMaxScaler(t.extract_params()),
        }
    }
}

/// Fitted pipeline ready for inference.
#[derive(Clone)]
pub struct FittedPipeline<B: Backend> {
    steps: Vec<(String, PipelineStepEnum<B>)>,
    estimator: (String, LinearModel<B, Fitted>),
    n_features_in: usize,
}

impl<B: Backend> FittedPipeline<B> {
    /// Rebuild every stage from stored parameters.
    pub fn from_params(params: PipelineParams) -> Result<Self, PreprocessingError> {
        params.validate()?;

        let steps = params
            .transforms
            .into_iter()
            .map(|(name, p)| Ok((name, PipelineStepEnum::from_params(p)?)))
            .collect::<Result<Vec<_>, PreprocessingError>>()?;
        let (name, linear) = params.estimator;

        Ok(Self {
            steps,
            estimator: (name, LinearModel::from_params(linear)?),
            n_features_in: params.n_features_in,
        })
    }

    pub fn extract_params(&self) -> PipelineParams {
        PipelineParams {
            transforms: self
                .steps
                .iter()
                .map(|(name, step)| (name.clone(), step.extract_params()))
                .collect(),
            estimator: (self.estimator.0.clone(), self.estimator.1.extract_params()),
            n_features_in: self.n_features_in,
        }
    }

    /// Number of stages, estimator included.
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    /// Stage names in order, estimator last.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(std::iter::once(self.estimator.0.as_str()))
            .collect()
    }

    /// Apply the transform stages only.
    pub fn transform(&self, data: &Tensor2D<B>) -> Result<Tensor2D<B>, PreprocessingError> {
        let (_, cols) = data.shape();
        if cols != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }

        let mut current = data.clone();
        for (_, step) in &self.steps {
            current = step.transform_step(&current)?;
        }
        Ok(current)
    }

    /// Transform then predict with the final estimator.
    pub fn predict(&self, data: &Tensor2D<B>) -> Result<Tensor1D<B>, PreprocessingError> {
        let processed = self.transform(data)?;
        self.estimator.1.predict_batch(&processed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::preprocessing::{
        ColumnTransformer, HandleUnknown, KSelection, MinMaxScaler, SelectKBest,
        SupervisedTransformer, Transformer,
    };

    fn create_test_data() -> (Tensor2D<CpuBackend>, Tensor1D<CpuBackend>) {
        // [fuel_code, present_price]
        let x = Tensor2D::new(
            vec![
                0.0f32, 0.0, //
                1.0, 10.0, //
                0.0, 5.0, //
                1.0, 2.0,
            ],
            4,
            2,
        );
        let y = Tensor1D::new(vec![0.5, 23.5, 10.5, 7.5]);
        (x, y)
    }

    fn fitted_params() -> PipelineParams {
        let (x, y) = create_test_data();

        let ct = ColumnTransformer::<CpuBackend>::new(vec![0])
            .with_remainder(Remainder::Passthrough)
            .fit(&x)
            .unwrap();
        let encoded = ct.transform(&x).unwrap();

        let selector = SelectKBest::<CpuBackend>::new(KSelection::K(2))
            .fit(&encoded, &y)
            .unwrap();
        let selected = selector.transform(&encoded).unwrap();

        let scaler = MinMaxScaler::<CpuBackend>::new().fit(&selected).unwrap();

        PipelineParams {
            transforms: vec![
                (
                    "preprocessor".to_string(),
                    TransformParams::ColumnTransformer(ct.extract_params()),
                ),
                (
                    "selector".to_string(),
                    TransformParams::SelectKBest(selector.extract_params()),
                ),
                (
                    "scaler".to_string(),
                    TransformParams::MinMaxScaler(scaler.extract_params()),
                ),
            ],
            estimator: (
                "regressor".to_string(),
                // Selector keeps [fuel_0, price]: y = -3 * fuel_0 + 2 * price + 3.5
                SerializableLinearParams {
                    weights: vec![-3.0, 20.0],
                    bias: 3.5,
                },
            ),
            n_features_in: 2,
        }
    }

    #[test]
    fn test_pipeline_predict() {
        let (x, y) = create_test_data();
        let pipeline = FittedPipeline::<CpuBackend>::from_params(fitted_params()).unwrap();

        let pred = pipeline.predict(&x).unwrap().to_vec();
        for (p, t) in pred.iter().zip(y.to_vec()) {
            assert!((p - t).abs() < 1e-6, "expected {}, got {}", t, p);
        }
    }

    #[test]
    fn test_pipeline_step_names() {
        let pipeline = FittedPipeline::<CpuBackend>::from_params(fitted_params()).unwrap();
        assert_eq!(
            pipeline.step_names(),
            vec!["preprocessor", "selector", "scaler", "regressor"]
        );
        assert_eq!(pipeline.len(), 4);
    }

    #[test]
    fn test_pipeline_feature_mismatch() {
        let pipeline = FittedPipeline::<CpuBackend>::from_params(fitted_params()).unwrap();
        let wrong = Tensor2D::<CpuBackend>::new(vec![1.0f32, 2.0, 3.0], 1, 3);
        assert!(matches!(
            pipeline.predict(&wrong),
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_pipeline_params_roundtrip() {
        let params = fitted_params();
        let pipeline = FittedPipeline::<CpuBackend>::from_params(params.clone()).unwrap();
        assert_eq!(pipeline.extract_params(), params);
    }

    #[test]
    fn test_validate_width_chain() {
        let mut params = fitted_params();
        params.estimator.1.weights = vec![1.0, 2.0, 3.0];
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::InvalidShape { .. })
        ));

        let mut params = fitted_params();
        params.n_features_in = 3;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_checks_each_stage() {
        let mut params = fitted_params();
        if let TransformParams::ColumnTransformer(ct) = &mut params.transforms[0].1 {
            ct.columns = vec![5];
        }
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::InvalidParameter(_))
        ));

        let mut params = fitted_params();
        if let TransformParams::SelectKBest(selector) = &mut params.transforms[1].1 {
            selector.selected.reverse();
        }
        assert!(params.validate().is_err());

        let mut params = fitted_params();
        params.estimator.1.bias = f32::NAN;
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::NumericalError(_))
        ));
    }

    #[test]
    fn test_describe_keeps_k_all() {
        let (x, y) = create_test_data();
        let selector = SelectKBest::<CpuBackend>::new(KSelection::All)
            .fit(&x, &y)
            .unwrap();
        let stage = TransformParams::SelectKBest(selector.extract_params());
        assert_eq!(
            stage.spec().describe(),
            "SelectKBest(k='all', score_func=f_regression)"
        );
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut params = fitted_params();
        params.estimator.0 = "scaler".to_string();
        assert!(matches!(
            params.validate(),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_describe_steps() {
        let params = fitted_params();
        assert_eq!(
            params.describe_steps(),
            vec![
                "('preprocessor', ColumnTransformer(remainder='passthrough', transformers=[('onehot', OneHotEncoder(), [0])]))",
                "('selector', SelectKBest(k=2, score_func=f_regression))",
                "('scaler', MinMaxScaler())",
                "('regressor', LinearRegression())",
            ]
        );
    }

    #[test]
    fn test_spec_components() {
        let spec = PipelineSpec::new()
            .step(
                "preprocessor",
                StepSpec::ColumnTransformer(ColumnTransformerConfig {
                    columns: vec![0],
                    encoder: OneHotEncoderConfig {
                        handle_unknown: HandleUnknown::Ignore,
                    },
                    remainder: Remainder::Passthrough,
                }),
            )
            .step("regressor", StepSpec::LinearRegression(Default::default()));

        assert_eq!(spec.step_names(), vec!["preprocessor", "regressor"]);
        assert_eq!(
            spec.step_components(),
            vec![
                vec!["ColumnTransformer", "OneHotEncoder"],
                vec!["LinearRegression"]
            ]
        );
        assert!(spec.describe_steps()[0].contains("OneHotEncoder(handle_unknown='ignore')"));
    }
}
