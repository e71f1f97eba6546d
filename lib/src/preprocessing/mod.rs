//! Data preprocessing transformers for regression pipelines.
//!
//! Transformers follow the same type-state split as models in this library.
//!
//! # Design Philosophy
//!
//! - **Type Safety**: unfitted and fitted transformers are distinct types
//! - **Backend Agnostic**: all transformers work with any `Backend` implementation
//! - **Serializable**: fitted transformers round-trip through plain parameter structs
//! - **sklearn-compatible**: names, defaults and reprs follow scikit-learn
//!
//! # Core Traits
//!
//! - [`Transformer`]: unfitted transformer with hyperparameters
//! - [`SupervisedTransformer`]: unfitted transformer that needs the target to fit
//! - [`FittedTransformer`]: fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! ## Encoding
//! - [`OneHotEncoder`]: categorical codes to dummy columns
//! - [`ColumnTransformer`]: one-hot encode a column subset, pass through the rest
//!
//! ## Selection
//! - [`SelectKBest`]: keep the `k` best columns by `f_regression`
//!
//! ## Scaling
//! - [`MinMaxScaler`]: scale to [0, 1] or custom range
//!
//! # Example
//!
//! ```ignore
//! use regression_grader::preprocessing::{FittedTransformer, MinMaxScaler, Transformer};
//! use regression_grader::backend::CpuBackend;
//!
//! let fitted = MinMaxScaler::<CpuBackend>::new().fit(&training_data)?;
//! let scaled_train = fitted.transform(&training_data)?;
//!
//! fitted.save_to_file("scaler.bin")?;
//! let loaded = FittedMinMaxScaler::load_from_file("scaler.bin")?;
//! let scaled_test = loaded.transform(&test_data)?;
//! ```

pub mod column_transformer;
pub mod encoding;
pub mod error;
pub mod scaling;
pub mod selection;
pub mod traits;

// Re-export main types
pub use column_transformer::{
    ColumnTransformer, ColumnTransformerConfig, ColumnTransformerParams,
    FittedColumnTransformer, Remainder,
};
pub use encoding::{
    FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderConfig, OneHotEncoderParams,
};
pub use error::PreprocessingError;
pub use scaling::{FittedMinMaxScaler, MinMaxScaler, MinMaxScalerConfig, MinMaxScalerParams};
pub use selection::{
    f_regression, FittedSelectKBest, KSelection, ScoreFunc, SelectKBest, SelectKBestConfig,
    SelectKBestParams,
};
pub use traits::{FittedTransformer, SupervisedTransformer, Transformer};
