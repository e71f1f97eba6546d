//! ColumnTransformer for applying an encoder to a subset of columns.
//!
//! This module provides the `ColumnTransformer` which one-hot encodes the
//! categorical columns of a frame and passes through (or drops) the rest.

#[allow(clippy::module_inception)]
mod column_transformer;

pub use column_transformer::{
    ColumnTransformer, ColumnTransformerConfig, ColumnTransformerParams,
    FittedColumnTransformer, Remainder,
};
