//! Supervised feature selection.
//!
//! | Transformer | Description |
//! |-------------|-------------|
//! | [`SelectKBest`] | Keep the `k` columns with the highest univariate scores |

mod k_best;

pub use k_best::{
    f_regression, FittedSelectKBest, KSelection, ScoreFunc, SelectKBest, SelectKBestConfig,
    SelectKBestParams,
};
