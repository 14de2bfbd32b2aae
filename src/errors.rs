//! Errors
//!
//! Error type shared by dataset validation, tree construction and prediction.
use thiserror::Error;

/// Errors that can occur while building or querying a decision tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// Malformed data, mismatched data/label shapes or an out-of-range hyperparameter.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The tree was queried before `fit` built it.
    #[error("Tree wasn't built yet.")]
    NotFitted,
    /// A sample has a different number of features than the training data.
    #[error("Expected {expected} features per sample, but {found} provided.")]
    DimensionMismatch { expected: usize, found: usize },
}
