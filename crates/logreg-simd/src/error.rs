//! Error types for model construction, training and inference.

use std::fmt;

use thiserror::Error;

use crate::memory::AllocError;
use crate::model::ConfigError;

/// Which dimension of a training batch disagreed with the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeAxis {
    /// Number of feature columns.
    Columns,
    /// Number of labels relative to the number of rows.
    Labels,
}

impl fmt::Display for ShapeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Columns => f.write_str("feature columns"),
            Self::Labels => f.write_str("label count"),
        }
    }
}

/// Errors surfaced by [`LogisticRegression`](crate::LogisticRegression).
///
/// Every check runs before any parameter is touched, so a model that returned
/// an error is in exactly the state it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LogRegError {
    /// Invalid hyperparameters at construction.
    #[error("invalid model configuration: {0}")]
    Construction(#[from] ConfigError),

    /// Training batch does not fit the model.
    #[error("shape mismatch in {axis}: expected {expected}, got {actual}")]
    ShapeMismatch {
        axis: ShapeAxis,
        expected: usize,
        actual: usize,
    },

    /// Single sample of the wrong length.
    #[error("expected a sample with {expected} features, got {actual}")]
    Dimension { expected: usize, actual: usize },

    /// A label outside {0, 1}.
    #[error("label {value} at index {index} is not 0 or 1")]
    InvalidLabel { index: usize, value: i32 },

    /// Aligned staging or parameter memory could not be obtained.
    #[error(transparent)]
    Allocation(#[from] AllocError),
}

pub type Result<T, E = LogRegError> = std::result::Result<T, E>;
