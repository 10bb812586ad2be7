//! Training infrastructure: progress logging and evaluation metrics.
//!
//! - [`TrainingLogger`], [`Verbosity`]: Structured logging
//! - [`log_loss`], [`accuracy`], [`class_accuracy`]: Binary classification metrics
//!
//! The gradient descent loop itself lives on
//! [`LogisticRegression::train`](crate::LogisticRegression::train).

mod logger;
mod metrics;

pub use logger::{EpochMetrics, TrainingLogger, Verbosity};
pub use metrics::{accuracy, class_accuracy, log_loss, DECISION_THRESHOLD};
