//! Logistic regression model and its configuration.
//!
//! - [`LogisticRegression`]: weights, bias, training and prediction
//! - [`LogisticRegressionConfig`]: hyperparameters, built with validation
//!
//! # Example
//!
//! ```
//! use logreg_simd::model::{LogisticRegression, LogisticRegressionConfig};
//!
//! let config = LogisticRegressionConfig::builder()
//!     .learning_rate(0.05)
//!     .epochs(500)
//!     .build()
//!     .unwrap();
//! let model = LogisticRegression::from_config(4, config).unwrap();
//! assert_eq!(model.n_features(), 4);
//! ```

mod config;
mod logistic;

pub use config::{ConfigError, LogisticRegressionConfig, LogisticRegressionConfigBuilder};
pub use logistic::LogisticRegression;
