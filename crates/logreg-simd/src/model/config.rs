//! Model configuration with builder pattern.
//!
//! [`LogisticRegressionConfig`] collects the hyperparameters of gradient
//! descent training. It uses the `bon` crate for the builder and validates on
//! `build()`.
//!
//! # Example
//!
//! ```
//! use logreg_simd::model::LogisticRegressionConfig;
//! use logreg_simd::training::Verbosity;
//!
//! // All defaults: learning_rate = 0.1, epochs = 1000
//! let config = LogisticRegressionConfig::builder().build().unwrap();
//!
//! let config = LogisticRegressionConfig::builder()
//!     .learning_rate(0.05)
//!     .epochs(500)
//!     .verbosity(Verbosity::Info)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.epochs, 500);
//! ```

use bon::Builder;

use crate::training::Verbosity;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Feature count must be at least 1.
    InvalidNFeatures(i64),
    /// Learning rate must be positive and finite.
    InvalidLearningRate(f32),
    /// Epoch count must be in `0..=u32::MAX`.
    InvalidEpochs(i64),
    /// Logging period must be at least 1.
    InvalidLogPeriod,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNFeatures(v) => write!(f, "n_features must be positive, got {}", v),
            Self::InvalidLearningRate(v) => {
                write!(f, "learning_rate must be positive and finite, got {}", v)
            }
            Self::InvalidEpochs(v) => {
                write!(f, "epochs must be between 0 and {}, got {}", u32::MAX, v)
            }
            Self::InvalidLogPeriod => write!(f, "log_period must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// LogisticRegressionConfig
// =============================================================================

/// Training hyperparameters for [`LogisticRegression`](super::LogisticRegression).
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct LogisticRegressionConfig {
    /// Step size of every gradient update. Default: 0.1.
    #[builder(default = 0.1)]
    pub learning_rate: f32,

    /// Full-batch passes per `train` call. Default: 1000.
    ///
    /// Zero makes `train` a no-op.
    #[builder(default = 1000)]
    pub epochs: u32,

    // === Logging ===
    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,

    /// At `Info`, log progress every this many epochs. Default: 100.
    #[builder(default = 100)]
    pub log_period: u32,
}

impl<S: logistic_regression_config_builder::IsComplete> LogisticRegressionConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `learning_rate` is not a positive finite
    /// number or `log_period == 0`.
    pub fn build(self) -> Result<LogisticRegressionConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl LogisticRegressionConfig {
    /// Validate the configuration.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::InvalidLearningRate(self.learning_rate));
        }
        if self.log_period == 0 {
            return Err(ConfigError::InvalidLogPeriod);
        }
        Ok(())
    }
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 1000,
            verbosity: Verbosity::default(),
            log_period: 100,
        }
    }
}
