//! logreg-simd: binary logistic regression on runtime-dispatched SIMD kernels.
//!
//! Trains a linear classifier by full-batch gradient descent and serves
//! probability and class predictions. The two hot operations, the dot
//! product and the logistic function, are resolved once per process to the
//! widest instruction set the CPU supports (AVX2+FMA, AVX, SSE2, a portable
//! `wide` tier, or scalar).
//!
//! # Key Types
//!
//! - [`LogisticRegression`] - Model with train/predict
//! - [`LogisticRegressionConfig`] - Configuration builder
//! - [`SamplesView`] - Borrowed sample-major batches
//! - [`KernelSet`] / [`Isa`] - Resolved kernels and instruction-set tiers
//!
//! # Host arrays
//!
//! [`data::adapter`] accepts `ndarray` views of any layout and element type,
//! validates their shapes, and converts them before calling the model.
//!
//! # Example
//!
//! ```
//! use logreg_simd::{LogisticRegression, SamplesView};
//!
//! let x = [-2.0f32, -1.0, 1.0, 2.0];
//! let y = [0, 0, 1, 1];
//! let mut model = LogisticRegression::new(1, 0.5, 300).unwrap();
//! model.train(SamplesView::from_slice(&x, 4, 1).unwrap(), &y).unwrap();
//! assert!(model.predict(&[3.0]).unwrap() > 0.9);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod data;
pub mod error;
pub mod kernels;
pub mod memory;
pub mod model;
pub mod testing;
pub mod training;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::SamplesView;
pub use error::{LogRegError, ShapeAxis};
pub use kernels::{Isa, KernelSet};
pub use memory::{AlignedBuf, AllocError, Alignment};
pub use model::{ConfigError, LogisticRegression, LogisticRegressionConfig};
pub use training::Verbosity;
