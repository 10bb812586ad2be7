//! Vectorized numeric kernels and their runtime dispatcher.
//!
//! Two operations dominate logistic regression: the inner product of a sample
//! with the weights, and the logistic function over a batch of scores. Each
//! comes in several instruction-set tiers; [`kernels`] resolves the best one
//! for the running CPU once and hands out the cached [`KernelSet`].
//!
//! ```
//! use logreg_simd::kernels::{kernels, KernelSet, Isa};
//!
//! let k = kernels();
//! assert_eq!(k.dot(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]), 6.0);
//!
//! // Specific tiers are available for comparison and benchmarking.
//! let scalar = KernelSet::for_isa(Isa::Scalar).unwrap();
//! let mut p = [0.0];
//! scalar.sigmoid(&[0.0], &mut p);
//! assert_eq!(p[0], 0.5);
//! ```

mod dispatch;
mod dot;
mod sigmoid;

pub use dispatch::{dot, kernels, sigmoid, supported_isas, DotFn, Isa, KernelSet, SigmoidFn};
pub use sigmoid::CLAMP as SIGMOID_CLAMP;
