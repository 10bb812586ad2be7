//! Sample views and host-array coercion.
//!
//! - [`SamplesView`]: packed sample-major batches consumed by the model
//! - [`adapter`]: validation and conversion of arbitrary `ndarray` views

pub mod adapter;
mod views;

pub use views::SamplesView;
