//! Boundary between host arrays and the model.
//!
//! Host code hands over `ndarray` views of any stride and element type. This
//! module validates their shapes against the model, converts features to
//! `f32` and labels to `i32`, and produces tightly packed sample-major data
//! before calling into [`LogisticRegression`]. Contiguous `f32` / `i32` input
//! is borrowed as-is; everything else is copied once. Alignment for the
//! kernels is handled by the model's own staging buffers.
//!
//! # Example
//!
//! ```
//! use ndarray::{array, s};
//! use logreg_simd::data::adapter;
//!
//! let x = array![[0.0f64, 0.0], [9.0, 9.0], [1.0, 1.0], [8.0, 8.0]];
//! let y = array![0i64, 1, 0, 1];
//!
//! let mut model = adapter::construct(2, 0.05, 1000).unwrap();
//! adapter::train(&mut model, x.view(), y.view()).unwrap();
//!
//! // Strided views are accepted directly.
//! let classes = adapter::predict_class_batch(&model, x.slice(s![..;2, ..])).unwrap();
//! assert_eq!(classes.to_vec(), vec![0, 0]);
//! ```

use std::borrow::Cow;
use std::fmt;

use ndarray::{Array1, ArrayView1, ArrayView2};
use thiserror::Error;

use super::SamplesView;
use crate::error::LogRegError;
use crate::model::{ConfigError, LogisticRegression, LogisticRegressionConfig};

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised at the host boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    /// Feature matrix width differs from the model's feature count.
    #[error("Shape mismatch: feature matrix has {actual} columns, model expects {expected}")]
    ColumnMismatch { expected: usize, actual: usize },

    /// Feature matrix height differs from the label count.
    #[error("Shape mismatch: feature matrix has {rows} rows but {labels} labels were given")]
    RowMismatch { rows: usize, labels: usize },

    /// Single sample of the wrong length.
    #[error("Shape mismatch: sample has {actual} features, model expects {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A label that cannot be represented as an `i32` class.
    #[error("Data conversion error: label {value} at index {index} is not an integer class")]
    LabelOutOfRange { index: usize, value: String },

    /// Error from the model itself.
    #[error(transparent)]
    Core(#[from] LogRegError),
}

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;

// =============================================================================
// Element conversion
// =============================================================================

/// Host feature element types that convert to `f32`.
pub trait FeatureElement: Copy {
    fn to_f32(self) -> f32;

    /// Reinterpret a slice as `f32` when no conversion is needed.
    fn as_f32_slice(_data: &[Self]) -> Option<&[f32]> {
        None
    }
}

impl FeatureElement for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn as_f32_slice(data: &[f32]) -> Option<&[f32]> {
        Some(data)
    }
}

macro_rules! impl_feature_element {
    ($($t:ty),* $(,)?) => {
        $(
            impl FeatureElement for $t {
                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }
            }
        )*
    };
}

impl_feature_element!(f64, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Host label element types that convert to an `i32` class.
pub trait LabelElement: Copy + fmt::Display {
    /// `None` if the value has no exact `i32` representation.
    fn to_label(self) -> Option<i32>;

    /// Reinterpret a slice as `i32` when no conversion is needed.
    fn as_i32_slice(_data: &[Self]) -> Option<&[i32]> {
        None
    }
}

impl LabelElement for i32 {
    #[inline]
    fn to_label(self) -> Option<i32> {
        Some(self)
    }

    #[inline]
    fn as_i32_slice(data: &[i32]) -> Option<&[i32]> {
        Some(data)
    }
}

impl LabelElement for bool {
    #[inline]
    fn to_label(self) -> Option<i32> {
        Some(i32::from(self))
    }
}

macro_rules! impl_int_label {
    ($($t:ty),* $(,)?) => {
        $(
            impl LabelElement for $t {
                #[inline]
                fn to_label(self) -> Option<i32> {
                    i32::try_from(self).ok()
                }
            }
        )*
    };
}

impl_int_label!(i8, i16, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float_label {
    ($($t:ty),* $(,)?) => {
        $(
            impl LabelElement for $t {
                #[inline]
                fn to_label(self) -> Option<i32> {
                    let in_range = self >= i32::MIN as $t && self <= i32::MAX as $t;
                    (self.fract() == 0.0 && in_range).then(|| self as i32)
                }
            }
        )*
    };
}

impl_float_label!(f32, f64);

// =============================================================================
// Coercion
// =============================================================================

/// Features coerced to packed sample-major `f32`.
#[derive(Debug, Clone)]
pub struct HostSamples<'a> {
    data: Cow<'a, [f32]>,
    n_samples: usize,
    n_features: usize,
}

impl HostSamples<'_> {
    /// Whether the host array was used without copying.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// View for the model.
    pub fn view(&self) -> SamplesView<'_> {
        SamplesView::from_packed(&self.data, self.n_samples, self.n_features)
    }
}

/// Convert a host feature matrix of any layout to packed `f32`.
pub fn coerce_features<T: FeatureElement>(x: ArrayView2<'_, T>) -> HostSamples<'_> {
    let (n_samples, n_features) = x.dim();
    let data = match x.to_slice().and_then(T::as_f32_slice) {
        Some(packed) => Cow::Borrowed(packed),
        // Logical iteration order is row-major whatever the strides are.
        None => Cow::Owned(x.iter().map(|&v| v.to_f32()).collect()),
    };
    HostSamples {
        data,
        n_samples,
        n_features,
    }
}

/// Convert a host sample vector of any stride to packed `f32`.
pub fn coerce_sample<T: FeatureElement>(x: ArrayView1<'_, T>) -> Cow<'_, [f32]> {
    match x.to_slice().and_then(T::as_f32_slice) {
        Some(packed) => Cow::Borrowed(packed),
        None => Cow::Owned(x.iter().map(|&v| v.to_f32()).collect()),
    }
}

/// Convert host labels of any stride to `i32`.
///
/// # Errors
///
/// [`AdapterError::LabelOutOfRange`] for the first value that is not an
/// integer representable as `i32`. Range against {0, 1} is checked by the
/// model.
pub fn coerce_labels<L: LabelElement>(y: ArrayView1<'_, L>) -> Result<Cow<'_, [i32]>> {
    if let Some(packed) = y.to_slice().and_then(L::as_i32_slice) {
        return Ok(Cow::Borrowed(packed));
    }
    y.iter()
        .enumerate()
        .map(|(index, &v)| {
            v.to_label().ok_or_else(|| AdapterError::LabelOutOfRange {
                index,
                value: v.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Cow::Owned)
}

// =============================================================================
// Model entry points
// =============================================================================

/// Create a model from host-typed hyperparameters.
///
/// # Errors
///
/// [`LogRegError::Construction`] (wrapped in [`AdapterError::Core`]) if
/// `n_features <= 0`, `learning_rate <= 0` or non-finite, or `epochs` is
/// negative or exceeds `u32::MAX`.
pub fn construct(n_features: i64, learning_rate: f64, epochs: i64) -> Result<LogisticRegression> {
    let construction = |e: ConfigError| AdapterError::Core(LogRegError::Construction(e));

    let n = usize::try_from(n_features)
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| construction(ConfigError::InvalidNFeatures(n_features)))?;
    let epochs = u32::try_from(epochs).map_err(|_| construction(ConfigError::InvalidEpochs(epochs)))?;
    let learning_rate = learning_rate as f32;
    if !(learning_rate.is_finite() && learning_rate > 0.0) {
        return Err(construction(ConfigError::InvalidLearningRate(learning_rate)));
    }

    let config = LogisticRegressionConfig {
        learning_rate,
        epochs,
        ..Default::default()
    };
    Ok(LogisticRegression::from_config(n, config)?)
}

/// Train `model` on host arrays.
pub fn train<T, L>(model: &mut LogisticRegression, x: ArrayView2<'_, T>, y: ArrayView1<'_, L>) -> Result<()>
where
    T: FeatureElement,
    L: LabelElement,
{
    check_columns(model, x.ncols())?;
    if x.nrows() != y.len() {
        return Err(AdapterError::RowMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    let labels = coerce_labels(y)?;
    let samples = coerce_features(x);
    log::trace!(
        borrowed = samples.is_borrowed(),
        rows = samples.n_samples();
        "coerced training batch"
    );
    model.train(samples.view(), &labels)?;
    Ok(())
}

/// Probability of class 1 for one host sample.
pub fn predict<T: FeatureElement>(model: &LogisticRegression, x: ArrayView1<'_, T>) -> Result<f32> {
    if x.len() != model.n_features() {
        return Err(AdapterError::LengthMismatch {
            expected: model.n_features(),
            actual: x.len(),
        });
    }
    Ok(model.predict(&coerce_sample(x))?)
}

/// Probability of class 1 for every row of a host matrix.
pub fn predict_batch<T: FeatureElement>(
    model: &LogisticRegression,
    x: ArrayView2<'_, T>,
) -> Result<Array1<f32>> {
    check_columns(model, x.ncols())?;
    let samples = coerce_features(x);
    Ok(Array1::from(model.predict_batch(samples.view())?))
}

/// Class (0 or 1) of one host sample.
pub fn predict_class<T: FeatureElement>(model: &LogisticRegression, x: ArrayView1<'_, T>) -> Result<i32> {
    if x.len() != model.n_features() {
        return Err(AdapterError::LengthMismatch {
            expected: model.n_features(),
            actual: x.len(),
        });
    }
    Ok(model.predict_class(&coerce_sample(x))?)
}

/// Class (0 or 1) of every row of a host matrix.
pub fn predict_class_batch<T: FeatureElement>(
    model: &LogisticRegression,
    x: ArrayView2<'_, T>,
) -> Result<Array1<i32>> {
    check_columns(model, x.ncols())?;
    let samples = coerce_features(x);
    Ok(Array1::from(model.predict_class_batch(samples.view())?))
}

fn check_columns(model: &LogisticRegression, actual: usize) -> Result<()> {
    if actual != model.n_features() {
        return Err(AdapterError::ColumnMismatch {
            expected: model.n_features(),
            actual,
        });
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
