//! Binary logistic regression model.
//!
//! [`LogisticRegression`] owns the weights and bias and drives full-batch
//! gradient descent and inference through the process-wide [`KernelSet`].
//!
//! Inputs are staged into zero-padded, 32-byte aligned buffers whose rows are
//! a multiple of eight floats long, so the vector kernels always see whole
//! chunks. Single-sample and batch prediction stage rows identically and
//! therefore agree bit for bit.

use crate::data::SamplesView;
use crate::error::{LogRegError, Result, ShapeAxis};
use crate::kernels::{kernels, Isa, KernelSet};
use crate::memory::{padded_len, AlignedBuf, AllocError, Alignment};
use crate::training::{self, EpochMetrics, TrainingLogger, DECISION_THRESHOLD};

use super::{ConfigError, LogisticRegressionConfig};

/// Binary logistic regression trained by full-batch gradient descent.
///
/// A fresh model has zero weights and bias and predicts 0.5 for every input.
/// Each [`train`](Self::train) call continues descent from the current
/// parameters.
///
/// # Example
///
/// ```
/// use logreg_simd::{LogisticRegression, SamplesView};
///
/// let x = [0.0f32, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0];
/// let y = [0, 0, 1, 1];
///
/// let mut model = LogisticRegression::new(2, 0.5, 200).unwrap();
/// model.train(SamplesView::from_slice(&x, 4, 2).unwrap(), &y).unwrap();
/// assert_eq!(model.predict_class(&[3.0, 3.0]).unwrap(), 1);
/// assert_eq!(model.predict_class(&[0.0, 0.0]).unwrap(), 0);
/// ```
#[derive(Clone)]
pub struct LogisticRegression {
    n_features: usize,
    /// Length `padded_len(n_features)`; entries past `n_features` stay zero.
    weights: AlignedBuf,
    bias: f32,
    config: LogisticRegressionConfig,
    kernels: KernelSet,
}

impl LogisticRegression {
    /// Create a model with zero weights.
    ///
    /// # Errors
    ///
    /// [`LogRegError::Construction`] if `n_features == 0` or `learning_rate`
    /// is not a positive finite number.
    pub fn new(n_features: usize, learning_rate: f32, epochs: u32) -> Result<Self> {
        let config = LogisticRegressionConfig {
            learning_rate,
            epochs,
            ..Default::default()
        };
        Self::from_config(n_features, config)
    }

    /// Create a model from a full configuration.
    pub fn from_config(n_features: usize, config: LogisticRegressionConfig) -> Result<Self> {
        if n_features == 0 {
            return Err(ConfigError::InvalidNFeatures(0).into());
        }
        config.validate()?;
        let weights = AlignedBuf::zeroed(padded_len(n_features), Alignment::Simd256)?;
        Ok(Self {
            n_features,
            weights,
            bias: 0.0,
            config,
            kernels: *kernels(),
        })
    }

    /// Use a specific kernel tier instead of the detected one.
    ///
    /// Obtain `kernels` from [`KernelSet::for_isa`], which only succeeds on
    /// CPUs that support the tier.
    pub fn with_kernels(mut self, kernels: KernelSet) -> Self {
        self.kernels = kernels;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of features every sample must have.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Learned weights, one per feature.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights[..self.n_features]
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }

    #[inline]
    pub fn learning_rate(&self) -> f32 {
        self.config.learning_rate
    }

    #[inline]
    pub fn epochs(&self) -> u32 {
        self.config.epochs
    }

    pub fn config(&self) -> &LogisticRegressionConfig {
        &self.config
    }

    /// Kernel tier this model computes with.
    pub fn isa(&self) -> Isa {
        self.kernels.isa()
    }

    // =========================================================================
    // Training
    // =========================================================================

    /// Run `epochs` full-batch gradient descent steps on `samples`.
    ///
    /// Each step scores every sample (`dot(w, x) + b`), maps scores to
    /// probabilities, and moves the parameters against the mean log-loss
    /// gradient: `w -= lr * mean((p - y) * x)`, `b -= lr * mean(p - y)`.
    ///
    /// # Errors
    ///
    /// - [`LogRegError::ShapeMismatch`] if the column count differs from
    ///   `n_features` or `labels.len()` differs from the sample count
    /// - [`LogRegError::InvalidLabel`] for a label other than 0 or 1
    /// - [`LogRegError::Allocation`] if staging buffers cannot be allocated
    ///
    /// On error the weights and bias are unchanged.
    pub fn train(&mut self, samples: SamplesView<'_>, labels: &[i32]) -> Result<()> {
        self.check_columns(&samples)?;
        let n_samples = samples.n_samples();
        if labels.len() != n_samples {
            return Err(LogRegError::ShapeMismatch {
                axis: ShapeAxis::Labels,
                expected: n_samples,
                actual: labels.len(),
            });
        }
        if let Some((index, &value)) = labels.iter().enumerate().find(|&(_, &l)| l != 0 && l != 1) {
            return Err(LogRegError::InvalidLabel { index, value });
        }

        let epochs = self.config.epochs;
        let mut logger = TrainingLogger::new(self.config.verbosity).with_period(self.config.log_period);
        if epochs == 0 {
            return Ok(());
        }
        if n_samples == 0 {
            logger.warn("training batch is empty; parameters left unchanged");
            return Ok(());
        }

        // Every buffer is allocated before the first parameter update.
        let stride = self.weights.len();
        let rows = stage_rows(&samples, stride)?;
        let n_padded = padded_len(n_samples);
        let columns = stage_columns(&samples, n_padded)?;
        let mut scores = AlignedBuf::zeroed(n_samples, Alignment::Simd256)?;
        let mut probs = AlignedBuf::zeroed(n_samples, Alignment::Simd256)?;
        let mut residual = AlignedBuf::zeroed(n_padded, Alignment::Simd256)?;

        let k = self.kernels;
        let lr = self.config.learning_rate;
        let inv_n = 1.0 / n_samples as f32;

        logger.start_training(epochs, n_samples, self.n_features);

        for epoch in 0..epochs {
            for (z, row) in scores.iter_mut().zip(rows.chunks_exact(stride)) {
                *z = k.dot(row, &self.weights) + self.bias;
            }
            k.sigmoid(&scores, &mut probs);

            if logger.wants_epoch(epoch) {
                let metrics = EpochMetrics {
                    log_loss: training::log_loss(&probs, labels),
                    accuracy: training::accuracy(&probs, labels),
                };
                logger.log_epoch(epoch, &metrics);
            }

            let mut grad_bias = 0.0f32;
            for ((r, &p), &y) in residual.iter_mut().zip(probs.iter()).zip(labels) {
                *r = p - y as f32;
                grad_bias += *r;
            }

            for (w, column) in self.weights[..self.n_features]
                .iter_mut()
                .zip(columns.chunks_exact(n_padded))
            {
                let grad = k.dot(column, &residual) * inv_n;
                *w -= lr * grad;
            }
            self.bias -= lr * (grad_bias * inv_n);
        }

        logger.finish_training();
        Ok(())
    }

    // =========================================================================
    // Prediction
    // =========================================================================

    /// Probability that `sample` belongs to class 1.
    ///
    /// # Errors
    ///
    /// [`LogRegError::Dimension`] if `sample.len() != n_features`.
    pub fn predict(&self, sample: &[f32]) -> Result<f32> {
        if sample.len() != self.n_features {
            return Err(LogRegError::Dimension {
                expected: self.n_features,
                actual: sample.len(),
            });
        }
        let row = AlignedBuf::from_slice_padded(sample, self.weights.len(), Alignment::Simd256)?;
        let score = [self.kernels.dot(&row, &self.weights) + self.bias];
        let mut prob = [0.0f32];
        self.kernels.sigmoid(&score, &mut prob);
        Ok(prob[0])
    }

    /// Probability of class 1 for every sample, in order.
    ///
    /// Equivalent to calling [`predict`](Self::predict) on each sample.
    ///
    /// # Errors
    ///
    /// [`LogRegError::ShapeMismatch`] if the column count differs from
    /// `n_features`.
    pub fn predict_batch(&self, samples: SamplesView<'_>) -> Result<Vec<f32>> {
        self.check_columns(&samples)?;
        let n_samples = samples.n_samples();
        if n_samples == 0 {
            return Ok(Vec::new());
        }

        let stride = self.weights.len();
        let rows = stage_rows(&samples, stride)?;
        let mut scores = AlignedBuf::zeroed(n_samples, Alignment::Simd256)?;
        for (z, row) in scores.iter_mut().zip(rows.chunks_exact(stride)) {
            *z = self.kernels.dot(row, &self.weights) + self.bias;
        }

        let mut probs = vec![0.0f32; n_samples];
        self.kernels.sigmoid(&scores, &mut probs);
        Ok(probs)
    }

    /// Class (0 or 1) of `sample`: 1 iff its probability is at least 0.5.
    pub fn predict_class(&self, sample: &[f32]) -> Result<i32> {
        self.predict(sample).map(to_class)
    }

    /// Class (0 or 1) of every sample, in order.
    pub fn predict_class_batch(&self, samples: SamplesView<'_>) -> Result<Vec<i32>> {
        Ok(self.predict_batch(samples)?.into_iter().map(to_class).collect())
    }

    fn check_columns(&self, samples: &SamplesView<'_>) -> Result<()> {
        if samples.n_features() != self.n_features {
            return Err(LogRegError::ShapeMismatch {
                axis: ShapeAxis::Columns,
                expected: self.n_features,
                actual: samples.n_features(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for LogisticRegression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogisticRegression")
            .field("n_features", &self.n_features)
            .field("weights", &self.weights())
            .field("bias", &self.bias)
            .field("config", &self.config)
            .field("isa", &self.kernels.isa())
            .finish()
    }
}

#[inline]
fn to_class(p: f32) -> i32 {
    i32::from(p >= DECISION_THRESHOLD)
}

/// Copy samples into a sample-major buffer with rows padded to `stride`.
fn stage_rows(samples: &SamplesView<'_>, stride: usize) -> Result<AlignedBuf, AllocError> {
    let len = samples
        .n_samples()
        .checked_mul(stride)
        .ok_or(AllocError::SizeOverflow)?;
    let mut buf = AlignedBuf::zeroed(len, Alignment::Simd256)?;
    for (dst, src) in buf.chunks_exact_mut(stride).zip(samples.samples()) {
        dst[..src.len()].copy_from_slice(src);
    }
    Ok(buf)
}

/// Copy samples into a feature-major buffer with columns padded to `stride`.
fn stage_columns(samples: &SamplesView<'_>, stride: usize) -> Result<AlignedBuf, AllocError> {
    let len = samples
        .n_features()
        .checked_mul(stride)
        .ok_or(AllocError::SizeOverflow)?;
    let mut buf = AlignedBuf::zeroed(len, Alignment::Simd256)?;
    for (i, sample) in samples.samples().enumerate() {
        for (j, &v) in sample.iter().enumerate() {
            buf[j * stride + i] = v;
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::supported_isas;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    /// Two well-separated clusters in 2-D.
    fn separable() -> (Vec<f32>, Vec<i32>) {
        let x = vec![
            1.0, 2.0, 2.0, 1.0, 1.5, 1.5, 2.0, 2.5, //
            6.0, 7.0, 7.0, 6.0, 6.5, 6.5, 7.5, 7.0,
        ];
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            LogisticRegression::new(0, 0.1, 10).unwrap_err(),
            LogRegError::Construction(ConfigError::InvalidNFeatures(0))
        );
        for lr in [0.0, -0.1] {
            assert_eq!(
                LogisticRegression::new(3, lr, 10).unwrap_err(),
                LogRegError::Construction(ConfigError::InvalidLearningRate(lr))
            );
        }
    }

    #[test]
    fn fresh_model_predicts_half() {
        let model = LogisticRegression::new(5, 0.1, 10).unwrap();
        assert_eq!(model.weights(), &[0.0; 5]);
        assert_eq!(model.bias(), 0.0);
        assert_eq!(model.predict(&[1.0, -2.0, 3.0, 100.0, -7.0]).unwrap(), 0.5);
        assert_eq!(model.predict_class(&[0.0; 5]).unwrap(), 1);
    }

    #[test]
    fn zero_epochs_is_noop() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();
        let mut model = LogisticRegression::new(2, 0.1, 100).unwrap();
        model.train(samples, &y).unwrap();
        let (w, b) = (model.weights().to_vec(), model.bias());

        let mut frozen = LogisticRegression::from_config(
            2,
            LogisticRegressionConfig { epochs: 0, ..model.config().clone() },
        )
        .unwrap();
        frozen.weights.copy_from_slice(&model.weights);
        frozen.bias = model.bias;
        frozen.train(samples, &y).unwrap();
        assert_eq!(frozen.weights(), &w[..]);
        assert_eq!(frozen.bias().to_bits(), b.to_bits());
    }

    #[test]
    fn shape_errors_leave_state_untouched() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();
        let mut model = LogisticRegression::new(2, 0.1, 50).unwrap();
        model.train(samples, &y).unwrap();
        let before = model.clone();

        let err = model.train(samples, &y[..7]).unwrap_err();
        assert_eq!(
            err,
            LogRegError::ShapeMismatch { axis: ShapeAxis::Labels, expected: 8, actual: 7 }
        );

        let wide = SamplesView::from_slice(&x, 4, 4).unwrap();
        let err = model.train(wide, &y[..4]).unwrap_err();
        assert!(matches!(err, LogRegError::ShapeMismatch { axis: ShapeAxis::Columns, .. }));

        let mut bad = y.clone();
        bad[3] = 2;
        assert_eq!(
            model.train(samples, &bad).unwrap_err(),
            LogRegError::InvalidLabel { index: 3, value: 2 }
        );

        assert_eq!(model.weights(), before.weights());
        assert_eq!(model.bias(), before.bias());
    }

    #[test]
    fn predict_dimension_error() {
        let model = LogisticRegression::new(3, 0.1, 10).unwrap();
        assert_eq!(
            model.predict(&[1.0, 2.0]).unwrap_err(),
            LogRegError::Dimension { expected: 3, actual: 2 }
        );
        let samples = SamplesView::from_slice(&[1.0, 2.0], 1, 2).unwrap();
        assert!(matches!(
            model.predict_batch(samples).unwrap_err(),
            LogRegError::ShapeMismatch { axis: ShapeAxis::Columns, expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn learns_separable_clusters() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();
        let mut model = LogisticRegression::new(2, 0.1, 1000).unwrap();
        model.train(samples, &y).unwrap();

        assert_eq!(model.predict_class_batch(samples).unwrap(), y);
        assert!(model.predict(&[1.0, 1.0]).unwrap() < 0.1);
        assert!(model.predict(&[7.0, 7.0]).unwrap() > 0.9);
    }

    #[test]
    fn repeated_training_continues_descent() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();

        let mut twice = LogisticRegression::new(2, 0.1, 50).unwrap();
        twice.train(samples, &y).unwrap();
        twice.train(samples, &y).unwrap();

        let mut once = LogisticRegression::new(2, 0.1, 100).unwrap();
        once.train(samples, &y).unwrap();

        assert_eq!(twice.weights(), once.weights());
        assert_eq!(twice.bias(), once.bias());
    }

    #[test]
    fn training_is_deterministic() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();
        let mut a = LogisticRegression::new(2, 0.3, 200).unwrap();
        let mut b = LogisticRegression::new(2, 0.3, 200).unwrap();
        a.train(samples, &y).unwrap();
        b.train(samples, &y).unwrap();
        assert_eq!(a.weights(), b.weights());
        assert_eq!(a.bias().to_bits(), b.bias().to_bits());
    }

    #[test]
    fn empty_batch_is_noop() {
        let mut model = LogisticRegression::new(3, 0.1, 10).unwrap();
        let samples = SamplesView::from_slice(&[], 0, 3).unwrap();
        model.train(samples, &[]).unwrap();
        assert_eq!(model.weights(), &[0.0; 3]);
        assert!(model.predict_batch(samples).unwrap().is_empty());
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(8)]
    #[case(13)]
    fn batch_equals_single_on_every_isa(#[case] n_features: usize) {
        let n_samples = 21;
        let x: Vec<f32> = (0..n_samples * n_features)
            .map(|i| ((i * 37 % 101) as f32 - 50.0) / 17.0)
            .collect();
        let y: Vec<i32> = (0..n_samples).map(|i| (i % 3 == 0) as i32).collect();
        let samples = SamplesView::from_slice(&x, n_samples, n_features).unwrap();

        for isa in supported_isas() {
            let kernels = KernelSet::for_isa(isa).unwrap();
            let mut model = LogisticRegression::new(n_features, 0.2, 30)
                .unwrap()
                .with_kernels(kernels);
            model.train(samples, &y).unwrap();

            let batch = model.predict_batch(samples).unwrap();
            let classes = model.predict_class_batch(samples).unwrap();
            for (i, row) in samples.samples().enumerate() {
                let p = model.predict(row).unwrap();
                assert_eq!(p.to_bits(), batch[i].to_bits(), "isa {isa}, row {i}");
                assert_eq!(classes[i], i32::from(p >= 0.5));
            }
        }
    }

    #[test]
    fn tiers_train_to_similar_parameters() {
        let (x, y) = separable();
        let samples = SamplesView::from_slice(&x, 8, 2).unwrap();
        let mut reference = LogisticRegression::new(2, 0.1, 300)
            .unwrap()
            .with_kernels(KernelSet::for_isa(Isa::Scalar).unwrap());
        reference.train(samples, &y).unwrap();

        for isa in supported_isas() {
            let mut model = LogisticRegression::new(2, 0.1, 300)
                .unwrap()
                .with_kernels(KernelSet::for_isa(isa).unwrap());
            model.train(samples, &y).unwrap();
            for (a, b) in model.weights().iter().zip(reference.weights()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-3);
            }
            assert_abs_diff_eq!(model.bias(), reference.bias(), epsilon = 1e-3);
        }
    }
}
