//! Training progress logging.
//!
//! Records go through the `log` facade with structured key-values under the
//! `logreg_simd::training` target; install any logger (e.g. `env_logger`) to
//! see them. [`Verbosity`] gates what the trainer emits on top of the global
//! log level, and whether per-epoch metrics are computed at all.

use std::time::Instant;

const TARGET: &str = "logreg_simd::training";

/// How much the trainer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    /// Nothing.
    #[default]
    Silent,
    /// Warnings only.
    Warning,
    /// Start, periodic progress, and finish.
    Info,
    /// Every epoch.
    Debug,
}

/// Metrics for one epoch, evaluated on the training batch before the update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub log_loss: f64,
    pub accuracy: f64,
}

/// Emits training progress according to a [`Verbosity`].
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    period: u32,
    n_epochs: u32,
    started: Option<Instant>,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            period: 1,
            n_epochs: 0,
            started: None,
        }
    }

    /// Log progress every `period` epochs at `Info` (clamped to at least 1).
    pub fn with_period(mut self, period: u32) -> Self {
        self.period = period.max(1);
        self
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Whether [`log_epoch`](Self::log_epoch) would emit anything for `epoch`.
    pub fn wants_epoch(&self, epoch: u32) -> bool {
        match self.verbosity {
            Verbosity::Debug => true,
            Verbosity::Info => {
                (epoch + 1) % self.period == 0 || epoch + 1 == self.n_epochs
            }
            Verbosity::Silent | Verbosity::Warning => false,
        }
    }

    pub fn start_training(&mut self, n_epochs: u32, n_samples: usize, n_features: usize) {
        self.n_epochs = n_epochs;
        self.started = Some(Instant::now());
        if self.verbosity >= Verbosity::Info {
            log::info!(
                target: TARGET,
                epochs = n_epochs,
                samples = n_samples,
                features = n_features;
                "starting training"
            );
        }
    }

    pub fn log_epoch(&self, epoch: u32, metrics: &EpochMetrics) {
        if !self.wants_epoch(epoch) {
            return;
        }
        if self.verbosity >= Verbosity::Debug {
            log::debug!(
                target: TARGET,
                epoch = epoch,
                log_loss = metrics.log_loss,
                accuracy = metrics.accuracy;
                "epoch"
            );
        } else {
            log::info!(
                target: TARGET,
                epoch = epoch,
                log_loss = metrics.log_loss,
                accuracy = metrics.accuracy;
                "[{}/{}] logloss: {:.6} accuracy: {:.4}",
                epoch + 1,
                self.n_epochs,
                metrics.log_loss,
                metrics.accuracy
            );
        }
    }

    pub fn warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Warning {
            log::warn!(target: TARGET, "{message}");
        }
    }

    pub fn finish_training(&mut self) {
        let elapsed = self.started.take().map(|t| t.elapsed());
        if self.verbosity >= Verbosity::Info {
            let secs = elapsed.map_or(0.0, |d| d.as_secs_f64());
            log::info!(target: TARGET, elapsed_secs = secs; "finished training in {secs:.3}s");
        }
    }
}
