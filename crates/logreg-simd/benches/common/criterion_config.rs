use std::time::Duration;

use criterion::Criterion;

/// Baseline Criterion configuration for all benchmarks.
///
/// Individual benchmarks may override settings when needed.
pub fn default_criterion() -> Criterion {
	Criterion::default()
		// Allows `--bench` command-line overrides.
		.configure_from_args()
		.warm_up_time(Duration::from_secs(2))
		.measurement_time(Duration::from_secs(8))
		.sample_size(30)
}

/// Fast criterion config for training benchmarks, where one iteration is long.
pub fn fast_criterion() -> Criterion {
	Criterion::default()
		.configure_from_args()
		.warm_up_time(Duration::from_secs(1))
		.measurement_time(Duration::from_secs(5))
		.sample_size(10)
}
