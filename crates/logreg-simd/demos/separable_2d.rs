//! Train on eight linearly separable 2-D points and print the fit.
//!
//! Run with `RUST_LOG=info cargo run --example separable_2d` to see the
//! kernel selection and training progress.

use logreg_simd::training::Verbosity;
use logreg_simd::{LogisticRegression, LogisticRegressionConfig, SamplesView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	#[rustfmt::skip]
	let x: [f32; 16] = [
		1.0, 2.0,
		2.0, 1.0,
		1.5, 1.8,
		2.2, 2.5,
		6.0, 7.0,
		7.0, 6.0,
		6.5, 7.2,
		7.5, 6.8,
	];
	let y = [0, 0, 0, 0, 1, 1, 1, 1];
	let samples = SamplesView::from_slice(&x, 8, 2).ok_or("feature buffer does not match 8x2")?;

	let config = LogisticRegressionConfig::builder()
		.learning_rate(0.1)
		.epochs(1000)
		.verbosity(Verbosity::Info)
		.log_period(250)
		.build()?;
	let mut model = LogisticRegression::from_config(2, config)?;
	model.train(samples, &y)?;

	println!("kernels: {}", model.isa());
	println!("weights: {:?}", model.weights());
	println!("bias:    {:.6}", model.bias());

	let probs = model.predict_batch(samples)?;
	for ((point, p), label) in samples.samples().zip(&probs).zip(&y) {
		let class = model.predict_class(point)?;
		println!("{point:?} -> p={p:.4} class={class} (label {label})");
	}
	Ok(())
}
