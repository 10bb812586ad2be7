//! End-to-end benchmarks: training epochs and batch prediction.

#[path = "../common/mod.rs"]
mod common;

use common::criterion_config::{default_criterion, fast_criterion};
use common::matrix::MODEL_SHAPES;

use logreg_simd::kernels::{supported_isas, KernelSet};
use logreg_simd::testing::{gaussian_linear_problem, random_dense_f32};
use logreg_simd::LogisticRegression;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const EPOCHS: u32 = 10;

fn bench_train(c: &mut Criterion) {
	let mut group = c.benchmark_group("e2e/train");

	for shape in MODEL_SHAPES {
		let weights = random_dense_f32(1, shape.cols, 7, -1.0, 1.0);
		let problem = gaussian_linear_problem(shape.rows, &weights, 0.1, 42);
		group.throughput(Throughput::Elements((shape.rows * shape.cols) as u64 * EPOCHS as u64));

		for isa in supported_isas() {
			let Some(kernels) = KernelSet::for_isa(isa) else { continue };
			group.bench_function(BenchmarkId::new(isa.name(), shape.name), |b| {
				b.iter(|| {
					let mut model = LogisticRegression::new(shape.cols, 0.05, EPOCHS)
						.unwrap()
						.with_kernels(kernels);
					model.train(black_box(problem.samples()), &problem.labels).unwrap();
					black_box(model.bias())
				})
			});
		}
	}

	group.finish();
}

fn bench_predict_batch(c: &mut Criterion) {
	let mut group = c.benchmark_group("e2e/predict_batch");

	for shape in MODEL_SHAPES {
		let weights = random_dense_f32(1, shape.cols, 7, -1.0, 1.0);
		let problem = gaussian_linear_problem(shape.rows, &weights, 0.1, 42);
		let mut model = LogisticRegression::new(shape.cols, 0.05, EPOCHS).unwrap();
		model.train(problem.samples(), &problem.labels).unwrap();
		group.throughput(Throughput::Elements(shape.rows as u64));

		for isa in supported_isas() {
			let Some(kernels) = KernelSet::for_isa(isa) else { continue };
			let model = model.clone().with_kernels(kernels);
			group.bench_function(BenchmarkId::new(isa.name(), shape.name), |b| {
				b.iter(|| black_box(model.predict_batch(black_box(problem.samples())).unwrap()))
			});
		}
	}

	group.finish();
}

criterion_group! {
	name = train;
	config = fast_criterion();
	targets = bench_train
}
criterion_group! {
	name = predict;
	config = default_criterion();
	targets = bench_predict_batch
}
criterion_main!(train, predict);
