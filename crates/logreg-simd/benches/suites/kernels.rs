//! Component benchmarks: dot product and sigmoid per instruction-set tier.

#[path = "../common/mod.rs"]
mod common;

use common::criterion_config::default_criterion;
use common::matrix::KERNEL_LENGTHS;

use logreg_simd::kernels::{supported_isas, KernelSet};
use logreg_simd::testing::random_dense_f32;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn bench_dot(c: &mut Criterion) {
	let mut group = c.benchmark_group("component/kernels/dot");

	for &len in KERNEL_LENGTHS {
		let a = random_dense_f32(1, len, 1, -1.0, 1.0);
		let b = random_dense_f32(1, len, 2, -1.0, 1.0);
		group.throughput(Throughput::Elements(len as u64));

		for isa in supported_isas() {
			let Some(kernels) = KernelSet::for_isa(isa) else { continue };
			group.bench_with_input(BenchmarkId::new(isa.name(), len), &(&a, &b), |bench, (a, b)| {
				bench.iter(|| black_box(kernels.dot(black_box(a), black_box(b))))
			});
		}
	}

	group.finish();
}

fn bench_sigmoid(c: &mut Criterion) {
	let mut group = c.benchmark_group("component/kernels/sigmoid");

	for &len in KERNEL_LENGTHS {
		let input = random_dense_f32(1, len, 3, -20.0, 20.0);
		let mut output = vec![0.0f32; len];
		group.throughput(Throughput::Elements(len as u64));

		for isa in supported_isas() {
			let Some(kernels) = KernelSet::for_isa(isa) else { continue };
			group.bench_function(BenchmarkId::new(isa.name(), len), |bench| {
				bench.iter(|| {
					kernels.sigmoid(black_box(&input), &mut output);
					black_box(&output);
				})
			});
		}
	}

	group.finish();
}

criterion_group! {
	name = benches;
	config = default_criterion();
	targets = bench_dot, bench_sigmoid
}
criterion_main!(benches);
