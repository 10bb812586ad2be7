use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::data::SamplesView;

/// Generate random dense features in row-major order.
///
/// Values are uniform in `[min, max]`.
pub fn random_dense_f32(rows: usize, cols: usize, seed: u64, min: f32, max: f32) -> Vec<f32> {
	assert!(max >= min);
	let mut rng = StdRng::seed_from_u64(seed);
	let width = max - min;
	(0..rows * cols)
		.map(|_| min + rng.r#gen::<f32>() * width)
		.collect()
}

/// Generate standard-normal features in row-major order.
pub fn standard_normal_f32(rows: usize, cols: usize, seed: u64) -> Vec<f32> {
	let mut rng = StdRng::seed_from_u64(seed);
	(0..rows * cols)
		.map(|_| rng.sample::<f32, _>(StandardNormal))
		.collect()
}

/// Label each row 1 if `features · weights + bias > 0`, else 0.
pub fn linear_binary_labels(features_row_major: &[f32], weights: &[f32], bias: f32) -> Vec<i32> {
	let cols = weights.len();
	assert!(cols > 0);
	assert_eq!(features_row_major.len() % cols, 0);
	features_row_major
		.chunks_exact(cols)
		.map(|row| {
			let score: f32 = row.iter().zip(weights).map(|(x, w)| x * w).sum::<f32>() + bias;
			i32::from(score > 0.0)
		})
		.collect()
}

/// A row-major binary classification dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryProblem {
	pub features: Vec<f32>,
	pub labels: Vec<i32>,
	pub n_features: usize,
}

impl BinaryProblem {
	pub fn n_samples(&self) -> usize {
		self.labels.len()
	}

	pub fn samples(&self) -> SamplesView<'_> {
		SamplesView::from_packed(&self.features, self.n_samples(), self.n_features)
	}

	/// Split into the first `n_head` rows and the rest.
	pub fn split_at(&self, n_head: usize) -> (BinaryProblem, BinaryProblem) {
		let n_head = n_head.min(self.n_samples());
		let cut = n_head * self.n_features;
		let head = BinaryProblem {
			features: self.features[..cut].to_vec(),
			labels: self.labels[..n_head].to_vec(),
			n_features: self.n_features,
		};
		let tail = BinaryProblem {
			features: self.features[cut..].to_vec(),
			labels: self.labels[n_head..].to_vec(),
			n_features: self.n_features,
		};
		(head, tail)
	}
}

/// Standard-normal features labelled by a known linear decision boundary.
pub fn gaussian_linear_problem(n_samples: usize, weights: &[f32], bias: f32, seed: u64) -> BinaryProblem {
	let features = standard_normal_f32(n_samples, weights.len(), seed);
	let labels = linear_binary_labels(&features, weights, bias);
	BinaryProblem {
		features,
		labels,
		n_features: weights.len(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generators_are_seeded() {
		assert_eq!(random_dense_f32(3, 4, 7, -1.0, 1.0), random_dense_f32(3, 4, 7, -1.0, 1.0));
		assert_ne!(standard_normal_f32(3, 4, 7), standard_normal_f32(3, 4, 8));
	}

	#[test]
	fn uniform_range() {
		let data = random_dense_f32(50, 3, 1, 2.0, 5.0);
		assert!(data.iter().all(|&v| (2.0..=5.0).contains(&v)));
	}

	#[test]
	fn labels_follow_boundary() {
		let x = [1.0, 0.0, -1.0, 0.0, 0.0, 3.0];
		assert_eq!(linear_binary_labels(&x, &[1.0, -1.0], 0.5), vec![1, 0, 0]);
	}

	#[test]
	fn split_keeps_rows_together() {
		let problem = gaussian_linear_problem(10, &[1.0, 2.0, 3.0], 0.0, 3);
		let (head, tail) = problem.split_at(7);
		assert_eq!(head.n_samples(), 7);
		assert_eq!(tail.n_samples(), 3);
		assert_eq!(tail.features.len(), 9);
		assert_eq!(tail.samples().sample(0), problem.samples().sample(7));
	}
}
