//! Seeded synthetic data shared by tests, benchmarks and demos.

mod data;

pub use data::{
	gaussian_linear_problem, linear_binary_labels, random_dense_f32, standard_normal_f32,
	BinaryProblem,
};
