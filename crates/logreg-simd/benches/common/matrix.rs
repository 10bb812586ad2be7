/// Vector lengths for kernel benchmarks: aligned sizes plus awkward tails.
pub const KERNEL_LENGTHS: &[usize] = &[7, 64, 257, 4_096, 65_537];

/// Common dataset shapes used across model benchmarks.
#[derive(Debug, Clone, Copy)]
pub struct DatasetShape {
	pub name: &'static str,
	pub rows: usize,
	pub cols: usize,
}

pub const MODEL_SHAPES: &[DatasetShape] = &[
	DatasetShape {
		name: "narrow",
		rows: 10_000,
		cols: 4,
	},
	DatasetShape {
		name: "medium",
		rows: 10_000,
		cols: 50,
	},
	DatasetShape {
		name: "wide",
		rows: 2_000,
		cols: 1_000,
	},
];
