//! Runtime selection of kernel implementations.
//!
//! CPU capabilities are probed once per process. The first supported tier in
//! [`Isa::PREFERENCE`] wins and its function pointers are cached in a
//! [`OnceLock`]; afterwards every call is a plain indirect call with no
//! feature checks or locking.

use std::fmt;
use std::sync::OnceLock;

use super::dot as dot_impl;
use super::sigmoid as sigmoid_impl;

/// Inner product of two equal-length slices.
pub type DotFn = fn(&[f32], &[f32]) -> f32;

/// Elementwise logistic function from `input` into `output` (same length).
pub type SigmoidFn = fn(&[f32], &mut [f32]);

// =============================================================================
// Isa
// =============================================================================

/// Instruction-set tier a [`KernelSet`] is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Isa {
    /// Plain Rust loops. Always available.
    Scalar,
    /// 8-lane `wide` vectors, lowered to whatever SIMD the build target has.
    Portable,
    /// 128-bit SSE2.
    Sse2,
    /// 256-bit AVX.
    Avx,
    /// 256-bit AVX2 with fused multiply-add.
    Avx2Fma,
}

impl Isa {
    /// Tiers from most to least capable.
    pub const PREFERENCE: [Isa; 5] = [Isa::Avx2Fma, Isa::Avx, Isa::Sse2, Isa::Portable, Isa::Scalar];

    /// Short lowercase name used in logs and benchmark ids.
    pub const fn name(self) -> &'static str {
        match self {
            Isa::Scalar => "scalar",
            Isa::Portable => "portable",
            Isa::Sse2 => "sse2",
            Isa::Avx => "avx",
            Isa::Avx2Fma => "avx2+fma",
        }
    }

    /// Elements processed per vector step.
    pub const fn lanes(self) -> usize {
        match self {
            Isa::Scalar => 1,
            Isa::Sse2 => 4,
            Isa::Portable | Isa::Avx | Isa::Avx2Fma => 8,
        }
    }

    /// Whether the running CPU can execute this tier.
    pub fn is_supported(self) -> bool {
        match self {
            Isa::Scalar | Isa::Portable => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Sse2 => is_x86_feature_detected!("sse2"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Avx => is_x86_feature_detected!("avx"),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Avx2Fma => is_x86_feature_detected!("avx2") && is_x86_feature_detected!("fma"),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            Isa::Sse2 | Isa::Avx | Isa::Avx2Fma => false,
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All tiers the running CPU supports, most capable first.
pub fn supported_isas() -> Vec<Isa> {
    Isa::PREFERENCE.into_iter().filter(|isa| isa.is_supported()).collect()
}

// =============================================================================
// KernelSet
// =============================================================================

/// A resolved pair of dot-product and sigmoid implementations.
#[derive(Clone, Copy)]
pub struct KernelSet {
    isa: Isa,
    dot: DotFn,
    sigmoid: SigmoidFn,
}

impl KernelSet {
    /// Kernels for `isa`, or `None` if the running CPU lacks the features.
    pub fn for_isa(isa: Isa) -> Option<Self> {
        if !isa.is_supported() {
            return None;
        }
        let (dot, sigmoid): (DotFn, SigmoidFn) = match isa {
            Isa::Scalar => (dot_impl::dot_scalar, sigmoid_impl::sigmoid_scalar),
            Isa::Portable => (dot_impl::dot_portable, sigmoid_impl::sigmoid_portable),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Sse2 => (dot_impl::dot_sse2, sigmoid_impl::sigmoid_sse2),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Avx => (dot_impl::dot_avx, sigmoid_impl::sigmoid_avx),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Isa::Avx2Fma => (dot_impl::dot_avx2_fma, sigmoid_impl::sigmoid_avx2_fma),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            Isa::Sse2 | Isa::Avx | Isa::Avx2Fma => return None,
        };
        Some(Self { isa, dot, sigmoid })
    }

    /// Probe the CPU and pick the most capable supported tier.
    ///
    /// Never fails: the scalar tier is always available.
    pub fn detect() -> Self {
        Isa::PREFERENCE
            .into_iter()
            .find_map(Self::for_isa)
            .unwrap_or(Self {
                isa: Isa::Scalar,
                dot: dot_impl::dot_scalar,
                sigmoid: sigmoid_impl::sigmoid_scalar,
            })
    }

    /// Tier these kernels were compiled for.
    #[inline]
    pub fn isa(&self) -> Isa {
        self.isa
    }

    /// Inner product of `a` and `b`.
    #[inline]
    pub fn dot(&self, a: &[f32], b: &[f32]) -> f32 {
        (self.dot)(a, b)
    }

    /// Logistic function of every element of `input`, written to `output`.
    #[inline]
    pub fn sigmoid(&self, input: &[f32], output: &mut [f32]) {
        (self.sigmoid)(input, output)
    }
}

impl fmt::Debug for KernelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelSet").field("isa", &self.isa).finish_non_exhaustive()
    }
}

static KERNELS: OnceLock<KernelSet> = OnceLock::new();

/// Process-wide kernels, detected on first use.
pub fn kernels() -> &'static KernelSet {
    KERNELS.get_or_init(|| {
        let set = KernelSet::detect();
        log::info!(isa = set.isa.name(), lanes = set.isa.lanes(); "resolved SIMD kernels");
        set
    })
}

/// Inner product through the process-wide kernels.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    kernels().dot(a, b)
}

/// Logistic function through the process-wide kernels.
#[inline]
pub fn sigmoid(input: &[f32], output: &mut [f32]) {
    kernels().sigmoid(input, output)
}
