//! Inner-product kernels.
//!
//! Every variant walks the input in register-width chunks with a vector
//! accumulator, reduces the lanes once at the end, and finishes the last
//! `len % width` elements with a scalar loop. Loads are unaligned, so any
//! slice is accepted; aligned buffers just load faster.
//!
//! Inputs of different lengths are truncated to the shorter one.

use wide::f32x8;

/// Sequential scalar reference.
pub(crate) fn dot_scalar(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

/// Portable 8-lane variant on `wide` (NEON on aarch64, simd128 on wasm).
pub(crate) fn dot_portable(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    let n = a.len().min(b.len());
    let mut ca = a[..n].chunks_exact(8);
    let mut cb = b[..n].chunks_exact(8);

    let mut acc = f32x8::splat(0.0);
    for (x, y) in (&mut ca).zip(&mut cb) {
        acc = acc + load8(x) * load8(y);
    }

    let mut sum: f32 = acc.to_array().iter().sum();
    for (&x, &y) in ca.remainder().iter().zip(cb.remainder()) {
        sum += x * y;
    }
    sum
}

#[inline(always)]
pub(crate) fn load8(chunk: &[f32]) -> f32x8 {
    let mut lanes = [0.0f32; 8];
    lanes.copy_from_slice(chunk);
    f32x8::from(lanes)
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) use x86::{dot_avx, dot_avx2_fma, dot_sse2};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    // Safe entry points. They are only reachable through a `KernelSet`
    // resolved for a CPU that has the required features.

    pub(crate) fn dot_sse2(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        // SAFETY: selected only when SSE2 is detected.
        unsafe { sse2(a, b) }
    }

    pub(crate) fn dot_avx(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        // SAFETY: selected only when AVX is detected.
        unsafe { avx(a, b) }
    }

    pub(crate) fn dot_avx2_fma(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        // SAFETY: selected only when AVX2 and FMA are detected.
        unsafe { avx2_fma(a, b) }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn sse2(a: &[f32], b: &[f32]) -> f32 {
        let n = a.len().min(b.len());
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut i = 0;
        unsafe {
            let mut acc = _mm_setzero_ps();
            while i + 4 <= n {
                let x = _mm_loadu_ps(pa.add(i));
                let y = _mm_loadu_ps(pb.add(i));
                acc = _mm_add_ps(acc, _mm_mul_ps(x, y));
                i += 4;
            }
            let mut sum = hsum128(acc);
            while i < n {
                sum += *pa.add(i) * *pb.add(i);
                i += 1;
            }
            sum
        }
    }

    #[target_feature(enable = "avx")]
    unsafe fn avx(a: &[f32], b: &[f32]) -> f32 {
        let n = a.len().min(b.len());
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut i = 0;
        unsafe {
            let mut acc = _mm256_setzero_ps();
            while i + 8 <= n {
                let x = _mm256_loadu_ps(pa.add(i));
                let y = _mm256_loadu_ps(pb.add(i));
                acc = _mm256_add_ps(acc, _mm256_mul_ps(x, y));
                i += 8;
            }
            let mut sum = hsum256(acc);
            while i < n {
                sum += *pa.add(i) * *pb.add(i);
                i += 1;
            }
            sum
        }
    }

    #[target_feature(enable = "avx2,fma")]
    unsafe fn avx2_fma(a: &[f32], b: &[f32]) -> f32 {
        let n = a.len().min(b.len());
        let (pa, pb) = (a.as_ptr(), b.as_ptr());
        let mut i = 0;
        unsafe {
            let mut acc = _mm256_setzero_ps();
            while i + 8 <= n {
                let x = _mm256_loadu_ps(pa.add(i));
                let y = _mm256_loadu_ps(pb.add(i));
                acc = _mm256_fmadd_ps(x, y, acc);
                i += 8;
            }
            let mut sum = hsum256(acc);
            while i < n {
                sum = (*pa.add(i)).mul_add(*pb.add(i), sum);
                i += 1;
            }
            sum
        }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn hsum128(v: __m128) -> f32 {
        unsafe {
            let hi = _mm_movehl_ps(v, v);
            let sums = _mm_add_ps(v, hi);
            let odd = _mm_shuffle_ps::<0b01>(sums, sums);
            _mm_cvtss_f32(_mm_add_ss(sums, odd))
        }
    }

    #[target_feature(enable = "avx")]
    unsafe fn hsum256(v: __m256) -> f32 {
        unsafe {
            let lo = _mm256_castps256_ps128(v);
            let hi = _mm256_extractf128_ps::<1>(v);
            hsum128(_mm_add_ps(lo, hi))
        }
    }
}
