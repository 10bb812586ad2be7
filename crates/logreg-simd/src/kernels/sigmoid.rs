//! Elementwise logistic function `1 / (1 + exp(-z))`.
//!
//! Inputs are clamped to `[-CLAMP, CLAMP]` before the exponential, so large
//! positive scores saturate to 1, large negative scores saturate toward 0
//! without ever producing a subnormal, and no finite input yields NaN or Inf.
//!
//! The vector variants evaluate `exp` as `2^n * p(r)`: `n = round(x / ln2)`,
//! `r = x - n * ln2` (Cody-Waite split), and `p` is a degree-6 Taylor
//! polynomial in Horner form. `2^n` is assembled directly in the exponent bits.
//!
//! Each vector variant finishes its tail with a scalar copy of the exact lane
//! arithmetic ([`sigmoid_lane`] / [`sigmoid_lane_fma`]), so an element gets the
//! same bits whether it lands in a lane or in the remainder.

use wide::f32x8;

use super::dot::load8;

/// Magnitude bound applied to the input of `exp`.
pub const CLAMP: f32 = 80.0;

const LOG2E: f32 = std::f32::consts::LOG2_E;
const LN2_HI: f32 = 6.931_457_5e-1;
const LN2_LO: f32 = 1.428_606_8e-6;

const C2: f32 = 1.0 / 2.0;
const C3: f32 = 1.0 / 6.0;
const C4: f32 = 1.0 / 24.0;
const C5: f32 = 1.0 / 120.0;
const C6: f32 = 1.0 / 720.0;

/// Scalar reference using the standard library `exp`.
pub(crate) fn sigmoid_scalar(input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), output.len());
    for (o, &z) in output.iter_mut().zip(input) {
        *o = sigmoid_ref(z);
    }
}

#[inline]
pub(crate) fn sigmoid_ref(z: f32) -> f32 {
    1.0 / (1.0 + (-z.clamp(-CLAMP, CLAMP)).exp())
}

#[inline(always)]
fn pow2i(n: f32) -> f32 {
    f32::from_bits(((n as i32 + 127) as u32) << 23)
}

/// One lane of the separate-multiply-add variants (SSE2, AVX, portable).
#[inline(always)]
pub(crate) fn sigmoid_lane(z: f32) -> f32 {
    let x = (0.0 - z).max(-CLAMP).min(CLAMP);
    let n = (x * LOG2E).round_ties_even();
    let r = (x - n * LN2_HI) - n * LN2_LO;
    let mut p = C6;
    p = p * r + C5;
    p = p * r + C4;
    p = p * r + C3;
    p = p * r + C2;
    p = p * r + 1.0;
    p = p * r + 1.0;
    1.0 / (1.0 + p * pow2i(n))
}

/// One lane of the fused-multiply-add variant (AVX2+FMA).
#[inline(always)]
pub(crate) fn sigmoid_lane_fma(z: f32) -> f32 {
    let x = (0.0 - z).max(-CLAMP).min(CLAMP);
    let n = (x * LOG2E).round_ties_even();
    let r = (-n).mul_add(LN2_HI, x);
    let r = (-n).mul_add(LN2_LO, r);
    let mut p = C6;
    p = p.mul_add(r, C5);
    p = p.mul_add(r, C4);
    p = p.mul_add(r, C3);
    p = p.mul_add(r, C2);
    p = p.mul_add(r, 1.0);
    p = p.mul_add(r, 1.0);
    1.0 / (1.0 + p * pow2i(n))
}

/// Portable 8-lane variant on `wide`.
pub(crate) fn sigmoid_portable(input: &[f32], output: &mut [f32]) {
    debug_assert_eq!(input.len(), output.len());
    let n = input.len().min(output.len());
    let (input, output) = (&input[..n], &mut output[..n]);

    let zero = f32x8::splat(0.0);
    let one = f32x8::splat(1.0);
    let lo = f32x8::splat(-CLAMP);
    let hi = f32x8::splat(CLAMP);

    let mut zs = input.chunks_exact(8);
    let mut outs = output.chunks_exact_mut(8);
    for (z, out) in (&mut zs).zip(&mut outs) {
        let x = (zero - load8(z)).max(lo).min(hi);

        // Rounding and exponent assembly per lane keep ties-to-even exact.
        let scaled = (x * f32x8::splat(LOG2E)).to_array();
        let mut nf = [0.0f32; 8];
        let mut scale = [0.0f32; 8];
        for ((n, s), &t) in nf.iter_mut().zip(scale.iter_mut()).zip(&scaled) {
            *n = t.round_ties_even();
            *s = pow2i(*n);
        }
        let nf = f32x8::from(nf);

        let r = (x - nf * f32x8::splat(LN2_HI)) - nf * f32x8::splat(LN2_LO);
        let mut p = f32x8::splat(C6);
        p = p * r + f32x8::splat(C5);
        p = p * r + f32x8::splat(C4);
        p = p * r + f32x8::splat(C3);
        p = p * r + f32x8::splat(C2);
        p = p * r + one;
        p = p * r + one;

        let e = p * f32x8::from(scale);
        out.copy_from_slice(&(one / (one + e)).to_array());
    }

    for (o, &z) in outs.into_remainder().iter_mut().zip(zs.remainder()) {
        *o = sigmoid_lane(z);
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub(crate) use x86::{sigmoid_avx, sigmoid_avx2_fma, sigmoid_sse2};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    use super::{
        sigmoid_lane, sigmoid_lane_fma, C2, C3, C4, C5, C6, CLAMP, LN2_HI, LN2_LO, LOG2E,
    };

    pub(crate) fn sigmoid_sse2(input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        // SAFETY: selected only when SSE2 is detected.
        unsafe { sse2(input, output) }
    }

    pub(crate) fn sigmoid_avx(input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        // SAFETY: selected only when AVX is detected.
        unsafe { avx(input, output) }
    }

    pub(crate) fn sigmoid_avx2_fma(input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());
        // SAFETY: selected only when AVX2 and FMA are detected.
        unsafe { avx2_fma(input, output) }
    }

    #[target_feature(enable = "sse2")]
    unsafe fn sse2(input: &[f32], output: &mut [f32]) {
        let n = input.len().min(output.len());
        let (src, dst) = (input.as_ptr(), output.as_mut_ptr());
        let mut i = 0;
        unsafe {
            let zero = _mm_setzero_ps();
            let one = _mm_set1_ps(1.0);
            let lo = _mm_set1_ps(-CLAMP);
            let hi = _mm_set1_ps(CLAMP);
            let bias = _mm_set1_epi32(127);

            while i + 4 <= n {
                let z = _mm_loadu_ps(src.add(i));
                let x = _mm_min_ps(_mm_max_ps(_mm_sub_ps(zero, z), lo), hi);

                let ni = _mm_cvtps_epi32(_mm_mul_ps(x, _mm_set1_ps(LOG2E)));
                let nf = _mm_cvtepi32_ps(ni);
                let r = _mm_sub_ps(
                    _mm_sub_ps(x, _mm_mul_ps(nf, _mm_set1_ps(LN2_HI))),
                    _mm_mul_ps(nf, _mm_set1_ps(LN2_LO)),
                );

                let mut p = _mm_set1_ps(C6);
                p = _mm_add_ps(_mm_mul_ps(p, r), _mm_set1_ps(C5));
                p = _mm_add_ps(_mm_mul_ps(p, r), _mm_set1_ps(C4));
                p = _mm_add_ps(_mm_mul_ps(p, r), _mm_set1_ps(C3));
                p = _mm_add_ps(_mm_mul_ps(p, r), _mm_set1_ps(C2));
                p = _mm_add_ps(_mm_mul_ps(p, r), one);
                p = _mm_add_ps(_mm_mul_ps(p, r), one);

                let scale = _mm_castsi128_ps(_mm_slli_epi32::<23>(_mm_add_epi32(ni, bias)));
                let e = _mm_mul_ps(p, scale);
                _mm_storeu_ps(dst.add(i), _mm_div_ps(one, _mm_add_ps(one, e)));
                i += 4;
            }
            while i < n {
                *dst.add(i) = sigmoid_lane(*src.add(i));
                i += 1;
            }
        }
    }

    #[target_feature(enable = "avx")]
    unsafe fn avx(input: &[f32], output: &mut [f32]) {
        let n = input.len().min(output.len());
        let (src, dst) = (input.as_ptr(), output.as_mut_ptr());
        let mut i = 0;
        unsafe {
            let zero = _mm256_setzero_ps();
            let one = _mm256_set1_ps(1.0);
            let lo = _mm256_set1_ps(-CLAMP);
            let hi = _mm256_set1_ps(CLAMP);
            let bias = _mm_set1_epi32(127);

            while i + 8 <= n {
                let z = _mm256_loadu_ps(src.add(i));
                let x = _mm256_min_ps(_mm256_max_ps(_mm256_sub_ps(zero, z), lo), hi);

                let ni = _mm256_cvtps_epi32(_mm256_mul_ps(x, _mm256_set1_ps(LOG2E)));
                let nf = _mm256_cvtepi32_ps(ni);
                let r = _mm256_sub_ps(
                    _mm256_sub_ps(x, _mm256_mul_ps(nf, _mm256_set1_ps(LN2_HI))),
                    _mm256_mul_ps(nf, _mm256_set1_ps(LN2_LO)),
                );

                let mut p = _mm256_set1_ps(C6);
                p = _mm256_add_ps(_mm256_mul_ps(p, r), _mm256_set1_ps(C5));
                p = _mm256_add_ps(_mm256_mul_ps(p, r), _mm256_set1_ps(C4));
                p = _mm256_add_ps(_mm256_mul_ps(p, r), _mm256_set1_ps(C3));
                p = _mm256_add_ps(_mm256_mul_ps(p, r), _mm256_set1_ps(C2));
                p = _mm256_add_ps(_mm256_mul_ps(p, r), one);
                p = _mm256_add_ps(_mm256_mul_ps(p, r), one);

                // AVX has no 256-bit integer ops: build the exponent per half.
                let n_lo = _mm256_castsi256_si128(ni);
                let n_hi = _mm256_extractf128_si256::<1>(ni);
                let e_lo = _mm_slli_epi32::<23>(_mm_add_epi32(n_lo, bias));
                let e_hi = _mm_slli_epi32::<23>(_mm_add_epi32(n_hi, bias));
                let scale = _mm256_castsi256_ps(_mm256_set_m128i(e_hi, e_lo));

                let e = _mm256_mul_ps(p, scale);
                _mm256_storeu_ps(dst.add(i), _mm256_div_ps(one, _mm256_add_ps(one, e)));
                i += 8;
            }
            while i < n {
                *dst.add(i) = sigmoid_lane(*src.add(i));
                i += 1;
            }
        }
    }

    #[target_feature(enable = "avx2,fma")]
    unsafe fn avx2_fma(input: &[f32], output: &mut [f32]) {
        let n = input.len().min(output.len());
        let (src, dst) = (input.as_ptr(), output.as_mut_ptr());
        let mut i = 0;
        unsafe {
            let zero = _mm256_setzero_ps();
            let one = _mm256_set1_ps(1.0);
            let lo = _mm256_set1_ps(-CLAMP);
            let hi = _mm256_set1_ps(CLAMP);
            let bias = _mm256_set1_epi32(127);

            while i + 8 <= n {
                let z = _mm256_loadu_ps(src.add(i));
                let x = _mm256_min_ps(_mm256_max_ps(_mm256_sub_ps(zero, z), lo), hi);

                let ni = _mm256_cvtps_epi32(_mm256_mul_ps(x, _mm256_set1_ps(LOG2E)));
                let nf = _mm256_cvtepi32_ps(ni);
                let r = _mm256_fnmadd_ps(nf, _mm256_set1_ps(LN2_HI), x);
                let r = _mm256_fnmadd_ps(nf, _mm256_set1_ps(LN2_LO), r);

                let mut p = _mm256_set1_ps(C6);
                p = _mm256_fmadd_ps(p, r, _mm256_set1_ps(C5));
                p = _mm256_fmadd_ps(p, r, _mm256_set1_ps(C4));
                p = _mm256_fmadd_ps(p, r, _mm256_set1_ps(C3));
                p = _mm256_fmadd_ps(p, r, _mm256_set1_ps(C2));
                p = _mm256_fmadd_ps(p, r, one);
                p = _mm256_fmadd_ps(p, r, one);

                let scale = _mm256_castsi256_ps(_mm256_slli_epi32::<23>(_mm256_add_epi32(ni, bias)));
                let e = _mm256_mul_ps(p, scale);
                _mm256_storeu_ps(dst.add(i), _mm256_div_ps(one, _mm256_add_ps(one, e)));
                i += 8;
            }
            while i < n {
                *dst.add(i) = sigmoid_lane_fma(*src.add(i));
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_saturates() {
        assert_eq!(sigmoid_ref(0.0), 0.5);
        assert!((1.0 - sigmoid_ref(50.0)) < 1e-5);
        assert!(sigmoid_ref(-50.0) < 1e-5);
        assert_eq!(sigmoid_ref(1e6), 1.0);
        assert!(sigmoid_ref(-1e6).is_normal());
    }

    #[test]
    fn lanes_track_reference() {
        let mut z = -90.0f32;
        while z <= 90.0 {
            let reference = sigmoid_ref(z);
            assert_relative_eq!(sigmoid_lane(z), reference, max_relative = 1e-5);
            assert_relative_eq!(sigmoid_lane_fma(z), reference, max_relative = 1e-5);
            z += 0.173;
        }
    }

    #[test]
    fn portable_lanes_equal_tail() {
        let input: Vec<f32> = (0..21).map(|i| (i as f32 - 10.0) * 1.37).collect();
        let mut out = vec![0.0; input.len()];
        sigmoid_portable(&input, &mut out);
        for (&z, &p) in input.iter().zip(&out) {
            assert_eq!(p, sigmoid_lane(z));
        }
    }

    #[test]
    fn pow2i_builds_exact_powers() {
        assert_eq!(pow2i(0.0), 1.0);
        assert_eq!(pow2i(10.0), 1024.0);
        assert_eq!(pow2i(-3.0), 0.125);
    }
}
