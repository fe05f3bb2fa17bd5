//! x86_64 backend.
//!
//! SSE2 registers are always available on x86_64. The AVX registers exist
//! only when the build selected AVX (`cfg(shortvec_avx)`), which `build.rs`
//! does only if the target enables the `avx` feature, so the intrinsics
//! inline. Gathers use the native AVX2 instruction under `cfg(shortvec_avx2)`
//! and are emulated with scalar loads otherwise.

use crate::register::{NativeRegister, RsqrtEstimate};
use crate::sqrt::{deferred_sqrt, exact_sqrt};
use core::arch::x86_64::*;
use core::fmt::{Debug, Formatter};

#[cfg(all(shortvec_avx, not(target_feature = "avx")))]
compile_error!("shortvec_avx requires the avx target feature");
#[cfg(all(shortvec_avx2, not(target_feature = "avx2")))]
compile_error!("shortvec_avx2 requires the avx2 target feature");

/// Relative error bound of `rcpps`/`rsqrtps` per the Intel SDM.
const RSQRTPS_REL_ERROR: f64 = 1.5 / 4096.0;

// ============================================================================
// F64x2 - SSE2, 2 x f64
// ============================================================================

/// 2-lane f64 register (SSE2).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F64x2(__m128d);

impl Debug for F64x2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F64x2({:?})", self.to_array())
    }
}

impl F64x2 {
    #[inline(always)]
    fn to_array(self) -> [f64; 2] {
        let mut arr = [0.0f64; 2];
        unsafe { _mm_storeu_pd(arr.as_mut_ptr(), self.0) };
        arr
    }
}

// SAFETY: __m128d is two f64 lanes, lane 0 at the lowest address.
unsafe impl NativeRegister for F64x2 {
    type Scalar = f64;

    const WIDTH: usize = 2;
    const ALIGN: usize = 16;
    const NAME: &'static str = "F64x2";

    #[inline(always)]
    fn splat(val: f64) -> Self {
        unsafe { Self(_mm_set1_pd(val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        unsafe { Self(_mm_loadu_pd(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        unsafe { Self(_mm_load_pd(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        unsafe { _mm_storeu_pd(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        unsafe { _mm_store_pd(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f64) {
        unsafe { _mm_stream_pd(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const f64, offsets: *const i32) -> Self {
        unsafe {
            // _mm_set_pd args are in reverse order: e1, e0
            Self(_mm_set_pd(
                *base.offset(*offsets.add(1) as isize),
                *base.offset(*offsets as isize),
            ))
        }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut f64, offsets: *const i32) {
        unsafe {
            _mm_storel_pd(base.offset(*offsets as isize), self.0);
            _mm_storeh_pd(base.offset(*offsets.add(1) as isize), self.0);
        }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        unsafe {
            if lane & 1 == 0 {
                _mm_cvtsd_f64(self.0)
            } else {
                _mm_cvtsd_f64(_mm_unpackhi_pd(self.0, self.0))
            }
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm_sqrt_pd(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmplt_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmple_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpeq_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpge_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        unsafe {
            // SSE2 has no blendv: (mask & other) | (!mask & self)
            let t = _mm_and_pd(mask.0, other.0);
            let f = _mm_andnot_pd(mask.0, self.0);
            Self(_mm_or_pd(t, f))
        }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm_castsi128_pd(_mm_set1_epi32(-1));
            Self(_mm_xor_pd(self.0, all_ones))
        }
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe {
            let eq = _mm_cmpeq_epi32(_mm_castpd_si128(self.0), _mm_setzero_si128());
            // All bytes equal to zero <=> every movemask bit set.
            _mm_movemask_epi8(eq) == 0xFFFF
        }
    }
}

exact_sqrt!(F64x2);

// ============================================================================
// F32x4 - SSE, 4 x f32
// ============================================================================

/// 4-lane f32 register (SSE).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(__m128);

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl F32x4 {
    #[inline(always)]
    fn to_array(self) -> [f32; 4] {
        let mut arr = [0.0f32; 4];
        unsafe { _mm_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }
}

// SAFETY: __m128 is four f32 lanes, lane 0 at the lowest address.
unsafe impl NativeRegister for F32x4 {
    type Scalar = f32;

    const WIDTH: usize = 4;
    const ALIGN: usize = 16;
    const NAME: &'static str = "F32x4";

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(_mm_set1_ps(val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        unsafe { Self(_mm_loadu_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        unsafe { Self(_mm_load_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        unsafe { _mm_storeu_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        unsafe { _mm_store_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f32) {
        unsafe { _mm_stream_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const f32, offsets: *const i32) -> Self {
        unsafe {
            Self(_mm_set_ps(
                *base.offset(*offsets.add(3) as isize),
                *base.offset(*offsets.add(2) as isize),
                *base.offset(*offsets.add(1) as isize),
                *base.offset(*offsets as isize),
            ))
        }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut f32, offsets: *const i32) {
        for (i, val) in self.to_array().into_iter().enumerate() {
            unsafe { *base.offset(*offsets.add(i) as isize) = val };
        }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmplt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmple_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpeq_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpgt_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        unsafe { Self(_mm_cmpge_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        unsafe {
            let t = _mm_and_ps(mask.0, other.0);
            let f = _mm_andnot_ps(mask.0, self.0);
            Self(_mm_or_ps(t, f))
        }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm_castsi128_ps(_mm_set1_epi32(-1));
            Self(_mm_xor_ps(self.0, all_ones))
        }
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe {
            let eq = _mm_cmpeq_epi32(_mm_castps_si128(self.0), _mm_setzero_si128());
            _mm_movemask_epi8(eq) == 0xFFFF
        }
    }
}

impl RsqrtEstimate for F32x4 {
    const REL_ERROR: f64 = RSQRTPS_REL_ERROR;

    #[inline(always)]
    fn rsqrt_estimate(self) -> Self {
        unsafe { Self(_mm_rsqrt_ps(self.0)) }
    }
}

deferred_sqrt!(F32x4);

// ============================================================================
// F64x4 - AVX, 4 x f64
// ============================================================================

/// 4-lane f64 register (AVX).
#[cfg(shortvec_avx)]
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F64x4(__m256d);

#[cfg(shortvec_avx)]
impl Debug for F64x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut arr = [0.0f64; 4];
        unsafe { _mm256_storeu_pd(arr.as_mut_ptr(), self.0) };
        write!(f, "F64x4({:?})", arr)
    }
}

// SAFETY: __m256d is four f64 lanes, lane 0 at the lowest address.
#[cfg(shortvec_avx)]
unsafe impl NativeRegister for F64x4 {
    type Scalar = f64;

    const WIDTH: usize = 4;
    const ALIGN: usize = 32;
    const NAME: &'static str = "F64x4";

    #[inline(always)]
    fn splat(val: f64) -> Self {
        unsafe { Self(_mm256_broadcast_sd(&val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        unsafe { Self(_mm256_loadu_pd(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        unsafe { Self(_mm256_load_pd(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        unsafe { _mm256_storeu_pd(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        unsafe { _mm256_store_pd(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f64) {
        unsafe { _mm256_stream_pd(ptr, self.0) }
    }

    #[cfg(shortvec_avx2)]
    #[inline(always)]
    unsafe fn gather(base: *const f64, offsets: *const i32) -> Self {
        unsafe {
            let indices = _mm_loadu_si128(offsets as *const __m128i);
            Self(_mm256_i32gather_pd::<8>(base, indices))
        }
    }

    #[cfg(not(shortvec_avx2))]
    #[inline(always)]
    unsafe fn gather(base: *const f64, offsets: *const i32) -> Self {
        unsafe {
            Self(_mm256_set_pd(
                *base.offset(*offsets.add(3) as isize),
                *base.offset(*offsets.add(2) as isize),
                *base.offset(*offsets.add(1) as isize),
                *base.offset(*offsets as isize),
            ))
        }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut f64, offsets: *const i32) {
        unsafe {
            let low = _mm256_castpd256_pd128(self.0);
            _mm_storel_pd(base.offset(*offsets as isize), low);
            _mm_storeh_pd(base.offset(*offsets.add(1) as isize), low);
            let high = _mm256_extractf128_pd::<1>(self.0);
            _mm_storel_pd(base.offset(*offsets.add(2) as isize), high);
            _mm_storeh_pd(base.offset(*offsets.add(3) as isize), high);
        }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        unsafe {
            let half = if lane < 2 {
                _mm256_castpd256_pd128(self.0)
            } else {
                _mm256_extractf128_pd::<1>(self.0)
            };
            if lane & 1 == 0 {
                _mm_cvtsd_f64(half)
            } else {
                _mm_cvtsd_f64(_mm_unpackhi_pd(half, half))
            }
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_add_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_sub_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_mul_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_div_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm256_sqrt_pd(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_pd::<_CMP_LT_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_pd::<_CMP_LE_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_pd::<_CMP_EQ_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_pd::<_CMP_GT_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_pd::<_CMP_GE_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        unsafe { Self(_mm256_blendv_pd(self.0, other.0, mask.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_and_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_or_pd(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm256_castsi256_pd(_mm256_set1_epi64x(-1));
            Self(_mm256_xor_pd(self.0, all_ones))
        }
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe {
            let bits = _mm256_castpd_si256(self.0);
            _mm256_testz_si256(bits, bits) == 1
        }
    }
}

#[cfg(shortvec_avx)]
exact_sqrt!(F64x4);

// ============================================================================
// F32x8 - AVX, 8 x f32
// ============================================================================

/// 8-lane f32 register (AVX).
#[cfg(shortvec_avx)]
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x8(__m256);

#[cfg(shortvec_avx)]
impl Debug for F32x8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x8({:?})", self.to_array())
    }
}

#[cfg(shortvec_avx)]
impl F32x8 {
    #[inline(always)]
    fn to_array(self) -> [f32; 8] {
        let mut arr = [0.0f32; 8];
        unsafe { _mm256_storeu_ps(arr.as_mut_ptr(), self.0) };
        arr
    }
}

// SAFETY: __m256 is eight f32 lanes, lane 0 at the lowest address.
#[cfg(shortvec_avx)]
unsafe impl NativeRegister for F32x8 {
    type Scalar = f32;

    const WIDTH: usize = 8;
    const ALIGN: usize = 32;
    const NAME: &'static str = "F32x8";

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(_mm256_set1_ps(val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        unsafe { Self(_mm256_loadu_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        unsafe { Self(_mm256_load_ps(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        unsafe { _mm256_storeu_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        unsafe { _mm256_store_ps(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f32) {
        unsafe { _mm256_stream_ps(ptr, self.0) }
    }

    #[cfg(shortvec_avx2)]
    #[inline(always)]
    unsafe fn gather(base: *const f32, offsets: *const i32) -> Self {
        unsafe {
            let indices = _mm256_loadu_si256(offsets as *const __m256i);
            Self(_mm256_i32gather_ps::<4>(base, indices))
        }
    }

    #[cfg(not(shortvec_avx2))]
    #[inline(always)]
    unsafe fn gather(base: *const f32, offsets: *const i32) -> Self {
        let mut lanes = [0.0f32; 8];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = unsafe { *base.offset(*offsets.add(i) as isize) };
        }
        unsafe { Self(_mm256_loadu_ps(lanes.as_ptr())) }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut f32, offsets: *const i32) {
        for (i, val) in self.to_array().into_iter().enumerate() {
            unsafe { *base.offset(*offsets.add(i) as isize) = val };
        }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_add_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_sub_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_mul_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_div_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(_mm256_sqrt_ps(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_LT_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_LE_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_EQ_OQ>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_GT_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_cmp_ps::<_CMP_GE_OS>(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        unsafe { Self(_mm256_blendv_ps(self.0, other.0, mask.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_and_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        unsafe { Self(_mm256_or_ps(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn not(self) -> Self {
        unsafe {
            let all_ones = _mm256_castsi256_ps(_mm256_set1_epi32(-1));
            Self(_mm256_xor_ps(self.0, all_ones))
        }
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe {
            let bits = _mm256_castps_si256(self.0);
            _mm256_testz_si256(bits, bits) == 1
        }
    }
}

#[cfg(shortvec_avx)]
impl RsqrtEstimate for F32x8 {
    const REL_ERROR: f64 = RSQRTPS_REL_ERROR;

    #[inline(always)]
    fn rsqrt_estimate(self) -> Self {
        unsafe { Self(_mm256_rsqrt_ps(self.0)) }
    }
}

#[cfg(shortvec_avx)]
deferred_sqrt!(F32x8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64x2_extracts_both_lanes() {
        let v = unsafe { F64x2::load([1.5, -2.5].as_ptr()) };
        assert_eq!(v.extract(0), 1.5);
        assert_eq!(v.extract(1), -2.5);
    }

    #[test]
    fn f64x2_scatter_uses_low_and_high_halves() {
        let v = unsafe { F64x2::load([10.0, 20.0].as_ptr()) };
        let mut out = [0.0f64; 4];
        let offsets = [3i32, 0];
        unsafe { v.scatter(out.as_mut_ptr(), offsets.as_ptr()) };
        assert_eq!(out, [20.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn sse_masks_are_all_bits() {
        let lt = F32x4::splat(1.0).cmp_lt(F32x4::splat(2.0));
        for lane in 0..4 {
            assert_eq!(lt.extract(lane).to_bits(), u32::MAX);
        }
        assert!(F32x4::splat(2.0).cmp_lt(F32x4::splat(1.0)).is_zero());
        assert!(!lt.is_zero());
        assert!(lt.not().is_zero());
    }

    #[test]
    fn sse_rsqrt_estimate_within_bound() {
        let x = F32x4::splat(2.0).rsqrt_estimate().extract(0) as f64;
        let exact = 1.0 / 2.0f64.sqrt();
        assert!(((x - exact) / exact).abs() <= RSQRTPS_REL_ERROR);
    }

    #[cfg(shortvec_avx)]
    #[test]
    fn f64x4_extract_and_scatter_order() {
        let lanes = [1.0, 2.0, 3.0, 4.0];
        let v = unsafe { F64x4::load(lanes.as_ptr()) };
        for (i, &expected) in lanes.iter().enumerate() {
            assert_eq!(v.extract(i), expected);
        }
        let mut out = [0.0f64; 4];
        let offsets = [3i32, 2, 1, 0];
        unsafe { v.scatter(out.as_mut_ptr(), offsets.as_ptr()) };
        assert_eq!(out, [4.0, 3.0, 2.0, 1.0]);
    }

    #[cfg(shortvec_avx)]
    #[test]
    fn f64x4_gather_follows_offsets() {
        let data = [0.0, 10.0, 20.0, 30.0, 40.0];
        let offsets = [4i32, 0, 2, 2];
        let v = unsafe { F64x4::gather(data.as_ptr(), offsets.as_ptr()) };
        assert_eq!(v.to_lanes(), [40.0, 0.0, 20.0, 20.0]);
    }

    #[cfg(shortvec_avx)]
    #[test]
    fn avx_blend_takes_other_where_mask_set() {
        let a = unsafe { F64x4::load([1.0, 5.0, 1.0, 5.0].as_ptr()) };
        let b = F64x4::splat(3.0);
        let mixed = a.blend(b, a.cmp_lt(b));
        assert_eq!(mixed.to_lanes(), [3.0, 5.0, 3.0, 5.0]);
    }

    #[cfg(shortvec_avx)]
    impl F64x4 {
        fn to_lanes(self) -> [f64; 4] {
            let mut out = [0.0; 4];
            unsafe { self.store(out.as_mut_ptr()) };
            out
        }
    }
}
