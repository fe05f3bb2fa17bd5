//! aarch64 NEON backend.
//!
//! NEON has no non-temporal store or gather, so `store_nt` is a plain store
//! and gather/scatter go lane by lane. Both register types carry `frsqrte`,
//! so their square roots are deferred.

use crate::register::{NativeRegister, RsqrtEstimate};
use crate::sqrt::deferred_sqrt;
use core::arch::aarch64::*;
use core::fmt::{Debug, Formatter};

/// `frsqrte` yields an 8-bit estimate; this bound leaves a factor of two.
const FRSQRTE_REL_ERROR: f64 = 1.0 / 128.0;

// ============================================================================
// F64x2 - NEON, 2 x f64
// ============================================================================

/// 2-lane f64 register (NEON).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F64x2(float64x2_t);

impl Debug for F64x2 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F64x2({:?})", self.to_array())
    }
}

impl F64x2 {
    #[inline(always)]
    fn to_array(self) -> [f64; 2] {
        let mut arr = [0.0f64; 2];
        unsafe { vst1q_f64(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn from_mask(mask: uint64x2_t) -> Self {
        unsafe { Self(vreinterpretq_f64_u64(mask)) }
    }

    #[inline(always)]
    fn bits(self) -> uint64x2_t {
        unsafe { vreinterpretq_u64_f64(self.0) }
    }
}

// SAFETY: float64x2_t is two f64 lanes, lane 0 at the lowest address.
unsafe impl NativeRegister for F64x2 {
    type Scalar = f64;

    const WIDTH: usize = 2;
    const ALIGN: usize = 16;
    const NAME: &'static str = "F64x2";

    #[inline(always)]
    fn splat(val: f64) -> Self {
        unsafe { Self(vdupq_n_f64(val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> Self {
        unsafe { Self(vld1q_f64(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        unsafe { Self(vld1q_f64(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f64) {
        unsafe { vst1q_f64(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f64) {
        unsafe { vst1q_f64(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f64) {
        unsafe { vst1q_f64(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const f64, offsets: *const i32) -> Self {
        unsafe {
            let lanes = [
                *base.offset(*offsets as isize),
                *base.offset(*offsets.add(1) as isize),
            ];
            Self(vld1q_f64(lanes.as_ptr()))
        }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut f64, offsets: *const i32) {
        unsafe {
            *base.offset(*offsets as isize) = vgetq_lane_f64::<0>(self.0);
            *base.offset(*offsets.add(1) as isize) = vgetq_lane_f64::<1>(self.0);
        }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f64 {
        unsafe {
            if lane & 1 == 0 {
                vgetq_lane_f64::<0>(self.0)
            } else {
                vgetq_lane_f64::<1>(self.0)
            }
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        unsafe { Self(vaddq_f64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_f64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(vdivq_f64(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(vsqrtq_f64(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcltq_f64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcleq_f64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vceqq_f64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcgtq_f64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcgeq_f64(self.0, rhs.0) })
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        // vbsl picks its second operand where mask bits are set.
        unsafe { Self(vbslq_f64(mask.bits(), other.0, self.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vandq_u64(self.bits(), rhs.bits()) })
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vorrq_u64(self.bits(), rhs.bits()) })
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_mask(unsafe { veorq_u64(self.bits(), vdupq_n_u64(u64::MAX)) })
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe { vmaxvq_u32(vreinterpretq_u32_u64(self.bits())) == 0 }
    }
}

impl RsqrtEstimate for F64x2 {
    const REL_ERROR: f64 = FRSQRTE_REL_ERROR;

    #[inline(always)]
    fn rsqrt_estimate(self) -> Self {
        unsafe { Self(vrsqrteq_f64(self.0)) }
    }
}

deferred_sqrt!(F64x2);

// ============================================================================
// F32x4 - NEON, 4 x f32
// ============================================================================

/// 4-lane f32 register (NEON).
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct F32x4(float32x4_t);

impl Debug for F32x4 {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "F32x4({:?})", self.to_array())
    }
}

impl F32x4 {
    #[inline(always)]
    fn to_array(self) -> [f32; 4] {
        let mut arr = [0.0f32; 4];
        unsafe { vst1q_f32(arr.as_mut_ptr(), self.0) };
        arr
    }

    #[inline(always)]
    fn from_mask(mask: uint32x4_t) -> Self {
        unsafe { Self(vreinterpretq_f32_u32(mask)) }
    }

    #[inline(always)]
    fn bits(self) -> uint32x4_t {
        unsafe { vreinterpretq_u32_f32(self.0) }
    }
}

// SAFETY: float32x4_t is four f32 lanes, lane 0 at the lowest address.
unsafe impl NativeRegister for F32x4 {
    type Scalar = f32;

    const WIDTH: usize = 4;
    const ALIGN: usize = 16;
    const NAME: &'static str = "F32x4";

    #[inline(always)]
    fn splat(val: f32) -> Self {
        unsafe { Self(vdupq_n_f32(val)) }
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> Self {
        unsafe { Self(vld1q_f32(ptr)) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        unsafe { Self(vld1q_f32(ptr)) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut f32) {
        unsafe { vst1q_f32(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut f32) {
        unsafe { vst1q_f32(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut f32) {
        unsafe { vst1q_f32(ptr, self.0) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const f32, offsets: *const i32) -> Self {
        let mut lanes = [0.0f32; 4];
        for (i, lane) in lanes.iter_mut().enumerate() {
            *lane = unsafe { *base.offset(*offsets.add(i) as isize) };
        }
        unsafe { Self(vld1q_f32(lanes.as_ptr())) }
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
        unsafe { Self(vaddq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        unsafe { Self(vsubq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        unsafe { Self(vmulq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        unsafe { Self(vdivq_f32(self.0, rhs.0)) }
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        unsafe { Self(vsqrtq_f32(self.0)) }
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcltq_f32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcleq_f32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vceqq_f32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcgtq_f32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vcgeq_f32(self.0, rhs.0) })
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        unsafe { Self(vbslq_f32(mask.bits(), other.0, self.0)) }
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vandq_u32(self.bits(), rhs.bits()) })
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Self::from_mask(unsafe { vorrq_u32(self.bits(), rhs.bits()) })
    }

    #[inline(always)]
    fn not(self) -> Self {
        Self::from_mask(unsafe { vmvnq_u32(self.bits()) })
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        unsafe { vmaxvq_u32(self.bits()) == 0 }
    }
}

impl RsqrtEstimate for F32x4 {
    const REL_ERROR: f64 = FRSQRTE_REL_ERROR;

    #[inline(always)]
    fn rsqrt_estimate(self) -> Self {
        unsafe { Self(vrsqrteq_f32(self.0)) }
    }
}

deferred_sqrt!(F32x4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_takes_other_where_mask_set() {
        let a = unsafe { F32x4::load([1.0, 5.0, 1.0, 5.0].as_ptr()) };
        let b = F32x4::splat(3.0);
        assert_eq!(a.blend(b, a.cmp_lt(b)).to_array(), [3.0, 5.0, 3.0, 5.0]);
    }

    #[test]
    fn masks_are_all_bits() {
        let lt = F64x2::splat(1.0).cmp_lt(F64x2::splat(2.0));
        assert_eq!(lt.extract(1).to_bits(), u64::MAX);
        assert!(lt.not().is_zero());
        assert!(!lt.is_zero());
    }

    #[test]
    fn rsqrt_estimate_within_bound() {
        let est = F64x2::splat(2.0).rsqrt_estimate().extract(0);
        let exact = 1.0 / 2.0f64.sqrt();
        assert!(((est - exact) / exact).abs() <= FRSQRTE_REL_ERROR);
        let est = F32x4::splat(2.0).rsqrt_estimate().extract(3) as f64;
        assert!(((est - exact) / exact).abs() <= FRSQRTE_REL_ERROR);
    }

    #[test]
    fn scatter_writes_each_lane() {
        let v = unsafe { F64x2::load([10.0, 20.0].as_ptr()) };
        let mut out = [0.0f64; 3];
        unsafe { v.scatter(out.as_mut_ptr(), [2i32, 0].as_ptr()) };
        assert_eq!(out, [20.0, 0.0, 10.0]);
    }
}
