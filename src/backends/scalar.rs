//! Scalar backend (1 lane per register).
//!
//! Used for arity 1 everywhere, for arities below the narrowest SIMD register,
//! and for every arity on targets without a supported vector extension.

use crate::element::Element;
use crate::register::NativeRegister;
use crate::sqrt::exact_sqrt;
use core::fmt::{Debug, Formatter};

/// A register holding a single scalar.
#[derive(Copy, Clone, Default, PartialEq)]
#[repr(transparent)]
pub struct Scalar<T: Element>(pub T);

impl<T: Element> Debug for Scalar<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Scalar({:?})", self.0)
    }
}

impl<T: Element> Scalar<T> {
    #[inline(always)]
    fn from_bool(b: bool) -> Self {
        Scalar(T::from_bits64(if b { u64::MAX } else { 0 }))
    }

    #[inline(always)]
    fn bits(self) -> u64 {
        self.0.to_bits64()
    }
}

// SAFETY: repr(transparent) over a single T.
unsafe impl<T: Element> NativeRegister for Scalar<T> {
    type Scalar = T;

    const WIDTH: usize = 1;
    const ALIGN: usize = core::mem::align_of::<T>();
    const NAME: &'static str = "Scalar";

    #[inline(always)]
    fn splat(val: T) -> Self {
        Scalar(val)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> Self {
        Scalar(unsafe { ptr.read_unaligned() })
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const T) -> Self {
        Scalar(unsafe { ptr.read() })
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut T) {
        unsafe { ptr.write_unaligned(self.0) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut T) {
        unsafe { ptr.write(self.0) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut T) {
        unsafe { ptr.write(self.0) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const T, offsets: *const i32) -> Self {
        unsafe { Scalar(base.offset(*offsets as isize).read()) }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut T, offsets: *const i32) {
        unsafe { base.offset(*offsets as isize).write(self.0) }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> T {
        debug_assert!(lane == 0);
        self.0
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Scalar(self.0 + rhs.0)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Scalar(self.0 - rhs.0)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Scalar(self.0 * rhs.0)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Scalar(self.0 / rhs.0)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        Scalar(Element::sqrt(self.0))
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Self {
        Self::from_bool(self.0 < rhs.0)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Self {
        Self::from_bool(self.0 <= rhs.0)
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Self {
        Self::from_bool(self.0 == rhs.0)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Self {
        Self::from_bool(self.0 > rhs.0)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Self {
        Self::from_bool(self.0 >= rhs.0)
    }

    #[inline(always)]
    fn blend(self, other: Self, mask: Self) -> Self {
        let m = mask.bits();
        Scalar(T::from_bits64((self.bits() & !m) | (other.bits() & m)))
    }

    #[inline(always)]
    fn and(self, rhs: Self) -> Self {
        Scalar(T::from_bits64(self.bits() & rhs.bits()))
    }

    #[inline(always)]
    fn or(self, rhs: Self) -> Self {
        Scalar(T::from_bits64(self.bits() | rhs.bits()))
    }

    #[inline(always)]
    fn not(self) -> Self {
        Scalar(T::from_bits64(!self.bits()))
    }

    #[inline(always)]
    fn is_zero(self) -> bool {
        self.bits() == 0
    }
}

exact_sqrt!(Scalar<f64>);
exact_sqrt!(Scalar<f32>);
