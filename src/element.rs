//! Scalar lane types.

use core::fmt::{Debug, Display};
use core::ops::{Add, Div, Mul, Sub};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A scalar that can occupy one lane of a short vector.
///
/// Only `f32` and `f64` are supported. The bit helpers exist so the scalar
/// register can reproduce the all-bits-set / all-bits-clear mask contract of
/// the SIMD registers.
pub trait Element:
    sealed::Sealed
    + Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Type name used in reports (`"f64"`, `"f32"`).
    const NAME: &'static str;
    /// Additive identity.
    const ZERO: Self;
    /// Machine epsilon widened to `f64`.
    const EPSILON: f64;

    /// Raw bits, zero-extended to 64 bits.
    fn to_bits64(self) -> u64;
    /// Inverse of [`Element::to_bits64`]; high bits are ignored for `f32`.
    fn from_bits64(bits: u64) -> Self;
    /// Correctly rounded square root.
    fn sqrt(self) -> Self;
    /// Lossless (`f32`) or identity (`f64`) widening.
    fn to_f64(self) -> f64;
    /// Narrowing (`f32`, rounds to nearest) or identity (`f64`) conversion.
    fn from_f64(val: f64) -> Self;

    /// The "true" mask pattern: every bit set.
    #[inline(always)]
    fn all_ones() -> Self {
        Self::from_bits64(u64::MAX)
    }
}

impl Element for f64 {
    const NAME: &'static str = "f64";
    const ZERO: Self = 0.0;
    const EPSILON: f64 = f64::EPSILON;

    #[inline(always)]
    fn to_bits64(self) -> u64 {
        self.to_bits()
    }

    #[inline(always)]
    fn from_bits64(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_f64(val: f64) -> Self {
        val
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";
    const ZERO: Self = 0.0;
    const EPSILON: f64 = f32::EPSILON as f64;

    #[inline(always)]
    fn to_bits64(self) -> u64 {
        self.to_bits() as u64
    }

    #[inline(always)]
    fn from_bits64(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }

    #[inline(always)]
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn from_f64(val: f64) -> Self {
        val as f32
    }
}
