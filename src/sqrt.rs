//! Square root with an optional deferred reciprocal path.
//!
//! On registers that have a fast reciprocal-square-root estimate,
//! `Vector::sqrt` does not compute anything. It returns a [`DeferredSqrt`]
//! that is resolved by its first use:
//!
//! - converting it into a vector computes the exact square root;
//! - dividing by it multiplies by the estimate of `1 / sqrt(x)` instead,
//!   trading a few ULPs for removing a sqrt and a divide.
//!
//! On registers without an estimate, `Vector::sqrt` returns the exact vector.
//! Both cases accept the same caller code:
//!
//! ```
//! use shortvec::ShortVec;
//!
//! type V = ShortVec<f32, 8>;
//! let x = V::splat(16.0);
//! let root: V = x.sqrt().into();
//! let scaled = V::splat(1.0) / x.sqrt();
//! assert_eq!(root[0], 4.0);
//! assert!((scaled[0] - 0.25).abs() < 1e-2);
//! ```

use crate::register::{NativeRegister, RsqrtEstimate};
use crate::vector::Vector;
use core::fmt::{Debug, Formatter};
use core::ops::{Div, DivAssign};
use serde::Serialize;

/// How a register family evaluates `sqrt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SqrtKind {
    /// `sqrt` computes the exact root immediately.
    Exact,
    /// `sqrt` returns a [`DeferredSqrt`].
    Deferred,
}

/// Per-register choice of square-root result type.
pub trait SqrtStrategy: NativeRegister {
    /// Which path this register takes.
    const KIND: SqrtKind;
    /// Bound on the relative error of `a / v.sqrt()` against `a / sqrt(v)`.
    const DIV_SQRT_REL_ERROR: f64;

    /// Result of `Vector::sqrt` for this register.
    type Sqrt<const REGS: usize>: Into<Vector<Self, REGS>>;

    /// Starts a square root of `v`.
    fn sqrt_vector<const REGS: usize>(v: Vector<Self, REGS>) -> Self::Sqrt<REGS>;

    /// Divides `lhs` by a square root produced by [`SqrtStrategy::sqrt_vector`].
    fn div_sqrt<const REGS: usize>(
        lhs: Vector<Self, REGS>,
        rhs: Self::Sqrt<REGS>,
    ) -> Vector<Self, REGS>;
}

impl<R: SqrtStrategy, const REGS: usize> Vector<R, REGS> {
    /// Bound on the relative error of `a / v.sqrt()` for this register.
    pub const DIV_SQRT_REL_ERROR: f64 = R::DIV_SQRT_REL_ERROR;

    /// Square root of each lane: the exact vector, or a [`DeferredSqrt`] on
    /// registers with a reciprocal estimate.
    #[inline(always)]
    pub fn sqrt(self) -> R::Sqrt<REGS> {
        R::sqrt_vector(self)
    }
}

/// A square root that has not been computed yet.
///
/// Consumed by its first use; it is neither `Copy` nor `Clone`.
#[must_use = "a deferred square root does nothing until converted or used as a divisor"]
pub struct DeferredSqrt<R: NativeRegister, const REGS: usize> {
    radicand: Vector<R, REGS>,
}

impl<R: NativeRegister, const REGS: usize> DeferredSqrt<R, REGS> {
    #[inline(always)]
    pub(crate) fn new(radicand: Vector<R, REGS>) -> Self {
        Self { radicand }
    }

    /// Computes the exact square root.
    #[inline(always)]
    pub fn materialize(self) -> Vector<R, REGS> {
        self.radicand.sqrt_exact()
    }
}

impl<R: NativeRegister, const REGS: usize> Debug for DeferredSqrt<R, REGS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "DeferredSqrt({:?})", self.radicand)
    }
}

impl<R: NativeRegister, const REGS: usize> From<DeferredSqrt<R, REGS>> for Vector<R, REGS> {
    #[inline(always)]
    fn from(deferred: DeferredSqrt<R, REGS>) -> Self {
        deferred.materialize()
    }
}

impl<R: RsqrtEstimate, const REGS: usize> Div<DeferredSqrt<R, REGS>> for Vector<R, REGS> {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: DeferredSqrt<R, REGS>) -> Self {
        self.zip_with(rhs.radicand, |a, b| a.mul(b.rsqrt_estimate()))
    }
}

impl<R: RsqrtEstimate, const REGS: usize> DivAssign<DeferredSqrt<R, REGS>> for Vector<R, REGS> {
    #[inline(always)]
    fn div_assign(&mut self, rhs: DeferredSqrt<R, REGS>) {
        *self = *self / rhs;
    }
}

/// Implements [`SqrtStrategy`] for a register without a reciprocal estimate.
macro_rules! exact_sqrt {
    ($reg:ty) => {
        impl $crate::sqrt::SqrtStrategy for $reg {
            const KIND: $crate::sqrt::SqrtKind = $crate::sqrt::SqrtKind::Exact;
            const DIV_SQRT_REL_ERROR: f64 =
                2.0 * <<$reg as $crate::register::NativeRegister>::Scalar as $crate::element::Element>::EPSILON;

            type Sqrt<const REGS: usize> = $crate::vector::Vector<Self, REGS>;

            #[inline(always)]
            fn sqrt_vector<const REGS: usize>(
                v: $crate::vector::Vector<Self, REGS>,
            ) -> $crate::vector::Vector<Self, REGS> {
                v.sqrt_exact()
            }

            #[inline(always)]
            fn div_sqrt<const REGS: usize>(
                lhs: $crate::vector::Vector<Self, REGS>,
                rhs: $crate::vector::Vector<Self, REGS>,
            ) -> $crate::vector::Vector<Self, REGS> {
                lhs / rhs
            }
        }
    };
}

/// Implements [`SqrtStrategy`] for a register with a reciprocal estimate.
macro_rules! deferred_sqrt {
    ($reg:ty) => {
        impl $crate::sqrt::SqrtStrategy for $reg {
            const KIND: $crate::sqrt::SqrtKind = $crate::sqrt::SqrtKind::Deferred;
            // One extra rounding for the final multiply.
            const DIV_SQRT_REL_ERROR: f64 = <$reg as $crate::register::RsqrtEstimate>::REL_ERROR
                + 2.0 * <<$reg as $crate::register::NativeRegister>::Scalar as $crate::element::Element>::EPSILON;

            type Sqrt<const REGS: usize> = $crate::sqrt::DeferredSqrt<Self, REGS>;

            #[inline(always)]
            fn sqrt_vector<const REGS: usize>(
                v: $crate::vector::Vector<Self, REGS>,
            ) -> $crate::sqrt::DeferredSqrt<Self, REGS> {
                $crate::sqrt::DeferredSqrt::new(v)
            }

            #[inline(always)]
            fn div_sqrt<const REGS: usize>(
                lhs: $crate::vector::Vector<Self, REGS>,
                rhs: $crate::sqrt::DeferredSqrt<Self, REGS>,
            ) -> $crate::vector::Vector<Self, REGS> {
                lhs / rhs
            }
        }
    };
}

pub(crate) use {deferred_sqrt, exact_sqrt};
