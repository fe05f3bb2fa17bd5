//! Lane-wise operators.
//!
//! Every operator applies the native instruction to each register of the
//! decomposition independently, register 0 first. No saturation, no
//! checks: division by zero yields the IEEE infinity or NaN of each lane.

use crate::mask::Mask;
use crate::register::NativeRegister;
use crate::vector::Vector;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $native:ident) => {
        impl<R: NativeRegister, const REGS: usize> $op for Vector<R, REGS> {
            type Output = Self;
            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                self.zip_with(rhs, R::$native)
            }
        }

        impl<R: NativeRegister, const REGS: usize> $assign_op for Vector<R, REGS> {
            #[inline(always)]
            fn $assign_method(&mut self, rhs: Self) {
                *self = self.zip_with(rhs, R::$native);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, add);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sub);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, mul);
impl_binary_op!(Div, div, DivAssign, div_assign, div);

/// Ordered comparisons: a lane involving NaN compares false.
impl<R: NativeRegister, const REGS: usize> Vector<R, REGS> {
    /// Lane-wise `self < rhs`.
    #[inline(always)]
    pub fn cmp_lt(self, rhs: Self) -> Mask<R, REGS> {
        self.compare(rhs, R::cmp_lt)
    }

    /// Lane-wise `self <= rhs`.
    #[inline(always)]
    pub fn cmp_le(self, rhs: Self) -> Mask<R, REGS> {
        self.compare(rhs, R::cmp_le)
    }

    /// Lane-wise `self == rhs`.
    #[inline(always)]
    pub fn cmp_eq(self, rhs: Self) -> Mask<R, REGS> {
        self.compare(rhs, R::cmp_eq)
    }

    /// Lane-wise `self > rhs`.
    #[inline(always)]
    pub fn cmp_gt(self, rhs: Self) -> Mask<R, REGS> {
        self.compare(rhs, R::cmp_gt)
    }

    /// Lane-wise `self >= rhs`.
    #[inline(always)]
    pub fn cmp_ge(self, rhs: Self) -> Mask<R, REGS> {
        self.compare(rhs, R::cmp_ge)
    }
}
