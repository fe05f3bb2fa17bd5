//! Comparison masks.

use crate::element::Element;
use crate::register::NativeRegister;
use core::fmt::{Debug, Formatter};
use core::ops::{BitAnd, BitOr, Not};

/// Result of a lane-wise comparison.
///
/// Shares the register layout of the vector it was computed from; each lane
/// is either all bits set (true) or all bits clear (false). Masks are only
/// produced by comparisons and consumed by [`crate::Vector::blend`].
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Mask<R: NativeRegister, const REGS: usize> {
    regs: [R; REGS],
}

impl<R: NativeRegister, const REGS: usize> Mask<R, REGS> {
    #[inline(always)]
    pub(crate) fn from_registers(regs: [R; REGS]) -> Self {
        Self { regs }
    }

    #[inline(always)]
    pub(crate) fn into_registers(self) -> [R; REGS] {
        self.regs
    }

    /// True if at least one lane is true.
    #[inline(always)]
    pub fn any(&self) -> bool {
        self.regs.iter().any(|reg| !reg.is_zero())
    }

    /// True if every lane is true.
    #[inline(always)]
    pub fn all(&self) -> bool {
        self.regs.iter().all(|reg| reg.not().is_zero())
    }

    /// Truth value of lane `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not below the vector's arity.
    pub fn lane(&self, index: usize) -> bool {
        let (reg, lane) = (index / R::WIDTH, index % R::WIDTH);
        self.regs[reg].extract(lane).to_bits64() != 0
    }

    fn zip_with(self, rhs: Self, f: impl Fn(R, R) -> R) -> Self {
        let mut regs = self.regs;
        for (reg, other) in regs.iter_mut().zip(rhs.regs) {
            *reg = f(*reg, other);
        }
        Self { regs }
    }
}

impl<R: NativeRegister, const REGS: usize> BitAnd for Mask<R, REGS> {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        self.zip_with(rhs, R::and)
    }
}

impl<R: NativeRegister, const REGS: usize> BitOr for Mask<R, REGS> {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self {
        self.zip_with(rhs, R::or)
    }
}

impl<R: NativeRegister, const REGS: usize> Not for Mask<R, REGS> {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self {
        let mut regs = self.regs;
        for reg in regs.iter_mut() {
            *reg = (*reg).not();
        }
        Self { regs }
    }
}

impl<R: NativeRegister, const REGS: usize> Debug for Mask<R, REGS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let lanes = REGS * R::WIDTH;
        f.debug_list()
            .entries((0..lanes).map(|i| self.lane(i)))
            .finish()
    }
}
