//! Register decomposition.
//!
//! A `Vector<R, REGS>` is a logical vector of `REGS * R::WIDTH` lanes stored
//! as `REGS` native registers. Global lane `i` lives in register
//! `i / R::WIDTH`, lane `i % R::WIDTH`; memory operations walk the registers
//! in increasing order, so register `r` always covers the scalars
//! `r * WIDTH .. (r + 1) * WIDTH` of the logical vector.

use crate::element::Element;
use crate::mask::Mask;
use crate::register::NativeRegister;
use core::fmt::{self, Debug, Display, Formatter};
use core::ops::Index;

/// A fixed-width vector decomposed into `REGS` native registers.
///
/// Callers normally name this through [`crate::ShortVec`], which picks the
/// register type for a scalar and arity on the active instruction set.
#[derive(Copy, Clone)]
#[repr(C)]
pub struct Vector<R: NativeRegister, const REGS: usize> {
    regs: [R; REGS],
}

impl<R: NativeRegister, const REGS: usize> Vector<R, REGS> {
    /// Number of lanes.
    pub const ARITY: usize = REGS * R::WIDTH;
    /// Number of native registers in the decomposition.
    pub const REGISTERS: usize = REGS;

    const LAYOUT: () = {
        assert!(REGS > 0, "a short vector needs at least one register");
        assert!(
            core::mem::size_of::<R>() == R::WIDTH * core::mem::size_of::<R::Scalar>(),
            "register size must equal WIDTH scalars"
        );
    };

    /// Builds a vector from its registers, register 0 first.
    #[inline(always)]
    pub const fn from_registers(regs: [R; REGS]) -> Self {
        Self { regs }
    }

    /// The registers, register 0 first.
    #[inline(always)]
    pub const fn registers(&self) -> &[R; REGS] {
        &self.regs
    }

    /// Register `index` of the decomposition.
    #[inline(always)]
    pub fn register(&self, index: usize) -> R {
        self.regs[index]
    }

    /// Maps a global lane index to `(register, lane within register)`.
    #[inline(always)]
    pub const fn lane_position(lane: usize) -> (usize, usize) {
        (lane / R::WIDTH, lane % R::WIDTH)
    }

    /// Broadcasts `val` into every lane of every register.
    #[inline(always)]
    pub fn splat(val: R::Scalar) -> Self {
        Self {
            regs: [R::splat(val); REGS],
        }
    }

    #[inline(always)]
    pub(crate) fn map(self, f: impl Fn(R) -> R) -> Self {
        let mut regs = self.regs;
        for reg in regs.iter_mut() {
            *reg = f(*reg);
        }
        Self { regs }
    }

    #[inline(always)]
    pub(crate) fn zip_with(self, rhs: Self, f: impl Fn(R, R) -> R) -> Self {
        let mut regs = self.regs;
        for (reg, other) in regs.iter_mut().zip(rhs.regs) {
            *reg = f(*reg, other);
        }
        Self { regs }
    }

    #[inline(always)]
    pub(crate) fn compare(self, rhs: Self, f: impl Fn(R, R) -> R) -> Mask<R, REGS> {
        Mask::from_registers(self.zip_with(rhs, f).regs)
    }

    /// Loads `ARITY` contiguous scalars; no alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `ARITY` scalars.
    #[inline(always)]
    pub unsafe fn load(ptr: *const R::Scalar) -> Self {
        let mut regs = [R::splat(<R::Scalar as Element>::ZERO); REGS];
        for (r, reg) in regs.iter_mut().enumerate() {
            // SAFETY: caller guarantees ARITY readable scalars.
            *reg = unsafe { R::load(ptr.add(r * R::WIDTH)) };
        }
        Self { regs }
    }

    /// Loads `ARITY` contiguous scalars from a naturally aligned address.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `ARITY` scalars and aligned to the
    /// register alignment (`R::ALIGN` bytes). Misalignment is only caught by
    /// a debug assertion.
    #[inline(always)]
    pub unsafe fn load_aligned(ptr: *const R::Scalar) -> Self {
        debug_assert_aligned::<R>(ptr as usize);
        let mut regs = [R::splat(<R::Scalar as Element>::ZERO); REGS];
        for (r, reg) in regs.iter_mut().enumerate() {
            // SAFETY: caller guarantees readability and alignment; each
            // register offset is a multiple of the register size.
            *reg = unsafe { R::load_aligned(ptr.add(r * R::WIDTH)) };
        }
        Self { regs }
    }

    /// Stores all lanes contiguously; no alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `ARITY` scalars.
    #[inline(always)]
    pub unsafe fn store(self, ptr: *mut R::Scalar) {
        for (r, reg) in self.regs.into_iter().enumerate() {
            // SAFETY: caller guarantees ARITY writable scalars.
            unsafe { reg.store(ptr.add(r * R::WIDTH)) };
        }
    }

    /// Stores all lanes to a naturally aligned address.
    ///
    /// # Safety
    ///
    /// As [`Vector::load_aligned`], for writing.
    #[inline(always)]
    pub unsafe fn store_aligned(self, ptr: *mut R::Scalar) {
        debug_assert_aligned::<R>(ptr as usize);
        for (r, reg) in self.regs.into_iter().enumerate() {
            // SAFETY: see store.
            unsafe { reg.store_aligned(ptr.add(r * R::WIDTH)) };
        }
    }

    /// Streaming store that bypasses the cache, for write-once output.
    ///
    /// # Safety
    ///
    /// As [`Vector::store_aligned`].
    #[inline(always)]
    pub unsafe fn store_nt(self, ptr: *mut R::Scalar) {
        debug_assert_aligned::<R>(ptr as usize);
        for (r, reg) in self.regs.into_iter().enumerate() {
            // SAFETY: see store.
            unsafe { reg.store_nt(ptr.add(r * R::WIDTH)) };
        }
    }

    /// Loads lane `i` from `base + offsets[i]`.
    ///
    /// # Safety
    ///
    /// `offsets` must hold at least `ARITY` entries and every addressed
    /// scalar must be readable.
    #[inline(always)]
    pub unsafe fn gather(base: *const R::Scalar, offsets: &[i32]) -> Self {
        debug_assert!(offsets.len() >= Self::ARITY);
        let mut regs = [R::splat(<R::Scalar as Element>::ZERO); REGS];
        for (r, reg) in regs.iter_mut().enumerate() {
            // SAFETY: caller guarantees the offsets and addressed scalars.
            *reg = unsafe { R::gather(base, offsets.as_ptr().add(r * R::WIDTH)) };
        }
        Self { regs }
    }

    /// Stores lane `i` to `base + offsets[i]`, lanes in increasing order.
    ///
    /// # Safety
    ///
    /// `offsets` must hold at least `ARITY` entries and every addressed
    /// scalar must be writable. Aliasing offsets leave the last lane's value.
    #[inline(always)]
    pub unsafe fn scatter(self, base: *mut R::Scalar, offsets: &[i32]) {
        debug_assert!(offsets.len() >= Self::ARITY);
        for (r, reg) in self.regs.into_iter().enumerate() {
            // SAFETY: see gather.
            unsafe { reg.scatter(base, offsets.as_ptr().add(r * R::WIDTH)) };
        }
    }

    /// Loads the first `ARITY` scalars of `slice`.
    ///
    /// # Panics
    ///
    /// If `slice` is shorter than `ARITY`.
    #[inline(always)]
    pub fn from_slice(slice: &[R::Scalar]) -> Self {
        assert!(
            slice.len() >= Self::ARITY,
            "slice of {} scalars is too short for {} lanes",
            slice.len(),
            Self::ARITY
        );
        // SAFETY: length checked above.
        unsafe { Self::load(slice.as_ptr()) }
    }

    /// Stores all lanes to the front of `out`.
    ///
    /// # Panics
    ///
    /// If `out` is shorter than `ARITY`.
    #[inline(always)]
    pub fn store_slice(self, out: &mut [R::Scalar]) {
        assert!(
            out.len() >= Self::ARITY,
            "slice of {} scalars is too short for {} lanes",
            out.len(),
            Self::ARITY
        );
        // SAFETY: length checked above.
        unsafe { self.store(out.as_mut_ptr()) }
    }

    /// Bounds-checked [`Vector::gather`] from `data`.
    ///
    /// # Panics
    ///
    /// If `offsets` is shorter than `ARITY` or an offset is outside `data`.
    pub fn gather_from(data: &[R::Scalar], offsets: &[i32]) -> Self {
        check_offsets(data.len(), offsets, Self::ARITY);
        // SAFETY: every offset checked against data.
        unsafe { Self::gather(data.as_ptr(), offsets) }
    }

    /// Bounds-checked [`Vector::scatter`] into `data`.
    ///
    /// # Panics
    ///
    /// If `offsets` is shorter than `ARITY` or an offset is outside `data`.
    pub fn scatter_into(self, data: &mut [R::Scalar], offsets: &[i32]) {
        check_offsets(data.len(), offsets, Self::ARITY);
        // SAFETY: every offset checked against data.
        unsafe { self.scatter(data.as_mut_ptr(), offsets) }
    }

    /// Reads lane `index` by extracting it from its register.
    ///
    /// Meant for tests and diagnostics, not hot loops.
    ///
    /// # Panics
    ///
    /// If `index >= ARITY`.
    #[inline]
    pub fn lane(&self, index: usize) -> R::Scalar {
        assert!(index < Self::ARITY, "lane {} out of range", index);
        let (reg, lane) = Self::lane_position(index);
        self.regs[reg].extract(lane)
    }

    /// All lanes in logical order.
    #[inline(always)]
    pub fn as_slice(&self) -> &[R::Scalar] {
        let () = Self::LAYOUT;
        // SAFETY: NativeRegister guarantees each register is WIDTH contiguous
        // scalars in lane order, and `regs` is a contiguous array of them.
        unsafe { core::slice::from_raw_parts(self.regs.as_ptr().cast::<R::Scalar>(), Self::ARITY) }
    }

    /// True if any bit of any lane is set.
    ///
    /// On a mask this answers "is any lane true", which lets callers skip
    /// work for all-false masks.
    #[inline(always)]
    pub fn any(&self) -> bool {
        let combined = self.regs[1..]
            .iter()
            .fold(self.regs[0], |acc, reg| acc.or(*reg));
        !combined.is_zero()
    }

    /// Takes `other` in lanes where `mask` is true and `self` elsewhere.
    #[inline(always)]
    pub fn blend(self, mask: Mask<R, REGS>, other: Self) -> Self {
        let mut regs = self.regs;
        for ((reg, other), mask) in regs.iter_mut().zip(other.regs).zip(mask.into_registers()) {
            *reg = (*reg).blend(other, mask);
        }
        Self { regs }
    }

    /// Per-lane correctly rounded square root, regardless of register.
    #[inline(always)]
    pub fn sqrt_exact(self) -> Self {
        self.map(R::sqrt)
    }
}

#[inline(always)]
fn debug_assert_aligned<R: NativeRegister>(addr: usize) {
    debug_assert!(
        addr % R::ALIGN == 0,
        "address {:#x} is not aligned to {} bytes",
        addr,
        R::ALIGN
    );
}

fn check_offsets(len: usize, offsets: &[i32], arity: usize) {
    assert!(
        offsets.len() >= arity,
        "{} offsets given for {} lanes",
        offsets.len(),
        arity
    );
    for &offset in &offsets[..arity] {
        assert!(
            offset >= 0 && (offset as usize) < len,
            "offset {} outside buffer of {} scalars",
            offset,
            len
        );
    }
}

impl<R: NativeRegister, const REGS: usize> Default for Vector<R, REGS> {
    #[inline(always)]
    fn default() -> Self {
        Self::splat(<R::Scalar as Element>::ZERO)
    }
}

impl<R: NativeRegister, const REGS: usize> Index<usize> for Vector<R, REGS> {
    type Output = R::Scalar;

    #[inline]
    fn index(&self, index: usize) -> &R::Scalar {
        &self.as_slice()[index]
    }
}

impl<R: NativeRegister, const REGS: usize> PartialEq for Vector<R, REGS> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<R: NativeRegister, const REGS: usize> Debug for Vector<R, REGS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ShortVec<{}, {}>({:?})",
            <R::Scalar as Element>::NAME,
            Self::ARITY,
            self.as_slice()
        )
    }
}

/// Renders `[l0, l1, ...]` in logical lane order.
impl<R: NativeRegister, const REGS: usize> Display for Vector<R, REGS> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, lane) in self.as_slice().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(lane, f)?;
        }
        f.write_str("]")
    }
}
