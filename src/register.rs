//! Native register abstraction.
//!
//! A [`NativeRegister`] is one hardware vector register (or, for the scalar
//! fallback, one plain scalar) holding `WIDTH` lanes. Short vectors are built
//! from fixed arrays of these; every operation on a short vector is applied
//! register by register through this trait.

use crate::element::Element;
use core::fmt::Debug;

/// One native vector register of `WIDTH` lanes of `Scalar`.
///
/// # Safety
///
/// Implementors guarantee that the in-memory representation of `Self` is
/// exactly `WIDTH` contiguous `Scalar` values in lane order (lane 0 at the
/// lowest address). Short vectors rely on this to expose their lanes as a
/// slice.
pub unsafe trait NativeRegister: Copy + Debug + Send + Sync + 'static {
    /// Lane type.
    type Scalar: Element;

    /// Number of lanes held by one register.
    const WIDTH: usize;
    /// Alignment in bytes required by the aligned load/store instructions.
    const ALIGN: usize;
    /// Register name used in reports (`"F64x4"`, ...).
    const NAME: &'static str;

    /// Broadcasts `val` into every lane.
    fn splat(val: Self::Scalar) -> Self;

    /// Unaligned load of `WIDTH` scalars.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `WIDTH` scalars.
    unsafe fn load(ptr: *const Self::Scalar) -> Self;

    /// Aligned load of `WIDTH` scalars.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for reading `WIDTH` scalars and aligned to `ALIGN`.
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self;

    /// Unaligned store of all lanes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `WIDTH` scalars.
    unsafe fn store(self, ptr: *mut Self::Scalar);

    /// Aligned store of all lanes.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for writing `WIDTH` scalars and aligned to `ALIGN`.
    unsafe fn store_aligned(self, ptr: *mut Self::Scalar);

    /// Non-temporal (cache-bypassing) store where the family has one, an
    /// aligned store otherwise.
    ///
    /// # Safety
    ///
    /// Same as [`NativeRegister::store_aligned`].
    unsafe fn store_nt(self, ptr: *mut Self::Scalar);

    /// Loads lane `i` from `base + offsets[i]`.
    ///
    /// # Safety
    ///
    /// `offsets` must be valid for reading `WIDTH` values and every
    /// `base + offsets[i]` must be valid for reading one scalar.
    unsafe fn gather(base: *const Self::Scalar, offsets: *const i32) -> Self;

    /// Stores lane `i` to `base + offsets[i]`.
    ///
    /// # Safety
    ///
    /// `offsets` must be valid for reading `WIDTH` values and every
    /// `base + offsets[i]` must be valid for writing one scalar.
    unsafe fn scatter(self, base: *mut Self::Scalar, offsets: *const i32);

    /// Reads one lane. `lane` must be below `WIDTH`.
    fn extract(self, lane: usize) -> Self::Scalar;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn div(self, rhs: Self) -> Self;
    /// Correctly rounded square root of each lane.
    fn sqrt(self) -> Self;

    // Comparisons yield all-bits-set lanes for true, all-bits-clear for false.
    // NaN compares false.
    fn cmp_lt(self, rhs: Self) -> Self;
    fn cmp_le(self, rhs: Self) -> Self;
    fn cmp_eq(self, rhs: Self) -> Self;
    fn cmp_gt(self, rhs: Self) -> Self;
    fn cmp_ge(self, rhs: Self) -> Self;

    /// Takes `other` in lanes where `mask` is set and `self` elsewhere.
    fn blend(self, other: Self, mask: Self) -> Self;

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn not(self) -> Self;

    /// True when every bit of every lane is clear.
    fn is_zero(self) -> bool;
}

/// Registers whose family offers a fast approximate reciprocal square root.
pub trait RsqrtEstimate: NativeRegister {
    /// Documented upper bound of the estimate's relative error.
    const REL_ERROR: f64;

    /// Approximates `1 / sqrt(x)` per lane.
    fn rsqrt_estimate(self) -> Self;
}
