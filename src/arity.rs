//! Specialization selection.
//!
//! Callers name a scalar and an arity (`ShortVec<f64, 16>`); exactly one
//! decomposition per pair is compiled, picked by the instruction-set family
//! the build selected. Unsupported arities simply have no `Arity` impl, so
//! naming one is a compile error.

use crate::element::Element;
use crate::mask::Mask;
use crate::register::NativeRegister;
use crate::report::Decomposition;
use crate::sqrt::{SqrtKind, SqrtStrategy};
use crate::vector::Vector;
use core::fmt::{Debug, Display};
use core::ops::{
    Add, AddAssign, BitAnd, BitOr, Div, DivAssign, Mul, MulAssign, Not, Sub, SubAssign,
};

/// Maps `(Self, N)` to the vector type that implements it on this build.
pub trait Arity<const N: usize>: Element {
    type Vector: ShortVector<Scalar = Self>;
}

/// The short vector of `N` lanes of `T` for the active instruction set.
pub type ShortVec<T, const N: usize> = <T as Arity<N>>::Vector;

/// Interface shared by every specialization, for code generic over arity.
pub trait ShortVector:
    Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    type Scalar: Element;
    type Mask: MaskVector;
    /// Result of [`ShortVector::sqrt`]; either `Self` or a deferred root.
    type Sqrt: Into<Self>;

    const ARITY: usize;
    const REGISTERS: usize;
    const SQRT_KIND: SqrtKind;
    /// Bound on the relative error of [`ShortVector::div_sqrt`].
    const DIV_SQRT_REL_ERROR: f64;

    fn splat(val: Self::Scalar) -> Self;
    fn from_slice(slice: &[Self::Scalar]) -> Self;
    fn store_slice(self, out: &mut [Self::Scalar]);
    fn gather_from(data: &[Self::Scalar], offsets: &[i32]) -> Self;
    fn scatter_into(self, data: &mut [Self::Scalar], offsets: &[i32]);

    /// # Safety
    ///
    /// See [`Vector::load`].
    unsafe fn load(ptr: *const Self::Scalar) -> Self;
    /// # Safety
    ///
    /// See [`Vector::load_aligned`].
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self;
    /// # Safety
    ///
    /// See [`Vector::store`].
    unsafe fn store(self, ptr: *mut Self::Scalar);
    /// # Safety
    ///
    /// See [`Vector::store_aligned`].
    unsafe fn store_aligned(self, ptr: *mut Self::Scalar);
    /// # Safety
    ///
    /// See [`Vector::store_nt`].
    unsafe fn store_nt(self, ptr: *mut Self::Scalar);
    /// # Safety
    ///
    /// See [`Vector::gather`].
    unsafe fn gather(base: *const Self::Scalar, offsets: &[i32]) -> Self;
    /// # Safety
    ///
    /// See [`Vector::scatter`].
    unsafe fn scatter(self, base: *mut Self::Scalar, offsets: &[i32]);

    fn lane(&self, index: usize) -> Self::Scalar;
    fn any(&self) -> bool;

    fn cmp_lt(self, rhs: Self) -> Self::Mask;
    fn cmp_le(self, rhs: Self) -> Self::Mask;
    fn cmp_eq(self, rhs: Self) -> Self::Mask;
    fn cmp_gt(self, rhs: Self) -> Self::Mask;
    fn cmp_ge(self, rhs: Self) -> Self::Mask;
    fn blend(self, mask: Self::Mask, other: Self) -> Self;

    fn sqrt(self) -> Self::Sqrt;
    fn sqrt_exact(self) -> Self;
    /// `self / sqrt`, through the reciprocal estimate where the root is deferred.
    fn div_sqrt(self, sqrt: Self::Sqrt) -> Self;
}

/// Interface shared by every comparison mask.
pub trait MaskVector:
    Copy + Debug + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    fn any(&self) -> bool;
    fn all(&self) -> bool;
    fn lane(&self, index: usize) -> bool;
}

impl<R: NativeRegister, const REGS: usize> MaskVector for Mask<R, REGS> {
    #[inline(always)]
    fn any(&self) -> bool {
        Mask::any(self)
    }

    #[inline(always)]
    fn all(&self) -> bool {
        Mask::all(self)
    }

    #[inline(always)]
    fn lane(&self, index: usize) -> bool {
        Mask::lane(self, index)
    }
}

impl<R: SqrtStrategy, const REGS: usize> ShortVector for Vector<R, REGS> {
    type Scalar = R::Scalar;
    type Mask = Mask<R, REGS>;
    type Sqrt = R::Sqrt<REGS>;

    const ARITY: usize = REGS * R::WIDTH;
    const REGISTERS: usize = REGS;
    const SQRT_KIND: SqrtKind = R::KIND;
    const DIV_SQRT_REL_ERROR: f64 = R::DIV_SQRT_REL_ERROR;

    #[inline(always)]
    fn splat(val: R::Scalar) -> Self {
        Vector::splat(val)
    }

    #[inline(always)]
    fn from_slice(slice: &[R::Scalar]) -> Self {
        Vector::from_slice(slice)
    }

    #[inline(always)]
    fn store_slice(self, out: &mut [R::Scalar]) {
        Vector::store_slice(self, out)
    }

    #[inline(always)]
    fn gather_from(data: &[R::Scalar], offsets: &[i32]) -> Self {
        Vector::gather_from(data, offsets)
    }

    #[inline(always)]
    fn scatter_into(self, data: &mut [R::Scalar], offsets: &[i32]) {
        Vector::scatter_into(self, data, offsets)
    }

    #[inline(always)]
    unsafe fn load(ptr: *const R::Scalar) -> Self {
        unsafe { Vector::load(ptr) }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const R::Scalar) -> Self {
        unsafe { Vector::load_aligned(ptr) }
    }

    #[inline(always)]
    unsafe fn store(self, ptr: *mut R::Scalar) {
        unsafe { Vector::store(self, ptr) }
    }

    #[inline(always)]
    unsafe fn store_aligned(self, ptr: *mut R::Scalar) {
        unsafe { Vector::store_aligned(self, ptr) }
    }

    #[inline(always)]
    unsafe fn store_nt(self, ptr: *mut R::Scalar) {
        unsafe { Vector::store_nt(self, ptr) }
    }

    #[inline(always)]
    unsafe fn gather(base: *const R::Scalar, offsets: &[i32]) -> Self {
        unsafe { Vector::gather(base, offsets) }
    }

    #[inline(always)]
    unsafe fn scatter(self, base: *mut R::Scalar, offsets: &[i32]) {
        unsafe { Vector::scatter(self, base, offsets) }
    }

    #[inline]
    fn lane(&self, index: usize) -> R::Scalar {
        Vector::lane(self, index)
    }

    #[inline(always)]
    fn any(&self) -> bool {
        Vector::any(self)
    }

    #[inline(always)]
    fn cmp_lt(self, rhs: Self) -> Mask<R, REGS> {
        Vector::cmp_lt(self, rhs)
    }

    #[inline(always)]
    fn cmp_le(self, rhs: Self) -> Mask<R, REGS> {
        Vector::cmp_le(self, rhs)
    }

    #[inline(always)]
    fn cmp_eq(self, rhs: Self) -> Mask<R, REGS> {
        Vector::cmp_eq(self, rhs)
    }

    #[inline(always)]
    fn cmp_gt(self, rhs: Self) -> Mask<R, REGS> {
        Vector::cmp_gt(self, rhs)
    }

    #[inline(always)]
    fn cmp_ge(self, rhs: Self) -> Mask<R, REGS> {
        Vector::cmp_ge(self, rhs)
    }

    #[inline(always)]
    fn blend(self, mask: Mask<R, REGS>, other: Self) -> Self {
        Vector::blend(self, mask, other)
    }

    #[inline(always)]
    fn sqrt(self) -> R::Sqrt<REGS> {
        R::sqrt_vector(self)
    }

    #[inline(always)]
    fn sqrt_exact(self) -> Self {
        Vector::sqrt_exact(self)
    }

    #[inline(always)]
    fn div_sqrt(self, sqrt: R::Sqrt<REGS>) -> Self {
        R::div_sqrt(self, sqrt)
    }
}

/// Emits the `Arity` impls, conversions, and report rows for one family.
///
/// Each row is `scalar, arity => register, register count`. A row whose
/// register count does not cover the arity exactly fails to compile.
macro_rules! specializations {
    ($($scalar:ty, $n:literal => $reg:ty, $regs:literal;)*) => {
        $(
            impl Arity<$n> for $scalar {
                type Vector = Vector<$reg, $regs>;
            }

            const _: () = assert!(
                <$reg as NativeRegister>::WIDTH * $regs == $n,
                "register count must cover the arity exactly"
            );

            impl From<$scalar> for Vector<$reg, $regs> {
                #[inline(always)]
                fn from(val: $scalar) -> Self {
                    Self::splat(val)
                }
            }

            impl From<[$scalar; $n]> for Vector<$reg, $regs> {
                #[inline(always)]
                fn from(lanes: [$scalar; $n]) -> Self {
                    Self::from_slice(&lanes)
                }
            }

            impl From<Vector<$reg, $regs>> for [$scalar; $n] {
                #[inline(always)]
                fn from(v: Vector<$reg, $regs>) -> Self {
                    v.to_array()
                }
            }

            impl Vector<$reg, $regs> {
                /// Copies the lanes out, in logical order.
                #[inline(always)]
                pub fn to_array(self) -> [$scalar; $n] {
                    let mut out = [<$scalar as Element>::ZERO; $n];
                    self.store_slice(&mut out);
                    out
                }
            }
        )*

        pub(crate) const DECOMPOSITIONS: &[Decomposition] = &[
            $(
                Decomposition {
                    scalar: <$scalar as Element>::NAME,
                    arity: $n,
                    register: <$reg as NativeRegister>::NAME,
                    register_width: <$reg as NativeRegister>::WIDTH,
                    registers: $regs,
                    sqrt: <$reg as SqrtStrategy>::KIND,
                },
            )*
        ];
    };
}

#[cfg(all(target_arch = "x86_64", not(shortvec_scalar), shortvec_avx))]
mod family {
    use super::*;
    use crate::backends::scalar::Scalar;
    use crate::backends::x86::{F32x4, F32x8, F64x2, F64x4};

    specializations! {
        f64, 1 => Scalar<f64>, 1;
        f64, 2 => F64x2, 1;
        f64, 4 => F64x4, 1;
        f64, 8 => F64x4, 2;
        f64, 16 => F64x4, 4;
        f64, 32 => F64x4, 8;
        f32, 1 => Scalar<f32>, 1;
        f32, 2 => Scalar<f32>, 2;
        f32, 4 => F32x4, 1;
        f32, 8 => F32x8, 1;
        f32, 16 => F32x8, 2;
        f32, 32 => F32x8, 4;
    }
}

#[cfg(all(target_arch = "x86_64", not(shortvec_scalar), not(shortvec_avx)))]
mod family {
    use super::*;
    use crate::backends::scalar::Scalar;
    use crate::backends::x86::{F32x4, F64x2};

    specializations! {
        f64, 1 => Scalar<f64>, 1;
        f64, 2 => F64x2, 1;
        f64, 4 => F64x2, 2;
        f64, 8 => F64x2, 4;
        f64, 16 => F64x2, 8;
        f64, 32 => F64x2, 16;
        f32, 1 => Scalar<f32>, 1;
        f32, 2 => Scalar<f32>, 2;
        f32, 4 => F32x4, 1;
        f32, 8 => F32x4, 2;
        f32, 16 => F32x4, 4;
        f32, 32 => F32x4, 8;
    }
}

#[cfg(all(target_arch = "aarch64", not(shortvec_scalar)))]
mod family {
    use super::*;
    use crate::backends::arm::{F32x4, F64x2};
    use crate::backends::scalar::Scalar;

    specializations! {
        f64, 1 => Scalar<f64>, 1;
        f64, 2 => F64x2, 1;
        f64, 4 => F64x2, 2;
        f64, 8 => F64x2, 4;
        f64, 16 => F64x2, 8;
        f64, 32 => F64x2, 16;
        f32, 1 => Scalar<f32>, 1;
        f32, 2 => Scalar<f32>, 2;
        f32, 4 => F32x4, 1;
        f32, 8 => F32x4, 2;
        f32, 16 => F32x4, 4;
        f32, 32 => F32x4, 8;
    }
}

#[cfg(any(
    shortvec_scalar,
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
mod family {
    use super::*;
    use crate::backends::scalar::Scalar;

    specializations! {
        f64, 1 => Scalar<f64>, 1;
        f64, 2 => Scalar<f64>, 2;
        f64, 4 => Scalar<f64>, 4;
        f64, 8 => Scalar<f64>, 8;
        f64, 16 => Scalar<f64>, 16;
        f64, 32 => Scalar<f64>, 32;
        f32, 1 => Scalar<f32>, 1;
        f32, 2 => Scalar<f32>, 2;
        f32, 4 => Scalar<f32>, 4;
        f32, 8 => Scalar<f32>, 8;
        f32, 16 => Scalar<f32>, 16;
        f32, 32 => Scalar<f32>, 32;
    }
}

pub(crate) use family::DECOMPOSITIONS;

#[cfg(test)]
mod tests {
    use super::*;

    fn sum_of_squares<V: ShortVector>(v: V) -> f64 {
        let sq = v * v;
        (0..V::ARITY).map(|i| sq.lane(i).to_f64()).sum()
    }

    #[test]
    fn generic_kernels_run_on_every_arity() {
        assert_eq!(sum_of_squares(ShortVec::<f64, 1>::splat(3.0)), 9.0);
        assert_eq!(sum_of_squares(ShortVec::<f64, 8>::splat(3.0)), 72.0);
        assert_eq!(sum_of_squares(ShortVec::<f32, 32>::splat(0.5)), 8.0);
    }

    #[test]
    fn table_rows_cover_their_arity() {
        assert_eq!(DECOMPOSITIONS.len(), 12);
        for row in DECOMPOSITIONS {
            assert_eq!(row.register_width * row.registers, row.arity, "{:?}", row);
        }
    }

    #[test]
    fn literal_lane_list_keeps_order() {
        let v = ShortVec::<f64, 4>::from([1.0, 2.0, 3.0, 4.0]);
        assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
        let back: [f64; 4] = v.into();
        assert_eq!(back, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(ShortVec::<f32, 2>::from(7.0f32).to_array(), [7.0, 7.0]);
    }
}
