//! # shortvec
//!
//! Fixed-width numeric vectors for stencil and particle kernels.
//!
//! `ShortVec<T, N>` is a value of `N` lanes of `f32` or `f64`. Each one is
//! stored as a fixed array of native registers whose widths add up to `N`
//! exactly; every operation is one native instruction per register. Which
//! registers are used is decided at build time by `build.rs` (AVX, SSE2,
//! NEON, or plain scalars), so the hot path never branches on hardware.
//!
//! ```
//! use shortvec::ShortVec;
//!
//! type V = ShortVec<f64, 16>;
//! let v = V::splat(2.0);
//! let sq = v * v;
//! assert!((0..16).all(|i| sq[i] == 4.0));
//! ```
//!
//! The AVX family is used only when the target enables AVX, e.g. with
//! `RUSTFLAGS="-C target-cpu=native"`; otherwise x86_64 builds use SSE2.
//! Set `SHORTVEC_ISA=scalar|sse2|avx|avx2` at build time to narrow the
//! selection.

#![deny(unsafe_op_in_unsafe_fn)]

pub mod arity;
pub mod backends;
pub mod element;
pub mod isa;
pub mod mask;
mod ops;
pub mod register;
pub mod report;
pub mod sqrt;
pub mod vector;

pub use arity::{Arity, MaskVector, ShortVec, ShortVector};
pub use element::Element;
pub use isa::{Isa, IsaFeatures};
pub use mask::Mask;
pub use register::{NativeRegister, RsqrtEstimate};
pub use sqrt::{DeferredSqrt, SqrtKind, SqrtStrategy};
pub use vector::Vector;

