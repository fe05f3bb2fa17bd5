//! Native register implementations, one module per instruction-set family.
//!
//! Only the modules for the compilation target are built. The scalar
//! registers are always present: they back arity 1 and the fallback family.

#[cfg(target_arch = "x86_64")]
pub mod x86;

#[cfg(target_arch = "aarch64")]
pub mod arm;

pub mod scalar;
