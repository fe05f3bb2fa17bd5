//! Instruction-set family selection.
//!
//! The family is fixed at build time (see `build.rs`); nothing on the hot
//! path branches on it. This module only describes the choice and checks it
//! against the CPU the program is running on.

use anyhow::bail;
use bitflags::bitflags;
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// CPU vector extensions relevant to the short-vector families.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct IsaFeatures: u8 {
        const SSE2 = 1 << 0;
        const AVX = 1 << 1;
        const AVX2 = 1 << 2;
        const NEON = 1 << 3;
    }
}

/// The instruction-set family a build was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    Scalar,
    Sse2,
    Avx,
    /// AVX registers with the native AVX2 gather.
    Avx2,
    Neon,
}

impl Isa {
    /// The family selected for this build.
    #[cfg(any(
        shortvec_scalar,
        not(any(target_arch = "x86_64", target_arch = "aarch64"))
    ))]
    pub const ACTIVE: Isa = Isa::Scalar;
    #[cfg(all(target_arch = "x86_64", not(shortvec_scalar), not(shortvec_avx)))]
    pub const ACTIVE: Isa = Isa::Sse2;
    #[cfg(all(
        target_arch = "x86_64",
        not(shortvec_scalar),
        shortvec_avx,
        not(shortvec_avx2)
    ))]
    pub const ACTIVE: Isa = Isa::Avx;
    #[cfg(all(target_arch = "x86_64", not(shortvec_scalar), shortvec_avx2))]
    pub const ACTIVE: Isa = Isa::Avx2;
    #[cfg(all(target_arch = "aarch64", not(shortvec_scalar)))]
    pub const ACTIVE: Isa = Isa::Neon;

    /// Extensions a CPU must offer to run code built for this family.
    pub fn required_features(self) -> IsaFeatures {
        match self {
            Isa::Scalar => IsaFeatures::empty(),
            Isa::Sse2 => IsaFeatures::SSE2,
            Isa::Avx => IsaFeatures::SSE2 | IsaFeatures::AVX,
            Isa::Avx2 => IsaFeatures::SSE2 | IsaFeatures::AVX | IsaFeatures::AVX2,
            Isa::Neon => IsaFeatures::NEON,
        }
    }

    /// Whether `host` can run code built for this family.
    pub fn supported_by(self, host: IsaFeatures) -> bool {
        host.contains(self.required_features())
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Isa::Scalar => "scalar",
            Isa::Sse2 => "sse2",
            Isa::Avx => "avx",
            Isa::Avx2 => "avx2",
            Isa::Neon => "neon",
        };
        f.write_str(name)
    }
}

static HOST_FEATURES: Lazy<IsaFeatures> = Lazy::new(detect);

/// Extensions offered by the running CPU, detected once.
pub fn host_features() -> IsaFeatures {
    *HOST_FEATURES
}

#[cfg(target_arch = "x86_64")]
fn detect() -> IsaFeatures {
    let mut features = IsaFeatures::empty();
    if std::arch::is_x86_feature_detected!("sse2") {
        features |= IsaFeatures::SSE2;
    }
    if std::arch::is_x86_feature_detected!("avx") {
        features |= IsaFeatures::AVX;
    }
    if std::arch::is_x86_feature_detected!("avx2") {
        features |= IsaFeatures::AVX2;
    }
    debug!("Detected host vector extensions: {:?}", features);
    features
}

#[cfg(target_arch = "aarch64")]
fn detect() -> IsaFeatures {
    // NEON is mandatory on ARMv8-A.
    debug!("Detected host vector extensions: {:?}", IsaFeatures::NEON);
    IsaFeatures::NEON
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn detect() -> IsaFeatures {
    debug!("No vector extensions detected for this architecture");
    IsaFeatures::empty()
}

/// Fails if the running CPU lacks an extension the build was compiled for.
pub fn ensure_host_supported() -> anyhow::Result<()> {
    let required = Isa::ACTIVE.required_features();
    let host = host_features();
    if !host.contains(required) {
        let missing = required - host;
        warn!(
            "Build targets {} but the host lacks {:?}",
            Isa::ACTIVE,
            missing
        );
        bail!(
            "this build uses the {} family, which needs {:?}; the CPU only offers {:?}",
            Isa::ACTIVE,
            required,
            host
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn families_require_their_extensions() {
        assert!(Isa::Scalar.supported_by(IsaFeatures::empty()));
        assert!(!Isa::Avx.supported_by(IsaFeatures::SSE2));
        assert!(Isa::Avx.supported_by(IsaFeatures::SSE2 | IsaFeatures::AVX | IsaFeatures::AVX2));
        assert!(!Isa::Avx2.supported_by(IsaFeatures::SSE2 | IsaFeatures::AVX));
        assert!(Isa::Neon.supported_by(IsaFeatures::NEON));
    }

    #[test]
    fn running_host_supports_the_build() {
        // Tests run on the machine they were built for.
        ensure_host_supported().unwrap();
        assert!(Isa::ACTIVE.supported_by(host_features()));
    }

    #[test]
    fn avx_family_only_with_target_feature() {
        if cfg!(shortvec_avx) {
            assert!(cfg!(target_feature = "avx"));
            assert!(matches!(Isa::ACTIVE, Isa::Avx | Isa::Avx2));
        }
        if cfg!(shortvec_avx2) {
            assert!(cfg!(target_feature = "avx2"));
            assert_eq!(Isa::ACTIVE, Isa::Avx2);
        }
    }

    #[test]
    fn isa_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Isa::Avx2).unwrap(), "\"avx2\"");
        assert_eq!(Isa::Sse2.to_string(), "sse2");
    }

    #[test]
    fn features_round_trip_through_serde() {
        let features = IsaFeatures::SSE2 | IsaFeatures::AVX;
        let json = serde_json::to_string(&features).unwrap();
        let back: IsaFeatures = serde_json::from_str(&json).unwrap();
        assert_eq!(back, features);
    }
}
