//! Build report and self-check for the diagnostics binary.

use crate::arity::{ShortVec, ShortVector, DECOMPOSITIONS};
use crate::isa::{self, Isa, IsaFeatures};
use crate::sqrt::SqrtKind;
use anyhow::{ensure, Context};
use log::{debug, info};
use serde::Serialize;

/// How one `(scalar, arity)` pair is laid out on the active family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    pub scalar: &'static str,
    pub arity: usize,
    pub register: &'static str,
    pub register_width: usize,
    pub registers: usize,
    pub sqrt: SqrtKind,
}

/// Everything the build selected, plus what the running CPU offers.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub isa: Isa,
    pub required: IsaFeatures,
    pub host: IsaFeatures,
    pub host_supported: bool,
    pub decompositions: Vec<Decomposition>,
}

impl BuildReport {
    pub fn collect() -> Self {
        let host = isa::host_features();
        Self {
            isa: Isa::ACTIVE,
            required: Isa::ACTIVE.required_features(),
            host,
            host_supported: Isa::ACTIVE.supported_by(host),
            decompositions: DECOMPOSITIONS.to_vec(),
        }
    }

    /// The row for `(scalar, arity)`, if this build supports it.
    pub fn decomposition(&self, scalar: &str, arity: usize) -> Option<&Decomposition> {
        self.decompositions
            .iter()
            .find(|d| d.scalar == scalar && d.arity == arity)
    }
}

/// Runs a short numeric check of every `f64` specialization.
pub fn self_check() -> anyhow::Result<()> {
    check_arity::<ShortVec<f64, 1>>().context("f64 x 1")?;
    check_arity::<ShortVec<f64, 2>>().context("f64 x 2")?;
    check_arity::<ShortVec<f64, 4>>().context("f64 x 4")?;
    check_arity::<ShortVec<f64, 8>>().context("f64 x 8")?;
    check_arity::<ShortVec<f64, 16>>().context("f64 x 16")?;
    check_arity::<ShortVec<f64, 32>>().context("f64 x 32")?;
    info!("Self-check passed for every f64 arity");
    Ok(())
}

fn check_arity<V: ShortVector<Scalar = f64>>() -> anyhow::Result<()> {
    let lanes: Vec<f64> = (0..V::ARITY).map(|i| i as f64 + 1.0).collect();
    let a = V::from_slice(&lanes);
    let b = V::splat(2.0);

    let sum = a + b;
    let product = a * b;
    let quotient = a / b;
    for (i, &x) in lanes.iter().enumerate() {
        ensure!(sum.lane(i) == x + 2.0, "lane {} of a + b is {}", i, sum.lane(i));
        ensure!(product.lane(i) == x * 2.0, "lane {} of a * b is {}", i, product.lane(i));
        ensure!(quotient.lane(i) == x / 2.0, "lane {} of a / b is {}", i, quotient.lane(i));
    }

    // Reverse permutation out and back.
    let offsets: Vec<i32> = (0..V::ARITY as i32).rev().collect();
    let mut scattered = vec![0.0; V::ARITY];
    a.scatter_into(&mut scattered, &offsets);
    ensure!(
        scattered.iter().rev().copied().eq(lanes.iter().copied()),
        "scatter wrote {:?}",
        scattered
    );
    let gathered = V::gather_from(&scattered, &offsets);
    ensure!(gathered == a, "gather read {} instead of {}", gathered, a);

    let picked = a.blend(a.cmp_lt(b), b);
    for (i, &x) in lanes.iter().enumerate() {
        let expected = if x < 2.0 { 2.0 } else { x };
        ensure!(picked.lane(i) == expected, "lane {} of blend is {}", i, picked.lane(i));
    }

    debug!("f64 x {} passed", V::ARITY);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn report_lists_every_specialization() {
        let report = BuildReport::collect();
        assert_eq!(report.isa, Isa::ACTIVE);
        for scalar in ["f64", "f32"] {
            for arity in [1, 2, 4, 8, 16, 32] {
                let row = report
                    .decomposition(scalar, arity)
                    .unwrap_or_else(|| panic!("missing {} x {}", scalar, arity));
                assert_eq!(row.register_width * row.registers, arity);
            }
        }
        assert!(report.decomposition("f64", 3).is_none());
    }

    #[test]
    fn arity_one_is_a_single_scalar() {
        let report = BuildReport::collect();
        let row = report.decomposition("f64", 1).unwrap();
        assert_eq!(row.register, "Scalar");
        assert_eq!(row.registers, 1);
        assert_eq!(row.sqrt, SqrtKind::Exact);
    }

    #[test]
    fn report_serializes_to_json() {
        let json = serde_json::to_value(BuildReport::collect()).unwrap();
        assert_eq!(json["decompositions"].as_array().unwrap().len(), 12);
        assert!(json["decompositions"][0]["sqrt"].is_string());
        assert!(json["host_supported"].as_bool().unwrap());
    }

    #[test]
    fn self_check_passes() {
        self_check().unwrap();
    }
}
