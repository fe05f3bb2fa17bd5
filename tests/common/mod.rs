//! Helpers shared by the integration tests.

#![allow(dead_code)]

use shortvec::Element;

/// Deterministic pseudo-random source (64-bit LCG, Knuth's constants).
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Finite, nonzero, either sign, magnitude in `[0.5, 100)`.
    pub fn finite<T: Element>(&mut self) -> T {
        let magnitude = 0.5 + self.unit() * 99.5;
        let signed = if self.unit() < 0.5 { -magnitude } else { magnitude };
        T::from_f64(signed)
    }

    /// Positive, magnitude in `[0.01, 1000)`.
    pub fn positive<T: Element>(&mut self) -> T {
        T::from_f64(0.01 + self.unit() * 1000.0)
    }

    pub fn lanes<T: Element>(&mut self, n: usize) -> Vec<T> {
        (0..n).map(|_| self.finite()).collect()
    }
}

/// Runs `$check::<V>()` for every supported `(scalar, arity)` pair.
macro_rules! for_each_arity {
    ($check:ident) => {{
        use shortvec::ShortVec;
        $check::<ShortVec<f64, 1>>();
        $check::<ShortVec<f64, 2>>();
        $check::<ShortVec<f64, 4>>();
        $check::<ShortVec<f64, 8>>();
        $check::<ShortVec<f64, 16>>();
        $check::<ShortVec<f64, 32>>();
        $check::<ShortVec<f32, 1>>();
        $check::<ShortVec<f32, 2>>();
        $check::<ShortVec<f32, 4>>();
        $check::<ShortVec<f32, 8>>();
        $check::<ShortVec<f32, 16>>();
        $check::<ShortVec<f32, 32>>();
    }};
}
