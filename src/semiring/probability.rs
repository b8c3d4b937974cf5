//! Probability semiring: (ℝ≥0, +, ×, 0, 1).

use super::Semiring;

/// Absolute tolerance for normalization checks on floating-point sums.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Semiring for probabilities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbabilitySemiring;

/// Process-wide probability semiring.
pub const PROBABILITY: ProbabilitySemiring = ProbabilitySemiring;

impl Semiring for ProbabilitySemiring {
    type Value = f64;

    #[inline]
    fn zero(&self) -> f64 {
        0.0
    }

    #[inline]
    fn one(&self) -> f64 {
        1.0
    }

    #[inline]
    fn sum(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn product(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    fn name(&self) -> &'static str {
        "probability"
    }

    fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= NORMALIZATION_TOLERANCE
    }
}
