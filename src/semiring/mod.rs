//! Semirings parameterizing every weight computation.
//!
//! A semiring (V, ⊕, ⊗, 0, 1) provides:
//! - Additive commutative monoid (V, ⊕, 0)
//! - Multiplicative monoid (V, ⊗, 1)
//! - ⊗ distributes over ⊕
//!
//! The laws are relied upon but never checked at runtime. The same network
//! and SPN code computes probabilities, ranks or exact rationals depending on
//! which semiring instance it is handed.

use std::fmt;

mod probability;
mod rank;
mod rational;

pub use probability::{ProbabilitySemiring, PROBABILITY};
pub use rank::{Rank, RankSemiring, RANK};
pub use rational::{Rational, RationalProbabilitySemiring, RATIONAL_PROBABILITY};

/// Algebraic contract shared by all weight systems.
///
/// Implementations are stateless unit structs; models store a copy of the
/// instance (a zero-sized handle) and pass it wherever weights combine.
pub trait Semiring: Copy + fmt::Debug + Send + Sync + 'static {
    /// Weight type.
    type Value: Copy + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Additive identity.
    fn zero(&self) -> Self::Value;

    /// Multiplicative identity.
    fn one(&self) -> Self::Value;

    /// Semiring addition (⊕).
    fn sum(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Semiring multiplication (⊗).
    fn product(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Short stable identifier for logging.
    fn name(&self) -> &'static str;

    /// Check if `v` is the additive identity.
    fn is_zero(&self, v: Self::Value) -> bool {
        v == self.zero()
    }

    /// Equality used for normalization checks. Exact unless the value type
    /// accumulates rounding error.
    fn approx_eq(&self, a: Self::Value, b: Self::Value) -> bool {
        a == b
    }

    /// ⊕ over an iterator, starting from `zero()`.
    fn sum_all<I>(&self, values: I) -> Self::Value
    where
        I: IntoIterator<Item = Self::Value>,
    {
        values
            .into_iter()
            .fold(self.zero(), |acc, v| self.sum(acc, v))
    }

    /// ⊗ over an iterator, starting from `one()`.
    fn product_all<I>(&self, values: I) -> Self::Value
    where
        I: IntoIterator<Item = Self::Value>,
    {
        values
            .into_iter()
            .fold(self.one(), |acc, v| self.product(acc, v))
    }
}
