//! Rank semiring: (ℤ ∪ {∞}, min, +, ∞, 0).
//!
//! Ranks are Spohnian disbelief degrees: 0 is "not disbelieved at all",
//! larger is less plausible, ∞ is impossible.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Semiring;

/// A disbelief rank, finite or infinite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(i64);

impl Rank {
    /// The impossible rank; additive identity of the rank semiring.
    pub const INFINITE: Self = Self(i64::MAX);

    /// Rank 0 (not disbelieved), the multiplicative identity.
    pub const PLAUSIBLE: Self = Self(0);

    /// Creates a finite rank. `i64::MAX` is reserved for [`Rank::INFINITE`].
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw value, `None` for the infinite rank.
    #[must_use]
    pub const fn value(self) -> Option<i64> {
        if self.is_infinite() {
            None
        } else {
            Some(self.0)
        }
    }

    /// True for [`Rank::INFINITE`].
    #[must_use]
    pub const fn is_infinite(self) -> bool {
        self.0 == i64::MAX
    }

    /// Addition that saturates to infinity instead of overflowing.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        if self.is_infinite() || other.is_infinite() {
            return Self::INFINITE;
        }
        match self.0.checked_add(other.0) {
            Some(v) => Self(v),
            None => Self::INFINITE,
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Self::PLAUSIBLE
    }
}

impl From<i64> for Rank {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(i64::from(v))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "∞")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Semiring for ranks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RankSemiring;

/// Process-wide rank semiring.
pub const RANK: RankSemiring = RankSemiring;

impl Semiring for RankSemiring {
    type Value = Rank;

    #[inline]
    fn zero(&self) -> Rank {
        Rank::INFINITE
    }

    #[inline]
    fn one(&self) -> Rank {
        Rank::PLAUSIBLE
    }

    #[inline]
    fn sum(&self, a: Rank, b: Rank) -> Rank {
        a.min(b)
    }

    #[inline]
    fn product(&self, a: Rank, b: Rank) -> Rank {
        a.saturating_add(b)
    }

    fn name(&self) -> &'static str {
        "rank"
    }
}
