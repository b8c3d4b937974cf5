//! Exact rational probabilities.
//!
//! Values are kept reduced with a positive denominator, so structural
//! equality is numeric equality. The operators panic when a result does not
//! fit in 128 bits; the `checked_*` methods return `None` instead.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::Semiring;
use crate::error::ValidationError;

/// A reduced fraction `num / den` with `den > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rational {
    num: i128,
    den: i128,
}

const fn gcd(mut m: i128, mut n: i128) -> i128 {
    if m < 0 {
        m = -m;
    }
    if n < 0 {
        n = -n;
    }
    while n != 0 {
        let r = m % n;
        m = n;
        n = r;
    }
    m
}

impl Rational {
    /// 0/1.
    pub const ZERO: Self = Self { num: 0, den: 1 };
    /// 1/1.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Creates a reduced fraction.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroDenominator` if `den` is zero.
    pub fn new(num: i128, den: i128) -> Result<Self, ValidationError> {
        if den == 0 {
            return Err(ValidationError::ZeroDenominator);
        }
        Ok(Self::reduced(num, den))
    }

    /// Creates the integer `n / 1`.
    #[must_use]
    pub const fn integer(n: i128) -> Self {
        Self { num: n, den: 1 }
    }

    fn reduced(num: i128, den: i128) -> Self {
        let g = gcd(num, den);
        let (mut num, mut den) = if g == 0 { (0, 1) } else { (num / g, den / g) };
        if den < 0 {
            num = -num;
            den = -den;
        }
        Self { num, den }
    }

    /// Numerator in lowest terms; carries the sign.
    #[must_use]
    pub const fn numerator(self) -> i128 {
        self.num
    }

    /// Denominator in lowest terms; always positive.
    #[must_use]
    pub const fn denominator(self) -> i128 {
        self.den
    }

    /// Nearest `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// True for 0.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.num == 0
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        if self.num < 0 {
            -self
        } else {
            self
        }
    }

    /// `den / num`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroDenominator` for zero.
    pub fn recip(self) -> Result<Self, ValidationError> {
        Self::new(self.den, self.num)
    }

    /// `(a.num + b.num) / (a.den + b.den)`, or `None` on overflow.
    #[must_use]
    pub fn mediant(self, other: Self) -> Option<Self> {
        Some(Self::reduced(
            self.num.checked_add(other.num)?,
            self.den.checked_add(other.den)?,
        ))
    }

    /// Addition, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        if self.is_zero() {
            return Some(other);
        }
        if other.is_zero() {
            return Some(self);
        }
        let g = gcd(self.den, other.den);
        let lcm = (self.den / g).checked_mul(other.den)?;
        let left = self.num.checked_mul(lcm / self.den)?;
        let right = other.num.checked_mul(lcm / other.den)?;
        Some(Self::reduced(left.checked_add(right)?, lcm))
    }

    /// Multiplication, or `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        // Cross-cancel before multiplying to keep intermediates small.
        let a = Self::reduced(self.num, other.den);
        let b = Self::reduced(other.num, self.den);
        Some(Self::reduced(
            a.num.checked_mul(b.num)?,
            a.den.checked_mul(b.den)?,
        ))
    }

    /// Division.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ZeroDenominator` when dividing by zero and
    /// `ValidationError::RationalOverflow` if the quotient does not fit.
    pub fn checked_div(self, other: Self) -> Result<Self, ValidationError> {
        self.checked_mul(other.recip()?)
            .ok_or(ValidationError::RationalOverflow)
    }
}

fn overflow(op: &str) -> ! {
    panic!("rational {op} overflows 128 bits")
}

/// Compares `a/b` with `c/d` for positive `b` and `d` without
/// multiplying, by walking both continued fractions.
fn cmp_fractions(mut a: i128, mut b: i128, mut c: i128, mut d: i128) -> Ordering {
    loop {
        let (qa, ra) = (a.div_euclid(b), a.rem_euclid(b));
        let (qc, rc) = (c.div_euclid(d), c.rem_euclid(d));
        if qa != qc {
            return qa.cmp(&qc);
        }
        match (ra == 0, rc == 0) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            // ra/b against rc/d is d/rc against b/ra.
            (false, false) => (a, b, c, d) = (d, rc, b, ra),
        }
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i64> for Rational {
    fn from(v: i64) -> Self {
        Self::integer(i128::from(v))
    }
}

/// # Panics
///
/// Panics if the sum does not fit in 128 bits.
impl Add for Rational {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(other).unwrap_or_else(|| overflow("addition"))
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self + (-other)
    }
}

/// # Panics
///
/// Panics if the product does not fit in 128 bits.
impl Mul for Rational {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.checked_mul(other).unwrap_or_else(|| overflow("multiplication"))
    }
}

/// # Panics
///
/// Panics on division by zero, like integer division, and if the quotient
/// does not fit in 128 bits. Use [`Rational::checked_div`] for a fallible
/// form.
impl Div for Rational {
    type Output = Self;

    fn div(self, other: Self) -> Self {
        assert!(!other.is_zero(), "division of rational by zero");
        self.checked_div(other).unwrap_or_else(|_| overflow("division"))
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            num: -self.num,
            den: self.den,
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.num.checked_mul(other.den), other.num.checked_mul(self.den)) {
            (Some(left), Some(right)) => left.cmp(&right),
            _ => cmp_fractions(self.num, self.den, other.num, other.den),
        }
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl<'de> Deserialize<'de> for Rational {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            num: i128,
            den: i128,
        }

        let raw = Raw::deserialize(deserializer)?;
        Rational::new(raw.num, raw.den).map_err(serde::de::Error::custom)
    }
}

/// Semiring for exact rational probabilities. `sum` and `product` panic
/// like the operators when a result does not fit in 128 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RationalProbabilitySemiring;

/// Process-wide rational probability semiring.
pub const RATIONAL_PROBABILITY: RationalProbabilitySemiring = RationalProbabilitySemiring;

impl Semiring for RationalProbabilitySemiring {
    type Value = Rational;

    fn zero(&self) -> Rational {
        Rational::ZERO
    }

    fn one(&self) -> Rational {
        Rational::ONE
    }

    fn sum(&self, a: Rational, b: Rational) -> Rational {
        a + b
    }

    fn product(&self, a: Rational, b: Rational) -> Rational {
        a * b
    }

    fn name(&self) -> &'static str {
        "rational_probability"
    }
}
