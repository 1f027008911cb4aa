//! Numeric coefficients that stay exact while they can.

use cas_parser::parser::ast::AstNode;
use num_rational::Rational64;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, One, Signed, Zero};
use std::cmp::Ordering;

/// Integers with a larger magnitude than this are not converted to exact rationals, since the
/// `f64` they came from may already be rounded.
const EXACT_LIMIT: f64 = 9.0e15;

/// A numeric coefficient.
///
/// Integers and ratios of integers are kept as exact rationals, so that `x/3 + x/6` combines to
/// `x/2` instead of `0.5*x`. Any operation that cannot be done exactly, either because an operand
/// is not rational or because the result overflows, falls back to an `f64` approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coeff {
    /// An exact rational number.
    Exact(Rational64),

    /// An approximate value.
    Approx(f64),
}

impl Coeff {
    /// The coefficient `0`.
    pub fn zero() -> Self {
        Self::Exact(Rational64::zero())
    }

    /// The coefficient `1`.
    pub fn one() -> Self {
        Self::Exact(Rational64::one())
    }

    /// Creates an exact integer coefficient.
    pub fn integer(n: i64) -> Self {
        Self::Exact(Rational64::from_integer(n))
    }

    /// Creates a coefficient from a float, which is exact if the float is an integer.
    pub fn from_f64(value: f64) -> Self {
        if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
            Self::integer(value as i64)
        } else {
            Self::Approx(value)
        }
    }

    /// Creates the exact coefficient `numer / denom`, if `denom` is not zero.
    pub fn ratio(numer: i64, denom: i64) -> Option<Self> {
        (denom != 0).then(|| Self::Exact(Rational64::new(numer, denom)))
    }

    /// The value of this coefficient as a float.
    pub fn to_f64(self) -> f64 {
        match self {
            Self::Exact(r) => *r.numer() as f64 / *r.denom() as f64,
            Self::Approx(f) => f,
        }
    }

    /// Returns the coefficient as an exact integer, if it is one.
    pub fn as_integer(self) -> Option<i64> {
        match self {
            Self::Exact(r) if r.is_integer() => Some(r.to_integer()),
            _ => None,
        }
    }

    /// Returns true if this coefficient is zero.
    pub fn is_zero(self) -> bool {
        match self {
            Self::Exact(r) => r.is_zero(),
            Self::Approx(f) => f == 0.0,
        }
    }

    /// Returns true if this coefficient is one.
    pub fn is_one(self) -> bool {
        match self {
            Self::Exact(r) => r.is_one(),
            Self::Approx(f) => f == 1.0,
        }
    }

    /// Returns true if this coefficient is negative.
    pub fn is_negative(self) -> bool {
        match self {
            Self::Exact(r) => r.is_negative(),
            Self::Approx(f) => f < 0.0,
        }
    }

    /// Converts an approximate coefficient with an integer value back into an exact one.
    fn normalize(self) -> Self {
        match self {
            Self::Approx(f) => Self::from_f64(f),
            exact => exact,
        }
    }

    /// Combines two coefficients exactly with `exact`, or approximately with `approx` if either
    /// is approximate or the exact operation overflows.
    fn combine(
        self,
        other: Self,
        exact: impl Fn(&Rational64, &Rational64) -> Option<Rational64>,
        approx: impl Fn(f64, f64) -> f64,
    ) -> Self {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => exact(&a, &b)
                .map(Self::Exact)
                .unwrap_or_else(|| Self::Approx(approx(self.to_f64(), other.to_f64()))),
            _ => Self::Approx(approx(self.to_f64(), other.to_f64())).normalize(),
        }
    }

    /// `self + other`
    pub fn add(self, other: Self) -> Self {
        self.combine(other, |a, b| a.checked_add(b), |a, b| a + b)
    }

    /// `self * other`
    pub fn mul(self, other: Self) -> Self {
        self.combine(other, |a, b| a.checked_mul(b), |a, b| a * b)
    }

    /// `self / other`, or [`None`] if `other` is zero.
    pub fn div(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        Some(self.combine(other, |a, b| a.checked_div(b), |a, b| a / b))
    }

    /// `-self`
    pub fn neg(self) -> Self {
        match self {
            Self::Exact(r) => r.numer().checked_neg()
                .map(|numer| Self::Exact(Rational64::new_raw(numer, *r.denom())))
                .unwrap_or(Self::Approx(-self.to_f64())),
            Self::Approx(f) => Self::Approx(-f),
        }
    }

    /// `|self|`
    pub fn abs(self) -> Self {
        if self.is_negative() {
            self.neg()
        } else {
            self
        }
    }

    /// Splits the coefficient into the numbers written above and below the fraction bar. An
    /// approximate coefficient has no denominator.
    pub fn numer_denom(self) -> (f64, f64) {
        match self {
            Self::Exact(r) => (*r.numer() as f64, *r.denom() as f64),
            Self::Approx(f) => (f, 1.0),
        }
    }

    /// The coefficient as a single node: a number, or an exact ratio `p/q`.
    pub fn to_node(self) -> AstNode {
        match self.numer_denom() {
            (numer, denom) if denom == 1.0 => AstNode::num(numer),
            (numer, denom) => AstNode::div(AstNode::num(numer), AstNode::num(denom)),
        }
    }
}

impl PartialOrd for Coeff {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) => a.partial_cmp(b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }
}

/// Computes `n!` exactly, if it fits in an `i64`.
pub fn factorial(n: u32) -> Option<i64> {
    (1..=n as i64).try_fold(1i64, |acc, k| acc.checked_mul(k))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;

    #[test]
    fn exact_arithmetic() {
        let third = Coeff::ratio(1, 3).unwrap();
        let sixth = Coeff::ratio(1, 6).unwrap();
        assert_eq!(third.add(sixth), Coeff::ratio(1, 2).unwrap());
        assert_eq!(third.mul(Coeff::integer(3)), Coeff::one());
        assert_eq!(Coeff::integer(4).div(Coeff::integer(6)), Coeff::ratio(2, 3));
        assert_eq!(Coeff::one().div(Coeff::zero()), None);
        assert!(third.neg().is_negative());
    }

    #[test]
    fn approximate_fallback() {
        let half = Coeff::from_f64(0.5);
        assert_eq!(half, Coeff::Approx(0.5));
        assert_eq!(half.add(half), Coeff::one());
        assert_eq!(half.mul(Coeff::integer(3)), Coeff::Approx(1.5));
    }

    #[test]
    fn overflow_becomes_approximate() {
        let product = Coeff::integer(1 << 62).mul(Coeff::integer(4));
        assert!(matches!(product, Coeff::Approx(_)));
        assert_relative_eq!(product.to_f64(), 2f64.powi(64));

        let sum = Coeff::from_f64(0.1).add(Coeff::from_f64(0.2));
        assert_relative_eq!(sum.to_f64(), 0.3, max_relative = 1e-12);
    }

    #[test]
    fn coefficient_nodes() {
        assert_eq!(Coeff::integer(-3).to_node(), AstNode::num(-3.0));
        assert_eq!(
            Coeff::ratio(-1, 2).unwrap().to_node(),
            AstNode::div(AstNode::num(-1.0), AstNode::num(2.0)),
        );
    }

    #[test]
    fn factorials() {
        assert_eq!(factorial(0), Some(1));
        assert_eq!(factorial(5), Some(120));
        assert_eq!(factorial(21), None);
    }
}
