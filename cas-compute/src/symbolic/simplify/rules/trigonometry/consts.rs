//! Exact values taken by the trigonometric functions at the angles in the lookup tables.

use cas_parser::parser::ast::AstNode;
use crate::symbolic::{coeff::Coeff, term::Term};

/// An exact, non-negative value of a trigonometric function. The sign is stored separately in
/// the lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exact {
    /// `0`
    Zero,

    /// `1/2`
    Half,

    /// `sqrt(2)/2`
    HalfSqrt2,

    /// `sqrt(3)/2`
    HalfSqrt3,

    /// `sqrt(3)/3`
    ThirdSqrt3,

    /// `1`
    One,

    /// `sqrt(3)`
    Sqrt3,
}

impl Exact {
    /// Builds the expression for this value, negated if `neg` is true.
    pub fn to_node(self, neg: bool) -> AstNode {
        let sqrt = |n: f64| AstNode::call1("sqrt", AstNode::num(n));
        let (numer, denom, radical) = match self {
            Self::Zero => return AstNode::num(0.0),
            Self::Half => (1, 2, None),
            Self::HalfSqrt2 => (1, 2, Some(sqrt(2.0))),
            Self::HalfSqrt3 => (1, 2, Some(sqrt(3.0))),
            Self::ThirdSqrt3 => (1, 3, Some(sqrt(3.0))),
            Self::One => (1, 1, None),
            Self::Sqrt3 => (1, 1, Some(sqrt(3.0))),
        };
        let numer = if neg { -numer } else { numer };
        let coeff = Coeff::ratio(numer, denom).unwrap_or(Coeff::one());

        Term {
            coeff,
            num: radical.into_iter().collect(),
            den: Vec::new(),
        }.to_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_nodes() {
        assert_eq!(Exact::Half.to_node(false).to_string(), "1/2");
        assert_eq!(Exact::Half.to_node(true).to_string(), "-1/2");
        assert_eq!(Exact::HalfSqrt2.to_node(true).to_string(), "-sqrt(2)/2");
        assert_eq!(Exact::Sqrt3.to_node(true).to_string(), "-sqrt(3)");
        assert_eq!(Exact::Zero.to_node(true), AstNode::num(0.0));
    }
}
