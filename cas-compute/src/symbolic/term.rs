//! Views of expression trees as sums of terms and products of factors.
//!
//! [`AstNode`] trees are binary, so `a + b - c` is `(a + b) - c` and `2*x/y` is `(2*x)/y`. Many
//! rules need to see through this nesting to compare whole sums or products, which is what the
//! helpers in this module are for.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use super::coeff::Coeff;

/// A term of a sum, written as `coeff * num[0] * num[1] * ... / (den[0] * den[1] * ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    /// The numeric coefficient.
    pub coeff: Coeff,

    /// The non-numeric factors of the numerator.
    pub num: Vec<AstNode>,

    /// The non-numeric factors of the denominator.
    pub den: Vec<AstNode>,
}

impl Term {
    /// A term consisting only of a coefficient.
    pub fn constant(coeff: Coeff) -> Self {
        Self { coeff, num: Vec::new(), den: Vec::new() }
    }

    /// Decomposes a product / quotient into a term. Returns [`None`] if the expression divides by
    /// the number zero.
    pub fn from_node(node: &AstNode) -> Option<Self> {
        fn collect(node: &AstNode, numerator: bool, term: &mut Term) -> Option<()> {
            match node {
                AstNode::Operator(BinOpKind::Mul, lhs, rhs) => {
                    collect(lhs, numerator, term)?;
                    collect(rhs, numerator, term)
                },
                AstNode::Operator(BinOpKind::Div, lhs, rhs) => {
                    collect(lhs, numerator, term)?;
                    collect(rhs, !numerator, term)
                },
                AstNode::Number(n) if numerator => {
                    term.coeff = term.coeff.mul(Coeff::from_f64(*n));
                    Some(())
                },
                AstNode::Number(n) => {
                    term.coeff = term.coeff.div(Coeff::from_f64(*n))?;
                    Some(())
                },
                _ if numerator => {
                    term.num.push(node.clone());
                    Some(())
                },
                _ => {
                    term.den.push(node.clone());
                    Some(())
                },
            }
        }

        let mut term = Self::constant(Coeff::one());
        collect(node, true, &mut term)?;
        Some(term)
    }

    /// Returns true if the term has no factors besides its coefficient.
    pub fn is_constant(&self) -> bool {
        self.num.is_empty() && self.den.is_empty()
    }

    /// Returns true if both terms have the same factors, in any order.
    pub fn has_same_factors(&self, other: &Self) -> bool {
        same_multiset(&self.num, &other.num) && same_multiset(&self.den, &other.den)
    }

    /// Negates the coefficient of the term.
    pub fn neg(&self) -> Self {
        Self { coeff: self.coeff.neg(), ..self.clone() }
    }

    /// Builds the expression for this term.
    ///
    /// The coefficient is written first, and a fraction is only produced if there is something
    /// in the denominator: `(-1, [x], [])` becomes `-1*x`, and `(1/2, [x], [y])` becomes
    /// `x/(2*y)`.
    pub fn to_node(&self) -> AstNode {
        if self.coeff.is_zero() {
            return AstNode::num(0.0);
        }

        let (p, q) = self.coeff.numer_denom();
        let mut numer = Vec::with_capacity(self.num.len() + 1);
        if p != 1.0 || self.num.is_empty() {
            numer.push(AstNode::num(p));
        }
        numer.extend(self.num.iter().cloned());

        let mut denom = Vec::with_capacity(self.den.len() + 1);
        if q != 1.0 {
            denom.push(AstNode::num(q));
        }
        denom.extend(self.den.iter().cloned());

        let numer = build_product(numer);
        if denom.is_empty() {
            numer
        } else {
            AstNode::div(numer, build_product(denom))
        }
    }
}

/// Flattens a chain of additions and subtractions into its terms. Each term is paired with
/// `true` if it is added, or `false` if it is subtracted.
pub fn flatten_sum(node: &AstNode) -> Vec<(bool, &AstNode)> {
    fn collect<'a>(node: &'a AstNode, positive: bool, out: &mut Vec<(bool, &'a AstNode)>) {
        match node {
            AstNode::Operator(BinOpKind::Add, lhs, rhs) => {
                collect(lhs, positive, out);
                collect(rhs, positive, out);
            },
            AstNode::Operator(BinOpKind::Sub, lhs, rhs) => {
                collect(lhs, positive, out);
                collect(rhs, !positive, out);
            },
            _ => out.push((positive, node)),
        }
    }

    let mut out = Vec::new();
    collect(node, true, &mut out);
    out
}

/// Decomposes a sum into its terms, with subtracted terms negated. Returns [`None`] if any term
/// divides by the number zero.
pub fn sum_terms(node: &AstNode) -> Option<Vec<Term>> {
    flatten_sum(node)
        .into_iter()
        .map(|(positive, node)| {
            let term = Term::from_node(node)?;
            Some(if positive { term } else { term.neg() })
        })
        .collect()
}

/// Builds a sum from the given terms. Terms with a negative coefficient are subtracted, so the
/// terms `[x, -2*y]` become `x - 2*y`.
pub fn build_sum(terms: &[Term]) -> AstNode {
    let mut iter = terms.iter();
    let Some(first) = iter.next() else {
        return AstNode::num(0.0);
    };

    iter.fold(first.to_node(), |acc, term| {
        if term.coeff.is_negative() {
            AstNode::sub(acc, term.neg().to_node())
        } else {
            AstNode::add(acc, term.to_node())
        }
    })
}

/// Flattens a chain of multiplications into its factors. Divisions are not flattened.
pub fn flatten_product(node: &AstNode) -> Vec<&AstNode> {
    fn collect<'a>(node: &'a AstNode, out: &mut Vec<&'a AstNode>) {
        match node {
            AstNode::Operator(BinOpKind::Mul, lhs, rhs) => {
                collect(lhs, out);
                collect(rhs, out);
            },
            _ => out.push(node),
        }
    }

    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

/// Multiplies the given factors from left to right. An empty product is `1`.
pub fn build_product(factors: impl IntoIterator<Item = AstNode>) -> AstNode {
    factors.into_iter()
        .reduce(AstNode::mul)
        .unwrap_or(AstNode::num(1.0))
}

/// Splits a factor into its base and exponent. A factor that is not a power has exponent `1`.
pub fn as_power(node: &AstNode) -> (&AstNode, AstNode) {
    match node.as_op(BinOpKind::Exp) {
        Some((base, exp)) => (base, exp.clone()),
        None => (node, AstNode::num(1.0)),
    }
}

/// Returns true if both slices contain the same nodes, in any order.
pub fn same_multiset(a: &[AstNode], b: &[AstNode]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut used = vec![false; b.len()];
    a.iter().all(|x| {
        match b.iter().enumerate().position(|(i, y)| !used[i] && x == y) {
            Some(i) => {
                used[i] = true;
                true
            },
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use cas_parser::parse_expression;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstNode {
        parse_expression(source).ast.unwrap()
    }

    #[test]
    fn decompose_term() {
        let term = Term::from_node(&parse("2x*y/(4z)")).unwrap();
        assert_eq!(term.coeff, Coeff::ratio(1, 2).unwrap());
        assert_eq!(term.num, vec![AstNode::var("x"), AstNode::var("y")]);
        assert_eq!(term.den, vec![AstNode::var("z")]);
        assert_eq!(term.to_node().to_string(), "x*y/(2*z)");

        assert_eq!(Term::from_node(&parse("x/0")), None);
    }

    #[test]
    fn decompose_sum() {
        let terms = sum_terms(&parse("x - 2y + 3 - -z")).unwrap();
        let coeffs = terms.iter().map(|term| term.coeff.to_f64()).collect::<Vec<_>>();
        assert_eq!(coeffs, vec![1.0, -2.0, 3.0, 1.0]);
        assert_eq!(build_sum(&terms).to_string(), "x - 2*y + 3 + z");
    }

    #[test]
    fn multisets() {
        let (x, y) = (AstNode::var("x"), AstNode::var("y"));
        assert!(same_multiset(&[x.clone(), y.clone(), x.clone()], &[x.clone(), x.clone(), y.clone()]));
        assert!(!same_multiset(&[x.clone(), y.clone()], &[x.clone(), x.clone()]));
    }
}
