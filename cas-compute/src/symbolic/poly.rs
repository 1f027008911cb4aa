//! Views of expressions as polynomials in one variable.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::numerical::try_numeric;
use super::{coeff::Coeff, term::{build_sum, sum_terms, Term}};

/// The highest degree a polynomial is allowed to have.
pub const MAX_DEGREE: usize = 64;

/// Returns the degree of a single factor in the given variable, or [`None`] if the factor is not
/// a non-negative integer power of the variable and still depends on it.
fn factor_degree(factor: &AstNode, var: &str) -> Option<usize> {
    if !factor.contains_variable(var) {
        return Some(0);
    }
    if factor.as_variable() == Some(var) {
        return Some(1);
    }

    let (base, exp) = factor.as_op(BinOpKind::Exp)?;
    let n = exp.as_number()?;
    (base.as_variable() == Some(var) && n.fract() == 0.0 && (0.0..=MAX_DEGREE as f64).contains(&n))
        .then_some(n as usize)
}

/// Adds up terms with the same factors, dropping the ones that cancel out.
fn combine(terms: Vec<Term>) -> AstNode {
    let mut out: Vec<Term> = Vec::with_capacity(terms.len());
    for term in terms {
        match out.iter_mut().find(|existing| existing.has_same_factors(&term)) {
            Some(existing) => existing.coeff = existing.coeff.add(term.coeff),
            None => out.push(term),
        }
    }
    out.retain(|term| !term.coeff.is_zero());
    build_sum(&out)
}

/// Returns the coefficients of the expression as a polynomial in the given variable, lowest
/// degree first. The coefficients may contain other variables.
///
/// Products of sums are not expanded, so `(x + 1)^2` is not recognized; expand the expression
/// first. Returns [`None`] if the expression is not a polynomial in the variable, or its degree
/// is above [`MAX_DEGREE`].
///
/// The returned list always has at least one element, and its last element is non-zero unless
/// the polynomial is zero.
pub fn coefficients(node: &AstNode, var: &str) -> Option<Vec<AstNode>> {
    let mut by_degree: Vec<Vec<Term>> = vec![Vec::new()];
    for term in sum_terms(node)? {
        if term.den.iter().any(|factor| factor.contains_variable(var)) {
            return None;
        }

        let mut degree = 0;
        let mut rest = Vec::with_capacity(term.num.len());
        for factor in &term.num {
            match factor_degree(factor, var)? {
                0 => rest.push(factor.clone()),
                n => degree += n,
            }
        }
        if degree > MAX_DEGREE {
            return None;
        }

        if by_degree.len() <= degree {
            by_degree.resize_with(degree + 1, Vec::new);
        }
        by_degree[degree].push(Term { coeff: term.coeff, num: rest, den: term.den });
    }

    let mut coeffs = by_degree.into_iter().map(combine).collect::<Vec<_>>();
    while coeffs.len() > 1 && coeffs.last().is_some_and(AstNode::is_zero) {
        coeffs.pop();
    }
    Some(coeffs)
}

/// Returns the numeric values of the coefficients, or [`None`] if any of them contains a free
/// variable.
pub fn numeric(coeffs: &[AstNode]) -> Option<Vec<f64>> {
    coeffs.iter().map(try_numeric).collect()
}

/// Why an expression could not be expanded into a polynomial with numeric coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandError {
    /// The expression is not a polynomial in the variable, or one of its coefficients is not a
    /// number.
    NotPolynomial,

    /// The expression is a polynomial, but its degree is above [`MAX_DEGREE`].
    DegreeTooHigh,
}

/// Multiplies two polynomials.
fn multiply(lhs: &[f64], rhs: &[f64]) -> Result<Vec<f64>, ExpandError> {
    let degree = (lhs.len() - 1) + (rhs.len() - 1);
    if degree > MAX_DEGREE {
        return Err(ExpandError::DegreeTooHigh);
    }

    let mut out = vec![0.0; degree + 1];
    for (i, a) in lhs.iter().enumerate() {
        for (j, b) in rhs.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    Ok(out)
}

/// Adds two polynomials, scaling the right-hand side by `sign`.
fn add(lhs: Vec<f64>, rhs: &[f64], sign: f64) -> Vec<f64> {
    let mut out = lhs;
    if out.len() < rhs.len() {
        out.resize(rhs.len(), 0.0);
    }
    out.iter_mut().zip(rhs).for_each(|(a, b)| *a += sign * b);
    out
}

/// Expands the expression into a polynomial in the given variable with numeric coefficients,
/// lowest degree first, multiplying out products and integer powers of sums.
///
/// Unlike [`coefficients`], this accepts unexpanded forms like `(x + 1)^10`, but every
/// coefficient must evaluate to a number. Trailing zero coefficients are removed.
pub fn expand_numeric(node: &AstNode, var: &str) -> Result<Vec<f64>, ExpandError> {
    let mut coeffs = expand(node, var)?;
    while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
        coeffs.pop();
    }
    Ok(coeffs)
}

fn expand(node: &AstNode, var: &str) -> Result<Vec<f64>, ExpandError> {
    if !node.contains_variable(var) {
        return try_numeric(node)
            .filter(|n| n.is_finite())
            .map(|n| vec![n])
            .ok_or(ExpandError::NotPolynomial);
    }

    match node {
        AstNode::Variable(_) => Ok(vec![0.0, 1.0]),
        AstNode::Operator(BinOpKind::Add, lhs, rhs) => Ok(add(expand(lhs, var)?, &expand(rhs, var)?, 1.0)),
        AstNode::Operator(BinOpKind::Sub, lhs, rhs) => Ok(add(expand(lhs, var)?, &expand(rhs, var)?, -1.0)),
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) => multiply(&expand(lhs, var)?, &expand(rhs, var)?),
        AstNode::Operator(BinOpKind::Div, lhs, rhs) if !rhs.contains_variable(var) => {
            let divisor = try_numeric(rhs)
                .filter(|d| *d != 0.0 && d.is_finite())
                .ok_or(ExpandError::NotPolynomial)?;
            Ok(expand(lhs, var)?.into_iter().map(|c| c / divisor).collect())
        },
        AstNode::Operator(BinOpKind::Exp, base, exp) if !exp.contains_variable(var) => {
            let n = try_numeric(exp)
                .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                .ok_or(ExpandError::NotPolynomial)?;
            let base = expand(base, var)?;
            let base_degree = match base.iter().rposition(|c| *c != 0.0) {
                Some(0) | None => return Ok(vec![base[0].powf(n)]),
                Some(degree) => degree,
            };
            if base_degree as f64 * n > MAX_DEGREE as f64 {
                return Err(ExpandError::DegreeTooHigh);
            }

            (0..n as usize).try_fold(vec![1.0], |acc, _| multiply(&acc, &base[..=base_degree]))
        },
        _ => Err(ExpandError::NotPolynomial),
    }
}

/// Evaluates the polynomial with the given coefficients (lowest degree first) using Horner's
/// method.
pub fn eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Evaluates the polynomial with the absolute values of the given coefficients at `|x|`. This
/// bounds the magnitude of the terms summed when evaluating the polynomial at `x`.
pub fn eval_abs(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x.abs() + c.abs())
}

/// Returns the coefficients of the derivative of the polynomial.
pub fn derivative(coeffs: &[f64]) -> Vec<f64> {
    coeffs.iter()
        .enumerate()
        .skip(1)
        .map(|(n, c)| n as f64 * c)
        .collect()
}

/// Builds the polynomial `coeffs[0] + coeffs[1]*x + ...` in the given variable, highest degree
/// first, leaving out zero coefficients.
pub fn to_node(coeffs: &[f64], var: &str) -> AstNode {
    let terms = coeffs.iter()
        .enumerate()
        .rev()
        .filter(|(_, c)| **c != 0.0)
        .map(|(n, c)| {
            let num = match n {
                0 => Vec::new(),
                1 => vec![AstNode::var(var)],
                n => vec![AstNode::pow(AstNode::var(var), AstNode::num(n as f64))],
            };
            Term { coeff: Coeff::from_f64(*c), num, den: Vec::new() }
        })
        .collect::<Vec<_>>();
    build_sum(&terms)
}

#[cfg(test)]
mod tests {
    use cas_parser::parse_expression;
    use pretty_assertions::assert_eq;
    use super::*;

    fn coeffs_of(source: &str) -> Option<Vec<String>> {
        let node = parse_expression(source).ast.unwrap();
        coefficients(&node, "x").map(|coeffs| coeffs.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn quadratic() {
        assert_eq!(coeffs_of("x^2 - 5x + 6"), Some(vec!["6".into(), "-5".into(), "1".into()]));
        assert_eq!(coeffs_of("3x*x - x^2"), Some(vec!["0".into(), "0".into(), "2".into()]));
    }

    #[test]
    fn symbolic_coefficients() {
        assert_eq!(coeffs_of("a*x + b - x"), Some(vec!["b".into(), "a - 1".into()]));
        assert_eq!(coeffs_of("x/y + 2"), Some(vec!["2".into(), "1/y".into()]));
    }

    #[test]
    fn not_polynomials() {
        assert_eq!(coeffs_of("sin(x) + 1"), None);
        assert_eq!(coeffs_of("1/x"), None);
        assert_eq!(coeffs_of("x^0.5"), None);
        assert_eq!(coeffs_of("(x + 1)^2"), None);
        assert_eq!(coeffs_of("x^65"), None);
    }

    #[test]
    fn cancelled_leading_term() {
        assert_eq!(coeffs_of("x^2 + 3 - x^2"), Some(vec!["3".into()]));
    }

    fn expanded(source: &str) -> Result<Vec<f64>, ExpandError> {
        let node = parse_expression(source).ast.unwrap();
        expand_numeric(&node, "x")
    }

    #[test]
    fn expand_powers_of_sums() {
        assert_eq!(expanded("(x + 1)^3"), Ok(vec![1.0, 3.0, 3.0, 1.0]));
        assert_eq!(expanded("(x - 2)^7 / 2").map(|c| c.len()), Ok(8));
        assert_eq!(expanded("(x + 1)^10").map(|c| c[5]), Ok(252.0));
        assert_eq!(expanded("2(x + 1)(x - 1) - 2x^2"), Ok(vec![-2.0]));
    }

    #[test]
    fn expand_rejects() {
        assert_eq!(expanded("x^65"), Err(ExpandError::DegreeTooHigh));
        assert_eq!(expanded("(x^2 + 1)^40"), Err(ExpandError::DegreeTooHigh));
        assert_eq!(expanded("(x + a)^10"), Err(ExpandError::NotPolynomial));
        assert_eq!(expanded("sin(x)^2"), Err(ExpandError::NotPolynomial));
        assert_eq!(expanded("x^2.5"), Err(ExpandError::NotPolynomial));
        assert_eq!(expanded("1/(x + 1)"), Err(ExpandError::NotPolynomial));
    }

    #[test]
    fn horner() {
        let coeffs = [6.0, -5.0, 1.0];
        assert_eq!(eval(&coeffs, 2.0), 0.0);
        assert_eq!(eval(&coeffs, 0.0), 6.0);
        assert_eq!(eval_abs(&coeffs, -2.0), 20.0);
        assert_eq!(derivative(&coeffs), vec![-5.0, 2.0]);
        assert_eq!(to_node(&coeffs, "x").to_string(), "x^2 - 5*x + 6");
    }
}
