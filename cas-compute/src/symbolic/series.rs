//! Taylor series expansion.
//!
//! The n-th coefficient of the expansion of `f` around `c` is `f^(n)(c)/n!`. The derivatives are
//! taken symbolically and simplified after each differentiation, then evaluated at the center.
//! The remainder and convergence radius are estimates, not rigorous bounds: the remainder is the
//! first omitted term, and the radius comes from the ratio of the last two non-zero
//! coefficients.

use cas_parser::parser::ast::AstNode;
use crate::numerical::eval_at;
use super::{
    coeff::{factorial, Coeff},
    derivative::derivative,
    error::Error,
    simplify::{simplify_with_steps, SimplifyOptions},
    solve::numeric::round_near_integer,
    step::{Operation, Rule, Step},
    step_collector::StepCollector,
    term::{build_sum, Term},
};
use tracing::debug;

/// The Taylor expansion of an expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// The non-zero terms of the expansion, lowest degree first.
    pub terms: Vec<AstNode>,

    /// The coefficients of the expansion. `coefficients[n]` is `f^(n)(c)/n!`, including the
    /// zero ones.
    pub coefficients: Vec<f64>,

    /// The first omitted term, `f^(order + 1)(c)/(order + 1)! * (x - c)^(order + 1)`.
    pub remainder: AstNode,

    /// The estimated radius of convergence. Infinite if fewer than two non-zero coefficients
    /// were found, or if the derivative after the last term is identically zero.
    pub convergence_radius: f64,

    /// The sum of the terms.
    pub polynomial: AstNode,
}

/// Builds the coefficient `value / n!`, which is exact if `value` is an integer and `n!` fits in
/// an `i64`.
fn taylor_coeff(value: f64, n: u32) -> Coeff {
    let exact = (value.fract() == 0.0 && value.abs() < 9.0e15)
        .then(|| factorial(n))
        .flatten()
        .and_then(|denom| Coeff::ratio(value as i64, denom));
    exact.unwrap_or_else(|| Coeff::from_f64(value / (1..=n).map(f64::from).product::<f64>()))
}

/// Builds `(x - c)^n`, written as `x^n` if the center is zero.
fn shifted_power(var: &str, center: f64, n: u32) -> Vec<AstNode> {
    let base = if center == 0.0 {
        AstNode::var(var)
    } else if center < 0.0 {
        AstNode::add(AstNode::var(var), AstNode::num(-center))
    } else {
        AstNode::sub(AstNode::var(var), AstNode::num(center))
    };

    match n {
        0 => Vec::new(),
        1 => vec![base],
        n => vec![AstNode::pow(base, AstNode::num(f64::from(n)))],
    }
}

/// Computes the Taylor expansion of the expression in the given variable around `center`, up to
/// and including the term of degree `order`.
///
/// Returns [`Err`] if a derivative cannot be computed, or cannot be evaluated at the center.
pub fn taylor(
    node: &AstNode,
    var: &str,
    center: f64,
    order: u32,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Series, Error> {
    let mut current = simplify_with_steps(node, options, step_collector);
    let mut coeffs = Vec::with_capacity(order as usize + 1);
    let mut terms = Vec::new();
    let mut remainder = AstNode::num(0.0);

    for n in 0..=order + 1 {
        if n > 0 {
            let raw = derivative(&current, var, step_collector)?;
            current = simplify_with_steps(&raw, options, step_collector);
        }

        let value = round_near_integer(eval_at(&current, var, center)?);
        let coeff = taylor_coeff(value, n);
        let term = Term { coeff, num: shifted_power(var, center, n), den: Vec::new() }.to_node();
        debug!(n, derivative = %current, %term, "taylor term");

        if n > order {
            step_collector.push(Step::new(Operation::Expand, Rule::TaylorRemainder, &current, &term));
            remainder = term;
            break;
        }

        coeffs.push(coeff);
        if !coeff.is_zero() {
            step_collector.push(Step::new(Operation::Expand, Rule::TaylorTerm, &current, &term));
            terms.push(term);
        }
    }

    let nonzero = coeffs.iter()
        .enumerate()
        .filter(|(_, coeff)| !coeff.is_zero())
        .map(|(n, coeff)| (n, coeff.to_f64()))
        .collect::<Vec<_>>();
    let convergence_radius = match nonzero.as_slice() {
        _ if current.is_zero() => f64::INFINITY,
        [.., (k, c_k), (m, c_m)] => (c_k / c_m).abs().powf(1.0 / (m - k) as f64),
        _ => f64::INFINITY,
    };

    let polynomial_terms = coeffs.iter()
        .enumerate()
        .filter(|(_, coeff)| !coeff.is_zero())
        .map(|(n, coeff)| Term { coeff: *coeff, num: shifted_power(var, center, n as u32), den: Vec::new() })
        .collect::<Vec<_>>();

    Ok(Series {
        terms,
        coefficients: coeffs.into_iter().map(Coeff::to_f64).collect(),
        remainder,
        convergence_radius,
        polynomial: build_sum(&polynomial_terms),
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use cas_parser::parse_expression;
    use crate::numerical::error::kind::UndefinedFunction;
    use pretty_assertions::assert_eq;
    use super::*;

    fn expand(source: &str, center: f64, order: u32) -> Result<Series, Error> {
        let node = parse_expression(source).ast.unwrap();
        taylor(&node, "x", center, order, &SimplifyOptions::default(), &mut ())
    }

    fn strings(nodes: &[AstNode]) -> Vec<String> {
        nodes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn sine() {
        let series = expand("sin(x)", 0.0, 5).unwrap();
        assert_eq!(strings(&series.terms), vec!["x", "-x^3/6", "x^5/120"]);
        assert_eq!(series.polynomial.to_string(), "x - x^3/6 + x^5/120");
        assert_eq!(series.coefficients.len(), 6);
        assert_eq!(series.coefficients[0], 0.0);
        assert_eq!(series.remainder, AstNode::num(0.0));
        assert_float_absolute_eq!(series.convergence_radius, 20f64.sqrt(), 1e-9);
    }

    #[test]
    fn exponential() {
        let series = expand("exp(x)", 0.0, 4).unwrap();
        assert_eq!(strings(&series.terms), vec!["1", "x", "x^2/2", "x^3/6", "x^4/24"]);
        assert_eq!(series.remainder.to_string(), "x^5/120");
    }

    #[test]
    fn geometric_series_radius() {
        let series = expand("1/(1 - x)", 0.0, 6).unwrap();
        assert!(series.coefficients.iter().all(|c| *c == 1.0));
        assert_float_absolute_eq!(series.convergence_radius, 1.0, 1e-9);
    }

    #[test]
    fn polynomial_has_infinite_radius() {
        let series = expand("x^2 + 1", 0.0, 4).unwrap();
        assert_eq!(strings(&series.terms), vec!["1", "x^2"]);
        assert!(series.convergence_radius.is_infinite());
    }

    #[test]
    fn shifted_center() {
        let series = expand("x^2", 1.0, 2).unwrap();
        assert_eq!(strings(&series.terms), vec!["1", "2*(x - 1)", "(x - 1)^2"]);
        let series = expand("x^2", -2.0, 1).unwrap();
        assert_eq!(strings(&series.terms), vec!["4", "-4*(x + 2)"]);
    }

    #[test]
    fn pole_at_center_is_an_error() {
        assert!(expand("ln(x)", 0.0, 3).is_err());
    }

    #[test]
    fn unknown_function_is_an_error() {
        let err = expand("gamma(x)", 1.0, 2).unwrap_err();
        assert!(err.is::<UndefinedFunction>());
    }
}
