//! Symbolic differentiation.
//!
//! [`derivative`] walks the tree top-down, choosing a differentiation rule for each node. The
//! output is built with a little local cleanup (multiplying by zero or one, adding zero), but is
//! otherwise left for the simplifier; [`nth_derivative`] simplifies once all orders are taken.

mod function;

pub use function::DIFFERENTIABLE;

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::numerical::func::similar_names;
use super::{
    error::{kind::UnsupportedOperation, Error},
    simplify::{rules::negated, simplify_with_steps, SimplifyOptions},
    step::{Operation, Rule, Step},
    step_collector::StepCollector,
    term::build_product,
};
use tracing::debug;

/// Returns `true` if the given node is "clearly" zero. This is intended to clean up trees and is
/// not mathematically rigorous.
fn is_trivially_zero(node: &AstNode) -> bool {
    match node {
        AstNode::Number(n) => *n == 0.0,
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) => is_trivially_zero(lhs) || is_trivially_zero(rhs),
        AstNode::Operator(BinOpKind::Div, lhs, rhs) => is_trivially_zero(lhs) && !is_trivially_zero(rhs),
        AstNode::Operator(BinOpKind::Exp, base, exp) => {
            is_trivially_zero(base) && exp.as_number().is_some_and(|n| n > 0.0)
        },
        _ => false,
    }
}

/// Helper struct to build a product of nodes while applying basic simplification rules. If any
/// of the nodes are zero, the product is reduced to zero. Numeric factors are folded into a
/// single leading coefficient.
struct MultBuilder {
    coeff: f64,
    factors: Vec<AstNode>,
}

impl Default for MultBuilder {
    fn default() -> Self {
        Self { coeff: 1.0, factors: Vec::new() }
    }
}

impl MultBuilder {
    fn mult(&mut self, node: AstNode) {
        match node {
            AstNode::Number(n) => self.coeff *= n,
            AstNode::Operator(BinOpKind::Mul, lhs, rhs) => {
                self.mult(*lhs);
                self.mult(*rhs);
            },
            node if is_trivially_zero(&node) => self.coeff = 0.0,
            node => self.factors.push(node),
        }
    }

    fn build(self) -> AstNode {
        if self.coeff == 0.0 {
            return AstNode::num(0.0);
        }
        if self.factors.is_empty() {
            return AstNode::num(self.coeff);
        }

        let rest = build_product(self.factors);
        if self.coeff == 1.0 {
            rest
        } else if self.coeff == -1.0 {
            AstNode::neg(rest)
        } else {
            AstNode::mul(AstNode::num(self.coeff), rest)
        }
    }
}

/// Builds the product of the given nodes with a [`MultBuilder`].
fn product(factors: impl IntoIterator<Item = AstNode>) -> AstNode {
    let mut builder = MultBuilder::default();
    factors.into_iter().for_each(|factor| builder.mult(factor));
    builder.build()
}

/// Helper struct to build a sum of nodes while applying basic simplification rules. Only
/// non-zero nodes are added to the sum, and a node with a leading negative coefficient is
/// subtracted instead.
#[derive(Default)]
struct SumBuilder(Vec<(bool, AstNode)>);

impl SumBuilder {
    fn add(&mut self, node: AstNode) {
        if is_trivially_zero(&node) {
            return;
        }
        match negated(&node) {
            Some(positive) => self.0.push((true, positive)),
            None => self.0.push((false, node)),
        }
    }

    fn sub(&mut self, node: AstNode) {
        if is_trivially_zero(&node) {
            return;
        }
        match negated(&node) {
            Some(positive) => self.0.push((false, positive)),
            None => self.0.push((true, node)),
        }
    }

    fn build(self) -> AstNode {
        let mut terms = self.0.into_iter();
        let Some((negative, first)) = terms.next() else {
            return AstNode::num(0.0);
        };
        let first = if negative { product([AstNode::num(-1.0), first]) } else { first };
        terms.fold(first, |acc, (negative, term)| {
            if negative {
                AstNode::sub(acc, term)
            } else {
                AstNode::add(acc, term)
            }
        })
    }
}

/// Creates the error for a node that cannot be differentiated.
fn unsupported(symbol: &str, suggestions: Vec<String>) -> Error {
    Error::new(Vec::new(), UnsupportedOperation {
        operation: "differentiate",
        symbol: symbol.to_owned(),
        suggestions,
    })
}

/// `(f + g)' = f' + g'`, `(f - g)' = f' - g'`
fn sum_rule(lhs: &AstNode, rhs: &AstNode, subtract: bool, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<AstNode, Error> {
    let mut sum = SumBuilder::default();
    sum.add(derivative(lhs, var, step_collector)?);
    let rhs = derivative(rhs, var, step_collector)?;
    if subtract {
        sum.sub(rhs);
    } else {
        sum.add(rhs);
    }
    Ok(sum.build())
}

/// `(f * g)' = f' * g + f * g'`
///
/// If one of the factors does not depend on the variable, it is kept as a constant factor.
fn product_rule(lhs: &AstNode, rhs: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<(AstNode, Rule), Error> {
    if !lhs.contains_variable(var) {
        return Ok((product([lhs.clone(), derivative(rhs, var, step_collector)?]), Rule::ConstantRule));
    }
    if !rhs.contains_variable(var) {
        return Ok((product([derivative(lhs, var, step_collector)?, rhs.clone()]), Rule::ConstantRule));
    }

    let mut sum = SumBuilder::default();
    sum.add(product([derivative(lhs, var, step_collector)?, rhs.clone()]));
    sum.add(product([lhs.clone(), derivative(rhs, var, step_collector)?]));
    Ok((sum.build(), Rule::ProductRule))
}

/// `(f / g)' = (f' * g - f * g') / g^2`
///
/// If the denominator does not depend on the variable, this is `f' / g`.
fn quotient_rule(num: &AstNode, den: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<AstNode, Error> {
    let num_prime = derivative(num, var, step_collector)?;
    if !den.contains_variable(var) {
        if is_trivially_zero(&num_prime) {
            return Ok(AstNode::num(0.0));
        }
        return Ok(AstNode::div(num_prime, den.clone()));
    }

    let mut top = SumBuilder::default();
    top.add(product([num_prime, den.clone()]));
    top.sub(product([num.clone(), derivative(den, var, step_collector)?]));
    let top = top.build();
    if is_trivially_zero(&top) {
        return Ok(AstNode::num(0.0));
    }
    Ok(AstNode::div(top, AstNode::pow(den.clone(), AstNode::num(2.0))))
}

/// Differentiates `base ^ exp`, choosing between the power rule, the exponential rule, and the
/// generalized power rule depending on where the variable appears.
fn power_rule(base: &AstNode, exp: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<(AstNode, Rule), Error> {
    match (base.contains_variable(var), exp.contains_variable(var)) {
        // (u^n)' = n*u^(n - 1)*u'
        (true, false) => {
            let lowered = match exp.as_number() {
                Some(n) if n - 1.0 == 0.0 => AstNode::num(1.0),
                Some(n) if n - 1.0 == 1.0 => base.clone(),
                Some(n) => AstNode::pow(base.clone(), AstNode::num(n - 1.0)),
                None => AstNode::pow(base.clone(), AstNode::sub(exp.clone(), AstNode::num(1.0))),
            };
            let out = product([exp.clone(), lowered, derivative(base, var, step_collector)?]);
            Ok((out, Rule::PowerRule))
        },

        // (a^u)' = a^u*ln(a)*u'
        (false, true) => {
            let exp_prime = derivative(exp, var, step_collector)?;
            let out = if base.as_variable() == Some("e") {
                product([AstNode::pow(base.clone(), exp.clone()), exp_prime])
            } else {
                product([
                    AstNode::pow(base.clone(), exp.clone()),
                    AstNode::call1("ln", base.clone()),
                    exp_prime,
                ])
            };
            Ok((out, Rule::ExponentialRule))
        },

        // (f^g)' = f^g*(g'*ln(f) + g*f'/f)
        _ => {
            let mut inner = SumBuilder::default();
            inner.add(product([derivative(exp, var, step_collector)?, AstNode::call1("ln", base.clone())]));
            inner.add(product([
                exp.clone(),
                AstNode::div(derivative(base, var, step_collector)?, base.clone()),
            ]));
            let out = product([AstNode::pow(base.clone(), exp.clone()), inner.build()]);
            Ok((out, Rule::GeneralPowerRule))
        },
    }
}

/// Differentiates a function call with the chain rule, `f(u)' = f'(u) * u'`.
fn chain_rule(name: &str, args: &[AstNode], var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<(AstNode, Rule), Error> {
    // d/dx integral(f(x), x) = f(x)
    if let ("integral", [integrand, AstNode::Variable(with)]) = (name, args) {
        if with == var {
            return Ok((integrand.clone(), Rule::FundamentalTheorem));
        }
    }

    let [arg] = args else {
        return Err(unsupported(name, Vec::new()));
    };
    let outer = function::outer_derivative(name, arg)
        .ok_or_else(|| unsupported(name, similar_names(name, DIFFERENTIABLE)))?;
    Ok((product([outer, derivative(arg, var, step_collector)?]), Rule::ChainRule))
}

/// Computes the derivative of the given expression with respect to the given variable.
///
/// Every rule applied to an operator or function call is recorded in the step collector; the
/// derivatives of numbers and variables are not. The output is not simplified.
///
/// Returns [`Err`] with an [`UnsupportedOperation`] error if the expression contains an equation
/// or a call to a function with no known derivative.
pub fn derivative(node: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Result<AstNode, Error> {
    let (out, rule) = match node {
        AstNode::Number(_) => return Ok(AstNode::num(0.0)),
        AstNode::Variable(name) => return Ok(AstNode::num(if name == var { 1.0 } else { 0.0 })),
        AstNode::Equation(..) => return Err(unsupported("=", Vec::new())),
        _ if !node.contains_variable(var) && !contains_equation(node) => (AstNode::num(0.0), Rule::ConstantRule),
        AstNode::Operator(BinOpKind::Add, lhs, rhs) => (sum_rule(lhs, rhs, false, var, step_collector)?, Rule::SumRule),
        AstNode::Operator(BinOpKind::Sub, lhs, rhs) => (sum_rule(lhs, rhs, true, var, step_collector)?, Rule::DifferenceRule),
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) => product_rule(lhs, rhs, var, step_collector)?,
        AstNode::Operator(BinOpKind::Div, num, den) => (quotient_rule(num, den, var, step_collector)?, Rule::QuotientRule),
        AstNode::Operator(BinOpKind::Exp, base, exp) => power_rule(base, exp, var, step_collector)?,
        AstNode::Function(name, args) => chain_rule(name, args, var, step_collector)?,
    };

    step_collector.push(Step::new(Operation::Differentiate, rule, node, &out));
    Ok(out)
}

/// Returns true if an equation appears anywhere in the tree.
fn contains_equation(node: &AstNode) -> bool {
    matches!(node, AstNode::Equation(..)) || node.children().into_iter().any(contains_equation)
}

/// Computes the derivative of the given order by differentiating `order` times, then simplifying
/// the result once. An order of zero returns the simplified expression.
pub fn nth_derivative(
    node: &AstNode,
    var: &str,
    order: u32,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<AstNode, Error> {
    let mut current = node.clone();
    for n in 1..=order {
        current = derivative(&current, var, step_collector)?;
        debug!(order = n, derivative = %current, "differentiated");
    }
    Ok(simplify_with_steps(&current, options, step_collector))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cas_parser::parse_expression;
    use crate::numerical::eval_at;
    use crate::symbolic::simplify::simplify;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstNode {
        parse_expression(source).ast.unwrap()
    }

    fn simplified_derivative(source: &str) -> String {
        let raw = derivative(&parse(source), "x", &mut ()).unwrap();
        simplify(&raw).to_string()
    }

    /// Performs a central finite difference to approximate the derivative of the provided
    /// expression.
    fn finite_difference(node: &AstNode, x: f64) -> f64 {
        const DX: f64 = 1e-5;
        (eval_at(node, "x", x + DX).unwrap() - eval_at(node, "x", x - DX).unwrap()) / (2.0 * DX)
    }

    fn test_for_function(function: &'static str, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 1e-4;

        let node = parse(function);
        let symbolic = derivative(&node, "x", &mut ())
            .unwrap_or_else(|err| panic!("derivative for \"{function}\" failed: {err}"));

        for point in points {
            let symbolically_computed = eval_at(&symbolic, "x", point).unwrap();
            let numerically_computed = finite_difference(&node, point);

            assert_relative_eq!(symbolically_computed, numerically_computed, epsilon = TOL, max_relative = TOL);
        }
    }

    #[test]
    fn power_rule() {
        test_for_function("x^2 + x + 1", [0., 1., 2., 5., 8.]);
        test_for_function("3x^5 - 2/x", [0.5, 1., 2.]);
        assert_eq!(simplified_derivative("x^3"), "3*x^2");
    }

    #[test]
    fn product_and_quotient() {
        assert_eq!(simplified_derivative("x*sin(x)"), "sin(x) + x*cos(x)");
        test_for_function("x^2*exp(x)", [-1., 0., 1.5]);
        test_for_function("sin(x)/(x^2 + 1)", [-2., 0., 3.]);
        test_for_function("(x + 1)/3", [0., 4.]);
    }

    #[test]
    fn chain_rule() {
        test_for_function("sin(3x^2)", [0., 0.5, 1.]);
        test_for_function("ln(x^2 + 1)", [-1., 0., 2.]);
        test_for_function("sqrt(2x + 1) + cbrt(x)", [0.5, 2.]);
        test_for_function("atan(x) + asin(x/2) + tanh(x)", [-0.5, 0.3]);
        test_for_function("log(x) + sec(x) + cot(x)", [0.7, 1.2]);
    }

    #[test]
    fn exponentials() {
        test_for_function("2^x", [0., 1., 3.]);
        test_for_function("e^(2x)", [0., 0.5]);
        test_for_function("x^x", [0.5, 1., 2.]);
    }

    #[test]
    fn linearity() {
        let (f, g) = (parse("x^3"), parse("sin(x)"));
        let combined = AstNode::add(
            AstNode::mul(AstNode::num(2.0), f.clone()),
            AstNode::mul(AstNode::num(5.0), g.clone()),
        );
        let lhs = derivative(&combined, "x", &mut ()).unwrap();
        let df = derivative(&f, "x", &mut ()).unwrap();
        let dg = derivative(&g, "x", &mut ()).unwrap();
        for x in [-1.0, 0.25, 2.0] {
            let expected = 2.0 * eval_at(&df, "x", x).unwrap() + 5.0 * eval_at(&dg, "x", x).unwrap();
            assert!((eval_at(&lhs, "x", x).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn other_variables_are_constant() {
        assert_eq!(simplified_derivative("y^2 + 3"), "0");
        assert_eq!(simplified_derivative("y*x"), "y");
    }

    #[test]
    fn higher_order() {
        let node = parse("x^4");
        let out = nth_derivative(&node, "x", 2, &SimplifyOptions::default(), &mut ()).unwrap();
        assert_eq!(out.to_string(), "12*x^2");
    }

    #[test]
    fn integral_of_variable() {
        assert_eq!(simplified_derivative("integral(cos(x), x)"), "cos(x)");
    }

    #[test]
    fn steps_for_compound_nodes() {
        let mut steps = Vec::new();
        derivative(&parse("x^2 + x"), "x", &mut steps).unwrap();
        let rules = steps.iter().map(|step| step.rule).collect::<Vec<_>>();
        assert_eq!(rules, vec![Rule::PowerRule, Rule::SumRule]);
        assert!(steps.iter().all(|step| step.operation == Operation::Differentiate));
    }

    #[test]
    fn unknown_function() {
        let err = derivative(&parse("gamma(x)"), "x", &mut ()).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedOperation>().unwrap();
        assert_eq!(kind.symbol, "gamma");
        assert!(err.to_string().contains("gamma"));

        let err = derivative(&parse("son(x)"), "x", &mut ()).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedOperation>().unwrap();
        assert_eq!(kind.suggestions[0], "sin");
    }

    #[test]
    fn equation_is_unsupported() {
        let err = derivative(&parse("x^2 = 4"), "x", &mut ()).unwrap_err();
        assert_eq!(err.downcast_ref::<UnsupportedOperation>().unwrap().symbol, "=");
    }
}
