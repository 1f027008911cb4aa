//! Symbolic integration.
//!
//! The integrator knows a fixed table of antiderivatives: constants, powers, reciprocals, sums,
//! constant multiples, and the elementary functions in [`function`], each also applied to linear
//! arguments `k*x + m`. Anything else is left as an unevaluated `integral(f, x)` call, which is
//! still a valid result.

mod function;

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::numerical::eval_at;
use super::{
    error::{kind::UnsupportedOperation, Error},
    poly,
    simplify::{simplify_with_steps, SimplifyOptions},
    step::{Operation, Rule, Step},
    step_collector::StepCollector,
    term::{build_product, flatten_product},
};
use tracing::debug;

/// The name of the function used for integrals that could not be evaluated.
pub const UNEVALUATED: &str = "integral";

/// Builds `integral(f, x)`.
fn unevaluated(node: &AstNode, var: &str) -> AstNode {
    AstNode::call(UNEVALUATED, vec![node.clone(), AstNode::var(var)])
}

/// If the argument is linear in the variable, `k*x + m` with `k` free of the variable, returns
/// the slope `k`.
fn linear_slope(arg: &AstNode, var: &str) -> Option<AstNode> {
    match poly::coefficients(arg, var)?.as_slice() {
        [_, slope] if !slope.is_zero() => Some(slope.clone()),
        _ => None,
    }
}

/// Divides the antiderivative by the slope of its argument, if the slope is not `1`.
fn divide_by_slope(node: AstNode, slope: &AstNode) -> (AstNode, bool) {
    if slope.is_one() {
        (node, false)
    } else {
        (AstNode::div(node, slope.clone()), true)
    }
}

/// `∫u^n dx = u^(n + 1)/((n + 1)*k)` for linear `u = k*x + m`, and `∫u^(-1) dx = ln(u)/k`.
fn power(base: &AstNode, n: f64, var: &str) -> Option<(AstNode, Rule)> {
    let slope = linear_slope(base, var)?;
    let (out, rule) = if n == -1.0 {
        (AstNode::call1("ln", base.clone()), Rule::IntegrateReciprocal)
    } else {
        let raised = AstNode::pow(base.clone(), AstNode::num(n + 1.0));
        (AstNode::div(raised, AstNode::num(n + 1.0)), Rule::IntegratePower)
    };
    let (out, substituted) = divide_by_slope(out, &slope);
    Some((out, if substituted { Rule::LinearSubstitution } else { rule }))
}

/// Integrates `base^exp` where the variable appears in exactly one of the operands.
fn exponent(base: &AstNode, exp: &AstNode, var: &str) -> Option<(AstNode, Rule)> {
    match (base.contains_variable(var), exp.contains_variable(var)) {
        // ∫sec(u)^2 dx = tan(u)/k
        (true, false) if exp.is_number(2.0) && base.as_call1("sec").is_some() => {
            let arg = base.as_call1("sec")?;
            let slope = linear_slope(arg, var)?;
            let (out, substituted) = divide_by_slope(AstNode::call1("tan", arg.clone()), &slope);
            Some((out, if substituted { Rule::LinearSubstitution } else { Rule::IntegrateFunction }))
        },
        (true, false) => power(base, exp.as_number()?, var),

        // ∫a^u dx = a^u/(ln(a)*k), ∫e^u dx = e^u/k
        (false, true) => {
            let slope = linear_slope(exp, var)?;
            let raised = AstNode::pow(base.clone(), exp.clone());
            let out = if base.as_variable() == Some("e") {
                raised
            } else {
                AstNode::div(raised, AstNode::call1("ln", base.clone()))
            };
            let (out, substituted) = divide_by_slope(out, &slope);
            Some((out, if substituted { Rule::LinearSubstitution } else { Rule::IntegrateFunction }))
        },
        _ => None,
    }
}

/// Integrates a quotient with a constant numerator or denominator.
fn quotient(
    num: &AstNode,
    den: &AstNode,
    var: &str,
    step_collector: &mut dyn StepCollector<Step>,
) -> Option<(AstNode, Rule)> {
    // ∫f/c dx = (∫f dx)/c
    if !den.contains_variable(var) {
        let inner = antiderivative(num, var, step_collector);
        return Some((AstNode::div(inner, den.clone()), Rule::ConstantMultiple));
    }
    if num.contains_variable(var) {
        return None;
    }

    // ∫c/f dx = c*∫1/f dx
    if !num.is_one() {
        let reciprocal = AstNode::div(AstNode::num(1.0), den.clone());
        let inner = antiderivative(&reciprocal, var, step_collector);
        return Some((AstNode::mul(num.clone(), inner), Rule::ConstantMultiple));
    }

    // ∫1/u^n dx = ∫u^(-n) dx
    match den.as_op(BinOpKind::Exp) {
        Some((base, exp)) => power(base, -exp.as_number()?, var),
        None => power(den, -1.0, var),
    }
}

/// Integrates a product by moving its constant factors outside of the integral.
fn product(node: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> Option<(AstNode, Rule)> {
    let (constant, dependent): (Vec<&AstNode>, Vec<&AstNode>) = flatten_product(node)
        .into_iter()
        .partition(|factor| !factor.contains_variable(var));
    if constant.is_empty() {
        return None;
    }

    let inner = build_product(dependent.into_iter().cloned());
    let inner = antiderivative(&inner, var, step_collector);
    let out = build_product(constant.into_iter().cloned().chain(std::iter::once(inner)));
    Some((out, Rule::ConstantMultiple))
}

/// Integrates a function call whose argument is linear in the variable.
fn call(name: &str, args: &[AstNode], var: &str) -> Option<(AstNode, Rule)> {
    let [arg] = args else {
        return None;
    };
    let slope = linear_slope(arg, var)?;
    let out = function::outer_antiderivative(name, arg)?;
    let (out, substituted) = divide_by_slope(out, &slope);
    Some((out, if substituted { Rule::LinearSubstitution } else { Rule::IntegrateFunction }))
}

/// Computes an antiderivative of the given expression with respect to the given variable,
/// without an integration constant and without simplifying the result.
///
/// If no rule applies to a part of the expression, that part is left as an unevaluated
/// `integral(f, x)` call. Every rule application is recorded in the step collector.
pub fn antiderivative(node: &AstNode, var: &str, step_collector: &mut dyn StepCollector<Step>) -> AstNode {
    let found = match node {
        _ if !node.contains_variable(var) => {
            let out = if node.is_one() {
                AstNode::var(var)
            } else {
                AstNode::mul(node.clone(), AstNode::var(var))
            };
            Some((out, Rule::IntegrateConstant))
        },
        AstNode::Variable(_) => Some((
            AstNode::div(AstNode::pow(node.clone(), AstNode::num(2.0)), AstNode::num(2.0)),
            Rule::IntegratePower,
        )),
        AstNode::Operator(kind @ (BinOpKind::Add | BinOpKind::Sub), lhs, rhs) => {
            let lhs = antiderivative(lhs, var, step_collector);
            let rhs = antiderivative(rhs, var, step_collector);
            Some((AstNode::op(*kind, lhs, rhs), Rule::IntegrateSum))
        },
        AstNode::Operator(BinOpKind::Mul, _, _) => product(node, var, step_collector),
        AstNode::Operator(BinOpKind::Div, num, den) => quotient(num, den, var, step_collector),
        AstNode::Operator(BinOpKind::Exp, base, exp) => exponent(base, exp, var),
        AstNode::Function(name, args) => call(name, args, var),
        AstNode::Number(_) | AstNode::Equation(..) => None,
    };

    let (out, rule) = found.unwrap_or_else(|| (unevaluated(node, var), Rule::Unevaluated));
    step_collector.push(Step::new(Operation::Integrate, rule, node, &out));
    out
}

/// Returns the name to use for the integration constant: `C`, or `C_1`, `C_2`, ... if `C` is
/// already used in the expression.
pub fn constant_name(node: &AstNode) -> String {
    let used = node.variables();
    std::iter::once("C".to_owned())
        .chain((1..).map(|n| format!("C_{}", n)))
        .find(|name| !used.contains(name))
        .unwrap_or_else(|| "C".to_owned())
}

/// Returns an error if the expression contains an equation, which cannot be integrated.
fn check_integrable(node: &AstNode) -> Result<(), Error> {
    fn contains_equation(node: &AstNode) -> bool {
        matches!(node, AstNode::Equation(..)) || node.children().into_iter().any(contains_equation)
    }

    if contains_equation(node) {
        return Err(Error::new(Vec::new(), UnsupportedOperation {
            operation: "integrate",
            symbol: "=".to_owned(),
            suggestions: Vec::new(),
        }));
    }
    Ok(())
}

/// Computes the indefinite integral of the expression, `F(x) + C`.
///
/// The integrand is simplified first, and the antiderivative is simplified before the constant
/// is added.
pub fn indefinite(
    node: &AstNode,
    var: &str,
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<AstNode, Error> {
    check_integrable(node)?;
    let integrand = simplify_with_steps(node, options, step_collector);
    let raw = antiderivative(&integrand, var, step_collector);
    let simplified = simplify_with_steps(&raw, options, step_collector);

    let out = AstNode::add(simplified.clone(), AstNode::var(constant_name(&simplified)));
    step_collector.push(Step::new(Operation::Integrate, Rule::IntegrationConstant, &simplified, &out));
    debug!(antiderivative = %out, "integrated");
    Ok(out)
}

/// Computes the definite integral of the expression between the given bounds.
///
/// Returns the result tree and its numeric value. If the integrand has no antiderivative in
/// closed form, the result is the unevaluated `integral(f, x, a, b)` call and the numeric value
/// is [`None`].
pub fn definite(
    node: &AstNode,
    var: &str,
    (a, b): (f64, f64),
    options: &SimplifyOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<(AstNode, Option<f64>), Error> {
    check_integrable(node)?;
    let integrand = simplify_with_steps(node, options, step_collector);
    let raw = antiderivative(&integrand, var, step_collector);
    let antiderivative = simplify_with_steps(&raw, options, step_collector);

    if antiderivative.contains_function(UNEVALUATED) {
        let out = AstNode::call(UNEVALUATED, vec![
            integrand.clone(),
            AstNode::var(var),
            AstNode::num(a),
            AstNode::num(b),
        ]);
        step_collector.push(
            Step::new(Operation::Integrate, Rule::Unevaluated, &antiderivative, &out)
                .with_explanation("No antiderivative was found, so the bounds cannot be evaluated."),
        );
        return Ok((out, None));
    }

    let value = eval_at(&antiderivative, var, b)? - eval_at(&antiderivative, var, a)?;
    let before = AstNode::sub(
        antiderivative.substitute(var, &AstNode::num(b)),
        antiderivative.substitute(var, &AstNode::num(a)),
    );
    let out = AstNode::num(value);
    step_collector.push(Step::new(Operation::Integrate, Rule::EvaluateBounds, &before, &out));
    debug!(value, "evaluated definite integral");
    Ok((out, Some(value)))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use cas_parser::parse_expression;
    use crate::symbolic::{derivative::derivative, simplify::simplify};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstNode {
        parse_expression(source).ast.unwrap()
    }

    fn integrate(source: &str) -> String {
        indefinite(&parse(source), "x", &SimplifyOptions::default(), &mut ()).unwrap().to_string()
    }

    /// Checks that the antiderivative differentiates back to the integrand, by comparing values
    /// at a few points.
    fn check_antiderivative(source: &str, points: impl IntoIterator<Item = f64>) {
        let node = simplify(&parse(source));
        let f = simplify(&antiderivative(&node, "x", &mut ()));
        assert!(!f.contains_function(UNEVALUATED), "no antiderivative for `{source}`: {f}");
        let df = derivative(&f, "x", &mut ()).unwrap();
        for x in points {
            assert_float_absolute_eq!(eval_at(&df, "x", x).unwrap(), eval_at(&node, "x", x).unwrap(), 1e-9);
        }
    }

    #[test]
    fn powers() {
        assert_eq!(integrate("3"), "3*x + C");
        assert_eq!(integrate("x"), "x^2/2 + C");
        assert_eq!(integrate("1/x"), "ln(x) + C");
        check_antiderivative("x^3 + 2x - 1", [-1.0, 0.5, 2.0]);
        check_antiderivative("x^(-2)", [0.5, 3.0]);
        check_antiderivative("3/x^2", [0.5, 3.0]);
        check_antiderivative("(2x + 1)^3", [0.0, 1.0]);
    }

    #[test]
    fn functions() {
        assert_eq!(integrate("cos(x)"), "sin(x) + C");
        check_antiderivative("sin(x) - 4cos(x)", [0.0, 1.0, 2.5]);
        check_antiderivative("exp(3x + 1)", [0.0, 0.5]);
        check_antiderivative("ln(x)", [0.5, 2.0]);
        check_antiderivative("sqrt(x) + tan(x)", [0.3, 1.0]);
        check_antiderivative("sec(2x)^2", [0.1, 0.4]);
        check_antiderivative("2^x + e^(5x)", [0.0, 1.0]);
        check_antiderivative("x/4 + cosh(x)", [0.0, 1.0]);
    }

    #[test]
    fn integral_of_derivative() {
        for source in ["x^3", "sin(2x) + x^2", "exp(x) + 5x", "ln(x)"] {
            let e = parse(source);
            let de = simplify(&derivative(&e, "x", &mut ()).unwrap());
            let f = simplify(&antiderivative(&de, "x", &mut ()));
            let offset = eval_at(&f, "x", 1.0).unwrap() - eval_at(&e, "x", 1.0).unwrap();
            for x in [0.5, 2.0, 3.0] {
                let diff = eval_at(&f, "x", x).unwrap() - eval_at(&e, "x", x).unwrap();
                assert_float_absolute_eq!(diff, offset, 1e-9);
            }
        }
    }

    #[test]
    fn unevaluated_fallback() {
        assert_eq!(integrate("sin(x^2)"), "integral(sin(x^2), x) + C");
        assert_eq!(integrate("x*sin(x)"), "integral(x*sin(x), x) + C");
    }

    #[test]
    fn fresh_constant() {
        assert_eq!(integrate("C"), "C*x + C_1");
    }

    #[test]
    fn definite_integrals() {
        let options = SimplifyOptions::default();
        let (out, value) = definite(&parse("x^2"), "x", (0.0, 3.0), &options, &mut ()).unwrap();
        assert_float_absolute_eq!(value.unwrap(), 9.0, 1e-9);
        assert_eq!(out, AstNode::num(value.unwrap()));

        let (out, value) = definite(&parse("sin(x^2)"), "x", (0.0, 1.0), &options, &mut ()).unwrap();
        assert_eq!(value, None);
        assert_eq!(out.to_string(), "integral(sin(x^2), x, 0, 1)");
    }

    #[test]
    fn definite_pole_is_an_error() {
        let options = SimplifyOptions::default();
        assert!(definite(&parse("1/x"), "x", (0.0, 1.0), &options, &mut ()).is_err());
    }

    #[test]
    fn equation_is_unsupported() {
        let err = indefinite(&parse("x = 1"), "x", &SimplifyOptions::default(), &mut ()).unwrap_err();
        assert_eq!(err.downcast_ref::<UnsupportedOperation>().unwrap().symbol, "=");
    }
}
