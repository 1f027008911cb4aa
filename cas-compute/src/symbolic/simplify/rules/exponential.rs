//! Simplification rules for powers, roots and the exponential function.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::symbolic::{
    simplify::{options::Domain, rules::{do_binary, do_call}},
    step::{Rule, Step},
    step_collector::StepCollector,
    term::{as_power, build_product, flatten_product},
};

/// Returns true if the node is the constant `e`.
fn is_euler(node: &AstNode) -> bool {
    node.as_variable() == Some("e")
}

/// Adds two exponents, folding them if both are numbers.
fn add_exponents(lhs: AstNode, rhs: AstNode) -> AstNode {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => AstNode::num(a + b),
        _ => AstNode::add(lhs, rhs),
    }
}

/// `a^0 = 1`
pub fn power_zero(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |_, rhs| rhs.is_zero().then(|| AstNode::num(1.0)))?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::simplify(Rule::PowerZero, node, &opt));
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |lhs, rhs| rhs.is_one().then(|| lhs.clone()))?;
    step_collector.push(Step::simplify(Rule::PowerOne, node, &opt));
    Some(opt)
}

/// `1^a = 1`
pub fn power_of_one(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |lhs, _| lhs.is_one().then(|| AstNode::num(1.0)))?;
    step_collector.push(Step::simplify(Rule::PowerOfOne, node, &opt));
    Some(opt)
}

/// `0^a = 0`, for `a > 0`
///
/// A symbolic exponent is only assumed to be positive in the [`Domain::Positive`] domain.
pub fn power_of_zero(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |lhs, rhs| {
        let positive = match rhs.as_number() {
            Some(n) => n > 0.0,
            None => domain == Domain::Positive,
        };
        (lhs.is_zero() && positive).then(|| AstNode::num(0.0))
    })?;

    step_collector.push(Step::simplify(Rule::PowerOfZero, node, &opt));
    Some(opt)
}

/// `(a^b)^c = a^(b*c)`, for integer `c`
///
/// In the [`Domain::Positive`] domain, `c` can be any exponent.
pub fn power_of_power(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |lhs, outer| {
        let (base, inner) = lhs.as_op(BinOpKind::Exp)?;
        if !outer.is_integer() && domain != Domain::Positive {
            return None;
        }

        let exp = match (inner.as_number(), outer.as_number()) {
            (Some(a), Some(b)) => AstNode::num(a * b),
            _ => AstNode::mul(inner.clone(), outer.clone()),
        };
        Some(AstNode::pow(base.clone(), exp))
    })?;

    step_collector.push(Step::simplify(Rule::PowerOfPower, node, &opt));
    Some(opt)
}

/// Combines factors of a product that have the same base.
///
/// `x*x = x^2`
/// `x^2*y*x^3 = x^5*y`
/// `e^a*e^b = e^(a + b)`
pub fn combine_like_factors(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    node.as_op(BinOpKind::Mul)?;

    let factors = flatten_product(node);
    let mut numbers = Vec::new();
    let mut groups: Vec<(&AstNode, AstNode)> = Vec::new();
    for factor in &factors {
        if factor.as_number().is_some() {
            numbers.push((*factor).clone());
            continue;
        }

        let (base, exp) = as_power(factor);
        match groups.iter_mut().find(|(existing, _)| *existing == base) {
            Some((_, total)) => *total = add_exponents(total.clone(), exp),
            None => groups.push((base, exp)),
        }
    }
    if numbers.len() + groups.len() == factors.len() {
        return None;
    }

    let opt = build_product(numbers.into_iter().chain(groups.into_iter().map(|(base, exp)| {
        if exp.is_one() {
            base.clone()
        } else {
            AstNode::pow(base.clone(), exp)
        }
    })));

    step_collector.push(Step::simplify(Rule::CombineLikeFactors, node, &opt));
    Some(opt)
}

/// `exp(a)*exp(b) = exp(a + b)`
pub fn exp_product(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    node.as_op(BinOpKind::Mul)?;

    let factors = flatten_product(node);
    let args = factors.iter().filter_map(|factor| factor.as_call1("exp")).collect::<Vec<_>>();
    if args.len() < 2 {
        return None;
    }

    let combined = args.into_iter()
        .cloned()
        .reduce(AstNode::add)
        .map(|sum| AstNode::call1("exp", sum))?;
    let mut combined = Some(combined);
    let opt = build_product(factors.into_iter().filter_map(|factor| {
        if factor.as_call1("exp").is_some() {
            // the first exponential is replaced by the combined one, the rest are dropped
            combined.take()
        } else {
            Some(factor.clone())
        }
    }));

    step_collector.push(Step::simplify(Rule::ExpProduct, node, &opt));
    Some(opt)
}

/// `exp(ln(u)) = u`
/// `e^ln(u) = u`
pub fn exp_of_ln(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_call(node, "exp", |arg| arg.as_call1("ln").cloned())
        .or_else(|| do_binary(node, BinOpKind::Exp, |lhs, rhs| {
            if is_euler(lhs) {
                rhs.as_call1("ln").cloned()
            } else {
                None
            }
        }))?;

    step_collector.push(Step::simplify(Rule::ExpOfLn, node, &opt));
    Some(opt)
}

/// `sqrt(u)^2 = u`
pub fn sqrt_squared(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Exp, |lhs, rhs| {
        if rhs.is_number(2.0) {
            lhs.as_call1("sqrt").cloned()
        } else {
            None
        }
    })?;

    step_collector.push(Step::simplify(Rule::SqrtSquared, node, &opt));
    Some(opt)
}

/// `sqrt(u^2) = abs(u)`
///
/// In the [`Domain::Positive`] domain, `sqrt(u^2) = u`.
pub fn sqrt_of_square(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_call(node, "sqrt", |arg| {
        let (base, exp) = arg.as_op(BinOpKind::Exp)?;
        if !exp.is_number(2.0) {
            return None;
        }
        Some(match domain {
            Domain::Real => AstNode::call1("abs", base.clone()),
            Domain::Positive => base.clone(),
        })
    })?;

    step_collector.push(Step::simplify(Rule::SqrtOfSquare, node, &opt));
    Some(opt)
}

/// Applies all rules.
pub fn all(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    power_zero(node, step_collector)
        .or_else(|| power_one(node, step_collector))
        .or_else(|| power_of_one(node, step_collector))
        .or_else(|| power_of_zero(node, domain, step_collector))
        .or_else(|| power_of_power(node, domain, step_collector))
        .or_else(|| combine_like_factors(node, step_collector))
        .or_else(|| exp_product(node, step_collector))
        .or_else(|| exp_of_ln(node, step_collector))
        .or_else(|| sqrt_squared(node, step_collector))
        .or_else(|| sqrt_of_square(node, domain, step_collector))
}

#[cfg(test)]
mod tests {
    use cas_parser::parse_expression;
    use pretty_assertions::assert_eq;
    use super::*;

    fn apply_in(source: &str, domain: Domain) -> Option<String> {
        let node = parse_expression(source).ast.unwrap();
        all(&node, domain, &mut ()).map(|node| node.to_string())
    }

    fn apply_all(source: &str) -> Option<String> {
        apply_in(source, Domain::Real)
    }

    #[test]
    fn identity_powers() {
        assert_eq!(apply_all("x^0"), Some("1".to_string()));
        assert_eq!(apply_all("(x + 1)^1"), Some("x + 1".to_string()));
        assert_eq!(apply_all("1^x"), Some("1".to_string()));
        assert_eq!(apply_all("0^x"), None);
        assert_eq!(apply_in("0^x", Domain::Positive), Some("0".to_string()));
    }

    #[test]
    fn nested_powers() {
        assert_eq!(apply_all("(x^2)^3"), Some("x^6".to_string()));
        assert_eq!(apply_all("(x^2)^(1/2)"), None);
        assert_eq!(apply_in("(x^a)^b", Domain::Positive), Some("x^(a*b)".to_string()));
    }

    #[test]
    fn like_factors() {
        assert_eq!(apply_all("x*x"), Some("x^2".to_string()));
        assert_eq!(apply_all("2x^2*y*x^3"), Some("2*x^5*y".to_string()));
        assert_eq!(apply_all("e^a*e^b"), Some("e^(a + b)".to_string()));
        assert_eq!(apply_all("2*x*y"), None);
        assert_eq!(apply_all("exp(a)*y*exp(b)"), Some("exp(a + b)*y".to_string()));
    }

    #[test]
    fn roots_and_logs() {
        assert_eq!(apply_all("exp(ln(x + 1))"), Some("x + 1".to_string()));
        assert_eq!(apply_all("e^ln(x)"), Some("x".to_string()));
        assert_eq!(apply_all("sqrt(x)^2"), Some("x".to_string()));
        assert_eq!(apply_all("sqrt(x^2)"), Some("abs(x)".to_string()));
        assert_eq!(apply_in("sqrt(x^2)", Domain::Positive), Some("x".to_string()));
    }
}
