//! Simplification rules for the natural logarithm `ln` and the base-10 logarithm `log`.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::symbolic::{
    coeff::Coeff,
    simplify::{options::Domain, rules::{do_call, do_sum}},
    step::{Rule, Step},
    step_collector::StepCollector,
    term::{build_sum, Term},
};

/// The logarithm functions, paired with the name of their base.
const LOGARITHMS: [(&str, &str); 2] = [("ln", "e"), ("log", "10")];

/// Returns true if the node is the base of the given logarithm.
fn is_base(node: &AstNode, base: &str) -> bool {
    match base {
        "10" => node.is_number(10.0),
        name => node.as_variable() == Some(name),
    }
}

/// `ln(1) = 0`
/// `log(1) = 0`
pub fn ln_of_one(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = LOGARITHMS.iter()
        .find_map(|(name, _)| do_call(node, name, |arg| arg.is_one().then(|| AstNode::num(0.0))))?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::simplify(Rule::LnOfOne, node, &opt));
    Some(opt)
}

/// `ln(e) = 1`
/// `log(10) = 1`
pub fn ln_of_base(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = LOGARITHMS.iter()
        .find_map(|(name, base)| do_call(node, name, |arg| is_base(arg, base).then(|| AstNode::num(1.0))))?;

    step_collector.push(Step::simplify(Rule::LnOfBase, node, &opt));
    Some(opt)
}

/// `ln(exp(u)) = u`
/// `ln(e^u) = u`
/// `log(10^u) = u`
pub fn ln_of_exp(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_call(node, "ln", |arg| arg.as_call1("exp").cloned())
        .or_else(|| LOGARITHMS.iter().find_map(|(name, base)| do_call(node, name, |arg| {
            let (lhs, rhs) = arg.as_op(BinOpKind::Exp)?;
            is_base(lhs, base).then(|| rhs.clone())
        })))?;

    step_collector.push(Step::simplify(Rule::LnOfExp, node, &opt));
    Some(opt)
}

/// If the term is exactly `±f(u)` for the given logarithm `f`, returns `u`.
fn log_arg<'a>(term: &'a Term, name: &str) -> Option<&'a AstNode> {
    match (term.num.as_slice(), term.den.is_empty()) {
        ([factor], true) if term.coeff.abs().is_one() => factor.as_call1(name),
        _ => None,
    }
}

/// Finds two logarithm terms of the sum whose signs satisfy `accept`, and replaces them with the
/// single logarithm built by `combine` from their arguments.
fn merge_logs(
    terms: Vec<Term>,
    accept: impl Fn(bool, bool) -> bool,
    combine: impl Fn(&Term, &AstNode, &Term, &AstNode) -> AstNode,
) -> Option<AstNode> {
    for (name, _) in LOGARITHMS {
        for (i, first) in terms.iter().enumerate() {
            let Some(first_arg) = log_arg(first, name) else {
                continue;
            };

            let found = terms.iter()
                .enumerate()
                .skip(i + 1)
                .find_map(|(j, second)| {
                    let second_arg = log_arg(second, name)?;
                    accept(first.coeff.is_negative(), second.coeff.is_negative())
                        .then(|| (j, combine(first, first_arg, second, second_arg)))
                });
            if let Some((j, arg)) = found {
                let mut out = terms.clone();
                out[i] = Term { coeff: Coeff::one(), num: vec![AstNode::call1(name, arg)], den: Vec::new() };
                out.remove(j);
                return Some(build_sum(&out));
            }
        }
    }
    None
}

/// `ln(a) + ln(b) = ln(a*b)`
pub fn log_sum(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_sum(node, |terms| merge_logs(
        terms,
        |first_neg, second_neg| !first_neg && !second_neg,
        |_, a, _, b| AstNode::mul(a.clone(), b.clone()),
    ))?;

    step_collector.push(Step::simplify(Rule::LogSum, node, &opt));
    Some(opt)
}

/// `ln(a) - ln(b) = ln(a/b)`
pub fn log_difference(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_sum(node, |terms| merge_logs(
        terms,
        |first_neg, second_neg| first_neg != second_neg,
        |first, a, _, b| {
            if first.coeff.is_negative() {
                AstNode::div(b.clone(), a.clone())
            } else {
                AstNode::div(a.clone(), b.clone())
            }
        },
    ))?;

    step_collector.push(Step::simplify(Rule::LogDifference, node, &opt));
    Some(opt)
}

/// `ln(a^n) = n*ln(a)`, for odd integer `n`
///
/// In the [`Domain::Positive`] domain, `n` can be any exponent.
pub fn log_of_power(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = LOGARITHMS.iter().find_map(|(name, _)| do_call(node, name, |arg| {
        let (base, exp) = arg.as_op(BinOpKind::Exp)?;
        let odd = exp.as_number().is_some_and(|n| n.fract() == 0.0 && n % 2.0 != 0.0);
        (odd || domain == Domain::Positive)
            .then(|| AstNode::mul(exp.clone(), AstNode::call1(*name, base.clone())))
    }))?;

    step_collector.push(Step::simplify(Rule::LogOfPower, node, &opt));
    Some(opt)
}

/// Applies all rules.
pub fn all(node: &AstNode, domain: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    ln_of_one(node, step_collector)
        .or_else(|| ln_of_base(node, step_collector))
        .or_else(|| ln_of_exp(node, step_collector))
        .or_else(|| log_sum(node, step_collector))
        .or_else(|| log_difference(node, step_collector))
        .or_else(|| log_of_power(node, domain, step_collector))
}
