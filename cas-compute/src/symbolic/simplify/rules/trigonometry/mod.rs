//! Simplification rules for trigonometric functions.

mod consts;
mod table;

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::symbolic::{
    coeff::Coeff,
    simplify::{options::Domain, rules::{do_call, do_sum, negate, negated}},
    step::{Rule, Step},
    step_collector::StepCollector,
    term::{build_sum, Term},
};
use num_rational::Rational64;
use num_traits::CheckedMul;
use std::collections::HashMap;
use table::{TrigOut, FULL_TURN};

/// Normalizes an angle that is a rational multiple of `pi` into a table key. See the [`table`]
/// module for the layout of the keys.
fn table_key(arg: &AstNode) -> Option<i64> {
    if arg.is_zero() {
        return Some(0);
    }

    let term = Term::from_node(arg)?;
    if term.num != [AstNode::var("pi")] || !term.den.is_empty() {
        return None;
    }
    let Coeff::Exact(ratio) = term.coeff else {
        return None;
    };

    // `ratio * pi` is `ratio / 2` of a full turn
    let keys = ratio.checked_mul(&Rational64::from_integer(FULL_TURN / 2))?;
    keys.is_integer().then(|| keys.to_integer().rem_euclid(FULL_TURN))
}

/// Computes the given trigonometric function exactly using the provided lookup table.
fn simplify_trig(node: &AstNode, name: &str, table: &HashMap<i64, TrigOut>) -> Option<AstNode> {
    do_call(node, name, |arg| {
        let out = table.get(&table_key(arg)?)?;
        Some(out.output.to_node(out.neg))
    })
}

/// `sin(x)`
pub fn sin(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = simplify_trig(node, "sin", &table::SIN_TABLE)?;
    step_collector.push(Step::simplify(Rule::TrigExactValue, node, &opt));
    Some(opt)
}

/// `cos(x)`
pub fn cos(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = simplify_trig(node, "cos", &table::COS_TABLE)?;
    step_collector.push(Step::simplify(Rule::TrigExactValue, node, &opt));
    Some(opt)
}

/// `tan(x)`
pub fn tan(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = simplify_trig(node, "tan", &table::TAN_TABLE)?;
    step_collector.push(Step::simplify(Rule::TrigExactValue, node, &opt));
    Some(opt)
}

/// `sin(-x) = -sin(x)`
/// `cos(-x) = cos(x)`
/// `tan(-x) = -tan(x)`
pub fn parity(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_call(node, "sin", |arg| negated(arg).map(|arg| negate(&AstNode::call1("sin", arg))))
        .or_else(|| do_call(node, "cos", |arg| negated(arg).map(|arg| AstNode::call1("cos", arg))))
        .or_else(|| do_call(node, "tan", |arg| negated(arg).map(|arg| negate(&AstNode::call1("tan", arg)))))?;

    step_collector.push(Step::simplify(Rule::TrigParity, node, &opt));
    Some(opt)
}

/// If the term is `f(u)^2` with no other factors, returns `u`.
fn squared_call<'a>(term: &'a Term, name: &str) -> Option<&'a AstNode> {
    match (term.num.as_slice(), term.den.is_empty()) {
        ([factor], true) => {
            let (base, exp) = factor.as_op(BinOpKind::Exp)?;
            if exp.is_number(2.0) {
                base.as_call1(name)
            } else {
                None
            }
        },
        _ => None,
    }
}

/// `sin(u)^2 + cos(u)^2 = 1`
///
/// The two terms can be anywhere in the sum, in either order, as long as they have the same
/// coefficient.
pub fn pythagorean(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_sum(node, |terms| {
        for (i, sin_term) in terms.iter().enumerate() {
            let Some(arg) = squared_call(sin_term, "sin") else {
                continue;
            };

            let matching = terms.iter()
                .position(|cos_term| squared_call(cos_term, "cos") == Some(arg) && cos_term.coeff == sin_term.coeff);
            if let Some(j) = matching {
                let mut out = terms.clone();
                out[i] = Term::constant(sin_term.coeff);
                out.remove(j);
                return Some(build_sum(&out));
            }
        }
        None
    })?;

    step_collector.push(Step::simplify(Rule::PythagoreanIdentity, node, &opt));
    Some(opt)
}

/// Applies all rules.
pub fn all(node: &AstNode, _: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    pythagorean(node, step_collector)
        .or_else(|| parity(node, step_collector))
        .or_else(|| sin(node, step_collector))
        .or_else(|| cos(node, step_collector))
        .or_else(|| tan(node, step_collector))
}
