//! Simplification rules for operations on numbers, and for the identity elements of addition and
//! multiplication.

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::numerical::func::lookup;
use crate::symbolic::{
    simplify::{options::Domain, rules::{do_binary, negate, negated}},
    step::{Rule, Step},
    step_collector::StepCollector,
    term::{build_product, flatten_product},
};

/// Integers at or above this magnitude are not exactly representable as `f64`, so results this
/// large are not folded.
const MAX_EXACT: f64 = 9.0e15;

/// Returns true if a computed value can replace the expression that produced it.
///
/// Results that are integers are always exact. Other results are only accepted if one of the
/// inputs was already inexact, so that `1/3` stays a fraction while `0.5/2` becomes `0.25`.
fn is_foldable(result: f64, inputs: &[f64]) -> bool {
    result.is_finite()
        && result.abs() < MAX_EXACT
        && (result.fract() == 0.0 || inputs.iter().any(|n| n.fract() != 0.0))
}

/// `2 + 3 = 5`
/// `6 / 3 = 2`
/// `2 ^ 3 = 8`
///
/// Division by zero is never folded, and neither is a division or power whose exact result is
/// not an integer.
pub fn evaluate_constant(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let AstNode::Operator(op, lhs, rhs) = node else {
        return None;
    };
    let (a, b) = (lhs.as_number()?, rhs.as_number()?);
    let result = match op {
        BinOpKind::Add => a + b,
        BinOpKind::Sub => a - b,
        BinOpKind::Mul => a * b,
        BinOpKind::Div if b == 0.0 => return None,
        BinOpKind::Div => a / b,
        BinOpKind::Exp if a == 0.0 && b < 0.0 => return None,
        BinOpKind::Exp => a.powf(b),
    };
    if !is_foldable(result, &[a, b]) {
        return None;
    }

    let opt = AstNode::num(result);
    step_collector.push(Step::simplify(Rule::EvaluateConstant, node, &opt));
    Some(opt)
}

/// `sqrt(4) = 2`
/// `cos(0) = 1`
///
/// Only functions whose value at the argument is an integer are evaluated, unless the argument
/// is already inexact.
pub fn evaluate_function(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let AstNode::Function(name, args) = node else {
        return None;
    };
    let [arg] = args.as_slice() else {
        return None;
    };
    let arg = arg.as_number()?;
    let result = lookup(name)?(arg);
    if !is_foldable(result, &[arg]) {
        return None;
    }

    let opt = AstNode::num(result);
    step_collector.push(Step::simplify(Rule::EvaluateFunction, node, &opt));
    Some(opt)
}

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Add, |lhs, rhs| {
        if lhs.is_zero() {
            Some(rhs.clone())
        } else if rhs.is_zero() {
            Some(lhs.clone())
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::simplify(Rule::AddZero, node, &opt));
    Some(opt)
}

/// `a-0 = a`
/// `0-a = -a`
pub fn subtract_zero(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Sub, |lhs, rhs| {
        if rhs.is_zero() {
            Some(lhs.clone())
        } else if lhs.is_zero() {
            Some(negate(rhs))
        } else {
            None
        }
    })?;

    step_collector.push(Step::simplify(Rule::SubtractZero, node, &opt));
    Some(opt)
}

/// `0*a = 0`
/// `a*0 = 0`
/// `0/a = 0`
pub fn multiply_zero(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Mul, |lhs, rhs| {
        (lhs.is_zero() || rhs.is_zero()).then(|| AstNode::num(0.0))
    })
        .or_else(|| do_binary(node, BinOpKind::Div, |lhs, rhs| {
            (lhs.is_zero() && !rhs.is_zero()).then(|| AstNode::num(0.0))
        }))?;

    step_collector.push(Step::simplify(Rule::MultiplyZero, node, &opt));
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
/// `a/1 = a`
pub fn multiply_one(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Mul, |lhs, rhs| {
        if lhs.is_one() {
            Some(rhs.clone())
        } else if rhs.is_one() {
            Some(lhs.clone())
        } else {
            None
        }
    })
        .or_else(|| do_binary(node, BinOpKind::Div, |lhs, rhs| rhs.is_one().then(|| lhs.clone())))?;

    step_collector.push(Step::simplify(Rule::MultiplyOne, node, &opt));
    Some(opt)
}

/// Multiplies every numeric factor of a product into a single leading coefficient.
///
/// `2*x*3 = 6*x`
/// `x*(-1) = -1*x`
pub fn combine_numeric_factors(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    if node.as_op(BinOpKind::Mul).is_none() {
        return None;
    }

    let factors = flatten_product(node);
    let (numbers, others): (Vec<&AstNode>, Vec<&AstNode>) = factors.iter().copied().partition(|factor| factor.as_number().is_some());
    let already_leading = numbers.len() == 1 && factors[0].as_number().is_some();
    if numbers.is_empty() || already_leading {
        return None;
    }

    let coeff = numbers.iter().filter_map(|n| n.as_number()).product::<f64>();
    if !coeff.is_finite() {
        return None;
    }

    let opt = if coeff == 0.0 {
        AstNode::num(0.0)
    } else if coeff == 1.0 && !others.is_empty() {
        build_product(others.into_iter().cloned())
    } else {
        build_product(std::iter::once(AstNode::num(coeff)).chain(others.into_iter().cloned()))
    };

    step_collector.push(Step::simplify(Rule::CombineNumericFactors, node, &opt));
    Some(opt)
}

/// `a + (-b) = a - b`
/// `a + (-2)*b = a - 2*b`
/// `a - (-b) = a + b`
pub fn subtract_negative(node: &AstNode, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    let opt = do_binary(node, BinOpKind::Add, |lhs, rhs| {
        negated(rhs).map(|rhs| AstNode::sub(lhs.clone(), rhs))
    })
        .or_else(|| do_binary(node, BinOpKind::Sub, |lhs, rhs| {
            negated(rhs).map(|rhs| AstNode::add(lhs.clone(), rhs))
        }))?;

    step_collector.push(Step::simplify(Rule::SubtractNegative, node, &opt));
    Some(opt)
}

/// Applies all rules.
pub fn all(node: &AstNode, _: Domain, step_collector: &mut dyn StepCollector<Step>) -> Option<AstNode> {
    evaluate_constant(node, step_collector)
        .or_else(|| evaluate_function(node, step_collector))
        .or_else(|| add_zero(node, step_collector))
        .or_else(|| subtract_zero(node, step_collector))
        .or_else(|| multiply_zero(node, step_collector))
        .or_else(|| multiply_one(node, step_collector))
        .or_else(|| combine_numeric_factors(node, step_collector))
        .or_else(|| subtract_negative(node, step_collector))
}
