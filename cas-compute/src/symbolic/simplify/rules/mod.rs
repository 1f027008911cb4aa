//! Implementation of the simplification rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the simplified expression if the rule applies, or `None` if the
//! rule does not apply. Rules only look at the node they are given (and its descendants); the
//! simplifier is responsible for visiting every node of the tree.
//!
//! The rules are grouped into categories, which the simplifier applies in the order
//! [`arithmetic`], [`algebraic`], [`trigonometry`], [`exponential`], [`logarithmic`].

pub mod algebraic;
pub mod arithmetic;
pub mod exponential;
pub mod logarithmic;
pub mod trigonometry;

use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use crate::symbolic::{
    step::Step,
    step_collector::StepCollector,
    term::{sum_terms, Term},
};
use super::options::Domain;

/// The signature shared by every category of rules.
pub type Category = fn(&AstNode, Domain, &mut dyn StepCollector<Step>) -> Option<AstNode>;

/// Applies the given rule to the node, returning the node unchanged if the rule does not apply.
pub fn apply(rule: impl FnOnce(&AstNode) -> Option<AstNode>, node: &AstNode) -> AstNode {
    rule(node).unwrap_or_else(|| node.clone())
}

/// If the expression is the given binary operator, calls the given transformation function with
/// the left and right-hand-side of the operator.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_binary(
    node: &AstNode,
    kind: BinOpKind,
    f: impl Fn(&AstNode, &AstNode) -> Option<AstNode>,
) -> Option<AstNode> {
    let (lhs, rhs) = node.as_op(kind)?;
    f(lhs, rhs)
}

/// If the expression is a call to a function of one argument with the given name, calls the
/// given transformation function with the argument.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    node: &AstNode,
    name: &str,
    f: impl Fn(&AstNode) -> Option<AstNode>,
) -> Option<AstNode> {
    f(node.as_call1(name)?)
}

/// If the expression is a sum or difference, calls the given transformation function with all of
/// its terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_sum(node: &AstNode, f: impl Fn(Vec<Term>) -> Option<AstNode>) -> Option<AstNode> {
    match node {
        AstNode::Operator(BinOpKind::Add | BinOpKind::Sub, _, _) => f(sum_terms(node)?),
        _ => None,
    }
}

/// If the expression has a negative leading coefficient, returns the expression with the sign
/// removed.
///
/// - `-3` -> `3`
/// - `-1*x` -> `x`
/// - `-2*x` -> `2*x`
pub(crate) fn negated(node: &AstNode) -> Option<AstNode> {
    match node {
        AstNode::Number(n) if *n < 0.0 => Some(AstNode::num(-n)),
        AstNode::Operator(BinOpKind::Mul, lhs, rhs) => match lhs.as_number() {
            Some(n) if n == -1.0 => Some(rhs.as_ref().clone()),
            Some(n) if n < 0.0 => Some(AstNode::mul(AstNode::num(-n), rhs.as_ref().clone())),
            _ => None,
        },
        _ => None,
    }
}

/// Negates the expression, folding the sign into a leading number if there is one.
pub(crate) fn negate(node: &AstNode) -> AstNode {
    match node {
        AstNode::Number(n) => AstNode::num(-n),
        _ => negated(node).unwrap_or_else(|| AstNode::neg(node.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_helpers() {
        let x = AstNode::var("x");
        assert_eq!(negated(&AstNode::neg(x.clone())), Some(x.clone()));
        assert_eq!(negated(&AstNode::mul(AstNode::num(-2.0), x.clone())), Some(AstNode::mul(AstNode::num(2.0), x.clone())));
        assert_eq!(negated(&x), None);
        assert_eq!(negate(&negate(&x)), x);
        assert_eq!(negate(&AstNode::num(3.0)), AstNode::num(-3.0));
    }

    #[test]
    fn apply_keeps_node() {
        let x = AstNode::var("x");
        assert_eq!(apply(|_| None, &x), x);
    }
}
