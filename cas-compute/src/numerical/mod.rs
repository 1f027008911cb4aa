//! Numeric evaluation of expression trees.
//!
//! The symbolic engine uses numeric evaluation to fold constants it cannot keep exact, to check
//! candidate roots, and to compute series coefficients. Evaluation is over the reals only.

pub mod ctxt;
pub mod error;
pub mod eval;
pub mod func;

use cas_parser::parser::ast::AstNode;
use ctxt::Ctxt;
use eval::Eval;

/// Evaluates the expression if it contains no free variables and its value is a finite real
/// number.
pub fn try_numeric(node: &AstNode) -> Option<f64> {
    node.eval(&Ctxt::new()).ok()
}

/// Evaluates the expression with the given variable set to the given value.
pub fn eval_at(node: &AstNode, var: &str, value: f64) -> Result<f64, error::Error> {
    node.eval(&Ctxt::with_var(var, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_only_without_free_variables() {
        let node = AstNode::add(AstNode::var("pi"), AstNode::num(1.0));
        assert!(try_numeric(&node).is_some());
        assert_eq!(try_numeric(&AstNode::var("x")), None);
        assert_eq!(eval_at(&AstNode::mul(AstNode::num(2.0), AstNode::var("x")), "x", 4.0).unwrap(), 8.0);
    }
}
