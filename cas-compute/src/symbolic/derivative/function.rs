//! Symbolic derivatives of the built-in functions.

use cas_parser::parser::ast::AstNode;

/// The functions with a known derivative.
pub const DIFFERENTIABLE: [&str; 18] = [
    "sin", "cos", "tan", "sec", "csc", "cot",
    "asin", "acos", "atan",
    "sinh", "cosh", "tanh",
    "exp", "ln", "log",
    "sqrt", "cbrt", "abs",
];

/// `u^2`
fn squared(u: AstNode) -> AstNode {
    AstNode::pow(u, AstNode::num(2.0))
}

/// `sqrt(1 - u^2)`
fn sqrt_one_minus_square(u: &AstNode) -> AstNode {
    AstNode::call1("sqrt", AstNode::sub(AstNode::num(1.0), squared(u.clone())))
}

/// Returns the derivative of the outer function, evaluated at the argument `u`. This is `f'(u)`
/// in the chain rule `f(u)' = f'(u) * u'`.
///
/// Returns [`None`] if the function is not in [`DIFFERENTIABLE`].
pub(super) fn outer_derivative(name: &str, u: &AstNode) -> Option<AstNode> {
    let call = |f: &str| AstNode::call1(f, u.clone());
    let out = match name {
        "sin" => call("cos"),
        "cos" => AstNode::neg(call("sin")),
        "tan" => squared(call("sec")),
        "sec" => AstNode::mul(call("sec"), call("tan")),
        "csc" => AstNode::neg(AstNode::mul(call("csc"), call("cot"))),
        "cot" => AstNode::neg(squared(call("csc"))),
        "asin" => AstNode::div(AstNode::num(1.0), sqrt_one_minus_square(u)),
        "acos" => AstNode::neg(AstNode::div(AstNode::num(1.0), sqrt_one_minus_square(u))),
        "atan" => AstNode::div(AstNode::num(1.0), AstNode::add(AstNode::num(1.0), squared(u.clone()))),
        "sinh" => call("cosh"),
        "cosh" => call("sinh"),
        "tanh" => AstNode::sub(AstNode::num(1.0), squared(call("tanh"))),
        "exp" => call("exp"),
        "ln" => AstNode::div(AstNode::num(1.0), u.clone()),
        "log" => AstNode::div(
            AstNode::num(1.0),
            AstNode::mul(u.clone(), AstNode::call1("ln", AstNode::num(10.0))),
        ),
        "sqrt" => AstNode::div(AstNode::num(1.0), AstNode::mul(AstNode::num(2.0), call("sqrt"))),
        "cbrt" => AstNode::div(AstNode::num(1.0), AstNode::mul(AstNode::num(3.0), squared(call("cbrt")))),
        "abs" => AstNode::div(u.clone(), call("abs")),
        _ => return None,
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_function_has_a_derivative() {
        let u = AstNode::var("u");
        for name in DIFFERENTIABLE {
            assert!(outer_derivative(name, &u).is_some(), "{name} should be differentiable");
        }
        assert!(outer_derivative("gamma", &u).is_none());
    }
}
