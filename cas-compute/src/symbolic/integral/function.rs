//! Antiderivatives of the built-in functions.

use cas_parser::parser::ast::AstNode;

/// `numer/denom`
fn ratio(numer: f64, denom: f64) -> AstNode {
    AstNode::div(AstNode::num(numer), AstNode::num(denom))
}

/// Returns an antiderivative of the function with respect to its argument `u`. The caller is
/// responsible for dividing by the slope of `u` if it is not the integration variable itself.
///
/// Returns [`None`] if the function has no known antiderivative.
pub(super) fn outer_antiderivative(name: &str, u: &AstNode) -> Option<AstNode> {
    let call = |f: &str| AstNode::call1(f, u.clone());
    let out = match name {
        "sin" => AstNode::neg(call("cos")),
        "cos" => call("sin"),
        "tan" => AstNode::neg(AstNode::call1("ln", call("cos"))),
        "sinh" => call("cosh"),
        "cosh" => call("sinh"),
        "exp" => call("exp"),
        "ln" => AstNode::sub(AstNode::mul(u.clone(), call("ln")), u.clone()),
        "sqrt" => AstNode::mul(ratio(2.0, 3.0), AstNode::pow(u.clone(), ratio(3.0, 2.0))),
        "cbrt" => AstNode::mul(ratio(3.0, 4.0), AstNode::pow(u.clone(), ratio(4.0, 3.0))),
        _ => return None,
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_functions() {
        let u = AstNode::var("u");
        assert_eq!(outer_antiderivative("cos", &u), Some(AstNode::call1("sin", u.clone())));
        assert_eq!(outer_antiderivative("sin", &u).map(|node| node.to_string()), Some("-cos(u)".to_string()));
        assert!(outer_antiderivative("asin", &u).is_none());
    }
}
