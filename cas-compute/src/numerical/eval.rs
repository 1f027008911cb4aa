use cas_parser::parser::{ast::AstNode, token::op::BinOpKind};
use super::{
    ctxt::Ctxt,
    error::{kind::{EquationValue, NonFiniteValue, UndefinedFunction, UndefinedVariable, WrongArgumentCount}, Error},
    func::{lookup, similar_names, FUNCTIONS},
};

/// Any type that can be evaluated to a real number.
pub trait Eval {
    /// Evaluate the expression with the given context.
    ///
    /// Every intermediate value must be finite; `1/0` and `ln(-1)` are reported as errors instead
    /// of producing infinities or NaN.
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error>;
}

/// Checks that the value computed for `node` is finite.
fn finite(node: &AstNode, value: f64) -> Result<f64, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::new(vec![], NonFiniteValue { expression: node.to_string() }))
    }
}

impl Eval for AstNode {
    fn eval(&self, ctxt: &Ctxt) -> Result<f64, Error> {
        let value = match self {
            AstNode::Number(n) => *n,
            AstNode::Variable(name) => ctxt.get_var(name)
                .ok_or_else(|| Error::new(vec![], UndefinedVariable { name: name.clone() }))?,
            AstNode::Operator(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.eval(ctxt)?, rhs.eval(ctxt)?);
                match op {
                    BinOpKind::Add => lhs + rhs,
                    BinOpKind::Sub => lhs - rhs,
                    BinOpKind::Mul => lhs * rhs,
                    BinOpKind::Div => lhs / rhs,
                    BinOpKind::Exp => lhs.powf(rhs),
                }
            },
            AstNode::Function(name, args) => {
                let f = lookup(name).ok_or_else(|| Error::new(vec![], UndefinedFunction {
                    name: name.clone(),
                    suggestions: similar_names(name, FUNCTIONS),
                }))?;
                match args.as_slice() {
                    [arg] => f(arg.eval(ctxt)?),
                    _ => return Err(Error::new(vec![], WrongArgumentCount {
                        name: name.clone(),
                        expected: 1,
                        given: args.len(),
                    })),
                }
            },
            AstNode::Equation(..) => return Err(Error::new(vec![], EquationValue)),
        };
        finite(self, value)
    }
}
