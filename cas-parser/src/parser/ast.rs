//! The abstract syntax tree shared by the parser and the symbolic engine.

use std::collections::BTreeSet;
use super::token::op::BinOpKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Names that are parsed as variables but stand for well-known constants. They are never reported
/// as free variables of an expression.
pub const CONSTANTS: [&str; 2] = ["pi", "e"];

/// Returns true if the given name is a well-known constant, such as `pi`.
pub fn is_constant_name(name: &str) -> bool {
    CONSTANTS.contains(&name)
}

/// A node of an expression tree.
///
/// Trees are immutable values: every transformation builds a new tree, and two trees are equal if
/// they have the same shape and the same leaves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AstNode {
    /// A numeric literal.
    Number(f64),

    /// A named variable, such as `x`, or a named constant, such as `pi`.
    Variable(String),

    /// A binary operation.
    Operator(BinOpKind, Box<AstNode>, Box<AstNode>),

    /// A function call, such as `sin(x)`.
    Function(String, Vec<AstNode>),

    /// An equation `lhs = rhs`.
    Equation(Box<AstNode>, Box<AstNode>),
}

impl AstNode {
    /// Creates a number node. Negative zero is stored as positive zero.
    pub fn num(value: f64) -> Self {
        if value == 0.0 {
            Self::Number(0.0)
        } else {
            Self::Number(value)
        }
    }

    /// Creates a variable node.
    pub fn var(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Creates a binary operator node.
    pub fn op(kind: BinOpKind, lhs: AstNode, rhs: AstNode) -> Self {
        Self::Operator(kind, Box::new(lhs), Box::new(rhs))
    }

    /// `lhs + rhs`
    pub fn add(lhs: AstNode, rhs: AstNode) -> Self {
        Self::op(BinOpKind::Add, lhs, rhs)
    }

    /// `lhs - rhs`
    pub fn sub(lhs: AstNode, rhs: AstNode) -> Self {
        Self::op(BinOpKind::Sub, lhs, rhs)
    }

    /// `lhs * rhs`
    pub fn mul(lhs: AstNode, rhs: AstNode) -> Self {
        Self::op(BinOpKind::Mul, lhs, rhs)
    }

    /// `lhs / rhs`
    pub fn div(lhs: AstNode, rhs: AstNode) -> Self {
        Self::op(BinOpKind::Div, lhs, rhs)
    }

    /// `lhs ^ rhs`
    pub fn pow(lhs: AstNode, rhs: AstNode) -> Self {
        Self::op(BinOpKind::Exp, lhs, rhs)
    }

    /// `-1 * value`, which is how negation is represented.
    pub fn neg(value: AstNode) -> Self {
        Self::mul(Self::num(-1.0), value)
    }

    /// Creates a function call node.
    pub fn call(name: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self::Function(name.into(), args)
    }

    /// Creates a call to a function of one argument.
    pub fn call1(name: impl Into<String>, arg: AstNode) -> Self {
        Self::Function(name.into(), vec![arg])
    }

    /// Creates an equation node.
    pub fn equation(lhs: AstNode, rhs: AstNode) -> Self {
        Self::Equation(Box::new(lhs), Box::new(rhs))
    }

    /// Returns the value of this node if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the name of this node if it is a variable.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns the operands of this node if it is the given binary operator.
    pub fn as_op(&self, kind: BinOpKind) -> Option<(&AstNode, &AstNode)> {
        match self {
            Self::Operator(op, lhs, rhs) if *op == kind => Some((lhs.as_ref(), rhs.as_ref())),
            _ => None,
        }
    }

    /// Returns the single argument of this node if it is a call to the function with the given
    /// name and exactly one argument.
    pub fn as_call1(&self, name: &str) -> Option<&AstNode> {
        match self {
            Self::Function(target, args) if target == name && args.len() == 1 => Some(&args[0]),
            _ => None,
        }
    }

    /// Returns true if this node is the given number.
    pub fn is_number(&self, value: f64) -> bool {
        self.as_number() == Some(value)
    }

    /// Returns true if this node is the number zero.
    pub fn is_zero(&self) -> bool {
        self.is_number(0.0)
    }

    /// Returns true if this node is the number one.
    pub fn is_one(&self) -> bool {
        self.is_number(1.0)
    }

    /// Returns true if this node is a number with an integer value.
    pub fn is_integer(&self) -> bool {
        self.as_number().is_some_and(|n| n.is_finite() && n.fract() == 0.0)
    }

    /// Returns true if the given variable appears anywhere in this tree.
    pub fn contains_variable(&self, var: &str) -> bool {
        match self {
            Self::Number(_) => false,
            Self::Variable(name) => name == var,
            Self::Operator(_, lhs, rhs) | Self::Equation(lhs, rhs) => {
                lhs.contains_variable(var) || rhs.contains_variable(var)
            },
            Self::Function(_, args) => args.iter().any(|arg| arg.contains_variable(var)),
        }
    }

    /// Returns true if a call to the given function appears anywhere in this tree.
    pub fn contains_function(&self, function: &str) -> bool {
        match self {
            Self::Number(_) | Self::Variable(_) => false,
            Self::Operator(_, lhs, rhs) | Self::Equation(lhs, rhs) => {
                lhs.contains_function(function) || rhs.contains_function(function)
            },
            Self::Function(name, args) => {
                name == function || args.iter().any(|arg| arg.contains_function(function))
            },
        }
    }

    /// Returns the children of this node, from left to right.
    pub fn children(&self) -> Vec<&AstNode> {
        match self {
            Self::Number(_) | Self::Variable(_) => Vec::new(),
            Self::Operator(_, lhs, rhs) | Self::Equation(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Self::Function(_, args) => args.iter().collect(),
        }
    }

    /// Builds a new node of the same kind as this one, with each child replaced by the result of
    /// the given function.
    pub fn map_children(&self, mut f: impl FnMut(&AstNode) -> AstNode) -> AstNode {
        match self {
            Self::Number(_) | Self::Variable(_) => self.clone(),
            Self::Operator(kind, lhs, rhs) => Self::op(*kind, f(lhs.as_ref()), f(rhs.as_ref())),
            Self::Function(name, args) => Self::Function(name.clone(), args.iter().map(f).collect()),
            Self::Equation(lhs, rhs) => Self::equation(f(lhs.as_ref()), f(rhs.as_ref())),
        }
    }

    /// Replaces every occurrence of the given variable with the given value.
    pub fn substitute(&self, var: &str, value: &AstNode) -> AstNode {
        match self {
            Self::Variable(name) if name == var => value.clone(),
            _ => self.map_children(|child| child.substitute(var, value)),
        }
    }

    /// Returns the sorted names of the free variables in this tree. Constants such as `pi` are not
    /// included.
    pub fn variables(&self) -> Vec<String> {
        fn collect<'a>(node: &'a AstNode, out: &mut BTreeSet<&'a str>) {
            match node {
                AstNode::Variable(name) if !is_constant_name(name) => {
                    out.insert(name);
                },
                _ => node.children().into_iter().for_each(|child| collect(child, out)),
            }
        }

        let mut names = BTreeSet::new();
        collect(self, &mut names);
        names.into_iter().map(str::to_owned).collect()
    }

    /// Returns the sorted names of the functions called in this tree.
    pub fn functions(&self) -> Vec<String> {
        fn collect<'a>(node: &'a AstNode, out: &mut BTreeSet<&'a str>) {
            if let AstNode::Function(name, _) = node {
                out.insert(name);
            }
            node.children().into_iter().for_each(|child| collect(child, out));
        }

        let mut names = BTreeSet::new();
        collect(self, &mut names);
        names.into_iter().map(str::to_owned).collect()
    }

    /// Returns the symbols of the operators used in this tree, in a fixed order. An equation is
    /// reported as `=`.
    pub fn operators_used(&self) -> Vec<String> {
        fn collect(node: &AstNode, ops: &mut Vec<BinOpKind>, equation: &mut bool) {
            match node {
                AstNode::Operator(kind, _, _) if !ops.contains(kind) => ops.push(*kind),
                AstNode::Equation(_, _) => *equation = true,
                _ => (),
            }
            node.children().into_iter().for_each(|child| collect(child, ops, equation));
        }

        let (mut ops, mut equation) = (Vec::new(), false);
        collect(self, &mut ops, &mut equation);

        let mut out = BinOpKind::ALL
            .iter()
            .filter(|kind| ops.contains(*kind))
            .map(|kind| kind.symbol().to_owned())
            .collect::<Vec<_>>();
        if equation {
            out.push("=".to_owned());
        }
        out
    }

    /// The complexity of the tree, which is the number of nodes in it.
    pub fn complexity(&self) -> usize {
        1 + self.children().into_iter().map(AstNode::complexity).sum::<usize>()
    }
}

impl From<f64> for AstNode {
    fn from(value: f64) -> Self {
        Self::num(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn sample() -> AstNode {
        // sin(x) * y + 2^pi = z
        AstNode::equation(
            AstNode::add(
                AstNode::mul(AstNode::call1("sin", AstNode::var("x")), AstNode::var("y")),
                AstNode::pow(AstNode::num(2.0), AstNode::var("pi")),
            ),
            AstNode::var("z"),
        )
    }

    #[test]
    fn collects_names() {
        let node = sample();
        assert_eq!(node.variables(), vec!["x", "y", "z"]);
        assert_eq!(node.functions(), vec!["sin"]);
        assert_eq!(node.operators_used(), vec!["+", "*", "^", "="]);
    }

    #[test]
    fn complexity_counts_nodes() {
        assert_eq!(AstNode::var("x").complexity(), 1);
        assert_eq!(sample().complexity(), 10);
    }

    #[test]
    fn substitute_variable() {
        let node = AstNode::add(AstNode::var("x"), AstNode::call1("cos", AstNode::var("x")));
        let out = node.substitute("x", &AstNode::num(0.0));
        assert_eq!(out, AstNode::add(AstNode::num(0.0), AstNode::call1("cos", AstNode::num(0.0))));
        assert!(!out.contains_variable("x"));
        assert!(out.contains_function("cos"));
    }

    #[test]
    fn negative_zero_is_zero() {
        assert_eq!(AstNode::num(-0.0), AstNode::Number(0.0));
        assert!(AstNode::num(-0.0).is_zero());
        assert!(AstNode::num(3.0).is_integer());
        assert!(!AstNode::num(3.5).is_integer());
    }
}
