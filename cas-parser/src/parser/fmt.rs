//! Plain-text and LaTeX formatting of expression trees.

use std::fmt::{Display, Formatter, Result};
use super::{
    ast::AstNode,
    token::op::BinOpKind,
    Associativity,
    Precedence,
};

/// Functions with a dedicated LaTeX command.
const LATEX_FUNCTIONS: [&str; 16] = [
    "sin", "cos", "tan", "sec", "csc", "cot",
    "sinh", "cosh", "tanh",
    "arcsin", "arccos", "arctan",
    "ln", "log", "exp", "det",
];

/// A trait for types that can be formatted as LaTeX.
pub trait Latex {
    /// Format the value as LaTeX.
    fn fmt_latex(&self, f: &mut Formatter) -> Result;

    /// Wraps the value in a [`LatexFormatter`], which implements [`Display`].
    fn as_display(&self) -> LatexFormatter<'_, Self> {
        LatexFormatter(self)
    }
}

/// A wrapper type that implements [`Display`] for any type that implements [`Latex`].
pub struct LatexFormatter<'a, T: ?Sized>(&'a T);

impl<T: ?Sized> Display for LatexFormatter<'_, T>
where
    T: Latex,
{
    fn fmt(&self, f: &mut Formatter) -> Result {
        self.0.fmt_latex(f)
    }
}

/// Formats a number, writing integral values without a fractional part.
pub fn fmt_number(f: &mut Formatter, n: f64) -> Result {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

impl AstNode {
    /// Returns the operand of this node if it is a negation `-1 * a`.
    pub fn as_negation(&self) -> Option<&AstNode> {
        match self.as_op(BinOpKind::Mul) {
            Some((lhs, rhs)) if lhs.is_number(-1.0) => Some(rhs),
            _ => None,
        }
    }

    /// The precedence this node has when it is written out, used to decide where parentheses
    /// are needed.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Number(n) if *n < 0.0 => Precedence::Neg,
            Self::Number(_) | Self::Variable(_) | Self::Function(..) => Precedence::Atom,
            Self::Operator(..) if self.as_negation().is_some() => Precedence::Neg,
            Self::Operator(op, _, _) => op.precedence(),
            Self::Equation(..) => Precedence::Any,
        }
    }
}

/// Returns true if the child of a binary operator must be wrapped in parentheses.
fn needs_parens(op: BinOpKind, child: &AstNode, is_rhs: bool) -> bool {
    let (parent, child) = (op.precedence(), child.precedence());
    if is_rhs {
        // keep signs readable: `x*(-3)`, `a - (-b)`
        child == Precedence::Neg
            || child < parent
            || (child == parent && op.associativity() == Associativity::Left)
    } else {
        child < parent || (child == parent && op.associativity() == Associativity::Right)
    }
}

/// Writes the given node, wrapped in parentheses if `parens` is true.
fn fmt_child(f: &mut Formatter, child: &AstNode, parens: bool) -> Result {
    if parens {
        write!(f, "({})", child)
    } else {
        write!(f, "{}", child)
    }
}

impl Display for AstNode {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(n) => fmt_number(f, *n),
            Self::Variable(name) => write!(f, "{}", name),
            Self::Operator(..) if self.as_negation().is_some() => {
                let operand = self.as_negation().unwrap_or(self);
                write!(f, "-")?;
                fmt_child(f, operand, operand.precedence() <= Precedence::Neg)
            },
            Self::Operator(op, lhs, rhs) => {
                fmt_child(f, lhs, needs_parens(*op, lhs, false))?;
                match op {
                    BinOpKind::Add | BinOpKind::Sub => write!(f, " {} ", op)?,
                    BinOpKind::Mul | BinOpKind::Div | BinOpKind::Exp => write!(f, "{}", op)?,
                }
                fmt_child(f, rhs, needs_parens(*op, rhs, true))
            },
            Self::Function(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
            Self::Equation(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
        }
    }
}

/// Writes the given node as LaTeX, wrapped in `\left(` and `\right)` if `parens` is true.
fn fmt_latex_child(f: &mut Formatter, child: &AstNode, parens: bool) -> Result {
    if parens {
        write!(f, "\\left(")?;
        child.fmt_latex(f)?;
        write!(f, "\\right)")
    } else {
        child.fmt_latex(f)
    }
}

impl Latex for AstNode {
    fn fmt_latex(&self, f: &mut Formatter) -> Result {
        match self {
            Self::Number(n) => fmt_number(f, *n),
            Self::Variable(name) => match name.as_str() {
                "pi" => write!(f, "\\pi"),
                name if name.chars().count() > 1 => write!(f, "\\mathrm{{{}}}", name),
                name => write!(f, "{}", name),
            },
            Self::Operator(..) if self.as_negation().is_some() => {
                let operand = self.as_negation().unwrap_or(self);
                write!(f, "-")?;
                fmt_latex_child(f, operand, operand.precedence() <= Precedence::Neg)
            },
            Self::Operator(BinOpKind::Div, lhs, rhs) => {
                write!(f, "\\frac{{")?;
                lhs.fmt_latex(f)?;
                write!(f, "}}{{")?;
                rhs.fmt_latex(f)?;
                write!(f, "}}")
            },
            Self::Operator(BinOpKind::Exp, lhs, rhs) => {
                // the exponent is grouped with braces, so it never needs parentheses
                fmt_latex_child(f, lhs, needs_parens(BinOpKind::Exp, lhs, false) || lhs.as_op(BinOpKind::Div).is_some())?;
                write!(f, "^{{")?;
                rhs.fmt_latex(f)?;
                write!(f, "}}")
            },
            Self::Operator(op, lhs, rhs) => {
                fmt_latex_child(f, lhs, needs_parens(*op, lhs, false))?;
                match op {
                    BinOpKind::Add => write!(f, " + ")?,
                    BinOpKind::Sub => write!(f, " - ")?,
                    _ => write!(f, " \\cdot ")?,
                }
                fmt_latex_child(f, rhs, needs_parens(*op, rhs, true))
            },
            Self::Function(name, args) => match (name.as_str(), args.as_slice()) {
                ("sqrt", [arg]) => {
                    write!(f, "\\sqrt{{")?;
                    arg.fmt_latex(f)?;
                    write!(f, "}}")
                },
                ("abs", [arg]) => {
                    write!(f, "\\left|")?;
                    arg.fmt_latex(f)?;
                    write!(f, "\\right|")
                },
                ("integral", [integrand, var]) => {
                    write!(f, "\\int ")?;
                    integrand.fmt_latex(f)?;
                    write!(f, " \\, d")?;
                    var.fmt_latex(f)
                },
                ("integral", [integrand, var, a, b]) => {
                    write!(f, "\\int_{{")?;
                    a.fmt_latex(f)?;
                    write!(f, "}}^{{")?;
                    b.fmt_latex(f)?;
                    write!(f, "}} ")?;
                    integrand.fmt_latex(f)?;
                    write!(f, " \\, d")?;
                    var.fmt_latex(f)
                },
                (name, args) => {
                    if LATEX_FUNCTIONS.contains(&name) {
                        write!(f, "\\{}", name)?;
                    } else {
                        write!(f, "\\operatorname{{{}}}", name)?;
                    }
                    write!(f, "\\left(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        arg.fmt_latex(f)?;
                    }
                    write!(f, "\\right)")
                },
            },
            Self::Equation(lhs, rhs) => {
                lhs.fmt_latex(f)?;
                write!(f, " = ")?;
                rhs.fmt_latex(f)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::parser::Parser;

    fn reformat(source: &str) -> String {
        Parser::new(source).try_parse_full().unwrap().to_string()
    }

    fn latex(source: &str) -> String {
        Parser::new(source).try_parse_full().unwrap().as_display().to_string()
    }

    #[test]
    fn fmt_display() {
        assert_eq!(reformat("3x + 6"), "3*x + 6");
        assert_eq!(reformat("x^2 - 5x + 6 = 0"), "x^2 - 5*x + 6 = 0");
    }

    #[test]
    fn fmt_display_parens() {
        assert_eq!(reformat("x^(3(x + 6))^9"), "x^(3*(x + 6))^9");
        assert_eq!(reformat("(x^2)^3"), "(x^2)^3");
        assert_eq!(reformat("a - (b - c)"), "a - (b - c)");
        assert_eq!(reformat("(a - b) - c"), "a - b - c");
        assert_eq!(reformat("a/(b*c)"), "a/(b*c)");
    }

    #[test]
    fn fmt_display_negation() {
        assert_eq!(reformat("-x^2"), "-x^2");
        assert_eq!(reformat("-(x + 1)"), "-(x + 1)");
        assert_eq!(reformat("x * -3"), "x*(-3)");
        assert_eq!(reformat("(-2)^x"), "(-2)^x");
        assert_eq!(reformat("2.5 sin(x, y)"), "2.5*sin(x, y)");
    }

    #[test]
    fn display_round_trips() {
        for source in ["x^2 - 5*x + 6", "-(a + b)*c", "2^3^2", "(2^3)^2", "a/b/c", "a/(b/c)", "x*(-3) - y"] {
            let once = reformat(source);
            assert_eq!(reformat(&once), once);
        }
    }

    #[test]
    fn fmt_latex() {
        assert_eq!(latex("sqrt(3x)^2"), "\\sqrt{3 \\cdot x}^{2}");
        assert_eq!(latex("1/x + 5/x^2"), "\\frac{1}{x} + \\frac{5}{x^{2}}");
        assert_eq!(latex("sin(pi x)"), "\\sin\\left(\\pi \\cdot x\\right)");
        assert_eq!(latex("gamma(x)"), "\\operatorname{gamma}\\left(x\\right)");
        assert_eq!(latex("integral(x^2, x, 0, 1)"), "\\int_{0}^{1} x^{2} \\, dx");
    }
}
