use cas_parser::parser::{ast::AstNode, fmt::Latex};
use crate::numerical::try_numeric;
use crate::symbolic::{solve::EquationKind, step::Step};
use std::fmt::{Display, Formatter, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Facts about a result tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    /// The number of nodes in the tree.
    pub complexity: usize,

    /// The symbols of the operators in the tree, such as `+` and `^`.
    pub operators_used: Vec<String>,

    /// The sorted names of the free variables in the tree.
    pub variables: Vec<String>,

    /// The sorted names of the functions called in the tree.
    pub functions: Vec<String>,
}

impl Metadata {
    /// Collects the metadata of the given tree.
    pub fn of(node: &AstNode) -> Self {
        Self {
            complexity: node.complexity(),
            operators_used: node.operators_used(),
            variables: node.variables(),
            functions: node.functions(),
        }
    }
}

/// The result of simplifying, differentiating or integrating an expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CasResult {
    /// The source text of the input.
    pub original: String,

    /// The resulting expression.
    pub result: AstNode,

    /// Every transformation that was applied, in order.
    pub steps: Vec<Step>,

    /// The result rendered as LaTeX.
    pub latex: Option<String>,

    /// The numeric value of the result, if it has no free variables.
    pub numeric: Option<f64>,

    /// Facts about the result tree.
    pub metadata: Metadata,
}

impl CasResult {
    /// Bundles the result of an operation.
    pub(crate) fn new(original: &str, result: AstNode, steps: Vec<Step>) -> Self {
        Self {
            original: original.to_owned(),
            latex: Some(result.as_display().to_string()),
            numeric: try_numeric(&result),
            metadata: Metadata::of(&result),
            result,
            steps,
        }
    }
}

impl Display for CasResult {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.result)
    }
}

/// The solutions of an equation, or of a system of equations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquationSolution {
    /// The variable that was solved for. For systems, the variables joined with `, `.
    pub variable: String,

    /// The solutions. For systems, each solution is an equation `var = value`.
    pub solutions: Vec<AstNode>,

    /// How the equation was classified.
    pub kind: EquationKind,

    /// The domain the solutions were searched in, with a note if there are none.
    pub domain: String,

    /// Every transformation that was applied, in order.
    pub steps: Vec<Step>,
}

impl Display for EquationSolution {
    fn fmt(&self, f: &mut Formatter) -> Result {
        if self.solutions.is_empty() {
            return write!(f, "no solutions for {} in {}", self.variable, self.domain);
        }

        for (i, solution) in self.solutions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match solution {
                AstNode::Equation(..) => write!(f, "{}", solution)?,
                _ => write!(f, "{} = {}", self.variable, solution)?,
            }
        }
        Ok(())
    }
}

/// A Taylor expansion of an expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SeriesExpansion {
    /// The source text of the expanded expression.
    pub source: String,

    /// The point the expansion is centered at.
    pub center: f64,

    /// The highest degree of the expansion.
    pub order: u32,

    /// The non-zero terms, lowest degree first.
    pub terms: Vec<AstNode>,

    /// The first omitted term, which estimates the error of the expansion.
    pub remainder: AstNode,

    /// The estimated radius of convergence, from the ratio of the last two non-zero
    /// coefficients. Infinite if there are fewer than two.
    pub convergence_radius: f64,

    /// `coefficients[n]` is the n-th derivative at the center divided by `n!`.
    pub coefficients: Vec<f64>,

    /// The sum of the terms.
    pub polynomial: AstNode,

    /// Every transformation that was applied, in order.
    pub steps: Vec<Step>,
}

impl Display for SeriesExpansion {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "{}", self.polynomial)?;
        if !self.remainder.is_zero() {
            write!(f, " + O({})", self.remainder)?;
        }
        Ok(())
    }
}
