//! Classifying and solving equations.
//!
//! An equation `lhs = rhs` is first normalized to `lhs - rhs = 0` and simplified, with products
//! expanded. Integer powers of sums too large for the simplifier to expand are multiplied out
//! numerically. If the result is a polynomial in the variable, its degree decides how it is solved:
//! linear and quadratic equations are solved in closed form (symbolically, if the coefficients
//! contain other variables), and higher degrees are solved numerically. Everything else is
//! treated as transcendental and solved numerically over [`SolveOptions::search_range`].

pub mod numeric;
pub mod options;
pub mod system;

pub use options::{SolveOptions, SolveOptionsBuilder};

use cas_parser::parser::ast::AstNode;
use crate::numerical::{eval_at, func};
use super::{
    error::{kind::{NoUniqueSolution, SolverUnavailable, Unavailable}, Error},
    poly::{self, ExpandError},
    simplify::{rules::negate, simplify_with_steps, Domain},
    step::{Operation, Rule, Step},
    step_collector::StepCollector,
};
use std::fmt::{Display, Formatter};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of an equation, which decides how it is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EquationKind {
    /// A polynomial equation of degree 1.
    Linear,

    /// A polynomial equation of degree 2.
    Quadratic,

    /// A polynomial equation of degree 3 or more.
    Polynomial,

    /// An equation that is not polynomial in the variable.
    Transcendental,

    /// A system of linear equations.
    System,
}

impl Display for EquationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
            Self::Polynomial => write!(f, "polynomial"),
            Self::Transcendental => write!(f, "transcendental"),
            Self::System => write!(f, "system"),
        }
    }
}

/// The roots of an equation in one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Roots {
    /// How the equation was classified.
    pub kind: EquationKind,

    /// The solutions, in ascending order if they are numbers. May be empty if the equation has
    /// no real solutions.
    pub solutions: Vec<AstNode>,

    /// A description of the domain the solutions were searched in, with a note if no solution
    /// was found.
    pub domain: String,
}

/// Creates a [`NoUniqueSolution`] error.
pub(crate) fn no_unique_solution(reason: impl Into<String>) -> Error {
    Error::new(Vec::new(), NoUniqueSolution { reason: reason.into() })
}

/// Creates a [`SolverUnavailable`] error.
pub(crate) fn unavailable(reason: Unavailable, detail: impl Into<String>) -> Error {
    Error::new(Vec::new(), SolverUnavailable { reason, detail: detail.into() })
}

/// Records that `var = root`.
fn push_root(normalized: &AstNode, var: &str, root: &AstNode, rule: Rule, step_collector: &mut dyn StepCollector<Step>) {
    let before = AstNode::equation(normalized.clone(), AstNode::num(0.0));
    let after = AstNode::equation(AstNode::var(var), root.clone());
    step_collector.push(Step::new(Operation::Solve, rule, &before, &after));
}

/// Sorts numeric roots in ascending order and rounds the ones that are very close to an integer.
fn numeric_roots(mut roots: Vec<f64>) -> Vec<AstNode> {
    roots.sort_by(f64::total_cmp);
    roots.into_iter()
        .map(|root| AstNode::num(numeric::round_near_integer(root)))
        .collect()
}

/// Sorts roots given by a formula in ascending order. A root is rounded only if it is very close
/// to a non-zero integer, so small roots like `1e-10` are kept.
fn closed_form_roots(mut roots: Vec<f64>) -> Vec<AstNode> {
    roots.sort_by(f64::total_cmp);
    roots.into_iter()
        .map(|root| match numeric::round_near_integer(root) {
            rounded if rounded != 0.0 => AstNode::num(rounded),
            _ => AstNode::num(root),
        })
        .collect()
}

/// `c1*x + c0 = 0` gives `x = -c0/c1`.
fn linear(coeffs: &[AstNode], options: &SolveOptions) -> Vec<AstNode> {
    let root = AstNode::div(negate(&coeffs[0]), coeffs[1].clone());
    let root = simplify_with_steps(&root, &options.simplify_options(), &mut ());
    match root.as_number() {
        Some(n) => closed_form_roots(vec![n]),
        None => vec![root],
    }
}

/// `a*x^2 + b*x + c = 0` gives `x = (-b +- sqrt(b^2 - 4ac))/(2a)`.
///
/// Both roots are returned, even if they are equal. If the discriminant is negative, there are
/// no real roots and the returned list is empty.
fn quadratic(coeffs: &[AstNode], options: &SolveOptions) -> Vec<AstNode> {
    if let Some(&[c, b, a]) = poly::numeric(coeffs).as_deref() {
        let discriminant = b * b - 4.0 * a * c;
        let scale = (b * b).max((4.0 * a * c).abs());
        let discriminant = if discriminant.abs() <= 1e-12 * scale { 0.0 } else { discriminant };
        debug!(discriminant, "quadratic discriminant");
        if discriminant < 0.0 {
            return Vec::new();
        }

        // q = -(b +- sqrt)/2 with the sign of b avoids cancellation, and the other root is c/q
        let q = -0.5 * (b + b.signum() * discriminant.sqrt());
        let other = if q == 0.0 { 0.0 } else { c / q };
        return closed_form_roots(vec![q / a, other]);
    }

    let (c, b, a) = (&coeffs[0], &coeffs[1], &coeffs[2]);
    let discriminant = AstNode::sub(
        AstNode::pow(b.clone(), AstNode::num(2.0)),
        AstNode::mul(AstNode::num(4.0), AstNode::mul(a.clone(), c.clone())),
    );
    let sqrt = AstNode::call1("sqrt", discriminant);
    let denom = AstNode::mul(AstNode::num(2.0), a.clone());
    [
        AstNode::sub(negate(b), sqrt.clone()),
        AstNode::add(negate(b), sqrt),
    ]
        .into_iter()
        .map(|numer| simplify_with_steps(&AstNode::div(numer, denom.clone()), &options.simplify_options(), &mut ()))
        .collect()
}

/// Finds the real roots of a polynomial of degree 3 or more numerically.
fn polynomial(coeffs: &[AstNode], var: &str, options: &SolveOptions) -> Result<Vec<AstNode>, Error> {
    let coeffs = poly::numeric(coeffs).ok_or_else(|| unavailable(
        Unavailable::NeedsNumericalMethod,
        format!("the polynomial in `{}` has coefficients that contain other variables", var),
    ))?;
    Ok(numeric_roots(numeric::polynomial_roots(&coeffs, options.tolerance)))
}

/// Finds the real roots of a non-polynomial equation numerically, by scanning the search range.
fn transcendental(normalized: &AstNode, var: &str, options: &SolveOptions) -> Result<Vec<AstNode>, Error> {
    if let Some(name) = normalized.functions().into_iter().find(|name| !func::is_known(name)) {
        return Err(unavailable(
            Unavailable::Unsolved,
            format!("`{}` cannot be evaluated numerically", name),
        ));
    }
    if let Some(other) = normalized.variables().into_iter().find(|name| name != var) {
        return Err(unavailable(
            Unavailable::NeedsNumericalMethod,
            format!("the equation also depends on `{}`", other),
        ));
    }

    let roots = numeric::scan_roots(
        |x| eval_at(normalized, var, x).ok(),
        options.search_range,
        options.samples,
        options.tolerance,
    );
    Ok(numeric_roots(roots))
}

/// Returns `lhs - rhs` for an equation `lhs = rhs`, or the expression itself, which is treated as
/// `expr = 0`.
fn difference(node: &AstNode) -> AstNode {
    match node {
        AstNode::Equation(lhs, rhs) => AstNode::sub(lhs.as_ref().clone(), rhs.as_ref().clone()),
        _ => node.clone(),
    }
}

/// Moves every term of the equation to the left-hand side and simplifies it.
pub(crate) fn normalize(node: &AstNode, options: &SolveOptions, step_collector: &mut dyn StepCollector<Step>) -> AstNode {
    let normalized = simplify_with_steps(&difference(node), &options.simplify_options(), step_collector);
    step_collector.push(Step::new(
        Operation::Solve,
        Rule::Normalize,
        node,
        &AstNode::equation(normalized.clone(), AstNode::num(0.0)),
    ));
    normalized
}

/// Returns the coefficients of the normalized equation as a polynomial in the variable, or
/// [`None`] if it is not one.
fn polynomial_coefficients(normalized: &AstNode, var: &str) -> Result<Option<Vec<AstNode>>, Error> {
    if let Some(coeffs) = poly::coefficients(normalized, var) {
        return Ok(Some(coeffs));
    }

    match poly::expand_numeric(normalized, var) {
        Ok(coeffs) => {
            debug!(degree = coeffs.len() - 1, "expanded polynomial numerically");
            Ok(Some(coeffs.into_iter().map(AstNode::num).collect()))
        },
        Err(ExpandError::DegreeTooHigh) => Err(unavailable(
            Unavailable::NeedsNumericalMethod,
            format!("the polynomial in `{}` has a degree above {}", var, poly::MAX_DEGREE),
        )),
        Err(ExpandError::NotPolynomial) => Ok(None),
    }
}

/// Solves the equation for the given variable.
///
/// Returns [`Err`] with [`NoUniqueSolution`] if the variable cancels out of the equation, and
/// with [`SolverUnavailable`] if the equation needs a numerical method but contains other
/// variables, or contains a function that cannot be evaluated.
pub fn solve(
    node: &AstNode,
    var: &str,
    options: &SolveOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Roots, Error> {
    let normalized = normalize(node, options, step_collector);

    let coeffs = polynomial_coefficients(&normalized, var)?;
    let degree = coeffs.as_ref().map(|coeffs| coeffs.len() - 1);
    if !normalized.contains_variable(var) || degree == Some(0) {
        let identity = normalized.is_zero() || coeffs.as_ref().is_some_and(|coeffs| coeffs[0].is_zero());
        return Err(no_unique_solution(if identity {
            format!("every value of `{}` satisfies this equation", var)
        } else {
            format!("no value of `{}` satisfies this equation", var)
        }));
    }

    let (kind, rule, solutions) = match (coeffs, degree) {
        (Some(coeffs), Some(1)) => (EquationKind::Linear, Rule::LinearFormula, linear(&coeffs, options)),
        (Some(coeffs), Some(2)) => (EquationKind::Quadratic, Rule::QuadraticFormula, quadratic(&coeffs, options)),
        (Some(coeffs), _) => (EquationKind::Polynomial, Rule::NumericRoots, polynomial(&coeffs, var, options)?),
        (None, _) => (EquationKind::Transcendental, Rule::NumericRoots, transcendental(&normalized, var, options)?),
    };
    debug!(%kind, solutions = solutions.len(), "classified equation");

    let found = solutions.len();
    let solutions = solutions.into_iter()
        .filter(|root| !(options.domain == Domain::Positive && root.as_number().is_some_and(|n| n <= 0.0)))
        .collect::<Vec<_>>();
    solutions.iter().for_each(|root| push_root(&normalized, var, root, rule, step_collector));

    let domain = if solutions.is_empty() {
        match kind {
            _ if found > 0 => format!("{} (every root found is outside the domain)", options.domain),
            EquationKind::Quadratic => format!("{} (no real roots: the discriminant is negative)", options.domain),
            EquationKind::Transcendental => {
                let (lo, hi) = options.search_range;
                format!("{} (no roots found in [{}, {}])", options.domain, lo, hi)
            },
            _ => format!("{} (no real roots)", options.domain),
        }
    } else {
        options.domain.to_string()
    };

    Ok(Roots { kind, solutions, domain })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use cas_parser::parse_expression;
    use crate::symbolic::error::kind::UnsupportedOperation;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstNode {
        parse_expression(source).ast.unwrap()
    }

    fn solve_with(source: &str, options: SolveOptions) -> Result<Roots, Error> {
        solve(&parse(source), "x", &options, &mut ())
    }

    fn solve_default(source: &str) -> Result<Roots, Error> {
        solve_with(source, SolveOptions::default())
    }

    fn values(roots: &Roots) -> Vec<f64> {
        roots.solutions.iter().map(|root| root.as_number().unwrap()).collect()
    }

    #[test]
    fn linear_equation() {
        let roots = solve_default("2x + 3 = 7").unwrap();
        assert_eq!(roots.kind, EquationKind::Linear);
        assert_eq!(values(&roots), vec![2.0]);
        assert_eq!(roots.domain, "real");
    }

    #[test]
    fn symbolic_linear_equation() {
        let roots = solve_default("a*x + b = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Linear);
        let root = roots.solutions[0].substitute("a", &AstNode::num(2.0)).substitute("b", &AstNode::num(3.0));
        assert_float_absolute_eq!(eval_at(&root, "x", 0.0).unwrap(), -1.5, 1e-12);
    }

    #[test]
    fn quadratic_equation() {
        let roots = solve_default("x^2 - 5x + 6 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Quadratic);
        assert_eq!(values(&roots), vec![2.0, 3.0]);
    }

    #[test]
    fn quadratic_double_root() {
        let roots = solve_default("x^2 - 2x + 1 = 0").unwrap();
        assert_eq!(values(&roots), vec![1.0, 1.0]);
    }

    #[test]
    fn quadratic_without_real_roots() {
        let roots = solve_default("x^2 + 1 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Quadratic);
        assert!(roots.solutions.is_empty());
        assert!(roots.domain.contains("no real roots"));
    }

    #[test]
    fn quadratic_from_product() {
        let roots = solve_default("(x + 1)(x - 4) = 0").unwrap();
        assert_eq!(values(&roots), vec![-1.0, 4.0]);
    }

    #[test]
    fn quadratic_with_small_coefficients() {
        let roots = solve_default("0.0000001x^2 - 0.0000001 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Quadratic);
        assert_eq!(values(&roots), vec![-1.0, 1.0]);

        let roots = solve_default("0.000001x^2 - 0.000002x + 0.000001 = 0").unwrap();
        assert_eq!(values(&roots), vec![1.0, 1.0]);
    }

    #[test]
    fn quadratic_in_scientific_notation() {
        let roots = solve_default("x^2 - 1e6 = 0").unwrap();
        assert_eq!(values(&roots), vec![-1000.0, 1000.0]);

        let roots = solve_default("x^2 = 1e-20").unwrap();
        let values = values(&roots);
        assert_eq!(values.len(), 2);
        assert_float_absolute_eq!(values[0], -1e-10, 1e-20);
        assert_float_absolute_eq!(values[1], 1e-10, 1e-20);
    }

    #[test]
    fn symbolic_quadratic() {
        let roots = solve_default("x^2 - a = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Quadratic);
        assert_eq!(roots.solutions.len(), 2);
        let at_four = roots.solutions.iter()
            .map(|root| eval_at(&root.substitute("a", &AstNode::num(4.0)), "x", 0.0).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(at_four, vec![-2.0, 2.0]);
    }

    #[test]
    fn cubic_equation() {
        let roots = solve_default("x^3 - 6x^2 + 11x - 6 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Polynomial);
        assert_eq!(values(&roots), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn high_powers_of_sums() {
        let roots = solve_default("(x + 1)^10 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Polynomial);
        assert_eq!(values(&roots), vec![-1.0]);

        let roots = solve_default("(x - 2)^7 = 0").unwrap();
        assert_eq!(roots.kind, EquationKind::Polynomial);
        assert_eq!(values(&roots), vec![2.0]);

        let roots = solve_default("(x + 1)^10 = 1").unwrap();
        assert_eq!(roots.kind, EquationKind::Polynomial);
        assert_eq!(values(&roots), vec![-2.0, 0.0]);
    }

    #[test]
    fn degree_above_limit() {
        let err = solve_default("x^65 = 1").unwrap_err();
        let kind = err.downcast_ref::<SolverUnavailable>().unwrap();
        assert_eq!(kind.reason, Unavailable::NeedsNumericalMethod);
    }

    #[test]
    fn transcendental_equation() {
        let roots = solve_default("exp(x) = 2").unwrap();
        assert_eq!(roots.kind, EquationKind::Transcendental);
        assert_float_absolute_eq!(values(&roots)[0], 2f64.ln(), 1e-9);
    }

    #[test]
    fn reciprocal_rejects_pole() {
        let roots = solve_default("1/x = 2").unwrap();
        assert_eq!(roots.kind, EquationKind::Transcendental);
        let values = values(&roots);
        assert_eq!(values.len(), 1);
        assert_float_absolute_eq!(values[0], 0.5, 1e-9);
    }

    #[test]
    fn positive_domain_filters_roots() {
        let options = SolveOptionsBuilder::new().domain(Domain::Positive).build();
        let roots = solve_with("x^2 = 4", options).unwrap();
        assert_eq!(values(&roots), vec![2.0]);
        assert_eq!(roots.domain, "positive");
    }

    #[test]
    fn positive_domain_filters_every_root() {
        let options = SolveOptionsBuilder::new().domain(Domain::Positive).build();
        let roots = solve_with("x^2 + 5x + 6 = 0", options).unwrap();
        assert!(roots.solutions.is_empty());
        assert_eq!(roots.domain, "positive (every root found is outside the domain)");
    }

    #[test]
    fn identity_and_contradiction() {
        for source in ["x + 1 = x", "x = x", "2 = 3"] {
            let err = solve_default(source).unwrap_err();
            assert!(err.is::<NoUniqueSolution>(), "`{source}` should have no unique solution");
        }
    }

    #[test]
    fn needs_numerical_method() {
        for source in ["sin(x) = y", "x^3 + a*x = 1"] {
            let err = solve_default(source).unwrap_err();
            let kind = err.downcast_ref::<SolverUnavailable>().unwrap();
            assert_eq!(kind.reason, Unavailable::NeedsNumericalMethod);
        }
    }

    #[test]
    fn unknown_function_is_unsolved() {
        let err = solve_default("gamma(x) = 1").unwrap_err();
        let kind = err.downcast_ref::<SolverUnavailable>().unwrap();
        assert_eq!(kind.reason, Unavailable::Unsolved);
        assert!(!err.is::<UnsupportedOperation>());
    }

    #[test]
    fn steps_end_with_solutions() {
        let mut steps = Vec::new();
        solve(&parse("x^2 - 5x + 6 = 0"), "x", &SolveOptions::default(), &mut steps).unwrap();
        assert!(steps.iter().any(|step| step.rule == Rule::Normalize));
        let last = steps.last().unwrap();
        assert_eq!(last.rule, Rule::QuadraticFormula);
        assert_eq!(last.after.to_string(), "x = 3");
    }
}
