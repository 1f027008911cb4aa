//! Entry points that take source text and return result records.
//!
//! Each function parses its input with [`parse_expression`], runs one operation from
//! [`symbolic`](crate::symbolic), and bundles the result with the steps taken. The `*_with`
//! variants take option structs; the others use the defaults.
//!
//! ```
//! use cas_compute::api;
//!
//! let solution = api::solve_equation("x^2 - 5x + 6 = 0", "x").unwrap();
//! assert_eq!(solution.to_string(), "x = 2, x = 3");
//! ```

mod error;
mod result;

pub use error::Error;
pub use result::{CasResult, EquationSolution, Metadata, SeriesExpansion};

use cas_parser::{parse_expression, parser::ast::AstNode};
use crate::symbolic::{
    derivative::nth_derivative,
    integral,
    series::taylor,
    simplify::{simplify_with_steps, SimplifyOptions},
    solve::{self, system::solve_system, EquationKind, SolveOptions},
    step::Step,
};
use tracing::{info, instrument};

/// Parses the input, returning every parser error if it is not valid.
fn parse(input: &str) -> Result<AstNode, Error> {
    let output = parse_expression(input);
    match output.ast {
        Some(ast) if output.errors.is_empty() => Ok(ast),
        _ => Err(Error::Parse(output.errors)),
    }
}

/// Runs the given operation with a fresh step log. If it fails, the steps taken so far are
/// returned with the error.
fn run<T>(
    input: &str,
    op: impl FnOnce(&mut Vec<Step>) -> Result<T, cas_error::Error>,
) -> Result<(T, Vec<Step>), Error> {
    let mut steps = Vec::new();
    match op(&mut steps) {
        Ok(value) => Ok((value, steps)),
        Err(error) => Err(Error::compute(input, error, steps)),
    }
}

/// Simplifies the expression with the default options.
pub fn simplify(input: &str) -> Result<CasResult, Error> {
    simplify_with(input, &SimplifyOptions::default())
}

/// Simplifies the expression with the given options.
#[instrument(level = "info", skip(options))]
pub fn simplify_with(input: &str, options: &SimplifyOptions) -> Result<CasResult, Error> {
    let node = parse(input)?;
    let mut steps = Vec::new();
    let result = simplify_with_steps(&node, options, &mut steps);
    info!(%result, steps = steps.len(), "simplified");
    Ok(CasResult::new(input, result, steps))
}

/// Computes the first derivative of the expression with respect to the given variable.
pub fn differentiate(input: &str, var: &str) -> Result<CasResult, Error> {
    differentiate_with(input, var, 1, &SimplifyOptions::default())
}

/// Computes the derivative of the given order. The derivative is simplified once, after the last
/// differentiation.
#[instrument(level = "info", skip(options))]
pub fn differentiate_with(
    input: &str,
    var: &str,
    order: u32,
    options: &SimplifyOptions,
) -> Result<CasResult, Error> {
    let node = parse(input)?;
    let (result, steps) = run(input, |steps| nth_derivative(&node, var, order, options, steps))?;
    info!(%result, steps = steps.len(), "differentiated");
    Ok(CasResult::new(input, result, steps))
}

/// Computes the indefinite integral of the expression with respect to the given variable.
pub fn integrate(input: &str, var: &str) -> Result<CasResult, Error> {
    integrate_with(input, var, None, &SimplifyOptions::default())
}

/// Computes the indefinite integral of the expression, or the definite integral if bounds are
/// given.
///
/// If a definite integral has no antiderivative in closed form, the result is the unevaluated
/// `integral(f, x, a, b)` call and [`CasResult::numeric`] is [`None`].
#[instrument(level = "info", skip(options))]
pub fn integrate_with(
    input: &str,
    var: &str,
    bounds: Option<(f64, f64)>,
    options: &SimplifyOptions,
) -> Result<CasResult, Error> {
    let node = parse(input)?;
    match bounds {
        Some(bounds) => {
            let ((result, value), steps) = run(input, |steps| {
                integral::definite(&node, var, bounds, options, steps)
            })?;
            info!(%result, ?value, steps = steps.len(), "integrated");
            Ok(CasResult { numeric: value, ..CasResult::new(input, result, steps) })
        },
        None => {
            let (result, steps) = run(input, |steps| integral::indefinite(&node, var, options, steps))?;
            info!(%result, steps = steps.len(), "integrated");
            Ok(CasResult::new(input, result, steps))
        },
    }
}

/// Solves the equation for the given variable with the default options. An expression without
/// `=` is solved as `expr = 0`.
pub fn solve_equation(input: &str, var: &str) -> Result<EquationSolution, Error> {
    solve_equation_with(input, var, &SolveOptions::default())
}

/// Solves the equation for the given variable with the given options.
#[instrument(level = "info", skip(options))]
pub fn solve_equation_with(input: &str, var: &str, options: &SolveOptions) -> Result<EquationSolution, Error> {
    let node = parse(input)?;
    let (roots, steps) = run(input, |steps| solve::solve(&node, var, options, steps))?;
    info!(kind = %roots.kind, solutions = roots.solutions.len(), "solved");
    Ok(EquationSolution {
        variable: var.to_owned(),
        solutions: roots.solutions,
        kind: roots.kind,
        domain: roots.domain,
        steps,
    })
}

/// Solves a square system of linear equations for the given variables.
pub fn solve_linear_system(equations: &[&str], vars: &[&str]) -> Result<EquationSolution, Error> {
    solve_linear_system_with(equations, vars, &SolveOptions::default())
}

/// Solves a square system of linear equations for the given variables with the given options.
///
/// The solutions are equations `var = value`, in the order of the variables.
#[instrument(level = "info", skip(options))]
pub fn solve_linear_system_with(
    equations: &[&str],
    vars: &[&str],
    options: &SolveOptions,
) -> Result<EquationSolution, Error> {
    let mut nodes = Vec::with_capacity(equations.len());
    let mut errors = Vec::new();
    for equation in equations {
        match parse(equation) {
            Ok(node) => nodes.push(node),
            Err(Error::Parse(errs)) => errors.extend(errs),
            Err(err) => return Err(err),
        }
    }
    if !errors.is_empty() {
        return Err(Error::Parse(errors));
    }

    let input = equations.join("; ");
    let vars = vars.iter().map(|var| var.to_string()).collect::<Vec<_>>();
    let (solutions, steps) = run(&input, |steps| solve_system(&nodes, &vars, options, steps))?;
    info!(solutions = solutions.len(), "solved system");
    Ok(EquationSolution {
        variable: vars.join(", "),
        solutions,
        kind: EquationKind::System,
        domain: options.domain.to_string(),
        steps,
    })
}

/// Computes the Taylor expansion of the expression around `center`, up to and including the term
/// of degree `order`.
pub fn expand_series(input: &str, var: &str, center: f64, order: u32) -> Result<SeriesExpansion, Error> {
    expand_series_with(input, var, center, order, &SimplifyOptions::default())
}

/// Computes the Taylor expansion of the expression with the given simplification options.
#[instrument(level = "info", skip(options))]
pub fn expand_series_with(
    input: &str,
    var: &str,
    center: f64,
    order: u32,
    options: &SimplifyOptions,
) -> Result<SeriesExpansion, Error> {
    let node = parse(input)?;
    let (series, steps) = run(input, |steps| taylor(&node, var, center, order, options, steps))?;
    info!(terms = series.terms.len(), radius = series.convergence_radius, "expanded series");
    Ok(SeriesExpansion {
        source: input.to_owned(),
        center,
        order,
        terms: series.terms,
        remainder: series.remainder,
        convergence_radius: series.convergence_radius,
        coefficients: series.coefficients,
        polynomial: series.polynomial,
        steps,
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::*;
    use pretty_assertions::assert_eq;
    use crate::symbolic::{
        error::kind::{NoUniqueSolution, UnsupportedOperation},
        simplify::TargetForm,
        step::{Operation, Rule},
    };
    use super::*;

    fn strings(nodes: &[AstNode]) -> Vec<String> {
        nodes.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn simplify_collects_metadata() {
        let result = simplify("2 sin(x) + 3 sin(x) + 0").unwrap();
        assert_eq!(result.original, "2 sin(x) + 3 sin(x) + 0");
        assert_eq!(result.result.to_string(), "5*sin(x)");
        assert_eq!(result.latex.as_deref(), Some("5 \\cdot \\sin\\left(x\\right)"));
        assert_eq!(result.numeric, None);
        assert_eq!(result.metadata, Metadata {
            complexity: 4,
            operators_used: vec!["*".to_owned()],
            variables: vec!["x".to_owned()],
            functions: vec!["sin".to_owned()],
        });
        assert!(result.steps.iter().all(|step| step.operation == Operation::Simplify));
        assert_eq!(result.steps.first().map(|step| step.index), Some(1));
    }

    #[test]
    fn simplify_numeric_value() {
        let result = simplify("sin(pi/6) + 1/2").unwrap();
        assert_eq!(result.result.to_string(), "1");
        assert_eq!(result.numeric, Some(1.0));
    }

    #[test]
    fn simplify_expanded() {
        let options = TargetForm::Expanded.inside(SimplifyOptions::default());
        let result = simplify_with("(x + 1)^2", &options).unwrap();
        assert_eq!(result.result.to_string(), "x^2 + 2*x + 1");
    }

    #[test]
    fn parse_errors_short_circuit() {
        let err = simplify("2 + ").unwrap_err();
        assert!(matches!(err, Error::Parse(ref errs) if !errs.is_empty()));
        assert!(err.steps().is_empty());

        let err = solve_linear_system(&["x + y = 1", "x - = 2"], &["x", "y"]).unwrap_err();
        assert!(matches!(err, Error::Parse(ref errs) if errs.len() == 1));
    }

    #[test]
    fn differentiate_cubic() {
        let result = differentiate("x^3", "x").unwrap();
        assert_eq!(result.result.to_string(), "3*x^2");
        assert_eq!(result.steps[0].operation, Operation::Differentiate);
        assert_eq!(result.steps[0].rule, Rule::PowerRule);
    }

    #[test]
    fn differentiate_product() {
        let result = differentiate("x * sin(x)", "x").unwrap();
        assert_eq!(result.result.to_string(), "sin(x) + x*cos(x)");
    }

    #[test]
    fn differentiate_second_order() {
        let result = differentiate_with("x^4", "x", 2, &SimplifyOptions::default()).unwrap();
        assert_eq!(result.result.to_string(), "12*x^2");
    }

    #[test]
    fn differentiate_unknown_function() {
        let err = differentiate("gamma(x)", "x").unwrap_err();
        let Error::Compute { error, .. } = &err else {
            panic!("expected a compute error, got {:?}", err);
        };
        let kind = error.downcast_ref::<UnsupportedOperation>().unwrap();
        assert_eq!(kind.symbol, "gamma");
        assert_eq!(error.spans, vec![0..8]);
    }

    #[test]
    fn integrate_indefinite() {
        let result = integrate("2x", "x").unwrap();
        assert_eq!(result.result.to_string(), "x^2 + C");
        assert_eq!(result.steps.last().map(|step| step.rule), Some(Rule::IntegrationConstant));
    }

    #[test]
    fn integrate_definite() {
        let result = integrate_with("x^2", "x", Some((0.0, 3.0)), &SimplifyOptions::default()).unwrap();
        assert_float_absolute_eq!(result.numeric.unwrap(), 9.0, 1e-9);
    }

    #[test]
    fn integrate_definite_unevaluated() {
        let result = integrate_with("sin(x^2)", "x", Some((0.0, 1.0)), &SimplifyOptions::default()).unwrap();
        assert_eq!(result.result.to_string(), "integral(sin(x^2), x, 0, 1)");
        assert_eq!(result.numeric, None);
    }

    #[test]
    fn solve_quadratic() {
        let solution = solve_equation("x^2 - 5x + 6 = 0", "x").unwrap();
        assert_eq!(solution.kind, EquationKind::Quadratic);
        assert_eq!(strings(&solution.solutions), vec!["2", "3"]);
        assert_eq!(solution.to_string(), "x = 2, x = 3");
    }

    #[test]
    fn solve_identity() {
        let err = solve_equation("x + 1 = x + 1", "x").unwrap_err();
        let Error::Compute { error, steps } = &err else {
            panic!("expected a compute error, got {:?}", err);
        };
        assert!(error.is::<NoUniqueSolution>());
        assert_eq!(steps.last().map(|step| step.rule), Some(Rule::Normalize));
    }

    #[test]
    fn solve_system() {
        let solution = solve_linear_system(&["2x + y = 5", "x - y = 1"], &["x", "y"]).unwrap();
        assert_eq!(solution.variable, "x, y");
        assert_eq!(solution.kind, EquationKind::System);
        assert_eq!(strings(&solution.solutions), vec!["x = 2", "y = 1"]);
        assert_eq!(solution.to_string(), "x = 2, y = 1");
    }

    #[test]
    fn solve_singular_system() {
        let err = solve_linear_system(&["x + y = 1", "2x + 2y = 2"], &["x", "y"]).unwrap_err();
        assert!(err.errors()[0].is::<NoUniqueSolution>());
    }

    #[test]
    fn series_of_exp() {
        let series = expand_series("exp(x)", "x", 0.0, 3).unwrap();
        assert_eq!(series.source, "exp(x)");
        assert_eq!(strings(&series.terms), vec!["1", "x", "x^2/2", "x^3/6"]);
        assert_eq!(series.remainder.to_string(), "x^4/24");
        assert_eq!(series.to_string(), "1 + x + x^2/2 + x^3/6 + O(x^4/24)");
        assert_float_absolute_eq!(series.coefficients[3], 1.0 / 6.0, 1e-12);
    }
}
