//! Solving systems of linear equations.

use cas_parser::parser::ast::AstNode;
use crate::numerical::try_numeric;
use crate::symbolic::{
    error::{kind::Unavailable, Error},
    step::{Operation, Rule, Step},
    step_collector::StepCollector,
    term::{sum_terms, Term},
};
use super::{no_unique_solution, normalize, numeric::round_near_integer, unavailable, SolveOptions};
use tracing::debug;

/// A pivot with an absolute value below this is treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-9;

/// Reads off one row of the coefficient matrix from a normalized equation `expr = 0`. Returns
/// the coefficient of each variable and the constant term.
fn linear_row(node: &AstNode, index: usize, vars: &[String]) -> Result<(Vec<f64>, f64), Error> {
    let depends = |factor: &AstNode| vars.iter().any(|var| factor.contains_variable(var));
    let not_linear = || unavailable(
        Unavailable::Unsolved,
        format!("equation {} is not linear in {}", index + 1, vars.join(", ")),
    );

    let terms = sum_terms(node).ok_or_else(not_linear)?;
    let mut row = vec![0.0; vars.len()];
    let mut constant = 0.0;
    for term in terms {
        if term.den.iter().any(depends) {
            return Err(not_linear());
        }

        let (dependent, rest): (Vec<AstNode>, Vec<AstNode>) = term.num.into_iter().partition(depends);
        let coefficient = Term { coeff: term.coeff, num: rest, den: term.den };
        let value = try_numeric(&coefficient.to_node()).ok_or_else(|| unavailable(
            Unavailable::NeedsNumericalMethod,
            format!("equation {} has a coefficient `{}` that is not a number", index + 1, coefficient.to_node()),
        ))?;

        match dependent.as_slice() {
            [] => constant += value,
            [factor] => {
                let position = factor.as_variable()
                    .and_then(|name| vars.iter().position(|var| var == name))
                    .ok_or_else(not_linear)?;
                row[position] += value;
            },
            _ => return Err(not_linear()),
        }
    }
    Ok((row, constant))
}

/// Solves `matrix * x = rhs` by Gaussian elimination with partial pivoting, followed by back
/// substitution.
///
/// Returns [`None`] if a pivot is smaller than [`PIVOT_EPSILON`] in absolute value, meaning the
/// matrix is singular (or too close to singular to solve reliably).
pub fn gaussian_elimination(mut matrix: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Option<Vec<f64>> {
    let n = matrix.len();

    // forward elimination
    for col in 0..n {
        let pivot_row = (col..n).max_by(|&a, &b| matrix[a][col].abs().total_cmp(&matrix[b][col].abs()))?;
        if matrix[pivot_row][col].abs() < PIVOT_EPSILON {
            return None;
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = matrix[row][col] / matrix[col][col];
            if factor == 0.0 {
                continue;
            }
            for j in col..n {
                let delta = factor * matrix[col][j];
                matrix[row][j] -= delta;
            }
            let delta = factor * rhs[col];
            rhs[row] -= delta;
        }
    }

    // back substitution
    let mut solution = vec![0.0; n];
    for i in (0..n).rev() {
        let known = (i + 1..n).map(|j| matrix[i][j] * solution[j]).sum::<f64>();
        solution[i] = (rhs[i] - known) / matrix[i][i];
    }
    Some(solution)
}

/// Solves a system of linear equations for the given variables.
///
/// Each equation is normalized to `expr = 0` and must be linear in the variables with numeric
/// coefficients. The solutions are returned as equations `var = value`, in the order of the
/// variables.
pub fn solve_system(
    equations: &[AstNode],
    vars: &[String],
    options: &SolveOptions,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Vec<AstNode>, Error> {
    if equations.len() != vars.len() || vars.is_empty() {
        return Err(no_unique_solution(format!(
            "the system has {} equation(s) in {} unknown(s)",
            equations.len(),
            vars.len(),
        )));
    }

    let mut matrix = Vec::with_capacity(equations.len());
    let mut rhs = Vec::with_capacity(equations.len());
    for (index, equation) in equations.iter().enumerate() {
        let normalized = normalize(equation, options, step_collector);
        let (row, constant) = linear_row(&normalized, index, vars)?;
        matrix.push(row);
        rhs.push(-constant);
    }
    debug!(?matrix, ?rhs, "extracted linear system");

    let solution = gaussian_elimination(matrix, rhs)
        .ok_or_else(|| no_unique_solution("the system is singular"))?;

    Ok(vars.iter()
        .zip(solution)
        .map(|(var, value)| {
            let out = AstNode::equation(AstNode::var(var.as_str()), AstNode::num(round_near_integer(value)));
            step_collector.push(Step::new(Operation::Solve, Rule::GaussianElimination, &AstNode::var(var.as_str()), &out));
            out
        })
        .collect())
}
