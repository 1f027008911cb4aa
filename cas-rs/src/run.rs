use cas_compute::api::{self, CasResult, EquationSolution, SeriesExpansion};
use cas_compute::symbolic::step::Step;
use cas_parser::parser::fmt::Latex;
use crate::{cli::Command, config::Config, error::Error};
use std::fmt::Write;

/// An operation requested from the command line or the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Simplify {
        expr: String,
    },
    Diff {
        expr: String,
        var: String,
        order: u32,
    },
    Integrate {
        expr: String,
        var: String,
        bounds: Option<(f64, f64)>,
    },
    Solve {
        equation: String,
        var: String,
        range: Option<(f64, f64)>,
    },
    System {
        equations: Vec<String>,
        vars: Vec<String>,
    },
    Series {
        expr: String,
        var: String,
        center: f64,
        order: u32,
    },
}

impl Request {
    /// Builds the request for a subcommand. Returns [`None`] for [`Command::Repl`].
    pub fn from_command(command: Command) -> Option<Self> {
        Some(match command {
            Command::Simplify { expr } => Self::Simplify { expr },
            Command::Diff { expr, var, order } => Self::Diff { expr, var, order },
            Command::Integrate { expr, var, from, to } => Self::Integrate {
                expr,
                var,
                bounds: from.zip(to),
            },
            Command::Solve { equation, var, range } => Self::Solve {
                equation,
                var,
                range: range.and_then(|range| match range.as_slice() {
                    &[lo, hi] => Some((lo, hi)),
                    _ => None,
                }),
            },
            Command::System { equations, vars } => Self::System { equations, vars },
            Command::Series { expr, var, center, order } => Self::Series { expr, var, center, order },
            Command::Repl => return None,
        })
    }

    /// The source text the request operates on, used to highlight errors.
    pub fn input(&self) -> String {
        match self {
            Self::Simplify { expr }
            | Self::Diff { expr, .. }
            | Self::Integrate { expr, .. }
            | Self::Series { expr, .. } => expr.clone(),
            Self::Solve { equation, .. } => equation.clone(),
            Self::System { equations, .. } => equations.join("; "),
        }
    }
}

/// How results are printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    /// Print every step before the result.
    pub steps: bool,

    /// Print results as LaTeX.
    pub latex: bool,
}

impl Output {
    fn write_steps(&self, out: &mut String, steps: &[Step]) {
        if self.steps {
            for step in steps {
                let _ = writeln!(out, "  {}", step);
            }
        }
    }

    fn cas_result(&self, result: &CasResult) -> String {
        let mut out = String::new();
        self.write_steps(&mut out, &result.steps);
        match &result.latex {
            Some(latex) if self.latex => out.push_str(latex),
            _ => {
                let _ = write!(out, "{}", result.result);
            },
        }
        if let Some(value) = result.numeric.filter(|_| result.result.as_number().is_none()) {
            let _ = write!(out, " ~ {}", value);
        }
        out
    }

    fn solution(&self, solution: &EquationSolution) -> String {
        let mut out = String::new();
        self.write_steps(&mut out, &solution.steps);
        let _ = write!(out, "{} ({}): ", solution.kind, solution.domain);
        if self.latex && !solution.solutions.is_empty() {
            let latex = solution.solutions.iter()
                .map(|root| match root {
                    cas_parser::AstNode::Equation(..) => root.as_display().to_string(),
                    _ => format!("{} = {}", solution.variable, root.as_display()),
                })
                .collect::<Vec<_>>();
            out.push_str(&latex.join(", "));
        } else {
            let _ = write!(out, "{}", solution);
        }
        out
    }

    fn series(&self, series: &SeriesExpansion) -> String {
        let mut out = String::new();
        self.write_steps(&mut out, &series.steps);
        if self.latex {
            let _ = write!(out, "{}", series.polynomial.as_display());
        } else {
            let _ = write!(out, "{}", series);
        }
        let _ = write!(out, "\nradius of convergence: {}", series.convergence_radius);
        out
    }
}

/// Runs the request with the given configuration, returning the text to print.
pub fn execute(request: &Request, config: &Config, output: Output) -> Result<String, Error> {
    let text = match request {
        Request::Simplify { expr } => output.cas_result(&api::simplify_with(expr, &config.simplify)?),
        Request::Diff { expr, var, order } => {
            output.cas_result(&api::differentiate_with(expr, var, *order, &config.simplify)?)
        },
        Request::Integrate { expr, var, bounds } => {
            output.cas_result(&api::integrate_with(expr, var, *bounds, &config.simplify)?)
        },
        Request::Solve { equation, var, range } => {
            let mut options = config.solve;
            if let Some(range) = range {
                options.search_range = *range;
            }
            output.solution(&api::solve_equation_with(equation, var, &options)?)
        },
        Request::System { equations, vars } => {
            let equations = equations.iter().map(String::as_str).collect::<Vec<_>>();
            let vars = vars.iter().map(String::as_str).collect::<Vec<_>>();
            output.solution(&api::solve_linear_system_with(&equations, &vars, &config.solve)?)
        },
        Request::Series { expr, var, center, order } => {
            output.series(&api::expand_series_with(expr, var, *center, *order, &config.simplify)?)
        },
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn run(request: Request) -> String {
        execute(&request, &Config::default(), Output::default()).unwrap()
    }

    #[test]
    fn simplify_request() {
        assert_eq!(run(Request::Simplify { expr: "x + x".to_owned() }), "2*x");
    }

    #[test]
    fn definite_integral_request() {
        let text = run(Request::Integrate {
            expr: "x^2".to_owned(),
            var: "x".to_owned(),
            bounds: Some((0.0, 3.0)),
        });
        assert_eq!(text, "9");
    }

    #[test]
    fn solve_request() {
        let text = run(Request::Solve {
            equation: "x^2 - 5x + 6 = 0".to_owned(),
            var: "x".to_owned(),
            range: None,
        });
        assert_eq!(text, "quadratic (real): x = 2, x = 3");
    }

    #[test]
    fn system_request() {
        let text = run(Request::System {
            equations: vec!["2x + y = 5".to_owned(), "x - y = 1".to_owned()],
            vars: vec!["x".to_owned(), "y".to_owned()],
        });
        assert_eq!(text, "system (real): x = 2, y = 1");
    }

    #[test]
    fn latex_output() {
        let output = Output { steps: false, latex: true };
        let request = Request::Diff { expr: "x^3".to_owned(), var: "x".to_owned(), order: 1 };
        assert_eq!(execute(&request, &Config::default(), output).unwrap(), "3 \\cdot x^{2}");
    }

    #[test]
    fn steps_are_printed_first() {
        let output = Output { steps: true, latex: false };
        let request = Request::Simplify { expr: "x + 0".to_owned() };
        let text = execute(&request, &Config::default(), output).unwrap();
        assert!(text.starts_with("  1. [add zero]"));
        assert!(text.ends_with("\nx"));
    }

    #[test]
    fn compute_errors_are_returned() {
        let request = Request::Diff { expr: "gamma(x)".to_owned(), var: "x".to_owned(), order: 1 };
        let err = execute(&request, &Config::default(), Output::default()).unwrap_err();
        assert!(matches!(err, Error::Cas(api::Error::Compute { .. })));
    }
}
