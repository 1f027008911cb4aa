use cas_compute::symbolic::simplify::{Domain, TargetForm};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Simplify, differentiate, integrate and solve mathematical expressions, showing every step.
#[derive(Debug, Parser)]
#[command(name = "cas-rs", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub options: GlobalOptions,
}

/// Options shared by every subcommand. Options given on the command line override the ones read
/// from the configuration file.
#[derive(Debug, Default, Clone, Args)]
pub struct GlobalOptions {
    /// Read options from this TOML file.
    #[arg(long, global = true, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// The maximum number of simplification passes.
    #[arg(long, global = true)]
    pub max_steps: Option<usize>,

    /// The form to bring results into.
    #[arg(long, global = true, value_enum)]
    pub form: Option<FormArg>,

    /// The values the variables are assumed to take.
    #[arg(long, global = true, value_enum)]
    pub domain: Option<DomainArg>,

    /// Print every step taken.
    #[arg(long, global = true)]
    pub steps: bool,

    /// Print results as LaTeX.
    #[arg(long, global = true)]
    pub latex: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Simplify an expression.
    Simplify {
        expr: String,
    },

    /// Differentiate an expression.
    Diff {
        expr: String,

        /// The variable to differentiate with respect to.
        #[arg(default_value = "x")]
        var: String,

        /// How many times to differentiate.
        #[arg(short = 'n', long, default_value_t = 1)]
        order: u32,
    },

    /// Integrate an expression, optionally between two bounds.
    Integrate {
        expr: String,

        /// The variable to integrate with respect to.
        #[arg(default_value = "x")]
        var: String,

        /// The lower bound of a definite integral.
        #[arg(long, requires = "to", allow_negative_numbers = true)]
        from: Option<f64>,

        /// The upper bound of a definite integral.
        #[arg(long, requires = "from", allow_negative_numbers = true)]
        to: Option<f64>,
    },

    /// Solve an equation for a variable. An expression without `=` is solved as `expr = 0`.
    Solve {
        equation: String,

        /// The variable to solve for.
        #[arg(default_value = "x")]
        var: String,

        /// The interval scanned for roots of equations that have to be solved numerically.
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        range: Option<Vec<f64>>,
    },

    /// Solve a system of linear equations.
    System {
        /// The equations of the system.
        #[arg(required = true)]
        equations: Vec<String>,

        /// The variables to solve for, separated by commas.
        #[arg(long, value_delimiter = ',', required = true)]
        vars: Vec<String>,
    },

    /// Compute the Taylor expansion of an expression.
    Series {
        expr: String,

        /// The variable of the expansion.
        #[arg(default_value = "x")]
        var: String,

        /// The point to expand around.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        center: f64,

        /// The highest degree to include.
        #[arg(long, default_value_t = 5)]
        order: u32,
    },

    /// Start an interactive session.
    Repl,
}

/// The `--form` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormArg {
    Simplified,
    Expanded,
    Factored,
}

impl From<FormArg> for TargetForm {
    fn from(arg: FormArg) -> Self {
        match arg {
            FormArg::Simplified => Self::Simplified,
            FormArg::Expanded => Self::Expanded,
            FormArg::Factored => Self::Factored,
        }
    }
}

/// The `--domain` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DomainArg {
    Real,
    Positive,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Real => Self::Real,
            DomainArg::Positive => Self::Positive,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_subcommands() {
        let cli = Cli::parse_from(["cas-rs", "diff", "x^3", "-n", "2", "--steps"]);
        assert!(cli.options.steps);
        assert!(matches!(cli.command, Command::Diff { ref var, order: 2, .. } if var == "x"));

        let cli = Cli::parse_from(["cas-rs", "integrate", "x^2", "--from", "-1", "--to", "3"]);
        assert!(matches!(cli.command, Command::Integrate { from: Some(lo), to: Some(hi), .. } if lo == -1.0 && hi == 3.0));

        let cli = Cli::parse_from(["cas-rs", "system", "2x + y = 5", "x - y = 1", "--vars", "x,y"]);
        assert!(matches!(cli.command, Command::System { ref equations, ref vars } if equations.len() == 2 && vars == &["x", "y"]));
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::parse_from(["cas-rs", "--form", "expanded", "simplify", "(x + 1)^2", "--domain", "positive"]);
        assert_eq!(cli.options.form, Some(FormArg::Expanded));
        assert_eq!(cli.options.domain, Some(DomainArg::Positive));
        assert_eq!(TargetForm::from(FormArg::Factored), TargetForm::Factored);
    }

    #[test]
    fn bounds_come_in_pairs() {
        assert!(Cli::try_parse_from(["cas-rs", "integrate", "x", "--from", "0"]).is_err());
    }
}
