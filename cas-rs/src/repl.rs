//! The interactive session.
//!
//! Each line is a command word followed by its arguments, separated by `;`:
//!
//! ```text
//! > diff x^3 sin(x); x
//! > integrate x^2; x; 0; 3
//! > solve x^2 - 5x + 6 = 0
//! > system 2x + y = 5; x - y = 1; x, y
//! > series exp(x); x; 0; 4
//! ```
//!
//! A line that does not start with a command word is simplified.

use crate::{config::Config, error::Error, run::{execute, Output, Request}};
use rustyline::{error::ReadlineError, DefaultEditor};

const HELP: &str = "\
commands (arguments are separated by `;`, optional ones in brackets):
  <expr>                              simplify an expression
  simplify <expr>
  diff <expr> [; var [; order]]       differentiate
  integrate <expr> [; var [; a; b]]   integrate, between a and b if given
  solve <equation> [; var]            solve an equation
  system <eq>; <eq>...; <vars>        solve a linear system, vars separated by commas
  series <expr> [; var [; center [; order]]]
  steps on|off                        show the steps taken
  latex on|off                        print results as LaTeX
  help                                show this message";

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Run(Request),
    Steps(bool),
    Latex(bool),
    Help,
    Empty,
}

/// Returns the argument at the given index, or the default if it is missing.
fn arg_or<'a>(args: &[&'a str], index: usize, default: &'a str) -> &'a str {
    args.get(index).copied().unwrap_or(default)
}

/// Parses a number argument.
fn number<T: std::str::FromStr>(arg: &str, what: &str) -> Result<T, Error> {
    arg.parse().map_err(|_| Error::Usage(format!("`{}` is not a valid {}", arg, what)))
}

/// Parses `on` or `off`.
fn toggle(arg: &str) -> Result<bool, Error> {
    match arg {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(Error::Usage(format!("expected `on` or `off`, found `{}`", arg))),
    }
}

/// Parses one line of input.
pub fn parse_line(line: &str) -> Result<Line, Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Line::Empty);
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let args = rest.split(';').map(str::trim).filter(|arg| !arg.is_empty()).collect::<Vec<_>>();
    let expr = || args.first()
        .map(|expr| expr.to_string())
        .ok_or_else(|| Error::Usage(format!("`{}` needs an expression", word)));

    let request = match word {
        "help" => return Ok(Line::Help),
        "steps" => return Ok(Line::Steps(toggle(rest.trim())?)),
        "latex" => return Ok(Line::Latex(toggle(rest.trim())?)),
        "simplify" => Request::Simplify { expr: expr()? },
        "diff" => Request::Diff {
            expr: expr()?,
            var: arg_or(&args, 1, "x").to_owned(),
            order: number(arg_or(&args, 2, "1"), "order")?,
        },
        "integrate" => Request::Integrate {
            expr: expr()?,
            var: arg_or(&args, 1, "x").to_owned(),
            bounds: match args.get(2..) {
                Some([a, b]) => Some((number(a, "bound")?, number(b, "bound")?)),
                None | Some([]) => None,
                Some(_) => return Err(Error::Usage("a definite integral needs exactly two bounds".to_owned())),
            },
        },
        "solve" => Request::Solve {
            equation: expr()?,
            var: arg_or(&args, 1, "x").to_owned(),
            range: None,
        },
        "system" => match args.split_last() {
            Some((vars, equations)) if !equations.is_empty() => Request::System {
                equations: equations.iter().map(|eq| eq.to_string()).collect(),
                vars: vars.split(',').map(|var| var.trim().to_owned()).collect(),
            },
            _ => return Err(Error::Usage("`system` needs at least one equation and a list of variables".to_owned())),
        },
        "series" => Request::Series {
            expr: expr()?,
            var: arg_or(&args, 1, "x").to_owned(),
            center: number(arg_or(&args, 2, "0"), "center")?,
            order: number(arg_or(&args, 3, "5"), "order")?,
        },
        _ => Request::Simplify { expr: line.to_owned() },
    };
    Ok(Line::Run(request))
}

/// Runs the REPL until end of input.
pub fn run(config: &Config, mut output: Output) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;

    let mut process_line = |rl: &mut DefaultEditor| -> Result<(), ReadlineError> {
        let input = rl.readline("> ")?;
        if input.trim().is_empty() {
            return Ok(());
        }

        rl.add_history_entry(&input)?;

        match parse_line(&input) {
            Ok(Line::Run(request)) => match execute(&request, config, output) {
                Ok(text) => println!("{}", text),
                Err(err) => err.report_to_stderr(&request.input()),
            },
            Ok(Line::Steps(on)) => output.steps = on,
            Ok(Line::Latex(on)) => output.latex = on,
            Ok(Line::Help) => println!("{}", HELP),
            Ok(Line::Empty) => (),
            Err(err) => err.report_to_stderr(&input),
        }
        Ok(())
    };

    loop {
        if let Err(err) = process_line(&mut rl) {
            return match err {
                ReadlineError::Eof | ReadlineError::Interrupted => Ok(()),
                err => Err(err),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn request(line: &str) -> Request {
        match parse_line(line) {
            Ok(Line::Run(request)) => request,
            other => panic!("expected a request, got {:?}", other),
        }
    }

    #[test]
    fn bare_expression_is_simplified() {
        assert_eq!(request("  x + x "), Request::Simplify { expr: "x + x".to_owned() });
        assert_eq!(parse_line("   ").unwrap(), Line::Empty);
    }

    #[test]
    fn diff_with_defaults() {
        assert_eq!(request("diff x^3 sin(x)"), Request::Diff {
            expr: "x^3 sin(x)".to_owned(),
            var: "x".to_owned(),
            order: 1,
        });
        assert_eq!(request("diff t^4; t; 2"), Request::Diff {
            expr: "t^4".to_owned(),
            var: "t".to_owned(),
            order: 2,
        });
    }

    #[test]
    fn integrate_bounds() {
        assert_eq!(request("integrate x^2; x; -1; 3"), Request::Integrate {
            expr: "x^2".to_owned(),
            var: "x".to_owned(),
            bounds: Some((-1.0, 3.0)),
        });
        assert!(matches!(parse_line("integrate x; x; 1"), Err(Error::Usage(_))));
    }

    #[test]
    fn system_variables_come_last() {
        assert_eq!(request("system 2x + y = 5; x - y = 1; x, y"), Request::System {
            equations: vec!["2x + y = 5".to_owned(), "x - y = 1".to_owned()],
            vars: vec!["x".to_owned(), "y".to_owned()],
        });
        assert!(matches!(parse_line("system x, y"), Err(Error::Usage(_))));
    }

    #[test]
    fn toggles() {
        assert_eq!(parse_line("steps on").unwrap(), Line::Steps(true));
        assert_eq!(parse_line("latex off").unwrap(), Line::Latex(false));
        assert!(matches!(parse_line("steps maybe"), Err(Error::Usage(_))));
    }

    #[test]
    fn bad_numbers() {
        assert!(matches!(parse_line("series sin(x); x; zero"), Err(Error::Usage(_))));
    }
}
