use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};

/// Formats a list of suggested names as help text.
pub(crate) fn suggest(kind: &str, suggestions: &[String]) -> String {
    match suggestions {
        [] => format!("see the documentation for a list of available {}s", kind),
        [one] => format!("did you mean the `{}` {}?", one.as_str().fg(EXPR), kind),
        many => format!(
            "did you mean one of these {}s? {}",
            kind,
            many.iter()
                .map(|name| format!("`{}`", name.as_str().fg(EXPR)))
                .collect::<Vec<_>>()
                .join(", "),
        ),
    }
}

/// The variable has no value in the evaluation context.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no numeric value", name),
    labels = ["in this expression"],
    help = format!("give {} a value before evaluating numerically", name.as_str().fg(EXPR)),
)]
pub struct UndefinedVariable {
    /// The name of the variable.
    pub name: String,
}

/// The function does not exist.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function does not exist", name),
    labels = ["in this expression"],
    help = suggest("function", suggestions),
)]
pub struct UndefinedFunction {
    /// The name of the function.
    pub name: String,

    /// Known functions with a similar name.
    pub suggestions: Vec<String>,
}

/// The function was called with the wrong number of arguments.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("the `{}` function takes {} argument(s), but {} were given", name, expected, given),
    labels = ["in this expression"],
)]
pub struct WrongArgumentCount {
    /// The name of the function.
    pub name: String,

    /// The number of arguments the function takes.
    pub expected: usize,

    /// The number of arguments that were given.
    pub given: usize,
}

/// Evaluating the expression produced an infinite or undefined value, such as `1/0` or
/// `ln(-1)`.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` does not evaluate to a finite real number", expression),
    labels = ["in this expression"],
    help = "check for division by zero, or values outside the domain of a function",
)]
pub struct NonFiniteValue {
    /// The sub-expression that produced the value.
    pub expression: String,
}

/// An equation was evaluated as if it were a value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "an equation does not have a numeric value",
    labels = ["this equation"],
    help = "solve the equation instead",
)]
pub struct EquationValue;
