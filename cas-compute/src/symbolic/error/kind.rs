use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};
use crate::numerical::error::kind::suggest;
use std::fmt::{Display, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The operation has no symbolic rule for the given symbol, such as differentiating a function
/// that is not known to the differentiator.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot {} `{}`", operation, symbol),
    labels = [format!("this expression contains `{}`", symbol.as_str().fg(EXPR))],
    help = suggest("function", suggestions),
)]
pub struct UnsupportedOperation {
    /// The operation that was attempted, such as `differentiate`.
    pub operation: &'static str,

    /// The symbol that could not be handled, such as a function name or `=`.
    pub symbol: String,

    /// Supported symbols with a similar name.
    pub suggestions: Vec<String>,
}

/// The equation or system does not have exactly one solution.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "no unique solution",
    labels = [reason],
)]
pub struct NoUniqueSolution {
    /// Why there is no unique solution.
    pub reason: String,
}

/// Why the solver could not produce a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unavailable {
    /// The equation could be solved with a numerical method, but it contains symbols without a
    /// value, so no numeric method can be applied.
    NeedsNumericalMethod,

    /// No method is known for this equation.
    Unsolved,
}

impl Display for Unavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NeedsNumericalMethod => write!(f, "requires a numerical method"),
            Self::Unsolved => write!(f, "could not be solved"),
        }
    }
}

/// The equation is recognized, but the solver cannot produce its solutions.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("this equation {}", reason),
    labels = [detail],
    help = match reason {
        Unavailable::NeedsNumericalMethod => "give every other variable a numeric value and try again",
        Unavailable::Unsolved => "try rewriting the equation, or simplifying it first",
    },
)]
pub struct SolverUnavailable {
    /// The reason the solver gave up.
    pub reason: Unavailable,

    /// What exactly the solver could not handle.
    pub detail: String,
}
