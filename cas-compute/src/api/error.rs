use crate::symbolic::step::Step;
use std::{fmt::{self, Display, Formatter}, io};

/// An error returned by one of the [`api`](super) entry points.
#[derive(Debug)]
pub enum Error {
    /// The input could not be parsed. Every parser error is included.
    Parse(Vec<cas_error::Error>),

    /// The input was parsed, but the operation failed.
    Compute {
        /// The error that stopped the operation.
        error: cas_error::Error,

        /// The steps that were taken before the operation failed.
        steps: Vec<Step>,
    },
}

impl Error {
    /// Creates a [`Error::Compute`] error. Errors from the symbolic engine carry no source spans,
    /// since they point at trees rather than source text; they are attached to the whole input
    /// instead.
    pub(crate) fn compute(input: &str, mut error: cas_error::Error, steps: Vec<Step>) -> Self {
        if error.spans.is_empty() {
            error.spans.push(0..input.len());
        }
        Self::Compute { error, steps }
    }

    /// Returns the underlying errors.
    pub fn errors(&self) -> Vec<&cas_error::Error> {
        match self {
            Self::Parse(errs) => errs.iter().collect(),
            Self::Compute { error, .. } => vec![error],
        }
    }

    /// Returns the steps taken before the operation failed. Parse errors have no steps.
    pub fn steps(&self) -> &[Step] {
        match self {
            Self::Parse(_) => &[],
            Self::Compute { steps, .. } => steps,
        }
    }

    /// Report every error to stderr, highlighting the given input.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        self.errors()
            .into_iter()
            .try_for_each(|err| err.report_to_stderr(src_id, input))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(errs) => {
                let messages = errs.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "parse error: {}", messages.join("; "))
            },
            Self::Compute { error, .. } => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for Error {}

impl From<Vec<cas_error::Error>> for Error {
    fn from(errs: Vec<cas_error::Error>) -> Self {
        Self::Parse(errs)
    }
}
