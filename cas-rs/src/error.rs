use cas_compute::api;
use std::{fmt::{self, Display, Formatter}, io};

/// Utility enum to package the errors that can occur while running a command.
#[derive(Debug)]
pub enum Error {
    /// The configuration file could not be read.
    Io(io::Error),

    /// The configuration file is not valid.
    Config(toml::de::Error),

    /// A REPL line could not be understood.
    Usage(String),

    /// The input could not be parsed, or the operation failed.
    Cas(api::Error),
}

impl Error {
    /// Report this error to stderr, highlighting the given input if the error points into it.
    pub fn report_to_stderr(&self, input: &str) {
        match self {
            Self::Cas(err) => {
                if err.report_to_stderr("input", input).is_err() {
                    eprintln!("error: {}", err);
                }
            },
            err => eprintln!("error: {}", err),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "could not read the configuration file: {}", err),
            Self::Config(err) => write!(f, "invalid configuration file: {}", err),
            Self::Usage(msg) => write!(f, "{}", msg),
            Self::Cas(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err)
    }
}

impl From<api::Error> for Error {
    fn from(err: api::Error) -> Self {
        Self::Cas(err)
    }
}
