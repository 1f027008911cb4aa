use cas_compute::symbolic::{simplify::SimplifyOptions, solve::SolveOptions};
use crate::{cli::GlobalOptions, error::Error};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Options read from a TOML configuration file.
///
/// ```toml
/// [simplify]
/// max_steps = 100
/// target_form = "expanded"
/// domain = "positive"
///
/// [solve]
/// search_range = [-20.0, 20.0]
/// samples = 4000
/// ```
///
/// Missing sections and fields take their default values.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub simplify: SimplifyOptions,
    pub solve: SolveOptions,
}

impl Config {
    /// Reads the configuration from the given file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses the configuration from the contents of a TOML file.
    pub fn parse(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configuration file named in the options, if any, and applies the options given
    /// on the command line on top of it.
    pub fn resolve(options: &GlobalOptions) -> Result<Self, Error> {
        let mut config = match &options.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(max_steps) = options.max_steps {
            config.simplify.max_steps = max_steps;
        }
        if let Some(form) = options.form {
            config.simplify.target_form = form.into();
        }
        if let Some(domain) = options.domain {
            config.simplify.domain = domain.into();
            config.solve.domain = domain.into();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use cas_compute::symbolic::simplify::{Domain, TargetForm};
    use crate::cli::{DomainArg, FormArg};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_partial_config() {
        let config = Config::parse("
            [simplify]
            max_steps = 10
            target_form = \"factored\"

            [solve]
            search_range = [-20.0, 20.0]
        ").unwrap();
        assert_eq!(config.simplify.max_steps, 10);
        assert_eq!(config.simplify.target_form, TargetForm::Factored);
        assert_eq!(config.simplify.domain, Domain::Real);
        assert_eq!(config.solve.search_range, (-20.0, 20.0));
        assert_eq!(config.solve.samples, SolveOptions::default().samples);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn reject_unknown_sections() {
        assert!(matches!(Config::parse("[plot]\nwidth = 3"), Err(Error::Config(_))));
    }

    #[test]
    fn command_line_overrides() {
        let options = GlobalOptions {
            max_steps: Some(7),
            form: Some(FormArg::Expanded),
            domain: Some(DomainArg::Positive),
            ..GlobalOptions::default()
        };
        let config = Config::resolve(&options).unwrap();
        assert_eq!(config.simplify.max_steps, 7);
        assert_eq!(config.simplify.target_form, TargetForm::Expanded);
        assert_eq!(config.solve.domain, Domain::Positive);
    }
}
