use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A context to use when evaluating an expression, containing the values of the variables that
/// can be used within the expression.
///
/// The constants `pi` and `e` are always available, unless the context gives them a different
/// value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, f64>,
}

impl Ctxt {
    /// Creates a new, empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with a single variable.
    pub fn with_var(name: impl Into<String>, value: f64) -> Self {
        let mut ctxt = Self::new();
        ctxt.add_var(name, value);
        ctxt
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, name: impl Into<String>, value: f64) {
        self.vars.insert(name.into(), value);
    }

    /// Get the value of a variable, falling back to the value of a well-known constant.
    pub fn get_var(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied().or(match name {
            "pi" => Some(std::f64::consts::PI),
            "e" => Some(std::f64::consts::E),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_can_be_shadowed() {
        let mut ctxt = Ctxt::new();
        assert_eq!(ctxt.get_var("pi"), Some(std::f64::consts::PI));
        assert_eq!(ctxt.get_var("x"), None);

        ctxt.add_var("e", 2.0);
        assert_eq!(ctxt.get_var("e"), Some(2.0));
    }
}
