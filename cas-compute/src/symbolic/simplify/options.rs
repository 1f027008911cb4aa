#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how an expression is simplified.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimplifyOptions {
    /// The maximum number of passes over the expression. Each pass applies every category of
    /// rules once to every node of the tree.
    ///
    /// If the expression still changes after this many passes, simplification stops and the
    /// current expression is returned.
    pub max_steps: usize,

    /// The form to bring the expression into. See [`TargetForm`] for more information.
    pub target_form: TargetForm,

    /// The domain of the variables. See [`Domain`] for more information.
    pub domain: Domain,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            max_steps: 50,
            target_form: TargetForm::default(),
            domain: Domain::default(),
        }
    }
}

impl SimplifyOptions {
    /// Wraps the given [`SimplifyOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SimplifyOptionsBuilder {
        SimplifyOptionsBuilder(self)
    }
}

/// The form a simplified expression should be brought into.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TargetForm {
    /// Apply the regular rules only.
    ///
    /// This is the default option.
    #[default]
    Simplified,

    /// Distribute products over sums, and expand small integer powers of sums, such as
    /// `(x + 1)^2`.
    Expanded,

    /// Pull factors shared by every term of a sum out of the sum, such as `2x + 4 = 2(x + 2)`.
    Factored,
}

impl TargetForm {
    /// Utility function to create a new [`SimplifyOptions`] with the same options as the given
    /// [`SimplifyOptions`], but with the target form set to this value.
    pub fn inside(self, options: SimplifyOptions) -> SimplifyOptions {
        SimplifyOptions {
            target_form: self,
            ..options
        }
    }
}

/// The values the variables of an expression are assumed to take.
///
/// Some rules are only valid for some values. For example, `sqrt(x^2) = x` only holds for
/// `x >= 0`; in the real domain the result is `abs(x)` instead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Domain {
    /// Variables can be any real number.
    ///
    /// This is the default option.
    #[default]
    Real,

    /// Variables are positive real numbers.
    Positive,
}

impl Domain {
    /// Utility function to create a new [`SimplifyOptions`] with the same options as the given
    /// [`SimplifyOptions`], but with the domain set to this value.
    pub fn inside(self, options: SimplifyOptions) -> SimplifyOptions {
        SimplifyOptions {
            domain: self,
            ..options
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Real => write!(f, "real"),
            Domain::Positive => write!(f, "positive"),
        }
    }
}

/// Helper struct to build a [`SimplifyOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SimplifyOptionsBuilder(SimplifyOptions);

impl SimplifyOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of passes. See [`SimplifyOptions::max_steps`] for more
    /// information.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.0.max_steps = max_steps;
        self
    }

    /// Sets the target form. See [`TargetForm`] for more information.
    pub fn target_form(mut self, target_form: TargetForm) -> Self {
        self.0.target_form = target_form;
        self
    }

    /// Sets the domain. See [`Domain`] for more information.
    pub fn domain(mut self, domain: Domain) -> Self {
        self.0.domain = domain;
        self
    }

    /// Builds the [`SimplifyOptions`] struct.
    pub fn build(self) -> SimplifyOptions {
        self.0
    }
}
