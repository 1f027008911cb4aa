use crate::symbolic::simplify::{Domain, SimplifyOptions, TargetForm};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Options that control how equations are solved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolveOptions {
    /// The domain of the variable. In the [`Domain::Positive`] domain, roots that are not
    /// positive are discarded.
    pub domain: Domain,

    /// The interval that is scanned for roots of equations that have to be solved numerically.
    ///
    /// The default is `(-10.0, 10.0)`.
    pub search_range: (f64, f64),

    /// The number of sub-intervals the search range is divided into when scanning for sign
    /// changes. Roots closer together than one sub-interval may be missed.
    ///
    /// The default is `1000`.
    pub samples: usize,

    /// The width of the interval at which bisection stops.
    ///
    /// The default is `1e-12`.
    pub tolerance: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            domain: Domain::default(),
            search_range: (-10.0, 10.0),
            samples: 1000,
            tolerance: 1e-12,
        }
    }
}

impl SolveOptions {
    /// Wraps the given [`SolveOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SolveOptionsBuilder {
        SolveOptionsBuilder(self)
    }

    /// The options used to simplify the equation before it is classified. Products are expanded
    /// so that polynomial coefficients can be read off.
    pub fn simplify_options(&self) -> SimplifyOptions {
        SimplifyOptions {
            target_form: TargetForm::Expanded,
            domain: self.domain,
            ..SimplifyOptions::default()
        }
    }
}

/// Helper struct to build a [`SolveOptions`] struct.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveOptionsBuilder(SolveOptions);

impl SolveOptionsBuilder {
    /// Creates a new [`SolveOptionsBuilder`] with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the domain of the variable.
    pub fn domain(mut self, domain: Domain) -> Self {
        self.0.domain = domain;
        self
    }

    /// Sets the interval scanned for roots.
    pub fn search_range(mut self, lo: f64, hi: f64) -> Self {
        self.0.search_range = (lo, hi);
        self
    }

    /// Sets the number of sub-intervals used when scanning for roots.
    pub fn samples(mut self, samples: usize) -> Self {
        self.0.samples = samples;
        self
    }

    /// Sets the bisection tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Builds the [`SolveOptions`].
    pub fn build(self) -> SolveOptions {
        self.0
    }
}
