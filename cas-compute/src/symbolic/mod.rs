//! Algebraic manipulation of expressions.
//!
//! Every operation in this module works on the [`AstNode`] trees produced by [`cas_parser`], and
//! records what it did as a list of [`Step`]s through a [`StepCollector`]. Pass `&mut ()` as the
//! collector to discard the steps.
//!
//! # Simplification
//!
//! [`simplify`] applies the rules in [`simplify::rules`] bottom-up over the tree, one category at
//! a time, until a pass leaves the tree unchanged or the pass budget in [`SimplifyOptions`] runs
//! out.
//!
//! ```
//! use cas_compute::symbolic::simplify;
//! use cas_parser::parser::Parser;
//!
//! let node = Parser::new("x + x + 0").try_parse_full().unwrap();
//! assert_eq!(simplify(&node).to_string(), "2*x");
//! ```
//!
//! # Calculus
//!
//! [`derivative`] and [`integral`] implement symbolic differentiation and integration. Both
//! operate on one variable; the other variables are treated as constants.
//!
//! # Solving
//!
//! [`solve`] classifies an equation by its degree in the variable and solves it exactly or
//! numerically. [`solve::system`] solves square systems of linear equations.
//!
//! [`AstNode`]: cas_parser::parser::ast::AstNode
//! [`Step`]: step::Step

pub mod coeff;
pub mod derivative;
pub mod error;
pub mod integral;
pub mod poly;
pub mod series;
pub mod simplify;
pub mod solve;
pub mod step;
pub mod step_collector;
pub mod term;

pub use simplify::{simplify, simplify_with, simplify_with_steps, SimplifyOptions};
pub use step_collector::StepCollector;
