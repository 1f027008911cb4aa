//! Symbolic simplification, differentiation, integration, equation solving and series expansion.
//!
//! The [`api`] module is the entry point for most users: each function takes source text, parses
//! it, runs the requested operation and returns the result together with the steps taken.
//!
//! ```
//! use cas_compute::api;
//!
//! let result = api::differentiate("x^3", "x").unwrap();
//! assert_eq!(result.result.to_string(), "3*x^2");
//! ```
//!
//! The building blocks live in [`symbolic`], which works on parsed trees directly, and
//! [`numerical`], which evaluates trees over the reals.

pub mod api;
pub mod numerical;
pub mod symbolic;
