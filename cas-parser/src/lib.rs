//! Tokenizer, parser and abstract syntax tree for mathematical expressions and equations.
//!
//! The entry point is [`parse_expression`], which turns source text into an [`AstNode`] tree and
//! reports every variable and function name that appears in it.
//!
//! ```
//! use cas_parser::{parse_expression, parser::ast::AstNode};
//!
//! let output = parse_expression("2x + 1");
//! assert!(output.is_valid());
//! assert_eq!(output.ast, Some(AstNode::add(
//!     AstNode::mul(AstNode::num(2.0), AstNode::var("x")),
//!     AstNode::num(1.0),
//! )));
//! assert_eq!(output.variables, vec!["x".to_string()]);
//! ```

pub mod parser;
pub mod tokenizer;

pub use parser::{ast::AstNode, parse_expression, ParseOutput};
