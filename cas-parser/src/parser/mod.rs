pub mod ast;
pub mod error;
pub mod fmt;
pub mod token;

use ast::AstNode;
use error::{Error, kind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;
use token::op::BinOpKind;

/// The tokens that can begin an operand.
const OPERAND_START: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::Sub,
];

/// A parser for mathematical expressions and equations. This is the type to use to parse an
/// arbitrary piece of text into an [`AstNode`].
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing, without whitespace.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The length of the source code, used to point at the end of it.
    source_len: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            source_len: source.len(),
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl cas_error::ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.source_len..self.source_len
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns true if the current token is of the given kind.
    fn at(&self, kind: TokenKind) -> bool {
        self.current_token().is_some_and(|token| token.kind == kind)
    }

    /// Returns the next token to be parsed, then advances the cursor.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        let token = self.current_token()
            .cloned()
            .ok_or_else(|| self.error(kind::UnexpectedEof))?;
        self.cursor += 1;
        Ok(token)
    }

    /// Parses the whole source code as a single expression or equation. All the tokens must be
    /// consumed by the parser; if not, an error is returned.
    pub fn try_parse_full(&mut self) -> Result<AstNode, Error> {
        if self.tokens.is_empty() {
            return Err(Error::new(vec![0..self.source_len], kind::EmptyExpression));
        }

        let node = self.parse_equation()?;
        match self.current_token() {
            None => Ok(node),
            Some(token) if token.kind == TokenKind::CloseParen => {
                Err(self.error(kind::UnclosedParenthesis { opening: false }))
            },
            Some(_) => Err(Error::new(vec![self.span().start..self.source_len], kind::ExpectedEof)),
        }
    }

    /// Parses an expression, optionally followed by `=` and a second expression.
    fn parse_equation(&mut self) -> Result<AstNode, Error> {
        let lhs = self.parse_expr(Precedence::Any)?;
        if !self.at(TokenKind::Eq) {
            return Ok(lhs);
        }

        let first_eq = self.next_token()?.span;
        let rhs = self.parse_expr(Precedence::Any)?;
        if self.at(TokenKind::Eq) {
            return Err(Error::new(vec![first_eq, self.span()], kind::MultipleEquals));
        }

        Ok(AstNode::equation(lhs, rhs))
    }

    /// Parses an expression whose binary operators all have at least the given precedence, using
    /// precedence climbing.
    ///
    /// Two operands written next to each other without an operator, such as `2x` or
    /// `(x + 1)(x - 1)`, are multiplied.
    fn parse_expr(&mut self, precedence: Precedence) -> Result<AstNode, Error> {
        let mut lhs = self.parse_unary()?;

        loop {
            let Some(token) = self.current_token() else {
                break;
            };

            let (op, implicit) = match BinOpKind::from_token(token.kind) {
                Some(op) => (op, false),
                None if token.kind.starts_operand() => (BinOpKind::Mul, true),
                None => break,
            };

            if op.precedence() < precedence {
                break;
            }

            if !implicit {
                self.cursor += 1;
            }

            let rhs_precedence = match op.associativity() {
                Associativity::Left => op.precedence().next(),
                Associativity::Right => op.precedence(),
            };
            let rhs = self.parse_expr(rhs_precedence)?;
            lhs = AstNode::op(op, lhs, rhs);
        }

        Ok(lhs)
    }

    /// Parses an operand with any number of leading signs. Negation binds more loosely than
    /// exponentiation, so `-x^2` is `-(x^2)`.
    fn parse_unary(&mut self) -> Result<AstNode, Error> {
        match self.current_token().map(|token| token.kind) {
            Some(TokenKind::Sub) => {
                self.cursor += 1;
                let operand = self.parse_expr(Precedence::Neg)?;
                Ok(match operand {
                    AstNode::Number(n) => AstNode::num(-n),
                    operand => AstNode::neg(operand),
                })
            },
            Some(TokenKind::Add) => {
                self.cursor += 1;
                self.parse_expr(Precedence::Neg)
            },
            _ => self.parse_primary(),
        }
    }

    /// Parses a number, a variable, a function call, or a parenthesized expression.
    fn parse_primary(&mut self) -> Result<AstNode, Error> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::Number => {
                let value = token.lexeme.parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| Error::new(vec![token.span.clone()], kind::InvalidNumber {
                        lexeme: token.lexeme.to_owned(),
                    }))?;
                Ok(AstNode::num(value))
            },
            // single-letter names followed by a parenthesis are treated as implicit
            // multiplication, such as `x(x + 1)`
            TokenKind::Name if token.lexeme.len() > 1 && self.at(TokenKind::OpenParen) => {
                let open = self.next_token()?.span;
                let args = self.parse_args(open)?;
                Ok(AstNode::call(token.lexeme, args))
            },
            TokenKind::Name => Ok(AstNode::var(token.lexeme)),
            TokenKind::OpenParen => {
                if self.at(TokenKind::CloseParen) {
                    let close = self.span();
                    return Err(Error::new(vec![token.span.start..close.end], kind::EmptyParenthesis));
                }

                let inner = self.parse_expr(Precedence::Any)?;
                self.expect_close(token.span, &[TokenKind::CloseParen])?;
                Ok(inner)
            },
            TokenKind::CloseParen => Err(Error::new(
                vec![token.span],
                kind::UnclosedParenthesis { opening: false },
            )),
            TokenKind::Symbol => Err(Error::new(
                vec![token.span],
                kind::UnknownSymbol { symbol: token.lexeme.to_owned() },
            )),
            found => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: OPERAND_START,
                found,
            })),
        }
    }

    /// Parses the comma-separated arguments of a function call, after the opening parenthesis.
    fn parse_args(&mut self, open: Range<usize>) -> Result<Vec<AstNode>, Error> {
        let mut args = Vec::new();
        if self.at(TokenKind::CloseParen) {
            self.cursor += 1;
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr(Precedence::Any)?);
            if self.at(TokenKind::Comma) {
                self.cursor += 1;
            } else {
                self.expect_close(open, &[TokenKind::Comma, TokenKind::CloseParen])?;
                return Ok(args);
            }
        }
    }

    /// Consumes a closing parenthesis matching the opening parenthesis at the given span.
    fn expect_close(&mut self, open: Range<usize>, expected: &'static [TokenKind]) -> Result<(), Error> {
        match self.current_token() {
            None => Err(Error::new(vec![open], kind::UnclosedParenthesis { opening: true })),
            Some(token) if token.kind == TokenKind::CloseParen => {
                self.cursor += 1;
                Ok(())
            },
            Some(token) => Err(Error::new(vec![token.span.clone()], kind::UnexpectedToken {
                expected,
                found: token.kind,
            })),
        }
    }
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary operation is left-associative.
    ///
    /// This means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary operation is right-associative.
    ///
    /// This means `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of numbers, names, calls, and parenthesized expressions.
    Atom,
}

impl Precedence {
    /// Returns the next highest precedence.
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Neg,
            Self::Neg => Self::Exp,
            Self::Exp | Self::Atom => Self::Atom,
        }
    }
}

/// The output of [`parse_expression`].
#[derive(Debug)]
pub struct ParseOutput {
    /// The parsed tree, if parsing succeeded.
    pub ast: Option<AstNode>,

    /// The errors that occurred while parsing, if any.
    pub errors: Vec<Error>,

    /// The sorted names of the free variables in the tree.
    pub variables: Vec<String>,

    /// The sorted names of the functions called in the tree.
    pub functions: Vec<String>,
}

impl ParseOutput {
    /// Returns true if parsing succeeded without errors.
    pub fn is_valid(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }
}

/// Parses the given source into an expression tree, reporting the variables and functions that
/// appear in it.
pub fn parse_expression(source: &str) -> ParseOutput {
    match Parser::new(source).try_parse_full() {
        Ok(ast) => ParseOutput {
            variables: ast.variables(),
            functions: ast.functions(),
            ast: Some(ast),
            errors: Vec::new(),
        },
        Err(err) => ParseOutput {
            ast: None,
            errors: vec![err],
            variables: Vec::new(),
            functions: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::AstNode as N;

    fn parse(source: &str) -> AstNode {
        Parser::new(source).try_parse_full().unwrap()
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).try_parse_full().unwrap_err()
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), N::num(16.0));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("3.14"), N::num(3.14));
        assert_eq!(parse(".5"), N::num(0.5));
    }

    #[test]
    fn literal_scientific() {
        assert_eq!(parse("1e6"), N::num(1e6));
        assert_eq!(parse("x^2 - 2.5E-3"), N::sub(
            N::pow(N::var("x"), N::num(2.0)),
            N::num(0.0025),
        ));
        assert_eq!(parse("2e"), N::mul(N::num(2.0), N::var("e")));
    }

    #[test]
    fn precedence() {
        assert_eq!(parse("1 + 2 * 3"), N::add(
            N::num(1.0),
            N::mul(N::num(2.0), N::num(3.0)),
        ));
    }

    #[test]
    fn left_associative() {
        assert_eq!(parse("a - b - c"), N::sub(
            N::sub(N::var("a"), N::var("b")),
            N::var("c"),
        ));
        assert_eq!(parse("a / b * c"), N::mul(
            N::div(N::var("a"), N::var("b")),
            N::var("c"),
        ));
    }

    #[test]
    fn right_associative_power() {
        assert_eq!(parse("2^3^2"), N::pow(
            N::num(2.0),
            N::pow(N::num(3.0), N::num(2.0)),
        ));
    }

    #[test]
    fn unary_minus() {
        assert_eq!(parse("-2"), N::num(-2.0));
        assert_eq!(parse("-x^2"), N::neg(N::pow(N::var("x"), N::num(2.0))));
        assert_eq!(parse("x^-1"), N::pow(N::var("x"), N::num(-1.0)));
        assert_eq!(parse("3 - -x"), N::sub(N::num(3.0), N::neg(N::var("x"))));
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(parse("5x"), N::mul(N::num(5.0), N::var("x")));
        assert_eq!(parse("2x^2"), N::mul(
            N::num(2.0),
            N::pow(N::var("x"), N::num(2.0)),
        ));
        assert_eq!(parse("(x + 1)(x - 1)"), N::mul(
            N::add(N::var("x"), N::num(1.0)),
            N::sub(N::var("x"), N::num(1.0)),
        ));
        assert_eq!(parse("x(x + 1)"), N::mul(
            N::var("x"),
            N::add(N::var("x"), N::num(1.0)),
        ));
        assert_eq!(parse("1/2x"), N::mul(
            N::div(N::num(1.0), N::num(2.0)),
            N::var("x"),
        ));
    }

    #[test]
    fn function_calls() {
        assert_eq!(parse("2 sin(x)"), N::mul(
            N::num(2.0),
            N::call1("sin", N::var("x")),
        ));
        assert_eq!(parse("log(x, 2)"), N::call("log", vec![N::var("x"), N::num(2.0)]));
        assert_eq!(parse("rand()"), N::call("rand", vec![]));
    }

    #[test]
    fn equation() {
        assert_eq!(parse("x^2 - 5x + 6 = 0"), N::equation(
            N::add(
                N::sub(
                    N::pow(N::var("x"), N::num(2.0)),
                    N::mul(N::num(5.0), N::var("x")),
                ),
                N::num(6.0),
            ),
            N::num(0.0),
        ));
    }

    #[test]
    fn empty_input() {
        let err = parse_err("   ");
        assert!(err.is::<kind::EmptyExpression>());
    }

    #[test]
    fn unclosed_paren() {
        let err = parse_err("(x + 1");
        assert_eq!(err.spans, vec![0..1]);
        assert_eq!(err.downcast_ref::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis {
            opening: true,
        }));

        let err = parse_err("x + 1)");
        assert_eq!(err.downcast_ref::<kind::UnclosedParenthesis>(), Some(&kind::UnclosedParenthesis {
            opening: false,
        }));
    }

    #[test]
    fn empty_paren() {
        let err = parse_err("2 * ()");
        assert_eq!(err.spans, vec![4..6]);
        assert!(err.is::<kind::EmptyParenthesis>());
    }

    #[test]
    fn multiple_equals() {
        let err = parse_err("x = 1 = 2");
        assert_eq!(err.spans, vec![2..3, 6..7]);
        assert!(err.is::<kind::MultipleEquals>());
    }

    #[test]
    fn unknown_symbol() {
        let err = parse_err("x + $");
        assert_eq!(err.spans, vec![4..5]);
        assert_eq!(err.to_string(), "unknown symbol `$`");
    }

    #[test]
    fn dangling_operator() {
        let err = parse_err("x +");
        assert!(err.is::<kind::UnexpectedEof>());
    }

    #[test]
    fn parse_output() {
        let output = parse_expression("a x^2 + sin(b) = pi");
        assert!(output.is_valid());
        assert_eq!(output.variables, vec!["a", "b", "x"]);
        assert_eq!(output.functions, vec!["sin"]);

        let output = parse_expression("x + * 2");
        assert!(!output.is_valid());
        assert_eq!(output.errors.len(), 1);
        assert!(output.ast.is_none());
    }
}
