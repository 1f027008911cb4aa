pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns true if the name is an exponent suffix without a sign, such as `e6` in `1e6`.
fn is_unsigned_exponent(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some('e' | 'E'))
        && !chars.as_str().is_empty()
        && chars.all(|c| c.is_ascii_digit())
}

/// Returns the number of tokens after `tokens[0]` that form the exponent of a number written in
/// scientific notation, such as `e6` or `e`, `-`, `20`. The tokens must directly follow each
/// other without whitespace.
fn exponent_len(tokens: &[Token]) -> usize {
    let adjacent = |i: usize| tokens.get(i).filter(|token| token.span.start == tokens[i - 1].span.end);
    match adjacent(1) {
        Some(name) if name.kind == TokenKind::Name && is_unsigned_exponent(name.lexeme) => 1,
        Some(name) if name.kind == TokenKind::Name && matches!(name.lexeme, "e" | "E") => {
            let sign = adjacent(2).filter(|sign| matches!(sign.kind, TokenKind::Add | TokenKind::Sub));
            let digits = sign.and(adjacent(3))
                .filter(|digits| digits.kind == TokenKind::Number && digits.lexeme.bytes().all(|b| b.is_ascii_digit()));
            if digits.is_some() { 3 } else { 0 }
        },
        _ => 0,
    }
}

/// Returns an owned array containing all of the non-whitespace tokens produced by the tokenizer.
/// This allows the parser to look ahead and backtrack freely.
///
/// A number directly followed by an exponent, such as `1e6` or `2.5E-3`, is joined into a single
/// [`TokenKind::Number`] token.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        // anything the lexer rejects is reported as an unknown symbol by the parser
        let kind = result.unwrap_or(TokenKind::Symbol);
        if kind.is_whitespace() {
            continue;
        }

        tokens.push(Token {
            span: lexer.span(),
            kind,
            lexeme: lexer.slice(),
        });
    }

    let mut joined = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let len = match tokens[i].kind {
            TokenKind::Number => exponent_len(&tokens[i..]),
            _ => 0,
        };
        let span = tokens[i].span.start..tokens[i + len].span.end;
        joined.push(Token {
            lexeme: &input[span.clone()],
            span,
            kind: tokens[i].kind,
        });
        i += len + 1;
    }

    joined.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Number, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2"),
            ],
        );
    }

    #[test]
    fn equation_with_implicit_product() {
        compare_tokens(
            "x^2 - 5x = .5",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Exp, "^"),
                (TokenKind::Number, "2"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Sub, "-"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "5"),
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Eq, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, ".5"),
            ],
        );
    }

    #[test]
    fn call_and_symbol() {
        compare_tokens(
            "sin(x_1, 2.5) $",
            [
                (TokenKind::Name, "sin"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "x_1"),
                (TokenKind::Comma, ","),
                (TokenKind::Whitespace, " "),
                (TokenKind::Number, "2.5"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "$"),
            ],
        );
    }

    fn complete_lexemes(input: &str) -> Vec<&str> {
        tokenize_complete(input).iter().map(|token| token.lexeme).collect()
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(complete_lexemes("1e6 + 2.5E-3"), vec!["1e6", "+", "2.5E-3"]);
        assert_eq!(complete_lexemes("x^2 = 1e-20"), vec!["x", "^", "2", "=", "1e-20"]);
        assert_eq!(tokenize_complete(".5e+2")[0].kind, TokenKind::Number);
    }

    #[test]
    fn euler_after_number_is_not_an_exponent() {
        assert_eq!(complete_lexemes("2e"), vec!["2", "e"]);
        assert_eq!(complete_lexemes("2e - 1"), vec!["2", "e", "-", "1"]);
        assert_eq!(complete_lexemes("2e-x"), vec!["2", "e", "-", "x"]);
        assert_eq!(complete_lexemes("2 e6"), vec!["2", "e6"]);
    }

    #[test]
    fn complete_skips_whitespace() {
        let tokens = tokenize_complete("  3  *  y ");
        let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![TokenKind::Number, TokenKind::Mul, TokenKind::Name]);
        assert_eq!(tokens[2].span, 8..9);
    }
}
