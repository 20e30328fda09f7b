pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
///
/// Input that no token pattern accepts (such as an unterminated string) is emitted as a
/// [`TokenKind::Symbol`] token, so that the parser can report it at the right location.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
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
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn lambda_application() {
        compare_tokens(
            "(lambda x: x ** 2)(3.5e1)",
            [
                (TokenKind::OpenParen, "("),
                (TokenKind::Keyword, "lambda"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "x"),
                (TokenKind::Colon, ":"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Exp, "**"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Float, "3.5e1"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn keywords_and_names() {
        compare_tokens(
            "iota is not None and inside",
            [
                (TokenKind::Name, "iota"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword, "is"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword, "not"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword, "None"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Keyword, "and"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "inside"),
            ],
        );
    }

    #[test]
    fn dict_with_strings() {
        compare_tokens(
            r#"{'a': "b\"c"} | x // 2"#,
            [
                (TokenKind::OpenCurly, "{"),
                (TokenKind::Str, "'a'"),
                (TokenKind::Colon, ":"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Str, r#""b\"c""#),
                (TokenKind::CloseCurly, "}"),
                (TokenKind::Whitespace, " "),
                (TokenKind::BitOr, "|"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Name, "x"),
                (TokenKind::Whitespace, " "),
                (TokenKind::FloorDiv, "//"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn unterminated_string_is_symbol() {
        let tokens = tokenize_complete("'abc");
        assert_eq!(tokens[0].kind, TokenKind::Symbol);
        assert_eq!(tokens[0].span.start, 0);
    }
}
