pub mod ast;
pub mod error;
pub mod keyword;
pub mod token;

use error::{Error, kind::{self, Delimiter}};
use phi_error::ErrorKind;
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Attempts to parse a value with the given parsing expression, returning it from the enclosing
/// function if successful.
///
/// Fatal errors immediately short-circuit the parsing process. A non-fatal error is the value of
/// the macro, so the caller can try another parser.
#[macro_export]
macro_rules! try_parse_catch_fatal {
    ($expr:expr) => {{
        match $expr {
            Ok(value) => return Ok(value),
            Err(err) if err.fatal => return Err(err),
            // ignore this error and try the next parser, or return it
            err => err,
        }
    }};
}

/// A high-level parser for the language. This is the type to use to parse an arbitrary piece of
/// code into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
        }
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream.
    pub fn error_fatal(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the next significant token, or the end of the source code if there is
    /// none.
    pub fn span(&self) -> Range<usize> {
        self.peek_token()
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the next token that is not whitespace, without moving the cursor. Returns
    /// [`None`] if only whitespace remains.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor.min(self.tokens.len())..]
            .iter()
            .find(|token| !token.is_whitespace())
    }

    /// Returns true if the next significant token is of the given kind.
    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek_token().map_or(false, |token| token.kind == kind)
    }

    /// Returns true if the next significant token is the given keyword.
    pub fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek_token().map_or(false, |token| token.is_keyword(keyword))
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Parses a value from the given stream of tokens without advancing the cursor, to look ahead
    /// at what comes next.
    pub fn peek<T: Parse>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        let value = T::parse(self);
        self.cursor = start;
        value
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation predicate.
    /// The value must parse successfully, **and** the predicate must return [`Ok`] for this
    /// function to return successfully.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        self.try_parse_with_fn(|input| {
            let value = T::parse(input)?;
            predicate(&value, input)?;
            Ok(value)
        })
    }

    /// Parses comma-separated values up to and including the closing delimiter matching the
    /// already consumed opening delimiter at `open_span`. A trailing comma is allowed.
    ///
    /// If neither a comma nor the closing delimiter follows a value, a fatal [`kind::Unclosed`]
    /// error pointing at the opening delimiter is returned.
    pub fn parse_comma_separated<T, F>(
        &mut self,
        open_span: Range<usize>,
        delimiter: Delimiter,
        mut f: F,
    ) -> Result<CommaSeparated<T>, Error>
    where
        F: FnMut(&mut Parser<'source>) -> Result<T, Error>,
    {
        let close = match delimiter {
            Delimiter::Paren => TokenKind::CloseParen,
            Delimiter::Square => TokenKind::CloseSquare,
            Delimiter::Curly => TokenKind::CloseCurly,
        };
        let unclosed = || Error::new_fatal(vec![open_span.clone()], kind::Unclosed {
            delimiter,
            opening: true,
        });

        let mut values = Vec::new();
        let mut trailing_comma = false;
        loop {
            if self.peek_is(close) {
                let close = self.next_token()?;
                return Ok(CommaSeparated { values, trailing_comma, close_span: close.span });
            }

            match f(self) {
                Ok(value) => values.push(value),
                Err(err) if err.fatal => return Err(err),
                Err(_) if self.peek_token().is_none() => return Err(unclosed()),
                Err(err) => return Err(err),
            }

            match self.peek_token() {
                Some(token) if token.kind == TokenKind::Comma => {
                    self.next_token()?;
                    trailing_comma = true;
                },
                Some(token) if token.kind == close => trailing_comma = false,
                _ => return Err(unclosed()),
            }
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        match self.peek_token() {
            None => Ok(value),
            Some(token) => {
                let closing = match token.kind {
                    TokenKind::CloseParen => Some(Delimiter::Paren),
                    TokenKind::CloseSquare => Some(Delimiter::Square),
                    TokenKind::CloseCurly => Some(Delimiter::Curly),
                    _ => None,
                };
                match closing {
                    Some(delimiter) => Err(self.error_fatal(kind::Unclosed { delimiter, opening: false })),
                    None => Err(self.error(kind::ExpectedEof)),
                }
            },
        }
    }
}

/// The result of [`Parser::parse_comma_separated`].
#[derive(Debug, Clone, PartialEq)]
pub struct CommaSeparated<T> {
    /// The parsed values.
    pub values: Vec<T>,

    /// Whether the last value was followed by a comma.
    pub trailing_comma: bool,

    /// The span of the closing delimiter.
    pub close_span: Range<usize>,
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    ///
    /// This function should be used by consumers of the library.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For unary
    /// operations, this means `op op a` is evaluated as `op (op a)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of logical or (`or`).
    Or,

    /// Precedence of logical and (`and`).
    And,

    /// Precedence of logical not (`not`).
    Not,

    /// Precedence of comparisons (`==`, `!=`, `<`, `<=`, `>`, `>=`, `is`, `is not`, `in`, and
    /// `not in`).
    Compare,

    /// Precedence of bitwise or (`|`), also used to merge dictionaries.
    BitOr,

    /// Precedence of bitwise xor (`^`).
    BitXor,

    /// Precedence of bitwise and (`&`).
    BitAnd,

    /// Precedence of bitshifts (`<<` and `>>`).
    Shift,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`), division (`/` and `//`), and modulo / guards (`%`),
    /// which separate factors.
    Factor,

    /// Precedence of unary negation, unary plus and bitwise not (`-`, `+`, and `~`).
    Neg,

    /// Precedence of exponentiation (`**`).
    Exp,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{
        Binary,
        Call,
        Expr,
        Lambda,
        LitInt,
        LitNone,
        LitSym,
        Literal,
        Paren,
        Stmt,
    };
    use token::op::{BinOp, BinOpKind};

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).try_parse_full::<Expr>().unwrap_err()
    }

    fn int(value: i64, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Int(LitInt { value, span }))
    }

    fn sym(name: &str, span: Range<usize>) -> Expr {
        Expr::Literal(Literal::Symbol(LitSym { name: name.to_string(), span }))
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), int(16, 0..2));
    }

    #[test]
    fn binary_precedence() {
        assert_eq!(parse("1 + 2 * 3"), Expr::Binary(Binary {
            lhs: Box::new(int(1, 0..1)),
            op: BinOp { kind: BinOpKind::Add, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int(2, 4..5)),
                op: BinOp { kind: BinOpKind::Mul, span: 6..7 },
                rhs: Box::new(int(3, 8..9)),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn exponent_is_right_associative() {
        assert_eq!(parse("2 ** 3 ** 4"), Expr::Binary(Binary {
            lhs: Box::new(int(2, 0..1)),
            op: BinOp { kind: BinOpKind::Exp, span: 2..4 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(int(3, 5..6)),
                op: BinOp { kind: BinOpKind::Exp, span: 7..9 },
                rhs: Box::new(int(4, 10..11)),
                span: 5..11,
            })),
            span: 0..11,
        }));
    }

    #[test]
    fn lambda_application() {
        assert_eq!(parse("(lambda x: x + 1)(3)"), Expr::Call(Call {
            target: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Lambda(Lambda {
                    params: vec![LitSym { name: "x".to_string(), span: 8..9 }],
                    body: Box::new(Expr::Binary(Binary {
                        lhs: Box::new(sym("x", 11..12)),
                        op: BinOp { kind: BinOpKind::Add, span: 13..14 },
                        rhs: Box::new(int(1, 15..16)),
                        span: 11..16,
                    })),
                    span: 1..16,
                })),
                span: 0..17,
            })),
            args: vec![int(3, 18..19)],
            keywords: vec![],
            span: 0..20,
            paren_span: 17..20,
        }));
    }

    #[test]
    fn two_word_operators() {
        assert_eq!(parse("x is not None"), Expr::Binary(Binary {
            lhs: Box::new(sym("x", 0..1)),
            op: BinOp { kind: BinOpKind::IsNot, span: 2..8 },
            rhs: Box::new(Expr::Literal(Literal::None(LitNone { span: 9..13 }))),
            span: 0..13,
        }));

        let Expr::Binary(binary) = parse("k not in ks") else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.op.kind, BinOpKind::NotIn);
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        assert_eq!(parse("not a == b and c").to_string(), "not a == b and c");
        let Expr::Binary(and) = parse("not a == b and c") else {
            panic!("expected a binary expression");
        };
        assert_eq!(and.op.kind, BinOpKind::And);
        assert!(matches!(*and.lhs, Expr::Unary(_)));
    }

    #[test]
    fn nested_conditional() {
        let Expr::Conditional(cond) = parse("a if c else b if d else e") else {
            panic!("expected a conditional expression");
        };
        assert_eq!(cond.then.to_string(), "a");
        assert_eq!(cond.test.to_string(), "c");
        assert_eq!(cond.otherwise.to_string(), "b if d else e");
    }

    #[test]
    fn lambda_body_is_greedy() {
        let Expr::Lambda(lambda) = parse("lambda x, y: x if y else lambda: x") else {
            panic!("expected a lambda");
        };
        assert_eq!(lambda.params.len(), 2);
        assert!(matches!(*lambda.body, Expr::Conditional(_)));
    }

    #[test]
    fn call_with_keywords() {
        let Expr::Call(call) = parse("KILLED(x, iota(z) % singular(z), by=y)") else {
            panic!("expected a call");
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.keywords.len(), 1);
        assert_eq!(call.keywords[0].name.name, "by");
        assert_eq!(call.args[1].to_string(), "iota(z) % singular(z)");
    }

    #[test]
    fn tuples_and_parens() {
        assert!(matches!(parse("()"), Expr::Tuple(tuple) if tuple.values.is_empty()));
        assert!(matches!(parse("(a,)"), Expr::Tuple(tuple) if tuple.values.len() == 1));
        assert!(matches!(parse("(a, b)"), Expr::Tuple(tuple) if tuple.values.len() == 2));
        assert!(matches!(parse("(a)"), Expr::Paren(_)));
    }

    #[test]
    fn display_collections() {
        for source in [
            "{'a': 1} | {'b': 2}",
            "{i: 1}[i]",
            "[1, 2.5, 'x', None, True]",
            "(a,)",
            "f()",
            "-x ** 2",
        ] {
            assert_eq!(parse(source).to_string(), source);
        }
    }

    #[test]
    fn chained_comparison() {
        let err = parse_err("a < b < c");
        assert!(err.fatal);
        assert!(err.is::<kind::ChainedComparison>());
        assert_eq!(err.spans, vec![2..3, 6..7]);

        // parenthesized comparisons are fine
        parse("(a < b) < c");
    }

    #[test]
    fn positional_after_keyword() {
        let err = parse_err("f(k=1, 2)");
        assert!(err.fatal);
        assert!(err.is::<kind::PositionalAfterKeyword>());
        assert_eq!(err.spans, vec![7..8, 2..5]);
    }

    #[test]
    fn unclosed_delimiters() {
        let err = parse_err("(1 + 2");
        assert!(err.is::<kind::Unclosed>());
        assert_eq!(err.spans, vec![0..1]);

        let err = parse_err("1 + 2)");
        assert!(err.is::<kind::Unclosed>());
        assert_eq!(err.spans, vec![5..6]);

        let err = parse_err("{'a': [1, 2}");
        assert!(err.is::<kind::Unclosed>());
        assert_eq!(err.spans, vec![6..7]);
    }

    #[test]
    fn integer_too_large() {
        let err = parse_err("99999999999999999999");
        assert!(err.fatal);
        assert!(err.is::<kind::IntegerTooLarge>());
    }

    #[test]
    fn most_negative_integer() {
        assert_eq!(parse("-9223372036854775808"), int(i64::MIN, 0..20));
        assert_eq!(parse("- 9223372036854775808"), int(i64::MIN, 0..21));
        assert!(parse_err("9223372036854775808").is::<kind::IntegerTooLarge>());
        assert!(parse_err("-9223372036854775809").is::<kind::IntegerTooLarge>());
    }

    #[test]
    fn missing_else() {
        let err = parse_err("a if b c");
        assert!(err.fatal);
        assert!(err.is::<kind::ExpectedKeyword>());
    }

    #[test]
    fn statements() {
        let stmt = Parser::new("f = lambda y: y").try_parse_full::<Stmt>().unwrap();
        let Stmt::Assign(assign) = stmt else {
            panic!("expected an assignment");
        };
        assert_eq!(assign.target.name, "f");
        assert_eq!(assign.value.to_string(), "lambda y: y");

        let stmt = Parser::new("x == 1").try_parse_full::<Stmt>().unwrap();
        assert!(matches!(stmt, Stmt::Expr(_)));

        let err = Parser::new("f(x) = 1").try_parse_full::<Stmt>().unwrap_err();
        assert!(err.is::<kind::InvalidAssignTarget>());
    }
}
