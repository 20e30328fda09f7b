use crate::{
    parser::{error::{kind, Error}, Parse, Parser},
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, such as `42`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal.
    pub value: i64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A floating-point literal, such as `1.5` or `2e10`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the float literal.
    pub value: f64,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A string literal, such as `'a'` or `"b"`. Escape sequences are resolved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitStr {
    /// The value of the string, with escape sequences resolved.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A boolean literal, either `True` or `False`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitBool {
    /// The value of the boolean literal.
    pub value: bool,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// The `None` literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitNone {
    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

/// A symbol / identifier literal. Symbols are used to represent variables and functions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Name => Ok(Self {
                name: token.lexeme.to_owned(),
                span: token.span,
            }),
            TokenKind::Keyword => Err(Error::new(vec![token.span], kind::ExpectedName {
                keyword: token.lexeme.to_owned(),
            })),
            found => Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[TokenKind::Name],
                found,
            })),
        }
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents a literal value.
///
/// A literal is any value that is written directly into the source code, such as the number `1`,
/// the string `'a'` or the name `x`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer literal.
    Int(LitInt),

    /// A floating-point literal.
    Float(LitFloat),

    /// A string literal.
    Str(LitStr),

    /// A boolean literal.
    Bool(LitBool),

    /// The `None` literal.
    None(LitNone),

    /// A symbol / identifier literal.
    Symbol(LitSym),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Int(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Str(string) => string.span.clone(),
            Literal::Bool(boolean) => boolean.span.clone(),
            Literal::None(none) => none.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let span = token.span.clone();
        match token.kind {
            TokenKind::Int => token.lexeme.parse()
                .map(|value| Literal::Int(LitInt { value, span: span.clone() }))
                .map_err(|_| Error::new_fatal(vec![span], kind::IntegerTooLarge)),
            TokenKind::Float => token.lexeme.parse()
                .map(|value| Literal::Float(LitFloat { value, span: span.clone() }))
                .map_err(|_| Error::new(vec![span], kind::NonFatal)),
            TokenKind::Str => Ok(Literal::Str(LitStr {
                value: unescape(&token.lexeme[1..token.lexeme.len() - 1]),
                span,
            })),
            TokenKind::Name => Ok(Literal::Symbol(LitSym {
                name: token.lexeme.to_owned(),
                span,
            })),
            TokenKind::Keyword => match token.lexeme {
                "True" => Ok(Literal::Bool(LitBool { value: true, span })),
                "False" => Ok(Literal::Bool(LitBool { value: false, span })),
                "None" => Ok(Literal::None(LitNone { span })),
                _ => Err(Error::new(vec![span], kind::ExpectedName {
                    keyword: token.lexeme.to_owned(),
                })),
            },
            found => Err(Error::new(vec![span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Int,
                    TokenKind::Float,
                    TokenKind::Str,
                    TokenKind::Name,
                    TokenKind::Keyword,
                ],
                found,
            })),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(int) => write!(f, "{}", int.value),
            Literal::Float(float) => write!(f, "{:?}", float.value),
            Literal::Str(string) => write!(f, "{}", quote_str(&string.value)),
            Literal::Bool(boolean) => write!(f, "{}", if boolean.value { "True" } else { "False" }),
            Literal::None(_) => write!(f, "None"),
            Literal::Symbol(sym) => sym.fmt(f),
        }
    }
}

/// Resolves the escape sequences in the body of a string literal. Unknown escape sequences are
/// kept as written.
fn unescape(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('0') => result.push('\0'),
            Some(c @ ('\\' | '\'' | '"')) => result.push(c),
            Some(other) => {
                result.push('\\');
                result.push(other);
            },
            None => result.push('\\'),
        }
    }
    result
}

/// Quotes a string the way it would be written in source code, escaping characters as needed.
///
/// Single quotes are preferred, unless the string contains a single quote but no double quote.
pub fn quote_str(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') { '"' } else { '\'' };
    let mut result = String::with_capacity(value.len() + 2);
    result.push(quote);
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\0' => result.push_str("\\0"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            },
            c => result.push(c),
        }
    }
    result.push(quote);
    result
}
