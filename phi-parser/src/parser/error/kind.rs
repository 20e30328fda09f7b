use ariadne::Fmt;
use phi_attrs::ErrorKind;
use phi_error::EXPR;
use crate::tokenizer::TokenKind;

/// An intentionally useless error. This should only be used for non-fatal errors, as it contains
/// no useful information.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "an internal non-fatal error occurred while parsing",
    labels = ["here"],
    help = "you should never see this error; please report this as a bug"
)]
pub struct NonFatal;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of file",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// The end of the source code was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected end of file",
    labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
)]
pub struct ExpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A specific keyword was expected, but something else was found.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("expected keyword `{}`", keyword),
    labels = [format!("add `{}` here", keyword)],
)]
pub struct ExpectedKeyword {
    /// The keyword that was expected.
    pub keyword: &'static str,
}

/// Encountered a keyword where a name was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "expected a name",
    labels = [format!("found keyword `{}`", keyword)],
    help = "keywords cannot be used as names",
)]
pub struct ExpectedName {
    /// The keyword that was found.
    pub keyword: String,
}

/// A pair of delimiters was not closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unclosed {}", delimiter.name()),
    labels = [format!("this {} is not closed", delimiter.name())],
    help = if *opening {
        format!("add a closing `{}` somewhere after this", delimiter.close())
    } else {
        format!("add an opening `{}` somewhere before this", delimiter.open())
    },
)]
pub struct Unclosed {
    /// The kind of delimiter.
    pub delimiter: Delimiter,

    /// Whether the delimiter was an opening delimiter. Otherwise, it was a closing delimiter with
    /// no opening counterpart.
    pub opening: bool,
}

/// The kinds of paired delimiters in the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Paren,
    Square,
    Curly,
}

impl Delimiter {
    /// A human readable name for the delimiter.
    pub fn name(&self) -> &'static str {
        match self {
            Delimiter::Paren => "parenthesis",
            Delimiter::Square => "bracket",
            Delimiter::Curly => "brace",
        }
    }

    /// The opening delimiter.
    pub fn open(&self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Square => '[',
            Delimiter::Curly => '{',
        }
    }

    /// The closing delimiter.
    pub fn close(&self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Square => ']',
            Delimiter::Curly => '}',
        }
    }
}

/// Comparisons cannot be chained.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "comparisons cannot be chained",
    labels = ["this comparison", "is chained to this one"],
    help = format!("split the comparison with {}, e.g. `a < b and b < c`", "and".fg(EXPR)),
)]
pub struct ChainedComparison;

/// A positional argument followed a keyword argument in a call.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "positional argument follows keyword argument",
    labels = ["this positional argument", "comes after this keyword argument"],
    help = "move the positional arguments before the keyword arguments",
)]
pub struct PositionalAfterKeyword;

/// An integer literal does not fit in a 64-bit signed integer.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "integer literal is too large",
    labels = ["this integer"],
    help = format!("integers must lie between {} and {}", i64::MIN, i64::MAX),
)]
pub struct IntegerTooLarge;

/// The left-hand side of an assignment is not a name.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "invalid assignment target",
    labels = ["this cannot be assigned to"],
    help = "only plain names can be assigned, e.g. `x = 1`",
)]
pub struct InvalidAssignTarget;

/// A subscript with no key.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "missing index",
    labels = [format!("add an {} inside these brackets", "expression".fg(EXPR))],
)]
pub struct EmptyIndex;
