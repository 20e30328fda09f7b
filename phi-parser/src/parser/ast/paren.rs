use crate::parser::{
    ast::{collection::Tuple, expr::Expr},
    error::{kind::Delimiter, Error},
    token::OpenParen,
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parenthesized expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

/// Parses a parenthesized group, which is either a parenthesized expression or a tuple: `(a)` is
/// a parenthesized expression, while `()`, `(a,)` and `(a, b)` are tuples.
pub fn parse_group(input: &mut Parser) -> Result<Expr, Error> {
    let open = input.try_parse::<OpenParen>()?;
    let group = input.parse_comma_separated(open.span.clone(), Delimiter::Paren, Expr::parse)?;
    let span = open.span.start..group.close_span.end;

    let mut values = group.values;
    if values.len() == 1 && !group.trailing_comma {
        Ok(Expr::Paren(Paren {
            expr: Box::new(values.remove(0)),
            span,
        }))
    } else {
        Ok(Expr::Tuple(Tuple { values, span }))
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}
