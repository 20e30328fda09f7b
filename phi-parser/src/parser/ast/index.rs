use crate::parser::{
    ast::{collection::Tuple, expr::Expr},
    error::{kind::{self, Delimiter}, Error},
    token::OpenSquare,
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A subscript, such as `d['a']`. A subscript with several comma-separated keys, such as
/// `m[i, j]`, is indexed by a tuple.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Index {
    /// The expression being indexed.
    pub target: Box<Expr>,

    /// The key.
    pub key: Box<Expr>,

    /// The region of the source code that this subscript was parsed from.
    pub span: Range<usize>,
}

impl Index {
    /// Returns the span of the subscript.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the bracketed key following `target`.
    pub fn parse_trailer(input: &mut Parser, target: Expr) -> Result<Self, Error> {
        let open = input.try_parse::<OpenSquare>()?;
        let keys = input.parse_comma_separated(open.span.clone(), Delimiter::Square, Expr::parse)?;
        let brackets = open.span.start..keys.close_span.end;

        let mut values = keys.values;
        let key = match values.len() {
            0 => return Err(Error::new_fatal(vec![brackets], kind::EmptyIndex)),
            1 if !keys.trailing_comma => values.remove(0),
            _ => {
                let span = values[0].span().start..values[values.len() - 1].span().end;
                Expr::Tuple(Tuple { values, span })
            },
        };

        let span = target.span().start..brackets.end;
        Ok(Self {
            target: Box::new(target),
            key: Box::new(key),
            span,
        })
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.target, self.key)
    }
}
