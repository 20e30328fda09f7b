use crate::parser::{
    ast::expr::Expr,
    error::{kind::Delimiter, Error},
    token::{Colon, OpenCurly, OpenSquare},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Writes the given values separated by commas.
fn fmt_comma_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    if let Some((last, rest)) = values.split_last() {
        for value in rest {
            write!(f, "{}, ", value)?;
        }
        last.fmt(f)?;
    }
    Ok(())
}

/// A tuple, such as `()`, `(a,)` or `(a, b)`. Tuples are parsed by [`super::paren::parse_group`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tuple {
    /// The elements of the tuple.
    pub values: Vec<Expr>,

    /// The region of the source code that this tuple was parsed from.
    pub span: Range<usize>,
}

impl Tuple {
    /// Returns the span of the tuple.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        fmt_comma_separated(f, &self.values)?;
        if self.values.len() == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

/// A list, such as `[a, b]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct List {
    /// The elements of the list.
    pub values: Vec<Expr>,

    /// The region of the source code that this list was parsed from.
    pub span: Range<usize>,
}

impl List {
    /// Returns the span of the list.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for List {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenSquare>()?;
        let list = input.parse_comma_separated(open.span.clone(), Delimiter::Square, Expr::parse)?;
        Ok(Self {
            values: list.values,
            span: open.span.start..list.close_span.end,
        })
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        fmt_comma_separated(f, &self.values)?;
        write!(f, "]")
    }
}

/// A single `key: value` entry of a dictionary.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DictEntry {
    /// The key of the entry.
    pub key: Expr,

    /// The value of the entry.
    pub value: Expr,
}

impl Parse for DictEntry {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let key = input.try_parse::<Expr>()?;
        input.try_parse::<Colon>()?;
        let value = input.try_parse::<Expr>()?;
        Ok(Self { key, value })
    }
}

impl fmt::Display for DictEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

/// A dictionary, such as `{}` or `{'a': 1, x: 2}`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dict {
    /// The entries of the dictionary, in source order.
    pub entries: Vec<DictEntry>,

    /// The region of the source code that this dictionary was parsed from.
    pub span: Range<usize>,
}

impl Dict {
    /// Returns the span of the dictionary.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Dict {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenCurly>()?;
        let dict = input.parse_comma_separated(open.span.clone(), Delimiter::Curly, DictEntry::parse)?;
        Ok(Self {
            entries: dict.values,
            span: open.span.start..dict.close_span.end,
        })
    }
}

impl fmt::Display for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        fmt_comma_separated(f, &self.entries)?;
        write!(f, "}}")
    }
}
