use crate::parser::{
    ast::{expr::Expr, literal::LitSym},
    error::{kind::{self, Delimiter}, Error},
    token::{Assign, OpenParen},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A keyword argument in a function call, such as `k=1` in `f(x, k=1)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeywordArg {
    /// The name of the keyword.
    pub name: LitSym,

    /// The value passed for the keyword.
    pub value: Expr,

    /// The region of the source code that this argument was parsed from.
    pub span: Range<usize>,
}

impl Parse for KeywordArg {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        input.try_parse::<Assign>()?;
        let value = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = name.span.start..value.span().end;
        Ok(Self { name, value, span })
    }
}

impl fmt::Display for KeywordArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A single argument in a call, before positional and keyword arguments are separated.
enum Argument {
    Positional(Expr),
    Keyword(KeywordArg),
}

impl Parse for Argument {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.try_parse::<KeywordArg>() {
            Ok(keyword) => Ok(Self::Keyword(keyword)),
            Err(err) if err.fatal => Err(err),
            Err(_) => input.try_parse::<Expr>().map(Self::Positional),
        }
    }
}

/// A function call, such as `f(x, -40)` or `(lambda x: x)(1)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The expression being called.
    pub target: Box<Expr>,

    /// The positional arguments to the function.
    pub args: Vec<Expr>,

    /// The keyword arguments to the function. They always follow the positional arguments.
    pub keywords: Vec<KeywordArg>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the parenthesized argument list following `target`.
    pub fn parse_trailer(input: &mut Parser, target: Expr) -> Result<Self, Error> {
        let open = input.try_parse::<OpenParen>()?;
        let list = input.parse_comma_separated(open.span.clone(), Delimiter::Paren, Argument::parse)?;

        let mut args = Vec::new();
        let mut keywords: Vec<KeywordArg> = Vec::new();
        for argument in list.values {
            match argument {
                Argument::Positional(arg) => {
                    if let Some(keyword) = keywords.last() {
                        return Err(Error::new_fatal(
                            vec![arg.span(), keyword.span.clone()],
                            kind::PositionalAfterKeyword,
                        ));
                    }
                    args.push(arg);
                },
                Argument::Keyword(keyword) => keywords.push(keyword),
            }
        }

        let span = target.span().start..list.close_span.end;
        Ok(Self {
            target: Box::new(target),
            args,
            keywords,
            span,
            paren_span: open.span.start..list.close_span.end,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.target)?;
        let args = self.args.iter().map(ToString::to_string);
        let keywords = self.keywords.iter().map(ToString::to_string);
        write!(f, "{}", args.chain(keywords).collect::<Vec<_>>().join(", "))?;
        write!(f, ")")
    }
}
