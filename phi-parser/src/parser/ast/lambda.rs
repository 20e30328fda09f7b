use crate::parser::{
    ast::{expr::Expr, literal::LitSym},
    error::Error,
    keyword,
    token::{Colon, Comma},
    Parse,
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An anonymous function, such as `lambda x, y: x + y` or `lambda: 1`.
///
/// The body extends as far to the right as possible, so `lambda x: x + 1` is a function whose body
/// is `x + 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lambda {
    /// The parameters of the function, in order.
    pub params: Vec<LitSym>,

    /// The body of the function.
    pub body: Box<Expr>,

    /// The region of the source code that this function was parsed from.
    pub span: Range<usize>,
}

impl Lambda {
    /// Returns the span of the function.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Lambda {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lambda = input.try_parse::<keyword::Lambda>()?;

        // nothing else starts with `lambda`, so every error from here on is fatal
        let mut params = Vec::new();
        if input.try_parse::<Colon>().is_err() {
            loop {
                params.push(input.try_parse::<LitSym>().map_err(Error::into_fatal)?);
                if input.try_parse::<Comma>().is_err() {
                    break;
                }
            }
            input.try_parse::<Colon>().map_err(Error::into_fatal)?;
        }

        let body = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = lambda.span.start..body.span().end;
        Ok(Self {
            params,
            body: Box::new(body),
            span,
        })
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lambda")?;
        for (i, param) in self.params.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, param)?;
        }
        write!(f, ": {}", self.body)
    }
}
