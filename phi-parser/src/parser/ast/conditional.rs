use crate::parser::{
    ast::{binary::Binary, expr::Expr, unary::Unary},
    error::Error,
    keyword,
    Parse,
    Parser,
    Precedence,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A conditional expression, such as `a if c else b`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Conditional {
    /// The expression produced when the test holds.
    pub then: Box<Expr>,

    /// The test.
    pub test: Box<Expr>,

    /// The expression produced when the test does not hold.
    pub otherwise: Box<Expr>,

    /// The region of the source code that this expression was parsed from.
    pub span: Range<usize>,
}

impl Conditional {
    /// Returns the span of the conditional expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing an expression, parse ahead to see if it is the first branch of a
    /// conditional expression. If it is not, `then` is returned unchanged.
    ///
    /// The test cannot itself be an unparenthesized conditional or function, while the `else`
    /// branch can be any expression; `a if b else c if d else e` is `a if b else (c if d else e)`.
    pub fn parse_rest(input: &mut Parser, then: Expr) -> Result<Expr, Error> {
        if input.try_parse::<keyword::If>().is_err() {
            return Ok(then);
        }

        let test = {
            let lhs = Unary::parse_or_lower(input).map_err(Error::into_fatal)?;
            Binary::parse_expr(input, lhs, Precedence::Any)?
        };
        input.try_parse::<keyword::Else>().map_err(Error::into_fatal)?;
        let otherwise = input.try_parse::<Expr>().map_err(Error::into_fatal)?;

        let span = then.span().start..otherwise.span().end;
        Ok(Expr::Conditional(Conditional {
            then: Box::new(then),
            test: Box::new(test),
            otherwise: Box::new(otherwise),
            span,
        }))
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} if {} else {}", self.then, self.test, self.otherwise)
    }
}
