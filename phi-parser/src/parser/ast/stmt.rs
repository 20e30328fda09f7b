use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{kind, Error},
        token,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binding of a name to the value of an expression, such as `x = 1 + 2`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assign {
    /// The name being bound.
    pub target: LitSym,

    /// The bound expression.
    pub value: Expr,

    /// The region of the source code that this assignment was parsed from.
    pub span: Range<usize>,
}

impl Assign {
    /// Returns the span of the assignment.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Assign {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let target = input.try_parse::<LitSym>()?;
        input.try_parse::<token::Assign>()?;
        let value = input.try_parse::<Expr>().map_err(Error::into_fatal)?;
        let span = target.span.start..value.span().end;
        Ok(Self { target, value, span })
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.target, self.value)
    }
}

/// A statement: either an assignment or a bare expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    /// A binding of a name, such as `x = 1`.
    Assign(Assign),

    /// An expression to evaluate.
    Expr(Expr),
}

impl Stmt {
    /// Returns the span of the statement.
    pub fn span(&self) -> Range<usize> {
        match self {
            Stmt::Assign(assign) => assign.span(),
            Stmt::Expr(expr) => expr.span(),
        }
    }
}

impl Parse for Stmt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = try_parse_catch_fatal!(input.try_parse::<Assign>().map(Self::Assign));
        let expr = input.try_parse::<Expr>()?;
        if input.peek_is(TokenKind::Assign) {
            return Err(Error::new_fatal(vec![expr.span()], kind::InvalidAssignTarget));
        }
        Ok(Self::Expr(expr))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Assign(assign) => assign.fmt(f),
            Stmt::Expr(expr) => expr.fmt(f),
        }
    }
}
