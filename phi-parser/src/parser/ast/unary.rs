use crate::{
    parser::{
        ast::{binary::Binary, expr::Expr, literal::{LitInt, Literal}},
        error::{kind, Error},
        token::op::UnaryOp,
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A unary expression, such as `-x` or `not p`. Unary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression.
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        if let Ok(int) = input.try_parse_with_fn(parse_min_int) {
            return Ok(Expr::Literal(Literal::Int(int)));
        }
        let _ = try_parse_catch_fatal!(input.try_parse::<Self>().map(Expr::Unary));
        Expr::parse_primary(input)
    }
}

/// Parses `-9223372036854775808` as a single literal, since its magnitude alone does not fit in
/// an [`i64`]. A following `**` binds tighter than the minus, so it is left to [`Unary`].
fn parse_min_int(input: &mut Parser) -> Result<LitInt, Error> {
    let minus = input.next_token()?;
    let int = input.next_token()?;
    let is_min = minus.kind == TokenKind::Sub
        && int.kind == TokenKind::Int
        && int.lexeme.parse::<u64>().ok() == Some(i64::MIN.unsigned_abs());
    if !is_min || input.peek_is(TokenKind::Exp) {
        return Err(Error::new(vec![minus.span], kind::NonFatal));
    }
    Ok(LitInt { value: i64::MIN, span: minus.span.start..int.span.end })
}

impl Parse for Unary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let op = input.try_parse::<UnaryOp>()?;
        let operand = {
            // the operand extends over every operator binding tighter than this one, so that
            // `-x ** 2` is `-(x ** 2)` and `not a == b` is `not (a == b)`
            let lhs = Self::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, op.precedence())?
        };
        let span = op.span.start..operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span,
        })
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}
