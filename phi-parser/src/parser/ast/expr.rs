use std::{fmt, ops::Range};
use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            collection::{Dict, List, Tuple},
            conditional::Conditional,
            index::Index,
            lambda::Lambda,
            literal::Literal,
            paren::{self, Paren},
            unary::Unary,
        },
        error::{kind::{self, Delimiter}, Error},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
    try_parse_catch_fatal,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a general expression.
///
/// An expression is any valid piece of code that can be evaluated to produce a value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A tuple, such as `()`, `(a,)` or `(a, b)`.
    Tuple(Tuple),

    /// A list, such as `[a, b]`.
    List(List),

    /// A dictionary, such as `{'a': 1}`.
    Dict(Dict),

    /// An anonymous function, such as `lambda x: x + 1`.
    Lambda(Lambda),

    /// A function call, such as `f(x, k=1)`.
    Call(Call),

    /// A subscript, such as `d['a']`.
    Index(Index),

    /// A unary operation, such as `-1` or `not x`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`, `a and b` or `x is not None`.
    Binary(Binary),

    /// A conditional expression, such as `a if c else b`.
    Conditional(Conditional),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Tuple(tuple) => tuple.span(),
            Expr::List(list) => list.span(),
            Expr::Dict(dict) => dict.span(),
            Expr::Lambda(lambda) => lambda.span(),
            Expr::Call(call) => call.span(),
            Expr::Index(index) => index.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
            Expr::Conditional(conditional) => conditional.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.expr.innermost(),
            expr => expr,
        }
    }

    /// Parses a primary expression: an atom (literal, parenthesized expression, tuple, list or
    /// dictionary) followed by any number of calls and subscripts.
    pub fn parse_primary(input: &mut Parser) -> Result<Self, Error> {
        let mut expr = Self::parse_atom(input)?;

        loop {
            if input.peek_is(TokenKind::OpenParen) {
                expr = Expr::Call(Call::parse_trailer(input, expr)?);
            } else if input.peek_is(TokenKind::OpenSquare) {
                expr = Expr::Index(Index::parse_trailer(input, expr)?);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parses an atom, the simplest kind of expression.
    fn parse_atom(input: &mut Parser) -> Result<Self, Error> {
        let _ = try_parse_catch_fatal!(input.try_parse_with_fn(paren::parse_group));
        let _ = try_parse_catch_fatal!(input.try_parse::<List>().map(Self::List));
        let _ = try_parse_catch_fatal!(input.try_parse::<Dict>().map(Self::Dict));
        input.try_parse::<Literal>().map(Self::Literal)
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        if let Some(token) = input.peek_token() {
            let delimiter = match token.kind {
                TokenKind::CloseParen => Some(Delimiter::Paren),
                TokenKind::CloseSquare => Some(Delimiter::Square),
                TokenKind::CloseCurly => Some(Delimiter::Curly),
                _ => None,
            };
            if let Some(delimiter) = delimiter {
                return Err(input.error_fatal(kind::Unclosed { delimiter, opening: false }));
            }
        }

        let _ = try_parse_catch_fatal!(input.try_parse::<Lambda>().map(Self::Lambda));
        let lhs = input.try_parse_with_fn(Unary::parse_or_lower)?;
        let expr = Binary::parse_expr(input, lhs, Precedence::Any)?;
        Conditional::parse_rest(input, expr)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Tuple(tuple) => tuple.fmt(f),
            Expr::List(list) => list.fmt(f),
            Expr::Dict(dict) => dict.fmt(f),
            Expr::Lambda(lambda) => lambda.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Index(index) => index.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
            Expr::Conditional(conditional) => conditional.fmt(f),
        }
    }
}
