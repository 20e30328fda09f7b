//! Structs to help parse binary and unary operators.

use crate::{
    parser::{
        error::{Error, kind},
        keyword,
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOpKind {
    Not,
    Neg,
    Pos,
    BitNot,
}

impl UnaryOpKind {
    /// Returns the precedence of the unary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Not => Precedence::Not,
            Self::Neg | Self::Pos | Self::BitNot => Precedence::Neg,
        }
    }

    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "-",
            Self::Pos => "+",
            Self::BitNot => "~",
        }
    }
}

/// A unary operator that takes one operand. All unary operators are prefix operators, and are
/// right-associative.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the unary operator.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }
}

impl Parse for UnaryOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Keyword if token.lexeme == keyword::Not::LEXEME => UnaryOpKind::Not,
            TokenKind::Sub => UnaryOpKind::Neg,
            TokenKind::Add => UnaryOpKind::Pos,
            TokenKind::BitNot => UnaryOpKind::BitNot,
            _ => return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Keyword,
                    TokenKind::Sub,
                    TokenKind::Add,
                    TokenKind::BitNot,
                ],
                found: token.kind,
            })),
        };

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            UnaryOpKind::Not => write!(f, "not "),
            kind => write!(f, "{}", kind.as_str()),
        }
    }
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Add,
    Sub,
    BitRight,
    BitLeft,
    BitAnd,
    BitXor,
    BitOr,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Is,
    IsNot,
    In,
    NotIn,
    And,
    Or,
}

impl BinOpKind {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
            Self::BitRight | Self::BitLeft => Precedence::Shift,
            Self::BitAnd => Precedence::BitAnd,
            Self::BitXor => Precedence::BitXor,
            Self::BitOr => Precedence::BitOr,
            Self::Eq | Self::NotEq | Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq
                | Self::Is | Self::IsNot | Self::In | Self::NotIn => Precedence::Compare,
            Self::And => Precedence::And,
            Self::Or => Precedence::Or,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Returns true if the operation is a comparison. Comparisons cannot be chained.
    pub fn is_comparison(&self) -> bool {
        self.precedence() == Precedence::Compare
    }

    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exp => "**",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::BitRight => ">>",
            Self::BitLeft => "<<",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// The region of the source code that this operator was parsed from. Two-word operators
    /// (`is not` and `not in`) span both words.
    pub span: Range<usize>,
}

impl BinOp {
    /// Returns the precedence of the binary operation.
    pub fn precedence(&self) -> Precedence {
        self.kind.precedence()
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(&self) -> Associativity {
        self.kind.associativity()
    }
}

impl Parse for BinOp {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let token = input.next_token()?;
        let kind = match token.kind {
            TokenKind::Exp => BinOpKind::Exp,
            TokenKind::Mul => BinOpKind::Mul,
            TokenKind::Div => BinOpKind::Div,
            TokenKind::FloorDiv => BinOpKind::FloorDiv,
            TokenKind::Mod => BinOpKind::Mod,
            TokenKind::Add => BinOpKind::Add,
            TokenKind::Sub => BinOpKind::Sub,
            TokenKind::BitRight => BinOpKind::BitRight,
            TokenKind::BitLeft => BinOpKind::BitLeft,
            TokenKind::BitAnd => BinOpKind::BitAnd,
            TokenKind::BitXor => BinOpKind::BitXor,
            TokenKind::BitOr => BinOpKind::BitOr,
            TokenKind::Eq => BinOpKind::Eq,
            TokenKind::NotEq => BinOpKind::NotEq,
            TokenKind::Less => BinOpKind::Less,
            TokenKind::LessEq => BinOpKind::LessEq,
            TokenKind::Greater => BinOpKind::Greater,
            TokenKind::GreaterEq => BinOpKind::GreaterEq,
            TokenKind::Keyword => match token.lexeme {
                "and" => BinOpKind::And,
                "or" => BinOpKind::Or,
                "in" => BinOpKind::In,
                "is" => match input.try_parse::<keyword::Not>() {
                    Ok(not) => return Ok(Self { kind: BinOpKind::IsNot, span: token.span.start..not.span.end }),
                    Err(_) => BinOpKind::Is,
                },
                "not" => {
                    let in_kw = input.try_parse::<keyword::In>()?;
                    return Ok(Self { kind: BinOpKind::NotIn, span: token.span.start..in_kw.span.end });
                },
                _ => return Err(Error::new(vec![token.span], kind::NonFatal)),
            },
            _ => return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                expected: &[
                    TokenKind::Exp,
                    TokenKind::Mul,
                    TokenKind::Div,
                    TokenKind::FloorDiv,
                    TokenKind::Mod,
                    TokenKind::Add,
                    TokenKind::Sub,
                    TokenKind::BitRight,
                    TokenKind::BitLeft,
                    TokenKind::BitAnd,
                    TokenKind::BitXor,
                    TokenKind::BitOr,
                    TokenKind::Eq,
                    TokenKind::NotEq,
                    TokenKind::Less,
                    TokenKind::LessEq,
                    TokenKind::Greater,
                    TokenKind::GreaterEq,
                    TokenKind::Keyword,
                ],
                found: token.kind,
            })),
        };

        Ok(Self {
            kind,
            span: token.span,
        })
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.as_str())
    }
}
