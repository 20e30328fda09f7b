//! Conversion from the parser's AST to the Expression Tree.

use crate::error::kind::{DuplicateKeyword, DuplicateParameter};
use phi_error::Error;
use phi_parser::parser::{
    ast::{self, expr::Expr as AstExpr},
    token::op::{BinOpKind, UnaryOpKind},
};
use std::{collections::HashMap, ops::Range};
use super::{BinOp, BoolOp, CmpOp, Expr, Literal, UnaryOp};

/// The kind of node a binary operator of the AST becomes.
enum Lowered {
    Binary(BinOp),
    Bool(BoolOp),
    Compare(CmpOp),
}

impl From<BinOpKind> for Lowered {
    fn from(kind: BinOpKind) -> Self {
        match kind {
            BinOpKind::Exp => Self::Binary(BinOp::Pow),
            BinOpKind::Mul => Self::Binary(BinOp::Mul),
            BinOpKind::Div => Self::Binary(BinOp::Div),
            BinOpKind::FloorDiv => Self::Binary(BinOp::FloorDiv),
            BinOpKind::Mod => Self::Binary(BinOp::Mod),
            BinOpKind::Add => Self::Binary(BinOp::Add),
            BinOpKind::Sub => Self::Binary(BinOp::Sub),
            BinOpKind::BitRight => Self::Binary(BinOp::Shr),
            BinOpKind::BitLeft => Self::Binary(BinOp::Shl),
            BinOpKind::BitAnd => Self::Binary(BinOp::BitAnd),
            BinOpKind::BitXor => Self::Binary(BinOp::BitXor),
            BinOpKind::BitOr => Self::Binary(BinOp::BitOr),
            BinOpKind::Eq => Self::Compare(CmpOp::Eq),
            BinOpKind::NotEq => Self::Compare(CmpOp::NotEq),
            BinOpKind::Less => Self::Compare(CmpOp::Lt),
            BinOpKind::LessEq => Self::Compare(CmpOp::LtE),
            BinOpKind::Greater => Self::Compare(CmpOp::Gt),
            BinOpKind::GreaterEq => Self::Compare(CmpOp::GtE),
            BinOpKind::Is => Self::Compare(CmpOp::Is),
            BinOpKind::IsNot => Self::Compare(CmpOp::IsNot),
            BinOpKind::In => Self::Compare(CmpOp::In),
            BinOpKind::NotIn => Self::Compare(CmpOp::NotIn),
            BinOpKind::And => Self::Bool(BoolOp::And),
            BinOpKind::Or => Self::Bool(BoolOp::Or),
        }
    }
}

impl From<UnaryOpKind> for UnaryOp {
    fn from(kind: UnaryOpKind) -> Self {
        match kind {
            UnaryOpKind::Not => Self::Not,
            UnaryOpKind::Neg => Self::Neg,
            UnaryOpKind::Pos => Self::Pos,
            UnaryOpKind::BitNot => Self::Invert,
        }
    }
}

impl From<ast::Literal> for Expr {
    fn from(literal: ast::Literal) -> Self {
        match literal {
            ast::Literal::Int(int) => Self::Literal(Literal::Int(int.value)),
            ast::Literal::Float(float) => Self::Literal(Literal::Float(float.value)),
            ast::Literal::Str(s) => Self::Literal(Literal::Str(s.value)),
            ast::Literal::Bool(b) => Self::Literal(Literal::Bool(b.value)),
            ast::Literal::None(_) => Self::Literal(Literal::None),
            ast::Literal::Symbol(sym) => Self::Ident(sym.name),
        }
    }
}

/// Returns the spans of the first two occurrences of the same name, if any name repeats.
fn find_repeated<'a>(
    names: impl IntoIterator<Item = (&'a str, Range<usize>)>,
) -> Option<(String, Range<usize>, Range<usize>)> {
    let mut seen: HashMap<&str, Range<usize>> = HashMap::new();
    for (name, span) in names {
        if let Some(first) = seen.get(name) {
            return Some((name.to_string(), first.clone(), span));
        }
        seen.insert(name, span);
    }
    None
}

/// Converts each expression, stopping at the first error.
fn convert_all(exprs: Vec<AstExpr>) -> Result<Vec<Expr>, Error> {
    exprs.into_iter().map(Expr::try_from).collect()
}

/// Appends the operands of `expr` to `operands`, splicing in nested chains of the same operator.
fn push_operand(operands: &mut Vec<Expr>, op: BoolOp, expr: Expr) {
    match expr {
        Expr::BoolOp { op: inner, operands: nested } if inner == op => operands.extend(nested),
        expr => operands.push(expr),
    }
}

impl TryFrom<AstExpr> for Expr {
    type Error = Error;

    fn try_from(expr: AstExpr) -> Result<Self, Self::Error> {
        Ok(match expr {
            AstExpr::Literal(literal) => literal.into(),
            AstExpr::Paren(paren) => Self::try_from(*paren.expr)?,
            AstExpr::Tuple(tuple) => Self::Tuple(convert_all(tuple.values)?),
            AstExpr::List(list) => Self::List(convert_all(list.values)?),
            AstExpr::Dict(dict) => Self::Dict(
                dict.entries
                    .into_iter()
                    .map(|entry| Ok((Self::try_from(entry.key)?, Self::try_from(entry.value)?)))
                    .collect::<Result<_, Error>>()?,
            ),
            AstExpr::Lambda(lambda) => {
                let repeated = find_repeated(
                    lambda.params.iter().map(|param| (param.name.as_str(), param.span.clone())),
                );
                if let Some((name, first, repeat)) = repeated {
                    return Err(Error::new(vec![first, repeat], DuplicateParameter { name }));
                }

                Self::Lambda {
                    params: lambda.params.into_iter().map(|param| param.name).collect(),
                    body: Box::new(Self::try_from(*lambda.body)?),
                }
            },
            AstExpr::Call(call) => {
                let repeated = find_repeated(
                    call.keywords.iter().map(|kw| (kw.name.name.as_str(), kw.name.span.clone())),
                );
                if let Some((name, first, repeat)) = repeated {
                    return Err(Error::new(vec![first, repeat], DuplicateKeyword { name }));
                }

                Self::Call {
                    callee: Box::new(Self::try_from(*call.target)?),
                    args: convert_all(call.args)?,
                    keywords: call.keywords
                        .into_iter()
                        .map(|kw| Ok((kw.name.name, Self::try_from(kw.value)?)))
                        .collect::<Result<_, Error>>()?,
                }
            },
            AstExpr::Index(index) => Self::Subscript {
                target: Box::new(Self::try_from(*index.target)?),
                key: Box::new(Self::try_from(*index.key)?),
            },
            AstExpr::Unary(unary) => match (unary.op.kind, *unary.operand) {
                // `-1` is a single literal, like in the source language; `-(i64::MIN)` stays a negation
                (UnaryOpKind::Neg, AstExpr::Literal(ast::Literal::Int(int))) if int.value != i64::MIN => {
                    Self::Literal(Literal::Int(-int.value))
                },
                (UnaryOpKind::Neg, AstExpr::Literal(ast::Literal::Float(float))) => {
                    Self::Literal(Literal::Float(-float.value))
                },
                (kind, operand) => Self::Unary {
                    op: kind.into(),
                    operand: Box::new(Self::try_from(operand)?),
                },
            },
            AstExpr::Binary(binary) => {
                let lhs = Self::try_from(*binary.lhs)?;
                let rhs = Self::try_from(*binary.rhs)?;
                match Lowered::from(binary.op.kind) {
                    Lowered::Binary(op) => Self::binary(op, lhs, rhs),
                    Lowered::Compare(op) => Self::Compare {
                        op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    Lowered::Bool(op) => {
                        let mut operands = Vec::new();
                        push_operand(&mut operands, op, lhs);
                        push_operand(&mut operands, op, rhs);
                        Self::BoolOp { op, operands }
                    },
                }
            },
            AstExpr::Conditional(conditional) => Self::Conditional {
                test: Box::new(Self::try_from(*conditional.test)?),
                then: Box::new(Self::try_from(*conditional.then)?),
                otherwise: Box::new(Self::try_from(*conditional.otherwise)?),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use phi_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use super::*;

    fn convert(source: &str) -> Result<Expr, Error> {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast)
    }

    #[test]
    fn lambda_application() {
        assert_eq!(convert("(lambda x: x + 1)(3)").unwrap(), Expr::Call {
            callee: Box::new(Expr::Lambda {
                params: vec!["x".to_string()],
                body: Box::new(Expr::binary(BinOp::Add, Expr::ident("x"), Expr::int(1))),
            }),
            args: vec![Expr::int(3)],
            keywords: vec![],
        });
    }

    #[test]
    fn flatten_bool_chains() {
        assert_eq!(convert("a or b or (c or d)").unwrap(), Expr::BoolOp {
            op: BoolOp::Or,
            operands: vec![Expr::ident("a"), Expr::ident("b"), Expr::ident("c"), Expr::ident("d")],
        });
    }

    #[test]
    fn mixed_bool_chains_stay_nested() {
        assert_eq!(convert("a and b or c").unwrap(), Expr::BoolOp {
            op: BoolOp::Or,
            operands: vec![
                Expr::BoolOp {
                    op: BoolOp::And,
                    operands: vec![Expr::ident("a"), Expr::ident("b")],
                },
                Expr::ident("c"),
            ],
        });
    }

    #[test]
    fn negative_literals() {
        assert_eq!(convert("-3").unwrap(), Expr::int(-3));
        assert_eq!(convert("-2.5").unwrap(), Expr::Literal(Literal::Float(-2.5)));
        assert_eq!(convert("-x").unwrap(), Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::ident("x")),
        });
    }

    #[test]
    fn most_negative_integer() {
        assert_eq!(convert("-9223372036854775808").unwrap(), Expr::int(i64::MIN));
        assert_eq!(convert("--9223372036854775808").unwrap(), Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::int(i64::MIN)),
        });
    }

    #[test]
    fn comparisons_and_guards() {
        assert_eq!(convert("(phi % psi) is not UNDEF").unwrap(), Expr::Compare {
            op: CmpOp::IsNot,
            lhs: Box::new(Expr::guard(Expr::ident("phi"), Expr::ident("psi"))),
            rhs: Box::new(Expr::undef()),
        });
    }

    #[test]
    fn subscripts_and_dicts() {
        assert_eq!(convert("{'a': 1}['a']").unwrap(), Expr::Subscript {
            target: Box::new(Expr::Dict(vec![(Expr::str("a"), Expr::int(1))])),
            key: Box::new(Expr::str("a")),
        });
    }

    #[test]
    fn duplicate_parameter() {
        let err = convert("lambda x, y, x: x").unwrap_err();
        assert_eq!(err.spans, vec![7..8, 13..14]);
        assert_eq!(err.downcast_ref::<DuplicateParameter>().unwrap().name, "x");
    }

    #[test]
    fn duplicate_parameter_in_nested_lambda() {
        let err = convert("f(1, lambda a, a: a)").unwrap_err();
        assert!(err.is::<DuplicateParameter>());
    }

    #[test]
    fn duplicate_keyword() {
        let err = convert("f(k=1, k=2)").unwrap_err();
        assert_eq!(err.spans, vec![2..3, 7..8]);
        assert_eq!(err.downcast_ref::<DuplicateKeyword>().unwrap().name, "k");
    }
}
