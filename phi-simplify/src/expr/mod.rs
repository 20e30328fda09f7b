//! The Expression Tree that every rewrite pass reads and writes.
//!
//! The [`Expr`](phi_parser::parser::ast::expr::Expr) type from `phi_parser` mirrors the source
//! text closely: it records spans, keeps parentheses, and represents `a and b and c` as nested
//! binary nodes. That is convenient for reporting errors, but not for rewriting.
//!
//! This module defines a separate [`Expr`] with no source positions. Parentheses are dropped,
//! chains of the same boolean operator are flattened into a single [`Expr::BoolOp`], and unary
//! minus applied to a number is folded into a negative literal. Conversion from the parser's AST
//! is done with [`TryFrom`], since some well-formed source code still describes a malformed tree
//! (for example, a `lambda` that declares the same parameter twice).
//!
//! ```
//! use phi_parser::parser::{ast::Expr as AstExpr, Parser};
//! use phi_simplify::expr::{BoolOp, Expr};
//!
//! let ast = Parser::new("a and (b and c)").try_parse_full::<AstExpr>().unwrap();
//! let expr = Expr::try_from(ast).unwrap();
//! assert_eq!(expr, Expr::BoolOp {
//!     op: BoolOp::And,
//!     operands: vec![Expr::ident("a"), Expr::ident("b"), Expr::ident("c")],
//! });
//! ```
//!
//! # Structural equality
//!
//! Two trees are structurally equal if they have the same shape, the same operators, and the
//! same literals and names at every position. The [`PartialEq`] implementation checks exactly
//! this, and [`Expr::canonical`] produces a textual key with the same meaning that can be hashed
//! and compared cheaply. The canonical key is what the pipeline uses to detect a fixed point and
//! what the duplicate guard remover uses to recognize repeated guards.
//!
//! # Guards
//!
//! There is no dedicated node for guards. `payload % condition` (an [`Expr::Binary`] with
//! [`BinOp::Mod`]) means "`payload`, defined only if `condition` holds", and the identifier
//! [`UNDEF`] denotes an undefined result. See [`Expr::guard`] and [`Expr::as_guard`].

mod convert;
mod display;
mod iter;

pub use iter::ExprIter;

use crate::error::kind::DuplicateParameter;
use indexmap::IndexSet;
use phi_error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The name of the sentinel identifier denoting an undefined result.
pub const UNDEF: &str = "UNDEF";

/// The name of the function that tests whether an expression is defined.
pub const DEFINED: &str = "defined";

/// A literal value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// `None`.
    None,

    /// `True` or `False`.
    Bool(bool),

    /// An integer, such as `2` or `-144`.
    Int(i64),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(f64),

    /// A string, such as `'a'`.
    Str(String),
}

impl Literal {
    /// Returns the truthiness of the literal.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(n) => *n != 0.0,
            Self::Str(s) => !s.is_empty(),
        }
    }

    /// Returns true if both literals would compare equal with `==`.
    ///
    /// Numbers compare by value regardless of their representation, so `1`, `1.0` and `True` are
    /// all equal. This is the equality used to match dictionary keys.
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Returns the numeric value of the literal, if it is a number or a boolean.
    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    /// `not x`
    Not,

    /// `-x`
    Neg,

    /// `+x`
    Pos,

    /// `~x`
    Invert,
}

/// A binary operator that is neither a boolean operator nor a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,

    /// `%`, which doubles as the guard operator.
    Mod,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitXor,
    BitOr,
}

/// A boolean operator. Boolean operators are n-ary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoolOp {
    And,
    Or,
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// A node of the Expression Tree.
///
/// Every node owns its children, so a subtree can never appear at two positions of the same tree.
/// Rewrites build new nodes out of the old ones instead of sharing them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value, such as `1`, `'a'` or `True`.
    Literal(Literal),

    /// A reference to a name, such as `x`.
    Ident(String),

    /// A tuple, such as `(a, b)`.
    Tuple(Vec<Expr>),

    /// A list, such as `[a, b]`.
    List(Vec<Expr>),

    /// A dictionary literal, such as `{'a': 1}`. Entries keep their source order.
    Dict(Vec<(Expr, Expr)>),

    /// A function definition, such as `lambda x, y: x + y`. Parameter names are unique.
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },

    /// A function call, such as `f(a, k=b)`.
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<(String, Expr)>,
    },

    /// A subscript, such as `d['a']`.
    Subscript {
        target: Box<Expr>,
        key: Box<Expr>,
    },

    /// A unary operation, such as `-x` or `not x`.
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// A binary operation, such as `a + b` or the guard `a % g`.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// A chain of the same boolean operator, such as `a and b and c`. There are always at least
    /// two operands.
    BoolOp {
        op: BoolOp,
        operands: Vec<Expr>,
    },

    /// A single comparison, such as `a is not b`.
    Compare {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// A conditional expression, `then if test else otherwise`.
    Conditional {
        test: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    /// Creates an identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    /// Creates a boolean literal.
    pub fn bool(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }

    /// Creates an integer literal.
    pub fn int(value: i64) -> Self {
        Self::Literal(Literal::Int(value))
    }

    /// Creates a string literal.
    pub fn str(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Str(value.into()))
    }

    /// Creates the sentinel identifier denoting an undefined result.
    pub fn undef() -> Self {
        Self::Ident(UNDEF.to_string())
    }

    /// Creates a binary operation.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    /// Creates a guard: `payload % condition`.
    pub fn guard(payload: Expr, condition: Expr) -> Self {
        Self::binary(BinOp::Mod, payload, condition)
    }

    /// Creates a call with positional arguments only.
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::Call { callee: Box::new(callee), args, keywords: Vec::new() }
    }

    /// Creates a function definition, checking that the parameter names are unique.
    ///
    /// Returns an error naming the repeated parameter otherwise. The error has no spans, since the
    /// function was not parsed from source code.
    pub fn lambda(params: Vec<String>, body: Expr) -> Result<Self, Error> {
        let mut seen = IndexSet::new();
        for param in &params {
            if !seen.insert(param.as_str()) {
                return Err(Error::new(Vec::new(), DuplicateParameter { name: param.clone() }));
            }
        }
        Ok(Self::Lambda { params, body: Box::new(body) })
    }

    /// Returns the payload and condition if the expression is a guard.
    pub fn as_guard(&self) -> Option<(&Expr, &Expr)> {
        match self {
            Self::Binary { op: BinOp::Mod, lhs, rhs } => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// Returns the boolean value if the expression is a boolean literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns true if the expression is the identifier with the given name.
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(ident) if ident == name)
    }

    /// Returns the canonical structural serialization of the expression.
    ///
    /// Two expressions have the same canonical form if and only if they are structurally equal.
    pub fn canonical(&self) -> String {
        format!("{:?}", self)
    }

    /// Returns the direct children of this expression, in left-to-right order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Self::Literal(_) | Self::Ident(_) => Vec::new(),
            Self::Tuple(values) | Self::List(values) => values.iter().collect(),
            Self::Dict(entries) => entries.iter().flat_map(|(k, v)| [k, v]).collect(),
            Self::Lambda { body, .. } => vec![body],
            Self::Call { callee, args, keywords } => std::iter::once(&**callee)
                .chain(args)
                .chain(keywords.iter().map(|(_, value)| value))
                .collect(),
            Self::Subscript { target, key } => vec![target, key],
            Self::Unary { operand, .. } => vec![operand],
            Self::Binary { lhs, rhs, .. } | Self::Compare { lhs, rhs, .. } => vec![lhs, rhs],
            Self::BoolOp { operands, .. } => operands.iter().collect(),
            Self::Conditional { test, then, otherwise } => vec![test, then, otherwise],
        }
    }

    /// Rebuilds this expression by applying `f` to each direct child, in left-to-right order.
    pub fn map_children(self, mut f: impl FnMut(Expr) -> Expr) -> Self {
        let boxed = |expr: Box<Expr>, f: &mut dyn FnMut(Expr) -> Expr| Box::new(f(*expr));
        match self {
            leaf @ (Self::Literal(_) | Self::Ident(_)) => leaf,
            Self::Tuple(values) => Self::Tuple(values.into_iter().map(&mut f).collect()),
            Self::List(values) => Self::List(values.into_iter().map(&mut f).collect()),
            Self::Dict(entries) => Self::Dict(
                entries
                    .into_iter()
                    .map(|(k, v)| {
                        let k = f(k);
                        (k, f(v))
                    })
                    .collect(),
            ),
            Self::Lambda { params, body } => Self::Lambda { params, body: boxed(body, &mut f) },
            Self::Call { callee, args, keywords } => {
                let callee = boxed(callee, &mut f);
                let args = args.into_iter().map(&mut f).collect();
                let keywords = keywords
                    .into_iter()
                    .map(|(name, v)| (name, f(v)))
                    .collect();
                Self::Call { callee, args, keywords }
            },
            Self::Subscript { target, key } => {
                let target = boxed(target, &mut f);
                Self::Subscript { target, key: boxed(key, &mut f) }
            },
            Self::Unary { op, operand } => Self::Unary { op, operand: boxed(operand, &mut f) },
            Self::Binary { op, lhs, rhs } => {
                let lhs = boxed(lhs, &mut f);
                Self::Binary { op, lhs, rhs: boxed(rhs, &mut f) }
            },
            Self::BoolOp { op, operands } => Self::BoolOp {
                op,
                operands: operands.into_iter().map(&mut f).collect(),
            },
            Self::Compare { op, lhs, rhs } => {
                let lhs = boxed(lhs, &mut f);
                Self::Compare { op, lhs, rhs: boxed(rhs, &mut f) }
            },
            Self::Conditional { test, then, otherwise } => {
                let test = boxed(test, &mut f);
                let then = boxed(then, &mut f);
                Self::Conditional { test, then, otherwise: boxed(otherwise, &mut f) }
            },
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }

    /// Returns true if any node of the tree satisfies the predicate.
    pub fn any(&self, mut predicate: impl FnMut(&Expr) -> bool) -> bool {
        self.post_order_iter().any(|expr| predicate(expr))
    }

    /// Returns every identifier in the tree that is not bound by an enclosing `lambda`, in order
    /// of first occurrence.
    pub fn free_vars(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        collect_free_vars(self, &mut Vec::new(), &mut out);
        out
    }

    /// Returns every name occurring in the tree, whether free, bound, or declared as a parameter.
    pub fn names(&self) -> IndexSet<String> {
        let mut out = IndexSet::new();
        for expr in self.post_order_iter() {
            match expr {
                Self::Ident(name) => {
                    out.insert(name.clone());
                },
                Self::Lambda { params, .. } => out.extend(params.iter().cloned()),
                _ => {},
            }
        }
        out
    }
}

fn collect_free_vars<'a>(expr: &'a Expr, bound: &mut Vec<&'a str>, out: &mut IndexSet<String>) {
    match expr {
        Expr::Ident(name) => {
            if !bound.contains(&name.as_str()) {
                out.insert(name.clone());
            }
        },
        Expr::Lambda { params, body } => {
            let depth = bound.len();
            bound.extend(params.iter().map(String::as_str));
            collect_free_vars(body, bound, out);
            bound.truncate(depth);
        },
        _ => {
            for child in expr.children() {
                collect_free_vars(child, bound, out);
            }
        },
    }
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}
