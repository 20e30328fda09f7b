//! The Environment Snapshot: the name bindings visible to an expression while it is simplified.
//!
//! The simplifier never mutates an [`Env`]. Hosts build one before each call (see
//! [`Env::with_scope`]) and pass it by reference, so the bindings a simplification sees are
//! always the ones that were current when it started.

use crate::expr::{Expr, Literal};
use indexmap::IndexMap;
use std::{fmt, rc::Rc};

/// An object owned by the host that the simplifier cannot look inside of.
///
/// A host object may still expose an Expression Tree that stands for it, in which case the
/// simplifier splices that tree wherever the object is referenced by name.
pub trait HostObject: fmt::Debug {
    /// Returns the Expression Tree this object stands for, if any.
    fn expr_view(&self) -> Option<Expr> {
        None
    }
}

/// A value bound to a name.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),

    /// A dictionary. Keys are compared with `==` semantics when looked up.
    Dict(Vec<(Value, Value)>),

    /// A value that is itself an expression, such as a function defined by the host.
    Expr(Expr),

    /// An opaque host object.
    Host(Rc<dyn HostObject>),
}

impl Value {
    /// Returns true if the value can be written as a literal: `None`, a boolean, a number, a
    /// string, or a tuple or list made only of such values.
    pub fn is_literal(&self) -> bool {
        match self {
            Self::None | Self::Bool(_) | Self::Int(_) | Self::Float(_) | Self::Str(_) => true,
            Self::Tuple(values) | Self::List(values) => values.iter().all(Value::is_literal),
            Self::Dict(_) | Self::Expr(_) | Self::Host(_) => false,
        }
    }

    /// Converts a literal value into the equivalent expression.
    ///
    /// Returns [`None`] if the value is not [literal](Value::is_literal).
    pub fn to_literal_expr(&self) -> Option<Expr> {
        Some(match self {
            Self::None => Expr::Literal(Literal::None),
            Self::Bool(b) => Expr::Literal(Literal::Bool(*b)),
            Self::Int(n) => Expr::Literal(Literal::Int(*n)),
            Self::Float(n) => Expr::Literal(Literal::Float(*n)),
            Self::Str(s) => Expr::Literal(Literal::Str(s.clone())),
            Self::Tuple(values) => Expr::Tuple(
                values.iter().map(Value::to_literal_expr).collect::<Option<_>>()?,
            ),
            Self::List(values) => Expr::List(
                values.iter().map(Value::to_literal_expr).collect::<Option<_>>()?,
            ),
            Self::Dict(_) | Self::Expr(_) | Self::Host(_) => return None,
        })
    }

    /// Returns the Expression Tree that should replace a reference to this value, if any.
    ///
    /// Literal values become literal expressions, [`Value::Expr`] values are returned as is, and
    /// host objects are asked for their [view](HostObject::expr_view).
    pub fn inline_expr(&self) -> Option<Expr> {
        match self {
            Self::Expr(expr) => Some(expr.clone()),
            Self::Host(object) => object.expr_view(),
            value => value.to_literal_expr(),
        }
    }

    /// Converts an expression made only of literals, tuples and lists into a value.
    ///
    /// Returns [`None`] for any other expression.
    pub fn from_literal_expr(expr: &Expr) -> Option<Self> {
        Some(match expr {
            Expr::Literal(literal) => literal.clone().into(),
            Expr::Tuple(values) => Self::Tuple(
                values.iter().map(Self::from_literal_expr).collect::<Option<_>>()?,
            ),
            Expr::List(values) => Self::List(
                values.iter().map(Self::from_literal_expr).collect::<Option<_>>()?,
            ),
            _ => return None,
        })
    }

    /// Returns the literal this value is, if it is a scalar.
    pub fn as_literal(&self) -> Option<Literal> {
        Some(match self {
            Self::None => Literal::None,
            Self::Bool(b) => Literal::Bool(*b),
            Self::Int(n) => Literal::Int(*n),
            Self::Float(n) => Literal::Float(*n),
            Self::Str(s) => Literal::Str(s.clone()),
            _ => return None,
        })
    }

    /// Returns the name of the value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Expr(_) => "expression",
            Self::Host(_) => "object",
        }
    }
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::None => Self::None,
            Literal::Bool(b) => Self::Bool(b),
            Literal::Int(n) => Self::Int(n),
            Literal::Float(n) => Self::Float(n),
            Literal::Str(s) => Self::Str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Self::Expr(expr)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{}", expr),
            Self::Host(object) => write!(f, "<{:?}>", object),
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            },
            value => match value.to_literal_expr() {
                Some(expr) => write!(f, "{}", expr),
                None => write!(f, "<{}>", value.type_name()),
            },
        }
    }
}

/// An ordered chain of scopes, innermost first.
///
/// Looking up a name checks each scope in order and returns the first binding found.
#[derive(Debug, Clone, Default)]
pub struct Env {
    scopes: Vec<IndexMap<String, Value>>,
}

impl Env {
    /// Creates an environment with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding to the innermost scope, creating it if there is none.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        if self.scopes.is_empty() {
            self.scopes.push(IndexMap::new());
        }
        self.scopes[0].insert(name.into(), value.into());
        self
    }

    /// Adds a scope that is checked before every existing one.
    pub fn with_scope(mut self, scope: IndexMap<String, Value>) -> Self {
        self.scopes.insert(0, scope);
        self
    }

    /// Returns the value bound to the given name in the innermost scope that binds it.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().find_map(|scope| scope.get(name))
    }

    /// Returns true if no scope binds any name.
    pub fn is_empty(&self) -> bool {
        self.scopes.iter().all(IndexMap::is_empty)
    }

    /// Returns the visible bindings, innermost scope first. Shadowed bindings are skipped.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.scopes
            .iter()
            .enumerate()
            .flat_map(|(depth, scope)| scope.iter().map(move |(name, value)| (depth, name, value)))
            .filter(|(depth, name, _)| {
                !self.scopes[..*depth].iter().any(|inner| inner.contains_key(name.as_str()))
            })
            .map(|(_, name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Env {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let scope = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self::new().with_scope(scope)
    }
}
