//! Side-effect-free evaluation of expressions, used to fold guard conditions.
//!
//! The guard folder calls an [`Evaluator`] to find out whether a condition is known to be `True`
//! or `False` in the current environment. Evaluation is best-effort: any [`EvalError`] simply
//! leaves the guard in place. The default [`PureEvaluator`] follows the semantics of the source
//! language for the operators it supports, and refuses to evaluate anything that could have a
//! side effect.

use crate::{
    env::{Env, Value},
    expr::{BinOp, BoolOp, CmpOp, Expr, UnaryOp},
};
use std::{cmp::Ordering, fmt};
use thiserror::Error;

/// An error that occurred while evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("name `{0}` is not defined")]
    Unbound(String),

    #[error("expressions containing functions or calls cannot be evaluated without side effects")]
    Impure,

    #[error("unsupported operand types for `{op}`: `{lhs}` and `{rhs}`")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    #[error("bad operand type for unary `{op}`: `{operand}`")]
    BadOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("negative shift count")]
    NegativeShift,

    #[error("key {0} not found")]
    KeyNotFound(String),

    #[error("index out of range")]
    IndexOutOfRange,

    #[error("maximum evaluation depth of {0} exceeded")]
    TooDeep(usize),

    #[error("`{0}` is an opaque value")]
    Opaque(String),

    #[error("repetition would build a sequence longer than {0} items")]
    TooLong(usize),
}

/// Evaluates expressions against an environment without observable side effects.
///
/// Implementations are responsible for rejecting anything that could have a side effect. The
/// simplifier only ever discards the errors they return.
pub trait Evaluator: fmt::Debug {
    /// Evaluates the expression.
    fn eval(&self, expr: &Expr, env: &Env) -> Result<Value, EvalError>;
}

/// The default [`Evaluator`].
///
/// Functions and calls are never evaluated. Names bound to expression values are evaluated
/// recursively, up to [`PureEvaluator::max_depth`] levels deep, so that self-referential bindings
/// fail instead of looping forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PureEvaluator {
    /// The maximum nesting depth of the evaluation.
    pub max_depth: usize,
}

impl Default for PureEvaluator {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

impl Evaluator for PureEvaluator {
    fn eval(&self, expr: &Expr, env: &Env) -> Result<Value, EvalError> {
        self.eval_at(expr, env, 0)
    }
}

/// A number, with booleans promoted to integers.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(Self::Int(*b as i64)),
            Value::Int(n) => Some(Self::Int(*n)),
            Value::Float(n) => Some(Self::Float(*n)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
        }
    }
}

/// Returns the truthiness of a value.
pub fn truthy(value: &Value) -> Result<bool, EvalError> {
    Ok(match value {
        Value::None => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n != 0,
        Value::Float(n) => *n != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::Tuple(values) | Value::List(values) => !values.is_empty(),
        Value::Dict(entries) => !entries.is_empty(),
        Value::Expr(_) | Value::Host(_) => return Err(EvalError::Opaque(value.to_string())),
    })
}

/// Returns true if the values compare equal with `==`.
pub fn values_eq(lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    if let (Some(a), Some(b)) = (Num::of(lhs), Num::of(rhs)) {
        return Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        });
    }

    Ok(match (lhs, rhs) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (a, b) in a.iter().zip(b) {
                if !values_eq(a, b)? {
                    return Ok(false);
                }
            }
            true
        },
        (Value::Dict(a), Value::Dict(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (key, value) in a {
                match dict_get(b, key)? {
                    Some(other) if values_eq(value, other)? => {},
                    _ => return Ok(false),
                }
            }
            true
        },
        (Value::Expr(_) | Value::Host(_), _) => return Err(EvalError::Opaque(lhs.to_string())),
        (_, Value::Expr(_) | Value::Host(_)) => return Err(EvalError::Opaque(rhs.to_string())),
        _ => false,
    })
}

/// Looks up a key in a dictionary. When a key appears more than once, the last entry wins.
fn dict_get<'a>(entries: &'a [(Value, Value)], key: &Value) -> Result<Option<&'a Value>, EvalError> {
    for (k, v) in entries.iter().rev() {
        if values_eq(k, key)? {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

/// Resolves a possibly negative index into a sequence of the given length.
fn resolve_index(index: i64, len: usize) -> Result<usize, EvalError> {
    let len = len as i64;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) {
        Ok(index as usize)
    } else {
        Err(EvalError::IndexOutOfRange)
    }
}

/// Compares two values for ordering, as `<` would.
fn order(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<Ordering, EvalError> {
    if let (Some(a), Some(b)) = (Num::of(lhs), Num::of(rhs)) {
        return match (a, b) {
            (Num::Int(a), Num::Int(b)) => Ok(a.cmp(&b)),
            // comparisons with NaN are always false, which no ordering can express
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()).ok_or(EvalError::TypeMismatch {
                op: op.as_str(),
                lhs: "float",
                rhs: "float",
            }),
        };
    }

    match (lhs, rhs) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Tuple(a), Value::Tuple(b)) | (Value::List(a), Value::List(b)) => {
            for (a, b) in a.iter().zip(b) {
                if !values_eq(a, b)? {
                    return order(op, a, b);
                }
            }
            Ok(a.len().cmp(&b.len()))
        },
        _ => Err(EvalError::TypeMismatch {
            op: op.as_str(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

/// Integer division, rounding the quotient toward negative infinity.
fn floor_div(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or(EvalError::Overflow)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

/// Integer modulo. The result has the sign of the divisor.
fn floor_mod(a: i64, b: i64) -> Result<i64, EvalError> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = a.checked_rem(b).ok_or(EvalError::Overflow)?;
    if r != 0 && (r < 0) != (b < 0) {
        Ok(r + b)
    } else {
        Ok(r)
    }
}

/// Applies an arithmetic operator to two numbers.
fn arith(op: BinOp, a: Num, b: Num) -> Result<Value, EvalError> {
    if let (Num::Int(a), Num::Int(b)) = (a, b) {
        return Ok(Value::Int(match op {
            BinOp::Add => a.checked_add(b).ok_or(EvalError::Overflow)?,
            BinOp::Sub => a.checked_sub(b).ok_or(EvalError::Overflow)?,
            BinOp::Mul => a.checked_mul(b).ok_or(EvalError::Overflow)?,
            BinOp::Div => {
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return Ok(Value::Float(a as f64 / b as f64));
            },
            BinOp::FloorDiv => floor_div(a, b)?,
            BinOp::Mod => floor_mod(a, b)?,
            BinOp::Pow => {
                if b < 0 {
                    return Ok(Value::Float((a as f64).powf(b as f64)));
                }
                let exp = u32::try_from(b).map_err(|_| EvalError::Overflow)?;
                a.checked_pow(exp).ok_or(EvalError::Overflow)?
            },
            BinOp::Shl => {
                if b < 0 {
                    return Err(EvalError::NegativeShift);
                }
                if a == 0 {
                    0
                } else if b >= 64 {
                    return Err(EvalError::Overflow);
                } else {
                    let shifted = a << b;
                    if shifted >> b != a {
                        return Err(EvalError::Overflow);
                    }
                    shifted
                }
            },
            BinOp::Shr => {
                if b < 0 {
                    return Err(EvalError::NegativeShift);
                }
                a >> b.min(63)
            },
            BinOp::BitAnd => a & b,
            BinOp::BitXor => a ^ b,
            BinOp::BitOr => a | b,
        }));
    }

    let (a, b) = (a.as_f64(), b.as_f64());
    Ok(Value::Float(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div | BinOp::FloorDiv | BinOp::Mod if b == 0.0 => {
            return Err(EvalError::DivisionByZero);
        },
        BinOp::Div => a / b,
        BinOp::FloorDiv => (a / b).floor(),
        BinOp::Mod => {
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
        },
        BinOp::Pow => a.powf(b),
        BinOp::Shl | BinOp::Shr | BinOp::BitAnd | BinOp::BitXor | BinOp::BitOr => {
            return Err(EvalError::TypeMismatch { op: op.as_str(), lhs: "float", rhs: "float" });
        },
    }))
}

/// The longest string (in bytes) or sequence that `*` may build.
const MAX_REPEAT_LEN: usize = 1 << 20;

/// Returns the number of times to repeat a sequence of length `len`, checking that the result
/// stays within [`MAX_REPEAT_LEN`]. Negative counts repeat zero times.
fn repeat_count(len: usize, count: i64) -> Result<usize, EvalError> {
    let count = usize::try_from(count).unwrap_or(0);
    match len.checked_mul(count) {
        Some(total) if total <= MAX_REPEAT_LEN => Ok(if total == 0 { 0 } else { count }),
        _ => Err(EvalError::TooLong(MAX_REPEAT_LEN)),
    }
}

/// Repeats a sequence `count` times.
fn repeat<T: Clone>(items: &[T], count: i64) -> Result<Vec<T>, EvalError> {
    let count = repeat_count(items.len(), count)?;
    Ok(items.iter().cloned().cycle().take(items.len() * count).collect())
}

/// Applies a binary operator to two values.
fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    // bitwise operators on two booleans stay boolean
    if let (Value::Bool(a), Value::Bool(b)) = (&lhs, &rhs) {
        match op {
            BinOp::BitAnd => return Ok(Value::Bool(a & b)),
            BinOp::BitXor => return Ok(Value::Bool(a ^ b)),
            BinOp::BitOr => return Ok(Value::Bool(a | b)),
            _ => {},
        }
    }

    if let (Some(a), Some(b)) = (Num::of(&lhs), Num::of(&rhs)) {
        return arith(op, a, b);
    }

    match (op, lhs, rhs) {
        (BinOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (BinOp::Add, Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        },
        (BinOp::Add, Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        },
        (BinOp::Mul, Value::Str(s), Value::Int(n)) | (BinOp::Mul, Value::Int(n), Value::Str(s)) => {
            Ok(Value::Str(s.repeat(repeat_count(s.len(), n)?)))
        },
        (BinOp::Mul, Value::Tuple(items), Value::Int(n)) | (BinOp::Mul, Value::Int(n), Value::Tuple(items)) => {
            Ok(Value::Tuple(repeat(&items, n)?))
        },
        (BinOp::Mul, Value::List(items), Value::Int(n)) | (BinOp::Mul, Value::Int(n), Value::List(items)) => {
            Ok(Value::List(repeat(&items, n)?))
        },
        (BinOp::BitOr, Value::Dict(mut a), Value::Dict(b)) => {
            for (key, value) in b {
                let mut existing = None;
                for (i, (k, _)) in a.iter().enumerate() {
                    if values_eq(k, &key)? {
                        existing = Some(i);
                        break;
                    }
                }
                match existing {
                    Some(i) => a[i].1 = value,
                    None => a.push((key, value)),
                }
            }
            Ok(Value::Dict(a))
        },
        (op, lhs, rhs) => Err(EvalError::TypeMismatch {
            op: op.as_str(),
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

/// Applies a comparison operator to two values.
fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalError> {
    match op {
        CmpOp::Eq => values_eq(lhs, rhs),
        CmpOp::NotEq => values_eq(lhs, rhs).map(|eq| !eq),
        CmpOp::Lt => Ok(order(op, lhs, rhs)? == Ordering::Less),
        CmpOp::LtE => Ok(order(op, lhs, rhs)? != Ordering::Greater),
        CmpOp::Gt => Ok(order(op, lhs, rhs)? == Ordering::Greater),
        CmpOp::GtE => Ok(order(op, lhs, rhs)? != Ordering::Less),
        CmpOp::Is | CmpOp::IsNot => {
            // identity is only meaningful for singletons
            let same = match (lhs, rhs) {
                (Value::None, Value::None) => true,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::None | Value::Bool(_), _) | (_, Value::None | Value::Bool(_)) => false,
                _ => return Err(EvalError::TypeMismatch {
                    op: op.as_str(),
                    lhs: lhs.type_name(),
                    rhs: rhs.type_name(),
                }),
            };
            Ok(same == (op == CmpOp::Is))
        },
        CmpOp::In | CmpOp::NotIn => {
            let found = match rhs {
                Value::Str(haystack) => match lhs {
                    Value::Str(needle) => haystack.contains(needle.as_str()),
                    _ => return Err(EvalError::TypeMismatch {
                        op: op.as_str(),
                        lhs: lhs.type_name(),
                        rhs: "str",
                    }),
                },
                Value::Tuple(items) | Value::List(items) => {
                    let mut found = false;
                    for item in items {
                        if values_eq(item, lhs)? {
                            found = true;
                            break;
                        }
                    }
                    found
                },
                Value::Dict(entries) => dict_get(entries, lhs)?.is_some(),
                _ => return Err(EvalError::TypeMismatch {
                    op: op.as_str(),
                    lhs: lhs.type_name(),
                    rhs: rhs.type_name(),
                }),
            };
            Ok(found == (op == CmpOp::In))
        },
    }
}

impl PureEvaluator {
    /// Creates an evaluator with the default depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    fn eval_at(&self, expr: &Expr, env: &Env, depth: usize) -> Result<Value, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::TooDeep(self.max_depth));
        }
        let eval = |expr: &Expr| self.eval_at(expr, env, depth + 1);

        Ok(match expr {
            Expr::Literal(literal) => literal.clone().into(),
            Expr::Ident(name) => match env.lookup(name) {
                None => return Err(EvalError::Unbound(name.clone())),
                Some(Value::Expr(expr)) => eval(expr)?,
                Some(Value::Host(object)) => match object.expr_view() {
                    Some(expr) => eval(&expr)?,
                    None => return Err(EvalError::Opaque(name.clone())),
                },
                Some(value) => value.clone(),
            },
            Expr::Tuple(values) => Value::Tuple(values.iter().map(eval).collect::<Result<_, _>>()?),
            Expr::List(values) => Value::List(values.iter().map(eval).collect::<Result<_, _>>()?),
            Expr::Dict(entries) => {
                let mut dict: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let (key, value) = (eval(key)?, eval(value)?);
                    match dict_get(&dict, &key)? {
                        Some(_) => {
                            for entry in dict.iter_mut() {
                                if values_eq(&entry.0, &key)? {
                                    entry.1 = value;
                                    break;
                                }
                            }
                        },
                        None => dict.push((key, value)),
                    }
                }
                Value::Dict(dict)
            },
            Expr::Lambda { .. } | Expr::Call { .. } => return Err(EvalError::Impure),
            Expr::Subscript { target, key } => {
                let (target, key) = (eval(target)?, eval(key)?);
                match (&target, &key) {
                    (Value::Dict(entries), key) => match dict_get(entries, key)? {
                        Some(value) => value.clone(),
                        None => return Err(EvalError::KeyNotFound(key.to_string())),
                    },
                    (Value::Tuple(items) | Value::List(items), Value::Int(index)) => {
                        items[resolve_index(*index, items.len())?].clone()
                    },
                    (Value::Str(s), Value::Int(index)) => {
                        let chars = s.chars().collect::<Vec<_>>();
                        Value::Str(chars[resolve_index(*index, chars.len())?].to_string())
                    },
                    _ => return Err(EvalError::TypeMismatch {
                        op: "[]",
                        lhs: target.type_name(),
                        rhs: key.type_name(),
                    }),
                }
            },
            Expr::Unary { op, operand } => {
                let operand = eval(operand)?;
                match (op, Num::of(&operand)) {
                    (UnaryOp::Not, _) => Value::Bool(!truthy(&operand)?),
                    (UnaryOp::Neg, Some(Num::Int(n))) => Value::Int(n.checked_neg().ok_or(EvalError::Overflow)?),
                    (UnaryOp::Neg, Some(Num::Float(n))) => Value::Float(-n),
                    (UnaryOp::Pos, Some(Num::Int(n))) => Value::Int(n),
                    (UnaryOp::Pos, Some(Num::Float(n))) => Value::Float(n),
                    (UnaryOp::Invert, Some(Num::Int(n))) => Value::Int(!n),
                    _ => return Err(EvalError::BadOperand {
                        op: op.as_str(),
                        operand: operand.type_name(),
                    }),
                }
            },
            Expr::Binary { op, lhs, rhs } => binary(*op, eval(lhs)?, eval(rhs)?)?,
            Expr::BoolOp { op, operands } => {
                // `and` returns the first falsy operand, `or` the first truthy one, and both
                // return the last operand otherwise
                let mut last = Value::Bool(*op == BoolOp::And);
                for operand in operands {
                    last = eval(operand)?;
                    if truthy(&last)? == (*op == BoolOp::Or) {
                        break;
                    }
                }
                last
            },
            Expr::Compare { op, lhs, rhs } => Value::Bool(compare(*op, &eval(lhs)?, &eval(rhs)?)?),
            Expr::Conditional { test, then, otherwise } => {
                if truthy(&eval(test)?)? {
                    eval(then)?
                } else {
                    eval(otherwise)?
                }
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use phi_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval_in(source: &str, env: &Env) -> Result<Value, EvalError> {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        PureEvaluator::new().eval(&Expr::try_from(ast).unwrap(), env)
    }

    fn eval(source: &str) -> Result<Value, EvalError> {
        eval_in(source, &Env::new())
    }

    fn eval_str(source: &str) -> String {
        eval(source).unwrap().to_string()
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval_str("1 + 2 * 3"), "7");
        assert_eq!(eval_str("7 / 2"), "3.5");
        assert_eq!(eval_str("2 ** 10"), "1024");
        assert_eq!(eval_str("2 ** (-1)"), "0.5");
        assert_eq!(eval_str("1 << 4 | 1"), "17");
        assert_eq!(eval_str("'ab' * 2 + 'c'"), "'ababc'");
    }

    #[test]
    fn floor_division_and_modulo_follow_the_divisor() {
        assert_eq!(eval_str("-7 // 2"), "-4");
        assert_eq!(eval_str("7 // -2"), "-4");
        assert_eq!(eval_str("-7 % 3"), "2");
        assert_eq!(eval_str("7 % -3"), "-2");
        assert_eq!(eval_str("-7.5 % 2"), "0.5");
    }

    #[test]
    fn arithmetic_errors() {
        assert_eq!(eval("1 / 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval("1 % 0").unwrap_err(), EvalError::DivisionByZero);
        assert_eq!(eval("9223372036854775807 + 1").unwrap_err(), EvalError::Overflow);
        assert_eq!(eval("1 << -1").unwrap_err(), EvalError::NegativeShift);
        assert!(matches!(eval("'a' - 1"), Err(EvalError::TypeMismatch { op: "-", .. })));
    }

    #[test]
    fn repetition_is_bounded() {
        assert_eq!(eval_str("(1, 2) * 2"), "(1, 2, 1, 2)");
        assert_eq!(eval_str("[0] * -3"), "[]");
        assert_eq!(eval_str("'' * 9223372036854775807"), "''");
        assert_eq!(eval("'ab' * 9223372036854775807").unwrap_err(), EvalError::TooLong(MAX_REPEAT_LEN));
        assert_eq!(eval("(1, 2) * 9223372036854775807").unwrap_err(), EvalError::TooLong(MAX_REPEAT_LEN));
        assert_eq!(eval("[1] * 2000000").unwrap_err(), EvalError::TooLong(MAX_REPEAT_LEN));
    }

    #[test]
    fn boolean_operators_return_operands() {
        assert_eq!(eval_str("0 or 'x'"), "'x'");
        assert_eq!(eval_str("1 and 0"), "0");
        assert_eq!(eval_str("1 and 2 and 3"), "3");
        assert_eq!(eval_str("not []"), "True");
        // short-circuiting skips the unbound name
        assert_eq!(eval_str("False and missing"), "False");
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval_str("1 == 1.0"), "True");
        assert_eq!(eval_str("(1, 2) < (1, 3)"), "True");
        assert_eq!(eval_str("None is None"), "True");
        assert_eq!(eval_str("1 is not None"), "True");
        assert_eq!(eval_str("'b' in 'abc'"), "True");
        assert_eq!(eval_str("3 not in [1, 2]"), "True");
        assert_eq!(eval_str("'a' in {'a': 1}"), "True");
    }

    #[test]
    fn collections() {
        assert_eq!(eval_str("({'a': 1} | {'b': 2, 'a': 3})['a']"), "3");
        assert_eq!(eval_str("{'a': 1, 'a': 2}"), "{'a': 2}");
        assert_eq!(eval_str("(1, 2, 3)[-1]"), "3");
        assert_eq!(eval_str("'abc'[1]"), "'b'");
        assert_eq!(eval("[1][1]").unwrap_err(), EvalError::IndexOutOfRange);
        assert!(matches!(eval("{'a': 1}['b']"), Err(EvalError::KeyNotFound(_))));
    }

    #[test]
    fn names() {
        let env = Env::new()
            .with("a", 4)
            .with("b", Expr::binary(BinOp::Add, Expr::ident("a"), Expr::int(1)))
            .with("loop", Expr::ident("loop"));
        assert_eq!(eval_in("a > 3", &env).unwrap().to_string(), "True");
        assert_eq!(eval_in("b * 2", &env).unwrap().to_string(), "10");
        assert_eq!(eval_in("c", &env).unwrap_err(), EvalError::Unbound("c".to_string()));
        assert_eq!(eval_in("loop", &env).unwrap_err(), EvalError::TooDeep(64));
    }

    #[test]
    fn refuses_functions_and_calls() {
        assert_eq!(eval("(lambda x: x)(1)").unwrap_err(), EvalError::Impure);
        assert_eq!(eval("f(1) if True else 2").unwrap_err(), EvalError::Impure);
        assert_eq!(eval("lambda: True").unwrap_err(), EvalError::Impure);
    }
}
