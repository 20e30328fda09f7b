//! Unparsing of expressions back to source code, with as few parentheses as possible.

use phi_parser::parser::ast::literal::quote_str;
use std::fmt::{self, Display, Formatter};
use super::{BinOp, BoolOp, CmpOp, Expr, Literal, UnaryOp};

/// How tightly an expression binds, from loosest to tightest. An expression printed where a
/// tighter level is required is wrapped in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Test,
    Or,
    And,
    Not,
    Compare,
    BitOr,
    BitXor,
    BitAnd,
    Shift,
    Arith,
    Term,
    Factor,
    Power,
    Await,
    Atom,
}

impl Level {
    /// Returns the next tighter level.
    fn next(self) -> Self {
        match self {
            Self::Test => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Not,
            Self::Not => Self::Compare,
            Self::Compare => Self::BitOr,
            Self::BitOr => Self::BitXor,
            Self::BitXor => Self::BitAnd,
            Self::BitAnd => Self::Shift,
            Self::Shift => Self::Arith,
            Self::Arith => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Power,
            Self::Power => Self::Await,
            Self::Await | Self::Atom => Self::Atom,
        }
    }
}

impl BinOp {
    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
        }
    }

    fn level(&self) -> Level {
        match self {
            Self::Add | Self::Sub => Level::Arith,
            Self::Mul | Self::Div | Self::FloorDiv | Self::Mod => Level::Term,
            Self::Pow => Level::Power,
            Self::Shl | Self::Shr => Level::Shift,
            Self::BitAnd => Level::BitAnd,
            Self::BitXor => Level::BitXor,
            Self::BitOr => Level::BitOr,
        }
    }
}

impl CmpOp {
    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtE => "<=",
            Self::Gt => ">",
            Self::GtE => ">=",
            Self::Is => "is",
            Self::IsNot => "is not",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }
}

impl BoolOp {
    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl UnaryOp {
    /// Returns the source text of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::Neg => "-",
            Self::Pos => "+",
            Self::Invert => "~",
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(n) if n.is_nan() => write!(f, "(1e309 - 1e309)"),
            Self::Float(n) if n.is_infinite() => {
                write!(f, "{}1e309", if *n < 0.0 { "-" } else { "" })
            },
            // `Debug` always keeps a fractional part or an exponent, so the number reads back as
            // a float
            Self::Float(n) => write!(f, "{:?}", n),
            Self::Str(s) => write!(f, "{}", quote_str(s)),
        }
    }
}

impl Expr {
    /// Returns how tightly the expression binds when printed.
    fn level(&self) -> Level {
        match self {
            Self::Literal(Literal::Int(n)) if *n < 0 => Level::Factor,
            Self::Literal(Literal::Float(n)) if n.is_sign_negative() && !n.is_nan() => Level::Factor,
            Self::Literal(_)
                | Self::Ident(_)
                | Self::Tuple(_)
                | Self::List(_)
                | Self::Dict(_)
                | Self::Call { .. }
                | Self::Subscript { .. } => Level::Atom,
            Self::Lambda { .. } | Self::Conditional { .. } => Level::Test,
            Self::Unary { op: UnaryOp::Not, .. } => Level::Not,
            Self::Unary { .. } => Level::Factor,
            Self::Binary { op, .. } => op.level(),
            Self::BoolOp { op: BoolOp::And, .. } => Level::And,
            Self::BoolOp { op: BoolOp::Or, .. } => Level::Or,
            Self::Compare { .. } => Level::Compare,
        }
    }

    /// Writes the expression, wrapping it in parentheses if it binds looser than `level`.
    fn fmt_at(&self, f: &mut Formatter<'_>, level: Level) -> fmt::Result {
        if self.level() < level {
            write!(f, "(")?;
            self.fmt_inner(f)?;
            write!(f, ")")
        } else {
            self.fmt_inner(f)
        }
    }

    fn fmt_inner(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(literal) => write!(f, "{}", literal),
            Self::Ident(name) => write!(f, "{}", name),
            Self::Tuple(values) => {
                write!(f, "(")?;
                fmt_list(f, values)?;
                if values.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            },
            Self::List(values) => {
                write!(f, "[")?;
                fmt_list(f, values)?;
                write!(f, "]")
            },
            Self::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    key.fmt_at(f, Level::Test)?;
                    write!(f, ": ")?;
                    value.fmt_at(f, Level::Test)?;
                }
                write!(f, "}}")
            },
            Self::Lambda { params, body } => {
                write!(f, "lambda")?;
                if !params.is_empty() {
                    write!(f, " {}", params.join(", "))?;
                }
                write!(f, ": ")?;
                body.fmt_at(f, Level::Test)
            },
            Self::Call { callee, args, keywords } => {
                callee.fmt_at(f, Level::Atom)?;
                write!(f, "(")?;
                fmt_list(f, args)?;
                for (i, (name, value)) in keywords.iter().enumerate() {
                    if i > 0 || !args.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}=", name)?;
                    value.fmt_at(f, Level::Test)?;
                }
                write!(f, ")")
            },
            Self::Subscript { target, key } => {
                target.fmt_at(f, Level::Atom)?;
                write!(f, "[")?;
                match &**key {
                    Self::Tuple(values) if values.len() > 1 => fmt_list(f, values)?,
                    key => key.fmt_at(f, Level::Test)?,
                }
                write!(f, "]")
            },
            Self::Unary { op: UnaryOp::Not, operand } => {
                write!(f, "not ")?;
                operand.fmt_at(f, Level::Not)
            },
            Self::Unary { op, operand } => {
                write!(f, "{}", op.as_str())?;
                operand.fmt_at(f, Level::Factor)
            },
            Self::Binary { op, lhs, rhs } => {
                let level = op.level();
                let (lhs_level, rhs_level) = match op {
                    BinOp::Pow => (level.next(), level),
                    _ => (level, level.next()),
                };
                lhs.fmt_at(f, lhs_level)?;
                write!(f, " {} ", op.as_str())?;
                rhs.fmt_at(f, rhs_level)
            },
            Self::BoolOp { op, operands } => {
                let level = self.level().next();
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", op.as_str())?;
                    }
                    operand.fmt_at(f, level)?;
                }
                Ok(())
            },
            Self::Compare { op, lhs, rhs } => {
                lhs.fmt_at(f, Level::Compare.next())?;
                write!(f, " {} ", op.as_str())?;
                rhs.fmt_at(f, Level::Compare.next())
            },
            Self::Conditional { test, then, otherwise } => {
                then.fmt_at(f, Level::Or)?;
                write!(f, " if ")?;
                test.fmt_at(f, Level::Or)?;
                write!(f, " else ")?;
                otherwise.fmt_at(f, Level::Test)
            },
        }
    }
}

/// Writes comma-separated expressions.
fn fmt_list(f: &mut Formatter<'_>, values: &[Expr]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        value.fmt_at(f, Level::Test)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.fmt_at(f, Level::Test)
    }
}

#[cfg(test)]
mod tests {
    use phi_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap()
    }

    /// Parses the source, and checks that printing it gives the source back.
    fn round_trip(source: &str) {
        let expr = parse(source);
        assert_eq!(expr.to_string(), source);
        assert_eq!(parse(&expr.to_string()), expr);
    }

    #[test]
    fn minimal_parentheses() {
        round_trip("a + b * c");
        round_trip("(a + b) * c");
        round_trip("a - (b - c)");
        round_trip("a - b - c");
        round_trip("a ** b ** c");
        round_trip("(a ** b) ** c");
        round_trip("-a ** b");
        round_trip("(-3) ** 2");
        round_trip("not a and b");
        round_trip("not (a and b)");
        round_trip("a and (b or c)");
        round_trip("(a if b else c) and True");
        round_trip("a if b else c if d else e");
        round_trip("(lambda x: x + 1)(3)");
        round_trip("lambda x_1: x_1 + x");
        round_trip("lambda: 0");
    }

    #[test]
    fn guards() {
        round_trip("A % G1 % G2");
        round_trip("A % (G1 % G2)");
        round_trip("f(x) % g");
        round_trip("phi % psi is not UNDEF");
        round_trip("(lambda x: p(x)) % g");
    }

    #[test]
    fn collections() {
        round_trip("()");
        round_trip("(1,)");
        round_trip("(1, 'a', None)");
        round_trip("[1.5, 2.0, 1e20]");
        round_trip("{'a': 1, 'b': 2}");
        round_trip("{'a': 1}['a']");
        round_trip("d[1, 2]");
        round_trip("f(a, k=b)");
        round_trip("f(k=lambda x: x)");
    }

    #[test]
    fn drops_redundant_parentheses() {
        assert_eq!(parse("((a))").to_string(), "a");
        assert_eq!(parse("(a % g) % h").to_string(), "a % g % h");
        assert_eq!(parse("x ** (-1)").to_string(), "x ** (-1)");
    }

    #[test]
    fn special_floats() {
        assert_eq!(Expr::Literal(Literal::Float(f64::INFINITY)).to_string(), "1e309");
        assert_eq!(Expr::Literal(Literal::Float(f64::NEG_INFINITY)).to_string(), "-1e309");
        assert_eq!(Expr::Literal(Literal::Float(0.5)).to_string(), "0.5");
    }
}
