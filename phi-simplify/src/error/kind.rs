use ariadne::Fmt;
use crate::expr::Expr;
use phi_attrs::ErrorKind;
use phi_error::EXPR;

/// A function declares the same parameter more than once.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("parameter `{}` is declared more than once", name),
    labels = ["first declared here", "declared again here"],
    help = "rename one of the parameters",
)]
pub struct DuplicateParameter {
    /// The repeated parameter name.
    pub name: String,
}

/// A call passes the same keyword argument more than once.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("keyword argument `{}` is given more than once", name),
    labels = ["first given here", "given again here"],
    help = "remove one of the arguments",
)]
pub struct DuplicateKeyword {
    /// The repeated keyword.
    pub name: String,
}

/// The rewrite pipeline kept changing the expression until the iteration budget ran out.
///
/// This means that either a rewrite rule does not terminate on this input, or the input itself
/// diverges (for example, `(lambda x: x(x)(x))(lambda x: x(x)(x))`, which grows every round).
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!(
        "simplification did not reach a fixed point within {} iteration{}",
        max_iterations,
        if *max_iterations == 1 { "" } else { "s" },
    ),
    labels = [format!("while simplifying this {}", "expression".fg(EXPR))],
    help = format!("the last two rounds produced `{}` and then `{}`", previous, last),
)]
pub struct NonTermination {
    /// The iteration budget that was exhausted.
    pub max_iterations: usize,

    /// The expression given to the simplifier.
    pub original: Expr,

    /// The expression before the last round.
    pub previous: Expr,

    /// The expression after the last round.
    pub last: Expr,
}
