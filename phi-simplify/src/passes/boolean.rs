use crate::{
    expr::{BoolOp, Expr},
    pass::{rewrite_bottom_up, Pass, PassContext},
    step::Step,
};

/// `a if True else b = a`
/// `a if False else b = b`
///
/// Any literal test is accepted, and picks a branch according to its truthiness.
pub fn fold_conditional(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::Conditional { test, then, otherwise } = expr else {
        return None;
    };
    let Expr::Literal(test) = &**test else {
        return None;
    };

    ctx.push(Step::ConditionalFold);
    Some(if test.is_truthy() { (**then).clone() } else { (**otherwise).clone() })
}

/// `x and True = x`
/// `x and False = False`
/// `x or False = x`
/// `x or True = True`
///
/// The rules apply to either side, and to every operand of a longer chain. Operands that are not
/// boolean literals are never evaluated.
pub fn prune_bool_identity(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::BoolOp { op, operands } = expr else {
        return None;
    };

    // `True` is the identity of `and`, and `False` absorbs it; `or` is the other way around
    let identity = *op == BoolOp::And;
    if !operands.iter().any(|operand| operand.as_bool().is_some()) {
        return None;
    }

    ctx.push(Step::BoolIdentity);
    if operands.iter().any(|operand| operand.as_bool() == Some(!identity)) {
        return Some(Expr::bool(!identity));
    }

    let mut remaining = operands
        .iter()
        .filter(|operand| operand.as_bool().is_none())
        .cloned()
        .collect::<Vec<_>>();
    Some(match remaining.len() {
        0 => Expr::bool(identity),
        1 => remaining.remove(0),
        _ => Expr::BoolOp { op: *op, operands: remaining },
    })
}

/// `True and False = False`
/// `True or False = True`
///
/// Only applies if every operand is a literal. The result is always a boolean.
pub fn fold_bool_const(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::BoolOp { op, operands } = expr else {
        return None;
    };
    let truthiness = operands
        .iter()
        .map(|operand| match operand {
            Expr::Literal(literal) => Some(literal.is_truthy()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;

    ctx.push(Step::BoolConstFold);
    Some(Expr::bool(match op {
        BoolOp::And => truthiness.into_iter().all(|b| b),
        BoolOp::Or => truthiness.into_iter().any(|b| b),
    }))
}

/// Replaces conditional expressions whose test is a literal with the selected branch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionalFolder;

impl Pass for ConditionalFolder {
    fn name(&self) -> &'static str {
        "conditional_folder"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &fold_conditional)
    }
}

/// Removes boolean literals that do not affect the result of an `and` or `or` chain, and
/// collapses chains containing an absorbing literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolIdentityPruner;

impl Pass for BoolIdentityPruner {
    fn name(&self) -> &'static str {
        "bool_identity_pruner"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &prune_bool_identity)
    }
}

/// Evaluates `and` and `or` chains of literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConstFolder;

impl Pass for BoolConstFolder {
    fn name(&self) -> &'static str {
        "bool_const_folder"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &fold_bool_const)
    }
}
