//! The guard algebra.
//!
//! A guard `φ % ψ` stands for `φ` when `ψ` holds, and for [`UNDEF`] otherwise. The rules in this
//! module fold guards whose condition is known, recover conditions from definedness tests, and
//! move guards outwards, out of function bodies and call arguments, so that they can be seen and
//! deduplicated by the [`DuplicateGuardRemover`](super::DuplicateGuardRemover).

use crate::{
    env::Value,
    expr::{BinOp, CmpOp, Expr, DEFINED, UNDEF},
    pass::{rewrite_bottom_up, Pass, PassContext},
    step::Step,
};

/// Wraps `expr` in one guard per condition, in order.
fn wrap(expr: Expr, guards: Vec<Expr>) -> Expr {
    guards.into_iter().fold(expr, Expr::guard)
}

/// Returns the payload and guard of the expression, or the expression itself with no guard.
fn split_guard(expr: &Expr) -> (&Expr, Option<&Expr>) {
    match expr.as_guard() {
        Some((payload, condition)) => (payload, Some(condition)),
        None => (expr, None),
    }
}

/// `φ % True = φ`
/// `φ % False = UNDEF`
///
/// A condition other than a boolean literal is evaluated with the pipeline's evaluator, unless
/// it contains a function or a call. The guard is folded only if the evaluation succeeds with a
/// boolean.
fn fold_guard(payload: &Expr, condition: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let (holds, step) = match condition.as_bool() {
        Some(true) => (true, Step::GuardTrue),
        Some(false) => (false, Step::GuardFalse),
        None => {
            if condition.any(|expr| matches!(expr, Expr::Lambda { .. } | Expr::Call { .. })) {
                return None;
            }
            match ctx.evaluator.eval(condition, ctx.env) {
                Ok(Value::Bool(holds)) => (holds, Step::GuardEvaluated),
                Ok(value) => {
                    tracing::trace!(%condition, kind = value.type_name(), "guard condition is not a boolean");
                    return None;
                },
                Err(err) => {
                    tracing::trace!(%condition, %err, "guard condition not evaluated");
                    return None;
                },
            }
        },
    };

    ctx.push(step);
    Some(if holds { payload.clone() } else { Expr::undef() })
}

/// `(φ % ψ) is not UNDEF = ψ`
fn definedness_test(lhs: &Expr, rhs: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let (_, condition) = lhs.as_guard()?;
    if !rhs.is_ident(UNDEF) {
        return None;
    }
    ctx.push(Step::DefinednessTest);
    Some(condition.clone())
}

/// `lambda x: φ % ψ = (lambda x: φ) % ψ`
///
/// Only applies if none of the parameters is free in `ψ`, since hoisting would otherwise
/// separate the condition from the parameters it refers to.
fn hoist_lambda_guard(params: &[String], body: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let (payload, condition) = body.as_guard()?;
    let free = condition.free_vars();
    if params.iter().any(|param| free.contains(param)) {
        return None;
    }
    ctx.push(Step::HoistLambdaGuard);
    Some(Expr::guard(
        Expr::Lambda { params: params.to_vec(), body: Box::new(payload.clone()) },
        condition.clone(),
    ))
}

/// The rules for calls, tried in order:
///
/// `defined(φ % ψ) = ψ`
/// `f(a % ψ, k=b % χ) = f(a, k=b) % ψ % χ`
/// `defined(φ) = True`
/// `(f % ψ)(a) = f(a) % ψ`
fn fold_call(
    callee: &Expr,
    args: &[Expr],
    keywords: &[(String, Expr)],
    ctx: &mut PassContext,
) -> Option<Expr> {
    let is_defined = callee.is_ident(DEFINED);

    if is_defined && keywords.is_empty() {
        if let [arg] = args {
            if let Some((_, condition)) = arg.as_guard() {
                ctx.push(Step::DefinedGuard);
                return Some(condition.clone());
            }
        }
    }

    let mut guards = Vec::new();
    let new_args = args
        .iter()
        .map(|arg| {
            let (payload, guard) = split_guard(arg);
            guards.extend(guard.cloned());
            payload.clone()
        })
        .collect::<Vec<_>>();
    let new_keywords = keywords
        .iter()
        .map(|(name, value)| {
            let (payload, guard) = split_guard(value);
            guards.extend(guard.cloned());
            (name.clone(), payload.clone())
        })
        .collect::<Vec<_>>();
    if !guards.is_empty() {
        for _ in &guards {
            ctx.push(Step::DistributeArgGuard);
        }
        let call = Expr::Call {
            callee: Box::new(callee.clone()),
            args: new_args,
            keywords: new_keywords,
        };
        return Some(wrap(call, guards));
    }

    if is_defined {
        ctx.push(Step::DefinedTrivial);
        return Some(Expr::bool(true));
    }

    let (function, condition) = callee.as_guard()?;
    ctx.push(Step::DistributeCalleeGuard);
    Some(Expr::guard(
        Expr::Call {
            callee: Box::new(function.clone()),
            args: args.to_vec(),
            keywords: keywords.to_vec(),
        },
        condition.clone(),
    ))
}

/// Applies the rule of the guard algebra matching the shape of the node, if any.
pub fn apply_guard_rules(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    match expr {
        Expr::Binary { op: BinOp::Mod, lhs, rhs } => fold_guard(lhs, rhs, ctx),
        Expr::Compare { op: CmpOp::IsNot, lhs, rhs } => definedness_test(lhs, rhs, ctx),
        Expr::Lambda { params, body } => hoist_lambda_guard(params, body, ctx),
        Expr::Call { callee, args, keywords } => fold_call(callee, args, keywords, ctx),
        _ => None,
    }
}

/// Normalizes guards: folds known conditions, resolves definedness tests, and moves guards out of
/// function bodies and calls.
///
/// Every rule is applied at most once per node and round. A rule may expose a pattern for another
/// rule (for example, distributing a guard out of an argument may produce a guard whose condition
/// can be folded), which is picked up in the next round of the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardFolder;

impl Pass for GuardFolder {
    fn name(&self) -> &'static str {
        "guard_folder"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &apply_guard_rules)
    }
}

#[cfg(test)]
mod tests {
    use crate::{env::Env, eval::PureEvaluator};
    use phi_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap()
    }

    fn fold_in(source: &str, env: &Env) -> (String, Vec<Step>) {
        let mut steps = Vec::new();
        let mut ctx = PassContext { env, evaluator: &PureEvaluator::default(), steps: &mut steps };
        let result = GuardFolder.run(parse(source), &mut ctx);
        (result.to_string(), steps)
    }

    fn fold(source: &str) -> String {
        fold_in(source, &Env::new()).0
    }

    #[test]
    fn literal_conditions() {
        assert_eq!(fold("phi % False"), "UNDEF");
        assert_eq!(fold("phi % True"), "phi");
    }

    #[test]
    fn evaluated_conditions() {
        let env = Env::new().with("n", 3).with("s", "abc");
        let (result, steps) = fold_in("phi % (n > 2)", &env);
        assert_eq!(result, "phi");
        assert_eq!(steps, vec![Step::GuardEvaluated]);
        assert_eq!(fold_in("phi % (n == 2 or s == 'x')", &env).0, "UNDEF");
        assert_eq!(fold_in("phi % (len > 2)", &env).0, "phi % (len > 2)");
    }

    #[test]
    fn conditions_that_are_not_booleans() {
        let env = Env::new().with("n", 3);
        assert_eq!(fold_in("phi % n", &env).0, "phi % n");
        assert_eq!(fold("7 % 3"), "7 % 3");
    }

    #[test]
    fn impure_conditions_are_not_evaluated() {
        let env = Env::new().with("f", parse("lambda x: True"));
        assert_eq!(fold_in("phi % f(1)", &env).0, "phi % f(1)");
        assert_eq!(fold("phi % (lambda: True)()"), "phi % (lambda: True)()");
    }

    #[test]
    fn definedness_test() {
        assert_eq!(fold("(phi % psi) is not UNDEF"), "psi");
        assert_eq!(fold("phi is not UNDEF"), "phi is not UNDEF");
        assert_eq!(fold("(phi % psi) is UNDEF"), "phi % psi is UNDEF");
    }

    #[test]
    fn defined() {
        let (result, steps) = fold_in("defined(phi % psi)", &Env::new());
        assert_eq!(result, "psi");
        assert_eq!(steps, vec![Step::DefinedGuard]);
        assert_eq!(fold("defined(lambda x: x)"), "True");
        assert_eq!(fold("defined(phi)"), "True");
    }

    #[test]
    fn argument_guards() {
        assert_eq!(fold("f(x % g)"), "f(x) % g");
        assert_eq!(fold("KILLED(x, iota(z) % singular(z))"), "KILLED(x, iota(z)) % singular(z)");
    }

    #[test]
    fn argument_guards_in_order() {
        let (result, steps) = fold_in("f(a % g1, b, k=c % g2)", &Env::new());
        assert_eq!(result, "f(a, b, k=c) % g1 % g2");
        assert_eq!(steps, vec![Step::DistributeArgGuard, Step::DistributeArgGuard]);
    }

    #[test]
    fn lambda_guards() {
        assert_eq!(fold("lambda x: p(x) % g"), "(lambda x: p(x)) % g");
        assert_eq!(fold("lambda x: p(x) % g(x)"), "lambda x: p(x) % g(x)");
    }

    #[test]
    fn lambda_guard_then_argument_guard() {
        // the hoisted guard is a child of the call, so both rules apply in one traversal
        assert_eq!(fold("iota(lambda x: p(x) % g)"), "iota(lambda x: p(x)) % g");
    }

    #[test]
    fn callee_guards() {
        let (result, steps) = fold_in("(f % g)(x)", &Env::new());
        assert_eq!(result, "f(x) % g");
        assert_eq!(steps, vec![Step::DistributeCalleeGuard]);
    }

    #[test]
    fn unguarded_calls_are_left_alone() {
        let (result, steps) = fold_in("f(x, k=y)", &Env::new());
        assert_eq!(result, "f(x, k=y)");
        assert!(steps.is_empty());
    }
}
