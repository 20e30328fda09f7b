use crate::{
    expr::Expr,
    pass::{rewrite_bottom_up, Pass, PassContext},
    step::Step,
};
use std::collections::HashSet;

/// Splits a chain of guards into its payload and the guards, in the order they are applied.
///
/// A guard that is itself guarded, as in `φ % (ψ % χ)`, contributes its own chain: `ψ` then `χ`.
fn collect_chain<'a>(expr: &'a Expr, guards: &mut Vec<&'a Expr>) -> &'a Expr {
    let Some((payload, condition)) = expr.as_guard() else {
        return expr;
    };
    let payload = collect_chain(payload, guards);
    let mut nested = Vec::new();
    guards.push(collect_chain(condition, &mut nested));
    guards.append(&mut nested);
    payload
}

/// `φ % ψ % ψ = φ % ψ`
/// `φ % (ψ % χ) = φ % ψ % χ`
///
/// Flattens the guard chain rooted at the node, then keeps only the first occurrence of each
/// structurally identical guard, and rebuilds the chain from left to right.
pub fn remove_duplicate_guards(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    expr.as_guard()?;

    let mut guards = Vec::new();
    let payload = collect_chain(expr, &mut guards);

    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(guards.len());
    let mut removed = 0;
    for guard in guards {
        if seen.insert(guard.canonical()) {
            unique.push(guard);
        } else {
            removed += 1;
        }
    }

    let rebuilt = unique
        .into_iter()
        .fold(payload.clone(), |chain, guard| Expr::guard(chain, guard.clone()));
    if rebuilt == *expr {
        return None;
    }

    if removed == 0 {
        ctx.push(Step::FlattenGuards);
    }
    for _ in 0..removed {
        ctx.push(Step::DuplicateGuard);
    }
    Some(rebuilt)
}

/// Flattens guard chains and removes guards that are already in force.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateGuardRemover;

impl Pass for DuplicateGuardRemover {
    fn name(&self) -> &'static str {
        "duplicate_guard_remover"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &remove_duplicate_guards)
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

    fn dedup(source: &str) -> (String, Vec<Step>) {
        let mut steps = Vec::new();
        let mut ctx = PassContext {
            env: &Env::new(),
            evaluator: &PureEvaluator::default(),
            steps: &mut steps,
        };
        let result = DuplicateGuardRemover.run(parse(source), &mut ctx);
        (result.to_string(), steps)
    }

    #[test]
    fn repeated_guard() {
        let (result, steps) = dedup("(A % G) % G");
        assert_eq!(result, "A % G");
        assert_eq!(steps, vec![Step::DuplicateGuard]);
    }

    #[test]
    fn nested_chain_is_flattened() {
        let (result, steps) = dedup("A % (G1 % G2)");
        assert_eq!(result, "A % G1 % G2");
        assert_eq!(steps, vec![Step::FlattenGuards]);
    }

    #[test]
    fn repeated_guard_in_nested_chain() {
        assert_eq!(dedup("(A % G1) % (G2 % G1)").0, "A % G1 % G2");
        assert_eq!(dedup("(A % G1 % G2) % G1").0, "A % G1 % G2");
    }

    #[test]
    fn first_occurrence_is_kept() {
        assert_eq!(dedup("A % G2 % G1 % G2 % G3 % G1").0, "A % G2 % G1 % G3");
    }

    #[test]
    fn structural_comparison() {
        assert_eq!(dedup("A % f(x, 1) % f(x, 1)").0, "A % f(x, 1)");
        assert_eq!(dedup("A % f(x, 1) % f(x, 2)").0, "A % f(x, 1) % f(x, 2)");
    }

    #[test]
    fn nested_payloads_are_deduplicated_too() {
        assert_eq!(dedup("f(A % G % G) % H % H").0, "f(A % G) % H");
    }

    #[test]
    fn distinct_guards_are_left_alone() {
        let (result, steps) = dedup("A % G1 % G2");
        assert_eq!(result, "A % G1 % G2");
        assert!(steps.is_empty());
    }
}
