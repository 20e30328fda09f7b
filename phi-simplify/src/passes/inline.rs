//! Inlining of names bound in the environment.

use crate::{
    expr::Expr,
    pass::{Pass, PassContext},
    step::Step,
};
use indexmap::IndexMap;
use super::substitute::{substitute, FreshNames};

/// Replaces each free name bound in the environment with the expression its value stands for.
///
/// Literal values (including tuples and lists of literals) become literals, and values that are
/// expressions, or host objects with an expression view, are spliced in as they are. Other
/// values are left as names. Names bound by an enclosing `lambda` are not inlined, and a
/// parameter that would capture a free name of a spliced expression is renamed.
///
/// `x = 1 ⊢ x + y = 1 + y`
#[derive(Debug, Clone, Copy, Default)]
pub struct NameInliner;

impl Pass for NameInliner {
    fn name(&self) -> &'static str {
        "name_inliner"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        let mapping = expr
            .free_vars()
            .into_iter()
            .filter_map(|name| {
                let value = ctx.env.lookup(&name)?.inline_expr()?;
                // a name bound to itself, such as `UNDEF = UNDEF`, is already inlined
                (!value.is_ident(&name)).then_some((name, value))
            })
            .collect::<IndexMap<_, _>>();
        if mapping.is_empty() {
            return expr;
        }

        for name in mapping.keys() {
            ctx.push(Step::InlineName(name.clone()));
        }

        let mut fresh = FreshNames::new(expr.names());
        fresh.reserve(mapping.values().flat_map(Expr::free_vars));
        substitute(expr, &mapping, &mut fresh, ctx.steps)
    }
}

#[cfg(test)]
mod tests {
    use crate::{env::{Env, HostObject, Value}, eval::PureEvaluator};
    use phi_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;
    use super::*;

    fn parse(source: &str) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap()
    }

    fn inline(source: &str, env: &Env) -> (String, Vec<Step>) {
        let mut steps = Vec::new();
        let mut ctx = PassContext { env, evaluator: &PureEvaluator::default(), steps: &mut steps };
        let result = NameInliner.run(parse(source), &mut ctx);
        (result.to_string(), steps)
    }

    #[derive(Debug)]
    struct Opaque;

    impl HostObject for Opaque {}

    #[test]
    fn literal_values() {
        let env = Env::new().with("x", 1).with("s", "a").with("t", Value::Tuple(vec![1.into(), Value::None]));
        let (result, steps) = inline("x + y", &env);
        assert_eq!(result, "1 + y");
        assert_eq!(steps, vec![Step::InlineName("x".to_string())]);
        assert_eq!(inline("f(s, t)", &env).0, "f('a', (1, None))");
    }

    #[test]
    fn non_literal_values_are_left_alone() {
        let env = Env::new()
            .with("d", Value::Dict(vec![("a".into(), 1.into())]))
            .with("o", Value::Host(Rc::new(Opaque)));
        let (result, steps) = inline("d['a'] + o", &env);
        assert_eq!(result, "d['a'] + o");
        assert!(steps.is_empty());
    }

    #[test]
    fn splices_expressions() {
        let env = Env::new().with("f", parse("lambda x: x + 1"));
        assert_eq!(inline("f(2)", &env).0, "(lambda x: x + 1)(2)");
    }

    #[test]
    fn bound_names_are_not_inlined() {
        let env = Env::new().with("x", 1).with("y", 2);
        assert_eq!(inline("lambda x: x + y", &env).0, "lambda x: x + 2");
    }

    #[test]
    fn spliced_names_are_not_captured() {
        let env = Env::new().with("p", parse("x > 0"));
        let (result, steps) = inline("lambda x: p and x", &env);
        assert_eq!(result, "lambda x_1: x > 0 and x_1");
        assert_eq!(steps, vec![
            Step::InlineName("p".to_string()),
            Step::AlphaRename { from: "x".to_string(), to: "x_1".to_string() },
        ]);
    }

    #[test]
    fn self_bound_names_are_not_reported() {
        let env = Env::new().with("UNDEF", Expr::undef());
        let (result, steps) = inline("UNDEF", &env);
        assert_eq!(result, "UNDEF");
        assert!(steps.is_empty());
    }
}
