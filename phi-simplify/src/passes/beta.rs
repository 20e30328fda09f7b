use crate::{
    expr::Expr,
    pass::{rewrite_bottom_up, Pass, PassContext},
    step::Step,
};
use indexmap::IndexMap;
use super::substitute::{substitute, FreshNames};

/// `(lambda x: body)(a) = body[x := a]`
///
/// Only calls passing exactly one positional argument per parameter, and no keyword arguments,
/// are reduced. Substitution is capture-avoiding.
pub fn beta_reduce(expr: &Expr, ctx: &mut PassContext) -> Option<Expr> {
    let Expr::Call { callee, args, keywords } = expr else {
        return None;
    };
    let Expr::Lambda { params, body } = &**callee else {
        return None;
    };
    if params.len() != args.len() || !keywords.is_empty() {
        return None;
    }

    let mapping = params.iter().cloned().zip(args.iter().cloned()).collect::<IndexMap<_, _>>();
    let mut fresh = FreshNames::new(callee.names());
    fresh.reserve(args.iter().flat_map(Expr::free_vars));

    ctx.push(Step::BetaReduce);
    Some(substitute((**body).clone(), &mapping, &mut fresh, ctx.steps))
}

/// Replaces calls of `lambda` expressions with the function body, with the arguments substituted
/// for the parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct BetaReducer;

impl Pass for BetaReducer {
    fn name(&self) -> &'static str {
        "beta_reducer"
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &beta_reduce)
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

    fn reduce(source: &str) -> String {
        let mut ctx = PassContext {
            env: &Env::new(),
            evaluator: &PureEvaluator::default(),
            steps: &mut (),
        };
        BetaReducer.run(parse(source), &mut ctx).to_string()
    }

    #[test]
    fn single_argument() {
        assert_eq!(reduce("(lambda x: x + 1)(3)"), "3 + 1");
    }

    #[test]
    fn multiple_arguments() {
        assert_eq!(reduce("(lambda x, y: x * y)(2, 5)"), "2 * 5");
    }

    #[test]
    fn curried_application() {
        // the inner call is reduced first, so the rebuilt outer call is reduced in the same traversal
        assert_eq!(reduce("((lambda x: (lambda y: x + y))(1))(2)"), "1 + 2");
        assert_eq!(reduce("(lambda y: 1 + y)(2)"), "1 + 2");
    }

    #[test]
    fn avoids_capture_of_free_argument() {
        assert_eq!(reduce("(lambda y: (lambda x: x + y))(x)"), "lambda x_1: x_1 + x");
    }

    #[test]
    fn inner_parameter_shadows() {
        assert_eq!(reduce("(lambda x: (lambda x: x + y))(3)"), "lambda x: x + y");
    }

    #[test]
    fn arity_mismatch_is_left_alone() {
        assert_eq!(reduce("(lambda x, y: x)(1)"), "(lambda x, y: x)(1)");
        assert_eq!(reduce("(lambda x: x)(1, 2)"), "(lambda x: x)(1, 2)");
        assert_eq!(reduce("(lambda x: x)(x=1)"), "(lambda x: x)(x=1)");
    }

    #[test]
    fn no_parameters() {
        assert_eq!(reduce("(lambda: 0)()"), "0");
    }

    #[test]
    fn records_steps() {
        let mut steps = Vec::new();
        let mut ctx = PassContext {
            env: &Env::new(),
            evaluator: &PureEvaluator::default(),
            steps: &mut steps,
        };
        BetaReducer.run(parse("(lambda y: lambda x: x + y)(x)"), &mut ctx);
        assert_eq!(steps, vec![
            Step::BetaReduce,
            Step::AlphaRename { from: "x".to_string(), to: "x_1".to_string() },
        ]);
    }
}
