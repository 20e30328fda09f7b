//! The interface shared by every rewrite pass.

use crate::{
    env::Env,
    eval::Evaluator,
    expr::Expr,
    step::Step,
    step_collector::StepCollector,
};
use std::fmt;

/// What a pass can see while it runs: the environment, the evaluator for guard conditions, and
/// the collector that records the steps taken.
pub struct PassContext<'a> {
    /// The bindings visible to the expression.
    pub env: &'a Env,

    /// The evaluator used for best-effort folding.
    pub evaluator: &'a dyn Evaluator,

    /// The collector receiving every rewrite step.
    pub steps: &'a mut dyn StepCollector<Step>,
}

impl<'a> PassContext<'a> {
    /// Records a step.
    pub fn push(&mut self, step: Step) {
        tracing::trace!(%step, "rewrite");
        self.steps.push(step);
    }
}

/// A single-purpose tree-to-tree transformation.
///
/// A pass is run once per round of the pipeline, and must traverse the whole tree itself (see
/// [`rewrite_bottom_up`]). It should never fail: a rule that does not apply leaves the tree as it
/// was.
pub trait Pass: fmt::Debug {
    /// Returns a short name for the pass, used in logs.
    fn name(&self) -> &'static str;

    /// Runs the pass over the whole expression.
    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr;
}

/// Rewrites the children of the expression first, then offers the rebuilt expression to `rule`
/// exactly once.
///
/// If the rule applies, its result replaces the node. The result is not revisited in the same
/// traversal; the pipeline's next round picks up anything it exposes.
pub fn rewrite_bottom_up(
    expr: Expr,
    ctx: &mut PassContext,
    rule: &dyn Fn(&Expr, &mut PassContext) -> Option<Expr>,
) -> Expr {
    let expr = expr.map_children(|child| rewrite_bottom_up(child, ctx, rule));
    rule(&expr, ctx).unwrap_or(expr)
}

/// A pass built from a single rule function, applied bottom-up.
///
/// This is the simplest way to plug a user-defined rewrite, such as a macro expander, into the
/// pipeline. Each application is recorded as [`Step::Custom`] with the name of the pass.
///
/// ```
/// use phi_simplify::{expr::Expr, pass::RulePass, Env, Pipeline, Simplifier};
///
/// // `twice(f)` expands to `lambda x: f(f(x))`
/// let expander = RulePass::new("twice", |expr, _env| match expr {
///     Expr::Call { callee, args, keywords } if callee.is_ident("twice") && args.len() == 1 && keywords.is_empty() => {
///         let f = args[0].clone();
///         let body = Expr::call(f.clone(), vec![Expr::call(f, vec![Expr::ident("x")])]);
///         Some(Expr::lambda(vec!["x".to_string()], body).unwrap())
///     },
///     _ => None,
/// });
///
/// let simplifier = Simplifier::new(Pipeline::standard().with_macro_expander(expander));
/// assert_eq!(simplifier.simplify_str("twice(g)(1)", &Env::new()).unwrap(), "g(g(1))");
/// ```
pub struct RulePass<F> {
    name: &'static str,
    rule: F,
}

impl<F> RulePass<F>
where
    F: Fn(&Expr, &Env) -> Option<Expr>,
{
    /// Creates a pass with the given name, applying the rule to every node.
    pub fn new(name: &'static str, rule: F) -> Self {
        Self { name, rule }
    }
}

impl<F> fmt::Debug for RulePass<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RulePass").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F> Pass for RulePass<F>
where
    F: Fn(&Expr, &Env) -> Option<Expr>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(&self, expr: Expr, ctx: &mut PassContext) -> Expr {
        rewrite_bottom_up(expr, ctx, &|expr, ctx| {
            let rewritten = (self.rule)(expr, ctx.env)?;
            ctx.push(Step::Custom(self.name.to_string()));
            Some(rewritten)
        })
    }
}
