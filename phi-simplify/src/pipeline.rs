//! The fixed-point driver that runs the rewrite passes.

use crate::{
    env::Env,
    error::kind::NonTermination,
    eval::{Evaluator, PureEvaluator},
    expr::Expr,
    pass::{Pass, PassContext},
    passes::{
        BetaReducer,
        BoolConstFolder,
        BoolIdentityPruner,
        ConditionalFolder,
        DictLookupFolder,
        DictMergeFolder,
        DuplicateGuardRemover,
        GuardFolder,
        NameInliner,
    },
    step::Step,
    step_collector::StepCollector,
};
use phi_error::Error;
use tracing::{debug, warn};

/// Options to use when simplifying an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptions {
    /// The maximum number of rounds of the pipeline to run.
    ///
    /// A round runs every pass once, in order. If the expression is still changing after this
    /// many rounds, simplification fails with a [`NonTermination`] error instead of returning a
    /// partially simplified expression.
    ///
    /// The default is 5.
    pub max_iterations: usize,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self { max_iterations: 5 }
    }
}

impl SimplifyOptions {
    /// Wraps the given [`SimplifyOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SimplifyOptionsBuilder {
        SimplifyOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SimplifyOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimplifyOptionsBuilder(SimplifyOptions);

impl SimplifyOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of rounds. See [`SimplifyOptions::max_iterations`] for more
    /// information.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Builds the [`SimplifyOptions`] struct.
    pub fn build(self) -> SimplifyOptions {
        self.0
    }
}

/// An ordered list of passes, and the evaluator they use to fold guard conditions.
///
/// The pipeline is built by the caller and owned by whoever runs it; there is no global registry
/// of passes.
#[derive(Debug)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
    evaluator: Box<dyn Evaluator>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// Creates a pipeline running the given passes in order, with the [`PureEvaluator`].
    pub fn new(passes: Vec<Box<dyn Pass>>) -> Self {
        Self {
            passes,
            evaluator: Box::new(PureEvaluator::default()),
        }
    }

    /// Creates the standard pipeline. See the [`passes`](crate::passes) module for the order.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(NameInliner),
            Box::new(BetaReducer),
            Box::new(DictMergeFolder),
            Box::new(DictLookupFolder),
            Box::new(ConditionalFolder),
            Box::new(BoolIdentityPruner),
            Box::new(BoolConstFolder),
            Box::new(GuardFolder),
            Box::new(DuplicateGuardRemover),
        ])
    }

    /// Adds a macro expander to the pipeline.
    ///
    /// The expander runs after the boolean folders and before the guard passes, so that guards
    /// produced by the expansion are normalized in the same round. If the pipeline has no
    /// [`GuardFolder`], the expander is added at the end.
    pub fn with_macro_expander(mut self, expander: impl Pass + 'static) -> Self {
        let guard_folder = GuardFolder.name();
        let at = self
            .passes
            .iter()
            .position(|pass| pass.name() == guard_folder)
            .unwrap_or(self.passes.len());
        self.passes.insert(at, Box::new(expander));
        self
    }

    /// Replaces the evaluator used to fold guard conditions.
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Returns the passes of the pipeline, in the order they run.
    pub fn passes(&self) -> impl Iterator<Item = &dyn Pass> {
        self.passes.iter().map(|pass| &**pass)
    }

    /// Runs every pass once, in order.
    fn run_round(&self, mut expr: Expr, ctx: &mut PassContext) -> Expr {
        for pass in &self.passes {
            let _span = tracing::trace_span!("pass", name = pass.name()).entered();
            expr = pass.run(expr, ctx);
        }
        expr
    }

    /// Runs the pipeline on the expression until it stops changing, recording every rewrite in
    /// `steps`.
    ///
    /// Two trees are considered the same if their [canonical forms](Expr::canonical) are equal.
    /// The environment is only read, and must not change while the pipeline runs.
    pub fn run(
        &self,
        expr: &Expr,
        env: &Env,
        options: &SimplifyOptions,
        steps: &mut dyn StepCollector<Step>,
    ) -> Result<Expr, Error> {
        let _span = tracing::debug_span!("simplify", %expr).entered();
        let mut ctx = PassContext {
            env,
            evaluator: &*self.evaluator,
            steps,
        };

        let mut previous = expr.clone();
        let mut current = expr.clone();
        for round in 1..=options.max_iterations {
            let before = current.canonical();
            let next = self.run_round(current.clone(), &mut ctx);
            let changed = next.canonical() != before;
            debug!(round, changed, result = %next, "round finished");
            if !changed {
                return Ok(next);
            }
            previous = std::mem::replace(&mut current, next);
        }

        warn!(max_iterations = options.max_iterations, last = %current, "no fixed point reached");
        Err(Error::new(Vec::new(), NonTermination {
            max_iterations: options.max_iterations,
            original: expr.clone(),
            previous,
            last: current,
        }))
    }
}
