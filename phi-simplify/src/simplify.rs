//! Entry points that run the standard pipeline, or a custom one bundled in a [`Simplifier`].

use crate::{
    env::Env,
    error::Error,
    expr::Expr,
    pipeline::{Pipeline, SimplifyOptions},
    step::Step,
};
use phi_parser::parser::{ast::Expr as AstExpr, Parser};

/// A pipeline together with the options to run it with.
///
/// Build one when the same custom pipeline (for example, one with a macro expander) is used for
/// many expressions. The free functions of this crate use `Simplifier::default()`, which runs the
/// standard pipeline with the default options.
#[derive(Debug, Default)]
pub struct Simplifier {
    pipeline: Pipeline,
    options: SimplifyOptions,
}

impl Simplifier {
    /// Creates a simplifier running the given pipeline with the default options.
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline, options: SimplifyOptions::default() }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: SimplifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Returns the options.
    pub fn options(&self) -> &SimplifyOptions {
        &self.options
    }

    /// Simplifies the expression against the environment.
    pub fn simplify(&self, expr: &Expr, env: &Env) -> Result<Expr, phi_error::Error> {
        self.pipeline.run(expr, env, &self.options, &mut ())
    }

    /// Simplifies the expression against the environment, returning the rewrite steps applied in
    /// order.
    pub fn simplify_with_steps(
        &self,
        expr: &Expr,
        env: &Env,
    ) -> Result<(Expr, Vec<Step>), phi_error::Error> {
        let mut steps = Vec::new();
        let expr = self.pipeline.run(expr, env, &self.options, &mut steps)?;
        Ok((expr, steps))
    }

    /// Parses the source code, simplifies the expression, and returns it unparsed.
    ///
    /// Errors raised by the pipeline itself, which have no source positions, are attributed to
    /// the whole input.
    pub fn simplify_str(&self, source: &str, env: &Env) -> Result<String, Error> {
        let ast = Parser::new(source).try_parse_full::<AstExpr>()?;
        let expr = Expr::try_from(ast)?;
        let simplified = self.simplify(&expr, env).map_err(|mut err| {
            if err.spans.is_empty() {
                err.spans.push(0..source.len());
            }
            err
        })?;
        Ok(simplified.to_string())
    }
}

/// Simplifies the expression with the standard pipeline and the default options.
///
/// ```
/// use phi_simplify::{expr::Expr, simplify, Env};
///
/// // `(lambda x: x + 1)(3) = 3 + 1`
/// let expr = Expr::call(
///     Expr::lambda(vec!["x".to_string()], Expr::binary(
///         phi_simplify::expr::BinOp::Add,
///         Expr::ident("x"),
///         Expr::int(1),
///     )).unwrap(),
///     vec![Expr::int(3)],
/// );
/// let simplified = simplify(&expr, &Env::new()).unwrap();
/// assert_eq!(simplified.to_string(), "3 + 1");
/// ```
pub fn simplify(expr: &Expr, env: &Env) -> Result<Expr, phi_error::Error> {
    Simplifier::default().simplify(expr, env)
}

/// Simplifies the expression with the standard pipeline and the given options.
pub fn simplify_with(
    expr: &Expr,
    env: &Env,
    options: &SimplifyOptions,
) -> Result<Expr, phi_error::Error> {
    Simplifier::default().with_options(*options).simplify(expr, env)
}

/// Simplifies the expression with the standard pipeline, returning the steps taken.
pub fn simplify_with_steps(expr: &Expr, env: &Env) -> Result<(Expr, Vec<Step>), phi_error::Error> {
    Simplifier::default().simplify_with_steps(expr, env)
}

/// Parses, simplifies and unparses source code with the standard pipeline.
///
/// ```
/// use phi_simplify::{simplify_str, Env};
///
/// let env = Env::new().with("a", 4);
/// assert_eq!(simplify_str("(a if True else b) and True", &env).unwrap(), "4");
/// ```
pub fn simplify_str(source: &str, env: &Env) -> Result<String, Error> {
    Simplifier::default().simplify_str(source, env)
}

#[cfg(test)]
mod tests {
    use crate::{error::kind::{DuplicateParameter, NonTermination}, pipeline::SimplifyOptionsBuilder};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn parse_errors() {
        let err = simplify_str("(1 +", &Env::new()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn malformed_constructs() {
        let err = simplify_str("lambda x, x: x", &Env::new()).unwrap_err();
        assert!(err.downcast_ref::<DuplicateParameter>().is_some());
    }

    #[test]
    fn non_termination_spans_the_input() {
        let source = "(lambda x: x(x)(x))(lambda x: x(x)(x))";
        let err = simplify_str(source, &Env::new()).unwrap_err();
        let Error::Simplify(err) = &err else {
            panic!("expected a simplification error");
        };
        assert_eq!(err.spans, vec![0..source.len()]);
        assert!(err.is::<NonTermination>());
    }

    #[test]
    fn options_are_applied() {
        let expr = Expr::call(
            Expr::lambda(vec!["x".to_string()], Expr::ident("x")).unwrap(),
            vec![Expr::int(1)],
        );
        let one = SimplifyOptionsBuilder::new().max_iterations(1).build();
        assert!(simplify_with(&expr, &Env::new(), &one).is_err());
        assert_eq!(simplify(&expr, &Env::new()).unwrap(), Expr::int(1));
    }

    #[test]
    fn steps() {
        let env = Env::new().with("a", 4);
        let expr = Expr::BoolOp {
            op: crate::expr::BoolOp::And,
            operands: vec![Expr::ident("a"), Expr::bool(true)],
        };
        let (result, steps) = simplify_with_steps(&expr, &env).unwrap();
        assert_eq!(result, Expr::int(4));
        assert_eq!(steps, vec![Step::InlineName("a".to_string()), Step::BoolIdentity]);
    }
}
