//! Capture-avoiding substitution of names by expressions.
//!
//! Substituting `y := x` into `lambda x: x + y` naively would give `lambda x: x + x`, where the
//! substituted `x` is now bound by the function instead of referring to the outer `x`. To avoid
//! this, any parameter that would capture a free name of a replacement is renamed first, to a
//! fresh name built from the original with a numeric suffix: `lambda x_1: x_1 + x`.

use crate::{
    expr::Expr,
    step::Step,
    step_collector::StepCollector,
};
use indexmap::{IndexMap, IndexSet};

/// A generator of names that do not clash with any name already in use.
///
/// Every generated name is added to the taken set, so the same name is never generated twice.
#[derive(Debug, Clone, Default)]
pub struct FreshNames {
    taken: IndexSet<String>,
}

impl FreshNames {
    /// Creates a generator that avoids the given names.
    pub fn new(taken: impl IntoIterator<Item = String>) -> Self {
        Self { taken: taken.into_iter().collect() }
    }

    /// Marks more names as taken.
    pub fn reserve(&mut self, names: impl IntoIterator<Item = String>) {
        self.taken.extend(names);
    }

    /// Returns `base_1`, `base_2`, ..., whichever is the first that is not taken.
    pub fn fresh(&mut self, base: &str) -> String {
        let name = (1..)
            .map(|i| format!("{}_{}", base, i))
            .find(|candidate| !self.taken.contains(candidate))
            .unwrap_or_else(|| unreachable!("the candidates are unbounded"));
        self.taken.insert(name.clone());
        name
    }
}

/// Replaces every free occurrence of the names in `mapping` with the corresponding expression,
/// simultaneously, renaming function parameters where needed to avoid capture.
///
/// The taken set of `fresh` must already contain every name occurring in `expr`, every key of
/// `mapping`, and every free name of its values.
pub fn substitute(
    expr: Expr,
    mapping: &IndexMap<String, Expr>,
    fresh: &mut FreshNames,
    steps: &mut dyn StepCollector<Step>,
) -> Expr {
    if mapping.is_empty() {
        return expr;
    }

    match expr {
        Expr::Ident(name) => match mapping.get(&name) {
            Some(replacement) => replacement.clone(),
            None => Expr::Ident(name),
        },
        Expr::Lambda { params, body } => {
            // parameters shadow the names they bind
            let inner = mapping
                .iter()
                .filter(|(name, _)| !params.contains(name))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<IndexMap<_, _>>();
            let body_free = body.free_vars();
            if !inner.keys().any(|name| body_free.contains(name)) {
                return Expr::Lambda { params, body };
            }

            let replacement_free = inner
                .values()
                .flat_map(Expr::free_vars)
                .collect::<IndexSet<_>>();
            fresh.reserve(body.names());

            let mut renames = IndexMap::new();
            let params = params
                .into_iter()
                .map(|param| {
                    if !replacement_free.contains(&param) {
                        return param;
                    }
                    let renamed = fresh.fresh(&param);
                    tracing::trace!(from = %param, to = %renamed, "alpha-rename");
                    steps.push(Step::AlphaRename { from: param.clone(), to: renamed.clone() });
                    renames.insert(param, Expr::Ident(renamed.clone()));
                    renamed
                })
                .collect::<Vec<_>>();

            let mut combined = inner;
            combined.extend(renames);
            Expr::Lambda {
                params,
                body: Box::new(substitute(*body, &combined, fresh, steps)),
            }
        },
        expr => expr.map_children(|child| substitute(child, mapping, fresh, steps)),
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

    /// Substitutes with a generator that avoids every relevant name, and returns the printed
    /// result along with the steps.
    fn subst(source: &str, mapping: &[(&str, &str)]) -> (String, Vec<Step>) {
        let expr = parse(source);
        let mapping = mapping
            .iter()
            .map(|(name, value)| (name.to_string(), parse(value)))
            .collect::<IndexMap<_, _>>();
        let mut fresh = FreshNames::new(expr.names());
        fresh.reserve(mapping.keys().cloned());
        fresh.reserve(mapping.values().flat_map(Expr::free_vars));

        let mut steps = Vec::new();
        let result = substitute(expr, &mapping, &mut fresh, &mut steps);
        (result.to_string(), steps)
    }

    #[test]
    fn fresh_names_skip_taken_ones() {
        let mut fresh = FreshNames::new(["x".to_string(), "x_1".to_string()]);
        assert_eq!(fresh.fresh("x"), "x_2");
        assert_eq!(fresh.fresh("x"), "x_3");
        assert_eq!(fresh.fresh("y"), "y_1");
    }

    #[test]
    fn replaces_free_occurrences() {
        assert_eq!(subst("x + f(x, y)", &[("x", "1")]).0, "1 + f(1, y)");
    }

    #[test]
    fn simultaneous() {
        assert_eq!(subst("(x, y)", &[("x", "y"), ("y", "x")]).0, "(y, x)");
    }

    #[test]
    fn parameters_shadow() {
        let (result, steps) = subst("lambda x: x + y", &[("x", "1")]);
        assert_eq!(result, "lambda x: x + y");
        assert!(steps.is_empty());
    }

    #[test]
    fn renames_capturing_parameter() {
        let (result, steps) = subst("lambda x: x + y", &[("y", "x")]);
        assert_eq!(result, "lambda x_1: x_1 + x");
        assert_eq!(steps, vec![Step::AlphaRename { from: "x".into(), to: "x_1".into() }]);
    }

    #[test]
    fn fresh_name_avoids_names_in_body() {
        let (result, _) = subst("lambda x: x + y + x_1", &[("y", "x")]);
        assert_eq!(result, "lambda x_2: x_2 + x + x_1");
    }

    #[test]
    fn leaves_lambda_alone_when_nothing_is_substituted() {
        let (result, steps) = subst("lambda x: x + z", &[("y", "x")]);
        assert_eq!(result, "lambda x: x + z");
        assert!(steps.is_empty());
    }

    #[test]
    fn nested_renames() {
        let (result, steps) = subst("lambda x: lambda x_1: x + x_1 + y", &[("y", "x + x_1")]);
        assert_eq!(result, "lambda x_2: lambda x_1_1: x_2 + x_1_1 + (x + x_1)");
        assert_eq!(steps.len(), 2);
    }
}
