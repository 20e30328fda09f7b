//! End-to-end rewrites through the standard pipeline.

use phi_simplify::{
    error::kind::NonTermination,
    expr::Expr,
    pass::RulePass,
    simplify_str,
    Env,
    Error,
    HostObject,
    Pipeline,
    Simplifier,
};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn simplified(source: &str) -> String {
    simplify_str(source, &Env::new()).unwrap()
}

fn simplified_in(source: &str, env: &Env) -> String {
    simplify_str(source, env).unwrap()
}

#[test]
fn beta_reduction() {
    assert_eq!(simplified("(lambda x: x + 1)(3)"), "3 + 1");
    assert_eq!(simplified("(lambda x, y: x * y)(2, 5)"), "2 * 5");
    assert_eq!(simplified("((lambda x: (lambda y: x + y))(1))(2)"), "1 + 2");
}

#[test]
fn capture_avoidance() {
    assert_eq!(simplified("(lambda y: (lambda x: x + y))(x)"), "lambda x_1: x_1 + x");
    assert_eq!(simplified("(lambda x: (lambda x: x + y))(3)"), "lambda x: x + y");
}

#[test]
fn partial_application_is_left_alone() {
    assert_eq!(simplified("(lambda x, y: x)(1)"), "(lambda x, y: x)(1)");
}

#[test]
fn merge_then_lookup() {
    assert_eq!(simplified("({'a':1} | {'b':2})['a']"), "1");
    assert_eq!(simplified("{'a':1} | {'b':2}"), "{'a': 1, 'b': 2}");
    assert_eq!(simplified("{'x':1} | {'x':2}"), "{'x': 2}");
}

#[test]
fn conditional_then_boolean_pruning() {
    let env = Env::new().with("a", 4);
    assert_eq!(simplified_in("(a if True else b) and True", &env), "4");
}

#[test]
fn symbolic_lookup_then_pruning() {
    let env = Env::new().with("a", 4);
    assert_eq!(simplified_in("({i:1}[i] or False)", &env), "1");
}

#[test]
fn boolean_constants() {
    assert_eq!(simplified("True and False"), "False");
    assert_eq!(simplified("True or False"), "True");
    assert_eq!(simplified("False and False"), "False");
}

#[test]
fn inlining() {
    let env = Env::new().with("x", 1);
    assert_eq!(simplified_in("x", &env), "1");
    assert_eq!(simplified_in("(1, 2, 3)[0]", &env), "(1, 2, 3)[0]");
}

#[test]
fn inlined_functions_are_applied() {
    let env = Env::new().with("inc", Expr::try_from(
        phi_parser::parser::Parser::new("lambda n: n + 1")
            .try_parse_full::<phi_parser::parser::ast::Expr>()
            .unwrap(),
    ).unwrap());
    assert_eq!(simplified_in("inc(2)", &env), "2 + 1");
}

#[derive(Debug)]
struct Meaning(&'static str);

impl HostObject for Meaning {
    fn expr_view(&self) -> Option<Expr> {
        Some(Expr::guard(Expr::ident(self.0), Expr::call(Expr::ident("exists"), vec![Expr::ident(self.0)])))
    }
}

#[test]
fn host_objects_with_an_expression_view() {
    let env = Env::new().with("the_king", phi_simplify::Value::Host(Rc::new(Meaning("king"))));
    assert_eq!(simplified_in("bald(the_king)", &env), "bald(king) % exists(king)");
    assert_eq!(simplified_in("defined(the_king)", &env), "exists(king)");
}

#[test]
fn guard_folding() {
    assert_eq!(simplified("phi % False"), "UNDEF");
    assert_eq!(simplified("phi % True"), "phi");
    assert_eq!(simplified("defined(phi % psi)"), "psi");
    assert_eq!(simplified("(phi % psi) is not UNDEF"), "psi");
    assert_eq!(simplified("defined(lambda x: x)"), "True");
}

#[test]
fn guard_conditions_are_evaluated() {
    let env = Env::new().with("n", 3);
    assert_eq!(simplified_in("phi % (n > 2)", &env), "phi");
    assert_eq!(simplified_in("phi % (n < 2)", &env), "UNDEF");
}

#[test]
fn oversized_repetition_leaves_the_guard_in_place() {
    assert_eq!(
        simplified("phi % ('ab' * 9223372036854775807 == 'x')"),
        "phi % ('ab' * 9223372036854775807 == 'x')",
    );
    assert_eq!(
        simplified("phi % ((1, 2) * 9223372036854775807 == (1,))"),
        "phi % ((1, 2) * 9223372036854775807 == (1,))",
    );
}

#[test]
fn guard_deduplication() {
    assert_eq!(simplified("(A % G) % G"), "A % G");
    assert_eq!(simplified("(A % G1) % (G2 % G1)"), "A % G1 % G2");
    assert_eq!(simplified("A % (G1 % G2)"), "A % G1 % G2");
}

#[test]
fn guard_distribution() {
    assert_eq!(simplified("f(x % g)"), "f(x) % g");
    assert_eq!(simplified("KILLED(x, iota(z) % singular(z))"), "KILLED(x, iota(z)) % singular(z)");
    assert_eq!(simplified("lambda x: p(x) % g"), "(lambda x: p(x)) % g");
    assert_eq!(simplified("iota(lambda x: p(x) % g)"), "iota(lambda x: p(x)) % g");
    assert_eq!(simplified("f(a % g, b % g)"), "f(a, b) % g");
}

#[test]
fn guards_exposed_by_beta_reduction() {
    assert_eq!(simplified("(lambda x: f(x % g))(a)"), "f(a) % g");
    assert_eq!(simplified("defined((lambda x: x % p(x))(a))"), "p(a)");
}

#[test]
fn macro_expansion() {
    // `the(p)` expands to `iota(p) % singular(p)`
    let expander = RulePass::new("the", |expr, _| match expr {
        Expr::Call { callee, args, keywords } if callee.is_ident("the") && args.len() == 1 && keywords.is_empty() => {
            Some(Expr::guard(
                Expr::call(Expr::ident("iota"), args.clone()),
                Expr::call(Expr::ident("singular"), args.clone()),
            ))
        },
        _ => None,
    });
    let simplifier = Simplifier::new(Pipeline::standard().with_macro_expander(expander));
    assert_eq!(
        simplifier.simplify_str("KILLED(x, the(z))", &Env::new()).unwrap(),
        "KILLED(x, iota(z)) % singular(z)",
    );
}

#[test]
fn divergent_input_is_an_error() {
    let err = simplify_str("(lambda x: x(x)(x))(lambda x: x(x)(x))", &Env::new()).unwrap_err();
    let kind = err.downcast_ref::<NonTermination>().unwrap();
    assert_eq!(kind.max_iterations, 5);
    assert!(matches!(err, Error::Simplify(_)));
}
