//! Laws the simplifier must satisfy for every expression, checked on generated expressions.

use phi_simplify::{
    expr::{BinOp, BoolOp, CmpOp, Expr},
    simplify,
    simplify_with,
    Env,
    SimplifyOptionsBuilder,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["a", "b", "f", "g", "x", "y"];

fn name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES.to_vec()).prop_map(str::to_string)
}

/// Expressions that are not boolean literals, and that no pass rewrites on their own.
fn opaque() -> impl Strategy<Value = Expr> {
    let leaf = name().prop_map(Expr::Ident);
    leaf.prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            (name(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| Expr::call(Expr::Ident(f), args)),
            (prop::sample::select(vec![BinOp::Add, BinOp::Mul, BinOp::Sub]), inner.clone(), inner)
                .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs)),
        ]
    })
}

/// Arbitrary expressions mixing every construct the passes know about.
fn expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        name().prop_map(Expr::Ident),
        any::<bool>().prop_map(Expr::bool),
        (-5i64..5).prop_map(Expr::int),
        Just(Expr::undef()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (prop::sample::select(vec![BinOp::Add, BinOp::Mul, BinOp::Mod]), inner.clone(), inner.clone())
                .prop_map(|(op, lhs, rhs)| Expr::binary(op, lhs, rhs)),
            (prop::sample::select(vec![BoolOp::And, BoolOp::Or]), prop::collection::vec(inner.clone(), 2..4))
                .prop_map(|(op, operands)| Expr::BoolOp { op, operands }),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(|(test, then, otherwise)| {
                Expr::Conditional { test: Box::new(test), then: Box::new(then), otherwise: Box::new(otherwise) }
            }),
            (name(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| Expr::call(Expr::Ident(f), args)),
            (name(), inner.clone())
                .prop_map(|(param, body)| Expr::Lambda { params: vec![param], body: Box::new(body) }),
            (name(), inner.clone(), inner.clone()).prop_map(|(param, body, arg)| Expr::call(
                Expr::Lambda { params: vec![param], body: Box::new(body) },
                vec![arg],
            )),
            inner.clone().prop_map(|arg| Expr::call(Expr::ident("defined"), vec![arg])),
            (inner.clone(), inner).prop_map(|(lhs, rhs)| Expr::Compare {
                op: CmpOp::IsNot,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
        ]
    })
}

fn generous() -> phi_simplify::SimplifyOptions {
    SimplifyOptionsBuilder::new().max_iterations(64).build()
}

proptest! {
    #[test]
    fn idempotence(e in expr()) {
        let env = Env::new().with("a", 2);
        let once = simplify_with(&e, &env, &generous());
        prop_assume!(once.is_ok());
        let once = once.unwrap();
        let twice = simplify_with(&once, &env, &generous()).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn capture_freedom(x in name(), y in name(), arg in opaque()) {
        prop_assume!(x != y);
        prop_assume!(arg.free_vars().contains(&x));

        // `(lambda y: (lambda x: x + y))(arg)`, where `arg` mentions `x`
        let inner = Expr::Lambda {
            params: vec![x.clone()],
            body: Box::new(Expr::binary(BinOp::Add, Expr::Ident(x.clone()), Expr::Ident(y.clone()))),
        };
        let outer = Expr::Lambda { params: vec![y], body: Box::new(inner) };
        let result = simplify(&Expr::call(outer, vec![arg.clone()]), &Env::new()).unwrap();

        let Expr::Lambda { params, body } = &result else {
            panic!("expected a function, got `{}`", result);
        };
        prop_assert_ne!(&params[0], &x);
        prop_assert!(!arg.names().contains(&params[0]));
        prop_assert_eq!(
            &**body,
            &Expr::binary(BinOp::Add, Expr::Ident(params[0].clone()), arg.clone())
        );
        prop_assert_eq!(result.free_vars(), arg.free_vars());
    }

    #[test]
    fn guard_true(payload in opaque()) {
        let env = Env::new();
        prop_assert_eq!(
            simplify(&Expr::guard(payload.clone(), Expr::bool(true)), &env).unwrap(),
            simplify(&payload, &env).unwrap()
        );
    }

    #[test]
    fn guard_false(payload in opaque()) {
        prop_assert_eq!(
            simplify(&Expr::guard(payload, Expr::bool(false)), &Env::new()).unwrap(),
            Expr::undef()
        );
    }

    #[test]
    fn repeated_guard(payload in opaque(), guard in opaque()) {
        let env = Env::new();
        let once = Expr::guard(payload, guard.clone());
        let twice = Expr::guard(once.clone(), guard);
        prop_assert_eq!(simplify(&twice, &env).unwrap(), simplify(&once, &env).unwrap());
    }

    #[test]
    fn definedness_test(payload in opaque(), guard in opaque()) {
        let env = Env::new();
        let test = Expr::Compare {
            op: CmpOp::IsNot,
            lhs: Box::new(Expr::guard(payload, guard.clone())),
            rhs: Box::new(Expr::undef()),
        };
        prop_assert_eq!(simplify(&test, &env).unwrap(), simplify(&guard, &env).unwrap());
    }

    #[test]
    fn boolean_identities(x in opaque(), left in any::<bool>()) {
        let env = Env::new();
        let expected = simplify(&x, &env).unwrap();
        let chain = |op, constant| {
            let operands = if left { vec![Expr::bool(constant), x.clone()] } else { vec![x.clone(), Expr::bool(constant)] };
            simplify(&Expr::BoolOp { op, operands }, &env).unwrap()
        };
        prop_assert_eq!(chain(BoolOp::And, true), expected.clone());
        prop_assert_eq!(chain(BoolOp::Or, false), expected);
        prop_assert_eq!(chain(BoolOp::And, false), Expr::bool(false));
        prop_assert_eq!(chain(BoolOp::Or, true), Expr::bool(true));
    }
}
