//! A fixed-point simplifier for phi expressions.
//!
//! Phi expressions are small functional programs: `lambda` functions, calls, arithmetic,
//! comparisons, conditionals, boolean operators, tuples, lists and dictionaries. They are written
//! by hand or produced by other tools, and tend to contain a lot of administrative structure,
//! such as functions applied to literal arguments, lookups into dictionary literals, or
//! conditions that are already known to hold. This crate rewrites an expression into a smaller
//! one that means the same thing.
//!
//! # Expressions
//!
//! The [`expr::Expr`] tree is converted from the AST produced by [`phi_parser`] (see the
//! [`expr`] module), or built directly. Every pass of the simplifier consumes and returns this
//! tree.
//!
//! # Guards
//!
//! Expressions may carry presuppositions, written with the `%` operator: `φ % ψ` means "`φ`,
//! provided that `ψ` holds", and evaluates to the sentinel `UNDEF` otherwise. The simplifier
//! understands this convention: it folds guards whose condition is known, recovers the condition
//! from `defined(φ % ψ)` and `(φ % ψ) is not UNDEF`, moves guards outwards, out of function
//! bodies and call arguments, and removes guards that are already in force.
//!
//! # Simplification
//!
//! Simplification is done by a [`Pipeline`] of [`pass::Pass`]es. Each pass traverses the tree
//! once, bottom-up, and applies one kind of rewrite rule (see the [`passes`] module). The
//! pipeline runs every pass in order, and repeats this until a round leaves the tree unchanged.
//! If that does not happen within [`SimplifyOptions::max_iterations`] rounds, simplification
//! fails with a [`NonTermination`](error::kind::NonTermination) error.
//!
//! Names in the expression are resolved against an [`Env`]. Names bound to literals are
//! inlined, and the same environment is used to evaluate guard conditions.
//!
//! ```
//! use phi_simplify::{simplify_str, Env};
//!
//! let env = Env::new();
//! assert_eq!(simplify_str("(lambda y: (lambda x: x + y))(x)", &env).unwrap(), "lambda x_1: x_1 + x");
//! assert_eq!(simplify_str("({'a': 1} | {'b': 2})['a']", &env).unwrap(), "1");
//! assert_eq!(simplify_str("defined(phi % psi)", &env).unwrap(), "psi");
//! assert_eq!(simplify_str("(A % G1) % (G2 % G1)", &env).unwrap(), "A % G1 % G2");
//! ```
//!
//! Every rewrite applied can be recorded as a [`Step`] with [`simplify_with_steps`], or with any
//! other [`StepCollector`] passed to [`Pipeline::run`].

pub mod env;
pub mod error;
pub mod eval;
pub mod expr;
pub mod pass;
pub mod passes;
pub mod pipeline;
pub mod simplify;
pub mod step;
pub mod step_collector;

pub use env::{Env, HostObject, Value};
pub use error::Error;
pub use pipeline::{Pipeline, SimplifyOptions, SimplifyOptionsBuilder};
pub use simplify::{simplify, simplify_str, simplify_with, simplify_with_steps, Simplifier};
pub use step::Step;
pub use step_collector::StepCollector;
