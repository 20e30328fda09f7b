//! The rewrite steps the simplifier can report.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single rewrite applied by one of the passes.
///
/// The documentation of each variant shows the rule it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Step {
    /// `x` with `x = v` in the environment becomes `v`.
    InlineName(String),

    /// `lambda x: ...` becomes `lambda x_1: ...` so that a substituted `x` is not captured.
    AlphaRename {
        from: String,
        to: String,
    },

    /// `(lambda x: body)(a) = body[x := a]`
    BetaReduce,

    /// `{k1: a} | {k2: b} = {k1: a, k2: b}`
    DictMerge,

    /// `{k: v}[k] = v`
    DictLookup,

    /// `a if True else b = a`
    /// `a if False else b = b`
    ConditionalFold,

    /// `x and True = x`
    /// `x and False = False`
    /// `x or False = x`
    /// `x or True = True`
    BoolIdentity,

    /// `True and False = False`
    /// `True or False = True`
    BoolConstFold,

    /// `φ % True = φ`
    GuardTrue,

    /// `φ % False = UNDEF`
    GuardFalse,

    /// `φ % ψ = φ` or `UNDEF`, when `ψ` evaluates to `True` or `False`.
    GuardEvaluated,

    /// `(φ % ψ) is not UNDEF = ψ`
    DefinednessTest,

    /// `defined(φ % ψ) = ψ`
    DefinedGuard,

    /// `defined(φ) = True`
    DefinedTrivial,

    /// `lambda x: φ % ψ = (lambda x: φ) % ψ`, when `x` is not free in `ψ`.
    HoistLambdaGuard,

    /// `f(a % ψ) = f(a) % ψ`
    DistributeArgGuard,

    /// `(f % ψ)(a) = f(a) % ψ`
    DistributeCalleeGuard,

    /// `φ % (ψ % χ) = φ % ψ % χ`
    FlattenGuards,

    /// `φ % ψ % ψ = φ % ψ`
    DuplicateGuard,

    /// A rewrite made by a user-supplied pass, such as a macro expander. Holds the name of the
    /// pass.
    Custom(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InlineName(name) => write!(f, "inline the value of `{}`", name),
            Self::AlphaRename { from, to } => {
                write!(f, "rename parameter `{}` to `{}` to avoid capture", from, to)
            },
            Self::BetaReduce => write!(f, "apply a function to its arguments"),
            Self::DictMerge => write!(f, "merge two dictionaries"),
            Self::DictLookup => write!(f, "look up a key in a dictionary"),
            Self::ConditionalFold => write!(f, "pick a branch of a constant conditional"),
            Self::BoolIdentity => write!(f, "remove a boolean identity"),
            Self::BoolConstFold => write!(f, "evaluate a constant boolean operation"),
            Self::GuardTrue => write!(f, "drop a guard that always holds"),
            Self::GuardFalse => write!(f, "replace a guard that never holds with UNDEF"),
            Self::GuardEvaluated => write!(f, "evaluate a guard condition"),
            Self::DefinednessTest => write!(f, "replace a definedness test with its guard"),
            Self::DefinedGuard => write!(f, "replace `defined` with the guard of its argument"),
            Self::DefinedTrivial => write!(f, "`defined` of an unguarded expression is True"),
            Self::HoistLambdaGuard => write!(f, "hoist a guard out of a function body"),
            Self::DistributeArgGuard => write!(f, "move a guard out of a call argument"),
            Self::DistributeCalleeGuard => write!(f, "move a guard out of a called function"),
            Self::FlattenGuards => write!(f, "flatten a nested guard chain"),
            Self::DuplicateGuard => write!(f, "remove a repeated guard"),
            Self::Custom(name) => write!(f, "apply `{}`", name),
        }
    }
}
