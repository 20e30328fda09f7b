//! The rewrite passes of the standard pipeline, in the order they run:
//!
//! 1. [`NameInliner`]
//! 2. [`BetaReducer`]
//! 3. [`DictMergeFolder`]
//! 4. [`DictLookupFolder`]
//! 5. [`ConditionalFolder`]
//! 6. [`BoolIdentityPruner`]
//! 7. [`BoolConstFolder`]
//! 8. the macro expander, if one is supplied
//! 9. [`GuardFolder`]
//! 10. [`DuplicateGuardRemover`]
//!
//! Inlining runs first so that every later pass sees the values it exposes, and the guard passes
//! run last so that they see fully reduced payloads and conditions.

pub mod beta;
pub mod boolean;
pub mod dedup;
pub mod dict;
pub mod guard;
pub mod inline;
pub mod substitute;

pub use beta::BetaReducer;
pub use boolean::{BoolConstFolder, BoolIdentityPruner, ConditionalFolder};
pub use dedup::DuplicateGuardRemover;
pub use dict::{DictLookupFolder, DictMergeFolder};
pub use guard::GuardFolder;
pub use inline::NameInliner;
