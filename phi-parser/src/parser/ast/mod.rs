//! The abstract syntax tree produced by the parser. Every node records the region of the source
//! code it was parsed from.

pub mod binary;
pub mod call;
pub mod collection;
pub mod conditional;
pub mod expr;
pub mod index;
pub mod lambda;
pub mod literal;
pub mod paren;
pub mod stmt;
pub mod unary;

pub use binary::Binary;
pub use call::{Call, KeywordArg};
pub use collection::{Dict, DictEntry, List, Tuple};
pub use conditional::Conditional;
pub use expr::Expr;
pub use index::Index;
pub use lambda::Lambda;
pub use literal::{LitBool, LitFloat, LitInt, LitNone, LitStr, LitSym, Literal};
pub use paren::Paren;
pub use stmt::{Assign, Stmt};
pub use unary::Unary;
