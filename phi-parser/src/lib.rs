//! Tokenizer and parser for the phi expression language: a small language of literals, lambdas,
//! calls, conditionals, and arithmetic, boolean, comparison and dictionary operators.
//!
//! ```
//! use phi_parser::parser::{ast::Expr, Parser};
//!
//! let mut parser = Parser::new("(lambda x: x + 1)(3)");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.to_string(), "(lambda x: x + 1)(3)");
//! ```

pub mod parser;
pub mod tokenizer;
