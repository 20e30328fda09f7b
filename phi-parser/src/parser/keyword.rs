use crate::parser::{error::{kind, Error}, Parser, Parse};
use std::ops::Range;

/// Generates a unit struct for each keyword, as well as a simple [`Parse`] implementation for each
/// keyword. This enables the parser to use and request keywords as a type, which is much more
/// ergonomic than using a string.
macro_rules! keywords {
    ($(($name:ident, $lexeme:tt))*) => {
        $(
            #[derive(Clone, Debug, PartialEq)]
            pub struct $name {
                pub span: Range<usize>,
            }

            impl $name {
                /// The source text of this keyword.
                pub const LEXEME: &'static str = stringify!($lexeme);
            }

            impl Parse for $name {
                fn parse(input: &mut Parser) -> Result<Self, Error> {
                    let token = input.next_token()?;

                    if token.is_keyword(Self::LEXEME) {
                        Ok(Self { span: token.span })
                    } else {
                        Err(Error::new(vec![token.span], kind::ExpectedKeyword {
                            keyword: Self::LEXEME,
                        }))
                    }
                }
            }
        )*
    };
}

keywords!(
    (Lambda, lambda)
    (If, if)
    (Else, else)
    (And, and)
    (Or, or)
    (Not, not)
    (Is, is)
    (In, in)
);
