pub mod kind;

use phi_parser::parser::error::Error as ParseError;
use std::io;

/// An error that can occur when simplifying source code with [`crate::simplify_str`].
#[derive(Debug)]
pub enum Error {
    /// The source code could not be parsed.
    Parse(ParseError),

    /// The expression is malformed, or the simplifier did not reach a fixed point.
    Simplify(phi_error::Error),
}

impl Error {
    /// Returns the concrete error kind if it is of type `K`.
    pub fn downcast_ref<K: phi_error::ErrorKind + 'static>(&self) -> Option<&K> {
        match self {
            Self::Parse(err) => err.kind.as_any().downcast_ref::<K>(),
            Self::Simplify(err) => err.downcast_ref::<K>(),
        }
    }

    /// Report this error to stderr.
    ///
    /// The `ariadne` crate's [`Report`] type does not have a `Display` implementation, so we can
    /// only use its `eprint` method to print to stderr.
    ///
    /// [`Report`]: https://docs.rs/ariadne/latest/ariadne/struct.Report.html
    pub fn report_to_stderr(&self, src_id: &str, input: &str) -> io::Result<()> {
        match self {
            Self::Parse(err) => err.report_to_stderr(src_id, input),
            Self::Simplify(err) => err.report_to_stderr(src_id, input),
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl From<phi_error::Error> for Error {
    fn from(err: phi_error::Error) -> Self {
        Self::Simplify(err)
    }
}
