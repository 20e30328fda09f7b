use phi_parser::parser::error::Error as ParseError;
use std::io;

/// Utility enum to package errors that can occur while running a statement.
#[derive(Debug)]
pub enum Error {
    /// The statement could not be parsed, or its expression could not be simplified.
    Simplify(phi_simplify::Error),

    /// A `:` command that the REPL does not know.
    UnknownCommand(String),
}

impl Error {
    /// Report this error to stderr.
    pub fn report_to_stderr(&self, input: &str) -> io::Result<()> {
        match self {
            Self::Simplify(err) => err.report_to_stderr("input", input),
            Self::UnknownCommand(command) => {
                eprintln!("unknown command `{}` (try :steps, :env or :clear)", command);
                Ok(())
            },
        }
    }
}

impl From<phi_simplify::Error> for Error {
    fn from(err: phi_simplify::Error) -> Self {
        Self::Simplify(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Simplify(err.into())
    }
}

impl From<phi_error::Error> for Error {
    fn from(err: phi_error::Error) -> Self {
        Self::Simplify(err.into())
    }
}
