use crate::error::Error;
use indexmap::IndexMap;
use phi_parser::parser::{ast::stmt::Stmt, Parser};
use phi_simplify::{expr::Expr, Env, Simplifier, Value};
use tracing::debug;

/// The state of the REPL: the names bound so far, and whether to show rewrite steps.
#[derive(Debug, Default)]
pub struct Session {
    bindings: IndexMap<String, Value>,
    show_steps: bool,
    simplifier: Simplifier,
}

impl Session {
    /// Creates a session with no bindings, running the standard pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of the current bindings.
    fn env(&self) -> Env {
        Env::new().with_scope(self.bindings.clone())
    }

    /// Simplifies the expression against the current bindings, returning the lines describing
    /// the steps taken (if enabled) along with the result.
    fn simplify(&self, expr: &Expr, input: &str) -> Result<(Expr, Vec<String>), Error> {
        let (result, steps) = self
            .simplifier
            .simplify_with_steps(expr, &self.env())
            .map_err(|mut err| {
                if err.spans.is_empty() {
                    err.spans.push(0..input.len());
                }
                err
            })?;

        let lines = if self.show_steps {
            steps
                .iter()
                .enumerate()
                .map(|(i, step)| format!("  {}. {}", i + 1, step))
                .collect()
        } else {
            Vec::new()
        };
        Ok((result, lines))
    }

    /// Runs a REPL command, such as `:env`.
    fn command(&mut self, command: &str) -> Result<Vec<String>, Error> {
        match command {
            "steps" => {
                self.show_steps = !self.show_steps;
                Ok(vec![format!("steps: {}", if self.show_steps { "on" } else { "off" })])
            },
            "env" => Ok(self
                .bindings
                .iter()
                .map(|(name, value)| format!("{} = {}", name, value))
                .collect()),
            "clear" => {
                self.bindings.clear();
                Ok(Vec::new())
            },
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }

    /// Executes one line of input, returning the lines to print.
    pub fn execute(&mut self, input: &str) -> Result<Vec<String>, Error> {
        let line = input.trim();
        if let Some(command) = line.strip_prefix(':') {
            return self.command(command.trim());
        }

        match Parser::new(input).try_parse_full::<Stmt>()? {
            Stmt::Assign(assign) => {
                let name = assign.target.name;
                let expr = Expr::try_from(assign.value)?;
                let (result, lines) = self.simplify(&expr, input)?;
                debug!(%name, value = %result, "bind");

                // literal results are stored as values, so that they can be used in guard conditions
                let value = Value::from_literal_expr(&result).unwrap_or(Value::Expr(result));
                self.bindings.insert(name, value);
                Ok(lines)
            },
            Stmt::Expr(expr) => {
                let expr = Expr::try_from(expr)?;
                let (result, mut lines) = self.simplify(&expr, input)?;
                lines.push(result.to_string());
                Ok(lines)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn run(session: &mut Session, input: &str) -> Vec<String> {
        session.execute(input).unwrap()
    }

    #[test]
    fn expressions_are_printed() {
        let mut session = Session::new();
        assert_eq!(run(&mut session, "(lambda x: x + 1)(3)"), vec!["3 + 1"]);
    }

    #[test]
    fn assignments_bind_names() {
        let mut session = Session::new();
        assert!(run(&mut session, "n = 3").is_empty());
        assert!(run(&mut session, "inc = lambda x: x + 1").is_empty());
        assert_eq!(run(&mut session, "inc(n)"), vec!["3 + 1"]);
        assert_eq!(run(&mut session, "phi % (n > 2)"), vec!["phi"]);
        assert_eq!(run(&mut session, ":env"), vec!["n = 3", "inc = lambda x: x + 1"]);
    }

    #[test]
    fn later_bindings_see_earlier_ones() {
        let mut session = Session::new();
        run(&mut session, "a = 4");
        run(&mut session, "b = (a if True else 0) and True");
        assert_eq!(run(&mut session, "b"), vec!["4"]);
    }

    #[test]
    fn steps_toggle() {
        let mut session = Session::new();
        assert_eq!(run(&mut session, ":steps"), vec!["steps: on"]);
        assert_eq!(run(&mut session, "True and False"), vec![
            "  1. remove a boolean identity",
            "False",
        ]);
        assert_eq!(run(&mut session, ":steps"), vec!["steps: off"]);
    }

    #[test]
    fn clear() {
        let mut session = Session::new();
        run(&mut session, "x = 1");
        run(&mut session, ":clear");
        assert_eq!(run(&mut session, "x"), vec!["x"]);
    }

    #[test]
    fn errors() {
        let mut session = Session::new();
        assert!(matches!(session.execute(":bogus"), Err(Error::UnknownCommand(_))));
        assert!(matches!(session.execute("1 +"), Err(Error::Simplify(_))));
        assert!(matches!(session.execute("lambda x, x: x"), Err(Error::Simplify(_))));
    }
}
