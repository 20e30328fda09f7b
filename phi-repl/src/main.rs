mod error;
mod session;

use rustyline::{error::ReadlineError, DefaultEditor};
use session::Session;
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Executes a single line in the session, printing the output or the error.
fn execute_line(input: &str, session: &mut Session) {
    match session.execute(input) {
        Ok(lines) => lines.iter().for_each(|line| println!("{}", line)),
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr(input) {
                eprintln!("{}", io_err);
            }
        },
    }
}

/// Executes every statement of a script, one per line. Blank lines and lines starting with `#`
/// are skipped.
fn execute(input: String) {
    let mut session = Session::new();
    input
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        .for_each(|line| execute_line(line, &mut session));
}

fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        let mut file = BufReader::new(File::open(filename)?);
        let mut input = String::new();
        file.read_to_string(&mut input)?;

        execute(input);
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;

        execute(input);
    } else {
        // run the repl / interactive mode
        let mut rl = DefaultEditor::new().map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut session = Session::new();

        fn process_line(rl: &mut DefaultEditor, session: &mut Session) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            execute_line(&input, session);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut session) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }

    Ok(())
}
