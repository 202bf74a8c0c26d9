//! Terminal front end for the termlab sandbox: a REPL, a one-shot runner,
//! and a state file that carries a session across runs.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use config::{Args, CliConfig, Settings};
pub use error::CliError;
pub use session::{Renderer, Session, run_commands, run_repl};

use std::io;

/// Run the front end with parsed arguments. Returns whether the run
/// succeeded: for `-c` lines, whether the last one did.
pub fn run(args: &Args) -> Result<bool, CliError> {
    let config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    let settings = Settings::resolve(args, config);
    logging::init(args.log_level.as_deref(), settings.log_level.as_deref())?;

    let renderer = Renderer {
        json: settings.json,
        show_hints: settings.show_hints,
    };
    let mut session = Session::open(settings.state_file);
    let mut out = io::stdout().lock();
    let mut err = io::stderr();

    if args.commands.is_empty() {
        run_repl(&mut session, renderer, io::stdin().lock(), &mut out, &mut err)?;
        Ok(true)
    } else {
        run_commands(&mut session, renderer, &args.commands, &mut out, &mut err)
    }
}
