//! A shell session bound to an optional state file, and the terminal
//! renderer that stands in for the display surface.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use termlab_core::{Action, CommandResult, VirtualFs, execute_line};
use tracing::{debug, warn};

use crate::error::CliError;

/// ANSI sequence that clears the screen and homes the cursor.
pub const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[H";

/// Line that ends the REPL instead of running as a command.
const EXIT_COMMAND: &str = "exit";

pub struct Session {
    fs: VirtualFs,
    state_file: Option<PathBuf>,
}

impl Session {
    /// Start from the state file if it holds a usable session, else fresh.
    pub fn open(state_file: Option<PathBuf>) -> Self {
        let fs = match &state_file {
            Some(path) => match fs::read_to_string(path) {
                Ok(text) => VirtualFs::from_durable_form(&text),
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "no saved session, starting fresh");
                    VirtualFs::new()
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "cannot read saved session, starting fresh");
                    VirtualFs::new()
                }
            },
            None => VirtualFs::new(),
        };
        Self { fs, state_file }
    }

    pub fn fs(&self) -> &VirtualFs {
        &self.fs
    }

    /// Execute one line, then persist the session.
    pub fn run(&mut self, line: &str) -> Result<CommandResult, CliError> {
        let result = execute_line(&mut self.fs, line);
        self.save()?;
        Ok(result)
    }

    pub fn save(&self) -> Result<(), CliError> {
        let Some(path) = &self.state_file else {
            return Ok(());
        };
        fs::write(path, self.fs.to_durable_form()).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })
    }
}

/// Writes results to a terminal: output on stdout, hints on stderr.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    pub json: bool,
    pub show_hints: bool,
}

impl Renderer {
    pub fn render<W: Write, E: Write>(&self, result: &CommandResult, out: &mut W, err: &mut E) -> Result<(), CliError> {
        if self.json {
            let json = serde_json::to_string(result).map_err(io::Error::other)?;
            writeln!(out, "{}", json)?;
            return Ok(());
        }

        match &result.action {
            Action::ClearScreen => write!(out, "{}", CLEAR_SEQUENCE)?,
            Action::Print(text) if text.is_empty() => {}
            Action::Print(text) if text.ends_with('\n') => write!(out, "{}", text)?,
            Action::Print(text) => writeln!(out, "{}", text)?,
        }

        if self.show_hints {
            if let Some(hint) = &result.hint {
                writeln!(err, "hint: {}", hint)?;
            }
        }
        Ok(())
    }
}

/// Run each line in order. Returns whether the last one succeeded.
pub fn run_commands<W: Write, E: Write>(
    session: &mut Session,
    renderer: Renderer,
    lines: &[String],
    out: &mut W,
    err: &mut E,
) -> Result<bool, CliError> {
    let mut success = true;
    for line in lines {
        let result = session.run(line)?;
        renderer.render(&result, out, err)?;
        success = result.success;
    }
    Ok(success)
}

/// Read-eval-print loop until EOF or `exit`.
///
/// Bytes that are not UTF-8 are replaced rather than ending the loop.
pub fn run_repl<R: BufRead, W: Write, E: Write>(
    session: &mut Session,
    renderer: Renderer,
    mut input: R,
    out: &mut W,
    err: &mut E,
) -> Result<(), CliError> {
    let mut buf = Vec::new();
    loop {
        if !renderer.json {
            write!(out, "{}", session.fs().prompt())?;
            out.flush()?;
        }

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            if !renderer.json {
                writeln!(out)?;
            }
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        if line.trim() == EXIT_COMMAND {
            return Ok(());
        }

        let result = session.run(line.trim_end_matches(['\n', '\r']))?;
        renderer.render(&result, out, err)?;
    }
}
