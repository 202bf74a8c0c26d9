//! Command parsing and execution.
//!
//! This module provides:
//! - `Command` enum for parsed shell commands
//! - `CommandResult` for command execution results
//! - `execute_line` for running one line of input end to end
//!
//! # Architecture
//!
//! A line is parsed (history expansion, redirection) by [`crate::core::parser`],
//! the words are turned into the closed `Command` enum by [`Command::parse`],
//! then run against the filesystem by `execute_command`. Every failure along
//! the way becomes a failed `CommandResult`; nothing escapes `execute_line`.

mod execute;
mod result;

pub use execute::execute_command;
pub use result::{Action, CommandResult};

use std::fmt;

use tracing::debug;

use crate::core::VirtualFs;
use crate::core::error::CommandError;
use crate::core::parser::{Redirect, parse_input};

// =============================================================================
// Path Argument Type
// =============================================================================

/// A path argument passed to a command (e.g., `cd foo`, `cat bar.md`).
///
/// Stored as typed; resolution and validation happen during execution.
/// Error messages echo this text rather than the resolved path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathArg(String);

impl PathArg {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PathArg {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for PathArg {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// Command Enum
// =============================================================================

/// Parsed shell command
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Pwd,
    /// List directory contents (`-l` long, `-a` dotfiles)
    Ls {
        paths: Vec<PathArg>,
        long: bool,
        all: bool,
    },
    /// `None` means home
    Cd(Option<PathArg>),
    Mkdir {
        paths: Vec<PathArg>,
        parents: bool,
    },
    Touch(Vec<PathArg>),
    Rm {
        paths: Vec<PathArg>,
        recursive: bool,
        force: bool,
    },
    Cat(Vec<PathArg>),
    Echo {
        text: String,
        redirect: Option<Redirect>,
    },
    Cp {
        sources: Vec<PathArg>,
        dst: PathArg,
    },
    Mv {
        sources: Vec<PathArg>,
        dst: PathArg,
    },
    Clear,
    Help,
    History,
    Whoami,
    Date,
}

impl Command {
    /// Get all available command names for help and autocomplete.
    pub fn names() -> &'static [&'static str] {
        &[
            "cat", "cd", "clear", "cp", "date", "echo", "help", "history", "ls", "mkdir", "mv",
            "pwd", "rm", "touch", "whoami",
        ]
    }

    /// Parse command from name, arguments and an optional redirection.
    ///
    /// Flags may be combined (`-la`) and unknown flags are ignored. Only
    /// `echo` accepts a redirection.
    pub fn parse(name: &str, args: &[String], redirect: Option<Redirect>) -> Result<Self, CommandError> {
        let (flags, operands) = split_flags(args);
        let has = |flag: char| flags.contains(&flag);
        let paths = || operands.iter().map(|s| PathArg::new(s.as_str())).collect::<Vec<_>>();

        let cmd = match name {
            "pwd" => Self::Pwd,
            "ls" => Self::Ls {
                paths: paths(),
                long: has('l'),
                all: has('a'),
            },
            "cd" => Self::Cd(operands.first().map(|s| PathArg::new(s.as_str()))),
            "mkdir" => Self::Mkdir {
                paths: required(paths(), "mkdir", "mkdir [-p] <dir>...")?,
                parents: has('p'),
            },
            "touch" => Self::Touch(required(paths(), "touch", "touch <file>...")?),
            "rm" => Self::Rm {
                paths: required(paths(), "rm", "rm [-r] [-f] <path>...")?,
                recursive: has('r') || has('R'),
                force: has('f'),
            },
            "cat" => Self::Cat(required(paths(), "cat", "cat <file>...")?),
            "echo" => {
                return Ok(Self::Echo {
                    text: strip_quotes(&args.join(" ")).to_string(),
                    redirect,
                });
            }
            "cp" => {
                let (sources, dst) = source_and_dest(paths(), "cp", "cp [-r] <src>... <dst>")?;
                Self::Cp { sources, dst }
            }
            "mv" => {
                let (sources, dst) = source_and_dest(paths(), "mv", "mv <src>... <dst>")?;
                Self::Mv { sources, dst }
            }
            "clear" => Self::Clear,
            "help" => Self::Help,
            "history" => Self::History,
            "whoami" => Self::Whoami,
            "date" => Self::Date,
            _ => {
                return Err(CommandError::UnknownCommand {
                    name: name.to_string(),
                });
            }
        };

        if redirect.is_some() {
            return Err(CommandError::UnsupportedRedirect {
                command: cmd.name(),
            });
        }
        Ok(cmd)
    }

    /// Name the command was invoked with.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pwd => "pwd",
            Self::Ls { .. } => "ls",
            Self::Cd(_) => "cd",
            Self::Mkdir { .. } => "mkdir",
            Self::Touch(_) => "touch",
            Self::Rm { .. } => "rm",
            Self::Cat(_) => "cat",
            Self::Echo { .. } => "echo",
            Self::Cp { .. } => "cp",
            Self::Mv { .. } => "mv",
            Self::Clear => "clear",
            Self::Help => "help",
            Self::History => "history",
            Self::Whoami => "whoami",
            Self::Date => "date",
        }
    }
}

/// Split `-x` style flag characters from operands. `--` ends flag parsing;
/// a lone `-` is an operand.
fn split_flags(args: &[String]) -> (Vec<char>, Vec<String>) {
    let mut flags = Vec::new();
    let mut operands = Vec::new();
    let mut options_done = false;

    for arg in args {
        if options_done {
            operands.push(arg.clone());
        } else if arg == "--" {
            options_done = true;
        } else if let Some(chars) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
            flags.extend(chars.chars());
        } else {
            operands.push(arg.clone());
        }
    }

    (flags, operands)
}

fn required(
    paths: Vec<PathArg>,
    command: &'static str,
    usage: &'static str,
) -> Result<Vec<PathArg>, CommandError> {
    if paths.is_empty() {
        return Err(CommandError::MissingOperand { command, usage });
    }
    Ok(paths)
}

/// `<src>... <dst>`: the last operand is the destination.
fn source_and_dest(
    mut paths: Vec<PathArg>,
    command: &'static str,
    usage: &'static str,
) -> Result<(Vec<PathArg>, PathArg), CommandError> {
    if paths.len() < 2 {
        return Err(CommandError::MissingOperand { command, usage });
    }
    let dst = paths.pop().ok_or(CommandError::MissingOperand { command, usage })?;
    Ok((paths, dst))
}

/// Remove one matching pair of surrounding `"` or `'`.
fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

// =============================================================================
// Line Execution
// =============================================================================

/// Run one line of input against the filesystem.
///
/// Non-blank lines are recorded in history (after history expansion) before
/// they run, so `history` lists itself. Never fails: every error becomes a
/// result with `success: false`.
pub fn execute_line(fs: &mut VirtualFs, input: &str) -> CommandResult {
    let parsed = parse_input(input, fs.history());

    if let Some(err) = parsed.error {
        if !input.trim().is_empty() {
            fs.record(input.trim());
        }
        return CommandError::from(err).into();
    }
    if parsed.is_empty() {
        return CommandResult::empty();
    }

    let line = if parsed.expanded {
        parsed.to_string()
    } else {
        input.trim().to_string()
    };
    fs.record(line);

    debug!(command = %parsed.name, args = ?parsed.args, "dispatching command");
    match Command::parse(&parsed.name, &parsed.args, parsed.redirect) {
        Ok(cmd) => execute_command(cmd, fs),
        Err(err) => err.into(),
    }
}

// =============================================================================
// Tests
// =============================================================================
