//! Error types for the sandbox.
//!
//! - [`FsError`] - failures of filesystem tree operations
//! - [`CommandError`] - failures of a parsed or executing shell command
//!
//! Neither ever escapes [`crate::execute_line`]; both are turned into a
//! failed [`crate::CommandResult`] with a message and an optional hint.

use thiserror::Error;

use crate::core::parser::ParseError;
use crate::models::VirtualPath;

/// Filesystem tree errors.
///
/// Every variant carries the absolute path it refers to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("{path}: No such file or directory")]
    NotFound { path: VirtualPath },

    #[error("{path}: Not a directory")]
    NotADirectory { path: VirtualPath },

    #[error("{path}: Is a directory")]
    IsADirectory { path: VirtualPath },

    #[error("{path}: File exists")]
    AlreadyExists { path: VirtualPath },

    /// The root cannot be removed or moved.
    #[error("{path}: Operation not permitted on the root directory")]
    RootDirectory { path: VirtualPath },

    #[error("'{src}' and '{dst}' are the same file")]
    SameFile { src: VirtualPath, dst: VirtualPath },

    #[error("cannot move '{src}' to a subdirectory of itself, '{dst}'")]
    IntoItself { src: VirtualPath, dst: VirtualPath },

    /// The tree would grow deeper than [`crate::config::MAX_TREE_DEPTH`].
    #[error("{path}: File name too long")]
    TooDeep { path: VirtualPath },
}

impl FsError {
    /// Path the error refers to (the source for two-path errors).
    pub fn path(&self) -> &VirtualPath {
        match self {
            Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::IsADirectory { path }
            | Self::AlreadyExists { path }
            | Self::RootDirectory { path }
            | Self::TooDeep { path } => path,
            Self::SameFile { src, .. } | Self::IntoItself { src, .. } => src,
        }
    }

    /// Short reason phrase, without the path.
    ///
    /// Commands pair this with the operand the user typed, so messages echo
    /// `cat: notes.txt: ...` rather than the resolved absolute path.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "No such file or directory",
            Self::NotADirectory { .. } => "Not a directory",
            Self::IsADirectory { .. } => "Is a directory",
            Self::AlreadyExists { .. } => "File exists",
            Self::RootDirectory { .. } => "Operation not permitted on the root directory",
            Self::SameFile { .. } => "Source and destination are the same file",
            Self::IntoItself { .. } => "Cannot move a directory into itself",
            Self::TooDeep { .. } => "File name too long",
        }
    }
}

/// Shell command errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{command}: missing operand")]
    MissingOperand {
        command: &'static str,
        usage: &'static str,
    },

    #[error("{name}: command not found")]
    UnknownCommand { name: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// `>`/`>>` on a command other than `echo`.
    #[error("{command}: output redirection is only supported by echo")]
    UnsupportedRedirect { command: &'static str },

    #[error("{command}: {operand}: {}", .source.reason())]
    Fs {
        command: &'static str,
        operand: String,
        #[source]
        source: FsError,
    },
}

impl CommandError {
    /// Attach the command name and typed operand to a filesystem error.
    pub fn fs(command: &'static str, operand: impl Into<String>, source: FsError) -> Self {
        Self::Fs {
            command,
            operand: operand.into(),
            source,
        }
    }

    /// Advisory guidance shown next to the error message.
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingOperand { usage, .. } => Some(format!("Usage: {}", usage)),
            Self::UnknownCommand { .. } => {
                Some("Type 'help' to see the available commands.".to_string())
            }
            Self::Parse(ParseError::MissingRedirectTarget) => {
                Some("Usage: echo <text> > <file>".to_string())
            }
            Self::Parse(ParseError::EventNotFound { .. } | ParseError::ExpansionTooLong { .. }) => {
                Some("Type 'history' to see the numbered lines.".to_string())
            }
            Self::UnsupportedRedirect { .. } => {
                Some("Try: echo <text> > <file>".to_string())
            }
            Self::Fs {
                command, source, ..
            } => match (source, *command) {
                (FsError::NotFound { .. }, "cd") | (FsError::NotADirectory { .. }, "cd") => {
                    Some("Use 'ls' to see the directories you can enter.".to_string())
                }
                (FsError::NotFound { .. }, _) => {
                    Some("Use 'ls' to check the name and location.".to_string())
                }
                (FsError::IsADirectory { .. }, "rm") => {
                    Some("Use 'rm -r' to remove a directory and its contents.".to_string())
                }
                (FsError::IsADirectory { .. }, "cat") => {
                    Some("Use 'ls' to list a directory's contents.".to_string())
                }
                (FsError::AlreadyExists { .. }, "mkdir") => {
                    Some("Choose a different name, or 'cd' into the existing one.".to_string())
                }
                _ => None,
            },
        }
    }
}
