//! Command-line parser with history expansion and output redirection.
//!
//! Supports:
//! - History expansion: `!!` (last line), `!n` (n-th line), `!-n` (n-th from last)
//! - Output redirection: `> file` (overwrite), `>> file` (append)

mod expand;
mod lexer;

pub use lexer::{Lexer, Token};

use std::fmt;

use expand::expand_tokens;
use thiserror::Error;

use crate::core::filesystem::WriteMode;

// =============================================================================
// Parse Error
// =============================================================================

/// Structured error type for parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `echo hi >` with nothing after the operator
    #[error("syntax error near unexpected token `newline'")]
    MissingRedirectTarget,

    /// `!7` when the history holds fewer lines
    #[error("{reference}: event not found")]
    EventNotFound { reference: String },

    /// Expanded line would exceed `MAX_EXPANDED_LINE`
    #[error("history expansion exceeds {limit} bytes")]
    ExpansionTooLong { limit: usize },
}

// =============================================================================
// Line Representation
// =============================================================================

/// Output redirection attached to a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub mode: WriteMode,
    pub target: String,
}

/// A parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLine {
    pub name: String,
    pub args: Vec<String>,
    /// Last redirection on the line, if any
    pub redirect: Option<Redirect>,
    /// True if a history reference was expanded
    pub expanded: bool,
    /// Syntax error (e.g., redirection without a target)
    pub error: Option<ParseError>,
}

impl ParsedLine {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.error.is_none()
    }
}

/// Canonical text of the line, used to record expanded lines in history.
impl fmt::Display for ParsedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(redirect) = &self.redirect {
            let op = match redirect.mode {
                WriteMode::Overwrite => ">",
                WriteMode::Append => ">>",
            };
            write!(f, " {} {}", op, redirect.target)?;
        }
        Ok(())
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Parse input with history expansion, then split off any redirection.
pub fn parse_input(input: &str, history: &[String]) -> ParsedLine {
    let tokens = Lexer::new(input).tokenize();

    match expand_tokens(tokens, history) {
        Ok((tokens, expanded)) => ParsedLine {
            expanded,
            ..parse_line(tokens)
        },
        Err(error) => ParsedLine {
            error: Some(error),
            ..ParsedLine::default()
        },
    }
}

fn parse_line(tokens: Vec<Token>) -> ParsedLine {
    let mut words = Vec::new();
    let mut redirect = None;
    let mut error = None;
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match token {
            Token::Word(w) => words.push(w),
            Token::Redirect(mode) => match tokens.next() {
                Some(Token::Word(target)) => redirect = Some(Redirect { mode, target }),
                _ => {
                    error = Some(ParseError::MissingRedirectTarget);
                    break;
                }
            },
            // Already expanded
            Token::HistoryLast | Token::HistoryIndex(_) => {}
        }
    }

    let mut words = words.into_iter();
    ParsedLine {
        name: words.next().unwrap_or_default(),
        args: words.collect(),
        redirect,
        expanded: false,
        error,
    }
}

// =============================================================================
// Tests
// =============================================================================
