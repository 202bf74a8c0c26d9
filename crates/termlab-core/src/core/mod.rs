//! Core logic of the sandbox shell.
//!
//! This module provides:
//! - [`VirtualFs`] virtual filesystem, cursor and history
//! - [`Command`] parsing and [`execute_line`] execution
//! - [`autocomplete`] for tab completion

mod autocomplete;
mod commands;
pub mod durable;
pub mod error;
mod filesystem;
pub mod parser;

pub use autocomplete::{AutocompleteResult, autocomplete};
pub use commands::{Action, Command, CommandResult, PathArg, execute_command, execute_line};
pub use filesystem::{VirtualFs, WriteMode};
pub use parser::parse_input;
