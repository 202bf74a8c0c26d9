//! An in-memory filesystem and a small POSIX-like shell for practicing
//! navigation and file manipulation safely.
//!
//! ```
//! use termlab_core::{VirtualFs, execute_line};
//!
//! let mut fs = VirtualFs::new();
//! execute_line(&mut fs, "mkdir my-project");
//! execute_line(&mut fs, "cd my-project");
//! execute_line(&mut fs, "touch index.html");
//! assert_eq!(execute_line(&mut fs, "ls").text(), "index.html");
//! ```
//!
//! A session is fully described by its [`VirtualFs`]; it can be saved with
//! [`VirtualFs::to_durable_form`] and restored with
//! [`VirtualFs::from_durable_form`].

pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::core::error::{CommandError, FsError};
pub use crate::core::{
    Action, AutocompleteResult, Command, CommandResult, VirtualFs, WriteMode, autocomplete,
    execute_line,
};
pub use models::{DirEntry, Node, NodeMeta, VirtualPath};
