//! Data models for the sandbox.
//!
//! Contains domain types for:
//! - [`Node`], [`NodeMeta`], [`DirEntry`] - Virtual filesystem representation
//! - [`VirtualPath`] - Segment-based absolute paths

mod filesystem;
mod path;

pub use filesystem::{DirEntry, Node, NodeMeta};
pub use path::VirtualPath;
