//! Durable form of a session.
//!
//! A versioned JSON envelope holding the whole tree, the cursor and the
//! history:
//!
//! ```json
//! { "version": 1, "root": { "type": "directory", ... }, "cwd": ["home", "user"], "history": ["ls"] }
//! ```
//!
//! Decoding validates everything the tree invariants depend on, so a decoded
//! session is indistinguishable from one built by commands.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::filesystem::VirtualFs;
use crate::config::{DURABLE_FORMAT_VERSION, MAX_TREE_DEPTH};
use crate::models::{Node, VirtualPath};

/// Why a durable form was rejected.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed durable form: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported durable form version {found} (expected {DURABLE_FORMAT_VERSION})")]
    UnsupportedVersion { found: u32 },

    #[error("root node is not a directory")]
    RootNotDirectory,

    #[error("invalid entry name {name:?}")]
    InvalidName { name: String },

    #[error("tree is deeper than {MAX_TREE_DEPTH} levels")]
    TooDeep,

    #[error("working directory {cwd} is not an existing directory")]
    InvalidCwd { cwd: VirtualPath },
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    root: &'a Node,
    cwd: &'a VirtualPath,
    history: &'a [String],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    root: Node,
    cwd: VirtualPath,
    #[serde(default)]
    history: Vec<String>,
}

pub(crate) fn encode(fs: &VirtualFs) -> String {
    let envelope = EnvelopeRef {
        version: DURABLE_FORMAT_VERSION,
        root: fs.root(),
        cwd: fs.cwd(),
        history: fs.history(),
    };
    // String-keyed maps and plain structs always serialize.
    serde_json::to_string(&envelope).unwrap_or_else(|err| {
        warn!(error = %err, "failed to encode durable form");
        String::new()
    })
}

pub(crate) fn decode(input: &str) -> Result<VirtualFs, DecodeError> {
    let envelope: Envelope = serde_json::from_str(input)?;

    if envelope.version != DURABLE_FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            found: envelope.version,
        });
    }

    let children = envelope
        .root
        .children()
        .ok_or(DecodeError::RootNotDirectory)?;
    validate_children(children, 1)?;

    let fs = VirtualFs::from_parts(envelope.root, envelope.cwd, envelope.history);
    if !fs.lookup(fs.cwd()).is_some_and(Node::is_directory) {
        return Err(DecodeError::InvalidCwd {
            cwd: fs.cwd().clone(),
        });
    }
    Ok(fs)
}

fn validate_children(children: &BTreeMap<String, Node>, depth: usize) -> Result<(), DecodeError> {
    if !children.is_empty() && depth > MAX_TREE_DEPTH {
        return Err(DecodeError::TooDeep);
    }
    for (name, node) in children {
        if !is_valid_name(name) {
            return Err(DecodeError::InvalidName { name: name.clone() });
        }
        if let Some(grandchildren) = node.children() {
            validate_children(grandchildren, depth + 1)?;
        }
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/')
}
