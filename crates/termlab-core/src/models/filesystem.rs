use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Node Metadata
// =============================================================================

/// Timestamps carried by every node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMeta {
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl NodeMeta {
    /// Metadata for a node created right now.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            modified_at: now,
        }
    }

    /// Bump `modified_at` to the current time.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

// =============================================================================
// Node
// =============================================================================

/// An entry in the virtual tree.
///
/// A directory exclusively owns its children, keyed by name; the key is the
/// child's name, so sibling names are unique by construction. Children are
/// kept in a `BTreeMap`, which iterates in ordinal (case-sensitive) name
/// order, the order every listing uses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Directory {
        children: BTreeMap<String, Node>,
        meta: NodeMeta,
    },
    File {
        content: String,
        meta: NodeMeta,
    },
}

impl Node {
    /// Create an empty directory.
    pub fn directory() -> Self {
        Node::Directory {
            children: BTreeMap::new(),
            meta: NodeMeta::now(),
        }
    }

    /// Create a file holding `content`.
    pub fn file(content: impl Into<String>) -> Self {
        Node::File {
            content: content.into(),
            meta: NodeMeta::now(),
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File { .. })
    }

    pub fn meta(&self) -> &NodeMeta {
        match self {
            Node::Directory { meta, .. } | Node::File { meta, .. } => meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut NodeMeta {
        match self {
            Node::Directory { meta, .. } | Node::File { meta, .. } => meta,
        }
    }

    /// File content (files only).
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::File { content, .. } => Some(content),
            Node::Directory { .. } => None,
        }
    }

    /// Child map (directories only).
    pub fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Directory { children, .. } => Some(children),
            Node::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match self {
            Node::Directory { children, .. } => Some(children),
            Node::File { .. } => None,
        }
    }

    /// Give this node and every descendant the same timestamps.
    pub fn restamp(&mut self, meta: NodeMeta) {
        *self.meta_mut() = meta;
        if let Some(children) = self.children_mut() {
            for child in children.values_mut() {
                child.restamp(meta);
            }
        }
    }

    /// Byte length of the content; zero for directories.
    pub fn size(&self) -> u64 {
        self.content().map_or(0, |c| c.len() as u64)
    }

    /// Number of levels below this node (0 for a file or an empty directory).
    pub fn height(&self) -> usize {
        self.children()
            .and_then(|children| children.values().map(|c| c.height() + 1).max())
            .unwrap_or(0)
    }
}

// =============================================================================
// Listing Entry
// =============================================================================

/// Directory entry returned by [`crate::VirtualFs::list_dir`].
#[derive(Clone, Debug, PartialEq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub modified_at: DateTime<Utc>,
}

impl DirEntry {
    pub fn from_node(name: &str, node: &Node) -> Self {
        Self {
            name: name.to_string(),
            is_dir: node.is_directory(),
            size: node.size(),
            modified_at: node.meta().modified_at,
        }
    }

    /// Dotfiles are hidden unless `ls -a` is used.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}
