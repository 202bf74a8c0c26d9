//! Segment-based paths inside the sandbox.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::HOME_SEGMENTS;

/// An absolute location in the virtual tree, stored as the ordered list of
/// segments from the root (the root itself is the empty list).
///
/// A `VirtualPath` is only a name: nothing guarantees that a node exists at
/// it. [`VirtualPath::resolve`] never touches the tree; existence is checked
/// by [`crate::VirtualFs::lookup`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VirtualPath(Vec<String>);

impl VirtualPath {
    /// The root directory (`/`).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The fixed home directory (`/home/user`).
    pub fn home() -> Self {
        Self::from_segments(HOME_SEGMENTS.iter().copied())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Resolve a user-typed path against `cwd`.
    ///
    /// - `""` and `"/"` are the root
    /// - a leading `/` makes the path absolute
    /// - a leading `~` is replaced by the home directory and the rest of the
    ///   string is read relative to it
    /// - anything else is relative to `cwd`
    ///
    /// `.` segments are dropped, `..` pops one segment (never past the root)
    /// and empty segments from repeated slashes are ignored.
    pub fn resolve(input: &str, cwd: &VirtualPath) -> Self {
        if input.is_empty() || input == "/" {
            return Self::root();
        }

        let (mut base, rest) = if let Some(rest) = input.strip_prefix('/') {
            (Self::root(), rest)
        } else if let Some(rest) = input.strip_prefix('~') {
            (Self::home(), rest)
        } else {
            (cwd.clone(), input)
        };

        for part in rest.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    base.0.pop();
                }
                name => base.0.push(name.to_string()),
            }
        }

        base
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, or `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Parent directory, or `None` for the root.
    pub fn parent(&self) -> Option<VirtualPath> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Child path `self/name`.
    pub fn join(&self, name: &str) -> VirtualPath {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    /// True if `self` is `other` or lies underneath it.
    pub fn starts_with(&self, other: &VirtualPath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Absolute path with the home directory abbreviated to `~`.
    pub fn display_with_home(&self) -> String {
        let home = Self::home();
        if self.starts_with(&home) {
            let rest = &self.0[home.0.len()..];
            if rest.is_empty() {
                "~".to_string()
            } else {
                format!("~/{}", rest.join("/"))
            }
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for VirtualPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}
