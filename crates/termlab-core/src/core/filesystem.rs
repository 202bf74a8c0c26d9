use tracing::{debug, warn};

use crate::config::{HOSTNAME, MAX_TREE_DEPTH, SEED_DIRECTORIES, SEED_FILES, USERNAME};
use crate::core::durable;
use crate::core::error::FsError;
use crate::models::{DirEntry, Node, NodeMeta, VirtualPath};

/// How [`VirtualFs::write`] treats an existing file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

/// In-memory filesystem for a single sandbox session.
///
/// Owns the whole tree, the cursor (current working directory) and the
/// command history. There are no parent pointers: `..` and the cursor are
/// plain segment lists re-walked from the root on every lookup.
///
/// # Path Convention
///
/// Public queries taking `&str` resolve the string against the cursor first
/// (see [`VirtualPath::resolve`]). Mutators take an already resolved
/// [`VirtualPath`].
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualFs {
    root: Node,
    cwd: VirtualPath,
    history: Vec<String>,
}

impl VirtualFs {
    /// Create the seeded session filesystem with the cursor at home.
    pub fn new() -> Self {
        let mut root = Node::directory();

        for dir in SEED_DIRECTORIES {
            let path = VirtualPath::resolve(dir, &VirtualPath::root());
            Self::ensure_directory(&mut root, &path);
        }

        for (file, content) in SEED_FILES {
            let path = VirtualPath::resolve(file, &VirtualPath::root());
            Self::insert_path(&mut root, &path, Node::file(*content));
        }

        Self {
            root,
            cwd: VirtualPath::home(),
            history: Vec::new(),
        }
    }

    /// Create a filesystem holding only an empty root, with the cursor there.
    pub fn empty() -> Self {
        Self {
            root: Node::directory(),
            cwd: VirtualPath::root(),
            history: Vec::new(),
        }
    }

    pub(crate) fn from_parts(root: Node, cwd: VirtualPath, history: Vec<String>) -> Self {
        Self { root, cwd, history }
    }

    pub(crate) fn root(&self) -> &Node {
        &self.root
    }

    /// Create every directory along `path`, skipping over existing ones.
    fn ensure_directory(root: &mut Node, path: &VirtualPath) {
        let mut current = root;
        for part in path.segments() {
            current = match current {
                Node::Directory { children, .. } => {
                    children.entry(part.clone()).or_insert_with(Node::directory)
                }
                Node::File { .. } => {
                    warn!(%path, "seed conflict: directory blocked by an existing file");
                    return;
                }
            };
        }
    }

    /// Place `node` at `path`, creating missing parents.
    fn insert_path(root: &mut Node, path: &VirtualPath, node: Node) {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return;
        };
        Self::ensure_directory(root, &parent);

        let mut current = root;
        for part in parent.segments() {
            match current.children_mut().and_then(|c| c.get_mut(part)) {
                Some(next) => current = next,
                None => return,
            }
        }
        if let Some(children) = current.children_mut() {
            children.insert(name.to_string(), node);
        }
    }

    // =========================================================================
    // Cursor, Prompt and History
    // =========================================================================

    /// Current working directory.
    pub fn cwd(&self) -> &VirtualPath {
        &self.cwd
    }

    /// Prompt string for the current directory, e.g. `user@termlab:~/notes$ `.
    pub fn prompt(&self) -> String {
        format!("{}@{}:{}$ ", USERNAME, HOSTNAME, self.cwd.display_with_home())
    }

    /// Every recorded input line, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Append an input line to the history.
    pub fn record(&mut self, line: impl Into<String>) {
        self.history.push(line.into());
    }

    /// Move the cursor to an existing directory.
    pub fn change_dir(&mut self, path: &VirtualPath) -> Result<(), FsError> {
        if self.node(path)?.is_file() {
            return Err(FsError::NotADirectory { path: path.clone() });
        }
        self.cwd = path.clone();
        Ok(())
    }

    // =========================================================================
    // Resolution and Lookup
    // =========================================================================

    /// Resolve a path string against the cursor (no existence check).
    pub fn resolve(&self, path: &str) -> VirtualPath {
        VirtualPath::resolve(path, &self.cwd)
    }

    /// Walk from the root; `None` if a segment is missing or is a file.
    pub fn lookup(&self, path: &VirtualPath) -> Option<&Node> {
        self.node(path).ok()
    }

    /// Like [`lookup`](Self::lookup), but says why the walk failed.
    pub fn node(&self, path: &VirtualPath) -> Result<&Node, FsError> {
        let mut current = &self.root;
        for (depth, part) in path.segments().iter().enumerate() {
            current = match current {
                Node::Directory { children, .. } => {
                    children.get(part).ok_or_else(|| FsError::NotFound {
                        path: prefix(path, depth + 1),
                    })?
                }
                Node::File { .. } => {
                    return Err(FsError::NotADirectory {
                        path: prefix(path, depth),
                    });
                }
            };
        }
        Ok(current)
    }

    fn node_mut(&mut self, path: &VirtualPath) -> Result<&mut Node, FsError> {
        let mut current = &mut self.root;
        for (depth, part) in path.segments().iter().enumerate() {
            current = match current {
                Node::Directory { children, .. } => {
                    children.get_mut(part).ok_or_else(|| FsError::NotFound {
                        path: prefix(path, depth + 1),
                    })?
                }
                Node::File { .. } => {
                    return Err(FsError::NotADirectory {
                        path: prefix(path, depth),
                    });
                }
            };
        }
        Ok(current)
    }

    /// Existing directory at `path`.
    fn dir_mut(&mut self, path: &VirtualPath) -> Result<&mut Node, FsError> {
        let node = self.node_mut(path)?;
        if node.is_file() {
            return Err(FsError::NotADirectory { path: path.clone() });
        }
        Ok(node)
    }

    /// List a directory, sorted by name (directories and files interleaved).
    ///
    /// Returns `None` if `path` is missing or is a file.
    pub fn list_dir(&self, path: &VirtualPath) -> Option<Vec<DirEntry>> {
        let children = self.lookup(path)?.children()?;
        Some(
            children
                .iter()
                .map(|(name, node)| DirEntry::from_node(name, node))
                .collect(),
        )
    }

    // =========================================================================
    // Validation Queries
    // =========================================================================

    /// True if `path` (resolved against the cursor) names any node.
    pub fn exists(&self, path: &str) -> bool {
        self.lookup(&self.resolve(path)).is_some()
    }

    /// Content of the file at `path`; `None` for directories and missing paths.
    pub fn read(&self, path: &str) -> Option<String> {
        self.lookup(&self.resolve(path))?
            .content()
            .map(str::to_string)
    }

    /// Child names of the directory at `path`, sorted by name.
    pub fn list_children(&self, path: &str) -> Option<Vec<String>> {
        let children = self.lookup(&self.resolve(path))?.children()?;
        Some(children.keys().cloned().collect())
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Create a directory at `path`.
    ///
    /// With `parents`, missing intermediate directories are created too. The
    /// final name must not exist either way.
    pub fn make_directory(&mut self, path: &VirtualPath, parents: bool) -> Result<(), FsError> {
        if self.lookup(path).is_some() {
            return Err(FsError::AlreadyExists { path: path.clone() });
        }
        check_depth(path, 0)?;

        if !parents {
            return self.attach(path, Node::directory());
        }

        let mut current = &mut self.root;
        for (depth, part) in path.segments().iter().enumerate() {
            current = match current {
                Node::Directory { children, meta } => {
                    if !children.contains_key(part) {
                        meta.touch();
                    }
                    children.entry(part.clone()).or_insert_with(Node::directory)
                }
                Node::File { .. } => {
                    return Err(FsError::NotADirectory {
                        path: prefix(path, depth),
                    });
                }
            };
        }
        if current.is_file() {
            return Err(FsError::NotADirectory { path: path.clone() });
        }
        Ok(())
    }

    /// Create an empty file at `path`, or bump `modified_at` if it exists.
    pub fn make_file(&mut self, path: &VirtualPath) -> Result<(), FsError> {
        if let Ok(node) = self.node_mut(path) {
            node.meta_mut().touch();
            return Ok(());
        }
        check_depth(path, 0)?;
        self.attach(path, Node::file(""))
    }

    /// Write `text` to the file at `path`, creating it if absent.
    pub fn write(&mut self, path: &VirtualPath, text: &str, mode: WriteMode) -> Result<(), FsError> {
        match self.node_mut(path) {
            Ok(Node::File { content, meta }) => {
                match mode {
                    WriteMode::Overwrite => *content = text.to_string(),
                    WriteMode::Append => content.push_str(text),
                }
                meta.touch();
                Ok(())
            }
            Ok(Node::Directory { .. }) => Err(FsError::IsADirectory { path: path.clone() }),
            Err(_) => {
                check_depth(path, 0)?;
                self.attach(path, Node::file(text))
            }
        }
    }

    /// Remove the node at `path`. Directories require `recursive`.
    ///
    /// If the cursor was inside the removed subtree it moves to the removed
    /// node's parent.
    pub fn remove(&mut self, path: &VirtualPath, recursive: bool) -> Result<(), FsError> {
        if path.is_root() {
            return Err(FsError::RootDirectory { path: path.clone() });
        }
        if self.node(path)?.is_directory() && !recursive {
            return Err(FsError::IsADirectory { path: path.clone() });
        }
        self.detach(path)?;
        self.relocate_cursor(path);
        Ok(())
    }

    /// Copy `src` to `dst`, deep-copying directories.
    ///
    /// If `dst` is an existing directory the copy is placed inside it under
    /// the source's name; otherwise `dst` is the full destination path. An
    /// existing destination file is overwritten by a file copy. Returns the
    /// path of the new node.
    pub fn copy(&mut self, src: &VirtualPath, dst: &VirtualPath) -> Result<VirtualPath, FsError> {
        let mut node = self.node(src)?.clone();
        let target = self.destination(src, dst)?;
        if target == *src {
            return Err(FsError::SameFile {
                src: src.clone(),
                dst: target,
            });
        }

        node.restamp(NodeMeta::now());
        self.place(&target, node)?;
        Ok(target)
    }

    /// Move `src` to `dst` with the same destination rules as [`copy`](Self::copy).
    ///
    /// The node is placed at the destination before the source is removed;
    /// if placing fails the tree is left untouched.
    pub fn move_node(&mut self, src: &VirtualPath, dst: &VirtualPath) -> Result<VirtualPath, FsError> {
        if src.is_root() {
            return Err(FsError::RootDirectory { path: src.clone() });
        }
        let node = self.node(src)?.clone();
        let target = self.destination(src, dst)?;
        if target == *src {
            return Err(FsError::SameFile {
                src: src.clone(),
                dst: target,
            });
        }
        if node.is_directory() && target.starts_with(src) {
            return Err(FsError::IntoItself {
                src: src.clone(),
                dst: target,
            });
        }

        self.place(&target, node)?;
        self.detach(src)?;
        self.relocate_cursor(src);
        Ok(target)
    }

    // =========================================================================
    // Durable Form
    // =========================================================================

    /// Serialize the tree, cursor and history into a self-describing string.
    pub fn to_durable_form(&self) -> String {
        durable::encode(self)
    }

    /// Rebuild a session from [`to_durable_form`](Self::to_durable_form)
    /// output.
    ///
    /// Any parse or validation failure yields a fresh [`VirtualFs::new`]
    /// instead of an error, so corrupted saved state never blocks a session.
    pub fn from_durable_form(input: &str) -> Self {
        Self::try_from_durable_form(input).unwrap_or_else(|err| {
            warn!(error = %err, "discarding durable form, starting a fresh session");
            Self::new()
        })
    }

    /// Strict variant of [`from_durable_form`](Self::from_durable_form).
    pub fn try_from_durable_form(input: &str) -> Result<Self, durable::DecodeError> {
        durable::decode(input)
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Where a copy or move of `src` to `dst` lands.
    fn destination(&self, src: &VirtualPath, dst: &VirtualPath) -> Result<VirtualPath, FsError> {
        match self.lookup(dst) {
            Some(node) if node.is_directory() => {
                let name = src
                    .file_name()
                    .ok_or_else(|| FsError::RootDirectory { path: src.clone() })?;
                Ok(dst.join(name))
            }
            _ => Ok(dst.clone()),
        }
    }

    /// Put `node` at `target`. Only a file may replace an existing file.
    fn place(&mut self, target: &VirtualPath, node: Node) -> Result<(), FsError> {
        check_depth(target, node.height())?;
        let existing_is_dir = self.lookup(target).map(Node::is_directory);
        match (existing_is_dir, node.is_directory()) {
            (None, _) => self.attach(target, node),
            (Some(true), false) => Err(FsError::IsADirectory {
                path: target.clone(),
            }),
            (Some(_), true) => Err(FsError::AlreadyExists {
                path: target.clone(),
            }),
            (Some(false), false) => {
                self.detach(target)?;
                self.attach(target, node)
            }
        }
    }

    /// Insert `node` as a new child; the parent must exist and the name must
    /// be free.
    fn attach(&mut self, path: &VirtualPath, node: Node) -> Result<(), FsError> {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Err(FsError::AlreadyExists { path: path.clone() });
        };
        let dir = self.dir_mut(&parent)?;
        if let Node::Directory { children, meta } = dir {
            if children.contains_key(name) {
                return Err(FsError::AlreadyExists { path: path.clone() });
            }
            children.insert(name.to_string(), node);
            meta.touch();
        }
        Ok(())
    }

    /// Unlink the node at `path` from its parent.
    fn detach(&mut self, path: &VirtualPath) -> Result<Node, FsError> {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            return Err(FsError::RootDirectory { path: path.clone() });
        };
        let dir = self.dir_mut(&parent)?;
        let Node::Directory { children, meta } = dir else {
            return Err(FsError::NotADirectory { path: parent });
        };
        let node = children
            .remove(name)
            .ok_or_else(|| FsError::NotFound { path: path.clone() })?;
        meta.touch();
        Ok(node)
    }

    /// Pull the cursor out of a subtree that no longer exists.
    fn relocate_cursor(&mut self, removed: &VirtualPath) {
        if self.cwd.starts_with(removed) {
            let parent = removed.parent().unwrap_or_default();
            debug!(from = %self.cwd, to = %parent, "cursor directory removed");
            self.cwd = parent;
        }
    }
}

impl Default for VirtualFs {
    fn default() -> Self {
        Self::new()
    }
}

/// First `len` segments of `path`.
fn prefix(path: &VirtualPath, len: usize) -> VirtualPath {
    VirtualPath::from_segments(path.segments()[..len].iter().cloned())
}

/// Reject trees deeper than [`MAX_TREE_DEPTH`].
fn check_depth(path: &VirtualPath, height: usize) -> Result<(), FsError> {
    if path.len() + height > MAX_TREE_DEPTH {
        return Err(FsError::TooDeep { path: path.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn p(fs: &VirtualFs, path: &str) -> VirtualPath {
        fs.resolve(path)
    }

    #[test]
    fn test_seeded_fs() {
        let fs = VirtualFs::new();
        assert_eq!(fs.cwd(), &VirtualPath::home());
        assert!(fs.exists("/home/user"));
        assert!(fs.exists("welcome.txt"));
        assert!(fs.exists("documents/notes.md"));
        assert!(fs.exists(".bashrc"));
        assert!(fs.exists("/tmp"));
        assert!(fs.history().is_empty());
    }

    #[test]
    fn test_empty_fs() {
        let fs = VirtualFs::empty();
        assert!(fs.cwd().is_root());
        assert_eq!(fs.list_children("/"), Some(vec![]));
    }

    #[test]
    fn test_lookup_through_file_fails() {
        let fs = VirtualFs::new();
        assert!(fs.lookup(&p(&fs, "welcome.txt/x")).is_none());
        assert_eq!(
            fs.node(&p(&fs, "welcome.txt/x")),
            Err(FsError::NotADirectory {
                path: p(&fs, "/home/user/welcome.txt"),
            })
        );
        assert_eq!(
            fs.node(&p(&fs, "nope/x")),
            Err(FsError::NotFound {
                path: p(&fs, "/home/user/nope"),
            })
        );
    }

    #[test]
    fn test_read_and_list_children() {
        let fs = VirtualFs::new();
        assert!(fs.read("welcome.txt").unwrap().starts_with("Welcome"));
        assert_eq!(fs.read("documents"), None);
        assert_eq!(fs.read("missing.txt"), None);
        assert_eq!(
            fs.list_children("~"),
            Some(vec![
                ".bashrc".to_string(),
                "documents".to_string(),
                "projects".to_string(),
                "welcome.txt".to_string(),
            ])
        );
        assert_eq!(fs.list_children("welcome.txt"), None);
    }

    #[test]
    fn test_change_dir() {
        let mut fs = VirtualFs::new();
        let docs = p(&fs, "documents");
        fs.change_dir(&docs).unwrap();
        assert_eq!(fs.cwd(), &docs);

        let file = p(&fs, "notes.md");
        assert_eq!(
            fs.change_dir(&file),
            Err(FsError::NotADirectory { path: file.clone() })
        );
        assert!(fs.change_dir(&p(&fs, "/nope")).is_err());
        assert_eq!(fs.cwd(), &docs);
    }

    #[test]
    fn test_make_directory() {
        let mut fs = VirtualFs::new();
        let dir = p(&fs, "my-project");
        fs.make_directory(&dir, false).unwrap();
        assert!(fs.lookup(&dir).unwrap().is_directory());
        assert_eq!(
            fs.make_directory(&dir, false),
            Err(FsError::AlreadyExists { path: dir.clone() })
        );
        assert_eq!(
            fs.make_directory(&dir, true),
            Err(FsError::AlreadyExists { path: dir })
        );
    }

    #[test]
    fn test_make_directory_missing_parent() {
        let mut fs = VirtualFs::new();
        let nested = p(&fs, "a/b/c");
        assert_eq!(
            fs.make_directory(&nested, false),
            Err(FsError::NotFound {
                path: p(&fs, "a"),
            })
        );
        fs.make_directory(&nested, true).unwrap();
        assert!(fs.exists("a/b/c"));
    }

    #[test]
    fn test_make_directory_under_file() {
        let mut fs = VirtualFs::new();
        assert_eq!(
            fs.make_directory(&p(&fs, "welcome.txt/sub"), false),
            Err(FsError::NotADirectory {
                path: p(&fs, "welcome.txt"),
            })
        );
        assert_eq!(
            fs.make_directory(&p(&fs, "welcome.txt/sub"), true),
            Err(FsError::NotADirectory {
                path: p(&fs, "welcome.txt"),
            })
        );
    }

    #[test]
    fn test_make_directory_touches_parent() {
        let mut fs = VirtualFs::new();
        let before = fs.lookup(&VirtualPath::home()).unwrap().meta().modified_at;
        fs.make_directory(&p(&fs, "fresh"), false).unwrap();
        let after = fs.lookup(&VirtualPath::home()).unwrap().meta().modified_at;
        assert!(after >= before);
    }

    #[test]
    fn test_make_file_updates_only_modified_at() {
        let mut fs = VirtualFs::new();
        let file = p(&fs, "foo.txt");
        fs.make_file(&file).unwrap();
        let first = *fs.lookup(&file).unwrap().meta();

        fs.write(&file, "kept", WriteMode::Overwrite).unwrap();
        fs.make_file(&file).unwrap();
        let node = fs.lookup(&file).unwrap();
        assert_eq!(node.content(), Some("kept"));
        assert_eq!(node.meta().created_at, first.created_at);
        assert!(node.meta().modified_at >= first.modified_at);
    }

    #[test]
    fn test_write_modes() {
        let mut fs = VirtualFs::new();
        let file = p(&fs, "a.txt");
        fs.write(&file, "hello\n", WriteMode::Overwrite).unwrap();
        fs.write(&file, "world\n", WriteMode::Append).unwrap();
        assert_eq!(fs.read("a.txt").as_deref(), Some("hello\nworld\n"));
        fs.write(&file, "reset\n", WriteMode::Overwrite).unwrap();
        assert_eq!(fs.read("a.txt").as_deref(), Some("reset\n"));
    }

    #[test]
    fn test_write_to_directory_fails() {
        let mut fs = VirtualFs::new();
        let dir = p(&fs, "documents");
        assert_eq!(
            fs.write(&dir, "x", WriteMode::Overwrite),
            Err(FsError::IsADirectory { path: dir })
        );
    }

    #[test]
    fn test_remove() {
        let mut fs = VirtualFs::new();
        let file = p(&fs, "welcome.txt");
        fs.remove(&file, false).unwrap();
        assert!(!fs.exists("welcome.txt"));
        assert_eq!(
            fs.remove(&file, false),
            Err(FsError::NotFound { path: file })
        );
    }

    #[test]
    fn test_remove_directory_requires_recursive() {
        let mut fs = VirtualFs::new();
        let dir = p(&fs, "documents");
        assert_eq!(
            fs.remove(&dir, false),
            Err(FsError::IsADirectory { path: dir.clone() })
        );
        fs.remove(&dir, true).unwrap();
        assert!(!fs.exists("documents"));
        assert!(!fs.exists("documents/notes.md"));
    }

    #[test]
    fn test_remove_root_is_refused() {
        let mut fs = VirtualFs::new();
        assert_eq!(
            fs.remove(&VirtualPath::root(), true),
            Err(FsError::RootDirectory {
                path: VirtualPath::root(),
            })
        );
        assert!(fs.exists("/home/user"));
    }

    #[test]
    fn test_remove_relocates_cursor() {
        let mut fs = VirtualFs::new();
        fs.make_directory(&p(&fs, "a/b/c"), true).unwrap();
        fs.change_dir(&p(&fs, "a/b/c")).unwrap();
        fs.remove(&p(&fs, "/home/user/a/b"), true).unwrap();
        assert_eq!(fs.cwd(), &p(&fs, "/home/user/a"));
    }

    #[test]
    fn test_copy_file() {
        let mut fs = VirtualFs::new();
        let src = p(&fs, "welcome.txt");
        let target = fs.copy(&src, &p(&fs, "copy.txt")).unwrap();
        assert_eq!(target, p(&fs, "copy.txt"));
        assert_eq!(fs.read("copy.txt"), fs.read("welcome.txt"));
    }

    #[test]
    fn test_copy_into_directory() {
        let mut fs = VirtualFs::new();
        let target = fs
            .copy(&p(&fs, "welcome.txt"), &p(&fs, "projects"))
            .unwrap();
        assert_eq!(target, p(&fs, "projects/welcome.txt"));
        assert!(fs.exists("welcome.txt"));
    }

    #[test]
    fn test_copy_directory_is_deep() {
        let mut fs = VirtualFs::new();
        fs.copy(&p(&fs, "documents"), &p(&fs, "backup")).unwrap();
        assert_eq!(fs.read("backup/notes.md"), fs.read("documents/notes.md"));

        fs.write(&p(&fs, "backup/notes.md"), "changed", WriteMode::Overwrite)
            .unwrap();
        assert_ne!(fs.read("backup/notes.md"), fs.read("documents/notes.md"));
    }

    #[test]
    fn test_copy_restamps_whole_subtree() {
        let mut fs = VirtualFs::new();
        let old = NodeMeta {
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            modified_at: DateTime::<Utc>::UNIX_EPOCH,
        };
        fs.node_mut(&p(&fs, "documents")).unwrap().restamp(old);

        fs.copy(&p(&fs, "documents"), &p(&fs, "docs2")).unwrap();
        let top = *fs.node(&p(&fs, "docs2")).unwrap().meta();
        let child = *fs.node(&p(&fs, "docs2/notes.md")).unwrap().meta();
        assert_ne!(top, old);
        assert_eq!(child, top);
        assert_eq!(*fs.node(&p(&fs, "documents/notes.md")).unwrap().meta(), old);
    }

    #[test]
    fn test_copy_overwrites_file_but_not_directory() {
        let mut fs = VirtualFs::new();
        fs.write(&p(&fs, "a.txt"), "a", WriteMode::Overwrite).unwrap();
        fs.write(&p(&fs, "b.txt"), "b", WriteMode::Overwrite).unwrap();
        fs.copy(&p(&fs, "a.txt"), &p(&fs, "b.txt")).unwrap();
        assert_eq!(fs.read("b.txt").as_deref(), Some("a"));

        fs.make_directory(&p(&fs, "projects/documents"), false).unwrap();
        assert_eq!(
            fs.copy(&p(&fs, "documents"), &p(&fs, "projects")),
            Err(FsError::AlreadyExists {
                path: p(&fs, "projects/documents"),
            })
        );
    }

    #[test]
    fn test_copy_same_file() {
        let mut fs = VirtualFs::new();
        let src = p(&fs, "welcome.txt");
        assert!(matches!(
            fs.copy(&src, &src),
            Err(FsError::SameFile { .. })
        ));
        assert!(matches!(
            fs.copy(&src, &VirtualPath::home()),
            Err(FsError::SameFile { .. })
        ));
    }

    #[test]
    fn test_copy_missing_source() {
        let mut fs = VirtualFs::new();
        assert!(matches!(
            fs.copy(&p(&fs, "ghost"), &p(&fs, "x")),
            Err(FsError::NotFound { .. })
        ));
    }

    #[test]
    fn test_move_into_directory() {
        let mut fs = VirtualFs::new();
        fs.write(&p(&fs, "a.txt"), "data", WriteMode::Overwrite)
            .unwrap();
        fs.make_directory(&p(&fs, "dir"), false).unwrap();
        let target = fs.move_node(&p(&fs, "a.txt"), &p(&fs, "dir")).unwrap();
        assert_eq!(target, p(&fs, "dir/a.txt"));
        assert!(!fs.exists("a.txt"));
        assert_eq!(fs.read("dir/a.txt").as_deref(), Some("data"));
    }

    #[test]
    fn test_move_rename_preserves_timestamps() {
        let mut fs = VirtualFs::new();
        let created = fs.lookup(&p(&fs, "welcome.txt")).unwrap().meta().created_at;
        fs.move_node(&p(&fs, "welcome.txt"), &p(&fs, "hello.txt"))
            .unwrap();
        let node = fs.lookup(&p(&fs, "hello.txt")).unwrap();
        assert_eq!(node.meta().created_at, created);
    }

    #[test]
    fn test_move_failure_leaves_tree_untouched() {
        let mut fs = VirtualFs::new();
        let before = fs.clone();
        assert!(matches!(
            fs.move_node(&p(&fs, "welcome.txt"), &p(&fs, "missing/dir/x.txt")),
            Err(FsError::NotFound { .. })
        ));
        assert_eq!(fs, before);
    }

    #[test]
    fn test_move_into_itself_is_refused() {
        let mut fs = VirtualFs::new();
        assert!(matches!(
            fs.move_node(&p(&fs, "documents"), &p(&fs, "documents/inner")),
            Err(FsError::IntoItself { .. })
        ));
        assert!(fs.exists("documents/notes.md"));
    }

    #[test]
    fn test_move_root_is_refused() {
        let mut fs = VirtualFs::new();
        assert!(matches!(
            fs.move_node(&VirtualPath::root(), &p(&fs, "x")),
            Err(FsError::RootDirectory { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut fs = VirtualFs::empty();
        let deep = "/d".repeat(MAX_TREE_DEPTH + 1);
        let path = p(&fs, &deep);
        assert_eq!(
            fs.make_directory(&path, true),
            Err(FsError::TooDeep { path: path.clone() })
        );

        let ok = "/d".repeat(MAX_TREE_DEPTH);
        fs.make_directory(&p(&fs, &ok), true).unwrap();
        assert!(matches!(
            fs.copy(&p(&fs, "/d"), &p(&fs, "/d/d")),
            Err(FsError::TooDeep { .. })
        ));
    }

    #[test]
    fn test_prompt() {
        let mut fs = VirtualFs::new();
        assert_eq!(fs.prompt(), "user@termlab:~$ ");
        fs.change_dir(&p(&fs, "/tmp")).unwrap();
        assert_eq!(fs.prompt(), "user@termlab:/tmp$ ");
    }
}
