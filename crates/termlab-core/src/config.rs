//! Sandbox configuration.
//!
//! Centralizes the constants that shape a session: identity shown by
//! `whoami` and the prompt, the home directory, the cosmetic `ls -l` columns,
//! and the seed files every fresh session starts with.

// =============================================================================
// Text Assets (loaded at compile time)
// =============================================================================

/// Help text for the `help` command.
pub const HELP_TEXT: &str = include_str!("../assets/help.txt");

// =============================================================================
// Identity
// =============================================================================

/// User name reported by `whoami` and shown in the prompt.
pub const USERNAME: &str = "user";

/// Host name shown in the prompt.
pub const HOSTNAME: &str = "termlab";

/// Home directory segments (`/home/user`).
pub const HOME_SEGMENTS: &[&str] = &["home", USERNAME];

// =============================================================================
// Long Listing
// =============================================================================

/// Permission column for directories in `ls -l`.
pub const DIR_PERMISSIONS: &str = "drwxr-xr-x";

/// Permission column for files in `ls -l`.
pub const FILE_PERMISSIONS: &str = "-rw-r--r--";

/// Size column shown for directories in `ls -l`.
pub const DIR_DISPLAY_SIZE: u64 = 4096;

// =============================================================================
// Durable Form
// =============================================================================

/// Version tag written into every durable form.
///
/// Bump when the envelope or node layout changes; older payloads are then
/// rejected and the session starts fresh.
pub const DURABLE_FORMAT_VERSION: u32 = 1;

// =============================================================================
// Seed Filesystem
// =============================================================================

/// Directories created in every fresh session (absolute, `/`-separated).
pub const SEED_DIRECTORIES: &[&str] = &[
    "/home/user",
    "/home/user/documents",
    "/home/user/projects",
    "/tmp",
];

/// Files created in every fresh session: (absolute path, content).
pub const SEED_FILES: &[(&str, &str)] = &[
    (
        "/home/user/welcome.txt",
        "Welcome to termlab!\n\
         This is a safe sandbox: nothing you do here touches a real disk.\n\
         Try `ls`, `cd documents`, and `cat notes.md` to look around.\n",
    ),
    (
        "/home/user/documents/notes.md",
        "# Notes\n\n- `pwd` shows where you are\n- `cd ..` goes up one level\n- `cd ~` brings you home\n",
    ),
    (
        "/home/user/.bashrc",
        "# ~/.bashrc\nalias ll='ls -l'\n",
    ),
];

/// Deepest path the tree may hold, counted in segments below the root.
///
/// Keeps recursive operations (copy, drop, serialization) far from stack
/// and decoder nesting limits no matter what the user types.
pub const MAX_TREE_DEPTH: usize = 32;

/// Longest line, in bytes, that history expansion may produce.
pub const MAX_EXPANDED_LINE: usize = 4096;
