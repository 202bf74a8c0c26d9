//! Tab autocomplete for command names and paths.
//!
//! - The first word completes against [`Command::names`]
//! - After `cd`, `ls` and `mkdir` the last word completes directories only
//! - After the other path-taking commands it completes any entry
//!
//! Matching is case-sensitive, like the filesystem. Dotfiles are offered
//! only when the partial name starts with `.`.

use crate::core::{Command, VirtualFs};
use crate::models::{DirEntry, VirtualPath};

// ============================================================================
// Public Types
// ============================================================================

/// Result of an autocomplete attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AutocompleteResult {
    /// Single match - replace the input with this line.
    Single(String),
    /// Multiple matches - (input extended to the common prefix, display names).
    Multiple(String, Vec<String>),
    /// No matches found.
    None,
}

// ============================================================================
// Configuration
// ============================================================================

/// Commands whose operands are directories.
const DIR_COMMANDS: &[&str] = &["cd", "ls", "mkdir"];

/// Commands whose operands are any path.
const PATH_COMMANDS: &[&str] = &["cat", "cp", "echo", "mv", "rm", "touch"];

// ============================================================================
// Completion Context
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum CompletionMode {
    DirectoryPath,
    AnyPath,
    None,
}

impl CompletionMode {
    fn for_command(cmd: &str) -> Self {
        if DIR_COMMANDS.contains(&cmd) {
            Self::DirectoryPath
        } else if PATH_COMMANDS.contains(&cmd) {
            Self::AnyPath
        } else {
            Self::None
        }
    }
}

/// Partial path split at its last `/`.
struct ParsedPath<'a> {
    /// Directory prefix as typed (e.g., "projects/" or "").
    dir_part: &'a str,
    /// Name being completed.
    name_part: &'a str,
    search_dir: VirtualPath,
}

impl<'a> ParsedPath<'a> {
    fn parse(partial: &'a str, fs: &VirtualFs) -> Self {
        let (dir_part, name_part) = match partial.rfind('/') {
            Some(idx) => (&partial[..=idx], &partial[idx + 1..]),
            None => ("", partial),
        };

        let search_dir = if dir_part.is_empty() {
            fs.cwd().clone()
        } else {
            fs.resolve(dir_part)
        };

        Self {
            dir_part,
            name_part,
            search_dir,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Complete the last word of `input`.
pub fn autocomplete(input: &str, fs: &VirtualFs) -> AutocompleteResult {
    let input = input.trim_start();
    if input.is_empty() {
        return AutocompleteResult::None;
    }

    let Some(cmd_end) = input.find(|c: char| c.is_ascii_whitespace()) else {
        return complete_command(input);
    };

    let partial_start = input
        .rfind(|c: char| c.is_ascii_whitespace())
        .map_or(0, |idx| idx + 1);
    let (head, partial) = input.split_at(partial_start);
    if partial.starts_with('-') || partial.contains('>') {
        return AutocompleteResult::None;
    }

    match CompletionMode::for_command(&input[..cmd_end]) {
        CompletionMode::DirectoryPath => complete_path(head, partial, fs, true),
        CompletionMode::AnyPath => complete_path(head, partial, fs, false),
        CompletionMode::None => AutocompleteResult::None,
    }
}

// ============================================================================
// Command Completion
// ============================================================================

fn complete_command(partial: &str) -> AutocompleteResult {
    let matches: Vec<String> = Command::names()
        .iter()
        .filter(|cmd| cmd.starts_with(partial))
        .map(|s| s.to_string())
        .collect();

    match matches.len() {
        0 => AutocompleteResult::None,
        1 => AutocompleteResult::Single(format!("{} ", matches[0])),
        _ => {
            let common = find_common_prefix(&matches);
            AutocompleteResult::Multiple(common, matches)
        }
    }
}

// ============================================================================
// Path Completion
// ============================================================================

/// Complete `partial`, keeping everything before it (`head`) as typed.
fn complete_path(head: &str, partial: &str, fs: &VirtualFs, dirs_only: bool) -> AutocompleteResult {
    let parsed = ParsedPath::parse(partial, fs);

    let Some(entries) = fs.list_dir(&parsed.search_dir) else {
        return AutocompleteResult::None;
    };

    let matches = matching_entries(&entries, parsed.name_part, dirs_only);
    match matches.as_slice() {
        [] => AutocompleteResult::None,
        [only] => {
            let suffix = if only.is_dir { "/" } else { " " };
            AutocompleteResult::Single(format!("{}{}{}{}", head, parsed.dir_part, only.name, suffix))
        }
        _ => {
            let names: Vec<String> = matches.iter().map(|e| e.name.clone()).collect();
            let common = find_common_prefix(&names);
            let display = matches
                .iter()
                .map(|e| {
                    if e.is_dir {
                        format!("{}/", e.name)
                    } else {
                        e.name.clone()
                    }
                })
                .collect();
            AutocompleteResult::Multiple(format!("{}{}{}", head, parsed.dir_part, common), display)
        }
    }
}

fn matching_entries<'a>(entries: &'a [DirEntry], name_part: &str, dirs_only: bool) -> Vec<&'a DirEntry> {
    let show_hidden = name_part.starts_with('.');
    entries
        .iter()
        .filter(|e| !dirs_only || e.is_dir)
        .filter(|e| show_hidden || !e.is_hidden())
        .filter(|e| e.name.starts_with(name_part))
        .collect()
}

// ============================================================================
// Utilities
// ============================================================================

/// Longest common prefix, cut on a character boundary.
fn find_common_prefix(strings: &[String]) -> String {
    let Some(first) = strings.first() else {
        return String::new();
    };

    let mut prefix_len = first.len();
    for s in &strings[1..] {
        prefix_len = first
            .char_indices()
            .zip(s.chars())
            .take_while(|((idx, a), b)| *idx < prefix_len && a == b)
            .last()
            .map_or(0, |((idx, a), _)| idx + a.len_utf8());
    }

    first[..prefix_len].to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::execute_line;

    #[test]
    fn test_command_completion_single() {
        assert_eq!(
            autocomplete("whoa", &VirtualFs::new()),
            AutocompleteResult::Single("whoami ".to_string())
        );
    }

    #[test]
    fn test_command_completion_multiple() {
        match complete_command("c") {
            AutocompleteResult::Multiple(common, matches) => {
                assert_eq!(common, "c");
                assert_eq!(matches, vec!["cat", "cd", "clear", "cp"]);
            }
            other => panic!("Expected multiple matches, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match() {
        assert_eq!(complete_command("xyz"), AutocompleteResult::None);
        assert_eq!(autocomplete("", &VirtualFs::new()), AutocompleteResult::None);
        assert_eq!(autocomplete("whoami x", &VirtualFs::new()), AutocompleteResult::None);
    }

    #[test]
    fn test_common_prefix() {
        let strings = vec![
            "hello".to_string(),
            "help".to_string(),
            "helicopter".to_string(),
        ];
        assert_eq!(find_common_prefix(&strings), "hel");
        assert_eq!(find_common_prefix(&["abc".to_string(), "xyz".to_string()]), "");
        assert_eq!(
            find_common_prefix(&["café".to_string(), "cafés".to_string()]),
            "café"
        );
    }

    #[test]
    fn test_directory_completion() {
        let fs = VirtualFs::new();
        assert_eq!(
            autocomplete("cd doc", &fs),
            AutocompleteResult::Single("cd documents/".to_string())
        );
        // welcome.txt is a file, so cd has nothing to offer
        assert_eq!(autocomplete("cd wel", &fs), AutocompleteResult::None);
    }

    #[test]
    fn test_file_completion() {
        let fs = VirtualFs::new();
        assert_eq!(
            autocomplete("cat wel", &fs),
            AutocompleteResult::Single("cat welcome.txt ".to_string())
        );
        assert_eq!(
            autocomplete("cat documents/n", &fs),
            AutocompleteResult::Single("cat documents/notes.md ".to_string())
        );
    }

    #[test]
    fn test_completes_last_operand() {
        let fs = VirtualFs::new();
        assert_eq!(
            autocomplete("cp welcome.txt pro", &fs),
            AutocompleteResult::Single("cp welcome.txt projects/".to_string())
        );
    }

    #[test]
    fn test_multiple_path_matches() {
        let mut fs = VirtualFs::new();
        execute_line(&mut fs, "touch notes-a.txt notes-b.txt");
        execute_line(&mut fs, "mkdir notebooks");
        assert_eq!(
            autocomplete("rm no", &fs),
            AutocompleteResult::Multiple(
                "rm note".to_string(),
                vec![
                    "notebooks/".to_string(),
                    "notes-a.txt".to_string(),
                    "notes-b.txt".to_string(),
                ]
            )
        );
    }

    #[test]
    fn test_hidden_only_with_dot() {
        let fs = VirtualFs::new();
        match autocomplete("cat ", &fs) {
            AutocompleteResult::Multiple(_, names) => assert!(!names.contains(&".bashrc".to_string())),
            other => panic!("Expected multiple matches, got {:?}", other),
        }
        assert_eq!(
            autocomplete("cat .b", &fs),
            AutocompleteResult::Single("cat .bashrc ".to_string())
        );
    }

    #[test]
    fn test_flags_are_not_completed() {
        assert_eq!(autocomplete("ls -", &VirtualFs::new()), AutocompleteResult::None);
    }

    #[test]
    fn test_operands_without_paths_are_not_completed() {
        let fs = VirtualFs::new();
        assert_eq!(autocomplete("whoami w", &fs), AutocompleteResult::None);
        assert_eq!(autocomplete("nope w", &fs), AutocompleteResult::None);
        assert_eq!(
            CompletionMode::for_command("history"),
            CompletionMode::None
        );
        assert_eq!(
            CompletionMode::for_command("cd"),
            CompletionMode::DirectoryPath
        );
    }
}
