//! Command execution logic.
//!
//! Contains the `execute_command` function that runs parsed commands
//! against the virtual filesystem and returns results.

use chrono::Utc;

use crate::config::{HELP_TEXT, USERNAME};
use crate::core::VirtualFs;
use crate::core::error::{CommandError, FsError};
use crate::core::parser::Redirect;
use crate::models::DirEntry;
use crate::utils::{format_date_full, format_history, format_long_entry};

use super::{Command, CommandResult, PathArg};

/// Execute a parsed command and return its result.
///
/// Handlers that take several operands (`mkdir`, `touch`, `rm`, `cp`, `mv`)
/// process each one and collect the failures; `cat` stops at the first.
pub fn execute_command(cmd: Command, fs: &mut VirtualFs) -> CommandResult {
    match cmd {
        Command::Pwd => CommandResult::output(fs.cwd().to_string()),
        Command::Ls { paths, long, all } => execute_ls(&paths, long, all, fs),
        Command::Cd(path) => execute_cd(path, fs),
        Command::Mkdir { paths, parents } => for_each_operand(&paths, |path| {
            let resolved = fs.resolve(path.as_str());
            fs.make_directory(&resolved, parents)
                .map_err(|e| CommandError::fs("mkdir", path.as_str(), e))
        }),
        Command::Touch(paths) => for_each_operand(&paths, |path| {
            let resolved = fs.resolve(path.as_str());
            fs.make_file(&resolved)
                .map_err(|e| CommandError::fs("touch", path.as_str(), e))
        }),
        Command::Rm {
            paths,
            recursive,
            force,
        } => for_each_operand(&paths, |path| {
            let resolved = fs.resolve(path.as_str());
            match fs.remove(&resolved, recursive) {
                Err(FsError::NotFound { .. }) if force => Ok(()),
                result => result.map_err(|e| CommandError::fs("rm", path.as_str(), e)),
            }
        }),
        Command::Cat(paths) => execute_cat(&paths, fs),
        Command::Echo { text, redirect } => execute_echo(text, redirect, fs),
        Command::Cp { sources, dst } => execute_transfer("cp", &sources, &dst, fs),
        Command::Mv { sources, dst } => execute_transfer("mv", &sources, &dst, fs),
        Command::Clear => CommandResult::clear_screen(),
        Command::Help => CommandResult::output(HELP_TEXT.trim_end()),
        Command::History => CommandResult::output(format_history(fs.history())),
        Command::Whoami => CommandResult::output(USERNAME),
        Command::Date => CommandResult::output(format_date_full(&Utc::now())),
    }
}

/// Run `op` on every operand; fail if any failed, reporting each error.
fn for_each_operand<F>(paths: &[PathArg], mut op: F) -> CommandResult
where
    F: FnMut(&PathArg) -> Result<(), CommandError>,
{
    let errors: Vec<CommandError> = paths.iter().filter_map(|p| op(p).err()).collect();
    collect_failures(errors, String::new())
}

/// Combine partial output with the collected errors.
fn collect_failures(errors: Vec<CommandError>, output: String) -> CommandResult {
    let Some(first) = errors.first() else {
        return CommandResult::output(output);
    };
    let hint = first.hint();
    let mut lines: Vec<String> = Vec::new();
    if !output.is_empty() {
        lines.push(output);
    }
    lines.extend(errors.iter().map(ToString::to_string));
    CommandResult::failure(lines.join("\n"), hint)
}

/// Execute `ls` command.
///
/// A file operand lists as its own name. With several operands each
/// directory gets a `name:` header.
fn execute_ls(paths: &[PathArg], long: bool, all: bool, fs: &VirtualFs) -> CommandResult {
    let default = [PathArg::from(".")];
    let targets = if paths.is_empty() { &default[..] } else { paths };
    let headers = targets.len() > 1;

    let mut sections = Vec::new();
    let mut errors = Vec::new();

    for target in targets {
        let resolved = fs.resolve(target.as_str());
        let (entries, is_dir) = match fs.node(&resolved) {
            Ok(node) if node.is_file() => (vec![DirEntry::from_node(target.as_str(), node)], false),
            Ok(_) => (fs.list_dir(&resolved).unwrap_or_default(), true),
            Err(e) => {
                errors.push(CommandError::fs("ls", target.as_str(), e));
                continue;
            }
        };

        // A file named on the command line is listed even when hidden.
        let visible: Vec<&DirEntry> = entries
            .iter()
            .filter(|e| all || !is_dir || !e.is_hidden())
            .collect();
        let listing = if long {
            visible
                .iter()
                .map(|e| format_long_entry(e))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            visible
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join("  ")
        };

        if headers && is_dir {
            sections.push(format!("{}:\n{}", target, listing));
        } else {
            sections.push(listing);
        }
    }

    let separator = if headers { "\n\n" } else { "\n" };
    collect_failures(errors, sections.join(separator))
}

/// Execute `cd` command. No operand means home.
fn execute_cd(path: Option<PathArg>, fs: &mut VirtualFs) -> CommandResult {
    let path = path.unwrap_or_else(|| PathArg::from("~"));
    let resolved = fs.resolve(path.as_str());
    match fs.change_dir(&resolved) {
        Ok(()) => CommandResult::empty(),
        Err(e) => CommandError::fs("cd", path.as_str(), e).into(),
    }
}

/// Execute `cat`: all files or nothing.
fn execute_cat(paths: &[PathArg], fs: &VirtualFs) -> CommandResult {
    let mut contents = Vec::with_capacity(paths.len());
    for path in paths {
        let resolved = fs.resolve(path.as_str());
        let node = match fs.node(&resolved) {
            Ok(node) => node,
            Err(e) => return CommandError::fs("cat", path.as_str(), e).into(),
        };
        match node.content() {
            Some(content) => contents.push(content),
            None => {
                return CommandError::fs("cat", path.as_str(), FsError::IsADirectory { path: resolved })
                    .into();
            }
        }
    }
    CommandResult::output(join_contents(&contents))
}

/// Concatenate file contents, inserting a newline between two files only
/// when the earlier one does not already end with one.
fn join_contents(contents: &[&str]) -> String {
    let mut out = String::new();
    for content in contents {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(content);
    }
    out
}

/// Execute `echo`, writing `text` plus a newline when redirected.
fn execute_echo(text: String, redirect: Option<Redirect>, fs: &mut VirtualFs) -> CommandResult {
    let Some(Redirect { mode, target }) = redirect else {
        return CommandResult::output(text);
    };
    let target = strip_target_quotes(&target);
    let resolved = fs.resolve(target);
    let line = format!("{}\n", text);
    match fs.write(&resolved, &line, mode) {
        Ok(()) => CommandResult::empty(),
        Err(e) => CommandError::fs("echo", target, e).into(),
    }
}

fn strip_target_quotes(target: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|q| target.strip_prefix(*q)?.strip_suffix(*q))
        .filter(|inner| !inner.is_empty())
        .unwrap_or(target)
}

/// Execute `cp` or `mv`.
///
/// With several sources the destination must be an existing directory.
fn execute_transfer(command: &'static str, sources: &[PathArg], dst: &PathArg, fs: &mut VirtualFs) -> CommandResult {
    let dst_path = fs.resolve(dst.as_str());

    if sources.len() > 1 && !fs.lookup(&dst_path).is_some_and(|n| n.is_directory()) {
        let err = match fs.node(&dst_path) {
            Ok(_) => FsError::NotADirectory { path: dst_path },
            Err(e) => e,
        };
        return CommandError::fs(command, dst.as_str(), err).into();
    }

    for_each_operand(sources, |src| {
        let src_path = fs.resolve(src.as_str());
        let result = if command == "mv" {
            fs.move_node(&src_path, &dst_path)
        } else {
            fs.copy(&src_path, &dst_path)
        };
        result.map(|_| ()).map_err(|e| {
            // Errors on the source or one of its ancestors name the source.
            let operand = if src_path.starts_with(e.path()) { src } else { dst };
            CommandError::fs(command, operand.as_str(), e)
        })
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::{Action, execute_line};

    fn run(fs: &mut VirtualFs, line: &str) -> CommandResult {
        execute_line(fs, line)
    }

    #[test]
    fn test_pwd_and_whoami() {
        let mut fs = VirtualFs::new();
        assert_eq!(run(&mut fs, "pwd").text(), "/home/user");
        assert_eq!(run(&mut fs, "whoami").text(), "user");
    }

    #[test]
    fn test_ls_short_hides_dotfiles() {
        let mut fs = VirtualFs::new();
        assert_eq!(run(&mut fs, "ls").text(), "documents  projects  welcome.txt");
        assert_eq!(
            run(&mut fs, "ls -a").text(),
            ".bashrc  documents  projects  welcome.txt"
        );
    }

    #[test]
    fn test_ls_sorted_ordinally_interleaved() {
        let mut fs = VirtualFs::empty();
        run(&mut fs, "mkdir b Z");
        run(&mut fs, "touch a.txt C.txt");
        assert_eq!(run(&mut fs, "ls").text(), "C.txt  Z  a.txt  b");
    }

    #[test]
    fn test_ls_long() {
        let mut fs = VirtualFs::empty();
        run(&mut fs, "mkdir src");
        run(&mut fs, "echo hello > a.txt");
        let result = run(&mut fs, "ls -l");
        let lines: Vec<&str> = result.text().lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("-rw-r--r-- 1 user user      6 "));
        assert!(lines[0].ends_with(" a.txt"));
        assert!(lines[1].starts_with("drwxr-xr-x 1 user user   4096 "));
        assert!(lines[1].ends_with(" src"));
    }

    #[test]
    fn test_ls_file_and_missing() {
        let mut fs = VirtualFs::new();
        assert_eq!(run(&mut fs, "ls welcome.txt").text(), "welcome.txt");

        let result = run(&mut fs, "ls ghost");
        assert!(!result.success);
        assert_eq!(result.text(), "ls: ghost: No such file or directory");
    }

    #[test]
    fn test_ls_named_dotfile() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "ls .bashrc");
        assert!(result.success);
        assert_eq!(result.text(), ".bashrc");

        let result = run(&mut fs, "ls -l .bashrc");
        assert!(result.text().starts_with("-rw-r--r-- 1 user user "));
        assert!(result.text().ends_with(" .bashrc"));

        // Dotfiles inside a listed directory stay hidden
        run(&mut fs, "touch documents/.draft");
        assert_eq!(run(&mut fs, "ls documents").text(), "notes.md");
    }

    #[test]
    fn test_ls_multiple_operands() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "ls documents projects");
        assert_eq!(result.text(), "documents:\nnotes.md\n\nprojects:\n");
    }

    #[test]
    fn test_cd_home_and_failure() {
        let mut fs = VirtualFs::new();
        run(&mut fs, "cd /tmp");
        assert_eq!(run(&mut fs, "pwd").text(), "/tmp");
        run(&mut fs, "cd");
        assert_eq!(run(&mut fs, "pwd").text(), "/home/user");

        let result = run(&mut fs, "cd welcome.txt");
        assert!(!result.success);
        assert_eq!(result.text(), "cd: welcome.txt: Not a directory");
        assert!(result.hint.unwrap().contains("ls"));
    }

    #[test]
    fn test_mkdir_reports_each_failure() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "mkdir documents fresh missing/child");
        assert!(!result.success);
        assert_eq!(
            result.text(),
            "mkdir: documents: File exists\nmkdir: missing/child: No such file or directory"
        );
        assert!(fs.exists("fresh"));
    }

    #[test]
    fn test_touch_under_file_fails() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "touch welcome.txt/x");
        assert!(!result.success);
        assert_eq!(result.text(), "touch: welcome.txt/x: Not a directory");
    }

    #[test]
    fn test_rm_flags() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "rm documents");
        assert!(!result.success);
        assert!(result.hint.unwrap().contains("rm -r"));

        assert!(run(&mut fs, "rm -r documents").success);
        assert!(!fs.exists("documents"));

        assert!(!run(&mut fs, "rm ghost").success);
        assert!(run(&mut fs, "rm -f ghost").success);
        assert_eq!(run(&mut fs, "rm -f ghost").text(), "");
    }

    #[test]
    fn test_rm_root_refused() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "rm -rf /");
        assert!(!result.success);
        assert!(fs.exists("/home/user"));
    }

    #[test]
    fn test_cat_concatenates() {
        let mut fs = VirtualFs::new();
        run(&mut fs, "echo one > a.txt");
        run(&mut fs, "echo two > b.txt");
        assert_eq!(run(&mut fs, "cat a.txt b.txt").text(), "one\ntwo\n");
    }

    #[test]
    fn test_cat_inserts_separator_between_unterminated_files() {
        assert_eq!(join_contents(&["a", "b"]), "a\nb");
        assert_eq!(join_contents(&["a\n", "b"]), "a\nb");
        assert_eq!(join_contents(&["", "b"]), "b");
    }

    #[test]
    fn test_cat_all_or_nothing() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "cat welcome.txt ghost.txt");
        assert!(!result.success);
        assert_eq!(result.text(), "cat: ghost.txt: No such file or directory");

        let result = run(&mut fs, "cat welcome.txt documents");
        assert_eq!(result.text(), "cat: documents: Is a directory");
    }

    #[test]
    fn test_echo_plain() {
        let mut fs = VirtualFs::new();
        assert_eq!(run(&mut fs, "echo   hello    world").text(), "hello world");
        assert_eq!(run(&mut fs, "echo").text(), "");
    }

    #[test]
    fn test_echo_redirect_quoted_target() {
        let mut fs = VirtualFs::new();
        assert!(run(&mut fs, "echo hi > \"out.txt\"").success);
        assert_eq!(fs.read("out.txt").as_deref(), Some("hi\n"));
    }

    #[test]
    fn test_echo_redirect_to_directory_fails() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "echo hi > documents");
        assert!(!result.success);
        assert_eq!(result.text(), "echo: documents: Is a directory");
    }

    #[test]
    fn test_redirect_on_other_command_fails() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "ls > out.txt");
        assert!(!result.success);
        assert!(!fs.exists("out.txt"));
    }

    #[test]
    fn test_cp_and_mv() {
        let mut fs = VirtualFs::new();
        assert!(run(&mut fs, "cp welcome.txt copy.txt").success);
        assert!(run(&mut fs, "mv copy.txt projects").success);
        assert!(fs.exists("projects/copy.txt"));
        assert!(!fs.exists("copy.txt"));
    }

    #[test]
    fn test_cp_multiple_sources_needs_directory() {
        let mut fs = VirtualFs::new();
        run(&mut fs, "touch a b");
        let result = run(&mut fs, "cp a b welcome.txt");
        assert!(!result.success);
        assert_eq!(result.text(), "cp: welcome.txt: Not a directory");

        assert!(run(&mut fs, "cp a b projects").success);
        assert!(fs.exists("projects/a"));
        assert!(fs.exists("projects/b"));
    }

    #[test]
    fn test_cp_missing_source_names_source() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "cp ghost projects");
        assert_eq!(result.text(), "cp: ghost: No such file or directory");
    }

    #[test]
    fn test_cp_missing_destination_parent_names_destination() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "cp welcome.txt nowhere/x.txt");
        assert_eq!(result.text(), "cp: nowhere/x.txt: No such file or directory");
    }

    #[test]
    fn test_mv_into_itself() {
        let mut fs = VirtualFs::new();
        let result = run(&mut fs, "mv documents documents/sub");
        assert!(!result.success);
        assert_eq!(
            result.text(),
            "mv: documents: Cannot move a directory into itself"
        );
    }

    #[test]
    fn test_clear_help_history_date() {
        let mut fs = VirtualFs::new();
        assert_eq!(run(&mut fs, "clear").action, Action::ClearScreen);
        assert!(run(&mut fs, "help").text().contains("mkdir"));
        assert_eq!(
            run(&mut fs, "history").text(),
            "    1  clear\n    2  help\n    3  history"
        );
        assert!(run(&mut fs, "date").text().contains("UTC"));
    }
}
