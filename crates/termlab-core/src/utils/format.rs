//! Formatting utilities for listings, dates, and history.

use chrono::{DateTime, Utc};

use crate::config::{DIR_DISPLAY_SIZE, DIR_PERMISSIONS, FILE_PERMISSIONS, USERNAME};
use crate::models::DirEntry;

/// Format a timestamp for `ls -l` (e.g., "Jan  5 12:34").
pub fn format_date_short(ts: &DateTime<Utc>) -> String {
    ts.format("%b %e %H:%M").to_string()
}

/// Format a timestamp for `date` (e.g., "Mon Jan  5 12:34:56 UTC 2026").
pub fn format_date_full(ts: &DateTime<Utc>) -> String {
    ts.format("%a %b %e %H:%M:%S UTC %Y").to_string()
}

/// One `ls -l` line: permissions, link count, owner, group, size, date, name.
///
/// Directories show a fixed placeholder size instead of a content length.
pub fn format_long_entry(entry: &DirEntry) -> String {
    let (perms, size) = if entry.is_dir {
        (DIR_PERMISSIONS, DIR_DISPLAY_SIZE)
    } else {
        (FILE_PERMISSIONS, entry.size)
    };
    format!(
        "{} 1 {} {} {:>6} {} {}",
        perms,
        USERNAME,
        USERNAME,
        size,
        format_date_short(&entry.modified_at),
        entry.name
    )
}

/// `history` output: right-aligned 1-based numbers, two spaces, the line.
pub fn format_history(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:>5}  {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}
