//! History expansion (`!!` → last line, `!n` → n-th line, `!-n` → n-th from last).

use super::ParseError;
use super::lexer::{Lexer, Token};
use crate::config::MAX_EXPANDED_LINE;
use crate::core::filesystem::WriteMode;

/// Expand history references in tokens.
///
/// Returns the expanded tokens and whether any reference was expanded.
/// Lines are numbered from 1, as printed by `history`. An expansion whose
/// text would pass [`MAX_EXPANDED_LINE`] bytes is rejected.
pub fn expand_tokens(tokens: Vec<Token>, history: &[String]) -> Result<(Vec<Token>, bool), ParseError> {
    let mut expanded = Vec::with_capacity(tokens.len());
    let mut changed = false;
    let mut length = 0;

    for token in tokens {
        let line = match token {
            Token::HistoryLast => history.last().ok_or_else(|| ParseError::EventNotFound {
                reference: "!!".to_string(),
            })?,
            Token::HistoryIndex(n) => lookup(history, n).ok_or_else(|| ParseError::EventNotFound {
                reference: format!("!{}", n),
            })?,
            other => {
                length += text_len(&other);
                expanded.push(other);
                continue;
            }
        };

        // Re-tokenize the recalled line (without further history expansion)
        for recalled in Lexer::new(line).filter(|t| !matches!(t, Token::HistoryLast | Token::HistoryIndex(_))) {
            length += text_len(&recalled);
            expanded.push(recalled);
        }
        changed = true;

        if length > MAX_EXPANDED_LINE {
            return Err(ParseError::ExpansionTooLong {
                limit: MAX_EXPANDED_LINE,
            });
        }
    }

    Ok((expanded, changed))
}

/// Bytes a token adds to the canonical line, counting its leading space.
fn text_len(token: &Token) -> usize {
    let text = match token {
        Token::Word(w) => w.len(),
        Token::Redirect(WriteMode::Overwrite) => 1,
        Token::Redirect(WriteMode::Append) => 2,
        Token::HistoryLast => 2,
        Token::HistoryIndex(n) => n.to_string().len() + 1,
    };
    text + 1
}

fn lookup(history: &[String], n: i32) -> Option<&String> {
    let idx = if n > 0 {
        usize::try_from(n - 1).ok()?
    } else if n < 0 {
        history.len().checked_sub(n.unsigned_abs() as usize)?
    } else {
        return None;
    };
    history.get(idx)
}

// =============================================================================
// Tests
// =============================================================================
