//! Lexer for tokenizing shell input.
//!
//! Handles:
//! - Word tokenization on ASCII whitespace
//! - Output redirection (`>`, `>>`), also when glued to a word
//! - History references (`!!`, `!n`, `!-n`) at the start of a word
//!
//! There is no quoting: quote characters are ordinary word characters.

use crate::core::filesystem::WriteMode;

// =============================================================================
// Token Types
// =============================================================================

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A word (command name or argument)
    Word(String),
    /// `>` (overwrite) or `>>` (append)
    Redirect(WriteMode),
    /// Last command `!!`
    HistoryLast,
    /// History by number `!n` or `!-n`
    HistoryIndex(i32),
}

// =============================================================================
// Lexer
// =============================================================================

/// Lexer for tokenizing shell input
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenize the entire input into a vector
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        self.pos += rest.len() - trimmed.len();
    }

    fn next_token(&mut self) -> Option<Token> {
        let rest = self.rest();

        if rest.starts_with(">>") {
            self.pos += 2;
            return Some(Token::Redirect(WriteMode::Append));
        }
        if rest.starts_with('>') {
            self.pos += 1;
            return Some(Token::Redirect(WriteMode::Overwrite));
        }
        if rest.starts_with('!') {
            if let Some(token) = self.parse_history() {
                return Some(token);
            }
        }
        self.parse_word()
    }

    /// `!!`, `!n` or `!-n` standing alone as a word; anything else is left
    /// for [`parse_word`](Self::parse_word).
    fn parse_history(&mut self) -> Option<Token> {
        let word_len = self.rest().find(is_word_boundary).unwrap_or(self.rest().len());
        let word = &self.rest()[..word_len];
        let reference = &word[1..];

        let token = if reference == "!" {
            Token::HistoryLast
        } else if is_history_number(reference) {
            Token::HistoryIndex(reference.parse().ok()?)
        } else {
            return None;
        };

        self.pos += word_len;
        Some(token)
    }

    fn parse_word(&mut self) -> Option<Token> {
        let len = self.rest().find(is_word_boundary).unwrap_or(self.rest().len());
        if len == 0 {
            return None;
        }
        let word = self.rest()[..len].to_string();
        self.pos += len;
        Some(Token::Word(word))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.input.len() {
            return None;
        }
        self.next_token()
    }
}

fn is_word_boundary(c: char) -> bool {
    c.is_ascii_whitespace() || c == '>'
}

/// `n` or `-n` with at least one digit.
fn is_history_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Tests
// =============================================================================
