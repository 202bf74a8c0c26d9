//! Command execution result type.

use serde::Serialize;

use crate::core::error::CommandError;

/// What the rendering surface should do with a result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Action {
    /// Write the text verbatim (may be empty).
    Print(String),
    /// Clear the display instead of printing anything.
    ClearScreen,
}

/// Result of executing one input line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    pub action: Action,
    pub success: bool,
    /// Advisory guidance, shown apart from the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CommandResult {
    /// Successful result printing `text`.
    pub fn output(text: impl Into<String>) -> Self {
        Self {
            action: Action::Print(text.into()),
            success: true,
            hint: None,
        }
    }

    /// Successful result with no output.
    pub fn empty() -> Self {
        Self::output(String::new())
    }

    pub fn clear_screen() -> Self {
        Self {
            action: Action::ClearScreen,
            success: true,
            hint: None,
        }
    }

    /// Failed result with a message and optional hint.
    pub fn failure(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            action: Action::Print(message.into()),
            success: false,
            hint,
        }
    }

    /// Printed text; empty for [`Action::ClearScreen`].
    pub fn text(&self) -> &str {
        match &self.action {
            Action::Print(text) => text,
            Action::ClearScreen => "",
        }
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        Self::failure(err.to_string(), err.hint())
    }
}
