//! Chat assistant transcript types.

use serde::{Deserialize, Serialize};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The site visitor.
    User,
    /// The assistant reply.
    Assistant,
}

/// A cited source attached to an assistant reply.
///
/// Duplicates are allowed; the transcript renders them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub uri: String,
    pub title: String,
}

/// One entry in the assistant transcript.
///
/// The transcript is an append-only sequence scoped to a browser session;
/// it is never persisted across reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceLink>,
}

impl ChatMessage {
    /// A visitor message.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            sources: Vec::new(),
        }
    }

    /// An assistant reply with optional cited sources.
    #[must_use]
    pub fn assistant(text: impl Into<String>, sources: Vec<SourceLink>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
            sources,
        }
    }
}
