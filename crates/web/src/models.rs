//! Session-scoped view models.

use jangada_core::ChatMessage;
use serde::{Deserialize, Serialize};

/// The authenticated admin, as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Normalized (trimmed, lowercased) email address.
    pub email: String,
}

/// The chat transcript, as stored in the session.
///
/// Append-only within a session; a new session starts empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
}

/// Session storage keys.
pub mod session_keys {
    /// Key for the current admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
    /// Key for the chat transcript.
    pub const CHAT_TRANSCRIPT: &str = "chat_transcript";
}
