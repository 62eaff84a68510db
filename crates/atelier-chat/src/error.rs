//! Error types for the chat widget backend.

use atelier_core::error::AtelierError;

/// Errors from reply generation and voice input.
///
/// The `Display` text of each variant is what visitors see inside the
/// apology message, so it stays short and plain.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Groq API key not configured.")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("LLM API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid LLM response: {0}")]
    InvalidResponse(String),
    #[error("voice input is not available")]
    VoiceUnavailable,
    #[error("voice error: {0}")]
    Voice(String),
    #[error("voice capture cancelled")]
    VoiceCancelled,
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::InvalidResponse(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<ChatError> for AtelierError {
    fn from(err: ChatError) -> Self {
        AtelierError::Chat(err.to_string())
    }
}
