use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Messages
// =============================================================================

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Server-side instructions. Never stored in a session.
    System,
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a chat session. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A message as sent to the language model: role and content only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl From<&ChatMessage> for PromptMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role,
            content: msg.content.clone(),
        }
    }
}

// =============================================================================
// Session state
// =============================================================================

/// Snapshot of one chat session as the UI renders it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionState {
    pub is_open: bool,
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatSessionState {
    /// The state machine position this snapshot represents.
    pub fn phase(&self) -> ChatPhase {
        if !self.is_open {
            ChatPhase::Closed
        } else if self.is_loading {
            ChatPhase::OpenSending
        } else if self.error.is_some() {
            ChatPhase::OpenError
        } else {
            ChatPhase::OpenIdle
        }
    }
}

/// Position of a session in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatPhase {
    Closed,
    OpenIdle,
    OpenSending,
    OpenError,
}

impl fmt::Display for ChatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatPhase::Closed => write!(f, "Closed"),
            ChatPhase::OpenIdle => write!(f, "Open-Idle"),
            ChatPhase::OpenSending => write!(f, "Open-Sending"),
            ChatPhase::OpenError => write!(f, "Open-Error"),
        }
    }
}

// =============================================================================
// Reply outcome
// =============================================================================

/// Result of the generate-reply operation.
///
/// Serialized as [`ReplyEnvelope`]: `{"success":true,"content":...}` or
/// `{"success":false,"error":...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "ReplyEnvelope", try_from = "ReplyEnvelope")]
pub enum ReplyOutcome {
    Success { content: String },
    Failure { error: String },
}

impl ReplyOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        ReplyOutcome::Success {
            content: content.into(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ReplyOutcome::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReplyOutcome::Success { .. })
    }
}

/// Wire form of [`ReplyOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ReplyOutcome> for ReplyEnvelope {
    fn from(outcome: ReplyOutcome) -> Self {
        match outcome {
            ReplyOutcome::Success { content } => ReplyEnvelope {
                success: true,
                content: Some(content),
                error: None,
            },
            ReplyOutcome::Failure { error } => ReplyEnvelope {
                success: false,
                content: None,
                error: Some(error),
            },
        }
    }
}

impl TryFrom<ReplyEnvelope> for ReplyOutcome {
    type Error = String;

    fn try_from(envelope: ReplyEnvelope) -> Result<Self, Self::Error> {
        match envelope {
            ReplyEnvelope {
                success: true,
                content: Some(content),
                ..
            } => Ok(ReplyOutcome::Success { content }),
            ReplyEnvelope { success: true, .. } => {
                Err("successful reply is missing 'content'".to_string())
            }
            ReplyEnvelope { error, .. } => Ok(ReplyOutcome::Failure {
                error: error.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_constructors() {
        let a = ChatMessage::user("hello");
        let b = ChatMessage::assistant("hi there");
        assert_eq!(a.role, Role::User);
        assert_eq!(b.role, Role::Assistant);
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_prompt_message_strips_metadata() {
        let msg = ChatMessage::user("What are your pricing options?");
        let prompt = PromptMessage::from(&msg);
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"role": "user", "content": "What are your pricing options?"})
        );
    }

    #[test]
    fn test_state_serializes_camel_case() {
        let state = ChatSessionState {
            is_open: true,
            ..ChatSessionState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["isOpen"], true);
        assert_eq!(json["isLoading"], false);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = ChatSessionState::default();
        assert_eq!(state.phase(), ChatPhase::Closed);

        state.is_open = true;
        assert_eq!(state.phase(), ChatPhase::OpenIdle);

        state.is_loading = true;
        assert_eq!(state.phase(), ChatPhase::OpenSending);

        state.is_loading = false;
        state.error = Some("boom".to_string());
        assert_eq!(state.phase(), ChatPhase::OpenError);

        state.is_open = false;
        assert_eq!(state.phase(), ChatPhase::Closed);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ChatPhase::OpenSending.to_string(), "Open-Sending");
        assert_eq!(ChatPhase::Closed.to_string(), "Closed");
    }

    #[test]
    fn test_reply_outcome_wire_format() {
        let ok = serde_json::to_value(ReplyOutcome::success("We offer...")).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "content": "We offer..."}));

        let err = serde_json::to_value(ReplyOutcome::failure("Groq API key not configured."))
            .unwrap();
        assert_eq!(
            err,
            serde_json::json!({"success": false, "error": "Groq API key not configured."})
        );
    }

    #[test]
    fn test_reply_outcome_parse() {
        let ok: ReplyOutcome =
            serde_json::from_str(r#"{"success":true,"content":"hi"}"#).unwrap();
        assert_eq!(ok, ReplyOutcome::success("hi"));

        let err: ReplyOutcome = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(err, ReplyOutcome::failure(""));

        assert!(serde_json::from_str::<ReplyOutcome>(r#"{"success":true}"#).is_err());
    }
}
