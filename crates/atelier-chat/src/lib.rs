//! Chat widget backend for the Atelier site.
//!
//! Provides the per-tab chat session controller, the server-side reply
//! service that wraps the hosted language model, and the optional voice
//! input side channel.

pub mod error;
pub mod generator;
pub mod groq;
pub mod prompt;
pub mod remote;
pub mod session;
pub mod types;
pub mod voice;

pub use error::ChatError;
pub use generator::{CompletionClient, ReplyGenerator, ReplyService};
pub use groq::GroqClient;
pub use remote::RemoteReplyGenerator;
pub use session::ChatSession;
pub use types::{
    ChatMessage, ChatPhase, ChatSessionState, PromptMessage, ReplyEnvelope, ReplyOutcome, Role,
};
pub use voice::{SpeechRecognizer, VoiceInput, VoiceOutcome};
