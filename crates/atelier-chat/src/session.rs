//! Chat session controller.
//!
//! One [`ChatSession`] backs one chat widget instance. State lives in a
//! `watch` channel so the UI can render snapshots as they change. Every
//! mutation is a short `send_modify`; none is held across the await on the
//! reply generator.

use std::sync::Arc;

use tokio::sync::watch;

use atelier_core::{translations, Locale};

use crate::generator::ReplyGenerator;
use crate::types::{ChatMessage, ChatPhase, ChatSessionState, PromptMessage, ReplyOutcome};
use crate::voice::{VoiceInput, VoiceOutcome};

pub struct ChatSession {
    generator: Arc<dyn ReplyGenerator>,
    locale: Locale,
    state: watch::Sender<ChatSessionState>,
    voice: VoiceInput,
}

impl ChatSession {
    /// Create a closed, empty session without voice input.
    pub fn new(generator: Arc<dyn ReplyGenerator>, locale: Locale) -> Self {
        Self::with_voice(generator, locale, VoiceInput::unavailable())
    }

    pub fn with_voice(generator: Arc<dyn ReplyGenerator>, locale: Locale, voice: VoiceInput) -> Self {
        let (state, _) = watch::channel(ChatSessionState::default());
        Self {
            generator,
            locale,
            state,
            voice,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Current state snapshot.
    pub fn state(&self) -> ChatSessionState {
        self.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<ChatSessionState> {
        self.state.subscribe()
    }

    pub fn phase(&self) -> ChatPhase {
        self.state.borrow().phase()
    }

    pub fn open(&self) {
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.is_open, true));
    }

    /// Close the widget. History is kept.
    pub fn close(&self) {
        self.state.send_if_modified(|s| std::mem::replace(&mut s.is_open, false));
    }

    pub fn toggle(&self) {
        self.state.send_modify(|s| s.is_open = !s.is_open);
    }

    /// Send a visitor message and wait for the reply.
    ///
    /// Returns the assistant message that was appended, or `None` when
    /// `text` is blank. Failures are appended as a localized apology and
    /// recorded in `error`; they are never returned as `Err`.
    pub async fn send_message(&self, text: &str) -> Option<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let user = ChatMessage::user(text);
        let mut history = Vec::new();
        self.state.send_modify(|s| {
            s.messages.push(user);
            s.is_loading = true;
            s.error = None;
            history = s.messages.iter().map(PromptMessage::from).collect();
        });

        tracing::debug!(locale = %self.locale, turns = history.len(), "Sending chat message");
        let outcome = self.generator.generate(history).await;

        let reply = match outcome {
            Ok(ReplyOutcome::Success { content }) => Ok(ChatMessage::assistant(content)),
            Ok(ReplyOutcome::Failure { error }) => Err(error),
            Err(e) => Err(e.to_string()),
        };

        let strings = &translations(self.locale).chat;
        let (message, error) = match reply {
            Ok(message) => (message, None),
            Err(reason) => {
                let reason = if reason.trim().is_empty() {
                    strings.unknown_error.to_string()
                } else {
                    reason
                };
                tracing::warn!(locale = %self.locale, error = %reason, "Chat reply failed");
                (ChatMessage::assistant(strings.apology(&reason)), Some(reason))
            }
        };

        self.state.send_modify(|s| {
            s.messages.push(message.clone());
            s.is_loading = false;
            s.error = error;
        });
        Some(message)
    }

    /// Drop the history and any error.
    pub fn clear_messages(&self) {
        self.state.send_modify(|s| {
            s.messages.clear();
            s.error = None;
        });
    }

    /// Toggle speech capture in the session's language.
    pub async fn voice_input(&self) -> VoiceOutcome {
        self.voice.toggle(self.locale).await
    }

    pub fn voice(&self) -> &VoiceInput {
        &self.voice
    }

    pub fn pending_input(&self) -> String {
        self.voice.pending_input()
    }

    pub fn take_pending_input(&self) -> String {
        self.voice.take_pending_input()
    }
}

// =============================================================================
// Tests
// =============================================================================
