//! Optional speech-to-text side input for the chat widget.
//!
//! Speech recognition only exists on some runtimes, so the capability is
//! injected as an `Option`. Absence is a normal outcome reported as a notice.
//! One recognition runs at a time; toggling while listening cancels it
//! through its [`CancellationToken`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use atelier_core::i18n::localized;
use atelier_core::Locale;

use crate::error::ChatError;

/// A platform speech recognizer.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capture one utterance in `language` (e.g. `ar-SA`) and return its
    /// transcript.
    ///
    /// Implementations must return [`ChatError::VoiceCancelled`] promptly
    /// once `cancel` fires.
    async fn recognize(&self, language: &str, cancel: CancellationToken)
        -> Result<String, ChatError>;
}

/// Result of one [`VoiceInput::toggle`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// A transcript was captured and placed in the pending input.
    Transcribed(String),
    /// This call stopped an active recognition.
    Stopped,
    /// The recognition started by this call was stopped by a later call.
    Cancelled,
    /// No recognizer on this runtime.
    Unavailable { notice: String },
    /// Recognition failed.
    Failed { notice: String },
}

impl VoiceOutcome {
    /// User-facing notice to display, if any.
    pub fn notice(&self) -> Option<&str> {
        match self {
            VoiceOutcome::Unavailable { notice } | VoiceOutcome::Failed { notice } => Some(notice),
            _ => None,
        }
    }
}

#[derive(Default)]
struct VoiceState {
    listening: bool,
    cancel: Option<CancellationToken>,
    /// Bumped for every started recognition so a stale one cannot clear a
    /// newer one's state.
    generation: u64,
    pending_input: String,
}

/// Voice input controller. One per chat session.
pub struct VoiceInput {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    state: Mutex<VoiceState>,
}

impl VoiceInput {
    pub fn new(recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        Self {
            recognizer,
            state: Mutex::new(VoiceState::default()),
        }
    }

    /// A controller with no recognizer.
    pub fn unavailable() -> Self {
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.recognizer.is_some()
    }

    pub fn is_listening(&self) -> bool {
        self.lock().listening
    }

    /// Text waiting in the input box.
    pub fn pending_input(&self) -> String {
        self.lock().pending_input.clone()
    }

    /// Take the pending input, leaving it empty.
    pub fn take_pending_input(&self) -> String {
        std::mem::take(&mut self.lock().pending_input)
    }

    /// Replace the pending input, e.g. when the visitor types.
    pub fn set_pending_input(&self, text: impl Into<String>) {
        self.lock().pending_input = text.into();
    }

    /// Start listening, or stop if already listening.
    ///
    /// A transcript fills the pending input; it is never sent automatically.
    pub async fn toggle(&self, locale: Locale) -> VoiceOutcome {
        let Some(recognizer) = self.recognizer.clone() else {
            return VoiceOutcome::Unavailable {
                notice: localized(locale, |t| t.voice.unsupported).to_string(),
            };
        };

        let (token, generation) = {
            let mut state = self.lock();
            if state.listening {
                if let Some(token) = state.cancel.take() {
                    token.cancel();
                }
                state.listening = false;
                tracing::debug!("Voice capture stopped by toggle");
                return VoiceOutcome::Stopped;
            }
            let token = CancellationToken::new();
            state.generation += 1;
            state.listening = true;
            state.cancel = Some(token.clone());
            (token, state.generation)
        };

        tracing::debug!(language = locale.speech_language(), "Voice capture started");
        let result = recognizer
            .recognize(locale.speech_language(), token.clone())
            .await;

        let mut state = self.lock();
        if state.generation == generation {
            state.listening = false;
            state.cancel = None;
        }

        match result {
            Ok(text) if !text.trim().is_empty() => {
                let text = text.trim().to_string();
                state.pending_input = text.clone();
                VoiceOutcome::Transcribed(text)
            }
            Ok(_) => VoiceOutcome::Failed {
                notice: localized(locale, |t| t.voice.failed).to_string(),
            },
            Err(ChatError::VoiceCancelled) => VoiceOutcome::Cancelled,
            // Capability present but unusable right now, e.g. microphone
            // permission denied.
            Err(ChatError::VoiceUnavailable) => VoiceOutcome::Unavailable {
                notice: localized(locale, |t| t.voice.unsupported).to_string(),
            },
            Err(e) if token.is_cancelled() => {
                tracing::debug!(error = %e, "Voice capture ended after cancellation");
                VoiceOutcome::Cancelled
            }
            Err(e) => {
                tracing::warn!(error = %e, "Voice capture failed");
                VoiceOutcome::Failed {
                    notice: localized(locale, |t| t.voice.failed).to_string(),
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, VoiceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for VoiceInput {
    fn default() -> Self {
        Self::unavailable()
    }
}

// =============================================================================
// Tests
// =============================================================================
