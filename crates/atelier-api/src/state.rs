//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use atelier_chat::ReplyService;
use atelier_core::AtelierConfig;
use atelier_locale::{LocaleError, LocaleResolver};

/// Shared application state.
///
/// Everything is read-only after startup, so fields are plain `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AtelierConfig>,
    /// Locale resolver used by the routing middleware.
    pub resolver: Arc<LocaleResolver>,
    /// Server-side reply generation.
    pub replies: Arc<ReplyService>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: AtelierConfig, resolver: LocaleResolver, replies: ReplyService) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            replies: Arc::new(replies),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Build the state, constructing the resolver from `config`.
    pub fn from_config(config: AtelierConfig, replies: ReplyService) -> Result<Self, LocaleError> {
        let resolver = LocaleResolver::from_config(&config)?;
        Ok(Self::new(config, resolver, replies))
    }
}
