//! Route handler functions.

use axum::extract::{Request, State};
use axum::response::Html;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_chat::{PromptMessage, ReplyOutcome, Role};
use atelier_core::i18n::localized;
use atelier_core::{Direction, Locale, Translations};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub started_at: DateTime<Utc>,
    pub llm_configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub chat_enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocaleInfo {
    pub tag: String,
    pub direction: Direction,
    pub display_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocalesResponse {
    pub default: String,
    pub locales: Vec<LocaleInfo>,
}

/// Request body for POST /api/chat.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<PromptMessage>,
}

// =============================================================================
// Handler functions
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        started_at: state.started_at,
        llm_configured: state.replies.is_configured(),
        model: state.replies.model().map(str::to_string),
        chat_enabled: state.config.chat.enabled,
    })
}

/// GET /api/locales
pub async fn locales(State(state): State<AppState>) -> Json<LocalesResponse> {
    let locales = state
        .resolver
        .supported()
        .iter()
        .map(|l| LocaleInfo {
            tag: l.tag().to_string(),
            direction: l.direction(),
            display_name: l.display_name().to_string(),
        })
        .collect();

    Json(LocalesResponse {
        default: state.resolver.default_locale().tag().to_string(),
        locales,
    })
}

/// POST /api/chat - generate the assistant's next turn.
///
/// Backend failures are a `200` with `{success:false, error}`; only invalid
/// input is rejected with an error status.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ReplyOutcome>, ApiError> {
    let chat = &state.config.chat;
    if !chat.enabled {
        return Err(ApiError::ServiceUnavailable("Chat is disabled".to_string()));
    }
    validate_history(&request.messages, chat.max_message_chars)?;

    tracing::debug!(turns = request.messages.len(), "Chat request");
    let outcome = state.replies.reply(&request.messages).await;
    Ok(Json(outcome))
}

fn validate_history(messages: &[PromptMessage], max_chars: usize) -> Result<(), ApiError> {
    if messages.is_empty() {
        return Err(ApiError::BadRequest(
            "Field 'messages' must not be empty".to_string(),
        ));
    }
    for (i, message) in messages.iter().enumerate() {
        if message.role == Role::System {
            return Err(ApiError::BadRequest(format!(
                "messages[{i}]: role 'system' is not accepted"
            )));
        }
        let len = message.content.chars().count();
        if len > max_chars {
            return Err(ApiError::UnprocessableEntity(format!(
                "messages[{i}] is {len} characters; the limit is {max_chars}"
            )));
        }
    }
    Ok(())
}

/// GET /{locale}[/...] - the localized page shell.
///
/// Only reached for requests the locale middleware let through, so the
/// locale extension is normally present. Asset-like paths are excluded from
/// locale routing and have no page.
pub async fn page(State(state): State<AppState>, req: Request) -> Result<Html<String>, ApiError> {
    let path = req.uri().path();
    let locale = req
        .extensions()
        .get::<Locale>()
        .copied()
        .or_else(|| state.resolver.locale_from_path(path))
        .filter(|_| !state.resolver.is_excluded(path))
        .ok_or_else(|| ApiError::NotFound(format!("No page at {path}")))?;

    Ok(Html(render_page(locale, path, state.resolver.supported())))
}

/// Fallback for anything the router does not know.
pub async fn not_found(req: Request) -> ApiError {
    ApiError::NotFound(format!("No route for {}", req.uri().path()))
}

// =============================================================================
// Page shell
// =============================================================================

fn render_page(locale: Locale, path: &str, supported: &[Locale]) -> String {
    let text = |pick: fn(&Translations) -> &'static str| escape_html(localized(locale, pick));
    let tag = locale.tag();
    let rest = path
        .strip_prefix('/')
        .and_then(|p| p.strip_prefix(tag))
        .unwrap_or("");

    let switcher: String = supported
        .iter()
        .filter(|l| **l != locale)
        .map(|l| {
            format!(
                r#"<a href="/{}{}" hreflang="{}" lang="{}">{}</a>"#,
                l.tag(),
                escape_html(rest),
                l.tag(),
                l.tag(),
                escape_html(l.display_name())
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="{tag}" dir="{dir}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
<header>
<nav>
<a href="/{tag}">{home}</a>
<a href="/{tag}/services">{services}</a>
<a href="/{tag}/pricing">{pricing}</a>
<a href="/{tag}/contact">{contact}</a>
</nav>
<div class="locale-switcher">{switcher}</div>
</header>
<main>
<h1>{title}</h1>
<p>{tagline}</p>
</main>
<aside id="chat" data-locale="{tag}">
<p class="chat-greeting">{greeting}</p>
<input type="text" placeholder="{placeholder}">
</aside>
</body>
</html>
"#,
        dir = locale.direction(),
        title = text(|t| t.site.title),
        home = text(|t| t.site.nav_home),
        services = text(|t| t.site.nav_services),
        pricing = text(|t| t.site.nav_pricing),
        contact = text(|t| t.site.nav_contact),
        tagline = text(|t| t.site.tagline),
        greeting = text(|t| t.chat.greeting),
        placeholder = text(|t| t.chat.placeholder),
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

// =============================================================================
// Tests
// =============================================================================
