//! Router setup with all routes and middleware.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use atelier_core::config::ServerConfig;
use atelier_core::{AtelierConfig, AtelierError};

use crate::handlers;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// The locale middleware wraps every route and the fallback, so unprefixed
/// paths are redirected before routing decides they do not exist.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);
    let limiter = RateLimiter::new(state.config.server.rate_limit_per_sec);

    let chat_routes = Router::new()
        .route("/api/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(axum::middleware::from_fn(
            crate::rate_limit::rate_limit_middleware,
        ))
        .layer(axum::Extension(limiter));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/locales", get(handlers::locales))
        .merge(chat_routes)
        .route("/{locale}", get(handlers::page))
        .route("/{locale}/", get(handlers::page))
        .route("/{locale}/{*rest}", get(handlers::page))
        .fallback(handlers::not_found)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::locale::resolve_locale,
        ))
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins, or the local dev origins when none are
/// configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<String> = if server.allowed_origins.is_empty() {
        vec![
            format!("http://127.0.0.1:{}", server.port),
            format!("http://localhost:{}", server.port),
        ]
    } else {
        server.allowed_origins.clone()
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ACCEPT_LANGUAGE])
}

/// Bind to the configured address and serve until the process is stopped.
pub async fn start_server(config: &AtelierConfig, state: AppState) -> Result<(), AtelierError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let router = create_router(state);

    tracing::info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AtelierError::Api(format!("Failed to bind {addr}: {e}")))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| AtelierError::Api(format!("Server error: {e}")))?;

    Ok(())
}
