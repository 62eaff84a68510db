//! Atelier HTTP server: locale routing middleware, the chat endpoint, the
//! localized page shell, and health checks.

pub mod error;
pub mod handlers;
pub mod locale;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
