//! Locale routing middleware.
//!
//! Every request that is not excluded must carry a supported locale as its
//! first path segment. Requests without one are redirected with `302 Found`
//! and the chosen locale is pinned in a cookie. Requests with one continue
//! with the [`Locale`] attached as a request extension.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use atelier_core::Locale;
use atelier_locale::{LocaleAction, LocaleCookie, LocaleRequest};

use crate::state::AppState;

pub async fn resolve_locale(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if state.resolver.is_excluded(req.uri().path()) {
        return next.run(req).await;
    }

    let cookie = cookie_header(req.headers());
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let resolution = state.resolver.resolve(&LocaleRequest {
        path: req.uri().path(),
        query: req.uri().query(),
        cookie: cookie.as_deref(),
        accept_language,
    });

    match resolution.action {
        LocaleAction::Continue => {
            req.extensions_mut().insert::<Locale>(resolution.locale);
            next.run(req).await
        }
        LocaleAction::Redirect { location, cookie } => redirect(&location, &cookie),
    }
}

/// All `Cookie` headers joined into one list. HTTP/2 clients may split
/// cookies across several header fields.
fn cookie_header(headers: &HeaderMap) -> Option<String> {
    let joined = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    (!joined.is_empty()).then_some(joined)
}

fn redirect(location: &str, cookie: &LocaleCookie) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie.to_header_value()),
            (header::VARY, "Cookie, Accept-Language".to_string()),
        ],
    )
        .into_response()
}
