//! Locale resolution for inbound page requests.
//!
//! Maps every routed request path onto a locale-prefixed path. A locale
//! already present in the path wins; otherwise the visitor's cookie, then
//! their `Accept-Language` header, then the configured default decide, and
//! the caller is told to redirect and pin the choice in a cookie.

pub mod cookie;
pub mod error;
pub mod matcher;
pub mod negotiate;
pub mod resolver;

pub use cookie::LocaleCookie;
pub use error::LocaleError;
pub use matcher::PathMatcher;
pub use negotiate::{negotiate, parse_accept_language, LanguageRange};
pub use resolver::{LocaleAction, LocaleRequest, LocaleResolver, PreferenceSource, Resolution};
