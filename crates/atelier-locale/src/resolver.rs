//! Per-request locale resolution.

use atelier_core::config::{AtelierConfig, Environment, LocaleConfig};
use atelier_core::Locale;

use crate::cookie::{read_cookie, LocaleCookie};
use crate::error::LocaleError;
use crate::matcher::PathMatcher;
use crate::negotiate::negotiate;

/// The parts of an HTTP request the resolver looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleRequest<'a> {
    /// Request path, starting with `/`.
    pub path: &'a str,
    /// Raw query string without the leading `?`.
    pub query: Option<&'a str>,
    /// `Cookie` header value.
    pub cookie: Option<&'a str>,
    /// `Accept-Language` header value.
    pub accept_language: Option<&'a str>,
}

impl<'a> LocaleRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn with_query(mut self, query: &'a str) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_cookie(mut self, cookie: &'a str) -> Self {
        self.cookie = Some(cookie);
        self
    }

    pub fn with_accept_language(mut self, accept_language: &'a str) -> Self {
        self.accept_language = Some(accept_language);
        self
    }
}

/// Where the resolved locale came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSource {
    /// The path already carried a locale segment.
    Path,
    /// A locale cookie from an earlier visit.
    Cookie,
    /// `Accept-Language` negotiation.
    Header,
    /// Nothing matched.
    Default,
}

/// What the caller should do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleAction {
    /// Serve the request as is.
    Continue,
    /// Redirect to `location` and set `cookie`.
    Redirect {
        location: String,
        cookie: LocaleCookie,
    },
}

/// Outcome of [`LocaleResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub locale: Locale,
    pub source: PreferenceSource,
    pub action: LocaleAction,
}

impl Resolution {
    pub fn is_redirect(&self) -> bool {
        matches!(self.action, LocaleAction::Redirect { .. })
    }
}

/// Stateless locale resolver, built once at startup and shared across
/// requests.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    supported: Vec<Locale>,
    default: Locale,
    cookie_name: String,
    cookie_max_age_secs: u64,
    secure_cookie: bool,
    matcher: PathMatcher,
}

impl LocaleResolver {
    /// Build a resolver from the `[locale]` config section.
    pub fn new(config: &LocaleConfig, environment: Environment) -> Result<Self, LocaleError> {
        if config.supported.is_empty() {
            return Err(LocaleError::NoSupportedLocales);
        }
        if !config.supported.contains(&config.default) {
            return Err(LocaleError::DefaultNotSupported(config.default));
        }
        let matcher = PathMatcher::new(&config.excluded_patterns)?;

        let mut supported = Vec::with_capacity(config.supported.len());
        for locale in &config.supported {
            if !supported.contains(locale) {
                supported.push(*locale);
            }
        }

        Ok(Self {
            supported,
            default: config.default,
            cookie_name: config.cookie_name.clone(),
            cookie_max_age_secs: config.cookie_max_age_secs,
            secure_cookie: environment.is_production(),
            matcher,
        })
    }

    /// Build a resolver from the full application config.
    pub fn from_config(config: &AtelierConfig) -> Result<Self, LocaleError> {
        Self::new(&config.locale, config.server.environment)
    }

    pub fn supported(&self) -> &[Locale] {
        &self.supported
    }

    pub fn default_locale(&self) -> Locale {
        self.default
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Whether the path bypasses locale routing entirely.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.matcher.is_excluded(path)
    }

    /// The supported locale named by the first path segment, if any.
    ///
    /// `/ar` and `/ar/pricing` match; `/arabic` and `/AR` do not.
    pub fn locale_from_path(&self, path: &str) -> Option<Locale> {
        let rest = path.strip_prefix('/')?;
        let segment = rest.split('/').next().unwrap_or(rest);
        self.supported
            .iter()
            .copied()
            .find(|l| l.tag() == segment)
    }

    /// The visitor's preferred locale: cookie, then header, then default.
    pub fn preferred_locale(
        &self,
        cookie_header: Option<&str>,
        accept_language: Option<&str>,
    ) -> (Locale, PreferenceSource) {
        let from_cookie = cookie_header
            .and_then(|h| read_cookie(h, &self.cookie_name))
            .and_then(Locale::from_tag)
            .filter(|l| self.supported.contains(l));
        if let Some(locale) = from_cookie {
            return (locale, PreferenceSource::Cookie);
        }

        match negotiate(accept_language, &self.supported, self.default) {
            Some(locale) => (locale, PreferenceSource::Header),
            None => (self.default, PreferenceSource::Default),
        }
    }

    /// The cookie that pins `locale` for a year.
    pub fn cookie_for(&self, locale: Locale) -> LocaleCookie {
        LocaleCookie {
            name: self.cookie_name.clone(),
            value: locale,
            max_age_secs: self.cookie_max_age_secs,
            secure: self.secure_cookie,
        }
    }

    /// Resolve a request to a locale and an action.
    ///
    /// Never fails: anything unparseable degrades to the default locale.
    pub fn resolve(&self, request: &LocaleRequest<'_>) -> Resolution {
        if let Some(locale) = self.locale_from_path(request.path) {
            return Resolution {
                locale,
                source: PreferenceSource::Path,
                action: LocaleAction::Continue,
            };
        }

        let (locale, source) = self.preferred_locale(request.cookie, request.accept_language);
        let location = redirect_location(locale, request.path, request.query);
        tracing::debug!(
            path = request.path,
            locale = %locale,
            source = ?source,
            location = %location,
            "Redirecting to localized path"
        );

        Resolution {
            locale,
            source,
            action: LocaleAction::Redirect {
                location,
                cookie: self.cookie_for(locale),
            },
        }
    }
}

/// `/{locale}{path}`, with `/` mapping to `/{locale}` and the query kept.
fn redirect_location(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut location = format!("/{}", locale.tag());
    match path {
        "" | "/" => {}
        p if p.starts_with('/') => location.push_str(p),
        p => {
            location.push('/');
            location.push_str(p);
        }
    }
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        location.push('?');
        location.push_str(q);
    }
    location
}
