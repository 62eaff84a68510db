//! Error types for locale resolver construction.
//!
//! Resolution itself never fails; these only surface at startup.

use atelier_core::error::AtelierError;
use atelier_core::Locale;

/// Errors from building a [`crate::LocaleResolver`].
#[derive(Debug, thiserror::Error)]
pub enum LocaleError {
    #[error("no supported locales configured")]
    NoSupportedLocales,
    #[error("default locale '{0}' is not a supported locale")]
    DefaultNotSupported(Locale),
    #[error("invalid exclusion pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl From<LocaleError> for AtelierError {
    fn from(err: LocaleError) -> Self {
        AtelierError::Locale(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_error_display() {
        assert_eq!(
            LocaleError::NoSupportedLocales.to_string(),
            "no supported locales configured"
        );
        assert_eq!(
            LocaleError::DefaultNotSupported(Locale::Ar).to_string(),
            "default locale 'ar' is not a supported locale"
        );
        let err = LocaleError::InvalidPattern {
            pattern: "(".to_string(),
            reason: "unclosed group".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid exclusion pattern '(': unclosed group"
        );
    }

    #[test]
    fn test_into_atelier_error() {
        let err: AtelierError = LocaleError::NoSupportedLocales.into();
        assert!(matches!(err, AtelierError::Locale(_)));
        assert!(err.to_string().contains("no supported locales"));
    }
}
