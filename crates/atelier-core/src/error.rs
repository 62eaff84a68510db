use thiserror::Error;

/// Top-level error type for the Atelier site backend.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for AtelierError` so that `?` works across crate
/// boundaries, most notably in the composition root.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtelierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Locale error: {0}")]
    Locale(String),

    #[error("Chat error: {0}")]
    Chat(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for AtelierError {
    fn from(err: toml::de::Error) -> Self {
        AtelierError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for AtelierError {
    fn from(err: toml::ser::Error) -> Self {
        AtelierError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AtelierError {
    fn from(err: serde_json::Error) -> Self {
        AtelierError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Atelier operations.
pub type Result<T> = std::result::Result<T, AtelierError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AtelierError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");

        let err = AtelierError::Locale("no supported locales".to_string());
        assert_eq!(err.to_string(), "Locale error: no supported locales");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AtelierError = io_err.into();
        assert!(matches!(err, AtelierError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("[unclosed").unwrap_err();
        let err: AtelierError = toml_err.into();
        assert!(matches!(err, AtelierError::Config(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: AtelierError = json_err.into();
        assert!(matches!(err, AtelierError::Serialization(_)));
    }
}
