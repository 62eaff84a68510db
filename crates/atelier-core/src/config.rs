use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AtelierError, Result};
use crate::locale::Locale;

/// One year, the lifetime of the locale preference cookie.
pub const LOCALE_COOKIE_MAX_AGE_SECS: u64 = 365 * 24 * 60 * 60;

/// Top-level configuration for the Atelier site backend.
///
/// Loaded from `~/.atelier/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AtelierConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl AtelierConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AtelierConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.locale.supported.is_empty() {
            return Err(AtelierError::Config(
                "locale.supported must list at least one locale".to_string(),
            ));
        }
        if !self.locale.supported.contains(&self.locale.default) {
            return Err(AtelierError::Config(format!(
                "locale.default '{}' is not in locale.supported",
                self.locale.default
            )));
        }
        if self.locale.cookie_name.trim().is_empty() {
            return Err(AtelierError::Config(
                "locale.cookie_name must not be empty".to_string(),
            ));
        }
        if self.chat.max_message_chars == 0 {
            return Err(AtelierError::Config(
                "chat.max_message_chars must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.chat.llm.temperature) {
            return Err(AtelierError::Config(format!(
                "chat.llm.temperature {} is outside 0.0..=2.0",
                self.chat.llm.temperature
            )));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Deployment environment. Production turns on `Secure` cookies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Deployment environment.
    pub environment: Environment,
    /// Extra origins allowed to call `/api` routes cross-origin.
    pub allowed_origins: Vec<String>,
    /// Maximum `/api` requests per second across all clients.
    pub rate_limit_per_sec: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
            environment: Environment::Development,
            allowed_origins: Vec::new(),
            rate_limit_per_sec: 20,
        }
    }
}

/// Locale negotiation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Locales the site is published in, in preference order.
    pub supported: Vec<Locale>,
    /// Locale used when nothing else matches.
    pub default: Locale,
    /// Name of the cookie that pins the visitor's choice.
    pub cookie_name: String,
    /// Lifetime of that cookie.
    pub cookie_max_age_secs: u64,
    /// Regular expressions for paths that bypass locale routing.
    pub excluded_patterns: Vec<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: Locale::ALL.to_vec(),
            default: Locale::En,
            cookie_name: "locale".to_string(),
            cookie_max_age_secs: LOCALE_COOKIE_MAX_AGE_SECS,
            excluded_patterns: vec![
                r"^/api(/|$)".to_string(),
                r"^/_next/".to_string(),
                r"^/favicon\.ico$".to_string(),
                r"/[^/]+\.[A-Za-z0-9]+$".to_string(),
                r"^/health$".to_string(),
            ],
        }
    }
}

/// Chat widget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether `/api/chat` is served.
    pub enabled: bool,
    /// Longest single message accepted by `/api/chat`, in characters.
    pub max_message_chars: usize,
    /// Hosted language model settings.
    #[serde(default)]
    pub llm: LlmConfig,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_message_chars: 2000,
            llm: LlmConfig::default(),
        }
    }
}

/// Hosted language model settings (OpenAI-compatible chat completions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat completions endpoint.
    pub api_url: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens per reply.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Environment variable holding the API key. The key itself never lives
    /// in the config file.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            timeout_secs: 30,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// Blank values count as absent.
    pub fn api_key_from_env(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AtelierConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.server.port, 3030);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.locale.supported, vec![Locale::En, Locale::Ar]);
        assert_eq!(config.locale.default, Locale::En);
        assert_eq!(config.locale.cookie_name, "locale");
        assert_eq!(config.locale.cookie_max_age_secs, 31_536_000);
        assert_eq!(config.chat.max_message_chars, 2000);
        assert_eq!(config.chat.llm.api_key_env, "GROQ_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[server]
port = 8080
environment = "production"

[locale]
supported = ["ar", "en"]
default = "ar"
cookie_name = "NEXT_LOCALE"

[chat.llm]
model = "llama-3.3-70b-versatile"
temperature = 0.2
"#;
        let file = create_temp_config(content);
        let config = AtelierConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.environment.is_production());
        assert_eq!(config.locale.supported, vec![Locale::Ar, Locale::En]);
        assert_eq!(config.locale.default, Locale::Ar);
        assert_eq!(config.locale.cookie_name, "NEXT_LOCALE");
        assert_eq!(config.chat.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.chat.llm.temperature, 0.2);
        // Unspecified fields keep their defaults.
        assert_eq!(config.chat.llm.max_tokens, 512);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let file = create_temp_config("[general]\nlog_level = \"warn\"\n");
        let config = AtelierConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "warn");
        assert_eq!(config.locale.default, Locale::En);
        assert_eq!(config.locale.excluded_patterns.len(), 5);
    }

    #[test]
    fn test_load_rejects_unknown_locale() {
        let file = create_temp_config("[locale]\nsupported = [\"en\", \"fr\"]\n");
        assert!(AtelierConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_default_not_supported() {
        let file = create_temp_config("[locale]\nsupported = [\"en\"]\ndefault = \"ar\"\n");
        let err = AtelierConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("not in locale.supported"));
    }

    #[test]
    fn test_validate_empty_supported() {
        let mut config = AtelierConfig::default();
        config.locale.supported.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = AtelierConfig::default();
        config.chat.llm.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_message_length() {
        let mut config = AtelierConfig::default();
        config.chat.max_message_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AtelierConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.server.port, 3030);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AtelierConfig::default();
        config.locale.default = Locale::Ar;
        config.save(&path).unwrap();

        let reloaded = AtelierConfig::load(&path).unwrap();
        assert_eq!(reloaded.locale.default, Locale::Ar);
        assert_eq!(
            reloaded.locale.excluded_patterns,
            config.locale.excluded_patterns
        );
    }

    #[test]
    fn test_api_key_env_blank_is_absent() {
        let llm = LlmConfig {
            api_key_env: "ATELIER_TEST_UNSET_KEY_VARIABLE".to_string(),
            ..LlmConfig::default()
        };
        assert!(llm.api_key_from_env().is_none());
    }
}
