//! Connection settings for the Redmine instance
//!
//! Settings come from the environment (`REDMINE_BASE_URL`, `REDMINE_API_KEY`,
//! `REDMINE_TLS_VERIFY`) and may be overridden explicitly, e.g. from command
//! line flags. A configuration that fails [`Config::validate`] is fatal.

use crate::common::env_loader::EnvLoader;
use thiserror::Error;

/// Prefix shared by every environment variable this crate reads
pub const ENV_PREFIX: &str = "REDMINE";

/// Errors that can occur while assembling the configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided
    #[error("Missing required configuration '{key}'\nHint: set {key} in the environment or a .env file")]
    Missing {
        /// Name of the environment variable that should carry the value
        key: String,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the configuration field that has an invalid value
        field: String,
        /// The invalid value that was provided
        value: String,
        /// Helpful hint about how to fix the issue
        hint: String,
    },
}

/// Interpret the TLS verification switch.
///
/// Only an explicit falsy value disables certificate verification. Absent,
/// `"true"`, or anything unrecognized keeps strict verification.
pub fn parse_tls_verify(raw: Option<&str>) -> bool {
    match raw.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "false" | "0" | "no" | "off"),
        None => true,
    }
}

/// Connection settings for a Redmine instance
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the tracker, without a trailing slash
    pub base_url: String,
    /// API key sent in the `X-Redmine-API-Key` header
    pub api_key: String,
    /// Whether TLS certificates are verified
    pub tls_verify: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("tls_verify", &self.tls_verify)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            tls_verify: true,
        }
    }
}

impl Config {
    /// Create a configuration from explicit values
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::default()
            .with_base_url(base_url)
            .with_api_key(api_key)
    }

    /// Load configuration from `REDMINE_*` environment variables.
    ///
    /// Missing values are left blank; call [`Config::validate`] before use.
    pub fn from_env() -> Self {
        let env = EnvLoader::new(ENV_PREFIX);
        let mut config = Self::default();

        if let Some(url) = env.load_string("BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some(key) = env.load_string("API_KEY") {
            config.api_key = key;
        }
        config.tls_verify = parse_tls_verify(env.load_string("TLS_VERIFY").as_deref());

        config
    }

    /// Override the base URL. A trailing `/` is stripped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url = base_url.into();
        self.base_url = url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Override the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into().trim().to_string();
        self
    }

    /// Override TLS certificate verification
    pub fn with_tls_verify(mut self, tls_verify: bool) -> Self {
        self.tls_verify = tls_verify;
        self
    }

    /// Check that every required setting is present and well formed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::Missing {
                key: format!("{ENV_PREFIX}_BASE_URL"),
            });
        }
        if self.api_key.is_empty() {
            return Err(ConfigError::Missing {
                key: format!("{ENV_PREFIX}_API_KEY"),
            });
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
            Ok(url) => Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                hint: format!("Expected an http or https URL, got scheme '{}'", url.scheme()),
            }),
            Err(e) => Err(ConfigError::InvalidValue {
                field: "base_url".to_string(),
                value: self.base_url.clone(),
                hint: format!("Expected an absolute URL such as https://redmine.example.com ({e})"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        env::remove_var("REDMINE_BASE_URL");
        env::remove_var("REDMINE_API_KEY");
        env::remove_var("REDMINE_TLS_VERIFY");
    }

    #[test]
    fn test_parse_tls_verify() {
        assert!(parse_tls_verify(None));
        assert!(parse_tls_verify(Some("true")));
        assert!(parse_tls_verify(Some("1")));
        assert!(parse_tls_verify(Some("garbage")));

        assert!(!parse_tls_verify(Some("false")));
        assert!(!parse_tls_verify(Some("FALSE")));
        assert!(!parse_tls_verify(Some("0")));
        assert!(!parse_tls_verify(Some("no")));
        assert!(!parse_tls_verify(Some(" off ")));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        clear_env();
        env::set_var("REDMINE_BASE_URL", "https://redmine.example.com/");
        env::set_var("REDMINE_API_KEY", "secret");
        env::set_var("REDMINE_TLS_VERIFY", "false");

        let config = Config::from_env();
        assert_eq!(config.base_url, "https://redmine.example.com");
        assert_eq!(config.api_key, "secret");
        assert!(!config.tls_verify);
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_to_tls_verification() {
        clear_env();
        let config = Config::from_env();
        assert!(config.tls_verify);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing {
                key: "REDMINE_BASE_URL".to_string()
            })
        );
    }

    #[test]
    fn test_missing_api_key() {
        let config = Config::default().with_base_url("https://redmine.example.com");
        assert_eq!(
            config.validate(),
            Err(ConfigError::Missing {
                key: "REDMINE_API_KEY".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config::new("redmine.example.com", "key");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));

        let config = Config::new("ftp://redmine.example.com", "key");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::new("http://localhost:3000//", " key ").with_tls_verify(false);
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.api_key, "key");
        assert!(!config.tls_verify);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::new("http://localhost:3000", "super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
