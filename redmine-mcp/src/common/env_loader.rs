//! Environment variable loading utilities
//!
//! Values that are set but blank are treated the same as unset, so an empty
//! `REDMINE_API_KEY=` line in a `.env` file does not count as configuration.

use std::env;

/// Read an environment variable, ignoring blank values
pub fn load_env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads environment variables sharing a common prefix
#[derive(Debug, Clone)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    /// Full variable name for a suffix, e.g. `REDMINE_API_KEY`
    pub fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load an optional string value
    pub fn load_string(&self, suffix: &str) -> Option<String> {
        load_env_string(&self.key(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_load_env_string() {
        let key = "REDMINE_MCP_TEST_STRING";

        env::remove_var(key);
        assert_eq!(load_env_string(key), None);

        env::set_var(key, "  value ");
        assert_eq!(load_env_string(key), Some("value".to_string()));

        env::set_var(key, "   ");
        assert_eq!(load_env_string(key), None);

        env::remove_var(key);
    }

    #[test]
    #[serial]
    fn test_env_loader_prefix() {
        let loader = EnvLoader::new("REDMINE_MCP_TEST");
        assert_eq!(loader.key("VALUE"), "REDMINE_MCP_TEST_VALUE");

        env::set_var("REDMINE_MCP_TEST_VALUE", "42");
        assert_eq!(loader.load_string("VALUE"), Some("42".to_string()));
        env::remove_var("REDMINE_MCP_TEST_VALUE");

        assert_eq!(loader.load_string("VALUE"), None);
    }
}
