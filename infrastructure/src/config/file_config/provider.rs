//! Provider configuration from TOML (`[provider]` section)

use serde::{Deserialize, Serialize};

/// OpenAI-compatible endpoint configuration.
///
/// Explicit values win over the environment variables they name.
///
/// ```toml
/// [provider]
/// base_url = "https://api.studio.nebius.ai/v1"
/// api_key_env = "NEBIUS_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Base URL of the chat completions API (without `/chat/completions`)
    pub base_url: Option<String>,
    /// Environment variable holding the base URL (default: "NEBIUS_API_BASE")
    pub base_url_env: String,
    /// Environment variable holding the API key (default: "NEBIUS_API_KEY")
    pub api_key_env: String,
    /// Direct API key; prefer `api_key_env`
    pub api_key: Option<String>,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_url_env: "NEBIUS_API_BASE".to_string(),
            api_key_env: "NEBIUS_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileProviderConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        Self::resolve(self.api_key.as_deref(), &self.api_key_env)
    }

    pub fn resolve_base_url(&self) -> Option<String> {
        Self::resolve(self.base_url.as_deref(), &self.base_url_env)
            .map(|url| url.trim_end_matches('/').to_string())
    }

    fn resolve(explicit: Option<&str>, env_name: &str) -> Option<String> {
        explicit
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| {
                std::env::var(env_name)
                    .ok()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        let config = FileProviderConfig {
            base_url: Some("https://example.test/v1/".to_string()),
            api_key: Some("sk-test".to_string()),
            api_key_env: "SYMPOSIUM_TEST_UNSET_KEY_VAR".to_string(),
            base_url_env: "SYMPOSIUM_TEST_UNSET_BASE_VAR".to_string(),
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-test"));
        assert_eq!(
            config.resolve_base_url().as_deref(),
            Some("https://example.test/v1")
        );
    }

    #[test]
    fn test_missing_values_resolve_to_none() {
        let config = FileProviderConfig {
            base_url: Some("   ".to_string()),
            api_key: None,
            api_key_env: "SYMPOSIUM_TEST_UNSET_KEY_VAR".to_string(),
            base_url_env: "SYMPOSIUM_TEST_UNSET_BASE_VAR".to_string(),
        };
        assert!(config.resolve_api_key().is_none());
        assert!(config.resolve_base_url().is_none());
    }
}
