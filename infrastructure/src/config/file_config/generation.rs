//! Generation parameters from TOML (`[defaults]` and `[llm.<persona>]`)
//!
//! ```toml
//! [defaults]
//! model_name = "meta-llama/Meta-Llama-3.1-70B-Instruct"
//! temperature = 0.7
//!
//! [llm.moderator]
//! temperature = 0.2
//! max_tokens = 300
//! ```
//!
//! Persona sections override the defaults field by field.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use symposium_domain::ConfigIssue;

pub const DEFAULT_MODEL: &str = "meta-llama/Meta-Llama-3.1-70B-Instruct";

/// Fully resolved parameters for one persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub model_name: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    pub request_timeout_secs: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            request_timeout_secs: 60,
        }
    }
}

impl FileGenerationConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply a persona override on top of these values
    pub fn merged_with(&self, overrides: &FileGenerationOverride) -> Self {
        Self {
            model_name: overrides
                .model_name
                .clone()
                .unwrap_or_else(|| self.model_name.clone()),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            max_tokens: overrides.max_tokens.or(self.max_tokens),
            top_p: overrides.top_p.or(self.top_p),
            presence_penalty: overrides.presence_penalty.unwrap_or(self.presence_penalty),
            frequency_penalty: overrides
                .frequency_penalty
                .unwrap_or(self.frequency_penalty),
            request_timeout_secs: overrides
                .request_timeout_secs
                .unwrap_or(self.request_timeout_secs),
        }
    }

    pub fn validate(&self, section: &str) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.model_name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                format!("{}.model_name", section),
                "model name cannot be empty",
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::warning(
                format!("{}.temperature", section),
                format!("{} is outside the usual 0.0..=2.0 range", self.temperature),
            ));
        }
        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                format!("{}.request_timeout_secs", section),
                "request timeout must be at least 1 second",
            ));
        }
        issues
    }
}

/// Per-persona overrides; unset fields inherit from `[defaults]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationOverride {
    pub model_name: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub frequency_penalty: Option<f64>,
    pub request_timeout_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_merges_field_by_field() {
        let defaults = FileGenerationConfig {
            max_tokens: Some(800),
            ..Default::default()
        };
        let merged = defaults.merged_with(&FileGenerationOverride {
            temperature: Some(0.2),
            top_p: Some(0.9),
            ..Default::default()
        });
        assert_eq!(merged.model_name, DEFAULT_MODEL);
        assert_eq!(merged.temperature, 0.2);
        assert_eq!(merged.max_tokens, Some(800));
        assert_eq!(merged.top_p, Some(0.9));
        assert_eq!(merged.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_validate_flags_empty_model_and_zero_timeout() {
        let config = FileGenerationConfig {
            model_name: " ".to_string(),
            request_timeout_secs: 0,
            ..Default::default()
        };
        let issues = config.validate("llm.socrates");
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
        assert_eq!(issues[0].field, "llm.socrates.model_name");
    }
}
