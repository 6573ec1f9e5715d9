//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod conversation;
mod generation;
mod personas;
mod prompts;
mod provider;
mod retry;

pub use conversation::FileConversationConfig;
pub use generation::{DEFAULT_MODEL, FileGenerationConfig, FileGenerationOverride};
pub use personas::FilePersonaConfig;
pub use prompts::{FileLoggingConfig, FilePromptsConfig};
pub use provider::FileProviderConfig;
pub use retry::FileRetryConfig;

use crate::personas::builtin_personas;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use symposium_domain::{ConfigIssue, ModerationMode};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Roster, rounds and moderation
    pub conversation: FileConversationConfig,
    /// Attempt budget for generation calls
    pub retry: FileRetryConfig,
    /// OpenAI-compatible endpoint and credentials
    pub provider: FileProviderConfig,
    /// Generation parameters shared by all personas
    pub defaults: FileGenerationConfig,
    /// Per-persona generation overrides, keyed by persona id
    pub llm: HashMap<String, FileGenerationOverride>,
    /// Personas in addition to the built-in ones
    pub personas: Vec<FilePersonaConfig>,
    /// System prompt sources
    pub prompts: FilePromptsConfig,
    /// Transcript output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Generation parameters for a persona: `[defaults]` plus `[llm.<persona>]`
    pub fn generation_for(&self, persona: &str) -> FileGenerationConfig {
        match self.llm.get(persona) {
            Some(overrides) => self.defaults.merged_with(overrides),
            None => self.defaults.clone(),
        }
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks section structure, generation parameters for every persona in
    /// play, and that every referenced persona id is known.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.conversation.validate());
        issues.extend(self.retry.validate());
        issues.extend(self.defaults.validate("defaults"));
        for (i, persona) in self.personas.iter().enumerate() {
            issues.extend(persona.validate(i));
        }

        let known: Vec<String> = builtin_personas()
            .into_iter()
            .map(|p| p.id.to_string())
            .chain(self.personas.iter().map(|p| p.id.trim().to_string()))
            .collect();
        let is_known = |id: &str| known.iter().any(|k| k == id.trim());

        for id in &self.conversation.speakers {
            if !id.trim().is_empty() && !is_known(id) {
                issues.push(ConfigIssue::error(
                    "conversation.speakers",
                    format!("unknown persona '{}'", id),
                ));
            }
        }
        let moderation = self.conversation.parse_moderation().0;
        if moderation == ModerationMode::Ai && !is_known(&self.conversation.moderator) {
            issues.push(ConfigIssue::error(
                "conversation.moderator",
                format!("unknown persona '{}'", self.conversation.moderator),
            ));
        }

        let mut llm_keys: Vec<&String> = self.llm.keys().collect();
        llm_keys.sort();
        for key in llm_keys {
            if !is_known(key) {
                issues.push(ConfigIssue::warning(
                    format!("llm.{}", key),
                    format!("settings for unknown persona '{}' are never used", key),
                ));
            }
            issues.extend(self.generation_for(key).validate(&format!("llm.{}", key)));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[conversation]
rounds = 5
mode = "Bio"
moderation = "user"
speakers = ["confucius", "socrates"]

[retry]
max_attempts = 4
delay_secs = 1

[provider]
base_url = "https://api.example.test/v1"

[defaults]
temperature = 0.5

[llm.moderator]
temperature = 0.1
max_tokens = 200

[[personas]]
id = "laozi"
display_name = "Laozi"

[prompts]
dir = "my_prompts"

[prompts.overrides]
socrates_bio = "You are Socrates telling your life story."

[logging]
transcript_dir = "transcripts"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.conversation.rounds, 5);
        assert_eq!(config.conversation.parse_mode().as_str(), "bio");
        assert_eq!(
            config.conversation.parse_moderation().0,
            ModerationMode::UserGuidance
        );
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.personas[0].to_profile().display_name, "Laozi");
        assert_eq!(config.prompts.dir.to_str(), Some("my_prompts"));
        assert!(config.logging.transcript_dir.is_some());

        let moderator = config.generation_for("moderator");
        assert_eq!(moderator.temperature, 0.1);
        assert_eq!(moderator.max_tokens, Some(200));
        assert_eq!(config.generation_for("socrates").temperature, 0.5);

        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let toml_str = r#"
[conversation]
rounds = 1
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.conversation.rounds, 1);
        // Defaults should apply
        assert_eq!(config.conversation.speakers, ["socrates", "confucius"]);
        assert_eq!(config.retry, FileRetryConfig::default());
        assert_eq!(config.provider.api_key_env, "NEBIUS_API_KEY");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_unknown_personas() {
        let mut config = FileConfig::default();
        config.conversation.speakers = vec!["socrates".to_string(), "plato".to_string()];
        config.conversation.moderator = "judge".to_string();
        config
            .llm
            .insert("aristotle".to_string(), FileGenerationOverride::default());

        let issues = config.validate();
        let messages: Vec<String> = issues.iter().map(|i| i.to_string()).collect();
        assert!(messages.contains(&"conversation.speakers: unknown persona 'plato'".to_string()));
        assert!(messages.contains(&"conversation.moderator: unknown persona 'judge'".to_string()));
        assert!(issues
            .iter()
            .any(|i| i.field == "llm.aristotle" && !i.is_error()));
    }

    #[test]
    fn test_unknown_moderator_ignored_without_ai_moderation() {
        let mut config = FileConfig::default();
        config.conversation.moderation = "none".to_string();
        config.conversation.moderator = "judge".to_string();
        assert!(config.validate().is_empty());
    }
}
