//! Conversation configuration from TOML (`[conversation]` section)

use serde::{Deserialize, Serialize};
use symposium_domain::{ConfigIssue, ConversationMode, ModerationMode, SpeakerId};

/// Raw conversation configuration from TOML
///
/// # Example
///
/// ```toml
/// [conversation]
/// rounds = 3
/// mode = "philosophy"
/// moderation = "ai"            # or "none", "user"
/// speakers = ["socrates", "confucius"]
/// starting_speaker = "confucius"
/// moderator = "moderator"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConversationConfig {
    /// Rounds per conversation; each round gives every speaker one turn
    pub rounds: u32,
    /// Conversation mode, selects the prompt set (e.g. "philosophy", "bio")
    pub mode: String,
    /// Moderation strategy: "none", "ai" or "user"
    pub moderation: String,
    /// Persona that opens the conversation (default: first in `speakers`)
    pub starting_speaker: Option<String>,
    /// Ordered roster of persona ids
    pub speakers: Vec<String>,
    /// Persona id of the AI moderator
    pub moderator: String,
}

impl Default for FileConversationConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            mode: "philosophy".to_string(),
            moderation: "ai".to_string(),
            starting_speaker: None,
            speakers: vec!["socrates".to_string(), "confucius".to_string()],
            moderator: "moderator".to_string(),
        }
    }
}

impl FileConversationConfig {
    /// Parse the moderation string, falling back to AI moderation
    pub fn parse_moderation(&self) -> (ModerationMode, Vec<ConfigIssue>) {
        match self.moderation.parse() {
            Ok(mode) => (mode, Vec::new()),
            Err(message) => (
                ModerationMode::default(),
                vec![ConfigIssue::error("conversation.moderation", message)],
            ),
        }
    }

    pub fn parse_mode(&self) -> ConversationMode {
        ConversationMode::new(&self.mode)
    }

    pub fn speaker_ids(&self) -> Vec<SpeakerId> {
        self.speakers.iter().map(|s| SpeakerId::new(s.trim())).collect()
    }

    pub fn starting_speaker_id(&self) -> Option<SpeakerId> {
        self.starting_speaker
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(SpeakerId::new)
    }

    /// Structural checks that do not need the persona registry
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_moderation().1;

        if self.rounds == 0 {
            issues.push(ConfigIssue::error(
                "conversation.rounds",
                "rounds must be at least 1",
            ));
        }
        if self.speakers.len() < 2 {
            issues.push(ConfigIssue::error(
                "conversation.speakers",
                format!(
                    "at least 2 speakers are required, got {}",
                    self.speakers.len()
                ),
            ));
        }
        if self.speakers.iter().any(|s| s.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                "conversation.speakers",
                "speaker ids cannot be empty",
            ));
        }
        if let Some(start) = self.starting_speaker_id()
            && !self.speaker_ids().contains(&start)
        {
            issues.push(ConfigIssue::error(
                "conversation.starting_speaker",
                format!("'{}' is not one of the configured speakers", start),
            ));
        }
        if self.mode.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                "conversation.mode",
                "empty mode, prompts will fall back to the generic system prompt",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FileConversationConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.parse_moderation().0, ModerationMode::Ai);
        assert_eq!(config.parse_mode().as_str(), "philosophy");
    }

    #[test]
    fn test_unknown_moderation_is_an_error_with_fallback() {
        let config = FileConversationConfig {
            moderation: "committee".to_string(),
            ..Default::default()
        };
        let (mode, issues) = config.parse_moderation();
        assert_eq!(mode, ModerationMode::Ai);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(issues[0].field, "conversation.moderation");
    }

    #[test]
    fn test_structural_errors() {
        let config = FileConversationConfig {
            rounds: 0,
            speakers: vec!["socrates".to_string()],
            starting_speaker: Some("laozi".to_string()),
            ..Default::default()
        };
        let fields: Vec<String> = config.validate().into_iter().map(|i| i.field).collect();
        assert!(fields.contains(&"conversation.rounds".to_string()));
        assert!(fields.contains(&"conversation.speakers".to_string()));
        assert!(fields.contains(&"conversation.starting_speaker".to_string()));
    }

    #[test]
    fn test_blank_starting_speaker_is_ignored() {
        let config = FileConversationConfig {
            starting_speaker: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.starting_speaker_id().is_none());
        assert!(config.validate().is_empty());
    }
}
