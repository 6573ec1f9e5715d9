//! Persona domain
//!
//! A persona is a character a generation capability plays (a philosopher,
//! the moderator). A conversation mode selects which system prompt each
//! persona receives (e.g. `philosophy`, `bio`).

use crate::conversation::speaker::{Speaker, SpeakerId};
use serde::{Deserialize, Serialize};

/// Persona id reserved for the moderator
pub const MODERATOR_PERSONA: &str = "moderator";

/// Conversation mode, normalized to lower case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationMode(String);

impl ConversationMode {
    pub fn new(mode: impl AsRef<str>) -> Self {
        Self(mode.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationMode {
    fn default() -> Self {
        Self::new("philosophy")
    }
}

impl std::fmt::Display for ConversationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry describing a persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub id: SpeakerId,
    pub display_name: String,
    #[serde(default)]
    pub initials: String,
    #[serde(default)]
    pub description: String,
}

impl PersonaProfile {
    pub fn new(id: impl Into<SpeakerId>, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        let initials = display_name.chars().next().map(String::from).unwrap_or_default();
        Self {
            id: id.into(),
            display_name,
            initials,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_moderator(&self) -> bool {
        self.id.as_str() == MODERATOR_PERSONA
    }

    pub fn to_speaker(&self) -> Speaker {
        Speaker::new(self.id.clone(), self.display_name.clone())
    }
}
