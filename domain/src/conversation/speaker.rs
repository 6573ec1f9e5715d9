//! Speaker identity

use serde::{Deserialize, Serialize};

/// Stable key identifying a speaker (e.g. `"socrates"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(String);

impl SpeakerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SpeakerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SpeakerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A dialogue participant.
///
/// Holds identity only. The generation capability bound to a speaker is
/// kept by the director, keyed by [`SpeakerId`], so that conversation state
/// never embeds a live call handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub id: SpeakerId,
    pub display_name: String,
}

impl Speaker {
    pub fn new(id: impl Into<SpeakerId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
