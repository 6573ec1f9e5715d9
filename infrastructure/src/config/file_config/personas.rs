//! Persona declarations from TOML (`[[personas]]` array)
//!
//! ```toml
//! [[personas]]
//! id = "laozi"
//! display_name = "Laozi"
//! description = "Author of the Tao Te Ching"
//! ```
//!
//! Entries are added to the built-in personas; an entry with a built-in id
//! replaces it.

use serde::{Deserialize, Serialize};
use symposium_domain::{ConfigIssue, PersonaProfile};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersonaConfig {
    pub id: String,
    /// Name shown in transcripts (default: the id)
    pub display_name: Option<String>,
    /// Avatar initials (default: first letter of the display name)
    pub initials: Option<String>,
    pub description: String,
}

impl FilePersonaConfig {
    pub fn to_profile(&self) -> PersonaProfile {
        let id = self.id.trim();
        let display_name = self
            .display_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(id);
        let mut profile =
            PersonaProfile::new(id, display_name).with_description(self.description.trim());
        if let Some(initials) = self.initials.as_deref().map(str::trim)
            && !initials.is_empty()
        {
            profile.initials = initials.to_string();
        }
        profile
    }

    pub fn validate(&self, index: usize) -> Vec<ConfigIssue> {
        if self.id.trim().is_empty() {
            vec![ConfigIssue::error(
                format!("personas[{}].id", index),
                "persona id cannot be empty",
            )]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_profile_defaults() {
        let persona = FilePersonaConfig {
            id: "laozi".to_string(),
            ..Default::default()
        };
        let profile = persona.to_profile();
        assert_eq!(profile.id.as_str(), "laozi");
        assert_eq!(profile.display_name, "laozi");
        assert_eq!(profile.initials, "l");
    }

    #[test]
    fn test_to_profile_explicit_fields() {
        let persona = FilePersonaConfig {
            id: "laozi".to_string(),
            display_name: Some("Laozi".to_string()),
            initials: Some("LZ".to_string()),
            description: "Old master".to_string(),
        };
        let profile = persona.to_profile();
        assert_eq!(profile.display_name, "Laozi");
        assert_eq!(profile.initials, "LZ");
        assert_eq!(profile.description, "Old master");
    }

    #[test]
    fn test_empty_id_is_an_error() {
        let issues = FilePersonaConfig::default().validate(2);
        assert_eq!(issues[0].field, "personas[2].id");
    }
}
