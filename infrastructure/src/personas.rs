//! Persona registry
//!
//! Built-in personas plus any declared under `[[personas]]`.

use crate::config::FileConfig;
use symposium_domain::{DomainError, MODERATOR_PERSONA, PersonaProfile, Speaker, SpeakerId};

/// Personas available without any configuration
pub fn builtin_personas() -> Vec<PersonaProfile> {
    vec![
        PersonaProfile::new("socrates", "Socrates")
            .with_description("Athenian philosopher who answers with questions"),
        PersonaProfile::new("confucius", "Confucius")
            .with_description("Chinese sage of ritual, virtue and good government"),
        PersonaProfile::new(MODERATOR_PERSONA, "Moderator")
            .with_description("Summarizes each turn and guides the next speaker"),
    ]
}

/// Lookup table of known personas
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    profiles: Vec<PersonaProfile>,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self {
            profiles: builtin_personas(),
        }
    }
}

impl PersonaRegistry {
    /// Built-ins overlaid with configured personas; same id replaces
    pub fn from_config(config: &FileConfig) -> Self {
        let mut registry = Self::default();
        for persona in config.personas.iter().filter(|p| !p.id.trim().is_empty()) {
            registry.insert(persona.to_profile());
        }
        registry
    }

    pub fn insert(&mut self, profile: PersonaProfile) {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    pub fn get(&self, id: &SpeakerId) -> Option<&PersonaProfile> {
        self.profiles.iter().find(|p| &p.id == id)
    }

    /// Personas that can take part as speakers
    pub fn speakers(&self) -> impl Iterator<Item = &PersonaProfile> {
        self.profiles.iter().filter(|p| !p.is_moderator())
    }

    /// Resolve an ordered roster, failing on the first unknown id
    pub fn roster(&self, ids: &[SpeakerId]) -> Result<Vec<Speaker>, DomainError> {
        ids.iter()
            .map(|id| {
                self.get(id).map(PersonaProfile::to_speaker).ok_or_else(|| {
                    DomainError::InvalidConfiguration(format!("unknown persona '{}'", id))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilePersonaConfig;

    #[test]
    fn test_builtins_are_registered() {
        let registry = PersonaRegistry::default();
        assert!(registry.get(&"socrates".into()).is_some());
        assert!(registry.get(&"moderator".into()).unwrap().is_moderator());
        let speakers: Vec<&str> = registry.speakers().map(|p| p.id.as_str()).collect();
        assert_eq!(speakers, ["socrates", "confucius"]);
    }

    #[test]
    fn test_config_adds_and_replaces() {
        let mut config = FileConfig::default();
        config.personas = vec![
            FilePersonaConfig {
                id: "laozi".to_string(),
                display_name: Some("Laozi".to_string()),
                ..Default::default()
            },
            FilePersonaConfig {
                id: "socrates".to_string(),
                display_name: Some("Socrates of Athens".to_string()),
                ..Default::default()
            },
        ];
        let registry = PersonaRegistry::from_config(&config);
        assert_eq!(registry.get(&"laozi".into()).unwrap().display_name, "Laozi");
        assert_eq!(
            registry.get(&"socrates".into()).unwrap().display_name,
            "Socrates of Athens"
        );
        assert_eq!(registry.speakers().count(), 3);
    }

    #[test]
    fn test_roster_resolution() {
        let registry = PersonaRegistry::default();
        let roster = registry
            .roster(&["confucius".into(), "socrates".into()])
            .unwrap();
        assert_eq!(roster[0].display_name, "Confucius");

        let err = registry
            .roster(&["socrates".into(), "plato".into()])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(m) if m.contains("plato")));
    }
}
