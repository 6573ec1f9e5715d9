//! Topic value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Minimum topic length in characters, after sanitizing
pub const MIN_TOPIC_CHARS: usize = 3;

/// Maximum topic length in characters, after sanitizing
pub const MAX_TOPIC_CHARS: usize = 2000;

/// The opening topic of a dialogue (Value Object)
///
/// Whitespace is normalized on construction: leading and trailing
/// whitespace is removed and internal runs collapse to a single space.
/// The first speaker receives the topic verbatim as its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Sanitize and validate a topic
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let content = Self::sanitize(raw);
        if content.is_empty() {
            return Err(DomainError::InvalidConfiguration(
                "topic must not be empty".to_string(),
            ));
        }

        let chars = content.chars().count();
        if chars < MIN_TOPIC_CHARS {
            return Err(DomainError::InvalidTopic(format!(
                "topic is too short (minimum {} characters)",
                MIN_TOPIC_CHARS
            )));
        }
        if chars > MAX_TOPIC_CHARS {
            return Err(DomainError::InvalidTopic(format!(
                "topic is too long (maximum {} characters)",
                MAX_TOPIC_CHARS
            )));
        }

        Ok(Self { content })
    }

    /// Trim and collapse internal whitespace runs to one space
    pub fn sanitize(raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Get the topic content
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_sanitized() {
        let topic = Topic::parse("  What   is\n\tvirtue?  ").unwrap();
        assert_eq!(topic.content(), "What is virtue?");
    }

    #[test]
    fn test_empty_topic_is_invalid_configuration() {
        assert!(matches!(
            Topic::parse("   \n "),
            Err(DomainError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_short_topic_rejected() {
        assert!(matches!(Topic::parse("hi"), Err(DomainError::InvalidTopic(_))));
        assert!(Topic::parse("why").is_ok());
    }

    #[test]
    fn test_long_topic_rejected() {
        let long = "a".repeat(MAX_TOPIC_CHARS + 1);
        assert!(matches!(Topic::parse(&long), Err(DomainError::InvalidTopic(_))));

        let exact = "a".repeat(MAX_TOPIC_CHARS);
        assert!(Topic::parse(&exact).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // three multi-byte characters
        assert!(Topic::parse("道德経").is_ok());
    }
}
