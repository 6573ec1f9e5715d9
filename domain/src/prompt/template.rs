//! Prompt templates for the dialogue flow

use crate::conversation::speaker::Speaker;
use crate::conversation::turn::Turn;
use crate::moderation::FALLBACK_GUIDANCE;

/// Templates for generating speaker and moderator inputs
pub struct DialoguePromptTemplate;

impl DialoguePromptTemplate {
    /// Input for the moderator after `previous` has spoken
    pub fn moderator_input(previous: &Speaker, previous_text: &str, next: &Speaker) -> String {
        format!(
            r#"The previous speaker was {}.
Their response was:
---
{}
---
The next speaker will be {}.

[Instruction Reminder: Follow the required output format precisely - two lines starting with SUMMARY: and GUIDANCE:]"#,
            previous.display_name, previous_text, next.display_name
        )
    }

    /// Input for the speaker following `turn`.
    ///
    /// The bare visible text, or the visible text followed by a moderator
    /// context block when the turn carries a summary or guidance.
    pub fn actor_input(turn: &Turn) -> String {
        if !turn.has_annotation() {
            return turn.visible_text.clone();
        }

        let mut input = format!("{}\n\n--- Moderator Context ---\n", turn.visible_text);
        if let Some(summary) = turn.moderator_summary.as_deref()
            && !summary.is_empty()
        {
            input.push_str(&format!("Summary: {}\n", summary));
        }
        input.push_str(&format!(
            "Guidance for your response: {}\n--- End Context ---",
            turn.moderator_guidance.as_deref().unwrap_or(FALLBACK_GUIDANCE)
        ));
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::cleaner::CleanedResponse;
    use crate::moderation::ModeratorResult;

    fn turn(text: &str) -> Turn {
        Turn::new(
            0,
            "socrates".into(),
            1,
            CleanedResponse {
                visible_text: text.to_string(),
                reasoning_text: Some("hidden".to_string()),
            },
        )
    }

    #[test]
    fn test_actor_input_without_annotation_is_bare_text() {
        assert_eq!(DialoguePromptTemplate::actor_input(&turn("Hello.")), "Hello.");
    }

    #[test]
    fn test_actor_input_never_includes_reasoning() {
        assert!(!DialoguePromptTemplate::actor_input(&turn("Hello.")).contains("hidden"));
    }

    #[test]
    fn test_actor_input_with_moderation() {
        let turn = turn("Hello.").with_moderation(ModeratorResult {
            summary: "A greeting.".to_string(),
            guidance: "Question the greeting.".to_string(),
            guidance_was_fallback: false,
        });
        let input = DialoguePromptTemplate::actor_input(&turn);
        assert_eq!(
            input,
            "Hello.\n\n--- Moderator Context ---\nSummary: A greeting.\nGuidance for your response: Question the greeting.\n--- End Context ---"
        );
    }

    #[test]
    fn test_actor_input_skips_empty_summary() {
        let turn = turn("Hello.").with_moderation(ModeratorResult::fallback());
        let input = DialoguePromptTemplate::actor_input(&turn);
        assert!(!input.contains("Summary:"));
        assert!(input.contains(FALLBACK_GUIDANCE));
    }

    #[test]
    fn test_moderator_input_names_both_speakers() {
        let input = DialoguePromptTemplate::moderator_input(
            &Speaker::new("socrates", "Socrates"),
            "Virtue is knowledge.",
            &Speaker::new("confucius", "Confucius"),
        );
        assert!(input.starts_with("The previous speaker was Socrates."));
        assert!(input.contains("---\nVirtue is knowledge.\n---"));
        assert!(input.contains("The next speaker will be Confucius."));
        assert!(input.contains("SUMMARY:") && input.contains("GUIDANCE:"));
    }
}
