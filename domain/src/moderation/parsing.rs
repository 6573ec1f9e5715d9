//! Moderator response parsing.
//!
//! Pure text pattern matching: no I/O and no session handling.
//! Markers are matched case-sensitively at the start of a line, after
//! leading whitespace is trimmed. The first occurrence of each marker wins.

use serde::{Deserialize, Serialize};

/// Line prefix of the summary field
pub const SUMMARY_MARKER: &str = "SUMMARY:";

/// Line prefix of the guidance field
pub const GUIDANCE_MARKER: &str = "GUIDANCE:";

/// Guidance substituted when none can be parsed or the user defers
pub const FALLBACK_GUIDANCE: &str = "Continue the discussion naturally.";

/// Structured moderator output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorResult {
    /// Summary of the last turn; empty when the moderator gave none
    pub summary: String,
    /// Guidance for the next speaker
    pub guidance: String,
    /// True when `guidance` is [`FALLBACK_GUIDANCE`] because none was parsed
    pub guidance_was_fallback: bool,
}

impl ModeratorResult {
    /// Result carrying only the fallback guidance
    pub fn fallback() -> Self {
        Self {
            summary: String::new(),
            guidance: FALLBACK_GUIDANCE.to_string(),
            guidance_was_fallback: true,
        }
    }
}

/// Parse raw moderator text into a summary/guidance pair.
///
/// # Fallbacks
///
/// - No `GUIDANCE:` line, or an empty one → [`FALLBACK_GUIDANCE`] with
///   `guidance_was_fallback = true`
/// - No `SUMMARY:` line → empty summary
///
/// # Examples
///
/// ```
/// use symposium_domain::moderation::parse_moderator_response;
///
/// let result = parse_moderator_response("SUMMARY: X.\nGUIDANCE: do Y");
/// assert_eq!(result.summary, "X.");
/// assert_eq!(result.guidance, "do Y");
/// assert!(!result.guidance_was_fallback);
/// ```
pub fn parse_moderator_response(raw: &str) -> ModeratorResult {
    let summary = find_field(raw, SUMMARY_MARKER).unwrap_or_default();

    match find_field(raw, GUIDANCE_MARKER) {
        Some(guidance) if !guidance.is_empty() => ModeratorResult {
            summary,
            guidance,
            guidance_was_fallback: false,
        },
        _ => ModeratorResult {
            summary,
            ..ModeratorResult::fallback()
        },
    }
}

fn find_field(raw: &str, marker: &str) -> Option<String> {
    raw.lines()
        .find_map(|line| line.trim_start().strip_prefix(marker))
        .map(|value| value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_both_fields() {
        let result = parse_moderator_response("SUMMARY: X.\nGUIDANCE: do Y");
        assert_eq!(result.summary, "X.");
        assert_eq!(result.guidance, "do Y");
        assert!(!result.guidance_was_fallback);
    }

    #[test]
    fn test_truncated_output_uses_fallback_guidance() {
        let result =
            parse_moderator_response("SUMMARY: X and then the model output was cut off mid");
        assert_eq!(result.summary, "X and then the model output was cut off mid");
        assert_eq!(result.guidance, "Continue the discussion naturally.");
        assert!(result.guidance_was_fallback);
    }

    #[test]
    fn test_missing_summary_is_empty() {
        let result = parse_moderator_response("GUIDANCE: press on the definition");
        assert_eq!(result.summary, "");
        assert_eq!(result.guidance, "press on the definition");
        assert!(!result.guidance_was_fallback);
    }

    #[test]
    fn test_unstructured_output_falls_back_entirely() {
        let result = parse_moderator_response("I think both speakers made good points.");
        assert_eq!(result, ModeratorResult::fallback());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_moderator_response(""), ModeratorResult::fallback());
    }

    #[test]
    fn test_leading_whitespace_and_surrounding_prose() {
        let raw = "Here is my assessment:\n   SUMMARY:   Socrates questions courage.  \n\t GUIDANCE: Offer an example from ritual.\nThanks.";
        let result = parse_moderator_response(raw);
        assert_eq!(result.summary, "Socrates questions courage.");
        assert_eq!(result.guidance, "Offer an example from ritual.");
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let result = parse_moderator_response("summary: lower\nguidance: lower");
        assert_eq!(result.summary, "");
        assert!(result.guidance_was_fallback);
    }

    #[test]
    fn test_marker_not_at_line_start_is_ignored() {
        let result = parse_moderator_response("The SUMMARY: is absent\nGUIDANCE: ok");
        assert_eq!(result.summary, "");
        assert_eq!(result.guidance, "ok");
    }

    #[test]
    fn test_empty_guidance_line_falls_back() {
        let result = parse_moderator_response("SUMMARY: done\nGUIDANCE:   ");
        assert_eq!(result.summary, "done");
        assert!(result.guidance_was_fallback);
        assert_eq!(result.guidance, FALLBACK_GUIDANCE);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let result = parse_moderator_response("SUMMARY: a\nGUIDANCE: b\nSUMMARY: c\nGUIDANCE: d");
        assert_eq!(result.summary, "a");
        assert_eq!(result.guidance, "b");
    }

    #[test]
    fn test_crlf_line_endings() {
        let result = parse_moderator_response("SUMMARY: a\r\nGUIDANCE: b\r\n");
        assert_eq!(result.summary, "a");
        assert_eq!(result.guidance, "b");
    }
}
