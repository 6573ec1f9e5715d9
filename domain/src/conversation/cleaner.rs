//! Reasoning-block extraction.
//!
//! Generated text may open with a delimited block of internal deliberation
//! (`<think>...</think>`). The block is split off before the remainder is
//! treated as the spoken line.
//!
//! | Input | `visible_text` | `reasoning_text` |
//! |-------|----------------|------------------|
//! | `<think>plan</think>Hello.` | `Hello.` | `Some("plan")` |
//! | `Hello.` | `Hello.` | `None` |
//! | `<think>plan cut off` | `""` | `Some("plan cut off")` |
//!
//! Only the first block is extracted. A second block stays in the visible
//! text verbatim.

use serde::{Deserialize, Serialize};

/// Default opening marker of a reasoning block
pub const REASONING_OPEN: &str = "<think>";

/// Default closing marker of a reasoning block
pub const REASONING_CLOSE: &str = "</think>";

/// Result of splitting raw generated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedResponse {
    pub visible_text: String,
    pub reasoning_text: Option<String>,
}

impl CleanedResponse {
    /// True when nothing speakable remains; callers record a degraded turn
    pub fn is_empty(&self) -> bool {
        self.visible_text.is_empty()
    }
}

/// Splits a single case-sensitive, non-nested reasoning block out of raw text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCleaner {
    open: String,
    close: String,
}

impl Default for ResponseCleaner {
    fn default() -> Self {
        Self::new(REASONING_OPEN, REASONING_CLOSE)
    }
}

impl ResponseCleaner {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    pub fn clean(&self, raw: &str) -> CleanedResponse {
        let Some(start) = raw.find(&self.open) else {
            return CleanedResponse {
                visible_text: raw.trim().to_string(),
                reasoning_text: None,
            };
        };

        let inner_start = start + self.open.len();
        let Some(relative_end) = raw[inner_start..].find(&self.close) else {
            // Truncated generation: everything after the marker is reasoning
            return CleanedResponse {
                visible_text: String::new(),
                reasoning_text: Some(raw[inner_start..].trim().to_string()),
            };
        };

        let inner_end = inner_start + relative_end;
        let after = inner_end + self.close.len();

        let mut visible = String::with_capacity(raw.len() - (after - start));
        visible.push_str(&raw[..start]);
        visible.push_str(&raw[after..]);

        CleanedResponse {
            visible_text: visible.trim().to_string(),
            reasoning_text: Some(raw[inner_start..inner_end].trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> CleanedResponse {
        ResponseCleaner::default().clean(raw)
    }

    #[test]
    fn test_extracts_leading_block() {
        let result = clean("<think>plan here</think>Hello there.");
        assert_eq!(result.visible_text, "Hello there.");
        assert_eq!(result.reasoning_text.as_deref(), Some("plan here"));
    }

    #[test]
    fn test_no_marker_returns_trimmed_input() {
        let result = clean("  Hello there.\n");
        assert_eq!(result.visible_text, "Hello there.");
        assert!(result.reasoning_text.is_none());
    }

    #[test]
    fn test_unterminated_block_yields_empty_visible_text() {
        let result = clean("<think>I should begin by asking what virtue");
        assert_eq!(result.visible_text, "");
        assert!(result.is_empty());
        assert_eq!(
            result.reasoning_text.as_deref(),
            Some("I should begin by asking what virtue")
        );
    }

    #[test]
    fn test_unterminated_block_drops_preceding_text() {
        let result = clean("Preamble <think>never closed");
        assert_eq!(result.visible_text, "");
        assert_eq!(result.reasoning_text.as_deref(), Some("never closed"));
    }

    #[test]
    fn test_block_in_middle_is_removed() {
        let result = clean("Well,\n<think>\n  hmm\n</think>\nlet us begin.");
        assert_eq!(result.visible_text, "Well,\n\nlet us begin.");
        assert_eq!(result.reasoning_text.as_deref(), Some("hmm"));
    }

    #[test]
    fn test_second_block_left_verbatim() {
        let result = clean("<think>a</think>One. <think>b</think>Two.");
        assert_eq!(result.visible_text, "One. <think>b</think>Two.");
        assert_eq!(result.reasoning_text.as_deref(), Some("a"));
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        let result = clean("<THINK>loud</THINK>Hello.");
        assert_eq!(result.visible_text, "<THINK>loud</THINK>Hello.");
        assert!(result.reasoning_text.is_none());
    }

    #[test]
    fn test_block_only_input() {
        let result = clean("<think>all reasoning</think>   ");
        assert!(result.is_empty());
        assert_eq!(result.reasoning_text.as_deref(), Some("all reasoning"));
    }

    #[test]
    fn test_custom_markers() {
        let cleaner = ResponseCleaner::new("<thinking>", "</thinking>");
        let result = cleaner.clean("<thinking>x</thinking>Visible");
        assert_eq!(result.visible_text, "Visible");
        assert_eq!(result.reasoning_text.as_deref(), Some("x"));
    }

    #[test]
    fn test_multibyte_text_around_block() {
        let result = clean("<think>考える</think>こんにちは。");
        assert_eq!(result.visible_text, "こんにちは。");
        assert_eq!(result.reasoning_text.as_deref(), Some("考える"));
    }
}
