//! Turn entity

use super::cleaner::CleanedResponse;
use super::speaker::SpeakerId;
use crate::moderation::ModeratorResult;
use serde::{Deserialize, Serialize};

/// Reason a recorded turn is marked as degraded.
///
/// A degraded turn is still part of the transcript; the marker only tells
/// the driver which part of the turn is empty or substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// Nothing was left after reasoning-block extraction
    EmptyVisibleText,
    /// The moderator call failed; summary and guidance are absent
    ModeratorUnavailable,
    /// The moderator output had no `GUIDANCE:` line; fallback guidance used
    GuidanceFallback,
}

impl Degradation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Degradation::EmptyVisibleText => "empty_visible_text",
            Degradation::ModeratorUnavailable => "moderator_unavailable",
            Degradation::GuidanceFallback => "guidance_fallback",
        }
    }
}

/// Where the guidance attached to a turn came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceSource {
    /// Parsed from the AI moderator's output
    Moderator,
    /// Written by a human during a guidance pause
    User,
    /// The fixed fallback string
    Fallback,
}

/// One completed utterance in the dialogue.
///
/// Created once when a turn completes and appended to the conversation's
/// turn log. The only later change is the one-time attachment of human
/// guidance while the conversation is paused for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Position in the turn log (0-based)
    pub sequence_index: usize,
    pub speaker_id: SpeakerId,
    pub round_number: u32,
    /// Spoken text with the reasoning block removed
    pub visible_text: String,
    pub reasoning_text: Option<String>,
    pub moderator_summary: Option<String>,
    pub moderator_guidance: Option<String>,
    pub guidance_source: Option<GuidanceSource>,
    pub degradations: Vec<Degradation>,
}

impl Turn {
    /// Assemble a turn from a cleaned response.
    ///
    /// An empty visible text is kept and flagged rather than discarded.
    pub fn new(
        sequence_index: usize,
        speaker_id: SpeakerId,
        round_number: u32,
        cleaned: CleanedResponse,
    ) -> Self {
        let mut degradations = Vec::new();
        if cleaned.is_empty() {
            degradations.push(Degradation::EmptyVisibleText);
        }

        Self {
            sequence_index,
            speaker_id,
            round_number,
            visible_text: cleaned.visible_text,
            reasoning_text: cleaned.reasoning_text,
            moderator_summary: None,
            moderator_guidance: None,
            guidance_source: None,
            degradations,
        }
    }

    /// Attach a parsed moderator result
    pub fn with_moderation(mut self, result: ModeratorResult) -> Self {
        if result.guidance_was_fallback {
            self.degradations.push(Degradation::GuidanceFallback);
            self.guidance_source = Some(GuidanceSource::Fallback);
        } else {
            self.guidance_source = Some(GuidanceSource::Moderator);
        }
        self.moderator_summary = Some(result.summary);
        self.moderator_guidance = Some(result.guidance);
        self
    }

    /// Mark the moderator step as failed for this turn
    pub fn with_moderator_unavailable(mut self) -> Self {
        self.moderator_summary = None;
        self.moderator_guidance = None;
        self.guidance_source = None;
        self.degradations.push(Degradation::ModeratorUnavailable);
        self
    }

    pub(crate) fn attach_guidance(&mut self, guidance: String, source: GuidanceSource) {
        self.moderator_guidance = Some(guidance);
        self.guidance_source = Some(source);
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }

    pub fn has_degradation(&self, degradation: Degradation) -> bool {
        self.degradations.contains(&degradation)
    }

    /// Whether the turn carries any moderator annotation for the next speaker
    pub fn has_annotation(&self) -> bool {
        self.moderator_summary.as_deref().is_some_and(|s| !s.is_empty())
            || self.moderator_guidance.is_some()
    }
}
