//! Guidance port for user-moderated dialogues.
//!
//! When moderation is in user-guidance mode the conversation pauses after
//! every turn. The driver asks a [`GuidanceProvider`] for direction and
//! hands the answer to `Director::resume`.
//!
//! # Flow
//!
//! ```text
//! step() → turn recorded → AwaitingUserGuidance
//!        ↓
//! GuidanceProvider::request_guidance()
//!        ↓
//! resume(text)   (blank text = let the system choose)
//! ```
//!
//! # Built-in Implementations
//!
//! - [`AutoGuidance`] - Always defers, so the fallback guidance is used
//!
//! For interactive use, see `InteractiveGuidance` in the presentation layer.

use async_trait::async_trait;
use symposium_domain::{ConversationState, Speaker, Turn};
use thiserror::Error;

/// Errors while collecting guidance.
///
/// These are failures of the collection process, not guidance content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuidanceError {
    /// User cancelled (e.g. Ctrl+C or end of input)
    #[error("Guidance cancelled")]
    Cancelled,
    /// Terminal read failure
    #[error("I/O error: {0}")]
    Io(String),
}

/// Context shown to whoever provides guidance
#[derive(Debug, Clone)]
pub struct GuidanceRequest {
    /// The turn just recorded
    pub turn: Turn,
    /// Who spoke it
    pub speaker: Speaker,
    /// Who speaks next
    pub next_speaker: Speaker,
    pub round_number: u32,
    pub total_rounds: u32,
    /// True when no further turn follows the paused one
    pub is_final_turn: bool,
}

impl GuidanceRequest {
    /// Build a request from a paused conversation
    pub fn from_state(state: &ConversationState) -> Option<Self> {
        let turn = state.last_turn()?.clone();
        let speaker = state.speaker(&turn.speaker_id)?.clone();
        let next_speaker = state.next_speaker()?.clone();
        let is_final_turn = state.round_number >= state.total_rounds
            && state.current_actor_index + 1 == state.speakers.len();
        Some(Self {
            turn,
            speaker,
            next_speaker,
            round_number: state.round_number,
            total_rounds: state.total_rounds,
            is_final_turn,
        })
    }
}

/// Port for requesting human guidance during a dialogue.
#[async_trait]
pub trait GuidanceProvider: Send + Sync {
    /// Return guidance for the next speaker; an empty string defers to the
    /// fallback guidance
    async fn request_guidance(&self, request: &GuidanceRequest) -> Result<String, GuidanceError>;
}

/// Guidance provider that always defers to the fallback guidance.
pub struct AutoGuidance;

#[async_trait]
impl GuidanceProvider for AutoGuidance {
    async fn request_guidance(&self, _request: &GuidanceRequest) -> Result<String, GuidanceError> {
        Ok(String::new())
    }
}
