//! Progress notification port
//!
//! Defines the interface for reporting progress while a dialogue runs.

use super::generation::RetryOutcome;
use symposium_domain::{ConversationPhase, Speaker, SpeakerId, Turn};

/// Callback for progress updates during a dialogue
///
/// Implementations live in the presentation layer. All methods default to
/// no-ops so adapters only override what they display.
pub trait DialogueProgressNotifier: Send + Sync {
    /// Called before a speaker's generation call
    fn on_turn_start(&self, _speaker: &Speaker, _round: u32) {}

    /// Called after every generation attempt, for speakers and the moderator
    fn on_attempt(&self, _persona: &SpeakerId, _outcome: &RetryOutcome) {}

    /// Called before the moderator reviews a turn
    fn on_moderation_start(&self, _turn: &Turn) {}

    /// Called once a turn is appended to the log
    fn on_turn_recorded(&self, _turn: &Turn) {}

    /// Called whenever the conversation phase changes
    fn on_phase_change(&self, _phase: ConversationPhase) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DialogueProgressNotifier for NoProgress {}
