//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording dialogue events
//! (start, attempt failures, recorded turns, moderation degradation,
//! guidance, termination) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the
//! transcript in a machine-readable format (JSONL).

use serde_json::{Value, json};
use symposium_domain::{ConversationState, GuidanceSource, Turn};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "turn_recorded", "attempt_failed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn conversation_started(state: &ConversationState) -> Self {
        Self::new(
            "conversation_started",
            json!({
                "topic": state.original_topic,
                "speakers": state.speakers.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
                "total_rounds": state.total_rounds,
                "moderation_mode": state.moderation_mode.as_str(),
            }),
        )
    }

    pub fn turn_recorded(turn: &Turn) -> Self {
        Self::new(
            "turn_recorded",
            json!({
                "sequence_index": turn.sequence_index,
                "speaker": turn.speaker_id.as_str(),
                "round": turn.round_number,
                "visible_text": turn.visible_text,
                "reasoning_text": turn.reasoning_text,
                "moderator_summary": turn.moderator_summary,
                "moderator_guidance": turn.moderator_guidance,
                "degradations": turn.degradations.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
            }),
        )
    }

    pub fn guidance_applied(turn_index: usize, guidance: &str, source: GuidanceSource) -> Self {
        Self::new(
            "guidance_applied",
            json!({
                "sequence_index": turn_index,
                "guidance": guidance,
                "source": source,
            }),
        )
    }

    pub fn conversation_finished(state: &ConversationState) -> Self {
        let event_type = if state.error.is_some() {
            "conversation_errored"
        } else {
            "conversation_completed"
        };
        Self::new(
            event_type,
            json!({
                "phase": state.phase.as_str(),
                "turns": state.turns.len(),
                "error": state.error,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and infallible; logging failures never reach the
/// dialogue.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when transcripts are disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
