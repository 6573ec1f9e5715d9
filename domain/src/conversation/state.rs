//! Conversation state and its phase machine.
//!
//! ```text
//!            start            step (user-guidance mode)
//!   Idle ──────────▶ Running ─────────────────────────▶ AwaitingUserGuidance
//!                     │  ▲                                    │
//!                     │  └────────────── resume ──────────────┘
//!                     │
//!                     ├── rounds exhausted ──▶ Completed
//!                     └── actor failure ─────▶ Errored
//! ```
//!
//! `Completed` and `Errored` are terminal. Every mutation goes through the
//! methods below, so the record is always at a consistent snapshot between
//! calls. The struct holds no call handles and is safe to clone or
//! serialize.

use super::speaker::{Speaker, SpeakerId};
use super::turn::{GuidanceSource, Turn};
use crate::core::error::DomainError;
use crate::core::topic::Topic;
use crate::moderation::FALLBACK_GUIDANCE;
use crate::prompt::DialoguePromptTemplate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of the conversation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    #[default]
    Idle,
    Running,
    AwaitingUserGuidance,
    Completed,
    Errored,
}

impl ConversationPhase {
    pub fn as_str(&self) -> &str {
        match self {
            ConversationPhase::Idle => "idle",
            ConversationPhase::Running => "running",
            ConversationPhase::AwaitingUserGuidance => "awaiting_user_guidance",
            ConversationPhase::Completed => "completed",
            ConversationPhase::Errored => "errored",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ConversationPhase::Idle => "idle",
            ConversationPhase::Running => "running",
            ConversationPhase::AwaitingUserGuidance => "awaiting user guidance",
            ConversationPhase::Completed => "completed",
            ConversationPhase::Errored => "errored",
        }
    }

    /// No `step` or `resume` is accepted in a terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationPhase::Completed | ConversationPhase::Errored)
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How turns are moderated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationMode {
    /// Speakers answer each other directly
    None,
    /// An AI moderator summarizes each turn and proposes guidance
    #[default]
    Ai,
    /// The conversation pauses after each turn for human guidance
    UserGuidance,
}

impl ModerationMode {
    pub fn as_str(&self) -> &str {
        match self {
            ModerationMode::None => "none",
            ModerationMode::Ai => "ai",
            ModerationMode::UserGuidance => "user",
        }
    }
}

impl std::fmt::Display for ModerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "direct" => Ok(ModerationMode::None),
            "ai" | "moderator" => Ok(ModerationMode::Ai),
            "user" | "user_guidance" | "human" => Ok(ModerationMode::UserGuidance),
            other => Err(format!(
                "unknown moderation mode '{}' (expected none, ai or user)",
                other
            )),
        }
    }
}

/// Rotate a roster so that `first` speaks first, keeping relative order.
///
/// With two speakers this is the choice of starting actor.
pub fn order_roster(
    mut speakers: Vec<Speaker>,
    first: Option<&SpeakerId>,
) -> Result<Vec<Speaker>, DomainError> {
    if let Some(first) = first {
        let position = speakers
            .iter()
            .position(|s| &s.id == first)
            .ok_or_else(|| {
                DomainError::InvalidConfiguration(format!(
                    "starting speaker '{}' is not in the roster",
                    first
                ))
            })?;
        speakers.rotate_left(position);
    }
    Ok(speakers)
}

/// The authoritative record of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationState {
    /// Ordered roster; index 0 speaks first
    pub speakers: Vec<Speaker>,
    pub current_actor_index: usize,
    /// 1-based round currently being played
    pub round_number: u32,
    pub total_rounds: u32,
    /// Append-only turn log
    pub turns: Vec<Turn>,
    pub moderation_mode: ModerationMode,
    pub phase: ConversationPhase,
    /// Human guidance accepted by `resume`, until the next turn consumes it
    pub pending_guidance_text: Option<String>,
    pub original_topic: String,
    /// Failure description once `Errored`
    pub error: Option<String>,
}

impl ConversationState {
    /// Fresh state in the `Idle` phase
    pub fn idle() -> Self {
        Self::default()
    }

    /// Validate the configuration and enter the `Running` phase
    pub fn start(
        topic: Topic,
        speakers: Vec<Speaker>,
        total_rounds: u32,
        moderation_mode: ModerationMode,
    ) -> Result<Self, DomainError> {
        if speakers.len() < 2 {
            return Err(DomainError::InvalidConfiguration(format!(
                "at least 2 speakers are required, got {}",
                speakers.len()
            )));
        }
        if total_rounds < 1 {
            return Err(DomainError::InvalidConfiguration(
                "total rounds must be at least 1".to_string(),
            ));
        }
        for (i, speaker) in speakers.iter().enumerate() {
            if speakers[..i].iter().any(|s| s.id == speaker.id) {
                return Err(DomainError::InvalidConfiguration(format!(
                    "speaker '{}' appears more than once",
                    speaker.id
                )));
            }
        }

        Ok(Self {
            speakers,
            current_actor_index: 0,
            round_number: 1,
            total_rounds,
            turns: Vec::new(),
            moderation_mode,
            phase: ConversationPhase::Running,
            pending_guidance_text: None,
            original_topic: topic.content().to_string(),
            error: None,
        })
    }

    /// Fail with `InvalidPhase` unless the machine is in `expected`
    pub fn ensure_phase(
        &self,
        expected: ConversationPhase,
        operation: &'static str,
    ) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(DomainError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    pub fn current_speaker(&self) -> Option<&Speaker> {
        self.speakers.get(self.current_actor_index)
    }

    /// The speaker after the current one, wrapping around the roster
    pub fn next_speaker(&self) -> Option<&Speaker> {
        if self.speakers.is_empty() {
            return None;
        }
        self.speakers
            .get((self.current_actor_index + 1) % self.speakers.len())
    }

    pub fn speaker(&self, id: &SpeakerId) -> Option<&Speaker> {
        self.speakers.iter().find(|s| &s.id == id)
    }

    pub fn last_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn next_sequence_index(&self) -> usize {
        self.turns.len()
    }

    /// Input for the current actor.
    ///
    /// The topic for the first turn, otherwise only the immediately
    /// preceding turn (with its moderator context, if any). Earlier turns
    /// are deliberately not carried forward.
    pub fn input_for_current_actor(&self) -> String {
        match self.last_turn() {
            None => self.original_topic.clone(),
            Some(turn) => DialoguePromptTemplate::actor_input(turn),
        }
    }

    /// Append a fully assembled turn and move the machine forward.
    ///
    /// In user-guidance mode the machine pauses without advancing the actor;
    /// otherwise the actor index advances and the round may roll over.
    pub fn record_turn(&mut self, turn: Turn) -> Result<(), DomainError> {
        self.ensure_phase(ConversationPhase::Running, "record a turn")?;
        if turn.sequence_index != self.turns.len() {
            return Err(DomainError::InvalidConfiguration(format!(
                "turn sequence index {} does not follow log of length {}",
                turn.sequence_index,
                self.turns.len()
            )));
        }

        self.turns.push(turn);
        self.pending_guidance_text = None;

        if self.moderation_mode == ModerationMode::UserGuidance {
            self.phase = ConversationPhase::AwaitingUserGuidance;
        } else {
            self.advance();
        }
        Ok(())
    }

    /// Accept human guidance for the paused turn.
    ///
    /// Blank guidance defers to [`FALLBACK_GUIDANCE`]. Returns the guidance
    /// actually applied and where it came from.
    pub fn resume(&mut self, guidance: &str) -> Result<(String, GuidanceSource), DomainError> {
        self.ensure_phase(ConversationPhase::AwaitingUserGuidance, "resume")?;

        let trimmed = guidance.trim();
        let (text, source) = if trimmed.is_empty() {
            (FALLBACK_GUIDANCE.to_string(), GuidanceSource::Fallback)
        } else {
            (trimmed.to_string(), GuidanceSource::User)
        };

        if let Some(turn) = self.turns.last_mut() {
            turn.attach_guidance(text.clone(), source);
        }
        self.pending_guidance_text = Some(text.clone());
        self.phase = ConversationPhase::Running;
        self.advance();
        Ok((text, source))
    }

    /// Transition to `Errored`
    pub fn fail(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
        self.phase = ConversationPhase::Errored;
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Number of turns a complete run of this conversation records
    pub fn expected_turns(&self) -> usize {
        self.speakers.len() * self.total_rounds as usize
    }

    fn advance(&mut self) {
        self.current_actor_index = (self.current_actor_index + 1) % self.speakers.len();
        if self.current_actor_index == 0 {
            self.round_number += 1;
        }
        if self.round_number > self.total_rounds {
            self.phase = ConversationPhase::Completed;
        }
    }
}
