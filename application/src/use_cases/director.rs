//! Director: the conversation state machine driver.
//!
//! The director owns the authoritative [`ConversationState`] and the
//! capability handles resolved at start. An external driver (CLI loop,
//! event loop, test) calls [`Director::start`], then [`Director::step`]
//! repeatedly, calling [`Director::resume`] whenever the conversation pauses
//! for human guidance, until the phase is terminal.
//!
//! # Step
//!
//! ```text
//! input (topic or previous turn) ──▶ RetryingInvoker ──▶ ResponseCleaner
//!                                                             │
//!                      ┌──────────── moderation = ai ─────────┤
//!                      ▼                                      │
//!    moderator ──▶ parse SUMMARY/GUIDANCE                     │
//!                      │                                      │
//!                      └──────────▶ record turn ◀─────────────┘
//! ```
//!
//! State is only mutated once a turn is fully assembled. A cancelled step
//! leaves the conversation exactly as it was before the call.
//!
//! A director serves one conversation and assumes a single caller;
//! concurrent drivers must serialize `step`/`resume` themselves.

use super::retrying_invoker::{InvokeError, RetryingInvoker};
use super::shared::is_live;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::generation::{Capability, RetryOutcome};
use crate::ports::progress::{DialogueProgressNotifier, NoProgress};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use symposium_domain::util::preview;
use symposium_domain::{
    ConversationPhase, ConversationState, Degradation, DialoguePromptTemplate, DomainError,
    ModerationMode, ResponseCleaner, Speaker, SpeakerId, Topic, Turn, order_roster,
    parse_moderator_response,
};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const LOG_PREVIEW_BYTES: usize = 120;

/// Errors returned by director operations.
///
/// Generation failures are not errors at this level: they end the
/// conversation and come back as [`TurnOutcome::Failed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectorError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl DirectorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DirectorError::Cancelled)
    }

    pub fn is_invalid_phase(&self) -> bool {
        matches!(self, DirectorError::Domain(DomainError::InvalidPhase { .. }))
    }

    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            DirectorError::Domain(
                DomainError::InvalidConfiguration(_) | DomainError::InvalidTopic(_)
            )
        )
    }
}

/// A speaker and the capability that speaks for it
#[derive(Debug, Clone)]
pub struct SpeakerBinding {
    pub speaker: Speaker,
    pub capability: Capability,
}

impl SpeakerBinding {
    pub fn new(speaker: Speaker, capability: Capability) -> Self {
        Self {
            speaker,
            capability,
        }
    }
}

/// Everything [`Director::start`] needs
#[derive(Debug, Clone)]
pub struct ConversationSetup {
    pub topic: String,
    /// Ordered roster of at least two speakers
    pub speakers: Vec<SpeakerBinding>,
    pub total_rounds: u32,
    pub moderation_mode: ModerationMode,
    /// Rotate the roster so this speaker opens; `None` keeps roster order
    pub starting_speaker: Option<SpeakerId>,
    /// Required when `moderation_mode` is [`ModerationMode::Ai`]
    pub moderator: Option<Capability>,
}

impl ConversationSetup {
    pub fn new(topic: impl Into<String>, speakers: Vec<SpeakerBinding>, total_rounds: u32) -> Self {
        Self {
            topic: topic.into(),
            speakers,
            total_rounds,
            moderation_mode: ModerationMode::None,
            starting_speaker: None,
            moderator: None,
        }
    }

    pub fn with_ai_moderator(mut self, moderator: Capability) -> Self {
        self.moderation_mode = ModerationMode::Ai;
        self.moderator = Some(moderator);
        self
    }

    pub fn with_moderation_mode(mut self, mode: ModerationMode) -> Self {
        self.moderation_mode = mode;
        self
    }

    pub fn with_starting_speaker(mut self, id: impl Into<SpeakerId>) -> Self {
        self.starting_speaker = Some(id.into());
        self
    }
}

/// Result of a [`Director::step`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A turn was appended to the log (possibly degraded)
    Recorded {
        turn: Turn,
        phase: ConversationPhase,
    },
    /// The speaker's generation failed; the conversation is now `Errored`
    Failed {
        speaker: SpeakerId,
        error: InvokeError,
    },
}

impl TurnOutcome {
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            TurnOutcome::Recorded { turn, .. } => Some(turn),
            TurnOutcome::Failed { .. } => None,
        }
    }

    pub fn phase(&self) -> ConversationPhase {
        match self {
            TurnOutcome::Recorded { phase, .. } => *phase,
            TurnOutcome::Failed { .. } => ConversationPhase::Errored,
        }
    }
}

/// Orchestrates one conversation
pub struct Director {
    state: ConversationState,
    capabilities: HashMap<SpeakerId, Capability>,
    moderator: Option<Capability>,
    invoker: RetryingInvoker,
    cleaner: ResponseCleaner,
    progress: Arc<dyn DialogueProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Director {
    pub fn new(invoker: RetryingInvoker) -> Self {
        Self {
            state: ConversationState::idle(),
            capabilities: HashMap::new(),
            moderator: None,
            invoker,
            cleaner: ResponseCleaner::default(),
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn DialogueProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cleaner(mut self, cleaner: ResponseCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Cancel in-flight calls, retry waits and subsequent steps
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.invoker = self.invoker.with_cancellation(token.clone());
        self.cancellation_token = Some(token);
        self
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Snapshot of the current state; side-effect free in any phase
    pub fn current_state(&self) -> ConversationState {
        self.state.clone()
    }

    pub fn phase(&self) -> ConversationPhase {
        self.state.phase
    }

    /// Validate the setup and enter `Running`.
    ///
    /// Fails with `InvalidConfiguration` for fewer than two speakers, zero
    /// rounds, an empty topic, an unknown starting speaker, or AI moderation
    /// without a moderator capability.
    pub fn start(&mut self, setup: ConversationSetup) -> Result<(), DirectorError> {
        self.state.ensure_phase(ConversationPhase::Idle, "start")?;

        let topic = Topic::parse(&setup.topic)?;
        if setup.moderation_mode == ModerationMode::Ai && setup.moderator.is_none() {
            return Err(DomainError::InvalidConfiguration(
                "AI moderation requires a moderator capability".to_string(),
            )
            .into());
        }

        let mut capabilities = HashMap::with_capacity(setup.speakers.len());
        let mut speakers = Vec::with_capacity(setup.speakers.len());
        for binding in setup.speakers {
            capabilities.insert(binding.speaker.id.clone(), binding.capability);
            speakers.push(binding.speaker);
        }
        let speakers = order_roster(speakers, setup.starting_speaker.as_ref())?;

        let state =
            ConversationState::start(topic, speakers, setup.total_rounds, setup.moderation_mode)?;

        info!(
            "Starting {} conversation: {} speakers, {} rounds, first speaker {}",
            state.moderation_mode,
            state.speakers.len(),
            state.total_rounds,
            state.speakers[0].id
        );

        self.state = state;
        self.capabilities = capabilities;
        self.moderator = setup.moderator;

        self.conversation_logger
            .log(ConversationEvent::conversation_started(&self.state));
        self.progress.on_phase_change(self.state.phase);
        Ok(())
    }

    /// Play the current speaker's turn.
    ///
    /// Valid only while `Running`. Speaker failures end the conversation and
    /// are returned as [`TurnOutcome::Failed`]; moderator failures only
    /// degrade the turn.
    pub async fn step(&mut self) -> Result<TurnOutcome, DirectorError> {
        self.state.ensure_phase(ConversationPhase::Running, "step")?;
        if !is_live(&self.cancellation_token) {
            return Err(DirectorError::Cancelled);
        }

        let speaker = self
            .state
            .current_speaker()
            .cloned()
            .ok_or_else(|| DomainError::InvalidConfiguration("empty roster".to_string()))?;
        let capability = self.capabilities.get(&speaker.id).cloned().ok_or_else(|| {
            DomainError::InvalidConfiguration(format!("no capability bound to '{}'", speaker.id))
        })?;
        let round = self.state.round_number;
        let input = self.state.input_for_current_actor();

        info!("Round {}: {} speaks", round, speaker.display_name);
        self.progress.on_turn_start(&speaker, round);

        let result = self
            .invoker
            .invoke_with_progress(&capability, &input, &self.attempt_log())
            .await;
        let invocation = match result {
            Ok(invocation) => invocation,
            Err(InvokeError::Cancelled) => {
                info!("Round {}: {}'s turn cancelled", round, speaker.id);
                return Err(DirectorError::Cancelled);
            }
            Err(err) => {
                error!("Round {}: {} failed: {}", round, speaker.id, err);
                self.state.fail(format!(
                    "{} failed in round {}: {}",
                    speaker.display_name, round, err
                ));
                self.conversation_logger
                    .log(ConversationEvent::conversation_finished(&self.state));
                self.progress.on_phase_change(self.state.phase);
                return Ok(TurnOutcome::Failed {
                    speaker: speaker.id,
                    error: err,
                });
            }
        };

        let cleaned = self.cleaner.clean(&invocation.text);
        if cleaned.is_empty() {
            warn!(
                "Round {}: {} produced no visible text after reasoning extraction; recording degraded turn",
                round, speaker.id
            );
        }
        let mut turn = Turn::new(
            self.state.next_sequence_index(),
            speaker.id.clone(),
            round,
            cleaned,
        );

        if self.state.moderation_mode == ModerationMode::Ai {
            turn = self.moderate(turn, &speaker).await?;
        }

        let previous_phase = self.state.phase;
        self.state.record_turn(turn.clone())?;
        debug!(
            "Recorded turn {} by {}: {}",
            turn.sequence_index,
            turn.speaker_id,
            preview(&turn.visible_text, LOG_PREVIEW_BYTES)
        );

        self.conversation_logger
            .log(ConversationEvent::turn_recorded(&turn));
        self.progress.on_turn_recorded(&turn);
        self.after_transition(previous_phase);

        Ok(TurnOutcome::Recorded {
            turn,
            phase: self.state.phase,
        })
    }

    /// Accept guidance for the paused turn and continue.
    ///
    /// Valid only while `AwaitingUserGuidance`. Blank guidance means "let
    /// the system choose" and applies the fallback guidance.
    pub fn resume(&mut self, guidance: &str) -> Result<ConversationPhase, DirectorError> {
        let previous_phase = self.state.phase;
        let (applied, source) = self.state.resume(guidance)?;
        let turn_index = self.state.turns.len().saturating_sub(1);

        info!("Guidance applied to turn {} ({:?})", turn_index, source);
        self.conversation_logger
            .log(ConversationEvent::guidance_applied(turn_index, &applied, source));
        self.after_transition(previous_phase);
        Ok(self.state.phase)
    }

    async fn moderate(&self, turn: Turn, speaker: &Speaker) -> Result<Turn, DirectorError> {
        let Some(moderator) = self.moderator.as_ref() else {
            return Ok(turn);
        };
        let Some(next) = self.state.next_speaker() else {
            return Ok(turn);
        };
        let input = DialoguePromptTemplate::moderator_input(speaker, &turn.visible_text, next);

        self.progress.on_moderation_start(&turn);
        match self
            .invoker
            .invoke_with_progress(moderator, &input, &self.attempt_log())
            .await
        {
            Ok(invocation) => {
                // Moderators may reason too; only the visible part is parsed
                let cleaned = self.cleaner.clean(&invocation.text);
                let result = parse_moderator_response(&cleaned.visible_text);
                if result.guidance_was_fallback {
                    warn!(
                        "Round {}: moderator output after {} had no GUIDANCE line; using fallback guidance",
                        turn.round_number, speaker.id
                    );
                }
                Ok(turn.with_moderation(result))
            }
            Err(InvokeError::Cancelled) => Err(DirectorError::Cancelled),
            Err(err) => {
                warn!(
                    "Round {}: moderator failed after {}: {}; continuing without moderation",
                    turn.round_number, speaker.id, err
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "moderation_degraded",
                    json!({
                        "sequence_index": turn.sequence_index,
                        "speaker": speaker.id.as_str(),
                        "degradation": Degradation::ModeratorUnavailable.as_str(),
                        "error": err.to_string(),
                    }),
                ));
                Ok(turn.with_moderator_unavailable())
            }
        }
    }

    fn attempt_log(&self) -> AttemptLog<'_> {
        AttemptLog {
            progress: self.progress.as_ref(),
            logger: self.conversation_logger.as_ref(),
        }
    }

    fn after_transition(&self, previous_phase: ConversationPhase) {
        let phase = self.state.phase;
        if phase == previous_phase {
            return;
        }
        debug!("Conversation phase: {} -> {}", previous_phase, phase);
        self.progress.on_phase_change(phase);
        if phase == ConversationPhase::Completed {
            info!(
                "Conversation completed after {} rounds ({} turns)",
                self.state.total_rounds,
                self.state.turns.len()
            );
            self.conversation_logger
                .log(ConversationEvent::conversation_finished(&self.state));
        }
    }
}

/// Forwards attempts to progress and records failed ones in the transcript
struct AttemptLog<'a> {
    progress: &'a dyn DialogueProgressNotifier,
    logger: &'a dyn ConversationLogger,
}

impl DialogueProgressNotifier for AttemptLog<'_> {
    fn on_attempt(&self, persona: &SpeakerId, outcome: &RetryOutcome) {
        self.progress.on_attempt(persona, outcome);
        if let Some(error) = outcome.error.as_ref() {
            self.logger.log(ConversationEvent::new(
                "attempt_failed",
                json!({
                    "persona": persona.as_str(),
                    "attempt": outcome.attempt_number,
                    "max_attempts": outcome.max_attempts,
                    "error_kind": outcome.error_kind,
                    "error": error.to_string(),
                    "will_retry": outcome.will_retry(),
                }),
            ));
        }
    }
}
