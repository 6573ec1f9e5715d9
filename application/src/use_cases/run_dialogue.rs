//! Run Dialogue use case
//!
//! Drives a [`Director`] from start to a terminal phase, asking a
//! [`GuidanceProvider`] for direction whenever the conversation pauses.

use super::director::{ConversationSetup, Director, DirectorError, TurnOutcome};
use super::retrying_invoker::{InvokeError, RetryingInvoker};
use super::shared::cancellable;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::guidance::{AutoGuidance, GuidanceError, GuidanceProvider, GuidanceRequest};
use crate::ports::progress::{DialogueProgressNotifier, NoProgress};
use serde::Serialize;
use std::sync::Arc;
use symposium_domain::{ConversationPhase, ConversationState, SpeakerId};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that prevent a dialogue from running at all
#[derive(Error, Debug)]
pub enum RunDialogueError {
    #[error(transparent)]
    Director(#[from] DirectorError),

    #[error("Guidance failed: {0}")]
    Guidance(#[from] GuidanceError),
}

/// How a dialogue run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueEnding {
    Completed,
    Failed,
    Cancelled,
}

/// Outcome of a dialogue run, including partial transcripts
#[derive(Debug, Clone, Serialize)]
pub struct DialogueReport {
    pub ending: DialogueEnding,
    pub state: ConversationState,
    /// Speaker whose turn ended the conversation, if it failed
    pub failed_speaker: Option<SpeakerId>,
    #[serde(skip)]
    pub failure: Option<InvokeError>,
}

impl DialogueReport {
    fn from_director(director: &Director, ending: DialogueEnding) -> Self {
        Self {
            ending,
            state: director.current_state(),
            failed_speaker: None,
            failure: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.ending == DialogueEnding::Completed
    }

    pub fn degraded_turns(&self) -> usize {
        self.state.turns.iter().filter(|t| t.is_degraded()).count()
    }
}

/// Use case for running a dialogue to completion
pub struct RunDialogueUseCase {
    invoker: RetryingInvoker,
    guidance: Arc<dyn GuidanceProvider>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl RunDialogueUseCase {
    pub fn new(invoker: RetryingInvoker) -> Self {
        Self {
            invoker,
            guidance: Arc::new(AutoGuidance),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_guidance(mut self, guidance: Arc<dyn GuidanceProvider>) -> Self {
        self.guidance = guidance;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute with default (no-op) progress
    pub async fn execute(
        &self,
        setup: ConversationSetup,
    ) -> Result<DialogueReport, RunDialogueError> {
        self.execute_with_progress(setup, Arc::new(NoProgress)).await
    }

    /// Execute with progress callbacks
    pub async fn execute_with_progress(
        &self,
        setup: ConversationSetup,
        progress: Arc<dyn DialogueProgressNotifier>,
    ) -> Result<DialogueReport, RunDialogueError> {
        let mut director = Director::new(self.invoker.clone())
            .with_progress(progress)
            .with_conversation_logger(self.conversation_logger.clone());
        if let Some(token) = &self.cancellation_token {
            director = director.with_cancellation(token.clone());
        }

        director.start(setup)?;

        loop {
            match director.phase() {
                ConversationPhase::Running => match director.step().await {
                    Ok(TurnOutcome::Recorded { .. }) => {}
                    Ok(TurnOutcome::Failed { speaker, error }) => {
                        let mut report =
                            DialogueReport::from_director(&director, DialogueEnding::Failed);
                        report.failed_speaker = Some(speaker);
                        report.failure = Some(error);
                        return Ok(report);
                    }
                    Err(DirectorError::Cancelled) => return Ok(self.cancelled(&director)),
                    Err(err) => return Err(err.into()),
                },
                ConversationPhase::AwaitingUserGuidance => {
                    let Some(request) = GuidanceRequest::from_state(director.state()) else {
                        // A paused conversation always has a last turn
                        director.resume("")?;
                        continue;
                    };
                    let guidance = cancellable(
                        &self.cancellation_token,
                        self.guidance.request_guidance(&request),
                    )
                    .await;
                    match guidance {
                        None | Some(Err(GuidanceError::Cancelled)) => {
                            return Ok(self.cancelled(&director));
                        }
                        Some(Err(err)) => return Err(err.into()),
                        Some(Ok(text)) => {
                            director.resume(&text)?;
                        }
                    }
                }
                ConversationPhase::Completed => {
                    info!(
                        "Dialogue completed with {} turns",
                        director.state().turns.len()
                    );
                    return Ok(DialogueReport::from_director(
                        &director,
                        DialogueEnding::Completed,
                    ));
                }
                // Idle cannot follow a successful start
                ConversationPhase::Errored | ConversationPhase::Idle => {
                    return Ok(DialogueReport::from_director(
                        &director,
                        DialogueEnding::Failed,
                    ));
                }
            }
        }
    }

    fn cancelled(&self, director: &Director) -> DialogueReport {
        warn!(
            "Dialogue cancelled after {} turns",
            director.state().turns.len()
        );
        DialogueReport::from_director(director, DialogueEnding::Cancelled)
    }
}
