//! Bounded-retry invocation of a generation capability.
//!
//! Each attempt is one call to the capability. Transient failures wait a
//! fixed delay and try again; fatal failures abort at once without using
//! the rest of the budget. Both the call and the wait are cancellable.
//!
//! ```text
//! attempt 1 ──▶ transient ──▶ wait ──▶ attempt 2 ──▶ transient ──▶ wait ──▶ attempt 3 ──▶ ok
//!                  │                                                          │
//!                  └── fatal ──▶ Fatal                       transient ──▶ ExhaustedRetries
//! ```

use super::shared::{cancellable, cancellable_sleep, is_live};
use crate::config::RetryPolicy;
use crate::ports::generation::{Capability, GenerationError, RetryOutcome};
use crate::ports::progress::{DialogueProgressNotifier, NoProgress};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors returned by [`RetryingInvoker::invoke`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Exhausted retries after {attempts} attempts: {last_error}")]
    ExhaustedRetries {
        attempts: u32,
        last_error: GenerationError,
    },

    #[error("Fatal invocation error on attempt {attempt}: {error}")]
    Fatal { attempt: u32, error: GenerationError },

    #[error("Operation cancelled")]
    Cancelled,
}

impl InvokeError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, InvokeError::Cancelled)
    }

    /// Attempts consumed before the error
    pub fn attempts(&self) -> u32 {
        match self {
            InvokeError::ExhaustedRetries { attempts, .. } => *attempts,
            InvokeError::Fatal { attempt, .. } => *attempt,
            InvokeError::Cancelled => 0,
        }
    }
}

/// A successful invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Raw generated text
    pub text: String,
    /// Attempts consumed, including the successful one
    pub attempts: u32,
    /// Inter-attempt waits performed
    pub waits: u32,
}

/// Wraps generation calls with a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryingInvoker {
    policy: RetryPolicy,
    cancellation_token: Option<CancellationToken>,
}

impl RetryingInvoker {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            cancellation_token: None,
        }
    }

    /// Abort in-flight calls and waits when the token is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Invoke with default (no-op) progress
    pub async fn invoke(
        &self,
        capability: &Capability,
        input: &str,
    ) -> Result<Invocation, InvokeError> {
        self.invoke_with_progress(capability, input, &NoProgress)
            .await
    }

    /// Invoke, reporting every attempt to `progress`
    pub async fn invoke_with_progress(
        &self,
        capability: &Capability,
        input: &str,
        progress: &dyn DialogueProgressNotifier,
    ) -> Result<Invocation, InvokeError> {
        let max_attempts = self.policy.effective_attempts();
        let persona = capability.persona();
        let mut attempt = 0;
        let mut waits = 0;

        loop {
            if !is_live(&self.cancellation_token) {
                return Err(InvokeError::Cancelled);
            }
            attempt += 1;

            debug!(
                "Requesting {} (attempt {}/{})",
                persona, attempt, max_attempts
            );
            let result = cancellable(&self.cancellation_token, capability.generate(input))
                .await
                .ok_or(InvokeError::Cancelled)?;

            let error = match result {
                Ok(text) => {
                    progress.on_attempt(persona, &RetryOutcome::success(attempt, max_attempts, &text));
                    debug!("{} responded on attempt {}", persona, attempt);
                    return Ok(Invocation {
                        text,
                        attempts: attempt,
                        waits,
                    });
                }
                Err(error) => error,
            };

            progress.on_attempt(persona, &RetryOutcome::failure(attempt, max_attempts, &error));

            if !error.is_transient() {
                warn!(
                    "{} failed with fatal {} error on attempt {}: {}",
                    persona,
                    error.label(),
                    attempt,
                    error
                );
                return Err(InvokeError::Fatal { attempt, error });
            }

            if attempt >= max_attempts {
                warn!(
                    "{} failed permanently after {} attempts: {}",
                    persona, attempt, error
                );
                return Err(InvokeError::ExhaustedRetries {
                    attempts: attempt,
                    last_error: error,
                });
            }

            warn!(
                "{} attempt {}/{} failed ({}), retrying in {:?}",
                persona,
                attempt,
                max_attempts,
                error.label(),
                self.policy.delay
            );
            if !cancellable_sleep(&self.cancellation_token, self.policy.delay).await {
                return Err(InvokeError::Cancelled);
            }
            waits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::generation::TextGenerator;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use symposium_domain::{ConversationMode, SpeakerId};

    // ==================== Test Mocks ====================

    struct ScriptedGenerator {
        results: Mutex<VecDeque<Result<String, GenerationError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedGenerator {
        fn new(results: Vec<Result<String, GenerationError>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(VecDeque::from(results)),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _persona: &SpeakerId,
            _mode: &ConversationMode,
            _input: &str,
        ) -> Result<String, GenerationError> {
            *self.calls.lock().unwrap() += 1;
            self.results
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Connection("script exhausted".into())))
        }
    }

    struct HangingGenerator;

    #[async_trait]
    impl TextGenerator for HangingGenerator {
        async fn generate(
            &self,
            _persona: &SpeakerId,
            _mode: &ConversationMode,
            _input: &str,
        ) -> Result<String, GenerationError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        outcomes: Mutex<Vec<RetryOutcome>>,
    }

    impl DialogueProgressNotifier for RecordingProgress {
        fn on_attempt(&self, _persona: &SpeakerId, outcome: &RetryOutcome) {
            self.outcomes.lock().unwrap().push(outcome.clone());
        }
    }

    fn capability(generator: Arc<dyn TextGenerator>) -> Capability {
        Capability::new(generator, "socrates", ConversationMode::default())
    }

    fn transient() -> GenerationError {
        GenerationError::Timeout("slow".into())
    }

    fn invoker(max_attempts: u32) -> RetryingInvoker {
        RetryingInvoker::new(RetryPolicy::new(max_attempts, Duration::from_secs(2)))
    }

    // ==================== Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_success_on_first_attempt() {
        let generator = ScriptedGenerator::new(vec![Ok("hello".into())]);
        let result = invoker(3)
            .invoke(&capability(generator.clone()), "topic")
            .await
            .unwrap();
        assert_eq!(result.text, "hello");
        assert_eq!(result.attempts, 1);
        assert_eq!(result.waits, 0);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_transient_failures_then_success() {
        let generator =
            ScriptedGenerator::new(vec![Err(transient()), Err(transient()), Ok("third".into())]);
        let progress = RecordingProgress::default();

        let start = tokio::time::Instant::now();
        let result = invoker(3)
            .invoke_with_progress(&capability(generator.clone()), "topic", &progress)
            .await
            .unwrap();

        assert_eq!(result.text, "third");
        assert_eq!(result.attempts, 3);
        assert_eq!(result.waits, 2);
        assert_eq!(generator.calls(), 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));

        let outcomes = progress.outcomes.lock().unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(!outcomes[0].succeeded && outcomes[0].will_retry());
        assert!(outcomes[2].succeeded);
        assert_eq!(outcomes[2].result_text.as_deref(), Some("third"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_transient_failures_exhaust_retries() {
        let generator =
            ScriptedGenerator::new(vec![Err(transient()), Err(transient()), Err(transient())]);
        let err = invoker(3)
            .invoke(&capability(generator.clone()), "topic")
            .await
            .unwrap_err();

        assert_eq!(
            err,
            InvokeError::ExhaustedRetries {
                attempts: 3,
                last_error: transient()
            }
        );
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_does_not_wait_after_last_attempt() {
        let generator = ScriptedGenerator::new(vec![Err(transient()), Err(transient())]);
        let start = tokio::time::Instant::now();
        let _ = invoker(2).invoke(&capability(generator), "topic").await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_aborts_immediately() {
        let generator = ScriptedGenerator::new(vec![
            Err(transient()),
            Err(GenerationError::Authentication("bad key".into())),
            Ok("never".into()),
        ]);
        let err = invoker(5)
            .invoke(&capability(generator.clone()), "topic")
            .await
            .unwrap_err();

        assert!(matches!(err, InvokeError::Fatal { attempt: 2, .. }));
        assert_eq!(err.attempts(), 2);
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let token = CancellationToken::new();
        let generator = ScriptedGenerator::new(vec![Err(transient()), Ok("late".into())]);
        let invoker = RetryingInvoker::new(RetryPolicy::new(3, Duration::from_secs(60)))
            .with_cancellation(token.clone());

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            cancel.cancel();
        });

        let err = invoker
            .invoke(&capability(generator.clone()), "topic")
            .await
            .unwrap_err();
        assert_eq!(err, InvokeError::Cancelled);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_call() {
        let token = CancellationToken::new();
        let invoker = invoker(3).with_cancellation(token.clone());

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            cancel.cancel();
        });

        let err = invoker
            .invoke(&capability(Arc::new(HangingGenerator)), "topic")
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_already_cancelled_makes_no_attempt() {
        let token = CancellationToken::new();
        token.cancel();
        let generator = ScriptedGenerator::new(vec![Ok("unused".into())]);
        let err = invoker(3)
            .with_cancellation(token)
            .invoke(&capability(generator.clone()), "topic")
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(generator.calls(), 0);
    }
}
