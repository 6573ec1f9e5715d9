//! Text generation port
//!
//! Defines the single capability the dialogue core consumes:
//! "generate text for persona P in mode M given input text".
//! Model selection, credentials and transport live in adapters.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use symposium_domain::{ConversationMode, SpeakerId};
use thiserror::Error;

/// Whether a failed call is worth retrying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network, timeout or rate-limit shaped; retried
    Transient,
    /// Authentication or malformed-request shaped; aborts immediately
    Fatal,
}

/// Errors returned by a [`TextGenerator`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Timeout(_)
            | GenerationError::RateLimited(_)
            | GenerationError::Connection(_)
            | GenerationError::ServerError(_)
            | GenerationError::InvalidResponse(_) => ErrorKind::Transient,
            GenerationError::Authentication(_) | GenerationError::InvalidRequest(_) => {
                ErrorKind::Fatal
            }
        }
    }

    pub fn is_transient(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }

    /// Short machine-readable label for logs
    pub fn label(&self) -> &'static str {
        match self {
            GenerationError::Timeout(_) => "timeout",
            GenerationError::RateLimited(_) => "rate_limited",
            GenerationError::Connection(_) => "connection",
            GenerationError::ServerError(_) => "server_error",
            GenerationError::InvalidResponse(_) => "invalid_response",
            GenerationError::Authentication(_) => "authentication",
            GenerationError::InvalidRequest(_) => "invalid_request",
        }
    }
}

/// Generation capability provided by an adapter.
///
/// Implementations must be safe to call concurrently; one generator may be
/// shared by several conversations.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        persona: &SpeakerId,
        mode: &ConversationMode,
        input: &str,
    ) -> Result<String, GenerationError>;
}

/// A [`TextGenerator`] with persona and mode already bound.
///
/// Cheap to clone; the director resolves one per speaker at start and
/// never mutates it.
#[derive(Clone)]
pub struct Capability {
    generator: Arc<dyn TextGenerator>,
    persona: SpeakerId,
    mode: ConversationMode,
}

impl Capability {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        persona: impl Into<SpeakerId>,
        mode: ConversationMode,
    ) -> Self {
        Self {
            generator,
            persona: persona.into(),
            mode,
        }
    }

    pub fn persona(&self) -> &SpeakerId {
        &self.persona
    }

    pub fn mode(&self) -> &ConversationMode {
        &self.mode
    }

    pub async fn generate(&self, input: &str) -> Result<String, GenerationError> {
        self.generator.generate(&self.persona, &self.mode, input).await
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("persona", &self.persona)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Record of one invocation attempt.
///
/// Reported to progress observers; never stored in conversation state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryOutcome {
    pub attempt_number: u32,
    pub max_attempts: u32,
    pub succeeded: bool,
    pub error_kind: Option<ErrorKind>,
    pub error: Option<GenerationError>,
    pub result_text: Option<String>,
}

impl RetryOutcome {
    pub fn success(attempt_number: u32, max_attempts: u32, text: &str) -> Self {
        Self {
            attempt_number,
            max_attempts,
            succeeded: true,
            error_kind: None,
            error: None,
            result_text: Some(text.to_string()),
        }
    }

    pub fn failure(attempt_number: u32, max_attempts: u32, error: &GenerationError) -> Self {
        Self {
            attempt_number,
            max_attempts,
            succeeded: false,
            error_kind: Some(error.kind()),
            error: Some(error.clone()),
            result_text: None,
        }
    }

    /// A failed transient attempt that still has budget left
    pub fn will_retry(&self) -> bool {
        !self.succeeded
            && self.error_kind == Some(ErrorKind::Transient)
            && self.attempt_number < self.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(
            &self,
            persona: &SpeakerId,
            mode: &ConversationMode,
            input: &str,
        ) -> Result<String, GenerationError> {
            Ok(format!("{}/{}: {}", persona, mode, input))
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(GenerationError::Timeout("t".into()).is_transient());
        assert!(GenerationError::RateLimited("429".into()).is_transient());
        assert!(GenerationError::Connection("refused".into()).is_transient());
        assert!(GenerationError::ServerError("503".into()).is_transient());
        assert!(GenerationError::InvalidResponse("empty".into()).is_transient());
        assert_eq!(
            GenerationError::Authentication("401".into()).kind(),
            ErrorKind::Fatal
        );
        assert_eq!(
            GenerationError::InvalidRequest("400".into()).kind(),
            ErrorKind::Fatal
        );
    }

    #[tokio::test]
    async fn test_capability_binds_persona_and_mode() {
        let capability = Capability::new(Arc::new(Echo), "socrates", ConversationMode::new("bio"));
        let text = capability.generate("hello").await.unwrap();
        assert_eq!(text, "socrates/bio: hello");
        assert_eq!(capability.persona().as_str(), "socrates");
    }

    #[test]
    fn test_retry_outcome_will_retry() {
        let err = GenerationError::Timeout("slow".into());
        assert!(RetryOutcome::failure(1, 3, &err).will_retry());
        assert!(!RetryOutcome::failure(3, 3, &err).will_retry());

        let fatal = GenerationError::Authentication("bad key".into());
        assert!(!RetryOutcome::failure(1, 3, &fatal).will_retry());
        assert!(!RetryOutcome::success(1, 3, "ok").will_retry());
    }
}
