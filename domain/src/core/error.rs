//! Domain error types

use crate::conversation::state::ConversationPhase;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Cannot {operation} while conversation is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: ConversationPhase,
    },

    #[error("Operation cancelled")]
    Cancelled,
}

impl DomainError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DomainError::Cancelled)
    }

    /// Check if this error is caused by driver misuse rather than a failure
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidConfiguration(_)
                | DomainError::InvalidTopic(_)
                | DomainError::InvalidPhase { .. }
        )
    }
}
