//! Application layer for symposium
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RetryPolicy;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generation::{Capability, ErrorKind, GenerationError, RetryOutcome, TextGenerator},
    guidance::{AutoGuidance, GuidanceError, GuidanceProvider, GuidanceRequest},
    progress::{DialogueProgressNotifier, NoProgress},
};
pub use use_cases::director::{
    ConversationSetup, Director, DirectorError, SpeakerBinding, TurnOutcome,
};
pub use use_cases::retrying_invoker::{Invocation, InvokeError, RetryingInvoker};
pub use use_cases::run_dialogue::{
    DialogueEnding, DialogueReport, RunDialogueError, RunDialogueUseCase,
};
