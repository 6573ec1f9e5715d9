//! Domain layer for symposium
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Dialogue
//!
//! Two (or more) personas take turns answering each other. Each turn's input
//! is the previous turn's visible text, or the topic for the very first turn.
//!
//! ## Moderation
//!
//! - **None**: speakers answer each other directly
//! - **Ai**: a moderator persona summarizes every turn and proposes guidance
//! - **UserGuidance**: the conversation pauses after each turn for a human

pub mod conversation;
pub mod core;
pub mod moderation;
pub mod persona;
pub mod prompt;
pub mod util;

// Re-export commonly used types
pub use conversation::{
    cleaner::{CleanedResponse, REASONING_CLOSE, REASONING_OPEN, ResponseCleaner},
    speaker::{Speaker, SpeakerId},
    state::{ConversationPhase, ConversationState, ModerationMode, order_roster},
    turn::{Degradation, GuidanceSource, Turn},
};
pub use core::{
    error::DomainError,
    topic::Topic,
    validation::{ConfigIssue, Severity},
};
pub use moderation::{FALLBACK_GUIDANCE, ModeratorResult, parse_moderator_response};
pub use persona::{ConversationMode, MODERATOR_PERSONA, PersonaProfile};
pub use prompt::DialoguePromptTemplate;
