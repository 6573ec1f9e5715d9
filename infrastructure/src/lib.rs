//! Infrastructure layer for symposium
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, the persona registry,
//! the system prompt library, the OpenAI-compatible generator and the JSONL
//! transcript logger.

pub mod config;
pub mod logging;
pub mod personas;
pub mod prompts;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use logging::JsonlConversationLogger;
pub use personas::{PersonaRegistry, builtin_personas};
pub use prompts::{FALLBACK_SYSTEM_PROMPT, PromptLibrary, PromptSource};
pub use providers::{OpenAiCompatibleGenerator, ProviderError};
