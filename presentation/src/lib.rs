//! Presentation layer for symposium
//!
//! This crate contains CLI definitions, the transcript formatter,
//! progress reporters and interactive guidance.

pub mod cli;
pub mod guidance;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use guidance::interactive::{GuidanceInput, InteractiveGuidance};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
