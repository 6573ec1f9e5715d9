//! Prompt and transcript settings (`[prompts]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Where system prompts come from
///
/// ```toml
/// [prompts]
/// dir = "prompts"
///
/// [prompts.overrides]
/// socrates_philosophy = "You are Socrates. Answer only with questions."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    /// Directory holding `<persona>_<mode>.txt` files
    pub dir: PathBuf,
    /// Inline prompts keyed by `<persona>_<mode>`; non-blank entries win over files
    pub overrides: HashMap<String, String>,
}

impl Default for FilePromptsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("prompts"),
            overrides: HashMap::new(),
        }
    }
}

/// Transcript logging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Write a JSONL transcript per conversation into this directory
    pub transcript_dir: Option<PathBuf>,
}
