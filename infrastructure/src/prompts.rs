//! System prompt library
//!
//! Prompts are resolved per persona and mode:
//!
//! 1. `[prompts.overrides]` entry `<persona>_<mode>` when non-blank
//! 2. `<prompts.dir>/<persona>_<mode>.txt`
//! 3. [`FALLBACK_SYSTEM_PROMPT`]
//!
//! Resolved prompts are cached for the lifetime of the library.

use crate::config::FilePromptsConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use symposium_domain::{ConversationMode, SpeakerId};
use tracing::{debug, warn};

pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Where a resolved prompt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSource {
    Override,
    File,
    Fallback,
}

pub struct PromptLibrary {
    dir: PathBuf,
    overrides: HashMap<String, String>,
    cache: Mutex<HashMap<String, Arc<str>>>,
}

impl PromptLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overrides: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &FilePromptsConfig) -> Self {
        Self::new(&config.dir).with_overrides(config.overrides.clone())
    }

    pub fn with_overrides(mut self, overrides: HashMap<String, String>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key(persona: &SpeakerId, mode: &ConversationMode) -> String {
        format!("{}_{}", persona, mode)
    }

    /// System prompt for `persona` in `mode`
    pub fn system_prompt(&self, persona: &SpeakerId, mode: &ConversationMode) -> Arc<str> {
        let key = Self::key(persona, mode);
        if let Ok(cache) = self.cache.lock()
            && let Some(prompt) = cache.get(&key)
        {
            return prompt.clone();
        }

        let (prompt, source) = self.load(&key);
        debug!("System prompt for {} resolved from {:?}", key, source);
        let prompt: Arc<str> = Arc::from(prompt);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, prompt.clone());
        }
        prompt
    }

    /// Resolve without caching
    pub fn load(&self, key: &str) -> (String, PromptSource) {
        if let Some(text) = self.overrides.get(key)
            && !text.trim().is_empty()
        {
            return (text.trim().to_string(), PromptSource::Override);
        }

        let path = self.dir.join(format!("{}.txt", key));
        match std::fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), PromptSource::File),
            Ok(_) => {
                warn!(
                    "Prompt file {} is empty, using fallback prompt",
                    path.display()
                );
                (FALLBACK_SYSTEM_PROMPT.to_string(), PromptSource::Fallback)
            }
            Err(e) => {
                warn!(
                    "Prompt file {} not readable ({}), using fallback prompt",
                    path.display(),
                    e
                );
                (FALLBACK_SYSTEM_PROMPT.to_string(), PromptSource::Fallback)
            }
        }
    }
}
