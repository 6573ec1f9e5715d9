//! Prompt domain
//!
//! Templates for the text handed to speakers and to the moderator.

mod template;

pub use template::DialoguePromptTemplate;
