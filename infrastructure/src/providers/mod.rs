//! Generation adapters implementing the `TextGenerator` port.

pub mod openai_compat;

pub use openai_compat::{OpenAiCompatibleGenerator, ProviderError};
