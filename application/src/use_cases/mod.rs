//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod director;
pub mod retrying_invoker;
pub mod run_dialogue;
pub(crate) mod shared;
