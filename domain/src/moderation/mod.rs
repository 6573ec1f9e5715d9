//! Moderation domain
//!
//! The moderator reads the last turn and answers in a two-line format:
//!
//! ```text
//! SUMMARY: <one-sentence summary of the last turn>
//! GUIDANCE: <direction for the next speaker>
//! ```
//!
//! Output frequently arrives length-truncated, so parsing never fails;
//! missing fields resolve to documented fallbacks.

pub mod parsing;

pub use parsing::{
    FALLBACK_GUIDANCE, GUIDANCE_MARKER, ModeratorResult, SUMMARY_MARKER, parse_moderator_response,
};
