//! Conversation domain
//!
//! Entities and pure state transitions for a turn-based dialogue:
//!
//! - [`speaker::Speaker`]: a participant in the roster
//! - [`turn::Turn`]: one recorded utterance, immutable once appended
//! - [`state::ConversationState`]: the authoritative record and its phase machine
//! - [`cleaner::ResponseCleaner`]: reasoning-block extraction from raw output

pub mod cleaner;
pub mod speaker;
pub mod state;
pub mod turn;
