//! Interactive guidance

pub mod interactive;
