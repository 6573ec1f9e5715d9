//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`]: a validated opening topic for a dialogue
//! - [`error::DomainError`]: domain-level errors
//! - [`validation::ConfigIssue`]: issues reported by configuration validation

pub mod error;
pub mod topic;
pub mod validation;
