//! Application-level configuration.
//!
//! - [`RetryPolicy`]: attempt budget and inter-attempt delay for generation calls

pub mod retry_policy;

pub use retry_policy::RetryPolicy;
