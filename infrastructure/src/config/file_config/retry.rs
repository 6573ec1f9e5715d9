//! Retry configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use symposium_application::RetryPolicy;
use symposium_domain::ConfigIssue;

/// Raw retry configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Attempts per generation call, including the first
    pub max_attempts: u32,
    /// Fixed wait between attempts
    pub delay_secs: u64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            delay_secs: policy.delay.as_secs(),
        }
    }
}

impl FileRetryConfig {
    pub fn to_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.delay_secs))
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.max_attempts == 0 {
            vec![ConfigIssue::warning(
                "retry.max_attempts",
                "max_attempts is 0, every call will still be attempted once",
            )]
        } else {
            Vec::new()
        }
    }
}
