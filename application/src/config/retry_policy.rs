//! Retry policy for generation calls.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded-retry policy applied to every generation call.
///
/// Transient failures wait exactly `delay` before the next attempt. After
/// `max_attempts` failed attempts the call is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed wait between a transient failure and the next attempt
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Attempt budget actually used; a zero budget still makes one attempt
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[test]
    fn test_builder() {
        let policy = RetryPolicy::default()
            .with_max_attempts(5)
            .with_delay(Duration::from_millis(10));
        assert_eq!(policy, RetryPolicy::new(5, Duration::from_millis(10)));
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        assert_eq!(RetryPolicy::default().with_max_attempts(0).effective_attempts(), 1);
    }
}
