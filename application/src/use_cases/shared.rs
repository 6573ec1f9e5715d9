//! Shared utilities for use cases.
//!
//! Cancellation checks and cancellable waits used by the retrying invoker
//! and the director.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Returns `false` if the token exists and is cancelled.
pub(crate) fn is_live(token: &Option<CancellationToken>) -> bool {
    !token.as_ref().is_some_and(|t| t.is_cancelled())
}

/// Run `future` unless cancellation fires first.
///
/// Returns `None` when cancelled; the future is dropped.
pub(crate) async fn cancellable<F: Future>(
    token: &Option<CancellationToken>,
    future: F,
) -> Option<F::Output> {
    match token {
        Some(token) => {
            tokio::select! {
                biased;
                _ = token.cancelled() => None,
                output = future => Some(output),
            }
        }
        None => Some(future.await),
    }
}

/// Sleep for `delay` unless cancellation fires first.
///
/// Returns `false` when cancelled.
pub(crate) async fn cancellable_sleep(token: &Option<CancellationToken>, delay: Duration) -> bool {
    cancellable(token, tokio::time::sleep(delay)).await.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancellable_without_token_runs_future() {
        assert_eq!(cancellable(&None, async { 7 }).await, Some(7));
        assert!(is_live(&None));
    }

    #[tokio::test]
    async fn test_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();
        let token = Some(token);
        assert!(!is_live(&token));
        assert_eq!(cancellable(&token, std::future::pending::<u8>()).await, None);
        assert!(!cancellable_sleep(&token, Duration::from_secs(3600)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes_when_not_cancelled() {
        let token = Some(CancellationToken::new());
        assert!(cancellable_sleep(&token, Duration::from_secs(2)).await);
    }
}
