//! Cooperative cancellation for in-flight calls.
//!
//! Every asynchronous client and session operation takes a
//! [`CancelToken`]. When the owner of the work goes away (a page is
//! closed, the app shuts down) it calls [`CancelToken::cancel`], and the
//! pending call returns early instead of writing late results.

use std::sync::Arc;

use tokio::sync::watch;

/// A cloneable cancellation flag.
///
/// Clones share the same flag: cancelling one cancels all of them.
/// Once cancelled, a token stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Creates a fresh, un-cancelled token.
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Cancels the token and wakes every task waiting in [`cancelled`](Self::cancelled).
    ///
    /// Idempotent.
    pub fn cancel(&self) {
        if !self.flag.send_replace(true) {
            tracing::debug!("cancellation requested");
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Resolves when the token is cancelled. Resolves immediately if it
    /// already is.
    ///
    /// Meant for the losing branch of a `tokio::select!` around the real work.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives inside `self`, so the channel cannot close while
        // we wait; an `Err` here is unreachable in practice.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_new_token_is_not_cancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();

        clone.cancel();

        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_resolves_after_cancel() {
        let token = CancelToken::new();
        let waiter = token.clone();

        let handle = tokio::spawn(async move { waiter.cancelled().await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake up")
            .expect("task should not panic");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pends_while_active() {
        let token = CancelToken::new();

        let result =
            tokio::time::timeout(Duration::from_secs(5), token.cancelled())
                .await;

        assert!(result.is_err(), "active token should never resolve");
    }

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();

        token.cancelled().await;
    }
}
