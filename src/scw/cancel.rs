//! Request cancellation
//!
//! A cancellation token is handed to every transport call. Dropping or
//! triggering the matching [`CancelHandle`] makes pending calls resolve with
//! [`ApiError::Cancelled`](super::http::ApiError::Cancelled).

use tokio::sync::watch;

/// Owner side: cancels every token cloned from its pair
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Observer side, cheap to clone
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Create a linked handle/token pair
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// A token that is never cancelled
    pub fn never() -> Self {
        // No sender: `cancelled()` stays pending and the flag stays false
        let (_, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the paired handle cancels
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // Sender gone without cancelling: treat as never cancelled
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_waiters() {
        let (handle, token) = CancelToken::pair();
        let waiter = tokio::spawn({
            let token = token.clone();
            async move { token.cancelled().await }
        });

        handle.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("task should not panic");
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_dropping_handle_cancels() {
        let (handle, token) = CancelToken::pair();
        drop(handle);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_never_token_stays_pending() {
        let token = CancelToken::never();
        let mut waiter = tokio_test::task::spawn(token.cancelled());
        tokio_test::assert_pending!(waiter.poll());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_never_tokens_do_not_pin_their_channel() {
        let token = CancelToken::never();
        assert!(token.rx.has_changed().is_err());

        let mut waiter = tokio_test::task::spawn(token.cancelled());
        tokio_test::assert_pending!(waiter.poll());
        tokio_test::assert_pending!(waiter.poll());
    }

    #[test]
    fn test_cancelled_resolves_after_cancel() {
        let (handle, token) = CancelToken::pair();
        let mut waiter = tokio_test::task::spawn(token.cancelled());
        tokio_test::assert_pending!(waiter.poll());

        handle.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }
}
