//! Subscription handle (Reactor `Disposable`-like)

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tracing::debug;

const EMITTING: u8 = 0;
const COMPLETED: u8 = 1;
const CANCELLED: u8 = 2;

/// Lifecycle of one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Emitting,
    Completed,
    Cancelled,
}

struct Inner {
    state: AtomicU8,
    cancelled: Notify,
}

/// Handle on an active evaluation of a [`Flux`](super::Flux)
///
/// Dropping the handle does not cancel the evaluation.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

impl Subscription {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: AtomicU8::new(EMITTING),
                cancelled: Notify::new(),
            }),
        }
    }

    /// Cancel the evaluation; no further `next`/`complete` callbacks fire
    pub fn unsubscribe(&self) {
        if self.transition(CANCELLED) {
            debug!("Subscription cancelled");
            self.inner.cancelled.notify_waiters();
        }
    }

    /// Check if subscription is still emitting
    pub fn is_active(&self) -> bool {
        self.inner.state.load(Ordering::Acquire) == EMITTING
    }

    pub fn state(&self) -> SubscriptionState {
        match self.inner.state.load(Ordering::Acquire) {
            EMITTING => SubscriptionState::Emitting,
            COMPLETED => SubscriptionState::Completed,
            _ => SubscriptionState::Cancelled,
        }
    }

    /// Move to completed; false if the subscription already reached a terminal state
    pub(crate) fn complete(&self) -> bool {
        self.transition(COMPLETED)
    }

    /// Resolves once `unsubscribe` is called.
    ///
    /// Must be created before checking [`is_active`](Self::is_active) so a cancel
    /// racing with the check is not missed.
    pub(crate) fn cancelled(&self) -> Notified<'_> {
        self.inner.cancelled.notified()
    }

    fn transition(&self, terminal: u8) -> bool {
        self.inner
            .state
            .compare_exchange(EMITTING, terminal, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_subscription_is_active() {
        let subscription = Subscription::new();
        assert!(subscription.is_active());
        assert_eq!(subscription.state(), SubscriptionState::Emitting);
    }

    #[test]
    fn test_unsubscribe_is_terminal() {
        let subscription = Subscription::new();
        subscription.unsubscribe();

        assert!(!subscription.is_active());
        assert!(!subscription.complete());
        assert_eq!(subscription.state(), SubscriptionState::Cancelled);
    }

    #[test]
    fn test_complete_only_once() {
        let subscription = Subscription::new();
        assert!(subscription.complete());
        assert!(!subscription.complete());

        subscription.unsubscribe();
        assert_eq!(subscription.state(), SubscriptionState::Completed);
    }

    #[test]
    fn test_clones_share_state() {
        let subscription = Subscription::new();
        let clone = subscription.clone();
        clone.unsubscribe();
        assert!(!subscription.is_active());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let subscription = Subscription::new();
        let waiter = subscription.clone();

        let task = tokio::spawn(async move {
            waiter.cancelled().await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        subscription.unsubscribe();

        tokio::time::timeout(std::time::Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }
}
