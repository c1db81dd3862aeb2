//! Cross-context invalidation signalling.
//!
//! The browser original used two channels for the same signal: an in-page
//! custom event and a `localStorage` key write observed by other tabs.
//! Both carry no payload; observing either means "discard optimistic
//! state and refetch". Here that collapses into one abstraction: a bus
//! whose cloned handles share a signal, so a publish from any handle is
//! visible to every subscription, wherever it was created.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A payload-free invalidation signal shared across contexts.
///
/// Implementations must make a `publish` from any handle observable by
/// every subscription, including subscriptions created from other
/// (cloned) handles.
pub trait InvalidationBus {
    /// Handle for observing signals.
    type Subscription: InvalidationSubscription;

    /// Broadcast the signal to every subscription.
    fn publish(&self);

    /// Create a new subscription that observes signals published after
    /// this call.
    fn subscribe(&self) -> Self::Subscription;
}

/// Observer side of an [`InvalidationBus`].
pub trait InvalidationSubscription {
    /// Returns `true` if at least one signal was published since the
    /// last call (or since subscribing). Consecutive signals coalesce;
    /// the reaction is the same either way.
    fn take_invalidation(&mut self) -> bool;
}

/// In-process bus: a shared epoch counter behind an `Arc`.
///
/// Cloning the bus yields another handle onto the same signal, the
/// in-process analogue of a second browser tab watching the same
/// storage key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBus {
    epoch: Arc<AtomicU64>,
}

impl InMemoryBus {
    /// Create a new bus with no published signals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of signals published on this bus.
    #[must_use]
    pub fn publish_count(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

impl InvalidationBus for InMemoryBus {
    type Subscription = InMemorySubscription;

    fn publish(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    fn subscribe(&self) -> Self::Subscription {
        InMemorySubscription {
            epoch: Arc::clone(&self.epoch),
            seen: self.epoch.load(Ordering::SeqCst),
        }
    }
}

/// Subscription handle for [`InMemoryBus`].
#[derive(Debug)]
pub struct InMemorySubscription {
    epoch: Arc<AtomicU64>,
    seen: u64,
}

impl InvalidationSubscription for InMemorySubscription {
    fn take_invalidation(&mut self) -> bool {
        let current = self.epoch.load(Ordering::SeqCst);
        if current == self.seen {
            return false;
        }
        self.seen = current;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_signal_before_publish() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe();
        assert!(!sub.take_invalidation());
    }

    #[test]
    fn test_signal_consumed_once() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe();
        bus.publish();
        assert!(sub.take_invalidation());
        assert!(!sub.take_invalidation());
    }

    #[test]
    fn test_signal_crosses_cloned_handles() {
        // Two handles onto the same bus, as two tabs onto the same
        // storage key.
        let tab_a = InMemoryBus::new();
        let tab_b = tab_a.clone();
        let mut sub_b = tab_b.subscribe();

        tab_a.publish();
        assert!(sub_b.take_invalidation());
    }

    #[test]
    fn test_subscription_ignores_signals_before_subscribe() {
        let bus = InMemoryBus::new();
        bus.publish();
        let mut sub = bus.subscribe();
        assert!(!sub.take_invalidation());
    }

    #[test]
    fn test_consecutive_signals_coalesce() {
        let bus = InMemoryBus::new();
        let mut sub = bus.subscribe();
        bus.publish();
        bus.publish();
        assert!(sub.take_invalidation());
        assert!(!sub.take_invalidation());
        assert_eq!(bus.publish_count(), 2);
    }
}
