//! Change notification for cart snapshots.
//!
//! UI code registers a callback and re-renders from the snapshot it receives.
//! Callbacks run synchronously, in registration order, after every mutation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gomarketplace_core::CartItem;

/// Callback invoked with the cart lines after a change.
pub type Listener = Arc<dyn Fn(&[CartItem]) + Send + Sync>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// Registered listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(Subscription, Listener)>>,
}

impl Subscribers {
    pub(crate) fn subscribe(&self, listener: Listener) -> Subscription {
        let subscription = Subscription(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((subscription, listener));
        subscription
    }

    /// Returns `true` if the subscription was registered.
    pub(crate) fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription);
        listeners.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn notify(&self, items: &[CartItem]) {
        // Listeners may (un)subscribe from inside the callback, so call them
        // without holding the lock.
        let listeners: Vec<Listener> = self
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(items);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Subscription, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn test_notify_calls_every_listener() {
        let subscribers = Subscribers::default();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            subscribers.subscribe(Arc::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        subscribers.notify(&[]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let subscribers = Subscribers::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = subscribers.subscribe(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(subscribers.unsubscribe(subscription));
        assert!(!subscribers.unsubscribe(subscription));

        subscribers.notify(&[]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(subscribers.len(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let subscribers = Arc::new(Subscribers::default());
        let own_id = Arc::new(Mutex::new(None::<Subscription>));

        let registry = Arc::clone(&subscribers);
        let slot = Arc::clone(&own_id);
        let subscription = subscribers.subscribe(Arc::new(move |_| {
            if let Some(id) = *slot.lock().unwrap_or_else(PoisonError::into_inner) {
                registry.unsubscribe(id);
            }
        }));
        *own_id.lock().unwrap_or_else(PoisonError::into_inner) = Some(subscription);

        subscribers.notify(&[]);
        assert_eq!(subscribers.len(), 0);
    }
}
