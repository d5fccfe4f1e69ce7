//! Cart change notification.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::cart::Cart;

type Listener = Arc<dyn Fn(&Cart) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// The set of listeners told about every saved cart.
///
/// Listeners receive a snapshot of the cart that was just persisted. The
/// order in which listeners run is unspecified.
#[derive(Clone, Default)]
pub struct CartObservers {
    registry: Arc<Mutex<Registry>>,
}

impl CartObservers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Cart) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let mut registry = self.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `cart` to every registered listener.
    ///
    /// The registry lock is released before any listener runs, so listeners
    /// may subscribe, unsubscribe or read the store.
    pub fn notify(&self, cart: &Cart) {
        let listeners: Vec<Listener> = self
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(cart);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CartObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartObservers")
            .field("listeners", &self.len())
            .finish()
    }
}

/// Disposer for a registered listener.
#[must_use = "dropping a Subscription unregisters the listener"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unregister the listener now.
    pub fn unsubscribe(self) {}

    /// Keep the listener registered for as long as the observers live.
    pub fn detach(mut self) {
        self.registry = Weak::new();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter(observers: &CartObservers) -> (Arc<AtomicUsize>, Subscription) {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&hits);
        let sub = observers.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (hits, sub)
    }

    #[test]
    fn test_every_listener_is_notified() {
        let observers = CartObservers::new();
        let (a, _sub_a) = counter(&observers);
        let (b, _sub_b) = counter(&observers);

        observers.notify(&Cart::new());

        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let observers = CartObservers::new();
        let (hits, sub) = counter(&observers);

        sub.unsubscribe();
        observers.notify(&Cart::new());

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observers = CartObservers::new();
        {
            let (_hits, _sub) = counter(&observers);
            assert_eq!(observers.len(), 1);
        }
        assert!(observers.is_empty());
    }

    #[test]
    fn test_detach_keeps_listener() {
        let observers = CartObservers::new();
        let (hits, sub) = counter(&observers);

        sub.detach();
        observers.notify(&Cart::new());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notify() {
        let observers = CartObservers::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let inner = Arc::clone(&slot);
        let sub = observers.subscribe(move |_| {
            inner.lock().unwrap().take();
        });
        *slot.lock().unwrap() = Some(sub);

        observers.notify(&Cart::new());
        assert!(observers.is_empty());
    }

    #[test]
    fn test_subscription_outliving_observers_is_harmless() {
        let observers = CartObservers::new();
        let (_hits, sub) = counter(&observers);
        drop(observers);
        drop(sub);
    }
}
