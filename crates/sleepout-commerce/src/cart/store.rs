//! The cart store: the one place the persisted cart is read and written.

use sleepout_cache::{Cache, CacheError, KeyValueStore};
use tracing::{debug, error, instrument, warn};

use crate::cart::{Cart, CartObservers, Subscription};
use crate::catalog::ProductRecord;
use crate::config::CommerceConfig;
use crate::error::CommerceError;
use crate::money::{Currency, Money};

/// Default storage slot for the cart.
pub const DEFAULT_CART_KEY: &str = "so-cart";

/// Authoritative view of the persisted cart.
///
/// Every operation reads the slot, applies its change and writes the whole
/// cart back, then tells subscribers. Nothing is cached between calls, so a
/// second store over the same backing storage (another tab) is picked up on
/// the next read. Concurrent writers are not reconciled: the last save wins.
#[derive(Debug)]
pub struct CartStore<S> {
    cache: Cache<S>,
    key: String,
    currency: Currency,
    observers: CartObservers,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store over `storage` using the default key and USD.
    pub fn new(storage: S) -> Self {
        Self {
            cache: Cache::new(storage),
            key: DEFAULT_CART_KEY.to_string(),
            currency: Currency::default(),
            observers: CartObservers::new(),
        }
    }

    /// Create a store using the key and currency from `config`.
    pub fn with_config(storage: S, config: &CommerceConfig) -> Self {
        Self::new(storage)
            .with_key(config.storage.cart_key.clone())
            .with_currency(config.checkout.currency)
    }

    /// Use a different storage key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Use a different currency for totals.
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Share an existing observer set instead of this store's own.
    pub fn with_observers(mut self, observers: CartObservers) -> Self {
        self.observers = observers;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Borrow the underlying storage.
    pub fn storage(&self) -> &S {
        self.cache.store()
    }

    /// Register a listener for saved carts.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Cart) + Send + Sync + 'static,
    {
        self.observers.subscribe(listener)
    }

    /// Read the persisted cart.
    ///
    /// An absent, unreadable, unparseable or invalid value yields an empty
    /// cart; the problem is logged and never returned.
    pub fn load(&self) -> Cart {
        match self.cache.get::<Cart>(&self.key) {
            Ok(Some(cart)) => match cart.validate() {
                Ok(()) => cart,
                Err(reason) => {
                    warn!(key = %self.key, %reason, "persisted cart is invalid, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(CacheError::Deserialize { source, .. }) => {
                warn!(key = %self.key, error = %source, "persisted cart is malformed, starting empty");
                Cart::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read cart, starting empty");
                Cart::new()
            }
        }
    }

    /// Persist `cart` and notify subscribers.
    ///
    /// Returns whether the write succeeded. A failed write is logged,
    /// leaves the previous value in place and notifies no one.
    pub fn save(&self, cart: &Cart) -> bool {
        match self.cache.set(&self.key, cart) {
            Ok(()) => {
                debug!(key = %self.key, items = cart.unique_item_count(), "cart saved");
                self.observers.notify(cart);
                true
            }
            Err(e) => {
                error!(key = %self.key, error = %e, "failed to save cart");
                false
            }
        }
    }

    /// Add `quantity` units of `product`, merging with an existing line for
    /// the same id.
    ///
    /// A product without an id or a quantity below one is rejected: the
    /// rejection is logged and returned, and nothing is saved.
    #[instrument(level = "debug", skip(self, product))]
    pub fn add(&self, product: &ProductRecord, quantity: i64) -> Result<(), CommerceError> {
        let mut cart = self.load();
        if let Err(e) = cart.add_item(product, quantity) {
            warn!(error = %e, "rejected add to cart");
            return Err(e);
        }
        self.save(&cart);
        Ok(())
    }

    /// Set the quantity of the line for `id`.
    ///
    /// Quantities below one are rejected without saving. An unknown id is a
    /// silent no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn update_quantity(&self, id: &str, quantity: i64) -> Result<(), CommerceError> {
        let mut cart = self.load();
        match cart.update_quantity(id, quantity) {
            Ok(true) => {
                self.save(&cart);
                Ok(())
            }
            Ok(false) => {
                debug!("no line item to update");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "rejected quantity update");
                Err(e)
            }
        }
    }

    /// Remove the line for `id`. Always saves, even if nothing matched.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, id: &str) {
        let mut cart = self.load();
        if !cart.remove_item(id) {
            debug!("no line item to remove");
        }
        self.save(&cart);
    }

    /// Persist an empty cart.
    pub fn clear(&self) {
        self.save(&Cart::new());
    }

    /// Sum of effective unit price times quantity over the persisted cart.
    pub fn total(&self) -> Money {
        self.load().total(self.currency)
    }

    /// Units in the persisted cart (the header badge number).
    pub fn count(&self) -> u64 {
        self.load().item_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleepout_cache::MemoryStore;
    use std::sync::{Arc, Mutex};

    fn tent() -> ProductRecord {
        ProductRecord::new("tent-01", "Alpine Tent", 100.0).with_final_price(80.0)
    }

    #[test]
    fn test_load_absent_is_empty() {
        let store = CartStore::new(MemoryStore::new());
        assert!(store.load().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let storage = MemoryStore::new();
        storage.set(DEFAULT_CART_KEY, "invalid json").unwrap();

        let store = CartStore::new(storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let storage = MemoryStore::new();
        storage.set(DEFAULT_CART_KEY, r#"{"id":"tent-01"}"#).unwrap();
        assert!(CartStore::new(storage).load().is_empty());
    }

    #[test]
    fn test_add_persists_and_notifies() {
        let store = CartStore::new(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |cart| sink.lock().unwrap().push(cart.item_count()));

        store.add(&tent(), 1).unwrap();
        store.add(&tent(), 2).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 3]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_rejected_add_does_not_save() {
        let storage = MemoryStore::new();
        let store = CartStore::new(storage.clone());
        let saves = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&saves);
        let _sub = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        let nameless = ProductRecord::from_json(r#"{"price":5}"#).unwrap();
        assert!(store.add(&nameless, 1).is_err());
        assert!(store.add(&tent(), 0).is_err());

        assert_eq!(*saves.lock().unwrap(), 0);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let storage = MemoryStore::new();
        let store = CartStore::new(storage.clone());
        store.update_quantity("missing", 4).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_custom_key() {
        let storage = MemoryStore::new();
        let store = CartStore::new(storage.clone()).with_key("test-cart");
        store.add(&tent(), 1).unwrap();

        assert!(storage.get("test-cart").unwrap().is_some());
        assert!(storage.get(DEFAULT_CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_failed_save_keeps_previous_state_and_skips_observers() {
        let storage = MemoryStore::new();
        let store = CartStore::new(storage.clone());
        store.add(&tent(), 1).unwrap();
        let before = storage.get(DEFAULT_CART_KEY).unwrap();

        let notified = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&notified);
        let _sub = store.subscribe(move |_| *flag.lock().unwrap() = true);

        storage.set_quota(Some(8));
        store.add(&ProductRecord::new("stove-01", "Camp Stove", 50.0), 1).unwrap();

        assert_eq!(storage.get(DEFAULT_CART_KEY).unwrap(), before);
        assert!(!*notified.lock().unwrap());
        assert_eq!(store.count(), 1);
    }
}
