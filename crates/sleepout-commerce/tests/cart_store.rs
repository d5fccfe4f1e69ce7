//! Behavior of the persisted cart as seen through `CartStore`.

use std::sync::{Arc, Mutex};

use sleepout_cache::{FileStore, KeyValueStore, MemoryStore};
use sleepout_commerce::prelude::*;

fn tent() -> ProductRecord {
    ProductRecord::new("tent-01", "Alpine Tent", 100.0).with_final_price(80.0)
}

fn sleeping_bag() -> ProductRecord {
    ProductRecord::new("bag-02", "Down Bag", 50.0)
}

fn raw(storage: &MemoryStore) -> Option<String> {
    storage.get(DEFAULT_CART_KEY).unwrap()
}

#[test]
fn test_adding_same_product_merges_lines() {
    let store = CartStore::new(MemoryStore::new());

    store.add(&tent(), 1).unwrap();
    store.add(&tent(), 2).unwrap();

    let cart = store.load();
    assert_eq!(cart.unique_item_count(), 1);
    assert_eq!(cart.get_item("tent-01").unwrap().quantity, 3);
    assert_eq!(store.count(), 3);
}

#[test]
fn test_catalog_and_internal_records_share_a_line() {
    let store = CartStore::new(MemoryStore::new());
    let from_catalog = ProductRecord::from_json(
        r#"{"Id":"880RR","Name":"Marmot Ajax Tent","SuggestedRetailPrice":300.0,"FinalPrice":199.99,"Category":"tents"}"#,
    )
    .unwrap();
    let internal = ProductRecord::new("880RR", "Marmot Ajax Tent", 300.0).with_final_price(199.99);

    store.add(&from_catalog, 1).unwrap();
    store.add(&internal, 1).unwrap();

    let cart = store.load();
    assert_eq!(cart.unique_item_count(), 1);
    let line = cart.get_item("880RR").unwrap();
    assert_eq!(line.quantity, 2);
    assert_eq!(line.category.as_deref(), Some("tents"));
    assert_eq!(store.total().display(), "$399.98");
}

#[test]
fn test_quantity_never_drops_below_one() {
    let storage = MemoryStore::new();
    let store = CartStore::new(storage.clone());
    store.add(&tent(), 2).unwrap();

    let before = raw(&storage);
    assert!(matches!(
        store.update_quantity("tent-01", 0),
        Err(CommerceError::InvalidQuantity(0))
    ));
    assert!(matches!(
        store.update_quantity("tent-01", -1),
        Err(CommerceError::InvalidQuantity(-1))
    ));
    assert_eq!(raw(&storage), before);
    assert!(store.add(&tent(), -1).is_err());
    assert_eq!(store.count(), 2);

    store.update_quantity("tent-01", 5).unwrap();
    assert_eq!(store.count(), 5);
}

#[test]
fn test_remove_is_idempotent() {
    let storage = MemoryStore::new();
    let store = CartStore::new(storage.clone());
    store.add(&tent(), 1).unwrap();
    store.add(&sleeping_bag(), 1).unwrap();

    store.remove("tent-01");
    store.remove("tent-01");

    let cart = store.load();
    assert_eq!(cart.unique_item_count(), 1);
    assert!(cart.get_item("bag-02").is_some());

    store.remove("bag-02");
    store.remove("bag-02");
    assert_eq!(raw(&storage).as_deref(), Some("[]"));
}

#[test]
fn test_save_of_load_is_byte_identical() {
    let storage = MemoryStore::new();
    let persisted = r#"[{"id":"tent-01","name":"Alpine Tent","price":100.0,"finalPrice":80.0,"quantity":2},{"id":"bag-02","name":"Down Bag","price":50.0,"quantity":1}]"#;
    storage.set(DEFAULT_CART_KEY, persisted).unwrap();

    let store = CartStore::new(storage.clone());
    assert!(store.save(&store.load()));

    assert_eq!(raw(&storage).as_deref(), Some(persisted));
}

#[test]
fn test_total_of_sub_cent_prices() {
    let store = CartStore::new(MemoryStore::new());
    store.add(&ProductRecord::new("peg-01", "Tent Peg", 0.125), 4).unwrap();

    assert_eq!(store.total().amount_cents, 50);
}

#[test]
fn test_cart_total() {
    let store = CartStore::new(MemoryStore::new());
    store.add(&tent(), 2).unwrap();
    store.add(&sleeping_bag(), 1).unwrap();

    assert_eq!(store.total(), Money::new(21000, Currency::USD));
    assert_eq!(format_currency(store.total().to_decimal()), "$210.00");
}

#[test]
fn test_pricing_helpers() {
    let discounted = ProductRecord::new("pack-03", "Day Pack", 299.99).with_final_price(249.99);
    assert!(is_discounted(&discounted));
    assert_eq!(discount_percent(&discounted), 17);
    assert_eq!(effective_unit_price(&discounted), 249.99);

    let full_price = sleeping_bag();
    assert!(!is_discounted(&full_price));
    assert_eq!(discount_percent(&full_price), 0);
    assert_eq!(effective_unit_price(&full_price), 50.0);

    let unpriced = ProductRecord::from_json(r#"{"id":"x"}"#).unwrap();
    assert_eq!(effective_unit_price(&unpriced), 0.0);
}

#[test]
fn test_malformed_cart_recovers_as_empty() {
    let storage = MemoryStore::new();
    storage.set(DEFAULT_CART_KEY, "invalid json").unwrap();
    let store = CartStore::new(storage.clone());

    assert!(store.load().is_empty());
    assert_eq!(store.count(), 0);

    store.add(&tent(), 1).unwrap();
    assert_eq!(store.count(), 1);
}

#[test]
fn test_invalid_persisted_lines_recover_as_empty() {
    let storage = MemoryStore::new();
    storage
        .set(
            DEFAULT_CART_KEY,
            r#"[{"id":"tent-01","price":100.0,"quantity":0}]"#,
        )
        .unwrap();

    assert!(CartStore::new(storage).load().is_empty());
}

#[test]
fn test_stores_over_shared_storage_see_each_other() {
    let storage = MemoryStore::new();
    let first = CartStore::new(storage.clone());
    let second = CartStore::new(storage.clone());

    first.add(&tent(), 1).unwrap();
    assert_eq!(second.count(), 1);

    // A save from a stale snapshot overwrites the other store's change.
    let stale = first.load();
    second.add(&sleeping_bag(), 1).unwrap();
    first.save(&stale);

    let cart = second.load();
    assert!(cart.get_item("bag-02").is_none());
    assert_eq!(cart.item_count(), 1);
}

#[test]
fn test_observers_receive_saved_snapshots() {
    let store = CartStore::new(MemoryStore::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let subscription = store.subscribe(move |cart| sink.lock().unwrap().push(cart.item_count()));

    store.add(&tent(), 2).unwrap();
    store.add(&sleeping_bag(), 1).unwrap();
    store.update_quantity("missing", 4).unwrap();
    store.remove("tent-01");

    subscription.unsubscribe();
    store.clear();

    assert_eq!(*seen.lock().unwrap(), vec![2, 3, 1]);
}

#[test]
fn test_custom_key_and_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let config = CommerceConfig::from_toml_str(
        r#"
        [storage]
        cart_key = "trail-cart"
        "#,
    )
    .unwrap();

    let store = CartStore::with_config(FileStore::open(dir.path()).unwrap(), &config);
    store.add(&tent(), 1).unwrap();

    let reopened = CartStore::with_config(FileStore::open(dir.path()).unwrap(), &config);
    assert_eq!(reopened.key(), "trail-cart");
    assert_eq!(reopened.count(), 1);
    assert!(reopened.storage().get(DEFAULT_CART_KEY).unwrap().is_none());
}

#[test]
fn test_stores_sharing_observers_notify_once_per_save() {
    let storage = MemoryStore::new();
    let observers = CartObservers::new();
    let header = CartStore::new(storage.clone()).with_observers(observers.clone());
    let cart_page = CartStore::new(storage).with_observers(observers.clone());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _subscription = observers.subscribe(move |cart| sink.lock().unwrap().push(cart.item_count()));

    cart_page.add(&tent(), 2).unwrap();
    header.add(&sleeping_bag(), 1).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
    assert_eq!(observers.len(), 1);
}
