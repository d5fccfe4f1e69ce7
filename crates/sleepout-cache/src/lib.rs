//! Key-value persistence boundary for the SleepOutside storefront.
//!
//! The storefront keeps all of its client state (the cart, mostly) in a
//! string-keyed, string-valued store scoped to one browser profile. This
//! crate models that contract with the [`KeyValueStore`] trait and ships two
//! backends:
//!
//! - [`MemoryStore`] for tests and embedding, with an optional byte quota
//! - [`FileStore`] for the CLI, one file per key
//!
//! [`Cache`] layers typed JSON access on top of any store.
//!
//! # Example
//!
//! ```rust
//! use sleepout_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("so-cart", &vec!["tent-01"]).unwrap();
//!
//! let ids: Option<Vec<String>> = cache.get("so-cart").unwrap();
//! assert_eq!(ids, Some(vec!["tent-01".to_string()]));
//! ```

mod error;
mod file;
mod kv;
mod memory;
mod store;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::Cache;
pub use memory::MemoryStore;
pub use store::KeyValueStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
