//! Product catalog module.
//!
//! Products reach the storefront in the backend's own key convention; this
//! module reads them as they come and resolves each field to one value.

mod images;
mod product;
mod sort;

pub use images::{ImageSource, SizedImages};
pub use product::{ProductRecord, Scalar};
pub use sort::{sort_products, SortOption};
