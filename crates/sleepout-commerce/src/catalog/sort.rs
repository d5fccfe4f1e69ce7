//! Product list ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cart::effective_unit_price;
use crate::catalog::ProductRecord;

/// Sort options offered on product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Keep the order the backend returned.
    #[default]
    Unsorted,
    /// Sort by name A-Z.
    NameAsc,
    /// Sort by name Z-A.
    NameDesc,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Unsorted => "unsorted",
            SortOption::NameAsc => "name-asc",
            SortOption::NameDesc => "name-desc",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Unsorted => "Featured",
            SortOption::NameAsc => "Name (A-Z)",
            SortOption::NameDesc => "Name (Z-A)",
            SortOption::PriceAsc => "Price (Low to High)",
            SortOption::PriceDesc => "Price (High to Low)",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unsorted" => Ok(SortOption::Unsorted),
            "name-asc" | "name" => Ok(SortOption::NameAsc),
            "name-desc" => Ok(SortOption::NameDesc),
            "price-asc" | "price-low" => Ok(SortOption::PriceAsc),
            "price-desc" | "price-high" => Ok(SortOption::PriceDesc),
            other => Err(format!("unknown sort option: {}", other)),
        }
    }
}

/// Return `products` ordered by `option`. The sort is stable, so products
/// that compare equal keep their original relative order.
pub fn sort_products(products: &[ProductRecord], option: SortOption) -> Vec<ProductRecord> {
    let mut sorted = products.to_vec();
    match option {
        SortOption::Unsorted => {}
        SortOption::NameAsc => sorted.sort_by(by_name),
        SortOption::NameDesc => sorted.sort_by(|a, b| by_name(b, a)),
        SortOption::PriceAsc => sorted.sort_by(by_price),
        SortOption::PriceDesc => sorted.sort_by(|a, b| by_price(b, a)),
    }
    sorted
}

fn by_name(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    let a = a.name().unwrap_or_default();
    let b = b.name().unwrap_or_default();
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn by_price(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    effective_unit_price(a).total_cmp(&effective_unit_price(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ProductRecord> {
        vec![
            ProductRecord::new("1", "cedar ridge tent", 199.0),
            ProductRecord::new("2", "Alpine Tent", 299.99).with_final_price(149.0),
            ProductRecord::new("3", "Backpack", 179.99),
        ]
    }

    fn ids(products: &[ProductRecord]) -> Vec<String> {
        products
            .iter()
            .filter_map(|p| p.id().map(|id| id.into_inner()))
            .collect()
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        assert_eq!(ids(&sort_products(&catalog(), SortOption::NameAsc)), ["2", "3", "1"]);
        assert_eq!(ids(&sort_products(&catalog(), SortOption::NameDesc)), ["1", "3", "2"]);
    }

    #[test]
    fn test_sort_by_effective_price() {
        assert_eq!(ids(&sort_products(&catalog(), SortOption::PriceAsc)), ["2", "3", "1"]);
        assert_eq!(ids(&sort_products(&catalog(), SortOption::PriceDesc)), ["1", "3", "2"]);
    }

    #[test]
    fn test_unsorted_keeps_order() {
        assert_eq!(ids(&sort_products(&catalog(), SortOption::Unsorted)), ["1", "2", "3"]);
    }

    #[test]
    fn test_parse_sort_option() {
        assert_eq!("price-low".parse::<SortOption>(), Ok(SortOption::PriceAsc));
        assert_eq!("name-desc".parse::<SortOption>(), Ok(SortOption::NameDesc));
        assert!("newest".parse::<SortOption>().is_err());
    }
}
