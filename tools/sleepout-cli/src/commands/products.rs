//! Product listing command.

use std::fs;

use anyhow::{bail, Context as _, Result};
use serde::Serialize;
use sleepout_commerce::cart::{discount_percent, effective_unit_price, is_discounted};
use sleepout_commerce::catalog::{sort_products, ProductRecord};
use sleepout_commerce::money::format_currency;

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{discount_badge, truncate};

/// Run the products command.
pub fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read product file: {}", path.display()))?;
    let products = parse_products(&content)
        .with_context(|| format!("Invalid product file: {}", path.display()))?;

    let filtered: Vec<ProductRecord> = match args.category {
        Some(ref category) => products
            .into_iter()
            .filter(|p| p.category().is_some_and(|c| c.eq_ignore_ascii_case(category)))
            .collect(),
        None => products,
    };
    let sorted = sort_products(&filtered, args.sort);

    let rows: Vec<ProductRow> = sorted
        .iter()
        .map(|product| ProductRow::new(product, args.viewport))
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!(
        "{} product(s), {}",
        rows.len(),
        args.sort.display_name()
    ));

    let widths = [12, 32, 10, 6];
    ctx.output.table_row(&["ID", "NAME", "PRICE", ""], &widths);
    for row in &rows {
        let name = truncate(&row.name, 32);
        let price = format_currency(row.price);
        let badge = discount_badge(row.discount_percent);
        ctx.output
            .table_row(&[row.id.as_str(), &name, &price, &badge], &widths);
        if let Some(ref image) = row.image {
            ctx.output.kv("image", image);
        }
    }

    Ok(())
}

/// A product list must be a JSON array; records without an id are skipped.
fn parse_products(content: &str) -> Result<Vec<ProductRecord>> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    let serde_json::Value::Array(entries) = value else {
        bail!("expected a JSON array of products");
    };

    let mut products = Vec::with_capacity(entries.len());
    for entry in entries {
        let product = ProductRecord::from_value(entry)?;
        if product.id().is_none() {
            tracing::warn!("skipping product without an id");
            continue;
        }
        products.push(product);
    }
    Ok(products)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    discounted: bool,
    discount_percent: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    srcset: Option<String>,
}

impl ProductRow {
    fn new(product: &ProductRecord, viewport: Option<u32>) -> Self {
        let images = product.images();
        let image = match (images, viewport) {
            (Some(images), Some(width)) => images.responsive_url(width),
            (Some(images), None) => images.primary_url(),
            (None, _) => None,
        }
        .or(product.image())
        .map(str::to_string);
        let srcset = images.map(|i| i.srcset()).filter(|s| !s.is_empty());

        Self {
            id: product.id().map(|id| id.into_inner()).unwrap_or_default(),
            name: product.name().unwrap_or_default().to_string(),
            price: effective_unit_price(product),
            discounted: is_discounted(product),
            discount_percent: discount_percent(product),
            image,
            srcset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleepout_commerce::catalog::SortOption;

    const PRODUCTS: &str = r#"[
        {"Id":"880RR","Name":"Marmot Ajax Tent","SuggestedRetailPrice":300.0,"FinalPrice":199.99,
         "Images":{"PrimarySmall":"s.jpg","PrimaryMedium":"m.jpg","PrimaryLarge":"l.jpg"}},
        {"id":"bag-02","name":"Down Bag","price":50.0},
        {"name":"No id"}
    ]"#;

    #[test]
    fn test_parse_skips_products_without_id() {
        let products = parse_products(PRODUCTS).unwrap();
        assert_eq!(products.len(), 2);
        assert!(parse_products(r#"{"Result":[]}"#).is_err());
    }

    #[test]
    fn test_rows_sorted_by_price() {
        let products = parse_products(PRODUCTS).unwrap();
        let sorted = sort_products(&products, SortOption::PriceAsc);
        let rows: Vec<ProductRow> = sorted.iter().map(|p| ProductRow::new(p, Some(800))).collect();

        assert_eq!(rows[0].id, "bag-02");
        assert_eq!(rows[1].price, 199.99);
        assert_eq!(rows[1].discount_percent, 33);
        assert_eq!(rows[1].image.as_deref(), Some("m.jpg"));
        assert!(rows[0].image.is_none());
    }
}
