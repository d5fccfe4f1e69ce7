//! Products as received from the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::ImageSource;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// A JSON scalar that may arrive as a number or as text.
///
/// The backend sends ids and prices either way (`"SuggestedRetailPrice":
/// "299.99"` as well as `299.99`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Read as a finite, non-negative amount.
    pub fn as_amount(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        (value.is_finite() && value >= 0.0).then_some(value)
    }

    /// Read as a non-empty identifier.
    pub fn as_id(&self) -> Option<String> {
        match self {
            Scalar::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Scalar::Number(n) if !n.is_finite() => None,
            Scalar::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            Scalar::Number(n) => Some(n.to_string()),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

/// A product record in either key convention.
///
/// The catalog backend uses capitalized keys (`Id`, `Name`,
/// `SuggestedRetailPrice`, `FinalPrice`, ...), while records built inside
/// the storefront use `id`, `name`, `price`, `finalPrice`. Both sets are
/// captured here and resolved by the accessors; when both are present and
/// valid, the catalog key wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "Id", default)]
    catalog_id: Option<Scalar>,
    #[serde(default)]
    id: Option<Scalar>,

    #[serde(rename = "Name", default)]
    catalog_name: Option<String>,
    #[serde(default)]
    name: Option<String>,

    #[serde(rename = "SuggestedRetailPrice", default)]
    catalog_price: Option<Scalar>,
    #[serde(default)]
    price: Option<Scalar>,

    #[serde(rename = "FinalPrice", default)]
    catalog_final_price: Option<Scalar>,
    #[serde(rename = "finalPrice", default)]
    final_price: Option<Scalar>,

    #[serde(rename = "Category", default)]
    catalog_category: Option<String>,
    #[serde(default)]
    category: Option<String>,

    #[serde(rename = "Image", default)]
    catalog_image: Option<String>,
    #[serde(default)]
    image: Option<String>,

    #[serde(rename = "Images", default)]
    catalog_images: Option<ImageSource>,
    #[serde(default)]
    images: Option<ImageSource>,

    #[serde(rename = "DescriptionHtmlSimple", default)]
    catalog_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ProductRecord {
    /// Build a record with internal-style keys.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: Some(Scalar::Text(id.into())),
            name: Some(name.into()),
            price: Some(Scalar::Number(price)),
            ..Default::default()
        }
    }

    /// Parse a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a record from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CommerceError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Set the discounted price.
    pub fn with_final_price(mut self, final_price: f64) -> Self {
        self.final_price = Some(Scalar::Number(final_price));
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set a single image URL.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Set the image set.
    pub fn with_images(mut self, images: ImageSource) -> Self {
        self.images = Some(images);
        self
    }

    /// The product id, if either convention supplies a non-empty one.
    pub fn id(&self) -> Option<ProductId> {
        self.catalog_id
            .as_ref()
            .and_then(Scalar::as_id)
            .or_else(|| self.id.as_ref().and_then(Scalar::as_id))
            .map(ProductId::new)
    }

    /// Display name.
    pub fn name(&self) -> Option<&str> {
        pick_text(&self.catalog_name, &self.name)
    }

    /// Undiscounted (list) price.
    pub fn list_price(&self) -> Option<f64> {
        pick_amount(&self.catalog_price, &self.price)
    }

    /// Discounted price, when the record carries one.
    pub fn final_price(&self) -> Option<f64> {
        pick_amount(&self.catalog_final_price, &self.final_price)
    }

    /// Category slug.
    pub fn category(&self) -> Option<&str> {
        pick_text(&self.catalog_category, &self.category)
    }

    /// Single image URL.
    pub fn image(&self) -> Option<&str> {
        pick_text(&self.catalog_image, &self.image)
    }

    /// Image set.
    pub fn images(&self) -> Option<&ImageSource> {
        self.catalog_images
            .as_ref()
            .filter(|i| !i.is_empty())
            .or_else(|| self.images.as_ref().filter(|i| !i.is_empty()))
    }

    /// Plain-HTML description.
    pub fn description(&self) -> Option<&str> {
        pick_text(&self.catalog_description, &self.description)
    }
}

fn pick_text<'a>(catalog: &'a Option<String>, internal: &'a Option<String>) -> Option<&'a str> {
    let valid = |s: &'a Option<String>| s.as_deref().filter(|s| !s.trim().is_empty());
    valid(catalog).or_else(|| valid(internal))
}

fn pick_amount(catalog: &Option<Scalar>, internal: &Option<Scalar>) -> Option<f64> {
    catalog
        .as_ref()
        .and_then(Scalar::as_amount)
        .or_else(|| internal.as_ref().and_then(Scalar::as_amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_TENT: &str = r#"{
        "Id": "880RR",
        "Name": "Marmot Ajax Tent - 3-Person, 3-Season",
        "SuggestedRetailPrice": 300.0,
        "FinalPrice": 199.99,
        "Category": "tents",
        "Images": {
            "PrimarySmall": "https://img/880RR_small.jpg",
            "PrimaryMedium": "https://img/880RR_medium.jpg",
            "PrimaryLarge": "https://img/880RR_large.jpg"
        },
        "Brand": { "Name": "Marmot" },
        "DescriptionHtmlSimple": "A roomy tent."
    }"#;

    #[test]
    fn test_catalog_keys() {
        let product = ProductRecord::from_json(CATALOG_TENT).unwrap();
        assert_eq!(product.id(), Some(ProductId::new("880RR")));
        assert_eq!(product.name(), Some("Marmot Ajax Tent - 3-Person, 3-Season"));
        assert_eq!(product.list_price(), Some(300.0));
        assert_eq!(product.final_price(), Some(199.99));
        assert_eq!(product.category(), Some("tents"));
        assert_eq!(product.description(), Some("A roomy tent."));
        assert_eq!(
            product.images().and_then(|i| i.responsive_url(300)),
            Some("https://img/880RR_small.jpg")
        );
    }

    #[test]
    fn test_internal_keys() {
        let product = ProductRecord::from_json(
            r#"{"id":"tent-01","name":"Alpine Tent","price":299.99,"finalPrice":249.99,"image":"a.jpg"}"#,
        )
        .unwrap();
        assert_eq!(product.id(), Some(ProductId::new("tent-01")));
        assert_eq!(product.list_price(), Some(299.99));
        assert_eq!(product.final_price(), Some(249.99));
        assert_eq!(product.image(), Some("a.jpg"));
    }

    #[test]
    fn test_catalog_key_wins_when_both_present() {
        let product =
            ProductRecord::from_json(r#"{"Id":"A","id":"B","Name":"","name":"Fallback"}"#).unwrap();
        assert_eq!(product.id(), Some(ProductId::new("A")));
        assert_eq!(product.name(), Some("Fallback"));
    }

    #[test]
    fn test_prices_as_text_and_invalid_prices() {
        let product =
            ProductRecord::from_json(r#"{"id":"x","price":"49.50","finalPrice":"n/a"}"#).unwrap();
        assert_eq!(product.list_price(), Some(49.5));
        assert_eq!(product.final_price(), None);

        let negative = ProductRecord::from_json(r#"{"id":"x","price":-3}"#).unwrap();
        assert_eq!(negative.list_price(), None);
    }

    #[test]
    fn test_unresolvable_ids() {
        for json in [r#"{}"#, r#"{"id":""}"#, r#"{"Id":"   "}"#] {
            assert_eq!(ProductRecord::from_json(json).unwrap().id(), None, "{}", json);
        }
    }

    #[test]
    fn test_numeric_ids() {
        let product = ProductRecord::from_json(r#"{"Id": 344}"#).unwrap();
        assert_eq!(product.id(), Some(ProductId::new("344")));
    }

    #[test]
    fn test_builder() {
        let product = ProductRecord::new("bag-01", "Winter Sleeping Bag", 149.99)
            .with_final_price(120.0)
            .with_category("sleeping-bags");
        assert_eq!(product.final_price(), Some(120.0));
        assert_eq!(product.category(), Some("sleeping-bags"));
    }
}
