//! Storefront configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration. Files ending in `.json` are read as JSON, anything
//! else as TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CommerceError;
use crate::money::Currency;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// Where client state is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Shipping, tax and currency used at checkout.
    #[serde(default)]
    pub checkout: CheckoutConfig,

    /// Remote order service.
    #[serde(default)]
    pub api: ApiConfig,
}

impl CommerceConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CommerceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CommerceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        if is_json(path) {
            serde_json::from_str(&content).map_err(|e| {
                CommerceError::Config(format!("failed to parse JSON {}: {}", path.display(), e))
            })
        } else {
            Self::from_toml_str(&content).map_err(|e| match e {
                CommerceError::Config(msg) => {
                    CommerceError::Config(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })
        }
    }

    /// Parse config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CommerceError> {
        toml::from_str(content)
            .map_err(|e| CommerceError::Config(format!("failed to parse TOML: {}", e)))
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CommerceError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)
                .map_err(|e| CommerceError::Config(format!("failed to render TOML: {}", e)))?
        };

        std::fs::write(path, content).map_err(|e| {
            CommerceError::Config(format!("failed to write {}: {}", path.display(), e))
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// The single key the cart lives under.
    #[serde(default = "default_cart_key")]
    pub cart_key: String,

    /// Directory for file-backed storage (CLI only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_cart_key() -> String {
    "so-cart".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cart_key: default_cart_key(),
            data_dir: None,
        }
    }
}

/// Checkout pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Flat shipping charge, in currency units, applied to non-empty orders.
    #[serde(default = "default_shipping_rate")]
    pub shipping_rate: f64,

    /// Sales tax as a fraction of the subtotal.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,

    /// Order currency.
    #[serde(default)]
    pub currency: Currency,
}

fn default_shipping_rate() -> f64 {
    10.0
}

fn default_tax_rate() -> f64 {
    0.07
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            shipping_rate: default_shipping_rate(),
            tax_rate: default_tax_rate(),
            currency: Currency::default(),
        }
    }
}

/// Order service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the storefront backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path orders are posted to.
    #[serde(default = "default_checkout_path")]
    pub checkout_path: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://wdd330-backend.onrender.com".to_string()
}

fn default_checkout_path() -> String {
    "/checkout".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl ApiConfig {
    /// Full URL orders are posted to.
    pub fn checkout_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.checkout_path.trim_start_matches('/')
        )
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            checkout_path: default_checkout_path(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CommerceConfig::from_toml_str("").unwrap();
        assert_eq!(config, CommerceConfig::default());
        assert_eq!(config.storage.cart_key, "so-cart");
        assert_eq!(config.checkout.shipping_rate, 10.0);
        assert_eq!(config.checkout.tax_rate, 0.07);
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = CommerceConfig::from_toml_str(
            r#"
            [storage]
            cart_key = "test-cart"

            [checkout]
            tax_rate = 0.0
            currency = "CAD"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.cart_key, "test-cart");
        assert_eq!(config.checkout.tax_rate, 0.0);
        assert_eq!(config.checkout.shipping_rate, 10.0);
        assert_eq!(config.checkout.currency, Currency::CAD);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = CommerceConfig::from_toml_str("[checkout]\ntax_rate = \"lots\"").unwrap_err();
        assert!(matches!(err, CommerceError::Config(_)));
    }

    #[test]
    fn test_checkout_url_joins_cleanly() {
        let api = ApiConfig {
            base_url: "https://example.test/".to_string(),
            checkout_path: "/checkout".to_string(),
            timeout_ms: 500,
        };
        assert_eq!(api.checkout_url(), "https://example.test/checkout");
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CommerceConfig::default();
        config.storage.data_dir = Some(dir.path().join("data"));
        config.api.timeout_ms = 2500;

        for name in ["sleepout.toml", "sleepout.json"] {
            let path = dir.path().join(name);
            config.save(&path).unwrap();
            assert_eq!(CommerceConfig::load(&path).unwrap(), config);
        }
    }
}
