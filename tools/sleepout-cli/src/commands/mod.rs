//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod products;

use clap::{Args, Subcommand};
use sleepout_commerce::catalog::SortOption;

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Add a product to the cart.
    Add(AddArgs),
    /// Set the quantity of a line.
    Update {
        /// Product id.
        id: String,
        /// New quantity (at least 1).
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line.
    Remove {
        /// Product id.
        id: String,
    },
    /// List cart lines with prices.
    List,
    /// Print the cart total.
    Total,
    /// Print the number of units in the cart.
    Count,
    /// Empty the cart.
    Clear,
}

/// Arguments for `cart add`.
///
/// The product comes either from a JSON record (catalog or internal keys)
/// or from the individual flags.
#[derive(Args)]
pub struct AddArgs {
    /// Product record file (JSON, either key convention).
    #[arg(long, conflicts_with_all = ["id", "name", "price", "final_price"])]
    pub product: Option<String>,

    /// Product id.
    #[arg(long, required_unless_present = "product")]
    pub id: Option<String>,

    /// Product name.
    #[arg(long)]
    pub name: Option<String>,

    /// List price.
    #[arg(long)]
    pub price: Option<f64>,

    /// Discounted price.
    #[arg(long)]
    pub final_price: Option<f64>,

    /// Category.
    #[arg(long)]
    pub category: Option<String>,

    /// Image URL.
    #[arg(long)]
    pub image: Option<String>,

    /// Units to add.
    #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
    pub quantity: i64,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Product list file (JSON array of product records).
    pub file: String,

    /// Sort order: name-asc, name-desc, price-asc, price-desc.
    #[arg(short, long, default_value_t = SortOption::Unsorted)]
    pub sort: SortOption,

    /// Only show products in this category.
    #[arg(long)]
    pub category: Option<String>,

    /// Viewport width used to pick image URLs.
    #[arg(long)]
    pub viewport: Option<u32>,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    #[command(subcommand)]
    pub command: Option<CheckoutCommand>,
}

#[derive(Subcommand)]
pub enum CheckoutCommand {
    /// Show subtotal, shipping, tax and order total.
    Summary,
    /// Check buyer details from a JSON file.
    Validate {
        /// Buyer details file.
        buyer: String,
    },
    /// Print the order that would be sent for the cart.
    Order {
        /// Buyer details file.
        buyer: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
