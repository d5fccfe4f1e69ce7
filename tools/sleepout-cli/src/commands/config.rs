//! Configuration management commands.

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use sleepout_commerce::config::CommerceConfig;
use sleepout_commerce::money::Currency;

use super::{ConfigArgs, ConfigCommand};
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[storage]");
    ctx.output.kv("cart_key", &ctx.config.storage.cart_key);
    ctx.output.kv("data_dir", &ctx.data_dir().display().to_string());

    ctx.output.info("[checkout]");
    ctx.output
        .kv("shipping_rate", &ctx.config.checkout.shipping_rate.to_string());
    ctx.output.kv("tax_rate", &ctx.config.checkout.tax_rate.to_string());
    ctx.output.kv("currency", ctx.config.checkout.currency.code());

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("checkout_path", &ctx.config.api.checkout_path);
    ctx.output.kv("timeout_ms", &ctx.config.api.timeout_ms.to_string());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let config_path = find_config_file(ctx)?;
    let mut config = CommerceConfig::load(&config_path)?;

    set_config_value(&mut config, key, value)?;
    config
        .save(&config_path)
        .with_context(|| format!("Failed to save {}", config_path.display()))?;

    ctx.output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, generate_default_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn validate_config(ctx: &Context) -> Result<()> {
    let (errors, warnings) = check_config(&ctx.config);

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "errors": errors, "warnings": warnings }));
    } else {
        ctx.output.header("Validating configuration");
        for error in &errors {
            ctx.output.error(&format!("Error: {}", error));
        }
        for warning in &warnings {
            ctx.output.warn(&format!("Warning: {}", warning));
        }
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    if warnings.is_empty() {
        ctx.output.success("Configuration is valid");
    } else {
        ctx.output.success("Configuration is valid (with warnings)");
    }

    Ok(())
}

fn check_config(config: &CommerceConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.storage.cart_key.trim().is_empty() {
        errors.push("storage.cart_key must not be empty".to_string());
    }

    let rate = config.checkout.shipping_rate;
    if !rate.is_finite() || rate < 0.0 {
        errors.push("checkout.shipping_rate must be a non-negative number".to_string());
    }

    let tax = config.checkout.tax_rate;
    if !tax.is_finite() || !(0.0..1.0).contains(&tax) {
        errors.push("checkout.tax_rate must be a fraction between 0 and 1".to_string());
    } else if tax > 0.2 {
        warnings.push(format!(
            "checkout.tax_rate {} is unusually high; rates are fractions (0.07 = 7%)",
            tax
        ));
    }

    if config.checkout.currency != Currency::USD {
        warnings.push(format!(
            "checkout.currency {} is displayed with en-US formatting",
            config.checkout.currency.code()
        ));
    }

    let base_url = &config.api.base_url;
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        errors.push("api.base_url must be an http(s) URL".to_string());
    } else if base_url.starts_with("http://") {
        warnings.push("api.base_url is not https; card details would travel in clear text".to_string());
    }

    if !config.api.checkout_path.starts_with('/') {
        errors.push("api.checkout_path must start with '/'".to_string());
    }

    if config.api.timeout_ms == 0 {
        errors.push("api.timeout_ms must be greater than 0".to_string());
    }

    (errors, warnings)
}

fn get_config_value(config: &CommerceConfig, key: &str) -> Result<String> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "cart_key"] => Ok(config.storage.cart_key.clone()),
        ["storage", "data_dir"] => Ok(config
            .storage
            .data_dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "null".to_string())),
        ["checkout", "shipping_rate"] => Ok(config.checkout.shipping_rate.to_string()),
        ["checkout", "tax_rate"] => Ok(config.checkout.tax_rate.to_string()),
        ["checkout", "currency"] => Ok(config.checkout.currency.code().to_string()),
        ["api", "base_url"] => Ok(config.api.base_url.clone()),
        ["api", "checkout_path"] => Ok(config.api.checkout_path.clone()),
        ["api", "checkout_url"] => Ok(config.api.checkout_url()),
        ["api", "timeout_ms"] => Ok(config.api.timeout_ms.to_string()),
        _ => bail!("Unknown config key: {}", key),
    }
}

fn set_config_value(config: &mut CommerceConfig, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["storage", "cart_key"] => config.storage.cart_key = value.to_string(),
        ["storage", "data_dir"] => config.storage.data_dir = Some(PathBuf::from(value)),
        ["checkout", "shipping_rate"] => config.checkout.shipping_rate = value.parse()?,
        ["checkout", "tax_rate"] => config.checkout.tax_rate = value.parse()?,
        ["checkout", "currency"] => {
            config.checkout.currency = Currency::from_code(value)
                .with_context(|| format!("Unknown currency: {}", value))?
        }
        ["api", "base_url"] => config.api.base_url = value.to_string(),
        ["api", "checkout_path"] => config.api.checkout_path = value.to_string(),
        ["api", "timeout_ms"] => config.api.timeout_ms = value.parse()?,
        _ => bail!("Unknown or read-only config key: {}", key),
    }

    Ok(())
}

fn find_config_file(ctx: &Context) -> Result<PathBuf> {
    if let Some(ref path) = ctx.config_path {
        return Ok(path.clone());
    }
    bail!("No config file found. Run `sleepout config init` to create one.")
}

/// Commented starter config; every value shown is the default.
pub fn generate_default_config() -> String {
    r#"# SleepOutside storefront configuration

[storage]
cart_key = "so-cart"
# data_dir = ".sleepout"

[checkout]
shipping_rate = 10.0
tax_rate = 0.07
currency = "USD"

[api]
base_url = "https://wdd330-backend.onrender.com"
checkout_path = "/checkout"
timeout_ms = 10000
"#
    .to_string()
}
