//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use sleepout_cache::FileStore;
use sleepout_commerce::cart::CartStore;
use sleepout_commerce::config::CommerceConfig;

use crate::output::Output;

/// Config file names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["sleepout.toml", ".sleepout.toml", "sleepout.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: CommerceConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = resolve(&cwd, path);
            let config = CommerceConfig::load(&path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?;
            (config, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CommerceConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory the file-backed store lives in.
    pub fn data_dir(&self) -> PathBuf {
        match self.config.storage.data_dir {
            Some(ref dir) => resolve(&self.cwd, dir),
            None => dirs_path().join("sleepout"),
        }
    }

    /// Open the cart store over the configured data directory.
    pub fn cart_store(&self) -> Result<CartStore<FileStore>> {
        let dir = self.data_dir();
        let storage = FileStore::open(&dir)
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))?;
        self.output.debug(&format!("Cart data in {}", dir.display()));
        Ok(CartStore::with_config(storage, &self.config))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve(&self.cwd, path)
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CommerceConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                match CommerceConfig::load(&config_path) {
                    Ok(config) => return Some((config, config_path)),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "skipping unreadable config");
                    }
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

fn resolve(cwd: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Get the platform-specific data directory.
fn dirs_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
