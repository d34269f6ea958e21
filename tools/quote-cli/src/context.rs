//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rental_api::StorefrontApi;
use rental_cache::{Cache, FileStore};
use rental_commerce::wishlist::WishlistStore;

use crate::config::QuoteConfig;
use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["quote.toml", ".quote.toml", "quote.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: QuoteConfig,
    /// Where the config came from, if a file was found.
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
            (QuoteConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd) {
                Some(path) => {
                    let config = QuoteConfig::load(&path.to_string_lossy())?;
                    (config, Some(path))
                }
                None => (QuoteConfig::default(), None),
            }
        };

        tracing::debug!(config = ?config_path, "configuration loaded");
        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find the nearest config file walking up from `start`.
    pub fn find_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Storage directory, resolved against the config file's directory.
    pub fn storage_dir(&self) -> PathBuf {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(self.cwd.as_path());
        resolve_path(base, &self.config.storage.dir)
    }

    fn file_store(&self) -> Result<FileStore> {
        let dir = self.storage_dir();
        FileStore::open(&dir).with_context(|| format!("Failed to open storage: {}", dir.display()))
    }

    /// The persisted wishlist.
    pub fn wishlist(&self) -> Result<WishlistStore<FileStore>> {
        Ok(WishlistStore::open(
            self.file_store()?,
            self.config.storage.wishlist_key.clone(),
        ))
    }

    /// Slot store for the parked quote submission.
    pub fn pending_cache(&self) -> Result<Cache<FileStore>> {
        Ok(Cache::new(self.file_store()?))
    }

    /// A storefront API client built from `[api]`.
    pub fn api(&self) -> Result<StorefrontApi> {
        let api = &self.config.api;
        StorefrontApi::connect(api.base_url.clone(), api.request_timeout(), api.max_retries)
            .context("Failed to create API client")
    }
}

fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
