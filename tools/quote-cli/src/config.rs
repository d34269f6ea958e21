//! CLI configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use rental_commerce::wishlist::DEFAULT_WISHLIST_KEY;
use serde::{Deserialize, Serialize};

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Storefront API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Local persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Quote submission.
    #[serde(default)]
    pub quote: QuoteSection,
}

impl QuoteConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::parse(path, &content)
    }

    /// Parse config text, choosing the format from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Problems that make the config unusable, then ones worth a warning.
    pub fn check(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let base = self.api.base_url.trim();
        if base.is_empty() {
            errors.push("api.base_url is required".to_string());
        } else if !base.starts_with("http://") && !base.starts_with("https://") {
            errors.push(format!("api.base_url must be an http(s) URL, got '{}'", base));
        } else if base.starts_with("http://") && !is_local(base) {
            warnings.push("api.base_url is not using https".to_string());
        }

        if self.api.request_timeout_ms == 0 {
            errors.push("api.request_timeout_ms must be greater than 0".to_string());
        }
        if self.api.max_retries > 10 {
            warnings.push(format!(
                "api.max_retries = {} will make failing GETs very slow",
                self.api.max_retries
            ));
        }

        if self.storage.wishlist_key.trim().is_empty() {
            errors.push("storage.wishlist_key is required".to_string());
        } else if !rental_cache::is_valid_key(&self.storage.wishlist_key) {
            errors.push(format!(
                "storage.wishlist_key '{}' may only use letters, digits, '-', '_', ':' and '.', and may not start with '.'",
                self.storage.wishlist_key
            ));
        } else if self.storage.wishlist_key == rental_commerce::quote::PENDING_QUOTE_KEY {
            errors.push(format!(
                "storage.wishlist_key must not be '{}'",
                rental_commerce::quote::PENDING_QUOTE_KEY
            ));
        }

        if self.quote.submit_timeout_secs == 0 {
            errors.push("quote.submit_timeout_secs must be greater than 0".to_string());
        }

        (errors, warnings)
    }
}

fn is_local(url: &str) -> bool {
    let rest = url.trim_start_matches("http://");
    rest.starts_with("localhost") || rest.starts_with("127.0.0.1")
}

/// `[api]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Storefront API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Overall per-request timeout.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Extra attempts for failed GET requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// `[storage]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the wishlist and any pending quote.
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,

    /// Slot the wishlist lives under.
    #[serde(default = "default_wishlist_key")]
    pub wishlist_key: String,
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".quote")
}

fn default_wishlist_key() -> String {
    DEFAULT_WISHLIST_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            wishlist_key: default_wishlist_key(),
        }
    }
}

/// `[quote]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSection {
    /// Deadline for both submission legs together.
    #[serde(default = "default_submit_timeout_secs")]
    pub submit_timeout_secs: u64,
}

impl QuoteSection {
    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }
}

fn default_submit_timeout_secs() -> u64 {
    rental_commerce::quote::DEFAULT_SUBMIT_TIMEOUT.as_secs()
}

impl Default for QuoteSection {
    fn default() -> Self {
        Self {
            submit_timeout_secs: default_submit_timeout_secs(),
        }
    }
}

/// Generate a default quote.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Storefront quote client configuration

[api]
base_url = "{base_url}"
request_timeout_ms = {timeout}
# Only GET requests are retried.
max_retries = {retries}

[storage]
dir = ".quote"
wishlist_key = "{key}"

[quote]
submit_timeout_secs = {submit}
"#,
        base_url = base_url,
        timeout = default_request_timeout_ms(),
        retries = default_max_retries(),
        key = DEFAULT_WISHLIST_KEY,
        submit = default_submit_timeout_secs(),
    )
}
