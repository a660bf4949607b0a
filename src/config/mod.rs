#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
/// State directory name, placed under the user's home directory when known.
pub const DEFAULT_STATE_DIR: &str = ".storefront";
/// Longest toast display time accepted from configuration (one minute).
pub const MAX_NOTIFICATION_MS: u64 = 60_000;

/// Resolved client settings: defaults, then the TOML file, then flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub state_dir: String,
    pub featured_limit: usize,
    pub currency_symbol: String,
    pub notification_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 10,
            state_dir: default_state_dir(),
            featured_limit: crate::core::catalog::DEFAULT_FEATURED_LIMIT,
            currency_symbol: "₹".to_string(),
            notification_ms: 3000,
        }
    }
}

/// `.storefront` under `HOME` (or `USERPROFILE`), falling back to the working
/// directory when neither is set.
pub fn default_state_dir() -> String {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|home| !home.is_empty())
        .map(|home| {
            std::path::Path::new(&home)
                .join(DEFAULT_STATE_DIR)
                .to_string_lossy()
                .into_owned()
        })
        .unwrap_or_else(|| DEFAULT_STATE_DIR.to_string())
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn state_dir(&self) -> &str {
        &self.state_dir
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn featured_limit(&self) -> usize {
        self.featured_limit
    }

    fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }

    fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("server.base_url", &self.base_url)?;
        validate_path("storage.state_dir", &self.state_dir)?;
        validate_positive_number("server.timeout_seconds", self.timeout_seconds, 1)?;
        validate_range("ui.featured_limit", self.featured_limit, 1, 100)?;
        validate_non_empty_string("ui.currency_symbol", &self.currency_symbol)?;
        validate_range("ui.notification_ms", self.notification_ms, 1, MAX_NOTIFICATION_MS)?;
        Ok(())
    }
}
