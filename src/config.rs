use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::utils::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub browser: BrowserConfig,
    pub run: RunConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    /// Upper bound for page loads and selector waits, in seconds.
    pub navigation_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Settle pause after each search-page navigation.
    pub page_settle_ms: u64,
    /// Settle pause after a warmup visit to the retailer's home page.
    pub warmup_settle_ms: u64,
    /// Settle pause after a consent strategy has run.
    pub consent_settle_ms: u64,
    /// How long to wait for an id-addressed consent button to appear.
    pub consent_wait_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub wishlist_path: String,
    pub snapshot_path: String,
    pub screenshot_dir: String,
    pub screenshots_enabled: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1366,
            window_height: 768,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36"
                .to_string(),
            chrome_path: None,
            navigation_timeout_secs: 45,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            page_settle_ms: 3500,
            warmup_settle_ms: 4000,
            consent_settle_ms: 1500,
            consent_wait_ms: 2000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            wishlist_path: "data/wishlist.json".to_string(),
            snapshot_path: "data/prices.json".to_string(),
            screenshot_dir: "data/screenshots".to_string(),
            screenshots_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local config (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "BASKET_"
            .add_source(Environment::with_prefix("BASKET").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Add Chrome path from environment if not set
        if config.browser.chrome_path.is_none() {
            config.browser.chrome_path = env::var("CHROME_PATH").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::Message(
                "Browser window dimensions must be greater than 0".into(),
            ));
        }

        if self.browser.user_agent.trim().is_empty() {
            return Err(ConfigError::Message(
                "Browser user_agent must not be empty".into(),
            ));
        }

        if self.browser.navigation_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "Browser navigation_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.storage.wishlist_path.trim().is_empty()
            || self.storage.snapshot_path.trim().is_empty()
        {
            return Err(ConfigError::Message(
                "Storage paths must not be empty".into(),
            ));
        }

        if self.storage.screenshots_enabled && self.storage.screenshot_dir.trim().is_empty() {
            return Err(ConfigError::Message(
                "Storage screenshot_dir must not be empty when screenshots are enabled".into(),
            ));
        }

        Ok(())
    }
}
