//! Configuration management for SwapWatch
//!
//! Loads from YAML files + environment variables via .env

mod types;

pub use types::*;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub provider: ProviderConfig,
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Monitor defaults
            .set_default("monitor.tick_interval_secs", 10)?
            .set_default("monitor.max_concurrent_polls", 5)?
            // Provider defaults
            .set_default("provider.base_url", "https://sideshift.ai/api/v2")?
            .set_default("provider.timeout_secs", 30)?
            // Persistence defaults
            .set_default("persistence.data_dir", "./data")?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (SWAPWATCH_*)
            .add_source(Environment::with_prefix("SWAPWATCH").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        Ok(app_config)
    }

    /// Generate a digest of the config (without secrets) for logging
    pub fn digest(&self) -> String {
        format!(
            "tick={}s cap={} provider={} data_dir={}",
            self.monitor.tick_interval_secs,
            self.monitor.max_concurrent_polls,
            self.provider.base_url,
            self.persistence.data_dir,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_defaults() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.tick_interval_secs, 10);
        assert_eq!(cfg.max_concurrent_polls, 5);
    }

    #[test]
    fn test_digest_excludes_secret() {
        let cfg = AppConfig {
            monitor: MonitorConfig::default(),
            provider: ProviderConfig {
                base_url: "https://sideshift.ai/api/v2".into(),
                timeout_secs: 30,
                affiliate_id: None,
                api_secret: Some("super-secret".into()),
            },
            persistence: PersistenceConfig {
                data_dir: "./data".into(),
            },
        };
        assert!(!cfg.digest().contains("super-secret"));
    }
}
