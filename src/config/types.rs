//! Configuration sections

use serde::Deserialize;

/// Scheduler and polling settings
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Tick cadence in seconds
    pub tick_interval_secs: u64,
    /// Maximum concurrently in-flight status polls
    pub max_concurrent_polls: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 10,
            max_concurrent_polls: 5,
        }
    }
}

/// External swap status provider settings
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Provider API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Affiliate id sent with requests (optional)
    pub affiliate_id: Option<String>,
    /// Private API secret header value (optional)
    pub api_secret: Option<String>,
}

/// Durable storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct PersistenceConfig {
    /// Directory for the order state file and transition log
    pub data_dir: String,
}
