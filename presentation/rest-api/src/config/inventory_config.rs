use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.contifico.com/sistema/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for Contifico inventory access.
#[derive(Debug, Clone)]
pub struct InventoryConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl InventoryConfig {
    /// Environment variables:
    /// - CONTIFICO_API_URL: inventory API base URL
    /// - CONTIFICO_API_KEY: API key sent as the Authorization header (optional)
    /// - CONTIFICO_TIMEOUT_SECS: request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("CONTIFICO_API_URL").ok(),
            env::var("CONTIFICO_API_KEY").ok(),
            env::var("CONTIFICO_TIMEOUT_SECS").ok(),
        )
    }

    fn from_values(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<String>,
    ) -> Self {
        let timeout_secs = timeout_secs
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
