use std::env;
use std::time::Duration;

use business::application::cart::item_controller::{ControllerOptions, DEFAULT_ADVISORY_TTL};

/// Behaviour of the per-product cart controllers.
#[derive(Debug, Clone, Copy)]
pub struct CartConfig {
    pub controller: ControllerOptions,
}

impl CartConfig {
    /// Environment variables:
    /// - CART_CHECK_ON_MOUNT: "true"/"1" to check stock when a product is first seen (default: false)
    /// - CART_ADVISORY_SECS: seconds an out-of-stock advisory stays visible (default: 3)
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("CART_CHECK_ON_MOUNT").ok(),
            env::var("CART_ADVISORY_SECS").ok(),
        )
    }

    fn from_values(check_on_mount: Option<String>, advisory_secs: Option<String>) -> Self {
        let check_on_mount = check_on_mount
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);
        let advisory_ttl = advisory_secs
            .and_then(|secs| secs.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ADVISORY_TTL);

        Self {
            controller: ControllerOptions {
                check_on_mount,
                advisory_ttl,
            },
        }
    }
}
