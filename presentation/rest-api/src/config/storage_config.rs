use std::env;
use std::path::PathBuf;

/// Where the session cart document lives
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub dir: PathBuf,
}

impl StorageConfig {
    /// Environment variables:
    /// - CART_STORAGE_DIR: directory holding the cart document (default: "./data")
    pub fn from_env() -> Self {
        Self::from_value(env::var("CART_STORAGE_DIR").ok())
    }

    fn from_value(dir: Option<String>) -> Self {
        let dir = dir
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| "./data".to_string());
        Self {
            dir: PathBuf::from(dir),
        }
    }
}
