use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default ceiling for an embedded profile photo (5 MiB of decoded bytes).
pub const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default, so a bare environment is a valid configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory backing the persistent key-value store (credential list).
    pub data_dir: PathBuf,
    /// Directory exported portfolio documents are written to.
    pub output_dir: PathBuf,
    pub max_photo_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: env_or("PORTFOLIO_DATA_DIR", "data").into(),
            output_dir: env_or("PORTFOLIO_OUTPUT_DIR", ".").into(),
            max_photo_bytes: match std::env::var("PORTFOLIO_MAX_PHOTO_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("PORTFOLIO_MAX_PHOTO_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_PHOTO_BYTES,
            },
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            rust_log: "info".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
