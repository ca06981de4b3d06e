//! Environment-driven client configuration.
//!
//! `.env` is loaded first (if present), then each setting is read from the
//! process environment with a typed default. Unparseable values fall back to
//! the default rather than failing startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Result};
use tracing::debug;

use crate::reels::RotationSettings;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// 50 MB
pub const DEFAULT_MAX_REEL_UPLOAD_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_REEL_BUCKET: &str = "reels";

/// Object storage that receives reel files before they are attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub reels: RotationSettings,
    pub max_reel_upload_bytes: usize,
    /// Unset when no storage credentials are configured; reel uploads are then refused
    pub storage: Option<StorageConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reels: RotationSettings::default(),
            max_reel_upload_bytes: DEFAULT_MAX_REEL_UPLOAD_BYTES,
            storage: None,
        }
    }
}

impl ClientConfig {
    /// Load `.env` and read the `ESTATE_*` variables
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("ESTATE_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if api_url.is_empty() {
            bail!("ESTATE_API_URL must not be empty");
        }

        let api_token = lookup("ESTATE_API_TOKEN").filter(|t| !t.trim().is_empty());

        let timeout_secs = parse_or(&lookup, "ESTATE_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        let interval_secs = parse_or(
            &lookup,
            "ESTATE_REEL_INTERVAL_SECS",
            defaults.reels.interval.as_secs(),
        );
        let display_count = parse_or(
            &lookup,
            "ESTATE_REEL_DISPLAY_COUNT",
            defaults.reels.display_count,
        );
        if timeout_secs == 0 {
            bail!("ESTATE_API_TIMEOUT_SECS must be greater than zero");
        }
        if interval_secs == 0 {
            bail!("ESTATE_REEL_INTERVAL_SECS must be greater than zero");
        }

        let storage = storage_from(&lookup);

        Ok(Self {
            api_url,
            api_token,
            timeout: Duration::from_secs(timeout_secs),
            reels: RotationSettings {
                interval: Duration::from_secs(interval_secs),
                display_count,
            },
            max_reel_upload_bytes: parse_or(
                &lookup,
                "ESTATE_REEL_MAX_UPLOAD_BYTES",
                DEFAULT_MAX_REEL_UPLOAD_BYTES,
            ),
            storage,
        })
    }
}

/// Storage needs both a URL and a key; either missing disables it
fn storage_from<F>(lookup: &F) -> Option<StorageConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup("ESTATE_STORAGE_URL")
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())?;
    let key = lookup("ESTATE_STORAGE_KEY")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())?;
    let bucket = lookup("ESTATE_REEL_BUCKET")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_REEL_BUCKET.to_string());
    Some(StorageConfig { url, key, bucket })
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
