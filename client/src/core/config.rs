//! # Client Configuration
//!
//! Configuration loaded from environment variables and validated before the
//! app context is built.
//!
//! | Variable                        | Default                        |
//! |---------------------------------|--------------------------------|
//! | `SUNSHARE_API_URL`              | `http://127.0.0.1:3001/api`    |
//! | `SUNSHARE_REQUEST_TIMEOUT_SECS` | `10` (1-120)                   |
//! | `SUNSHARE_PAGE_SIZE`            | `20` (1-100)                   |
//! | `SUNSHARE_DATA_DIR`             | `data`                         |

use crate::core::error::{AppError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001/api";
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Gateway base URL, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout: Duration,
    /// Fixed page size for transaction history
    pub page_size: u32,
    /// Directory holding the persisted session record and credentials
    pub data_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(10),
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = env::var("SUNSHARE_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let request_timeout = match env::var("SUNSHARE_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|e| {
                AppError::Config(format!("SUNSHARE_REQUEST_TIMEOUT_SECS must be a number: {}", e))
            })?),
            Err(_) => defaults.request_timeout,
        };

        let page_size = match env::var("SUNSHARE_PAGE_SIZE") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::Config(format!("SUNSHARE_PAGE_SIZE must be a number: {}", e))
            })?,
            Err(_) => defaults.page_size,
        };

        let data_dir = env::var("SUNSHARE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let config = Self {
            api_base_url,
            request_timeout,
            page_size,
            data_dir,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "SUNSHARE_API_URL must be an http(s) URL, got {}",
                self.api_base_url
            )));
        }

        let secs = self.request_timeout.as_secs();
        if !(1..=120).contains(&secs) {
            return Err(AppError::Config(
                "SUNSHARE_REQUEST_TIMEOUT_SECS must be between 1 and 120".to_string(),
            ));
        }

        if !(1..=100).contains(&self.page_size) {
            return Err(AppError::Config(
                "SUNSHARE_PAGE_SIZE must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }

    /// File backing the general key-value store.
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.json")
    }

    /// File backing the credential vault (owner-only permissions on unix).
    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }
}
