//! Logging configuration from environment variables

use std::path::PathBuf;

pub const DEFAULT_LOG_LEVEL: &str = "client=info,warn";
pub const LOG_FILE_NAME: &str = "sunshare-client.log";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level filter (e.g., "client=debug,info")
    pub log_level: String,
    /// Log directory (for rotation)
    pub log_dir: PathBuf,
    /// Mirror log lines to stderr
    pub stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: PathBuf::from("logs"),
            stderr: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let log_dir = std::env::var("SUNSHARE_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            log_dir,
            stderr: std::env::var("SUNSHARE_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(false),
        }
    }

    /// Current log file (before the date suffix added by rotation)
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Check if debug logging is enabled
    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_is_info() {
        let config = LogConfig::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert!(!config.is_debug_enabled());
        assert_eq!(config.log_file(), PathBuf::from("logs").join(LOG_FILE_NAME));
    }

    #[test]
    fn test_debug_detection() {
        let config = LogConfig {
            log_level: "client=debug".to_string(),
            ..LogConfig::default()
        };
        assert!(config.is_debug_enabled());
    }
}
