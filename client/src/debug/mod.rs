//! # Debug Module
//!
//! Logging setup for host applications embedding the client.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let _guard = client::debug::init(&LogConfig::from_env())?;
//! ```

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init;
