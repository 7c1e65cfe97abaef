//! # Core Abstractions
//!
//! Foundational types shared by the stores and services:
//!
//! - **[`error`]**: Application error types (`AppError`, `Result<T>`)
//! - **[`service`]**: Dependency-injection seams (`ApiService`, `KeyValueStore`)
//! - **[`config`]**: Environment configuration (`ClientConfig`)
//!
//! ## Dependency Injection
//!
//! ```rust,ignore
//! use client::core::service::ApiService;
//!
//! // In production: the reqwest-backed gateway client
//! let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(&config, vault)?);
//!
//! // In tests: a scripted stub
//! let api: Arc<dyn ApiService> = Arc::new(StubApi::new());
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::ClientConfig;
pub use error::{AppError, Result};
pub use service::{ApiService, KeyValueStore};
