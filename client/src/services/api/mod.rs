//! # Gateway API Client Module
//!
//! HTTP client for the SunShare gateway. Implements
//! [`ApiService`](crate::core::service::ApiService).
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs       - Module exports and documentation
//! ├── client.rs    - ApiClient struct, envelope decoding, ApiService impl
//! ├── auth.rs      - Login, register, logout, refresh, profile
//! ├── wallet.rs    - Balance, transactions, top-up, withdraw, summary
//! └── telemetry.rs - Latest reading, history, today summary, stats
//! ```

pub mod auth;
pub mod client;
pub mod telemetry;
pub mod wallet;

pub use client::ApiClient;
