//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the SunShare client and the
//! gateway API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::envelope`]**: `ApiEnvelope<T>`, `Pagination`, `Page<T>`
//!   - **[`dto::auth`]**: Login, registration and user profile
//!   - **[`dto::wallet`]**: Wallet balance and ledger entries
//!   - **[`dto::telemetry`]**: Energy readings and aggregates
//! - **[`utils`]**: Display formatting helpers
//!   - **[`utils::format_amount`]**: Money with thousands separators
//!   - **[`utils::format_energy`]**: kWh / MWh
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::{ApiEnvelope, WalletSnapshot};
//! use shared::utils::format_amount;
//!
//! let json = r#"{"success":true,"statusCode":200,"message":"","data":{"balance":1250.5,"lastUpdated":"2024-05-01T10:00:00Z"}}"#;
//! let envelope: ApiEnvelope<WalletSnapshot> = serde_json::from_str(json).unwrap();
//! let wallet = envelope.into_payload().unwrap();
//! assert_eq!(format_amount(wallet.balance), "1,250.50");
//! ```

pub mod dto;
pub mod utils;

// Wildcard re-exports: every DTO is public API
pub use dto::*;
pub use utils::*;
