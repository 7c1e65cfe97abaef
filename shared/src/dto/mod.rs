//! # Data Transfer Objects (DTOs)
//!
//! Structures exchanged with the SunShare gateway.
//!
//! ## Module Organization
//!
//! - [`envelope`] - The uniform response envelope and pagination block
//! - [`auth`] - Login, registration, tokens and the user profile
//! - [`wallet`] - Balance, transactions, top-up/withdraw and summaries
//! - [`telemetry`] - Energy readings, daily summary and range statistics
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase on the wire (`#[serde(rename_all = "camelCase")]`)
//! - **Optional fields**: Omitted when `None`
//! - **Enums**: lowercase / snake_case strings
//!
//! ## Example
//!
//! ```text
//! POST /auth/login
//! Content-Type: application/json
//!
//! { "email": "a@b.com", "password": "validpass1" }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//!
//! {
//!   "success": true,
//!   "statusCode": 200,
//!   "message": "Login successful",
//!   "data": {
//!     "user": { "id": "u1", "role": "host", "firstName": "Ada", ... },
//!     "accessToken": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
//!     "refreshToken": "..."
//!   },
//!   "timestamp": "2024-05-01T10:00:00.000Z"
//! }
//! ```

pub mod auth;
pub mod envelope;
pub mod telemetry;
pub mod wallet;

pub use auth::*;
pub use envelope::*;
pub use telemetry::*;
pub use wallet::*;
