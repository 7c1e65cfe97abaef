//! # Services Module
//!
//! Concrete implementations of the external collaborators.
//!
//! ```text
//! services/
//! ├── api/            - reqwest gateway client (ApiService)
//! ├── credentials.rs  - Token + cached user vault
//! └── storage.rs      - Memory and JSON-file KeyValueStore
//! ```
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Stores (session / ledger / telemetry)                   │
//! └───────────┬───────────────────────────────┬──────────────┘
//!             │ ApiService                    │ KeyValueStore
//!             ▼                               ▼
//!  ┌─────────────────────┐         ┌─────────────────────────┐
//!  │  ApiClient          │────────▶│  CredentialVault        │
//!  │  /auth/*            │ tokens  │  (owner-only file)      │
//!  │  /wallet/*          │         └─────────────────────────┘
//!  │  /energy/*          │         ┌─────────────────────────┐
//!  └─────────────────────┘         │  preferences.json       │
//!                                  │  { isOnboarded }        │
//!                                  └─────────────────────────┘
//! ```

pub mod api;
pub mod credentials;
pub mod storage;

pub use api::ApiClient;
pub use credentials::{CredentialVault, StoredCredentials};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
