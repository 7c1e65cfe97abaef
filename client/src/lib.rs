//! # SunShare Client State Layer - Library Root
//!
//! Client-side state synchronization for the SunShare peer-to-peer solar
//! energy marketplace. Caches server state on the device, coordinates
//! concurrent refreshes, persists the onboarding flag across restarts and
//! exposes paginated and chart-ready views to a UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              View layer (host application)             │
//! └───────────────┬───────────────────────────▲────────────┘
//!                 │ actions                   │ StoreEvent
//!                 ▼                           │
//! ┌────────────────────────────────────────────────────────┐
//! │  AppContext                                            │
//! │  ├── SessionStore   (auth, user, onboarding)           │
//! │  ├── LedgerStore    (wallet, transactions, summary)    │
//! │  └── TelemetryStore (readings, stats, chart series)    │
//! └───────────────┬───────────────────────────┬────────────┘
//!                 │ ApiService                │ KeyValueStore
//!                 ▼                           ▼
//! ┌─────────────────────────┐     ┌──────────────────────────┐
//! │  SunShare gateway       │     │  preferences.json        │
//! │  (reqwest ApiClient)    │     │  credentials.json (0600) │
//! └─────────────────────────┘     └──────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: `AppContext` (dependency-injection root) and `StoreEvent`
//! - **core**: Errors, configuration and the service traits
//! - **stores**: Session, ledger and telemetry stores plus the `Sequencer`
//! - **services**: Gateway client, credential vault, key-value stores
//! - **debug**: Logging initialization
//! - **utils**: Input validation
//!
//! ## State Management
//!
//! Each store keeps its slice in a `parking_lot::RwLock`:
//! - **Snapshots**: `store.state()` clones the current slice
//! - **Locked briefly**: Never held across an `.await`
//! - **Last request wins**: Responses commit only if no newer request,
//!   reset or cancellation was issued in the meantime
//!
//! ## Usage
//!
//! ```rust,ignore
//! use client::{AppContext, ClientConfig};
//!
//! let ctx = AppContext::from_config(ClientConfig::from_env()?)?;
//! ctx.bootstrap().await;
//!
//! let events = ctx.events();
//! ctx.ledger().refresh().await;
//! while let Ok(event) = events.try_recv() {
//!     // re-render from ctx.ledger().state()
//! }
//! ```

pub mod app;
pub mod core;
pub mod debug;
pub mod services;
pub mod stores;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use app::{AppContext, StoreEvent};
pub use core::{AppError, ClientConfig, Result};
pub use stores::{
    AuthStatus, ChartSeries, LedgerState, LedgerStore, SessionState, SessionStore,
    TelemetryState, TelemetryStore, TopupReceipt,
};
