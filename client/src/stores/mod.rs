//! # State Stores
//!
//! In-memory containers for the client's view of server state. Each store
//! owns one slice behind a `parking_lot::RwLock`, is mutated only through its
//! async actions, and announces every committed change on the event channel.
//!
//! ```text
//! stores/
//! ├── sequence.rs  - Sequencer (last-request-wins tokens)
//! ├── session.rs   - Auth status, user, onboarding flag
//! ├── ledger.rs    - Wallet, paginated transactions, monthly summary
//! └── telemetry.rs - Energy readings, summaries, chart series
//! ```
//!
//! Locks are only held for synchronous field updates, never across `.await`.

pub mod ledger;
pub mod sequence;
pub mod session;
pub mod telemetry;

pub use ledger::{LedgerState, LedgerStore, TopupReceipt};
pub use sequence::Sequencer;
pub use session::{AuthStatus, SessionState, SessionStore};
pub use telemetry::{ChartSeries, TelemetryState, TelemetryStore, MAX_CACHED_READINGS};

use crate::app::events::StoreEvent;
use crate::core::error::Result;
use async_channel::{Sender, TrySendError};
use shared::ApiEnvelope;

/// Message stored in `error` when the gateway could not be reached or sent
/// something unreadable.
pub const NETWORK_ERROR: &str = "Unable to reach the server. Please check your connection and try again.";

/// A store holding data that belongs to the signed-in user. Reset when the
/// session ends.
pub trait SessionScoped: Send + Sync {
    fn reset(&self);
}

/// Sending half of the store event channel.
///
/// Sends never wait. When the view layer falls behind, events are dropped;
/// the state snapshots stay authoritative.
#[derive(Clone)]
pub struct EventSink {
    tx: Option<Sender<StoreEvent>>,
}

impl EventSink {
    pub fn new(tx: Sender<StoreEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Sink that discards every event.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: StoreEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::debug!(?event, "Event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

/// Collapse a gateway result into its payload or the message to store in
/// `error`.
///
/// Domain failures keep the server's message (or `fallback` when it is
/// blank). Transport failures are logged and mapped to [`NETWORK_ERROR`].
pub(crate) fn settle<T, U>(
    result: Result<ApiEnvelope<T>>,
    fallback: &str,
    unwrap: impl FnOnce(ApiEnvelope<T>) -> std::result::Result<U, String>,
) -> std::result::Result<U, String> {
    match result {
        Ok(envelope) => unwrap(envelope).map_err(|message| {
            if message.trim().is_empty() {
                fallback.to_string()
            } else {
                message
            }
        }),
        Err(e) => {
            tracing::error!(error = %e, "Gateway call failed");
            Err(NETWORK_ERROR.to_string())
        }
    }
}
