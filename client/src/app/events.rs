//! Store events for the view layer

use crate::stores::session::AuthStatus;

/// Notification that a store's state changed.
///
/// Events carry only the new version; the view layer reads the store's
/// snapshot to re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Session state changed
    SessionChanged { status: AuthStatus, version: u64 },
    /// Ledger state changed
    LedgerChanged { version: u64 },
    /// A balance fetch committed (including the refresh after top-up/withdraw)
    BalanceRefreshed { balance_version: u64 },
    /// Telemetry state changed
    TelemetryChanged { version: u64 },
}
