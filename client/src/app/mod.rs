//! # Application Context
//!
//! Dependency-injection root. Owns exactly one instance of each store, the
//! gateway and the event channel; the host application creates one
//! `AppContext` at startup and hands references to its views.
//!
//! ```text
//! AppContext
//! ├── api:       Arc<dyn ApiService>
//! ├── session:   Arc<SessionStore> ──resets──┐
//! ├── ledger:    Arc<LedgerStore>   ◀────────┤
//! ├── telemetry: Arc<TelemetryStore> ◀───────┘
//! └── events:    async_channel::Receiver<StoreEvent>
//! ```

pub mod events;

pub use events::StoreEvent;

use crate::core::config::ClientConfig;
use crate::core::error::Result;
use crate::core::service::{ApiService, KeyValueStore};
use crate::services::api::ApiClient;
use crate::services::credentials::CredentialVault;
use crate::services::storage::FileKeyValueStore;
use crate::stores::{EventSink, LedgerStore, SessionScoped, SessionStore, TelemetryStore};
use async_channel::Receiver;
use std::sync::Arc;

/// Capacity of the store event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

pub struct AppContext {
    config: ClientConfig,
    api: Arc<dyn ApiService>,
    session: Arc<SessionStore>,
    ledger: Arc<LedgerStore>,
    telemetry: Arc<TelemetryStore>,
    events: Receiver<StoreEvent>,
}

impl AppContext {
    /// Wire the stores around an existing gateway and preferences store.
    pub fn new(
        api: Arc<dyn ApiService>,
        preferences: Arc<dyn KeyValueStore>,
        config: ClientConfig,
    ) -> Self {
        let (tx, rx) = async_channel::bounded(EVENT_CHANNEL_CAPACITY);
        let sink = EventSink::new(tx);

        let ledger = Arc::new(LedgerStore::new(
            Arc::clone(&api),
            config.page_size,
            sink.clone(),
        ));
        let telemetry = Arc::new(TelemetryStore::new(Arc::clone(&api), sink.clone()));
        let dependents = vec![
            ledger.clone() as Arc<dyn SessionScoped>,
            telemetry.clone() as Arc<dyn SessionScoped>,
        ];
        let session = Arc::new(SessionStore::new(
            Arc::clone(&api),
            preferences,
            dependents,
            sink,
        ));

        Self {
            config,
            api,
            session,
            ledger,
            telemetry,
            events: rx,
        }
    }

    /// Production wiring: reqwest gateway, owner-only credential file and a
    /// preferences file under the configured data directory.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let credentials = Arc::new(FileKeyValueStore::owner_only(config.credentials_path()));
        let vault = CredentialVault::new(credentials);
        let api: Arc<dyn ApiService> = Arc::new(ApiClient::new(&config, vault)?);
        let preferences = Arc::new(FileKeyValueStore::new(config.preferences_path()));

        tracing::info!(
            api_base_url = %config.api_base_url,
            data_dir = %config.data_dir.display(),
            page_size = config.page_size,
            "Client context created"
        );
        Ok(Self::new(api, preferences, config))
    }

    /// Startup sequence: restore the onboarding flag, then resolve the auth
    /// state from the credential cache. Returns whether a session was
    /// restored.
    pub async fn bootstrap(&self) -> bool {
        self.session.rehydrate().await;
        let authenticated = self.session.check_auth_status().await;
        tracing::info!(
            authenticated,
            is_onboarded = self.session.state().is_onboarded,
            "Bootstrap complete"
        );
        authenticated
    }

    /// Log out and reset every store.
    pub async fn logout(&self) {
        self.session.logout().await;
    }

    /// Log out, reset every store and clear the onboarding flag.
    pub async fn reset_profile_selection(&self) {
        self.session.reset_profile_selection().await;
    }

    /// Stop every in-flight ledger and telemetry fetch from committing
    /// (e.g. when the dashboard is torn down).
    pub fn cancel_pending(&self) {
        self.ledger.cancel_pending();
        self.telemetry.cancel_pending();
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<dyn ApiService> {
        &self.api
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn ledger(&self) -> &Arc<LedgerStore> {
        &self.ledger
    }

    pub fn telemetry(&self) -> &Arc<TelemetryStore> {
        &self.telemetry
    }

    /// Receiver for store change notifications. Clones share one queue.
    pub fn events(&self) -> Receiver<StoreEvent> {
        self.events.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryKeyValueStore;
    use crate::stores::session::AuthStatus;
    use crate::testing::{eventually, sample_reading, sample_transaction, sample_user, StubApi};
    use shared::{LoginRequest, TransactionFilters, TransactionType};

    fn context(api: Arc<StubApi>) -> AppContext {
        AppContext::new(api, Arc::new(MemoryKeyValueStore::new()), ClientConfig::default())
    }

    #[tokio::test]
    async fn test_bootstrap_restores_cached_session() {
        let api = StubApi::with_server(|s| {
            s.signed_in = true;
            s.cached_user = Some(sample_user("u1"));
        });
        let ctx = context(api.clone());

        assert!(ctx.bootstrap().await);
        assert_eq!(ctx.session().state().status, AuthStatus::Authenticated);
        api.entered("get_profile", 1).await;
    }

    #[tokio::test]
    async fn test_bootstrap_without_session() {
        let ctx = context(StubApi::new());
        assert!(!ctx.bootstrap().await);
        assert_eq!(ctx.session().state().status, AuthStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_resets_all_stores() {
        let api = StubApi::with_server(|s| {
            s.transactions = (0..5).map(|i| sample_transaction(i, TransactionType::Credit)).collect();
            s.readings = (0..24).map(|i| sample_reading(i, 1.0, 0.5)).collect();
        });
        let ctx = context(api);
        let logged_in = ctx
            .session()
            .login(LoginRequest {
                email: "a@b.com".to_string(),
                password: "validpass1".to_string(),
            })
            .await;
        assert!(logged_in);

        ctx.ledger().refresh().await;
        ctx.telemetry().refresh().await;
        assert!(ctx.ledger().state().wallet.is_some());
        assert_eq!(ctx.telemetry().state().readings.len(), 24);

        ctx.logout().await;

        assert_eq!(ctx.session().state().user, None);
        assert_eq!(ctx.ledger().state().wallet, None);
        assert!(ctx.ledger().state().transactions.is_empty());
        assert!(ctx.telemetry().state().readings.is_empty());
        assert_eq!(ctx.telemetry().state().latest_reading, None);
    }

    #[tokio::test]
    async fn test_events_reach_the_receiver() {
        let ctx = context(StubApi::new());
        let rx = ctx.events();

        ctx.ledger().fetch_balance().await;

        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            seen.push(event);
        }
        assert!(seen
            .iter()
            .any(|e| matches!(e, StoreEvent::BalanceRefreshed { balance_version: 1 })));
        assert!(seen.iter().any(|e| matches!(e, StoreEvent::LedgerChanged { .. })));
    }

    #[tokio::test]
    async fn test_cancel_pending_covers_both_stores() {
        let api = StubApi::new();
        let gate = api.hold("get_transactions");
        let ctx = context(api.clone());

        let ledger = Arc::clone(ctx.ledger());
        let fetch = tokio::spawn(async move {
            ledger.fetch_transactions(TransactionFilters::default()).await
        });
        api.entered("get_transactions", 1).await;

        ctx.cancel_pending();
        gate.notify_one();
        fetch.await.unwrap();

        eventually(|| !ctx.ledger().state().is_loading).await;
        assert_eq!(ctx.ledger().state().current_page, 0);
    }
}
