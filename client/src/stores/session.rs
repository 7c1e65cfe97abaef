//! # Session Store
//!
//! Authentication status, the signed-in user and the onboarding flag.
//!
//! ```text
//!   Idle ──── check_auth_status ───┬──▶ Authenticated
//!                                  └──▶ Unauthenticated
//!
//!   login / register ──▶ Loading ──┬──▶ Authenticated
//!                                  └──▶ Unauthenticated (error set)
//!
//!   Authenticated ── logout / reset_profile_selection / rejected refresh
//!                 ──▶ Unauthenticated
//! ```
//!
//! `Idle` is the pre-check state; views render nothing until it resolves.
//!
//! `status == Authenticated` exactly when `user` is set. Only the onboarding
//! flag is persisted to the key-value store; tokens and the cached user live
//! in the gateway's credential vault.

use super::sequence::Sequencer;
use super::{settle, EventSink, SessionScoped};
use crate::app::events::StoreEvent;
use crate::core::service::{ApiService, KeyValueStore};
use crate::utils::validation::{
    validate_email, validate_login, validate_name, validate_password,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use shared::{ApiEnvelope, LoginRequest, RegisterRequest, UpdateProfileRequest, User};
use std::sync::Arc;

/// Key of the persisted session record
pub const SESSION_KEY: &str = "sunshare.session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    /// Startup, before the first auth check resolves
    #[default]
    Idle,
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Snapshot of the session slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub status: AuthStatus,
    pub is_onboarded: bool,
    pub error: Option<String>,
    /// Bumped on every committed change
    pub version: u64,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    fn sign_in(&mut self, user: User) {
        self.user = Some(user);
        self.status = AuthStatus::Authenticated;
    }

    fn sign_out(&mut self) {
        self.user = None;
        self.status = AuthStatus::Unauthenticated;
    }
}

/// Persisted projection of the session. Identity is never part of it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    is_onboarded: bool,
}

pub struct SessionStore {
    api: Arc<dyn ApiService>,
    preferences: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
    /// check_auth_status, login, register, logout
    auth_seq: Sequencer,
    /// Background profile refresh and update_user
    profile_seq: Sequencer,
    /// Stores reset together with the session on logout
    dependents: Vec<Arc<dyn SessionScoped>>,
    events: EventSink,
}

impl SessionStore {
    pub fn new(
        api: Arc<dyn ApiService>,
        preferences: Arc<dyn KeyValueStore>,
        dependents: Vec<Arc<dyn SessionScoped>>,
        events: EventSink,
    ) -> Self {
        Self {
            api,
            preferences,
            state: RwLock::new(SessionState::default()),
            auth_seq: Sequencer::new(),
            profile_seq: Sequencer::new(),
            dependents,
            events,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.read().clone()
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        let (status, version) = {
            let mut state = self.state.write();
            f(&mut *state);
            state.version += 1;
            (state.status, state.version)
        };
        self.events.emit(StoreEvent::SessionChanged { status, version });
    }

    /// Apply `f` only while `token` is the latest issued by `seq`.
    fn commit(&self, seq: &Sequencer, token: u64, f: impl FnOnce(&mut SessionState)) -> bool {
        let (status, version) = {
            let mut state = self.state.write();
            if !seq.is_current(token) {
                return false;
            }
            f(&mut *state);
            state.version += 1;
            (state.status, state.version)
        };
        self.events.emit(StoreEvent::SessionChanged { status, version });
        true
    }

    /// Load the persisted onboarding flag. Run once at startup.
    pub async fn rehydrate(&self) {
        let persisted = match self.preferences.get(SESSION_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<PersistedSession>(&raw) {
                Ok(persisted) => persisted,
                Err(e) => {
                    tracing::warn!(error = %e, "Corrupt session record, starting fresh");
                    PersistedSession::default()
                }
            },
            Ok(None) => PersistedSession::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session record");
                PersistedSession::default()
            }
        };

        tracing::debug!(is_onboarded = persisted.is_onboarded, "Session rehydrated");
        self.update(|state| state.is_onboarded = persisted.is_onboarded);
    }

    async fn persist(&self) {
        let record = PersistedSession {
            is_onboarded: self.state.read().is_onboarded,
        };
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode session record");
                return;
            }
        };
        if let Err(e) = self.preferences.set(SESSION_KEY, raw).await {
            tracing::warn!(error = %e, "Failed to persist session record");
        }
    }

    /// Resolve the startup auth state from the local credential cache.
    ///
    /// A cached session authenticates immediately; the profile is then
    /// refreshed in the background. Returns whether the user is signed in.
    pub async fn check_auth_status(self: &Arc<Self>) -> bool {
        let token = self.auth_seq.issue();

        let cached = if self.api.is_authenticated().await {
            self.api.stored_user().await
        } else {
            None
        };

        let authenticated = cached.is_some();
        let committed = self.commit(&self.auth_seq, token, |state| match cached {
            Some(user) => state.sign_in(user),
            None => state.sign_out(),
        });
        if !committed {
            return self.state.read().is_authenticated();
        }

        if authenticated {
            tracing::info!("Restored cached session");
            self.spawn_profile_refresh();
        }
        authenticated
    }

    fn spawn_profile_refresh(self: &Arc<Self>) {
        let token = self.profile_seq.issue();
        let store = Arc::clone(self);
        tokio::spawn(async move {
            store.refresh_profile(token).await;
        });
    }

    async fn refresh_profile(&self, token: u64) {
        match settle(self.api.get_profile().await, "", ApiEnvelope::into_payload) {
            Ok(user) => {
                let committed = self.commit(&self.profile_seq, token, |state| {
                    if state.is_authenticated() {
                        state.user = Some(user);
                    }
                });
                if committed {
                    tracing::debug!("Profile refreshed");
                }
            }
            // Keep the cached user; the session stays valid
            Err(message) => tracing::warn!(error = %message, "Background profile refresh failed"),
        }
    }

    /// Reject input before any network call. The status falls back to
    /// whatever the current user implies.
    fn reject(&self, message: String) -> bool {
        self.update(|state| {
            state.status = if state.user.is_some() {
                AuthStatus::Authenticated
            } else {
                AuthStatus::Unauthenticated
            };
            state.error = Some(message);
        });
        false
    }

    fn begin_auth(&self) -> u64 {
        let token = self.auth_seq.issue();
        self.profile_seq.invalidate();
        self.update(|state| {
            state.user = None;
            state.status = AuthStatus::Loading;
            state.error = None;
        });
        token
    }

    fn finish_auth(&self, token: u64, outcome: Result<User, String>) -> bool {
        let succeeded = outcome.is_ok();
        let committed = self.commit(&self.auth_seq, token, |state| match outcome {
            Ok(user) => state.sign_in(user),
            Err(message) => {
                state.sign_out();
                state.error = Some(message);
            }
        });
        committed && succeeded
    }

    /// Sign in. Returns `true` when the session is established.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> bool {
        if let Err(message) = validate_login(&request.email, &request.password).into_result() {
            return self.reject(message);
        }

        let token = self.begin_auth();
        let outcome = settle(
            self.api.login(request).await,
            "Login failed",
            ApiEnvelope::into_payload,
        )
        .map(|payload| payload.user);
        self.finish_auth(token, outcome)
    }

    /// Create an account and sign in.
    #[tracing::instrument(skip(self, request), fields(email = %request.email, role = request.role.as_str()))]
    pub async fn register(&self, request: RegisterRequest) -> bool {
        let checks = [
            validate_name(&request.first_name, "First name"),
            validate_name(&request.last_name, "Last name"),
            validate_email(&request.email),
            validate_password(&request.password),
        ];
        if let Some(message) = checks.into_iter().find_map(|check| check.error) {
            return self.reject(message);
        }

        let token = self.begin_auth();
        let outcome = settle(
            self.api.register(request).await,
            "Registration failed",
            ApiEnvelope::into_payload,
        )
        .map(|payload| payload.user);
        self.finish_auth(token, outcome)
    }

    /// End the session. The remote call is best-effort; local state is
    /// always cleared and the ledger and telemetry stores are reset.
    /// The onboarding flag is kept.
    pub async fn logout(&self) {
        self.end_session(false).await;
    }

    /// Log out and send the user back through onboarding.
    pub async fn reset_profile_selection(&self) {
        self.end_session(true).await;
    }

    async fn end_session(&self, clear_onboarding: bool) {
        self.auth_seq.invalidate();
        self.profile_seq.invalidate();

        match self.api.logout().await {
            Ok(envelope) if !envelope.success => {
                tracing::warn!(message = %envelope.message, "Server rejected logout");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Logout request failed"),
        }

        self.clear_local(clear_onboarding);
        self.persist().await;
        tracing::info!(clear_onboarding, "Session ended");
    }

    fn clear_local(&self, clear_onboarding: bool) {
        // Late auth responses must not resurrect the session
        self.auth_seq.invalidate();
        self.profile_seq.invalidate();
        self.update(|state| {
            state.sign_out();
            state.error = None;
            if clear_onboarding {
                state.is_onboarded = false;
            }
        });
        for store in &self.dependents {
            store.reset();
        }
    }

    /// Apply a partial profile update. The server's profile replaces the
    /// local one wholesale.
    pub async fn update_user(&self, request: UpdateProfileRequest) -> bool {
        if !self.state.read().is_authenticated() {
            self.update(|state| state.error = Some("You must be signed in to update your profile".to_string()));
            return false;
        }
        if request.is_empty() {
            return true;
        }

        let token = self.profile_seq.issue();
        self.update(|state| state.error = None);

        let outcome = settle(
            self.api.update_profile(request).await,
            "Failed to update profile",
            ApiEnvelope::into_payload,
        );
        let succeeded = outcome.is_ok();
        let committed = self.commit(&self.profile_seq, token, |state| match outcome {
            Ok(user) if state.is_authenticated() => state.user = Some(user),
            Ok(_) => {}
            Err(message) => state.error = Some(message),
        });
        committed && succeeded
    }

    /// Exchange the refresh token. A rejected refresh ends the session
    /// locally; a transport failure leaves it untouched.
    ///
    /// The outcome is dropped once a login, register or logout has been
    /// issued after the call started.
    pub async fn refresh_session(&self) -> bool {
        let token = self.auth_seq.current();

        match self.api.refresh_token().await {
            Ok(envelope) if envelope.success => self.auth_seq.is_current(token),
            Ok(envelope) => {
                tracing::warn!(status = envelope.status_code, message = %envelope.message, "Token refresh rejected");
                let mut expired = false;
                self.commit(&self.auth_seq, token, |state| {
                    if state.is_authenticated() {
                        state.sign_out();
                        state.error =
                            Some("Your session has expired. Please sign in again.".to_string());
                        expired = true;
                    }
                });
                if expired {
                    self.auth_seq.invalidate();
                    self.profile_seq.invalidate();
                    for store in &self.dependents {
                        store.reset();
                    }
                } else {
                    tracing::debug!("Stale refresh rejection ignored");
                }
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed");
                false
            }
        }
    }

    pub async fn set_onboarded(&self, onboarded: bool) {
        self.update(|state| state.is_onboarded = onboarded);
        self.persist().await;
    }

    pub fn clear_error(&self) {
        self.update(|state| state.error = None);
    }
}
