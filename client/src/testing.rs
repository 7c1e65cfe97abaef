//! Test support: sample records and a scripted in-memory gateway.

use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use parking_lot::Mutex;
use shared::{
    ApiEnvelope, AuthPayload, BalancePayload, DailySummary, EnergyReading, EnergyStats,
    LoginRequest, MonthlySummary, Pagination, RegisterRequest, SummaryPeriod, TimeRange,
    TokenPair, TopupRequest, TopupResponse, Transaction, TransactionFilters,
    TransactionStatus, TransactionType, UpdateProfileRequest, User, UserRole, WalletSnapshot,
    WithdrawRequest,
};
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Notify;

pub fn sample_user(id: &str) -> User {
    User {
        id: id.to_string(),
        role: UserRole::Host,
        first_name: "Ada".to_string(),
        last_name: "Okafor".to_string(),
        email: "a@b.com".to_string(),
        phone: None,
        avatar_url: None,
        is_verified: true,
        created_at: None,
    }
}

pub fn sample_transaction(index: usize, kind: TransactionType) -> Transaction {
    Transaction {
        id: format!("tx-{}", index),
        kind,
        amount: 10.0 + index as f64,
        status: TransactionStatus::Completed,
        description: None,
        reference: Some(format!("REF{:05}", index)),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap() - Duration::hours(index as i64),
    }
}

pub fn sample_reading(index: usize, production_kwh: f64, consumption_kwh: f64) -> EnergyReading {
    EnergyReading {
        id: format!("r-{}", index),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::hours(index as i64),
        production_kwh,
        consumption_kwh,
        grid_export_kwh: 0.0,
        grid_import_kwh: 0.0,
        battery_level: None,
    }
}

/// Poll `condition` until it holds. Panics after two seconds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

/// Scripted failure for one endpoint.
#[derive(Debug, Clone)]
pub enum Failure {
    /// Envelope with `success: false`
    Domain(u16, String),
    /// Connection-level fault
    Transport,
}

/// Server-side state backing [`StubApi`].
pub struct ServerState {
    pub user: User,
    pub password: String,
    /// Local credential cache (what `is_authenticated`/`stored_user` read)
    pub signed_in: bool,
    pub cached_user: Option<User>,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
    pub summary: MonthlySummary,
    pub readings: Vec<EnergyReading>,
    pub payment_url: Option<String>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            user: sample_user("u1"),
            password: "validpass1".to_string(),
            signed_in: false,
            cached_user: None,
            balance: 1000.0,
            transactions: Vec::new(),
            summary: MonthlySummary::default(),
            readings: Vec::new(),
            payment_url: None,
        }
    }
}

/// In-memory [`ApiService`] with scripted data, failure injection and
/// per-call gates.
///
/// Each call records itself, snapshots its response from [`ServerState`] at
/// entry, then waits on the next gate queued for its endpoint (if any)
/// before returning. Endpoint names are the trait method names.
#[derive(Default)]
pub struct StubApi {
    pub server: Mutex<ServerState>,
    failures: Mutex<HashMap<&'static str, Failure>>,
    gates: Mutex<HashMap<&'static str, VecDeque<Arc<Notify>>>>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl StubApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_server(configure: impl FnOnce(&mut ServerState)) -> Arc<Self> {
        let api = Self::default();
        configure(&mut api.server.lock());
        Arc::new(api)
    }

    pub fn fail(&self, endpoint: &'static str, failure: Failure) {
        self.failures.lock().insert(endpoint, failure);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.failures.lock().remove(endpoint);
    }

    /// Queue a gate for the next call to `endpoint`. The call blocks until
    /// the returned handle is notified.
    pub fn hold(&self, endpoint: &'static str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .entry(endpoint)
            .or_default()
            .push_back(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().get(endpoint).copied().unwrap_or(0)
    }

    /// Wait until `endpoint` has been entered `count` times.
    pub async fn entered(&self, endpoint: &str, count: usize) {
        eventually(|| self.calls(endpoint) >= count).await;
    }

    fn respond<T>(
        &self,
        endpoint: &'static str,
        build: impl FnOnce(&mut ServerState) -> ApiEnvelope<T>,
    ) -> (Result<ApiEnvelope<T>>, Option<Arc<Notify>>) {
        *self.calls.lock().entry(endpoint).or_default() += 1;
        let gate = self
            .gates
            .lock()
            .get_mut(endpoint)
            .and_then(|queue| queue.pop_front());

        let failure = self.failures.lock().get(endpoint).cloned();
        let result = match failure {
            Some(Failure::Transport) => Err(AppError::Transport("connection reset".to_string())),
            Some(Failure::Domain(code, message)) => Ok(ApiEnvelope::failure(code, message)),
            None => Ok(build(&mut self.server.lock())),
        };
        (result, gate)
    }

    fn call<T: Send>(
        &self,
        endpoint: &'static str,
        build: impl FnOnce(&mut ServerState) -> ApiEnvelope<T>,
    ) -> impl Future<Output = Result<ApiEnvelope<T>>> + Send {
        let (result, gate) = self.respond(endpoint, build);
        async move {
            if let Some(gate) = gate {
                gate.notified().await;
            }
            result
        }
    }
}

fn wallet(balance: f64) -> WalletSnapshot {
    WalletSnapshot {
        balance,
        pending_balance: 0.0,
        total_earned: 0.0,
        total_spent: 0.0,
        last_updated: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn auth_payload(user: &User) -> AuthPayload {
    AuthPayload {
        user: user.clone(),
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
    }
}

#[async_trait]
impl ApiService for StubApi {
    async fn login(&self, request: LoginRequest) -> Result<ApiEnvelope<AuthPayload>> {
        self.call("login", move |s| {
            if request.email == s.user.email && request.password == s.password {
                s.signed_in = true;
                s.cached_user = Some(s.user.clone());
                ApiEnvelope::ok(auth_payload(&s.user))
            } else {
                ApiEnvelope::failure(401, "Invalid email or password")
            }
        })
        .await
    }

    async fn register(&self, request: RegisterRequest) -> Result<ApiEnvelope<AuthPayload>> {
        self.call("register", move |s| {
            s.user = User {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                role: request.role,
                ..s.user.clone()
            };
            s.password = request.password;
            s.signed_in = true;
            s.cached_user = Some(s.user.clone());
            ApiEnvelope::ok(auth_payload(&s.user))
        })
        .await
    }

    async fn logout(&self) -> Result<ApiEnvelope<()>> {
        // Local credentials go whatever the remote outcome
        {
            let mut server = self.server.lock();
            server.signed_in = false;
            server.cached_user = None;
        }
        self.call("logout", |_| ApiEnvelope::ok(())).await
    }

    async fn refresh_token(&self) -> Result<ApiEnvelope<TokenPair>> {
        self.call("refresh_token", |_| {
            ApiEnvelope::ok(TokenPair {
                access_token: "access-2".to_string(),
                refresh_token: "refresh-2".to_string(),
            })
        })
        .await
    }

    async fn get_profile(&self) -> Result<ApiEnvelope<User>> {
        self.call("get_profile", |s| ApiEnvelope::ok(s.user.clone()))
            .await
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<ApiEnvelope<User>> {
        self.call("update_profile", move |s| {
            if let Some(first_name) = request.first_name {
                s.user.first_name = first_name;
            }
            if let Some(last_name) = request.last_name {
                s.user.last_name = last_name;
            }
            if let Some(phone) = request.phone {
                s.user.phone = Some(phone);
            }
            if let Some(avatar_url) = request.avatar_url {
                s.user.avatar_url = Some(avatar_url);
            }
            ApiEnvelope::ok(s.user.clone())
        })
        .await
    }

    async fn is_authenticated(&self) -> bool {
        self.server.lock().signed_in
    }

    async fn stored_user(&self) -> Option<User> {
        self.server.lock().cached_user.clone()
    }

    async fn get_balance(&self) -> Result<ApiEnvelope<BalancePayload>> {
        self.call("get_balance", |s| {
            ApiEnvelope::ok(BalancePayload {
                wallet: wallet(s.balance),
                pending_transactions: Vec::new(),
                recent_activity: s.transactions.iter().take(5).cloned().collect(),
            })
        })
        .await
    }

    async fn get_transactions(
        &self,
        filters: &TransactionFilters,
        page: u32,
        limit: u32,
    ) -> Result<ApiEnvelope<Vec<Transaction>>> {
        let filters = filters.clone();
        self.call("get_transactions", move |s| {
            let matching: Vec<Transaction> = s
                .transactions
                .iter()
                .filter(|tx| filters.kind.map_or(true, |kind| tx.kind == kind))
                .filter(|tx| filters.status.map_or(true, |status| tx.status == status))
                .cloned()
                .collect();
            let total = matching.len() as u32;
            let limit = limit.max(1);
            let pages = total.div_ceil(limit).max(1);
            let items = matching
                .into_iter()
                .skip(((page.max(1) - 1) * limit) as usize)
                .take(limit as usize)
                .collect();
            ApiEnvelope::ok(items).with_pagination(Pagination {
                page,
                limit,
                total,
                pages,
            })
        })
        .await
    }

    async fn topup(&self, request: TopupRequest) -> Result<ApiEnvelope<TopupResponse>> {
        self.call("topup", move |s| {
            s.balance += request.amount;
            ApiEnvelope::ok(TopupResponse {
                payment_url: s.payment_url.clone(),
                reference: Some("TOP-0001".to_string()),
            })
        })
        .await
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<ApiEnvelope<()>> {
        self.call("withdraw", move |s| {
            if request.amount > s.balance {
                ApiEnvelope::failure(422, "Insufficient balance")
            } else {
                s.balance -= request.amount;
                ApiEnvelope::ok(())
            }
        })
        .await
    }

    async fn get_transaction_summary(
        &self,
        _period: SummaryPeriod,
    ) -> Result<ApiEnvelope<MonthlySummary>> {
        self.call("get_transaction_summary", |s| {
            ApiEnvelope::ok(s.summary.clone())
        })
        .await
    }

    async fn get_latest_reading(&self) -> Result<ApiEnvelope<EnergyReading>> {
        self.call("get_latest_reading", |s| match s.readings.last() {
            Some(reading) => ApiEnvelope::ok(reading.clone()),
            None => ApiEnvelope::failure(404, "No readings yet"),
        })
        .await
    }

    async fn get_history(&self, _range: TimeRange) -> Result<ApiEnvelope<Vec<EnergyReading>>> {
        self.call("get_history", |s| ApiEnvelope::ok(s.readings.clone()))
            .await
    }

    async fn get_today_summary(&self) -> Result<ApiEnvelope<DailySummary>> {
        self.call("get_today_summary", |s| {
            let production: f64 = s.readings.iter().map(|r| r.production_kwh).sum();
            let consumption: f64 = s.readings.iter().map(|r| r.consumption_kwh).sum();
            ApiEnvelope::ok(DailySummary {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap_or_default(),
                total_production_kwh: production,
                total_consumption_kwh: consumption,
                net_export_kwh: production - consumption,
                peak_production_kwh: 0.0,
                self_sufficiency_pct: 0.0,
                earnings: 0.0,
            })
        })
        .await
    }

    async fn get_stats(&self, range: TimeRange) -> Result<ApiEnvelope<EnergyStats>> {
        self.call("get_stats", move |s| {
            ApiEnvelope::ok(EnergyStats {
                range,
                total_production_kwh: s.readings.iter().map(|r| r.production_kwh).sum(),
                total_consumption_kwh: s.readings.iter().map(|r| r.consumption_kwh).sum(),
                average_daily_production_kwh: 0.0,
                carbon_offset_kg: 0.0,
                savings: 0.0,
            })
        })
        .await
    }
}
