//! # Service Traits
//!
//! Seams to the external collaborators of the state layer. The stores only
//! ever talk to these traits, so tests swap in stubs and the app context
//! decides which concrete implementation runs.

use crate::core::error::Result;
use async_trait::async_trait;
use shared::{
    ApiEnvelope, AuthPayload, BalancePayload, DailySummary, EnergyReading, EnergyStats,
    LoginRequest, MonthlySummary, RegisterRequest, SummaryPeriod, TimeRange, TokenPair,
    TopupRequest, TopupResponse, Transaction, TransactionFilters, UpdateProfileRequest, User,
    WithdrawRequest,
};

/// Remote API gateway.
///
/// Every remote call resolves to the gateway's envelope. `Err` is reserved
/// for transport faults (network, malformed body); an expected domain failure
/// such as bad credentials is `Ok(envelope)` with `success == false`.
///
/// `is_authenticated` and `stored_user` are local reads of the credential
/// cache kept by the gateway implementation.
#[async_trait]
pub trait ApiService: Send + Sync {
    // Auth
    async fn login(&self, request: LoginRequest) -> Result<ApiEnvelope<AuthPayload>>;
    async fn register(&self, request: RegisterRequest) -> Result<ApiEnvelope<AuthPayload>>;
    async fn logout(&self) -> Result<ApiEnvelope<()>>;
    async fn refresh_token(&self) -> Result<ApiEnvelope<TokenPair>>;
    async fn get_profile(&self) -> Result<ApiEnvelope<User>>;
    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<ApiEnvelope<User>>;
    async fn is_authenticated(&self) -> bool;
    async fn stored_user(&self) -> Option<User>;

    // Wallet
    async fn get_balance(&self) -> Result<ApiEnvelope<BalancePayload>>;
    async fn get_transactions(
        &self,
        filters: &TransactionFilters,
        page: u32,
        limit: u32,
    ) -> Result<ApiEnvelope<Vec<Transaction>>>;
    async fn topup(&self, request: TopupRequest) -> Result<ApiEnvelope<TopupResponse>>;
    async fn withdraw(&self, request: WithdrawRequest) -> Result<ApiEnvelope<()>>;
    async fn get_transaction_summary(
        &self,
        period: SummaryPeriod,
    ) -> Result<ApiEnvelope<MonthlySummary>>;

    // Telemetry
    async fn get_latest_reading(&self) -> Result<ApiEnvelope<EnergyReading>>;
    async fn get_history(&self, range: TimeRange) -> Result<ApiEnvelope<Vec<EnergyReading>>>;
    async fn get_today_summary(&self) -> Result<ApiEnvelope<DailySummary>>;
    async fn get_stats(&self, range: TimeRange) -> Result<ApiEnvelope<EnergyStats>>;
}

/// Durable on-device key-value storage.
///
/// Values are opaque strings; callers serialize their own records.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}
