//! # API Client
//!
//! Main HTTP client for gateway communication.

use crate::core::config::ClientConfig;
use crate::core::error::{AppError, Result};
use crate::core::service::ApiService;
use crate::services::credentials::CredentialVault;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    ApiEnvelope, AuthPayload, BalancePayload, DailySummary, EnergyReading, EnergyStats,
    LoginRequest, MonthlySummary, RegisterRequest, SummaryPeriod, TimeRange, TokenPair,
    TopupRequest, TopupResponse, Transaction, TransactionFilters, UpdateProfileRequest, User,
    WithdrawRequest,
};
use std::time::Instant;

/// HTTP client for the SunShare gateway.
///
/// Holds the connection pool and the credential vault. Tokens returned by
/// auth endpoints are written to the vault here, so the stores never see
/// them.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    vault: CredentialVault,
}

impl ApiClient {
    /// Create a client with the configured base URL and request timeout.
    pub fn new(config: &ClientConfig, vault: CredentialVault) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            vault,
        })
    }

    pub(crate) fn vault(&self) -> &CredentialVault {
        &self.vault
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Unauthenticated request tagged with a fresh request id.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("X-Request-Id", uuid::Uuid::new_v4().to_string())
    }

    /// Request carrying the stored bearer token, when there is one.
    pub(crate) async fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.request(method, path);
        match self.vault.access_token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and decode the envelope.
    ///
    /// Any body that parses as an envelope is returned as `Ok`, whatever the
    /// HTTP status. Connection failures and non-envelope bodies are
    /// `AppError::Transport`.
    pub(crate) async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<ApiEnvelope<T>> {
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| {
            tracing::error!(endpoint, error = %e, "Network error");
            AppError::from(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(AppError::from)?;
        let duration_ms = start.elapsed().as_millis();

        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(mut envelope) => {
                if envelope.status_code == 0 {
                    envelope.status_code = status.as_u16();
                }
                if envelope.success {
                    tracing::debug!(endpoint, status = status.as_u16(), duration_ms, "Gateway call succeeded");
                } else {
                    tracing::warn!(
                        endpoint,
                        status = status.as_u16(),
                        message = %envelope.message,
                        duration_ms,
                        "Gateway call rejected"
                    );
                }
                Ok(envelope)
            }
            Err(e) => {
                tracing::error!(endpoint, status = status.as_u16(), error = %e, duration_ms, "Malformed gateway response");
                Err(AppError::Transport(format!(
                    "Malformed response from {} (HTTP {}): {}",
                    endpoint,
                    status.as_u16(),
                    e
                )))
            }
        }
    }

    /// [`send_envelope`](Self::send_envelope) for endpoints whose payload is
    /// ignored. Any `data` shape is accepted.
    pub(crate) async fn send_ack(
        &self,
        builder: RequestBuilder,
        endpoint: &'static str,
    ) -> Result<ApiEnvelope<()>> {
        let envelope = self
            .send_envelope::<serde_json::Value>(builder, endpoint)
            .await?;
        Ok(envelope.map(|_| ()))
    }
}

// Implement ApiService trait for ApiClient
#[async_trait::async_trait]
impl ApiService for ApiClient {
    async fn login(&self, request: LoginRequest) -> Result<ApiEnvelope<AuthPayload>> {
        crate::services::api::auth::login(self, request).await
    }

    async fn register(&self, request: RegisterRequest) -> Result<ApiEnvelope<AuthPayload>> {
        crate::services::api::auth::register(self, request).await
    }

    async fn logout(&self) -> Result<ApiEnvelope<()>> {
        crate::services::api::auth::logout(self).await
    }

    async fn refresh_token(&self) -> Result<ApiEnvelope<TokenPair>> {
        crate::services::api::auth::refresh_token(self).await
    }

    async fn get_profile(&self) -> Result<ApiEnvelope<User>> {
        crate::services::api::auth::get_profile(self).await
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> Result<ApiEnvelope<User>> {
        crate::services::api::auth::update_profile(self, request).await
    }

    async fn is_authenticated(&self) -> bool {
        self.vault.access_token().await.is_some()
    }

    async fn stored_user(&self) -> Option<User> {
        match self.vault.load().await {
            Ok(credentials) => credentials.and_then(|c| c.user),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached user");
                None
            }
        }
    }

    async fn get_balance(&self) -> Result<ApiEnvelope<BalancePayload>> {
        crate::services::api::wallet::get_balance(self).await
    }

    async fn get_transactions(
        &self,
        filters: &TransactionFilters,
        page: u32,
        limit: u32,
    ) -> Result<ApiEnvelope<Vec<Transaction>>> {
        crate::services::api::wallet::get_transactions(self, filters, page, limit).await
    }

    async fn topup(&self, request: TopupRequest) -> Result<ApiEnvelope<TopupResponse>> {
        crate::services::api::wallet::topup(self, request).await
    }

    async fn withdraw(&self, request: WithdrawRequest) -> Result<ApiEnvelope<()>> {
        crate::services::api::wallet::withdraw(self, request).await
    }

    async fn get_transaction_summary(
        &self,
        period: SummaryPeriod,
    ) -> Result<ApiEnvelope<MonthlySummary>> {
        crate::services::api::wallet::get_transaction_summary(self, period).await
    }

    async fn get_latest_reading(&self) -> Result<ApiEnvelope<EnergyReading>> {
        crate::services::api::telemetry::get_latest_reading(self).await
    }

    async fn get_history(&self, range: TimeRange) -> Result<ApiEnvelope<Vec<EnergyReading>>> {
        crate::services::api::telemetry::get_history(self, range).await
    }

    async fn get_today_summary(&self) -> Result<ApiEnvelope<DailySummary>> {
        crate::services::api::telemetry::get_today_summary(self).await
    }

    async fn get_stats(&self, range: TimeRange) -> Result<ApiEnvelope<EnergyStats>> {
        crate::services::api::telemetry::get_stats(self, range).await
    }
}
