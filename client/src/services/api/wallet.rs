//! # Wallet Endpoints
//!
//! Balance, paginated transaction history, top-up, withdrawal and the
//! period summary.

use super::client::ApiClient;
use crate::core::error::Result;
use reqwest::Method;
use shared::{
    ApiEnvelope, BalancePayload, MonthlySummary, SummaryPeriod, TopupRequest, TopupResponse,
    Transaction, TransactionFilters, WithdrawRequest,
};

/// Get the wallet snapshot together with pending transactions and the
/// recent-activity slice.
pub async fn get_balance(client: &ApiClient) -> Result<ApiEnvelope<BalancePayload>> {
    let builder = client.authed(Method::GET, "/wallet/balance").await;
    client.send_envelope(builder, "wallet.balance").await
}

/// Get one page of transaction history.
pub async fn get_transactions(
    client: &ApiClient,
    filters: &TransactionFilters,
    page: u32,
    limit: u32,
) -> Result<ApiEnvelope<Vec<Transaction>>> {
    let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
    query.extend(filters.query_pairs());

    let builder = client
        .authed(Method::GET, "/wallet/transactions")
        .await
        .query(&query);
    client.send_envelope(builder, "wallet.transactions").await
}

/// Start a top-up.
#[tracing::instrument(skip(client, request), fields(amount = request.amount))]
pub async fn topup(
    client: &ApiClient,
    request: TopupRequest,
) -> Result<ApiEnvelope<TopupResponse>> {
    let builder = client
        .authed(Method::POST, "/wallet/topup")
        .await
        .json(&request);
    client.send_envelope(builder, "wallet.topup").await
}

/// Request a withdrawal to the user's bank account.
#[tracing::instrument(skip(client, request), fields(amount = request.amount))]
pub async fn withdraw(client: &ApiClient, request: WithdrawRequest) -> Result<ApiEnvelope<()>> {
    let builder = client
        .authed(Method::POST, "/wallet/withdraw")
        .await
        .json(&request);
    client.send_ack(builder, "wallet.withdraw").await
}

/// Get credit/debit totals for a period.
pub async fn get_transaction_summary(
    client: &ApiClient,
    period: SummaryPeriod,
) -> Result<ApiEnvelope<MonthlySummary>> {
    let builder = client
        .authed(Method::GET, "/wallet/transactions/summary")
        .await
        .query(&[("period", period.as_str())]);
    client.send_envelope(builder, "wallet.summary").await
}
