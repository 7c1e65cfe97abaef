//! # Energy Telemetry Endpoints

use super::client::ApiClient;
use crate::core::error::Result;
use reqwest::Method;
use shared::{ApiEnvelope, DailySummary, EnergyReading, EnergyStats, TimeRange};

/// Most recent sensor sample.
pub async fn get_latest_reading(client: &ApiClient) -> Result<ApiEnvelope<EnergyReading>> {
    let builder = client.authed(Method::GET, "/energy/readings/latest").await;
    client.send_envelope(builder, "energy.latest").await
}

/// Readings for `range`, pre-aligned by the server to the range's buckets.
pub async fn get_history(
    client: &ApiClient,
    range: TimeRange,
) -> Result<ApiEnvelope<Vec<EnergyReading>>> {
    let builder = client
        .authed(Method::GET, "/energy/readings/history")
        .await
        .query(&[("range", range.as_str())]);
    client.send_envelope(builder, "energy.history").await
}

pub async fn get_today_summary(client: &ApiClient) -> Result<ApiEnvelope<DailySummary>> {
    let builder = client.authed(Method::GET, "/energy/summary/today").await;
    client.send_envelope(builder, "energy.summary.today").await
}

pub async fn get_stats(client: &ApiClient, range: TimeRange) -> Result<ApiEnvelope<EnergyStats>> {
    let builder = client
        .authed(Method::GET, "/energy/stats")
        .await
        .query(&[("range", range.as_str())]);
    client.send_envelope(builder, "energy.stats").await
}
