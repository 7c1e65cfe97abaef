//! # Authentication Endpoints
//!
//! Login, registration, logout, token refresh and the profile. Successful
//! auth calls persist the token pair and user in the credential vault.

use super::client::ApiClient;
use crate::core::error::Result;
use crate::services::credentials::StoredCredentials;
use reqwest::Method;
use shared::{
    ApiEnvelope, AuthPayload, LoginRequest, RefreshTokenRequest, RegisterRequest, TokenPair,
    UpdateProfileRequest, User,
};
use std::time::Instant;

/// Login with email and password.
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn login(client: &ApiClient, request: LoginRequest) -> Result<ApiEnvelope<AuthPayload>> {
    tracing::info!("Attempting login");
    let start = Instant::now();

    let builder = client.request(Method::POST, "/auth/login").json(&request);
    let envelope = client
        .send_envelope::<AuthPayload>(builder, "auth.login")
        .await?;

    if let (true, Some(payload)) = (envelope.success, envelope.data.as_ref()) {
        persist_session(client, payload).await;
        tracing::info!(
            user_id = %payload.user.id,
            duration_ms = start.elapsed().as_millis(),
            "Login successful"
        );
    }
    Ok(envelope)
}

/// Register a new account.
#[tracing::instrument(skip(client, request), fields(email = %request.email, role = request.role.as_str()))]
pub async fn register(
    client: &ApiClient,
    request: RegisterRequest,
) -> Result<ApiEnvelope<AuthPayload>> {
    let builder = client.request(Method::POST, "/auth/register").json(&request);
    let envelope = client
        .send_envelope::<AuthPayload>(builder, "auth.register")
        .await?;

    if let (true, Some(payload)) = (envelope.success, envelope.data.as_ref()) {
        persist_session(client, payload).await;
        tracing::info!(user_id = %payload.user.id, "Registration successful");
    }
    Ok(envelope)
}

/// Invalidate the session server-side. The local vault is cleared whatever
/// the remote outcome.
pub async fn logout(client: &ApiClient) -> Result<ApiEnvelope<()>> {
    let builder = client.authed(Method::POST, "/auth/logout").await;
    let result = client.send_ack(builder, "auth.logout").await;

    if let Err(e) = client.vault().clear().await {
        tracing::error!(error = %e, "Failed to clear stored credentials");
    }
    result
}

/// Exchange the stored refresh token for a new pair.
pub async fn refresh_token(client: &ApiClient) -> Result<ApiEnvelope<TokenPair>> {
    let stored = client.vault().load().await?;
    let Some(stored) = stored else {
        return Ok(ApiEnvelope::failure(401, "No refresh token available"));
    };

    let request = RefreshTokenRequest {
        refresh_token: stored.refresh_token.clone(),
    };
    let builder = client.request(Method::POST, "/auth/refresh").json(&request);
    let envelope = client
        .send_envelope::<TokenPair>(builder, "auth.refresh")
        .await?;

    if let (true, Some(tokens)) = (envelope.success, envelope.data.as_ref()) {
        if client.vault().update_tokens(&stored.refresh_token, tokens).await? {
            tracing::debug!("Access token refreshed");
        } else {
            tracing::debug!("Session changed during refresh, tokens discarded");
        }
    }
    Ok(envelope)
}

/// Fetch the current profile and refresh the cached copy.
pub async fn get_profile(client: &ApiClient) -> Result<ApiEnvelope<User>> {
    let builder = client.authed(Method::GET, "/auth/profile").await;
    let envelope = client.send_envelope::<User>(builder, "auth.profile").await?;
    cache_user(client, &envelope).await;
    Ok(envelope)
}

/// Apply a partial profile update. The response carries the full profile.
pub async fn update_profile(
    client: &ApiClient,
    request: UpdateProfileRequest,
) -> Result<ApiEnvelope<User>> {
    let builder = client
        .authed(Method::PUT, "/auth/profile")
        .await
        .json(&request);
    let envelope = client
        .send_envelope::<User>(builder, "auth.profile.update")
        .await?;
    cache_user(client, &envelope).await;
    Ok(envelope)
}

async fn persist_session(client: &ApiClient, payload: &AuthPayload) {
    if let Err(e) = client.vault().save(&StoredCredentials::from(payload)).await {
        // The session still works for this run; only warm start is lost
        tracing::error!(error = %e, "Failed to persist credentials");
    }
}

async fn cache_user(client: &ApiClient, envelope: &ApiEnvelope<User>) {
    if let (true, Some(user)) = (envelope.success, envelope.data.as_ref()) {
        if let Err(e) = client.vault().update_user(user).await {
            tracing::warn!(error = %e, "Failed to cache user profile");
        }
    }
}
