//! # Credential Vault
//!
//! Tokens and the cached user projection used for instant warm-start
//! authentication. Lives in its own [`KeyValueStore`] (owner-only file in
//! production), separate from the general preferences store that holds the
//! onboarding flag.

use crate::core::error::Result;
use crate::core::service::KeyValueStore;
use serde::{Deserialize, Serialize};
use shared::{AuthPayload, TokenPair, User};
use std::fmt;
use std::sync::Arc;

pub const CREDENTIALS_KEY: &str = "sunshare.credentials";

/// Persisted credential record
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl From<&AuthPayload> for StoredCredentials {
    fn from(payload: &AuthPayload) -> Self {
        Self {
            access_token: payload.access_token.clone(),
            refresh_token: payload.refresh_token.clone(),
            user: Some(payload.user.clone()),
        }
    }
}

// Tokens never reach the logs
impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("user", &self.user.as_ref().map(|u| u.id.as_str()))
            .finish()
    }
}

/// Read/write access to the credential record.
#[derive(Clone)]
pub struct CredentialVault {
    store: Arc<dyn KeyValueStore>,
}

impl CredentialVault {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<Option<StoredCredentials>> {
        match self.store.get(CREDENTIALS_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn save(&self, credentials: &StoredCredentials) -> Result<()> {
        let raw = serde_json::to_string(credentials)?;
        self.store.set(CREDENTIALS_KEY, raw).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(CREDENTIALS_KEY).await
    }

    /// Access token of the stored session, if any.
    pub async fn access_token(&self) -> Option<String> {
        match self.load().await {
            Ok(Some(credentials)) if !credentials.access_token.is_empty() => {
                Some(credentials.access_token)
            }
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable credential record");
                None
            }
        }
    }

    /// Replace the token pair, keeping the cached user.
    ///
    /// No-op unless the stored record still holds `replaced` as its refresh
    /// token: a refresh that lands after logout, or after another sign-in,
    /// must not write credentials. Returns whether the record was updated.
    pub async fn update_tokens(&self, replaced: &str, tokens: &TokenPair) -> Result<bool> {
        match self.load().await? {
            Some(mut credentials) if credentials.refresh_token == replaced => {
                credentials.access_token = tokens.access_token.clone();
                credentials.refresh_token = tokens.refresh_token.clone();
                self.save(&credentials).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Replace the cached user. No-op without a stored session.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        if let Some(mut credentials) = self.load().await? {
            credentials.user = Some(user.clone());
            self.save(&credentials).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryKeyValueStore;
    use crate::testing::sample_user;

    fn vault() -> CredentialVault {
        CredentialVault::new(Arc::new(MemoryKeyValueStore::new()))
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let vault = vault();
        assert!(vault.load().await.unwrap().is_none());

        let payload = AuthPayload {
            user: sample_user("u1"),
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };
        vault.save(&StoredCredentials::from(&payload)).await.unwrap();
        assert_eq!(vault.access_token().await, Some("access".to_string()));

        vault.clear().await.unwrap();
        assert_eq!(vault.access_token().await, None);
    }

    #[tokio::test]
    async fn test_update_tokens_keeps_user() {
        let vault = vault();
        vault
            .save(&StoredCredentials {
                access_token: "old".to_string(),
                refresh_token: "old-refresh".to_string(),
                user: Some(sample_user("u1")),
            })
            .await
            .unwrap();

        let updated = vault
            .update_tokens(
                "old-refresh",
                &TokenPair {
                    access_token: "new".to_string(),
                    refresh_token: "new-refresh".to_string(),
                },
            )
            .await
            .unwrap();

        assert!(updated);
        let stored = vault.load().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "new");
        assert_eq!(stored.user.map(|u| u.id), Some("u1".to_string()));
    }

    #[tokio::test]
    async fn test_update_tokens_after_clear_is_noop() {
        let vault = vault();
        let tokens = TokenPair {
            access_token: "late".to_string(),
            refresh_token: "late-refresh".to_string(),
        };

        assert!(!vault.update_tokens("old-refresh", &tokens).await.unwrap());
        assert!(vault.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_tokens_skips_newer_session() {
        let vault = vault();
        vault
            .save(&StoredCredentials {
                access_token: "second".to_string(),
                refresh_token: "second-refresh".to_string(),
                user: Some(sample_user("u2")),
            })
            .await
            .unwrap();

        let tokens = TokenPair {
            access_token: "late".to_string(),
            refresh_token: "late-refresh".to_string(),
        };
        assert!(!vault.update_tokens("first-refresh", &tokens).await.unwrap());

        let stored = vault.load().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "second");
    }

    #[tokio::test]
    async fn test_update_user_without_session_is_noop() {
        let vault = vault();
        vault.update_user(&sample_user("u1")).await.unwrap();
        assert!(vault.load().await.unwrap().is_none());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let credentials = StoredCredentials {
            access_token: "super-secret".to_string(),
            refresh_token: "also-secret".to_string(),
            user: None,
        };
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("secret"));
    }
}
