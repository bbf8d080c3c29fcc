//! Process-wide cache of the catalog application token

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use super::CatalogError;

/// Application token issued by the catalog
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct XappToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl XappToken {
    /// A token is dead from its expiry instant onwards
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }
}

/// Source of fresh application tokens
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self) -> Result<XappToken, CatalogError>;
}

/// Issues tokens by exchanging the client id/secret pair at the catalog's token endpoint
#[derive(Clone)]
pub struct ArtsyTokenIssuer {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ArtsyTokenIssuer {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url: format!("{}/tokens/xapp_token", base_url.trim_end_matches('/')),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl TokenIssuer for ArtsyTokenIssuer {
    async fn issue(&self) -> Result<XappToken, CatalogError> {
        let response = self
            .http
            .post(&self.token_url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Catalog token endpoint responded with {}", status);
            return Err(CatalogError::TokenUnavailable(format!(
                "token endpoint responded with {}",
                status
            )));
        }

        let token: XappToken = response.json().await?;
        Ok(token)
    }
}

/// Shared handle to the single cached application token.
///
/// Refreshes lazily: a call finding the token absent or expired fetches a new
/// one before returning. The lock is held across the refresh, so concurrent
/// callers wait for that one refresh instead of starting their own.
#[derive(Clone)]
pub struct TokenCache {
    issuer: Arc<dyn TokenIssuer>,
    current: Arc<Mutex<Option<XappToken>>>,
}

impl TokenCache {
    pub fn new(issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            issuer,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a token valid right now, refreshing it first if needed.
    ///
    /// A failed refresh leaves the cache as it was and is reported as
    /// [`CatalogError::TokenUnavailable`]; the next caller tries again.
    pub async fn ensure_valid_token(&self) -> Result<String, CatalogError> {
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
            return Ok(token.token.clone());
        }

        debug!("Refreshing catalog application token");
        let fresh = self.issuer.issue().await.map_err(|e| match e {
            CatalogError::TokenUnavailable(msg) => CatalogError::TokenUnavailable(msg),
            other => CatalogError::TokenUnavailable(other.to_string()),
        })?;

        info!("Catalog application token valid until {}", fresh.expires_at);
        let token = fresh.token.clone();
        *current = Some(fresh);

        Ok(token)
    }

    /// Drop the cached token so the next call refreshes
    pub async fn invalidate(&self) {
        self.current.lock().await.take();
    }
}
