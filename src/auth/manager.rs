use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::RwLock;

use super::oauth;
use super::types::{CachedToken, TokenResponse, APPLICATION_SCOPE, DEFAULT_EXPIRES_IN};
use crate::error::{ApiError, Result};
use crate::utils::sanitize_body;

/// Timeout applied to token endpoint calls
const TOKEN_TIMEOUT_SECS: u64 = 30;

/// Authentication manager
/// Owns the application (client-credentials) token and refreshes it lazily
pub struct AuthManager {
    /// eBay App ID
    client_id: String,

    /// eBay Cert ID
    client_secret: String,

    /// OAuth2 token endpoint
    token_url: String,

    /// Current token and its expiry, replaced as a unit
    cached: RwLock<Option<CachedToken>>,

    /// HTTP client for token requests
    client: Client,
}

impl AuthManager {
    /// Create a new AuthManager; no token is fetched until first use
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_url: token_url.into(),
            cached: RwLock::new(None),
            client,
        })
    }

    /// Create an AuthManager with an already cached token
    #[cfg(test)]
    pub fn new_for_testing(
        access_token: String,
        expires_in: u64,
        token_url: impl Into<String>,
    ) -> Result<Self> {
        let mut manager = Self::new("test-client-id", "test-client-secret", token_url)?;
        manager.cached = RwLock::new(Some(CachedToken::new(access_token, expires_in)));
        Ok(manager)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// True when no token is cached or it is within the expiry buffer
    pub async fn is_stale(&self) -> bool {
        match self.cached.read().await.as_ref() {
            None => true,
            Some(token) => token.is_stale_at(Utc::now()),
        }
    }

    /// Get a valid application token, refreshing if necessary
    ///
    /// Concurrent callers that both observe a stale token may each refresh;
    /// the last response written wins.
    pub async fn get_token(&self) -> Result<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_stale_at(Utc::now()) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        self.refresh().await
    }

    /// Fetch a new application token unconditionally
    pub async fn refresh(&self) -> Result<String> {
        tracing::debug!("Refreshing application token...");

        let form = [
            ("grant_type", "client_credentials"),
            ("scope", APPLICATION_SCOPE),
        ];

        let response = oauth::send_token_request(
            &self.client,
            &self.token_url,
            &self.client_id,
            &self.client_secret,
            &form,
        )
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Token request failed before a response was received");
            ApiError::auth(format!("Failed to obtain access token: {}", e))
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            tracing::error!(status, error = %e, "Failed to read token response body");
            ApiError::auth(format!("Failed to obtain access token: {}", e))
        })?;

        if status != 200 {
            let payload: Option<Value> = serde_json::from_str(&body).ok();
            let message = token_error_message(payload.as_ref(), status);
            tracing::error!(
                status,
                body = %sanitize_body(&body),
                "Application token refresh failed"
            );
            return Err(ApiError::AuthError {
                message,
                status_code: Some(status),
                response_body: payload,
            });
        }

        let data: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::auth(format!("Failed to parse token response: {}", e))
        })?;

        let access_token = data
            .access_token()
            .ok_or_else(|| ApiError::AuthError {
                message: "Token response does not contain access_token".to_string(),
                status_code: Some(status),
                response_body: serde_json::from_str(&body).ok(),
            })?
            .to_string();

        let token = CachedToken::new(
            access_token.clone(),
            data.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        );

        tracing::info!(
            "Application token refreshed, expires: {}",
            token.expires_at.to_rfc3339()
        );

        *self.cached.write().await = Some(token);

        Ok(access_token)
    }

    /// Authorization header for the application token
    pub async fn build_header(&self) -> Result<(&'static str, String)> {
        let token = self.get_token().await?;
        Ok(("Authorization", format!("Bearer {}", token)))
    }
}

/// Prefer `error_description`, then `error`, then a status message
fn token_error_message(payload: Option<&Value>, status: u16) -> String {
    let field = |name: &str| {
        payload
            .and_then(|p| p.get(name))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    field("error_description")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("Token request failed with status {}", status))
}
