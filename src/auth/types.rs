// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Scope requested for application (client-credentials) tokens
pub const APPLICATION_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Scopes used to renew a user token when none were configured
pub const DEFAULT_USER_SCOPES: [&str; 3] = [
    "https://api.ebay.com/oauth/api_scope/sell.inventory.readonly",
    "https://api.ebay.com/oauth/api_scope/sell.fulfillment.readonly",
    "https://api.ebay.com/oauth/api_scope/sell.account.readonly",
];

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_EXPIRES_IN: u64 = 7200;

/// Seconds before expiry at which a cached token is treated as stale
pub const EXPIRY_BUFFER_SECS: i64 = 60;

const TOKEN_PATH: &str = "/identity/v1/oauth2/token";
const AUTHORIZE_PATH: &str = "/oauth2/authorize";

/// eBay deployment target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// Hosts for this deployment target
    pub fn endpoints(&self) -> Endpoints {
        match self {
            Environment::Sandbox => Endpoints {
                api_base_url: "https://api.sandbox.ebay.com".to_string(),
                token_url: format!("https://api.sandbox.ebay.com{}", TOKEN_PATH),
                authorize_url: format!("https://auth.sandbox.ebay.com{}", AUTHORIZE_PATH),
            },
            Environment::Production => Endpoints {
                api_base_url: "https://api.ebay.com".to_string(),
                token_url: format!("https://api.ebay.com{}", TOKEN_PATH),
                authorize_url: format!("https://auth.ebay.com{}", AUTHORIZE_PATH),
            },
        }
    }
}

impl FromStr for Environment {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sandbox" => Ok(Environment::Sandbox),
            "production" => Ok(Environment::Production),
            other => Err(ApiError::ConfigError(format!(
                "environment must be 'sandbox' or 'production', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved URLs for one deployment target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Base URL for resource calls
    pub api_base_url: String,
    /// OAuth2 token endpoint (client-credentials, authorization-code, refresh)
    pub token_url: String,
    /// Consent page for the authorization-code flow
    pub authorize_url: String,
}

impl Endpoints {
    /// Endpoints rooted at a single host, e.g. a local test server
    pub fn with_host(host: &str) -> Self {
        let host = host.trim_end_matches('/');
        Self {
            api_base_url: host.to_string(),
            token_url: format!("{}{}", host, TOKEN_PATH),
            authorize_url: format!("{}{}", host, AUTHORIZE_PATH),
        }
    }
}

/// Application token together with its absolute expiry.
/// Stored as one value so readers never see a token paired with another token's expiry.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Lifetimes too large for a timestamp saturate to the latest representable expiry
    pub fn new(access_token: String, expires_in: u64) -> Self {
        let now = Utc::now();
        let expires_at = i64::try_from(expires_in)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            access_token,
            expires_at,
        }
    }

    /// True once `now >= expires_at - buffer`
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::seconds(EXPIRY_BUFFER_SECS)
    }
}

/// Token endpoint response (all grants)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl TokenResponse {
    /// Access token, treating an empty string as missing
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }
}
