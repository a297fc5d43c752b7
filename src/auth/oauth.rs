// Authorization Code flow helpers for user (delegated) tokens

use anyhow::{Context, Result};
use reqwest::{Client, Response, Url};

use super::types::{Endpoints, TokenResponse};
use crate::error::ApiError;
use crate::utils::sanitize_body;

/// Build the seller consent URL for the Authorization Code flow
///
/// `scopes` are space-joined; `state` is only included when non-empty.
pub fn build_authorization_url<S: AsRef<str>>(
    endpoints: &Endpoints,
    client_id: &str,
    redirect_uri: &str,
    scopes: &[S],
    state: Option<&str>,
) -> crate::error::Result<String> {
    let scope = join_scopes(scopes);
    let mut params = vec![
        ("client_id", client_id),
        ("response_type", "code"),
        ("redirect_uri", redirect_uri),
        ("scope", scope.as_str()),
    ];
    if let Some(state) = state.filter(|s| !s.is_empty()) {
        params.push(("state", state));
    }

    let url = Url::parse_with_params(&endpoints.authorize_url, &params).map_err(|e| {
        ApiError::ConfigError(format!(
            "Invalid authorize URL '{}': {}",
            endpoints.authorize_url, e
        ))
    })?;

    Ok(url.to_string())
}

/// Exchange an authorization code for access + refresh tokens
pub async fn exchange_code(
    client: &Client,
    endpoints: &Endpoints,
    client_id: &str,
    client_secret: &str,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenResponse> {
    tracing::info!("Exchanging authorization code for user token...");

    let form = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", redirect_uri),
    ];

    token_request(client, endpoints, client_id, client_secret, &form).await
}

/// Refresh a user access token using a stored refresh token
pub async fn refresh_user_token<S: AsRef<str>>(
    client: &Client,
    endpoints: &Endpoints,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
    scopes: &[S],
) -> Result<TokenResponse> {
    tracing::info!("Refreshing user token...");

    let scope = join_scopes(scopes);
    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("scope", scope.as_str()),
    ];

    token_request(client, endpoints, client_id, client_secret, &form).await
}

/// POST a form to the token endpoint with HTTP Basic client authentication.
/// Shared by the application token manager and the user token helpers.
pub(crate) async fn send_token_request(
    client: &Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
    form: &[(&str, &str)],
) -> reqwest::Result<Response> {
    client
        .post(token_url)
        .basic_auth(client_id, Some(client_secret))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .form(form)
        .send()
        .await
}

async fn token_request(
    client: &Client,
    endpoints: &Endpoints,
    client_id: &str,
    client_secret: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse> {
    let response = send_token_request(
        client,
        &endpoints.token_url,
        client_id,
        client_secret,
        form,
    )
    .await
    .context("Failed to send token request")?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(
            status = status.as_u16(),
            body = %sanitize_body(&error_text),
            "User token request failed"
        );
        anyhow::bail!(
            "Token request failed: {} - {}",
            status,
            sanitize_body(&error_text)
        );
    }

    response
        .json::<TokenResponse>()
        .await
        .context("Failed to parse token response")
}

/// Authorization code from what a user pasted after consent: the full
/// redirect URL, its query string, or the bare (possibly encoded) code
pub fn extract_authorization_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.contains("code=") {
        return Some(decode_code(input));
    }

    let url = if input.starts_with("http") {
        Url::parse(input).ok()?
    } else {
        let query = input.trim_start_matches('?');
        Url::parse("http://localhost/").ok()?.join(&format!("?{}", query)).ok()?
    };

    url.query_pairs()
        .find(|(name, _)| name == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

fn decode_code(code: &str) -> String {
    if !code.contains('%') {
        return code.to_string();
    }
    urlencoding::decode(code)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| code.to_string())
}

fn join_scopes<S: AsRef<str>>(scopes: &[S]) -> String {
    scopes
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}
