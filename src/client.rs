use std::sync::Arc;

use crate::auth::{AuthManager, Endpoints, Environment};
use crate::error::{ApiError, Result};
use crate::http_client::{DelegatedSession, EbayHttpClient};
use crate::resources::{AccountClient, BrowseClient, InventoryClient, OrdersClient};

/// Everything needed to talk to eBay as one application/seller
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
    /// Seller token for the Sell APIs; the application token is used when absent
    pub user_access_token: Option<String>,
    pub user_refresh_token: Option<String>,
    /// Scopes for user token renewal (default: read-only Sell scopes)
    pub user_token_scopes: Vec<String>,
    /// Override the environment's hosts, e.g. to target a local server
    pub endpoints: Option<Endpoints>,
}

impl ClientSettings {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            ..Default::default()
        }
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn user_token(
        mut self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        self.user_access_token = Some(access_token.into());
        self.user_refresh_token = refresh_token;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Hosts in effect: the override, else the environment's
    pub fn resolved_endpoints(&self) -> Endpoints {
        self.endpoints
            .clone()
            .unwrap_or_else(|| self.environment.endpoints())
    }
}

/// eBay REST client for one account
pub struct EbayClient {
    environment: Environment,
    auth: Arc<AuthManager>,
    http: Arc<EbayHttpClient>,
    browse: BrowseClient,
    inventory: InventoryClient,
    orders: OrdersClient,
    account: AccountClient,
}

impl EbayClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        if settings.client_id.trim().is_empty() || settings.client_secret.trim().is_empty() {
            return Err(ApiError::ConfigError(
                "client_id and client_secret are required".to_string(),
            ));
        }

        let endpoints = settings.resolved_endpoints();

        let auth = Arc::new(AuthManager::new(
            settings.client_id.clone(),
            settings.client_secret.clone(),
            endpoints.token_url.clone(),
        )?);

        let session = DelegatedSession {
            access_token: settings.user_access_token,
            refresh_token: settings.user_refresh_token,
            scopes: settings.user_token_scopes,
        };

        let http = Arc::new(
            EbayHttpClient::new(Arc::clone(&auth), endpoints)?
                .with_credentials(settings.client_id, settings.client_secret)
                .with_session(session),
        );

        tracing::debug!(
            environment = %settings.environment,
            base_url = %http.base_url(),
            "eBay client created"
        );

        Ok(Self {
            environment: settings.environment,
            browse: BrowseClient::new(Arc::clone(&http)),
            inventory: InventoryClient::new(Arc::clone(&http)),
            orders: OrdersClient::new(Arc::clone(&http)),
            account: AccountClient::new(Arc::clone(&http)),
            auth,
            http,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn browse(&self) -> &BrowseClient {
        &self.browse
    }

    pub fn inventory(&self) -> &InventoryClient {
        &self.inventory
    }

    pub fn orders(&self) -> &OrdersClient {
        &self.orders
    }

    pub fn account(&self) -> &AccountClient {
        &self.account
    }

    /// Executor shared by the resource clients
    pub fn http(&self) -> &Arc<EbayHttpClient> {
        &self.http
    }

    /// Application token manager
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Switch to (or away from) a seller token; see
    /// [`EbayHttpClient::set_delegated_token`]
    pub async fn set_user_access_token(
        &self,
        token: Option<String>,
        refresh_token: Option<String>,
        scopes: Option<Vec<String>>,
    ) {
        self.http
            .set_delegated_token(token, refresh_token, scopes)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_missing_credentials_rejected() {
        let err = EbayClient::new(ClientSettings::new("", "secret"))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_environment_selects_hosts() {
        let client = EbayClient::new(
            ClientSettings::new("id", "secret").environment(Environment::Production),
        )
        .unwrap();
        assert_eq!(client.environment(), Environment::Production);
        assert_eq!(client.http().base_url(), "https://api.ebay.com");

        let client = EbayClient::new(ClientSettings::new("id", "secret")).unwrap();
        assert_eq!(client.http().base_url(), "https://api.sandbox.ebay.com");
    }

    #[test]
    fn test_endpoint_override() {
        let settings = ClientSettings::new("id", "secret")
            .endpoints(Endpoints::with_host("http://127.0.0.1:4010"));
        let client = EbayClient::new(settings).unwrap();
        assert_eq!(client.http().base_url(), "http://127.0.0.1:4010");
    }

    #[tokio::test]
    async fn test_set_user_access_token_changes_headers() {
        let client = EbayClient::new(ClientSettings::new("id", "secret")).unwrap();

        client
            .set_user_access_token(
                Some("user-token".to_string()),
                Some("refresh".to_string()),
                None,
            )
            .await;

        let headers = client.http().headers().await.unwrap();
        assert_eq!(headers[AUTHORIZATION], "Bearer user-token");
        assert_eq!(
            client.http().session().await.refresh_token.as_deref(),
            Some("refresh")
        );
    }
}
