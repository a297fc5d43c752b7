use std::sync::Arc;

use super::require_id;
use crate::error::Result;
use crate::http_client::EbayHttpClient;
use crate::models::account::{
    AccountProfile, PaymentPoliciesResponse, ReturnPoliciesResponse, ShippingPoliciesResponse,
};
use crate::models::Decoded;

const PRIVILEGE_PATH: &str = "/sell/account/v1/privilege";
const RETURN_POLICY_PATH: &str = "/sell/account/v1/return_policy";
const PAYMENT_POLICY_PATH: &str = "/sell/account/v1/payment_policy";
const SHIPPING_POLICY_PATH: &str = "/sell/account/v1/shipping_policy";

/// Account API: seller profile and business policies (user token required)
pub struct AccountClient {
    http: Arc<EbayHttpClient>,
}

impl AccountClient {
    pub fn new(http: Arc<EbayHttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_account_profile(&self) -> Result<Decoded<AccountProfile>> {
        let value = self.http.get(PRIVILEGE_PATH, None).await?;
        Ok(Decoded::decode(value))
    }

    /// Alias of [`get_account_profile`](Self::get_account_profile)
    pub async fn get_account_privileges(&self) -> Result<Decoded<AccountProfile>> {
        self.get_account_profile().await
    }

    pub async fn list_return_policies(
        &self,
        marketplace_id: &str,
    ) -> Result<Decoded<ReturnPoliciesResponse>> {
        self.list_policies(RETURN_POLICY_PATH, marketplace_id).await
    }

    pub async fn list_payment_policies(
        &self,
        marketplace_id: &str,
    ) -> Result<Decoded<PaymentPoliciesResponse>> {
        self.list_policies(PAYMENT_POLICY_PATH, marketplace_id).await
    }

    pub async fn list_shipping_policies(
        &self,
        marketplace_id: &str,
    ) -> Result<Decoded<ShippingPoliciesResponse>> {
        self.list_policies(SHIPPING_POLICY_PATH, marketplace_id).await
    }

    async fn list_policies<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        marketplace_id: &str,
    ) -> Result<Decoded<T>> {
        let marketplace_id = require_id("marketplace_id", marketplace_id)?;
        let params = vec![("marketplace_id".to_string(), marketplace_id.to_string())];
        let value = self.http.get(path, Some(&params)).await?;
        Ok(Decoded::decode(value))
    }
}
