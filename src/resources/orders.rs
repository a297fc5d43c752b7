use std::sync::Arc;

use super::{id_segment, ListOptions};
use crate::error::Result;
use crate::http_client::EbayHttpClient;
use crate::models::orders::{Order, OrdersResponse};
use crate::models::Decoded;

const ORDER_PATH: &str = "/sell/fulfillment/v1/order";

/// Fulfillment API: seller orders (user token required)
pub struct OrdersClient {
    http: Arc<EbayHttpClient>,
}

impl OrdersClient {
    pub fn new(http: Arc<EbayHttpClient>) -> Self {
        Self { http }
    }

    /// `filter` uses eBay's filter syntax, e.g. `creationdate:[2024-01-01T00:00:00.000Z..]`
    pub async fn list_orders(
        &self,
        options: &ListOptions,
        filter: Option<&str>,
    ) -> Result<Decoded<OrdersResponse>> {
        let mut params = options.to_query()?;
        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            params.insert(2, ("filter".to_string(), filter.to_string()));
        }

        let value = self.http.get(ORDER_PATH, Some(&params)).await?;
        Ok(Decoded::decode(value))
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Decoded<Order>> {
        let order_id = id_segment("order_id", order_id)?;
        let value = self
            .http
            .get(&format!("{}/{}", ORDER_PATH, order_id), None)
            .await?;
        Ok(Decoded::decode(value))
    }
}
