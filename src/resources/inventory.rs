use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::{id_segment, require_id, ListOptions};
use crate::error::{ApiError, Result};
use crate::http_client::EbayHttpClient;
use crate::models::inventory::{
    BulkInventoryItemRequest, BulkInventoryItemResponse, InventoryItem, InventoryItemsResponse,
};
use crate::models::Decoded;

const ITEM_PATH: &str = "/sell/inventory/v1/inventory_item";
const BULK_PATH: &str = "/sell/inventory/v1/bulk_create_or_replace_inventory_item";

/// Inventory API: seller inventory items (user token required)
pub struct InventoryClient {
    http: Arc<EbayHttpClient>,
}

impl InventoryClient {
    pub fn new(http: Arc<EbayHttpClient>) -> Self {
        Self { http }
    }

    pub async fn get_inventory_item(&self, sku: &str) -> Result<Decoded<InventoryItem>> {
        let value = self.http.get(&item_path(sku)?, None).await?;
        Ok(Decoded::decode(value))
    }

    pub async fn list_inventory_items(
        &self,
        options: &ListOptions,
    ) -> Result<Decoded<InventoryItemsResponse>> {
        let params = options.to_query()?;
        let value = self.http.get(ITEM_PATH, Some(&params)).await?;
        Ok(Decoded::decode(value))
    }

    /// Create or replace the item stored under `sku`.
    /// eBay answers 204 with no body, which comes back as `{}`.
    pub async fn create_inventory_item<T: Serialize>(
        &self,
        sku: &str,
        inventory_item: &T,
    ) -> Result<Value> {
        let path = item_path(sku)?;
        let payload = serde_json::to_value(inventory_item).map_err(|e| {
            ApiError::InvalidArgument(format!("inventory item is not serializable: {}", e))
        })?;
        if !payload.is_object() {
            return Err(ApiError::InvalidArgument(
                "inventory item must serialize to a JSON object".to_string(),
            ));
        }

        let value = self.http.put(&path, Some(&payload)).await?;
        Ok(if value.is_null() { Value::Object(Default::default()) } else { value })
    }

    /// Same as [`create_inventory_item`](Self::create_inventory_item); the endpoint replaces
    pub async fn update_inventory_item<T: Serialize>(
        &self,
        sku: &str,
        inventory_item: &T,
    ) -> Result<Value> {
        self.create_inventory_item(sku, inventory_item).await
    }

    pub async fn delete_inventory_item(&self, sku: &str) -> Result<Value> {
        self.http.delete(&item_path(sku)?, None).await
    }

    pub async fn bulk_create_or_replace_inventory_item(
        &self,
        request: &BulkInventoryItemRequest,
    ) -> Result<Decoded<BulkInventoryItemResponse>> {
        if request.requests.is_empty() {
            return Err(ApiError::InvalidArgument(
                "bulk request must contain at least one item".to_string(),
            ));
        }
        for entry in &request.requests {
            require_id("SKU", &entry.sku)?;
        }

        let payload = serde_json::to_value(request).map_err(|e| {
            ApiError::InvalidArgument(format!("bulk request is not serializable: {}", e))
        })?;
        let value = self.http.post(BULK_PATH, Some(&payload)).await?;
        Ok(Decoded::decode(value))
    }
}

fn item_path(sku: &str) -> Result<String> {
    Ok(format!("{}/{}", ITEM_PATH, id_segment("SKU", sku)?))
}
