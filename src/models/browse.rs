use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_images: Option<Vec<Image>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_path: Option<String>,
}

/// One page of item search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default, alias = "items")]
    pub item_summaries: Vec<ItemSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_from_wire() {
        let response: SearchResponse = serde_json::from_value(json!({
            "href": "https://api.ebay.com/buy/browse/v1/item_summary/search?q=laptop&limit=2&offset=0",
            "total": 1234,
            "next": "https://api.ebay.com/buy/browse/v1/item_summary/search?q=laptop&limit=2&offset=2",
            "limit": 2,
            "offset": 0,
            "itemSummaries": [
                {
                    "itemId": "v1|123|0",
                    "title": "Laptop",
                    "price": {"value": "499.99", "currency": "USD"},
                    "image": {"imageUrl": "https://i.ebayimg.com/1.jpg"},
                    "condition": "New"
                },
                {"itemId": "v1|456|0", "title": "Another laptop"}
            ]
        }))
        .unwrap();

        assert_eq!(response.total, Some(1234));
        assert_eq!(response.item_summaries.len(), 2);
        assert_eq!(response.item_summaries[0].price.as_ref().unwrap().value, "499.99");
        assert!(response.item_summaries[1].price.is_none());
    }

    #[test]
    fn test_empty_search_has_no_items() {
        let response: SearchResponse = serde_json::from_value(json!({"total": 0})).unwrap();
        assert!(response.item_summaries.is_empty());
    }

    #[test]
    fn test_item_requires_id_and_title() {
        assert!(serde_json::from_value::<Item>(json!({"title": "no id"})).is_err());
    }
}
