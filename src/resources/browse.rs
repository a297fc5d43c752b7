use std::sync::Arc;

use super::{check_limit, id_segment, DEFAULT_PAGE_SIZE};
use crate::error::{ApiError, Result};
use crate::http_client::EbayHttpClient;
use crate::models::browse::{Item, SearchResponse};
use crate::models::Decoded;

const SEARCH_PATH: &str = "/buy/browse/v1/item_summary/search";
const ITEM_PATH: &str = "/buy/browse/v1/item";

/// Options for [`BrowseClient::search_items`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: u32,
    pub offset: u64,
    pub category_ids: Vec<String>,
    /// `filter`, `sort`, `aspect_filter` and other query parameters
    pub extra: Vec<(String, String)>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            category_ids: Vec::new(),
            extra: Vec::new(),
        }
    }
}

/// Browse API: item search and item details
pub struct BrowseClient {
    http: Arc<EbayHttpClient>,
}

impl BrowseClient {
    pub fn new(http: Arc<EbayHttpClient>) -> Self {
        Self { http }
    }

    pub async fn search_items(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Decoded<SearchResponse>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidArgument(
                "Search query cannot be empty".to_string(),
            ));
        }
        check_limit(options.limit)?;

        let mut params = vec![
            ("q".to_string(), query.to_string()),
            ("limit".to_string(), options.limit.to_string()),
            ("offset".to_string(), options.offset.to_string()),
        ];
        if !options.category_ids.is_empty() {
            params.push(("category_ids".to_string(), options.category_ids.join(",")));
        }
        params.extend(options.extra.iter().cloned());

        let value = self.http.get(SEARCH_PATH, Some(&params)).await?;
        Ok(Decoded::decode(value))
    }

    /// Item details; accepts legacy ids and RESTful ids such as `v1|123|0`
    pub async fn get_item(&self, item_id: &str) -> Result<Decoded<Item>> {
        let item_id = id_segment("Item ID", item_id)?;
        let value = self
            .http
            .get(&format!("{}/{}", ITEM_PATH, item_id), None)
            .await?;
        Ok(Decoded::decode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthManager, Endpoints};
    use crate::error::ErrorKind;
    use mockito::Matcher;

    fn browse_for(server: &mockito::ServerGuard) -> BrowseClient {
        let endpoints = Endpoints::with_host(&server.url());
        let auth = Arc::new(
            AuthManager::new_for_testing("app-token".to_string(), 3600, endpoints.token_url.clone())
                .unwrap(),
        );
        BrowseClient::new(Arc::new(EbayHttpClient::new(auth, endpoints).unwrap()))
    }

    #[tokio::test]
    async fn test_search_items_builds_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Regex(format!("^{}", SEARCH_PATH)))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "laptop".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("offset".into(), "0".into()),
                Matcher::UrlEncoded("category_ids".into(), "177,111422".into()),
                Matcher::UrlEncoded("sort".into(), "price".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"total": 1, "itemSummaries": [{"itemId": "v1|1|0", "title": "Laptop"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let options = SearchOptions {
            limit: 10,
            category_ids: vec!["177".to_string(), "111422".to_string()],
            extra: vec![("sort".to_string(), "price".to_string())],
            ..Default::default()
        };
        let result = browse_for(&server)
            .search_items("  laptop ", &options)
            .await
            .unwrap();

        let response = result.as_decoded().unwrap();
        assert_eq!(response.total, Some(1));
        assert_eq!(response.item_summaries[0].title, "Laptop");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_items_rejects_bad_arguments() {
        let server = mockito::Server::new_async().await;
        let browse = browse_for(&server);

        let err = browse
            .search_items("   ", &SearchOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let options = SearchOptions {
            limit: 201,
            ..Default::default()
        };
        let err = browse.search_items("laptop", &options).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_get_item_shape_mismatch_returns_raw() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/buy/browse/v1/item/v1%7C123%7C0")
            .with_status(200)
            .with_body(r#"{"itemId": "v1|123|0"}"#)
            .create_async()
            .await;

        let result = browse_for(&server).get_item(" v1|123|0 ").await.unwrap();
        assert!(!result.is_decoded());
        assert_eq!(result.raw().unwrap()["itemId"], "v1|123|0");
    }

    #[tokio::test]
    async fn test_get_item_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/buy/browse/v1/item/404")
            .with_status(404)
            .with_body(r#"{"errors": [{"errorId": 11001, "message": "The item ID is invalid."}]}"#)
            .create_async()
            .await;

        let err = browse_for(&server).get_item("404").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "The item ID is invalid.");
    }
}
