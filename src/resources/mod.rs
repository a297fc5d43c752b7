// Resource clients for the individual eBay APIs
// Each validates its arguments, calls the executor and decodes the response

pub mod account;
pub mod browse;
pub mod inventory;
pub mod orders;

pub use account::AccountClient;
pub use browse::{BrowseClient, SearchOptions};
pub use inventory::InventoryClient;
pub use orders::OrdersClient;

use crate::error::{ApiError, Result};

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the list endpoints accept
pub const MAX_PAGE_SIZE: u32 = 200;

/// Offset/limit paging shared by the list endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u64,
    /// Additional query parameters passed through unchanged
    pub extra: Vec<(String, String)>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            extra: Vec::new(),
        }
    }
}

impl ListOptions {
    pub fn new(limit: u32, offset: u64) -> Self {
        Self {
            limit,
            offset,
            extra: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// `limit` and `offset` followed by the extra parameters
    pub(crate) fn to_query(&self) -> Result<Vec<(String, String)>> {
        check_limit(self.limit)?;
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        params.extend(self.extra.iter().cloned());
        Ok(params)
    }
}

pub(crate) fn check_limit(limit: u32) -> Result<()> {
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ApiError::InvalidArgument(format!(
            "limit must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, limit
        )));
    }
    Ok(())
}

/// Trimmed identifier, rejecting blank values
pub(crate) fn require_id<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArgument(format!("{} cannot be empty", name)));
    }
    Ok(trimmed)
}

/// Identifier as a single percent-encoded path segment
pub(crate) fn id_segment(name: &str, value: &str) -> Result<String> {
    Ok(urlencoding::encode(require_id(name, value)?).into_owned())
}
