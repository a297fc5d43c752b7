// Offset/limit pagination over list endpoints
//
// Pages are fetched lazily by a caller-supplied closure and flattened into a
// stream of items.

use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Url;
use serde_json::Value;
use std::future::Future;

use crate::error::{ApiError, Result};
use crate::resources::DEFAULT_PAGE_SIZE;

/// Base used to resolve relative `next` links
const LINK_BASE: &str = "http://localhost/";

/// Offset and page size for one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Field of the page holding the item array, e.g. `orders`
    pub items_key: String,
    /// Field holding the next-page link
    pub next_key: String,
    /// Query parameter of the next link carrying the offset
    pub offset_param: String,
    /// Field of the page (and query parameter) carrying the page size
    pub limit_param: String,
    pub page_size: u32,
    /// Stop after this many items
    pub max_items: Option<usize>,
    /// Stop after this many fetches
    pub max_pages: Option<usize>,
}

impl PaginateOptions {
    pub fn new(items_key: impl Into<String>) -> Self {
        Self {
            items_key: items_key.into(),
            next_key: "next".to_string(),
            offset_param: "offset".to_string(),
            limit_param: "limit".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_items: None,
            max_pages: None,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }
}

struct State<F> {
    fetch: F,
    options: PaginateOptions,
    offset: u64,
    pages: usize,
    yielded: usize,
    done: bool,
}

impl<F> State<F> {
    fn exhausted(&self) -> bool {
        self.done
            || self.options.max_pages.map_or(false, |max| self.pages >= max)
            || self.options.max_items.map_or(false, |max| self.yielded >= max)
    }
}

/// Stream every item across pages, in order.
///
/// The offset advances to the `offset` query parameter of the page's next
/// link, or else by the page's own `limit` field (falling back to the
/// requested page size). Iteration stops on an empty page, a page shorter
/// than its limit, or when `max_items`/`max_pages` is reached.
pub fn paginate<F, Fut>(fetch: F, options: PaginateOptions) -> impl Stream<Item = Result<Value>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let state = State {
        fetch,
        options,
        offset: 0,
        pages: 0,
        yielded: 0,
        done: false,
    };

    stream::try_unfold(state, |mut state| async move {
        if state.exhausted() {
            return Ok::<_, ApiError>(None);
        }

        let request = PageRequest {
            offset: state.offset,
            limit: state.options.page_size,
        };
        tracing::debug!(offset = request.offset, limit = request.limit, "Fetching page");

        let page = (state.fetch)(request).await?;
        state.pages += 1;

        let mut items = page
            .get(&state.options.items_key)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        if items.is_empty() {
            state.done = true;
            return Ok(Some((items, state)));
        }

        let effective_limit = page
            .get(&state.options.limit_param)
            .and_then(Value::as_u64)
            .filter(|limit| *limit > 0)
            .unwrap_or(u64::from(state.options.page_size));

        if (items.len() as u64) < effective_limit {
            state.done = true;
        }

        let next_offset = page
            .get(&state.options.next_key)
            .and_then(Value::as_str)
            .and_then(|link| offset_from_link(link, &state.options.offset_param));
        state.offset = match next_offset {
            Some(offset) if offset > state.offset => offset,
            _ => state.offset + effective_limit,
        };

        if let Some(max) = state.options.max_items {
            items.truncate(max.saturating_sub(state.yielded));
        }
        state.yielded += items.len();

        Ok(Some((items, state)))
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
    .try_flatten()
}

/// Collect every item of [`paginate`] into a vector
pub async fn collect_all<F, Fut>(fetch: F, options: PaginateOptions) -> Result<Vec<Value>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    paginate(fetch, options).try_collect().await
}

/// Offset query parameter of an absolute or relative link
fn offset_from_link(link: &str, offset_param: &str) -> Option<u64> {
    let base = Url::parse(LINK_BASE).ok()?;
    let url = base.join(link).ok()?;
    url.query_pairs()
        .find(|(name, _)| name == offset_param)
        .and_then(|(_, value)| value.parse().ok())
}
