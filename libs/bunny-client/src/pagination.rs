use std::future::Future;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::Result;

/// Page requested when none or an invalid one is given
pub const DEFAULT_PAGINATION_PAGE: i32 = 1;
/// Page size requested when none or an invalid one is given
pub const DEFAULT_PAGINATION_PER_PAGE: i32 = 1000;

/// Page selection of a list request
///
/// Pages start at 1. A page below 1 makes the API answer with a different
/// object shape, so values are coerced on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i32,
    per_page: i32,
}

impl Pagination {
    pub fn new(page: i32, per_page: i32) -> Self {
        Self {
            page: if page < 1 {
                DEFAULT_PAGINATION_PAGE
            } else {
                page
            },
            per_page: if per_page < 1 {
                DEFAULT_PAGINATION_PER_PAGE
            } else {
                per_page
            },
        }
    }

    pub fn page(&self) -> i32 {
        self.page
    }

    pub fn per_page(&self) -> i32 {
        self.per_page
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            per_page: self.per_page,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGINATION_PAGE, DEFAULT_PAGINATION_PER_PAGE)
    }
}

/// One page of a list response
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub current_page: Option<i32>,
    #[serde(default)]
    pub total_items: Option<i32>,
    #[serde(default)]
    pub has_more_items: bool,
}

/// Fetch every page, starting from the first, until `HasMoreItems` is false
pub async fn paginate<T, F, Fut>(per_page: i32, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Pagination) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut pagination = Pagination::new(DEFAULT_PAGINATION_PAGE, per_page);
    let mut items = Vec::new();

    loop {
        let page = fetch(pagination).await?;
        debug!(
            page = pagination.page(),
            per_page = pagination.per_page(),
            count = page.items.len(),
            total = ?page.total_items,
            has_more = page.has_more_items,
            "fetched page"
        );

        if !page.has_more_items {
            items.extend(page.items);
            return Ok(items);
        }
        if page.items.is_empty() {
            warn!(
                page = pagination.page(),
                "api reported more items after an empty page, stopping"
            );
            return Ok(items);
        }

        items.extend(page.items);
        pagination = pagination.next();
    }
}
