//! Pagination engine for the user listing
//!
//! Raw query parameters are clamped before use:
//!
//! - `pageNumber` is at least 1
//! - `pageSize` is between 1 and [`MAX_PAGE_SIZE`], defaulting to [`DEFAULT_PAGE_SIZE`]
//!
//! The resulting [`PaginationMeta`] is sent back as a JSON document in the
//! [`PAGINATION_HEADER`] response header; the body only carries the page items.
//!
//! ```rust
//! use users_service::pagination::{ListQuery, PaginationMeta};
//!
//! let query = ListQuery::new().with_page_number(0).with_page_size(25);
//! assert_eq!(query.page_number(), 1);
//! assert_eq!(query.page_size(), 20);
//!
//! let meta = PaginationMeta::new(query.page_number(), query.page_size(), 45, "");
//! assert_eq!(meta.total_pages, 3);
//! assert!(meta.previous_page_link.is_none());
//! assert_eq!(meta.next_page_link, "/users?pageNumber=2&pageSize=20");
//! ```

use serde::{Deserialize, Serialize};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller can get
pub const MAX_PAGE_SIZE: u32 = 20;

/// Response header carrying the serialized [`PaginationMeta`]
pub const PAGINATION_HEADER: &str = "x-pagination";

/// Query parameters of `GET /users`
///
/// Values are kept signed so that zero or negative input is clamped rather
/// than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page_number(mut self, page_number: i64) -> Self {
        self.page_number = Some(page_number);
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Requested page (1-indexed), clamped to at least 1
    #[must_use]
    pub fn page_number(&self) -> u32 {
        let page = self.page_number.unwrap_or(1).max(1);
        u32::try_from(page).unwrap_or(u32::MAX)
    }

    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn page_size(&self) -> u32 {
        let size = self
            .page_size
            .unwrap_or(i64::from(DEFAULT_PAGE_SIZE))
            .clamp(1, i64::from(MAX_PAGE_SIZE));
        // Clamped above, always fits
        size as u32
    }
}

/// Metadata describing one page of the user listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Link to the previous page, `null` on the first page
    pub previous_page_link: Option<String>,
    /// Link to the next page, present even past the last page
    pub next_page_link: String,
    pub page_size: u32,
    pub current_page: u32,
    pub total_count: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// Build metadata for `page_number` of a collection with `total_count` items
    ///
    /// `base_path` is prepended to the generated links.
    #[must_use]
    pub fn new(page_number: u32, page_size: u32, total_count: u64, base_path: &str) -> Self {
        let page_size = page_size.max(1);
        let previous_page_link =
            (page_number > 1).then(|| page_link(base_path, page_number - 1, page_size));
        let next_page_link = page_link(base_path, page_number.saturating_add(1), page_size);

        Self {
            previous_page_link,
            next_page_link,
            page_size,
            current_page: page_number,
            total_count,
            total_pages: total_pages(total_count, page_size),
        }
    }
}

/// Link to a page of the user listing
#[must_use]
pub fn page_link(base_path: &str, page_number: u32, page_size: u32) -> String {
    format!(
        "{}/users?pageNumber={}&pageSize={}",
        base_path.trim_end_matches('/'),
        page_number,
        page_size
    )
}

/// Number of pages needed for `total_count` items, rounding up
#[must_use]
pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    total_count.div_ceil(u64::from(page_size.max(1)))
}

/// Offset of the first item of a page
#[must_use]
pub fn offset(page_number: u32, page_size: u32) -> u64 {
    u64::from(page_number.saturating_sub(1)) * u64::from(page_size)
}
