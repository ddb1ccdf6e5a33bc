//! # Paging
//!
//! Page requests and page results shared by every repository.
//!
//! ## Page Arithmetic
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PageRequest { page: 2, size: 10 }                                      │
//! │                                                                         │
//! │  rows:   0 ........ 9 | 10 ...... 19 | 20 ...... 29 | 30 ..            │
//! │          page 0         page 1         page 2 ◄── OFFSET 20 LIMIT 10    │
//! │                                                                         │
//! │  Page { items, page: 2, size: 10, total_elements: 34, total_pages: 4 }  │
//! │                                                                         │
//! │  Asking for page 7 of the same data yields an empty `items` list,       │
//! │  never an error.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sorting
//! Sort keys are closed enums per entity. Each variant maps to a fixed
//! column name, so no caller text ever reaches an ORDER BY clause.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Sort
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A sortable column of one entity.
pub trait SortKey: Copy {
    /// Column name as it appears in the entity's table.
    fn column(&self) -> &'static str;
}

/// Column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort<S> {
    pub key: S,
    pub direction: SortDirection,
}

impl<S: SortKey> Sort<S> {
    pub fn asc(key: S) -> Self {
        Sort {
            key,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: S) -> Self {
        Sort {
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Renders `column DIR`, qualified with a table alias when given.
    pub fn to_sql(&self, alias: Option<&str>) -> String {
        match alias {
            Some(alias) => format!("{}.{} {}", alias, self.key.column(), self.direction.as_sql()),
            None => format!("{} {}", self.key.column(), self.direction.as_sql()),
        }
    }
}

/// Sortable columns of `inventory_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemSort {
    ItemId,
    ItemName,
    Quantity,
    Price,
    CreatedAt,
    UpdatedAt,
}

impl SortKey for ItemSort {
    fn column(&self) -> &'static str {
        match self {
            ItemSort::ItemId => "item_id",
            ItemSort::ItemName => "item_name",
            ItemSort::Quantity => "quantity",
            ItemSort::Price => "price_cents",
            ItemSort::CreatedAt => "created_at",
            ItemSort::UpdatedAt => "updated_at",
        }
    }
}

/// Sortable columns of `stock_transactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSort {
    TransactionId,
    QuantityChange,
    CreatedAt,
}

impl SortKey for TransactionSort {
    fn column(&self) -> &'static str {
        match self {
            TransactionSort::TransactionId => "transaction_id",
            TransactionSort::QuantityChange => "quantity_change",
            TransactionSort::CreatedAt => "created_at",
        }
    }
}

/// Sortable columns of `activity_logs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySort {
    LogId,
    Action,
    CreatedAt,
}

impl SortKey for ActivitySort {
    fn column(&self) -> &'static str {
        match self {
            ActivitySort::LogId => "log_id",
            ActivitySort::Action => "action",
            ActivitySort::CreatedAt => "created_at",
        }
    }
}

// =============================================================================
// Page Request
// =============================================================================

/// Which slice of a result set to return, and in what order.
///
/// `page` is zero-based. `size` is clamped to `1..=MAX_PAGE_SIZE`.
///
/// ## Example
/// ```rust
/// use stockroom_core::{ItemSort, PageRequest, Sort};
///
/// let request = PageRequest::new(1, 500).sorted(Sort::desc(ItemSort::Quantity));
/// assert_eq!(request.size(), 100);
/// assert_eq!(request.offset(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest<S> {
    page: u32,
    size: u32,
    sort: Option<Sort<S>>,
}

impl<S: SortKey> PageRequest<S> {
    /// Creates an unsorted request.
    pub fn new(page: u32, size: u32) -> Self {
        PageRequest {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    /// First page with the default size.
    pub fn first() -> Self {
        PageRequest::new(0, DEFAULT_PAGE_SIZE)
    }

    /// Sets the sort order.
    pub fn sorted(mut self, sort: Sort<S>) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> Option<&Sort<S>> {
        self.sort.as_ref()
    }

    /// Row offset of the first element of this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Row limit for this page.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// Request for the following page, same size and sort.
    pub fn next(&self) -> Self {
        PageRequest {
            page: self.page.saturating_add(1),
            ..*self
        }
    }
}

impl<S: SortKey> Default for PageRequest<S> {
    fn default() -> Self {
        PageRequest::first()
    }
}

// =============================================================================
// Page
// =============================================================================

/// A bounded, ordered slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page index that was requested.
    pub page: u32,
    /// Page size that was applied.
    pub size: u32,
    /// Rows matching the filter across all pages.
    pub total_elements: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    /// Builds a page from the rows fetched for `request` and the total match count.
    pub fn new<S: SortKey>(items: Vec<T>, request: &PageRequest<S>, total_elements: i64) -> Self {
        let size = i64::from(request.size());
        let total_elements = total_elements.max(0);
        Page {
            items,
            page: request.page(),
            size: request.size(),
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether another page follows this one.
    pub fn has_next(&self) -> bool {
        i64::from(self.page) + 1 < self.total_pages
    }

    /// Transforms the items, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(PageRequest::<ItemSort>::new(0, 0).size(), 1);
        assert_eq!(PageRequest::<ItemSort>::new(0, 1000).size(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::<ItemSort>::first().size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_offset_and_next() {
        let request = PageRequest::<TransactionSort>::new(3, 20);
        assert_eq!(request.offset(), 60);
        assert_eq!(request.limit(), 20);
        assert_eq!(request.next().offset(), 80);
    }

    #[test]
    fn test_sort_sql() {
        assert_eq!(Sort::desc(ItemSort::UpdatedAt).to_sql(None), "updated_at DESC");
        assert_eq!(Sort::asc(ItemSort::Price).to_sql(Some("i")), "i.price_cents ASC");
        assert_eq!(Sort::asc(ActivitySort::Action).to_sql(None), "action ASC");
    }

    #[test]
    fn test_page_totals() {
        let request = PageRequest::<ItemSort>::new(2, 10);
        let page = Page::new(vec![1, 2, 3, 4], &request, 24);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next());

        let page = Page::new(Vec::<i32>::new(), &request.next(), 24);
        assert!(page.is_empty());
        assert_eq!(page.page, 3);

        let empty = Page::new(Vec::<i32>::new(), &PageRequest::<ItemSort>::first(), 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_page_map_keeps_metadata() {
        let request = PageRequest::<ItemSort>::new(0, 2);
        let page = Page::new(vec![1, 2], &request, 5).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_elements, 5);
        assert!(page.has_next());
    }
}
