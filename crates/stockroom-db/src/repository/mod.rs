//! # Repository Module
//!
//! Database repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Explicit Query Functions                             │
//! │                                                                         │
//! │  Caller (service / controller)                                         │
//! │       │                                                                 │
//! │       │  db.items().find_page_by_category(5, PageRequest::first())     │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── create(&self, &NewInventoryItem)   → stamps both timestamps       │
//! │  ├── update(&self, &InventoryItem)      → stamps updated_at only       │
//! │  ├── find_page_by_category(&self, id, request)                         │
//! │  └── search_by_name(&self, text, request)                              │
//! │       │                                                                 │
//! │       │  WHERE filter + ORDER BY (whitelisted) + LIMIT/OFFSET          │
//! │       │  SELECT COUNT(*) with the same filter                          │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Every filter, order and page bound is a visible parameter of the      │
//! │  function. Nothing is derived from method names.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Categories
//! - [`UserRepository`](user::UserRepository) - Users
//! - [`ItemRepository`](item::ItemRepository) - Inventory items, search, paging
//! - [`StockTransactionRepository`](stock_transaction::StockTransactionRepository) - Stock history
//! - [`ActivityLogRepository`](activity_log::ActivityLogRepository) - Audit trail
//! - [`ReportRepository`](report::ReportRepository) - Dashboard aggregates
//!
//! ## Missing Rows
//! Finders return `Option`, `Vec` or an empty `Page` when nothing matches.
//! Paging past the last row is an empty page, not an error.

pub mod activity_log;
pub mod category;
pub mod item;
pub mod report;
pub mod stock_transaction;
pub mod user;

use stockroom_core::{PageRequest, SortKey};

/// Builds the `ORDER BY` clause for a paged query.
///
/// Unsorted requests use `fallback`. Sorted requests get `pk ASC` appended so
/// rows with equal sort values keep a stable position across pages.
pub(crate) fn order_by<S: SortKey>(
    request: &PageRequest<S>,
    alias: Option<&str>,
    pk: &str,
    fallback: &str,
) -> String {
    match request.sort() {
        Some(sort) if sort.key.column() == pk => format!("ORDER BY {}", sort.to_sql(alias)),
        Some(sort) => match alias {
            Some(alias) => format!("ORDER BY {}, {}.{} ASC", sort.to_sql(Some(alias)), alias, pk),
            None => format!("ORDER BY {}, {} ASC", sort.to_sql(None), pk),
        },
        None => format!("ORDER BY {}", fallback),
    }
}

/// Escapes `\`, `%` and `_` so user text matches literally inside
/// `LIKE ... ESCAPE '\'`.
pub(crate) fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// =============================================================================
// Test Support
// =============================================================================
