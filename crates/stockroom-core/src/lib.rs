//! # stockroom-core: Entities and Pure Rules for Stockroom
//!
//! This crate holds the inventory data model and every rule that can be
//! expressed without touching storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Service / controller layer (external)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-db                                 │   │
//! │  │    ItemRepository, StockTransactionRepository, ...              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockroom-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  paging   │  │   money   │  │ validation│  │   │
//! │  │   │   Item    │  │PageRequest│  │   Money   │  │   rules   │  │   │
//! │  │   │ Category  │  │   Page    │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (InventoryItem, Category, StockTransaction, ActivityLog, User)
//! - [`paging`] - Page requests, sort keys and page results
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks used by the stock service
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use stockroom_core::{Money, NewInventoryItem};
//!
//! let draft = NewInventoryItem::new("Widget Pro", 12, Money::from_cents(1999), 5);
//! let now = Utc::now();
//! let item = draft.into_item(1, now);
//!
//! assert_eq!(item.created_at, item.updated_at);
//! assert_eq!(item.stock_value().cents(), 12 * 1999);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod paging;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use paging::{
    ActivitySort, ItemSort, Page, PageRequest, Sort, SortDirection, SortKey, TransactionSort,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item name, in characters.
///
/// Enforced by a CHECK constraint on `inventory_items.item_name`.
pub const MAX_ITEM_NAME_LEN: usize = 150;

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length of a username, in characters.
pub const MAX_USERNAME_LEN: usize = 50;

/// Maximum length of an activity action string.
pub const MAX_ACTION_LEN: usize = 50;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page a single request may return.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Reorder threshold applied to new items unless the caller overrides it.
pub const DEFAULT_REORDER_LEVEL: i64 = 10;
