//! # stockroom-db: Database Layer for Stockroom
//!
//! Data access for the Stockroom inventory system.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Data Flow                              │
//! │                                                                         │
//! │  Service / controller layer (not part of this workspace)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   stockroom-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo      │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ StockTxRepo   │    │ 001_initial_ │  │   │
//! │  │   │ DbConfig      │    │ ActivityRepo  │    │   schema.sql │  │   │
//! │  │   └───────────────┘    │ ReportRepo    │    └──────────────┘  │   │
//! │  │          ▲             └───────────────┘                      │   │
//! │  │          │                                                     │   │
//! │  │   ┌───────────────────────────────┐                           │   │
//! │  │   │ InventoryService (service.rs) │  one SQL transaction      │   │
//! │  │   │ create / adjust / update / …  │  per workflow             │   │
//! │  │   └───────────────────────────────┘                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   $STOCKROOM_DB_PATH (default ./stockroom.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (items, transactions, etc.)
//! - [`service`] - Transactional stock workflows
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stockroom_db::{Database, DbConfig};
//! use stockroom_core::PageRequest;
//!
//! let db = Database::new(DbConfig::from_env()?).await?;
//!
//! let page = db.items().search_by_name("widget", PageRequest::first()).await?;
//! db.inventory().adjust_stock(item_id, -3, Some("Sold"), Some(user_id)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{ConfigError, Database, DbConfig};
pub use service::{InventoryService, StockAdjustment};

// Repository re-exports for convenience
pub use repository::activity_log::ActivityLogRepository;
pub use repository::category::CategoryRepository;
pub use repository::item::{ItemFilter, ItemRepository};
pub use repository::report::ReportRepository;
pub use repository::stock_transaction::StockTransactionRepository;
pub use repository::user::UserRepository;
