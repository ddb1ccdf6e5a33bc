//! # Report Repository
//!
//! Read-only aggregates for the dashboard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  dashboard()                                                           │
//! │  ├── totals      Σ quantity × price_cents, COUNT(*), low-stock count   │
//! │  ├── categories  LEFT JOIN so empty categories report 0 / $0.00        │
//! │  └── recent      last 10 stock transactions with item names            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use stockroom_core::{CategoryStock, InventoryItem, InventorySummary, RecentTransaction};

/// Number of transactions shown on the dashboard.
pub const DASHBOARD_RECENT_TRANSACTIONS: i64 = 10;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Builds the inventory summary.
    ///
    /// An item is low on stock when `quantity <= reorder_level`.
    pub async fn dashboard(&self) -> DbResult<InventorySummary> {
        let (total_value_cents, total_items, low_stock_items): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(quantity * price_cents), 0),
                COUNT(*),
                COALESCE(SUM(CASE WHEN quantity <= reorder_level THEN 1 ELSE 0 END), 0)
            FROM inventory_items
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let categories = sqlx::query_as::<_, CategoryStock>(
            r#"
            SELECT
                c.category_id,
                c.category_name,
                COUNT(i.item_id) AS item_count,
                COALESCE(SUM(i.quantity * i.price_cents), 0) AS value_cents
            FROM categories c
            LEFT JOIN inventory_items i ON i.category_id = c.category_id
            GROUP BY c.category_id, c.category_name
            ORDER BY c.category_name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_transactions = sqlx::query_as::<_, RecentTransaction>(
            r#"
            SELECT
                t.transaction_id,
                t.item_id,
                i.item_name,
                t.transaction_type,
                t.quantity_change,
                t.created_at
            FROM stock_transactions t
            INNER JOIN inventory_items i ON i.item_id = t.item_id
            ORDER BY t.created_at DESC, t.transaction_id DESC
            LIMIT ?1
            "#,
        )
        .bind(DASHBOARD_RECENT_TRANSACTIONS)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            total_items,
            low_stock_items,
            categories = categories.len(),
            "Dashboard summary built"
        );

        Ok(InventorySummary {
            total_value_cents,
            total_items,
            low_stock_items,
            categories,
            recent_transactions,
        })
    }

    /// Items at or below their reorder level, lowest quantity first.
    pub async fn low_stock_items(&self, limit: u32) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT
                item_id, item_name, description, quantity, price_cents,
                reorder_level, category_id, created_at, updated_at
            FROM inventory_items
            WHERE quantity <= reorder_level
            ORDER BY quantity ASC, item_id ASC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
