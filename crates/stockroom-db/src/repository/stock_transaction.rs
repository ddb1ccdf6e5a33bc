//! # Stock Transaction Repository
//!
//! Append-only history of quantity changes per item.
//!
//! ## Ordering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  find_all_by_item_newest_first(item)                                   │
//! │                                                                         │
//! │  created_at DESC, transaction_id DESC                                  │
//! │                                                                         │
//! │  t3  #12  remove  -4   ← newest                                        │
//! │  t2  #9   add     +10                                                  │
//! │  t2  #8   adjust  -1   ← same instant: higher id first                 │
//! │  t1  #3   add     +20                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are removed only when their item is deleted (`ON DELETE CASCADE`).

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::order_by;
use crate::error::DbResult;
use stockroom_core::{NewStockTransaction, Page, PageRequest, StockTransaction, TransactionSort};

const TRANSACTION_COLUMNS: &str = "transaction_id, item_id, transaction_type, quantity_change, \
                                   reason, performed_by, created_at";

/// Repository for stock transaction database operations.
#[derive(Debug, Clone)]
pub struct StockTransactionRepository {
    pool: SqlitePool,
}

impl StockTransactionRepository {
    /// Creates a new StockTransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StockTransactionRepository { pool }
    }

    /// Records a transaction stamped with the current time.
    ///
    /// This writes history only; the item's quantity is not touched. Use
    /// `InventoryService::adjust_stock` to do both atomically.
    pub async fn record(&self, new_tx: &NewStockTransaction) -> DbResult<StockTransaction> {
        self.record_at(new_tx, Utc::now()).await
    }

    /// Records a transaction with an explicit timestamp (imports, backfills).
    pub async fn record_at(
        &self,
        new_tx: &NewStockTransaction,
        at: DateTime<Utc>,
    ) -> DbResult<StockTransaction> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in_tx(&mut conn, new_tx, at).await
    }

    pub(crate) async fn insert_in_tx(
        conn: &mut SqliteConnection,
        new_tx: &NewStockTransaction,
        at: DateTime<Utc>,
    ) -> DbResult<StockTransaction> {
        debug!(
            item_id = new_tx.item_id,
            kind = %new_tx.transaction_type,
            change = new_tx.quantity_change,
            "Recording stock transaction"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO stock_transactions (
                item_id, transaction_type, quantity_change, reason, performed_by, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(new_tx.item_id)
        .bind(new_tx.transaction_type)
        .bind(new_tx.quantity_change)
        .bind(&new_tx.reason)
        .bind(new_tx.performed_by)
        .bind(at)
        .execute(&mut *conn)
        .await?;

        Ok(StockTransaction {
            transaction_id: result.last_insert_rowid(),
            item_id: new_tx.item_id,
            transaction_type: new_tx.transaction_type,
            quantity_change: new_tx.quantity_change,
            reason: new_tx.reason.clone(),
            performed_by: new_tx.performed_by,
            created_at: at,
        })
    }

    /// Transactions of one item, one page at a time.
    ///
    /// Unsorted requests come back in recording order. An unknown item
    /// yields an empty page.
    pub async fn find_page_by_item(
        &self,
        item_id: i64,
        request: PageRequest<TransactionSort>,
    ) -> DbResult<Page<StockTransaction>> {
        debug!(item_id, page = request.page(), "Finding transactions by item");

        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stock_transactions WHERE item_id = ?1")
                .bind(item_id)
                .fetch_one(&self.pool)
                .await?;

        let sql = format!(
            "SELECT {} FROM stock_transactions WHERE item_id = ?1 {} LIMIT ?2 OFFSET ?3",
            TRANSACTION_COLUMNS,
            order_by(&request, None, "transaction_id", "transaction_id ASC")
        );
        let rows = sqlx::query_as::<_, StockTransaction>(&sql)
            .bind(item_id)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(rows, &request, total))
    }

    /// Full history of one item, newest first.
    ///
    /// Equal timestamps are ordered by descending id, so the later insert
    /// comes first.
    pub async fn find_all_by_item_newest_first(
        &self,
        item_id: i64,
    ) -> DbResult<Vec<StockTransaction>> {
        let sql = format!(
            r#"
            SELECT {} FROM stock_transactions
            WHERE item_id = ?1
            ORDER BY created_at DESC, transaction_id DESC
            "#,
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, StockTransaction>(&sql)
            .bind(item_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Latest transactions across all items.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<StockTransaction>> {
        let sql = format!(
            r#"
            SELECT {} FROM stock_transactions
            ORDER BY created_at DESC, transaction_id DESC
            LIMIT ?1
            "#,
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query_as::<_, StockTransaction>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support::{at, test_db};
    use stockroom_core::{Money, NewInventoryItem, Sort, TransactionType};

    async fn item(db: &Database, name: &str) -> i64 {
        let cat = db
            .categories()
            .create(&format!("{name} bin"), None)
            .await
            .unwrap()
            .category_id;
        db.items()
            .create(&NewInventoryItem::new(name, 0, Money::from_cents(100), cat))
            .await
            .unwrap()
            .item_id
    }

    #[tokio::test]
    async fn test_newest_first_order() {
        let db = test_db().await;
        let repo = db.stock_transactions();
        let x = item(&db, "X").await;

        // Recorded out of time order on purpose
        let t2 = repo
            .record_at(&NewStockTransaction::for_change(x, 5), at(20))
            .await
            .unwrap();
        let t1 = repo
            .record_at(&NewStockTransaction::for_change(x, 10), at(10))
            .await
            .unwrap();
        let t3 = repo
            .record_at(&NewStockTransaction::for_change(x, -3), at(30))
            .await
            .unwrap();

        let ids: Vec<i64> = repo
            .find_all_by_item_newest_first(x)
            .await
            .unwrap()
            .iter()
            .map(|t| t.transaction_id)
            .collect();
        assert_eq!(ids, vec![t3.transaction_id, t2.transaction_id, t1.transaction_id]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_break_ties_by_id() {
        let db = test_db().await;
        let repo = db.stock_transactions();
        let x = item(&db, "X").await;

        let first = repo
            .record_at(&NewStockTransaction::for_change(x, 1), at(0))
            .await
            .unwrap();
        let second = repo
            .record_at(&NewStockTransaction::for_change(x, 2), at(0))
            .await
            .unwrap();

        let rows = repo.find_all_by_item_newest_first(x).await.unwrap();
        assert_eq!(rows[0].transaction_id, second.transaction_id);
        assert_eq!(rows[1].transaction_id, first.transaction_id);
    }

    #[tokio::test]
    async fn test_other_items_excluded() {
        let db = test_db().await;
        let repo = db.stock_transactions();
        let x = item(&db, "X").await;
        let y = item(&db, "Y").await;

        repo.record(&NewStockTransaction::for_change(x, 1)).await.unwrap();
        repo.record(&NewStockTransaction::for_change(y, 1)).await.unwrap();

        let rows = repo.find_all_by_item_newest_first(x).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|t| t.item_id == x));

        assert!(repo.find_all_by_item_newest_first(999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_page_by_item() {
        let db = test_db().await;
        let repo = db.stock_transactions();
        let x = item(&db, "X").await;

        for (change, offset) in [(4, 0), (-9, 1), (2, 2)] {
            repo.record_at(&NewStockTransaction::for_change(x, change), at(offset))
                .await
                .unwrap();
        }

        let request = PageRequest::new(0, 2).sorted(Sort::asc(TransactionSort::QuantityChange));
        let page = repo.find_page_by_item(x, request).await.unwrap();
        let changes: Vec<i64> = page.items.iter().map(|t| t.quantity_change).collect();
        assert_eq!(changes, vec![-9, 2]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.items[0].transaction_type, TransactionType::Remove);

        let empty = repo
            .find_page_by_item(999, PageRequest::first())
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_recent_spans_items() {
        let db = test_db().await;
        let repo = db.stock_transactions();
        let x = item(&db, "X").await;
        let y = item(&db, "Y").await;

        repo.record_at(&NewStockTransaction::for_change(x, 1), at(1))
            .await
            .unwrap();
        let latest = repo
            .record_at(
                &NewStockTransaction::for_change(y, 7).reason("Delivery"),
                at(2),
            )
            .await
            .unwrap();

        let recent = repo.recent(1).await.unwrap();
        assert_eq!(recent, vec![latest]);
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let db = test_db().await;
        let err = db
            .stock_transactions()
            .record(&NewStockTransaction::for_change(404, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::DbError::ForeignKeyViolation { .. }));
    }
}
