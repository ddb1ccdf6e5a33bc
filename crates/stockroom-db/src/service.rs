//! # Inventory Service
//!
//! Multi-row stock workflows, each committed as a single SQLite transaction.
//!
//! ## Atomic Stock Changes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust_stock(item, -3, "Sold", actor)                                 │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── UPDATE inventory_items SET quantity = quantity - 3 ... RETURNING │
//! │   │        └── no row? → NotFound, ROLLBACK                            │
//! │   ├── INSERT stock_transactions (remove, -3, "Sold")                   │
//! │   └── INSERT activity_logs (ADJUST_STOCK)                              │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failing statement drops the transaction: nothing is kept.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock may go negative; no floor is enforced here.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::activity_log::ActivityLogRepository;
use crate::repository::category::CategoryRepository;
use crate::repository::item::ItemRepository;
use crate::repository::stock_transaction::StockTransactionRepository;
use stockroom_core::{
    actions, entities, validation, Category, InventoryItem, NewActivityLog, NewInventoryItem,
    NewStockTransaction, StockTransaction, TransactionType,
};

/// Outcome of [`InventoryService::adjust_stock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Item after the change.
    pub item: InventoryItem,
    /// History row written for the change.
    pub transaction: StockTransaction,
}

/// Transactional inventory workflows.
///
/// `actor` is the acting user's id, recorded on history and audit rows.
/// `None` means a system action.
#[derive(Debug, Clone)]
pub struct InventoryService {
    pool: SqlitePool,
}

impl InventoryService {
    /// Creates a new InventoryService.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryService { pool }
    }

    /// Creates an item with its opening stock entry and audit record.
    ///
    /// A non-zero initial quantity is recorded as a stock transaction so the
    /// item's history sums to its quantity.
    pub async fn create_item(
        &self,
        new_item: &NewInventoryItem,
        actor: Option<i64>,
    ) -> DbResult<InventoryItem> {
        validation::validate_item_name(&new_item.item_name)?;
        validation::validate_reorder_level(new_item.reorder_level)?;
        validation::validate_price(new_item.price_cents)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let item = ItemRepository::insert_in_tx(&mut tx, new_item, now).await?;

        if item.quantity != 0 {
            let opening = NewStockTransaction::for_change(item.item_id, item.quantity)
                .reason("Initial stock")
                .performed_by(actor);
            StockTransactionRepository::insert_in_tx(&mut tx, &opening, now).await?;
        }

        let entry = NewActivityLog::new(actions::CREATE)
            .by(actor)
            .on(entities::INVENTORY_ITEM, item.item_id)
            .details(json!({
                "item_name": item.item_name,
                "quantity": item.quantity,
                "price_cents": item.price_cents,
                "category_id": item.category_id,
            }));
        ActivityLogRepository::insert_in_tx(&mut tx, &entry, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(item_id = item.item_id, name = %item.item_name, "Item created");
        Ok(item)
    }

    /// Changes an item's quantity by `delta` and records why.
    ///
    /// ## Returns
    /// * `Ok(StockAdjustment)` - Updated item and the recorded transaction
    /// * `Err(DbError::Validation)` - `delta` is zero
    /// * `Err(DbError::NotFound)` - Unknown item; nothing written
    pub async fn adjust_stock(
        &self,
        item_id: i64,
        delta: i64,
        reason: Option<&str>,
        actor: Option<i64>,
    ) -> DbResult<StockAdjustment> {
        validation::validate_quantity_change(delta)?;

        debug!(item_id, delta, "Adjusting stock");

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let item = ItemRepository::adjust_quantity_in_tx(&mut tx, item_id, delta, now).await?;

        let mut change = NewStockTransaction::for_change(item_id, delta).performed_by(actor);
        if let Some(reason) = reason {
            change = change.reason(reason);
        }
        let transaction = StockTransactionRepository::insert_in_tx(&mut tx, &change, now).await?;

        let entry = NewActivityLog::new(actions::ADJUST_STOCK)
            .by(actor)
            .on(entities::INVENTORY_ITEM, item_id)
            .details(json!({
                "quantity_change": delta,
                "quantity_after": item.quantity,
                "reason": reason,
            }));
        ActivityLogRepository::insert_in_tx(&mut tx, &entry, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(item_id, delta, quantity = item.quantity, "Stock adjusted");
        Ok(StockAdjustment { item, transaction })
    }

    /// Saves an edited item.
    ///
    /// A quantity edit is recorded as an `adjust` transaction carrying the
    /// difference.
    pub async fn update_item(
        &self,
        item: &InventoryItem,
        actor: Option<i64>,
    ) -> DbResult<InventoryItem> {
        validation::validate_item_name(&item.item_name)?;
        validation::validate_reorder_level(item.reorder_level)?;
        validation::validate_price(item.price_cents)?;

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let before = ItemRepository::get_in_tx(&mut tx, item.item_id)
            .await?
            .ok_or_else(|| DbError::not_found(entities::INVENTORY_ITEM, item.item_id))?;
        let mut edited = item.clone();
        edited.created_at = before.created_at;
        edited.updated_at = before.updated_at;
        edited.touch(now);
        let after = ItemRepository::update_in_tx(&mut tx, &edited, edited.updated_at).await?;

        let difference = after.quantity - before.quantity;
        if difference != 0 {
            let correction = NewStockTransaction::for_change(after.item_id, difference)
                .kind(TransactionType::Adjust)
                .reason("Item edited")
                .performed_by(actor);
            StockTransactionRepository::insert_in_tx(&mut tx, &correction, now).await?;
        }

        let entry = NewActivityLog::new(actions::UPDATE)
            .by(actor)
            .on(entities::INVENTORY_ITEM, after.item_id)
            .details(json!({
                "before": { "item_name": before.item_name, "quantity": before.quantity, "price_cents": before.price_cents },
                "after": { "item_name": after.item_name, "quantity": after.quantity, "price_cents": after.price_cents },
            }));
        ActivityLogRepository::insert_in_tx(&mut tx, &entry, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(item_id = after.item_id, "Item updated");
        Ok(after)
    }

    /// Deletes an item and its stock history, keeping an audit record.
    pub async fn delete_item(&self, item_id: i64, actor: Option<i64>) -> DbResult<()> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let item = ItemRepository::get_in_tx(&mut tx, item_id)
            .await?
            .ok_or_else(|| DbError::not_found(entities::INVENTORY_ITEM, item_id))?;
        ItemRepository::delete_in_tx(&mut tx, item_id).await?;

        let entry = NewActivityLog::new(actions::DELETE)
            .by(actor)
            .on(entities::INVENTORY_ITEM, item_id)
            .details(json!({ "item_name": item.item_name, "quantity": item.quantity }));
        ActivityLogRepository::insert_in_tx(&mut tx, &entry, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(item_id, "Item deleted");
        Ok(())
    }

    /// Creates a category and records who did it.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        actor: Option<i64>,
    ) -> DbResult<Category> {
        validation::validate_category_name(name)?;
        let name = name.trim();

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let category = CategoryRepository::insert_in_tx(&mut tx, name, description, now).await?;

        let entry = NewActivityLog::new(actions::CREATE)
            .by(actor)
            .on(entities::CATEGORY, category.category_id)
            .details(json!({ "category_name": category.category_name }));
        ActivityLogRepository::insert_in_tx(&mut tx, &entry, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(category_id = category.category_id, name = %name, "Category created");
        Ok(category)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
