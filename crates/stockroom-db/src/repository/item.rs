//! # Inventory Item Repository
//!
//! Database operations for inventory items.
//!
//! ## Key Operations
//! - Create / update with system-managed timestamps
//! - Paged lookup by category
//! - Case-insensitive name search
//! - Filtered listing for the item browser
//!
//! ## Timestamps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Item Lifecycle                                       │
//! │                                                                         │
//! │  NewInventoryItem (transient)                                          │
//! │       │                                                                 │
//! │       │  create()  → created_at = updated_at = now                     │
//! │       ▼                                                                 │
//! │  InventoryItem (persisted, item_id assigned)                           │
//! │       │                                                                 │
//! │       │  update()  → updated_at = now                                  │
//! │       │              created_at is not part of the UPDATE statement    │
//! │       ▼                                                                 │
//! │  InventoryItem (persisted)                                             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  write:  item_name   "Ölfilter Ärmel"  ──►  item_name_folded            │
//! │          description                 ──►  description_folded            │
//! │                                                                         │
//! │  read:   "ÄRMEL"  ──►  "ärmel"  ──►  item_name_folded LIKE '%ärmel%'    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Case is folded in Rust (`str::to_lowercase`) on both sides, since
//! SQLite's `LOWER()` only folds ASCII. `%` and `_` typed by the user are
//! escaped and match literally.
//!
//! `search_by_name` matches the name only; the [`ItemFilter`] used by the
//! item browser also matches the description.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{escape_like, order_by};
use crate::error::{DbError, DbResult};
use stockroom_core::{
    entities, InventoryItem, ItemSort, ItemWithCategory, NewInventoryItem, Page, PageRequest,
};

const ITEM_COLUMNS: &str = "item_id, item_name, description, quantity, price_cents, \
                            reorder_level, category_id, created_at, updated_at";

// =============================================================================
// Filter
// =============================================================================

/// Optional filters for [`ItemRepository::list`].
///
/// `search` matches the item name or the description, ignoring case.
///
/// ## Example
/// ```rust,ignore
/// let filter = ItemFilter::default().search("bolt").category(3);
/// let page = db.items().list(&filter, PageRequest::first()).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Case-insensitive substring of the item name or description.
    pub search: Option<String>,
    pub category_id: Option<i64>,
}

impl ItemFilter {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        // Blank search box means no filter
        self.search = if text.trim().is_empty() {
            None
        } else {
            Some(text.trim().to_string())
        };
        self
    }

    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>, scope: SearchScope) {
        builder.push(" WHERE 1 = 1");
        if let Some(text) = &self.search {
            let pattern = escape_like(&fold_case(text));
            builder
                .push(" AND (item_name_folded LIKE '%' || ")
                .push_bind(pattern.clone())
                .push(" || '%' ESCAPE '\\'");
            if scope == SearchScope::NameOrDescription {
                builder
                    .push(" OR description_folded LIKE '%' || ")
                    .push_bind(pattern)
                    .push(" || '%' ESCAPE '\\'");
            }
            builder.push(")");
        }
        if let Some(category_id) = self.category_id {
            builder.push(" AND category_id = ").push_bind(category_id);
        }
    }
}

/// Which columns a search text is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchScope {
    Name,
    NameOrDescription,
}

/// Unicode lowercase used for the `*_folded` columns and search patterns.
fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let item = repo.create(&NewInventoryItem::new("Widget Pro", 12, Money::from_cents(1999), 5)).await?;
/// let hits = repo.search_by_name("widget", PageRequest::first()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Persists a new item.
    ///
    /// Assigns the identity and stamps `created_at` and `updated_at` with the
    /// same instant.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Persisted item
    /// * `Err(DbError::ConstraintViolation)` - Name blank or over 150 chars; nothing written
    /// * `Err(DbError::ForeignKeyViolation)` - Category does not exist
    pub async fn create(&self, new_item: &NewInventoryItem) -> DbResult<InventoryItem> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_in_tx(&mut conn, new_item, Utc::now()).await
    }

    pub(crate) async fn insert_in_tx(
        conn: &mut SqliteConnection,
        new_item: &NewInventoryItem,
        now: DateTime<Utc>,
    ) -> DbResult<InventoryItem> {
        debug!(
            name = %new_item.item_name,
            category_id = new_item.category_id,
            "Inserting item"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO inventory_items (
                item_name, description, quantity, price_cents,
                reorder_level, category_id, created_at, updated_at,
                item_name_folded, description_folded
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9)
            "#,
        )
        .bind(&new_item.item_name)
        .bind(&new_item.description)
        .bind(new_item.quantity)
        .bind(new_item.price_cents)
        .bind(new_item.reorder_level)
        .bind(new_item.category_id)
        .bind(now)
        .bind(fold_case(&new_item.item_name))
        .bind(new_item.description.as_deref().map(fold_case))
        .execute(&mut *conn)
        .await?;

        Ok(new_item.clone().into_item(result.last_insert_rowid(), now))
    }

    /// Saves changes to a persisted item.
    ///
    /// `updated_at` is advanced to now (never backwards); `created_at` keeps
    /// its stored value whatever the caller passes.
    ///
    /// ## Returns
    /// * `Ok(InventoryItem)` - Item as stored
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn update(&self, item: &InventoryItem) -> DbResult<InventoryItem> {
        let mut conn = self.pool.acquire().await?;
        Self::update_in_tx(&mut conn, item, Utc::now()).await
    }

    pub(crate) async fn update_in_tx(
        conn: &mut SqliteConnection,
        item: &InventoryItem,
        now: DateTime<Utc>,
    ) -> DbResult<InventoryItem> {
        debug!(item_id = item.item_id, "Updating item");

        let sql = format!(
            r#"
            UPDATE inventory_items SET
                item_name = ?2,
                description = ?3,
                quantity = ?4,
                price_cents = ?5,
                reorder_level = ?6,
                category_id = ?7,
                updated_at = MAX(updated_at, ?8),
                item_name_folded = ?9,
                description_folded = ?10
            WHERE item_id = ?1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let updated = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(item.item_id)
            .bind(&item.item_name)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.price_cents)
            .bind(item.reorder_level)
            .bind(item.category_id)
            .bind(now)
            .bind(fold_case(&item.item_name))
            .bind(item.description.as_deref().map(fold_case))
            .fetch_optional(&mut *conn)
            .await?;

        updated.ok_or_else(|| DbError::not_found(entities::INVENTORY_ITEM, item.item_id))
    }

    /// Adds `delta` to the stored quantity and stamps `updated_at`.
    ///
    /// Applied as `quantity = quantity + delta` so the read and the write are
    /// one statement.
    pub(crate) async fn adjust_quantity_in_tx(
        conn: &mut SqliteConnection,
        item_id: i64,
        delta: i64,
        now: DateTime<Utc>,
    ) -> DbResult<InventoryItem> {
        debug!(item_id, delta, "Adjusting item quantity");

        let sql = format!(
            r#"
            UPDATE inventory_items SET
                quantity = quantity + ?2,
                updated_at = MAX(updated_at, ?3)
            WHERE item_id = ?1
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let updated = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(item_id)
            .bind(delta)
            .bind(now)
            .fetch_optional(&mut *conn)
            .await?;

        updated.ok_or_else(|| DbError::not_found(entities::INVENTORY_ITEM, item_id))
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(InventoryItem))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, item_id: i64) -> DbResult<Option<InventoryItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in_tx(&mut conn, item_id).await
    }

    pub(crate) async fn get_in_tx(
        conn: &mut SqliteConnection,
        item_id: i64,
    ) -> DbResult<Option<InventoryItem>> {
        let sql = format!("SELECT {} FROM inventory_items WHERE item_id = ?1", ITEM_COLUMNS);
        let item = sqlx::query_as::<_, InventoryItem>(&sql)
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(item)
    }

    /// Gets an item together with its category name in one query.
    pub async fn get_with_category(&self, item_id: i64) -> DbResult<Option<ItemWithCategory>> {
        let item = sqlx::query_as::<_, ItemWithCategory>(
            r#"
            SELECT
                i.item_id, i.item_name, i.description, i.quantity, i.price_cents,
                i.reorder_level, i.category_id, i.created_at, i.updated_at,
                c.category_name
            FROM inventory_items i
            INNER JOIN categories c ON c.category_id = i.category_id
            WHERE i.item_id = ?1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Items of one category, one page at a time.
    ///
    /// An unknown category yields an empty page.
    pub async fn find_page_by_category(
        &self,
        category_id: i64,
        request: PageRequest<ItemSort>,
    ) -> DbResult<Page<InventoryItem>> {
        debug!(category_id, page = request.page(), "Finding items by category");

        let filter = ItemFilter::default().category(category_id);
        self.fetch_page(&filter, SearchScope::Name, &request, "item_id ASC")
            .await
    }

    /// Items whose name contains `text`, ignoring case.
    ///
    /// "widget", "WIDGET" and "Pro" all find "Widget Pro". Folding is
    /// Unicode-aware, so "ärmel" finds "Ölfilter Ärmel".
    pub async fn search_by_name(
        &self,
        text: &str,
        request: PageRequest<ItemSort>,
    ) -> DbResult<Page<InventoryItem>> {
        debug!(query = %text, page = request.page(), "Searching items by name");

        let filter = ItemFilter {
            search: Some(text.to_string()),
            category_id: None,
        };
        self.fetch_page(&filter, SearchScope::Name, &request, "item_id ASC")
            .await
    }

    /// Filtered listing. Unsorted requests show the most recently changed
    /// items first.
    pub async fn list(
        &self,
        filter: &ItemFilter,
        request: PageRequest<ItemSort>,
    ) -> DbResult<Page<InventoryItem>> {
        debug!(?filter, page = request.page(), "Listing items");

        self.fetch_page(
            filter,
            SearchScope::NameOrDescription,
            &request,
            "updated_at DESC, item_id DESC",
        )
        .await
    }

    async fn fetch_page(
        &self,
        filter: &ItemFilter,
        scope: SearchScope,
        request: &PageRequest<ItemSort>,
        fallback_order: &str,
    ) -> DbResult<Page<InventoryItem>> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM inventory_items");
        filter.push_where(&mut count_query, scope);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM inventory_items",
            ITEM_COLUMNS
        ));
        filter.push_where(&mut query, scope);
        query
            .push(" ")
            .push(order_by(request, None, "item_id", fallback_order))
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());

        let items = query
            .build_query_as::<InventoryItem>()
            .fetch_all(&self.pool)
            .await?;

        debug!(count = items.len(), total, "Item page fetched");
        Ok(Page::new(items, request, total))
    }

    /// Deletes an item. Its stock transactions go with it.
    ///
    /// ## Returns
    /// * `Ok(())` - Item deleted
    /// * `Err(DbError::NotFound)` - No item with this id
    pub async fn delete(&self, item_id: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_in_tx(&mut conn, item_id).await
    }

    pub(crate) async fn delete_in_tx(conn: &mut SqliteConnection, item_id: i64) -> DbResult<()> {
        debug!(item_id, "Deleting item");

        let result = sqlx::query("DELETE FROM inventory_items WHERE item_id = ?1")
            .bind(item_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(entities::INVENTORY_ITEM, item_id));
        }

        Ok(())
    }

    /// Counts all items.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::test_support::test_db;
    use stockroom_core::{Money, Sort};

    async fn category(db: &Database, name: &str) -> i64 {
        db.categories().create(name, None).await.unwrap().category_id
    }

    fn draft(name: &str, quantity: i64, category_id: i64) -> NewInventoryItem {
        NewInventoryItem::new(name, quantity, Money::from_cents(250), category_id)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_equal_timestamps() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;

        let item = db.items().create(&draft("Hex Bolt", 40, cat)).await.unwrap();

        assert!(item.item_id > 0);
        assert_eq!(item.created_at, item.updated_at);

        let stored = db.items().get_by_id(item.item_id).await.unwrap().unwrap();
        assert_eq!(stored, item);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at_and_advances_updated_at() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;
        let repo = db.items();

        let original = repo.create(&draft("Hex Bolt", 40, cat)).await.unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        let mut edited = original.clone();
        edited.item_name = "Hex Bolt M8".to_string();
        edited.quantity = 35;
        // Caller cannot move created_at
        edited.created_at = original.created_at - chrono::Duration::days(30);

        let saved = repo.update(&edited).await.unwrap();

        assert_eq!(saved.created_at, original.created_at);
        assert!(saved.updated_at > original.updated_at);
        assert_eq!(saved.item_name, "Hex Bolt M8");
        assert_eq!(saved.quantity, 35);

        let stored = repo.get_by_id(original.item_id).await.unwrap().unwrap();
        assert_eq!(stored, saved);
    }

    #[tokio::test]
    async fn test_update_unknown_item_is_not_found() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;

        let ghost = draft("Ghost", 1, cat).into_item(999, Utc::now());
        let err = db.items().update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_find_page_by_category_filters() {
        let db = test_db().await;
        let five = category(&db, "Five").await;
        let seven = category(&db, "Seven").await;
        let repo = db.items();

        let first = repo.create(&draft("Anchor", 1, five)).await.unwrap();
        repo.create(&draft("Bracket", 1, seven)).await.unwrap();

        let page = repo
            .find_page_by_category(five, PageRequest::first())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        let ids: Vec<i64> = page.items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![first.item_id]);
    }

    #[tokio::test]
    async fn test_unknown_category_returns_empty_page() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;
        db.items().create(&draft("Hex Bolt", 1, cat)).await.unwrap();

        let page = db
            .items()
            .find_page_by_category(12345, PageRequest::first())
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_elements, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let db = test_db().await;
        let cat = category(&db, "Gadgets").await;
        let repo = db.items();

        let widget = repo.create(&draft("Widget Pro", 3, cat)).await.unwrap();
        repo.create(&draft("Gizmo", 3, cat)).await.unwrap();

        for query in ["widget", "WIDGET", "Pro"] {
            let page = repo.search_by_name(query, PageRequest::first()).await.unwrap();
            let ids: Vec<i64> = page.items.iter().map(|i| i.item_id).collect();
            assert_eq!(ids, vec![widget.item_id], "query {query:?}");
        }
    }

    #[tokio::test]
    async fn test_search_wildcards_match_literally() {
        let db = test_db().await;
        let cat = category(&db, "Sale").await;
        let repo = db.items();

        let promo = repo.create(&draft("Paint 50% off", 1, cat)).await.unwrap();
        repo.create(&draft("Paint 500ml", 1, cat)).await.unwrap();

        let page = repo.search_by_name("50%", PageRequest::first()).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![promo.item_id]);
    }

    #[tokio::test]
    async fn test_search_folds_non_ascii_case() {
        let db = test_db().await;
        let cat = category(&db, "Filter").await;
        let repo = db.items();

        let filter = repo.create(&draft("Ölfilter Ärmel", 2, cat)).await.unwrap();
        repo.create(&draft("Luftfilter", 2, cat)).await.unwrap();

        for query in ["ölfilter", "ärmel", "ÖLFILTER", "Ölfilter", "FILTER Ä"] {
            let page = repo.search_by_name(query, PageRequest::first()).await.unwrap();
            let ids: Vec<i64> = page.items.iter().map(|i| i.item_id).collect();
            assert_eq!(ids, vec![filter.item_id], "query {query:?}");
        }
    }

    #[tokio::test]
    async fn test_search_follows_renamed_item() {
        let db = test_db().await;
        let cat = category(&db, "Filter").await;
        let repo = db.items();

        let mut item = repo.create(&draft("Luftfilter", 2, cat)).await.unwrap();
        item.item_name = "Ölfilter".to_string();
        repo.update(&item).await.unwrap();

        let old = repo.search_by_name("luft", PageRequest::first()).await.unwrap();
        assert!(old.is_empty());
        let new = repo.search_by_name("ÖL", PageRequest::first()).await.unwrap();
        assert_eq!(new.total_elements, 1);
    }

    #[tokio::test]
    async fn test_name_search_ignores_description() {
        let db = test_db().await;
        let cat = category(&db, "Fixings").await;
        let repo = db.items();

        let bolt = repo
            .create(&draft("Hex Bolt", 5, cat).description("Zinc plated, M8"))
            .await
            .unwrap();

        let by_name = repo.search_by_name("zinc", PageRequest::first()).await.unwrap();
        assert!(by_name.is_empty());

        let listed = repo
            .list(&ItemFilter::default().search("ZINC"), PageRequest::first())
            .await
            .unwrap();
        let ids: Vec<i64> = listed.items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![bolt.item_id]);
    }

    #[tokio::test]
    async fn test_negative_price_rejected_without_write() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;
        let repo = db.items();

        let priced = NewInventoryItem::new("Refund", 1, Money::from_cents(-1), cat);
        let err = repo.create(&priced).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }), "{err:?}");
        assert_eq!(repo.count().await.unwrap(), 0);

        let mut item = repo.create(&draft("Hex Bolt", 1, cat)).await.unwrap();
        item.price_cents = -500;
        let err = repo.update(&item).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation { .. }), "{err:?}");

        let stored = repo.get_by_id(item.item_id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 250);
    }

    #[tokio::test]
    async fn test_name_over_150_chars_rejected_without_write() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;
        let repo = db.items();

        let long_name = "x".repeat(151);
        let err = repo.create(&draft(&long_name, 1, cat)).await.unwrap_err();

        assert!(matches!(err, DbError::ConstraintViolation { .. }), "{err:?}");
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_name_of_exactly_150_chars_accepted() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;

        let item = db
            .items()
            .create(&draft(&"x".repeat(150), 1, cat))
            .await
            .unwrap();
        assert_eq!(item.item_name.chars().count(), 150);
    }

    #[tokio::test]
    async fn test_unknown_category_rejected_on_create() {
        let db = test_db().await;
        let err = db.items().create(&draft("Orphan", 1, 77)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_paging_and_sorting() {
        let db = test_db().await;
        let cat = category(&db, "Bulk").await;
        let repo = db.items();

        for (name, qty) in [("A", 30), ("B", 10), ("C", 20), ("D", 10), ("E", 50)] {
            repo.create(&draft(name, qty, cat)).await.unwrap();
        }

        let request = PageRequest::new(0, 2).sorted(Sort::asc(ItemSort::Quantity));
        let first = repo.find_page_by_category(cat, request).await.unwrap();
        let names: Vec<&str> = first.items.iter().map(|i| i.item_name.as_str()).collect();
        // Equal quantities fall back to insertion order
        assert_eq!(names, vec!["B", "D"]);
        assert_eq!(first.total_elements, 5);
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());

        let last = repo
            .find_page_by_category(cat, request.next().next())
            .await
            .unwrap();
        assert_eq!(last.len(), 1);
        assert_eq!(last.items[0].item_name, "E");
        assert!(!last.has_next());
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty() {
        let db = test_db().await;
        let cat = category(&db, "Bulk").await;
        db.items().create(&draft("Only", 1, cat)).await.unwrap();

        let page = db
            .items()
            .find_page_by_category(cat, PageRequest::new(5, 10))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.page, 5);
    }

    #[tokio::test]
    async fn test_list_combines_filters_newest_first() {
        let db = test_db().await;
        let tools = category(&db, "Tools").await;
        let paint = category(&db, "Paint").await;
        let repo = db.items();

        let hammer = repo.create(&draft("Claw Hammer", 2, tools)).await.unwrap();
        let mallet = repo.create(&draft("Rubber Hammer", 2, tools)).await.unwrap();
        repo.create(&draft("Hammer Finish Paint", 2, paint)).await.unwrap();
        repo.create(&draft("Screwdriver", 2, tools)).await.unwrap();

        // Touch the older hammer so it becomes the most recently updated
        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.update(&hammer).await.unwrap();

        let filter = ItemFilter::default().search("hammer").category(tools);
        let page = repo.list(&filter, PageRequest::first()).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|i| i.item_id).collect();
        assert_eq!(ids, vec![hammer.item_id, mallet.item_id]);
    }

    #[tokio::test]
    async fn test_get_with_category() {
        let db = test_db().await;
        let cat = category(&db, "Electrical").await;
        let item = db.items().create(&draft("Fuse 5A", 9, cat)).await.unwrap();

        let joined = db
            .items()
            .get_with_category(item.item_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(joined.item, item);
        assert_eq!(joined.category_name, "Electrical");

        assert!(db.items().get_with_category(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let cat = category(&db, "Hardware").await;
        let repo = db.items();
        let item = repo.create(&draft("Washer", 100, cat)).await.unwrap();

        repo.delete(item.item_id).await.unwrap();
        assert!(repo.get_by_id(item.item_id).await.unwrap().is_none());

        let err = repo.delete(item.item_id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
