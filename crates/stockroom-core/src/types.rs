//! # Domain Types
//!
//! Entities persisted by Stockroom, plus the transient "new" shapes callers
//! hand to the repositories.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐  1    n ┌─────────────────┐  1    n ┌────────────┐│
//! │  │    Category     │────────►│  InventoryItem  │────────►│   Stock    ││
//! │  │  ─────────────  │         │  ─────────────  │         │Transaction ││
//! │  │  category_id    │         │  item_id        │         │  ───────── ││
//! │  │  category_name  │         │  item_name      │         │  item_id   ││
//! │  └─────────────────┘         │  quantity       │         │  change    ││
//! │                              │  price_cents    │         │  created_at││
//! │                              │  category_id FK │         └────────────┘│
//! │  ┌─────────────────┐  1    n │  created_at     │                       │
//! │  │      User       │───┐     │  updated_at     │                       │
//! │  └─────────────────┘   │     └─────────────────┘                       │
//! │                        │     ┌─────────────────┐                       │
//! │                        └────►│   ActivityLog   │                       │
//! │                              └─────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries a store-generated integer key. A value of one of the
//! `New*` types has no key yet; the repository returns the persisted entity.
//!
//! ## References
//! Relationships are plain foreign-key ids. Related rows are never loaded
//! implicitly; use `ItemRepository::get_with_category` when the category
//! name is needed alongside an item.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;
use crate::DEFAULT_REORDER_LEVEL;

// =============================================================================
// Category
// =============================================================================

/// A grouping for inventory items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Staff,
    Viewer,
}

impl UserRole {
    /// The stored text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
            UserRole::Viewer => "viewer",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Staff
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            "viewer" => Ok(UserRole::Viewer),
            _ => Err(CoreError::UnknownVariant {
                kind: "user role",
                value: s.to_string(),
            }),
        }
    }
}

/// A person who performs stock operations. Activity logs point here.
///
/// Credentials are not stored in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A stocked product.
///
/// ## Timestamps
/// `created_at` is assigned once, when the row is first written, and is
/// never written again. `updated_at` is reassigned on every later write
/// through [`InventoryItem::touch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryItem {
    /// Store-generated identity.
    pub item_id: i64,

    /// Display name, at most 150 characters.
    pub item_name: String,

    /// Optional free text.
    pub description: Option<String>,

    /// Units on hand. No sign rule is imposed here.
    pub quantity: i64,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Quantity at or below which the item counts as low stock.
    pub reorder_level: i64,

    /// Owning category (foreign key, not loaded).
    pub category_id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Value of the stock on hand (quantity × unit price).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }

    /// Whether the item is at or below its reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Stamps `updated_at` for a write happening at `now`.
    ///
    /// `created_at` is untouched. A clock reading older than the current
    /// `updated_at` leaves it unchanged, so the value never moves backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Caller-supplied fields for an item that has not been persisted yet.
///
/// ## Example
/// ```rust
/// use stockroom_core::{Money, NewInventoryItem};
///
/// let draft = NewInventoryItem::new("Bolt M6", 500, Money::from_cents(12), 3)
///     .description("Zinc plated")
///     .reorder_level(100);
/// assert_eq!(draft.reorder_level, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub reorder_level: i64,
    pub category_id: i64,
}

impl NewInventoryItem {
    /// Creates a draft with the required fields and the default reorder level.
    pub fn new(item_name: impl Into<String>, quantity: i64, price: Money, category_id: i64) -> Self {
        NewInventoryItem {
            item_name: item_name.into(),
            description: None,
            quantity,
            price_cents: price.cents(),
            reorder_level: DEFAULT_REORDER_LEVEL,
            category_id,
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the reorder level.
    pub fn reorder_level(mut self, level: i64) -> Self {
        self.reorder_level = level;
        self
    }

    /// Turns the draft into a persisted item.
    ///
    /// Both timestamps receive the same instant, so a freshly created item
    /// always has `created_at == updated_at`.
    pub fn into_item(self, item_id: i64, now: DateTime<Utc>) -> InventoryItem {
        InventoryItem {
            item_id,
            item_name: self.item_name,
            description: self.description,
            quantity: self.quantity,
            price_cents: self.price_cents,
            reorder_level: self.reorder_level,
            category_id: self.category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// An item joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ItemWithCategory {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub item: InventoryItem,
    pub category_name: String,
}

// =============================================================================
// Stock Transaction
// =============================================================================

/// Kind of quantity change recorded against an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Stock received.
    Add,
    /// Stock issued or written off.
    Remove,
    /// Correction made while editing the item record.
    Adjust,
}

impl TransactionType {
    /// Picks `Add` or `Remove` from the sign of a quantity change.
    pub const fn for_change(delta: i64) -> Self {
        if delta >= 0 {
            TransactionType::Add
        } else {
            TransactionType::Remove
        }
    }

    /// The stored text form.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Add => "add",
            TransactionType::Remove => "remove",
            TransactionType::Adjust => "adjust",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(TransactionType::Add),
            "remove" => Ok(TransactionType::Remove),
            "adjust" => Ok(TransactionType::Adjust),
            _ => Err(CoreError::UnknownVariant {
                kind: "transaction type",
                value: s.to_string(),
            }),
        }
    }
}

/// A recorded quantity change against an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockTransaction {
    pub transaction_id: i64,
    pub item_id: i64,
    pub transaction_type: TransactionType,
    /// Signed change applied to the item's quantity.
    pub quantity_change: i64,
    pub reason: Option<String>,
    /// User who performed the change, if known.
    pub performed_by: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Fields for a stock transaction that has not been recorded yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewStockTransaction {
    pub item_id: i64,
    pub transaction_type: TransactionType,
    pub quantity_change: i64,
    pub reason: Option<String>,
    pub performed_by: Option<i64>,
}

impl NewStockTransaction {
    /// A transaction whose type follows the sign of `quantity_change`.
    pub fn for_change(item_id: i64, quantity_change: i64) -> Self {
        NewStockTransaction {
            item_id,
            transaction_type: TransactionType::for_change(quantity_change),
            quantity_change,
            reason: None,
            performed_by: None,
        }
    }

    /// Overrides the transaction type.
    pub fn kind(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = transaction_type;
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn performed_by(mut self, user_id: Option<i64>) -> Self {
        self.performed_by = user_id;
        self
    }
}

// =============================================================================
// Activity Log
// =============================================================================

/// Well-known action strings written to the activity log.
pub mod actions {
    pub const CREATE: &str = "CREATE";
    pub const UPDATE: &str = "UPDATE";
    pub const DELETE: &str = "DELETE";
    pub const ADJUST_STOCK: &str = "ADJUST_STOCK";
    pub const LOGIN: &str = "LOGIN";
    pub const LOGOUT: &str = "LOGOUT";
}

/// Well-known entity type strings written to the activity log.
pub mod entities {
    pub const INVENTORY_ITEM: &str = "InventoryItem";
    pub const CATEGORY: &str = "Category";
    pub const USER: &str = "User";
}

/// An audit record tied to a user and an action string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ActivityLog {
    pub log_id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    /// JSON document describing the change.
    pub details: Option<String>,
    pub ip_address: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    /// Parses the `details` column. Unparseable text yields `None`.
    pub fn details_json(&self) -> Option<serde_json::Value> {
        self.details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// Fields for an activity log entry that has not been recorded yet.
///
/// ## Example
/// ```rust
/// use stockroom_core::{actions, entities, NewActivityLog};
///
/// let entry = NewActivityLog::new(actions::DELETE)
///     .by(Some(7))
///     .on(entities::INVENTORY_ITEM, 42)
///     .details(serde_json::json!({ "item_name": "Widget" }));
/// assert_eq!(entry.entity_id, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewActivityLog {
    pub user_id: Option<i64>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
}

impl NewActivityLog {
    pub fn new(action: impl Into<String>) -> Self {
        NewActivityLog {
            user_id: None,
            action: action.into(),
            entity_type: None,
            entity_id: None,
            details: None,
            ip_address: None,
        }
    }

    pub fn by(mut self, user_id: Option<i64>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn on(mut self, entity_type: impl Into<String>, entity_id: i64) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details.to_string());
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Item count and stock value for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CategoryStock {
    pub category_id: i64,
    pub category_name: String,
    pub item_count: i64,
    pub value_cents: i64,
}

/// A stock transaction with the name of the item it touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RecentTransaction {
    pub transaction_id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub transaction_type: TransactionType,
    pub quantity_change: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Inventory overview: valuation, low stock and recent movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InventorySummary {
    pub total_value_cents: i64,
    pub total_items: i64,
    pub low_stock_items: i64,
    pub categories: Vec<CategoryStock>,
    pub recent_transactions: Vec<RecentTransaction>,
}

impl InventorySummary {
    /// Total value as Money.
    pub fn total_value(&self) -> Money {
        Money::from_cents(self.total_value_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn draft() -> NewInventoryItem {
        NewInventoryItem::new("Widget Pro", 12, Money::from_cents(1999), 5)
    }

    #[test]
    fn test_into_item_stamps_both_timestamps() {
        let now = Utc::now();
        let item = draft().into_item(1, now);

        assert_eq!(item.item_id, 1);
        assert_eq!(item.created_at, now);
        assert_eq!(item.created_at, item.updated_at);
        assert_eq!(item.reorder_level, DEFAULT_REORDER_LEVEL);
    }

    #[test]
    fn test_touch_moves_only_updated_at() {
        let created = Utc::now();
        let mut item = draft().into_item(1, created);

        let later = created + Duration::seconds(5);
        item.touch(later);
        assert_eq!(item.created_at, created);
        assert_eq!(item.updated_at, later);

        // Clock went backwards: nothing changes.
        item.touch(created - Duration::seconds(30));
        assert_eq!(item.updated_at, later);
    }

    #[test]
    fn test_stock_value_and_low_stock() {
        let mut item = draft().reorder_level(12).into_item(1, Utc::now());
        assert_eq!(item.stock_value().cents(), 12 * 1999);
        assert!(item.is_low_stock());

        item.quantity = 13;
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_transaction_type_for_change() {
        assert_eq!(TransactionType::for_change(5), TransactionType::Add);
        assert_eq!(TransactionType::for_change(-1), TransactionType::Remove);
        assert_eq!("ADJUST".parse::<TransactionType>().unwrap(), TransactionType::Adjust);
        assert!("teleport".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_user_role_round_trips_through_text() {
        for role in [UserRole::Admin, UserRole::Staff, UserRole::Viewer] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("owner".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::Staff);
    }

    #[test]
    fn test_activity_log_details_json() {
        let entry = NewActivityLog::new(actions::UPDATE)
            .on(entities::INVENTORY_ITEM, 3)
            .details(serde_json::json!({ "quantity": 4 }));

        let log = ActivityLog {
            log_id: 1,
            user_id: None,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            details: entry.details,
            ip_address: None,
            created_at: Utc::now(),
        };

        let details = log.details_json().unwrap();
        assert_eq!(details["quantity"], 4);
    }
}
