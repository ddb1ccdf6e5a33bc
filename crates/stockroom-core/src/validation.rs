//! # Validation Module
//!
//! Input checks run by the stock service before it opens a transaction.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: InventoryService (Rust)                                      │
//! │  └── THIS MODULE: reject obviously bad input early                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK constraints (item_name length, price, enum values)          │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Repositories go straight to layer 2; the schema is the authority.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_ACTION_LEN, MAX_CATEGORY_NAME_LEN, MAX_ITEM_NAME_LEN, MAX_USERNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn required_with_max(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an item name: non-blank, at most 150 characters.
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Widget Pro").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// assert!(validate_item_name(&"x".repeat(151)).is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    required_with_max("item_name", name, MAX_ITEM_NAME_LEN)
}

/// Validates a category name: non-blank, at most 100 characters.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    required_with_max("category_name", name, MAX_CATEGORY_NAME_LEN)
}

/// Validates a username: non-blank, at most 50 characters.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    required_with_max("username", username, MAX_USERNAME_LEN)
}

/// Validates an activity action string.
pub fn validate_action(action: &str) -> ValidationResult<()> {
    required_with_max("action", action, MAX_ACTION_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock adjustment.
///
/// A zero change would record a transaction that moves nothing. The sign is
/// not checked: stock may legitimately go below zero.
pub fn validate_quantity_change(delta: i64) -> ValidationResult<()> {
    if delta == 0 {
        return Err(ValidationError::MustBeNonZero {
            field: "quantity_change".to_string(),
        });
    }

    Ok(())
}

/// Validates a reorder level (non-negative).
pub fn validate_reorder_level(level: i64) -> ValidationResult<()> {
    if level < 0 {
        return Err(ValidationError::OutOfRange {
            field: "reorder_level".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a unit price in cents (non-negative; free items are allowed).
///
/// ## Example
/// ```rust
/// use stockroom_core::validation::validate_price;
///
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-1).is_err());
/// ```
pub fn validate_price(price_cents: i64) -> ValidationResult<()> {
    if price_cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price_cents".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Widget Pro").is_ok());
        assert!(validate_item_name(&"a".repeat(150)).is_ok());

        assert_eq!(
            validate_item_name(""),
            Err(ValidationError::Required {
                field: "item_name".to_string()
            })
        );
        assert_eq!(
            validate_item_name(&"a".repeat(151)),
            Err(ValidationError::TooLong {
                field: "item_name".to_string(),
                max: 150
            })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 150 two-byte characters is still 150 characters.
        assert!(validate_item_name(&"é".repeat(150)).is_ok());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Fasteners").is_ok());
        assert!(validate_category_name(" ").is_err());
        assert!(validate_category_name(&"c".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_username_and_action() {
        assert!(validate_username("jdoe").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_action("ADJUST_STOCK").is_ok());
        assert!(validate_action(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_quantity_change() {
        assert!(validate_quantity_change(5).is_ok());
        assert!(validate_quantity_change(-5).is_ok());
        assert!(validate_quantity_change(0).is_err());
    }

    #[test]
    fn test_validate_reorder_level() {
        assert!(validate_reorder_level(0).is_ok());
        assert!(validate_reorder_level(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(1999).is_ok());
        assert_eq!(
            validate_price(-1),
            Err(ValidationError::OutOfRange {
                field: "price_cents".to_string(),
                min: 0,
                max: i64::MAX
            })
        );
    }
}
