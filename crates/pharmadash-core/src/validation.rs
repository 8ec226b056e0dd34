//! # Validation Module
//!
//! Input validation for sales written through the data layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form handler                                                 │
//! │  └── Presence checks, immediate feedback                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Quantities, prices, totals, ids, page sizes                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads are never validated: the aggregator tolerates whatever storage
//! hands back. Only writes go through here.

use crate::error::ValidationError;
use crate::types::{LineItem, SaleRecord};
use crate::{MAX_ITEM_QUANTITY, MAX_RECENT_SALES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - At least 1
/// - At most MAX_ITEM_QUANTITY (999)
///
/// ## Example
/// ```rust
/// use pharmadash_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents. Zero is allowed (free samples).
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Validates a sale total in cents.
pub fn validate_sale_total(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "total".to_string(),
        });
    }

    Ok(())
}

/// Validates a page size for recent-sales queries.
pub fn validate_limit(limit: u32) -> ValidationResult<()> {
    if limit == 0 || limit > MAX_RECENT_SALES {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_RECENT_SALES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use pharmadash_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates one line item.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price.cents())?;
    Ok(())
}

/// Validates a sale before it is inserted.
///
/// ## Rules
/// - Total present and not negative
/// - Every line item valid
/// - With line items, the total equals the sum of their subtotals
pub fn validate_sale(sale: &SaleRecord) -> ValidationResult<()> {
    let total = sale.total.ok_or_else(|| ValidationError::Required {
        field: "total".to_string(),
    })?;
    validate_sale_total(total.cents())?;

    for item in &sale.items {
        validate_line_item(item)?;
    }

    if !sale.items.is_empty() {
        let expected = sale.items_subtotal();
        if expected != total {
            return Err(ValidationError::Mismatch {
                field: "total".to_string(),
                expected: expected.cents(),
                actual: total.cents(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_prices_and_totals() {
        assert!(validate_unit_price(0).is_ok());
        assert!(validate_unit_price(-1).is_err());
        assert!(validate_sale_total(0).is_ok());
        assert!(validate_sale_total(-100).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(MAX_RECENT_SALES).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(MAX_RECENT_SALES + 1).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("123").is_err());
    }

    #[test]
    fn test_validate_line_item() {
        assert!(validate_line_item(&LineItem::new("p-1", 2, Money::from_cents(100))).is_ok());
        assert!(validate_line_item(&LineItem::new(" ", 2, Money::from_cents(100))).is_err());
        assert!(validate_line_item(&LineItem::new("p-1", 0, Money::from_cents(100))).is_err());
        assert!(validate_line_item(&LineItem::new("p-1", 1, Money::from_cents(-5))).is_err());
    }

    #[test]
    fn test_validate_sale() {
        let sale = SaleRecord::new(Money::from_cents(1150), Utc::now()).with_items(vec![
            LineItem::new("p-1", 2, Money::from_cents(400)),
            LineItem::new("p-2", 1, Money::from_cents(350)),
        ]);
        assert!(validate_sale(&sale).is_ok());

        let wrong_total = SaleRecord {
            total: Some(Money::from_cents(1000)),
            ..sale.clone()
        };
        assert_eq!(
            validate_sale(&wrong_total),
            Err(ValidationError::Mismatch {
                field: "total".to_string(),
                expected: 1150,
                actual: 1000,
            })
        );

        let no_total = SaleRecord {
            total: None,
            ..sale
        };
        assert!(validate_sale(&no_total).is_err());

        let without_items = SaleRecord::new(Money::from_cents(999), Utc::now());
        assert!(validate_sale(&without_items).is_ok());
    }
}
