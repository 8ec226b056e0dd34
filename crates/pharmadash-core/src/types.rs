//! # Domain Types
//!
//! Core domain types shared by the reporting logic and the data layer.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SaleRecord    │   │    LineItem     │   │  ProductStock   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │──►│  product_id     │   │  id (UUID)      │       │
//! │  │  created_at     │   │  quantity       │   │  name           │       │
//! │  │  total          │   │  unit_price     │   │  stock          │       │
//! │  │  status literal │   └─────────────────┘   │  min_stock      │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │   SaleStatus    │  pending → confirmed → delivered                  │
//! │  │  ─────────────  │        ╲       │                                  │
//! │  │  Pending        │         ╲      ▼                                  │
//! │  │  Confirmed      │          ► cancelled                              │
//! │  │  Delivered      │  (any state may be reassigned, see status.rs)     │
//! │  │  Cancelled      │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshots
//! Records are read-only snapshots owned by the persistence layer. The
//! reporting logic takes them by reference and never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    /// Sale registered, awaiting confirmation.
    Pending,
    /// Sale confirmed by the pharmacy.
    Confirmed,
    /// Order handed over to the client.
    Delivered,
    /// Sale cancelled.
    Cancelled,
}

impl SaleStatus {
    /// Every status, in workflow order.
    pub const ALL: [SaleStatus; 4] = [
        SaleStatus::Pending,
        SaleStatus::Confirmed,
        SaleStatus::Delivered,
        SaleStatus::Cancelled,
    ];

    /// The literal stored in the database and posted by status forms.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Confirmed => "confirmed",
            SaleStatus::Delivered => "delivered",
            SaleStatus::Cancelled => "cancelled",
        }
    }

    /// Whether normal workflows stop here.
    ///
    /// Display hint only; [`crate::status::apply_transition`] still allows
    /// moving out of a terminal state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, SaleStatus::Delivered | SaleStatus::Cancelled)
    }
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Pending
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses an exact status literal. Padding and case variants such as
/// `" pending"` or `"Pending"` are rejected like any other unknown value.
impl FromStr for SaleStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "confirmed" => Ok(SaleStatus::Confirmed),
            "delivered" => Ok(SaleStatus::Delivered),
            "cancelled" => Ok(SaleStatus::Cancelled),
            _ => Err(CoreError::InvalidStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A product/quantity/price entry within a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product this line refers to.
    pub product_id: String,
    /// Units sold (≥ 1).
    pub quantity: i64,
    /// Price per unit at time of sale (≥ 0).
    pub unit_price: Money,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        LineItem {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Line subtotal (unit_price × quantity).
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One sale transaction as loaded by the data layer.
///
/// ## Why are fields optional?
/// The dashboard reads rows it doesn't own. A row with a NULL total or
/// timestamp still shows up in the table and in `total_count`; it simply
/// contributes nothing to the revenue sums or period counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the sale was registered.
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    /// Total amount charged.
    pub total: Option<Money>,

    /// Status literal exactly as stored.
    pub status: String,

    /// Client shown in the sales table.
    pub client_name: Option<String>,

    /// Line items, empty when not loaded.
    pub items: Vec<LineItem>,
}

impl SaleRecord {
    /// Creates a new pending sale with a fresh ID.
    pub fn new(total: Money, created_at: DateTime<Utc>) -> Self {
        SaleRecord {
            id: Uuid::new_v4().to_string(),
            created_at: Some(created_at),
            total: Some(total),
            status: SaleStatus::Pending.as_str().to_string(),
            client_name: None,
            items: Vec::new(),
        }
    }

    /// Sets the status literal.
    pub fn with_status(mut self, status: SaleStatus) -> Self {
        self.status = status.as_str().to_string();
        self
    }

    /// Sets the client name.
    pub fn with_client(mut self, client_name: impl Into<String>) -> Self {
        self.client_name = Some(client_name.into());
        self
    }

    /// Replaces the line items.
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = items;
        self
    }

    /// Parsed status, `None` when the stored literal is unknown.
    pub fn parsed_status(&self) -> Option<SaleStatus> {
        self.status.parse().ok()
    }

    /// Amount this record contributes to revenue sums.
    ///
    /// Absent or negative totals contribute zero.
    #[inline]
    pub fn revenue(&self) -> Money {
        self.total
            .map(Money::or_zero_if_negative)
            .unwrap_or_default()
    }

    /// Sum of line subtotals.
    pub fn items_subtotal(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

// =============================================================================
// Product Stock
// =============================================================================

/// Stock snapshot of a product, as shown on the products screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductStock {
    pub id: String,
    pub name: String,
    pub price: Money,
    /// Units on hand.
    pub stock: i64,
    /// Per-product reorder point; the configured default applies when absent.
    pub min_stock: Option<i64>,
}

impl ProductStock {
    /// Whether stock is at or below the reorder point.
    pub fn is_low(&self, default_threshold: i64) -> bool {
        self.stock <= self.min_stock.unwrap_or(default_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_status_default() {
        assert_eq!(SaleStatus::default(), SaleStatus::Pending);
    }

    #[test]
    fn test_sale_status_parse() {
        assert_eq!("confirmed".parse::<SaleStatus>(), Ok(SaleStatus::Confirmed));
        assert_eq!(
            " delivered ".parse::<SaleStatus>(),
            Err(CoreError::InvalidStatus(" delivered ".to_string()))
        );
        assert_eq!(
            "cancelled\n".parse::<SaleStatus>(),
            Err(CoreError::InvalidStatus("cancelled\n".to_string()))
        );
        assert_eq!(
            "Pending".parse::<SaleStatus>(),
            Err(CoreError::InvalidStatus("Pending".to_string()))
        );
        assert!("".parse::<SaleStatus>().is_err());
    }

    #[test]
    fn test_sale_status_literals_round_trip() {
        for status in SaleStatus::ALL {
            assert_eq!(status.as_str().parse::<SaleStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
    }

    #[test]
    fn test_sale_status_serde_uses_literals() {
        let json = serde_json::to_string(&SaleStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SaleStatus::Pending.is_terminal());
        assert!(!SaleStatus::Confirmed.is_terminal());
        assert!(SaleStatus::Delivered.is_terminal());
        assert!(SaleStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_line_item_subtotal() {
        let item = LineItem::new("p-1", 3, Money::from_cents(299));
        assert_eq!(item.subtotal().cents(), 897);
    }

    #[test]
    fn test_sale_record_revenue_ignores_bad_totals() {
        let now = Utc::now();
        let sale = SaleRecord::new(Money::from_cents(1500), now);
        assert_eq!(sale.revenue().cents(), 1500);

        let negative = SaleRecord {
            total: Some(Money::from_cents(-100)),
            ..sale.clone()
        };
        assert!(negative.revenue().is_zero());

        let missing = SaleRecord {
            total: None,
            ..sale
        };
        assert!(missing.revenue().is_zero());
    }

    #[test]
    fn test_sale_record_items_subtotal() {
        let sale = SaleRecord::new(Money::from_cents(1150), Utc::now()).with_items(vec![
            LineItem::new("p-1", 2, Money::from_cents(400)),
            LineItem::new("p-2", 1, Money::from_cents(350)),
        ]);
        assert_eq!(sale.items_subtotal().cents(), 1150);
        assert_eq!(sale.parsed_status(), Some(SaleStatus::Pending));
    }

    #[test]
    fn test_product_low_stock() {
        let product = ProductStock {
            id: "p-1".to_string(),
            name: "Paracetamol 500mg".to_string(),
            price: Money::from_cents(350),
            stock: 4,
            min_stock: None,
        };
        assert!(product.is_low(5));
        assert!(!product.is_low(3));

        let with_min = ProductStock {
            min_stock: Some(10),
            ..product
        };
        assert!(with_min.is_low(3));
    }
}
