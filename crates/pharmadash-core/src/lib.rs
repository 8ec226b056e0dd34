//! # pharmadash-core: Pure Reporting Logic for PharmaDash
//!
//! Sales statistics and the sale status lifecycle for the pharmacy
//! dashboard, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PharmaDash Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Display layer (tables, stat cards, forms)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        pharmadash-db: DashboardService + repositories           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ &[SaleRecord], requested status        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pharmadash-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   stats   │  │  status   │  │ inventory │  │ validation│  │   │
//! │  │   │  Period   │  │  Sale     │  │ low stock │  │   rules   │  │   │
//! │  │   │  Stats    │  │  Status   │  │  counts   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (SaleRecord, LineItem, SaleStatus, ProductStock)
//! - [`money`] - Money type with integer arithmetic
//! - [`stats`] - Period statistics and status counts
//! - [`status`] - Sale status machine
//! - [`inventory`] - Low-stock summary
//! - [`validation`] - Write-side validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use pharmadash_core::{apply_transition, compute_stats, Money, SaleRecord, SaleStatus};
//!
//! let now = Utc::now();
//! let sales = vec![
//!     SaleRecord::new(Money::from_cents(1200), now),
//!     SaleRecord::new(Money::from_cents(800), now),
//! ];
//!
//! let stats = compute_stats(&sales, now);
//! assert_eq!(stats.today_revenue.cents(), 2000);
//! assert_eq!(stats.average_ticket.cents(), 1000);
//!
//! let next = apply_transition(SaleStatus::Pending, "delivered").unwrap();
//! assert_eq!(next, SaleStatus::Delivered);
//! ```

pub mod error;
pub mod inventory;
pub mod money;
pub mod stats;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::{count_low_stock, low_stock};
pub use money::Money;
pub use stats::{
    compute_stats, compute_status_counts, filter_by_status, PeriodBounds, PeriodStats,
    SalesAggregator, StatusCount,
};
pub use status::{apply_transition, SaleStatusMachine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest page the recent-sales query may request.
pub const MAX_RECENT_SALES: u32 = 10_000;
