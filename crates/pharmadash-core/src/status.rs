//! # Sale Status Machine
//!
//! Validates and applies status changes requested from the sales screen.
//!
//! ## Transition Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  from \ to   │ pending │ confirmed │ delivered │ cancelled              │
//! │  ────────────┼─────────┼───────────┼───────────┼──────────              │
//! │  pending     │   ✓     │    ✓      │    ✓      │    ✓                   │
//! │  confirmed   │   ✓     │    ✓      │    ✓      │    ✓                   │
//! │  delivered   │   ✓     │    ✓      │    ✓      │    ✓                   │
//! │  cancelled   │   ✓     │    ✓      │    ✓      │    ✓                   │
//! │                                                                         │
//! │  Status is reassigned from a plain selector, so every move is allowed, │
//! │  self-transitions included. Only unknown literals are rejected.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Flow
//! ```text
//! Form posts "confirmed"
//!      │
//!      ▼
//! apply_transition(current, "confirmed") ← THIS MODULE
//!      │
//!      ├── Ok(Confirmed) ──► persist_status(sale_id, Confirmed)
//!      │
//!      └── Err(InvalidStatus) ──► nothing is written
//! ```
//!
//! No side effects happen here: stock adjustments or notifications on a
//! status change belong to the caller.

use crate::error::CoreResult;
use crate::types::SaleStatus;

/// The sale status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleStatusMachine;

impl SaleStatusMachine {
    /// Status every new sale starts in.
    pub const INITIAL: SaleStatus = SaleStatus::Pending;

    pub const fn new() -> Self {
        SaleStatusMachine
    }

    /// Whether `from → to` is in the transition table.
    pub const fn allows(&self, _from: SaleStatus, _to: SaleStatus) -> bool {
        true
    }

    /// Statuses offered in the selector for a sale currently in `from`.
    pub fn targets(&self, from: SaleStatus) -> Vec<SaleStatus> {
        SaleStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }

    /// Validates `requested` and returns the status to persist.
    pub fn apply(&self, current: SaleStatus, requested: &str) -> CoreResult<SaleStatus> {
        let next: SaleStatus = requested.parse()?;
        debug_assert!(self.allows(current, next));
        Ok(next)
    }
}

/// Validates a requested status change and returns the new status.
///
/// ## Errors
/// [`CoreError::InvalidStatus`](crate::error::CoreError::InvalidStatus) when
/// `requested` is not exactly one of `pending`, `confirmed`, `delivered`,
/// `cancelled`. No trimming or case folding is applied.
///
/// ## Example
/// ```rust
/// use pharmadash_core::status::apply_transition;
/// use pharmadash_core::{CoreError, SaleStatus};
///
/// assert_eq!(
///     apply_transition(SaleStatus::Pending, "confirmed"),
///     Ok(SaleStatus::Confirmed)
/// );
/// assert_eq!(
///     apply_transition(SaleStatus::Delivered, "bogus"),
///     Err(CoreError::InvalidStatus("bogus".to_string()))
/// );
/// ```
pub fn apply_transition(current: SaleStatus, requested: &str) -> CoreResult<SaleStatus> {
    SaleStatusMachine::new().apply(current, requested)
}
