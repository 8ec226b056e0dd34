//! # Error Types
//!
//! Domain-specific error types for pharmadash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pharmadash-core errors (this file)                                    │
//! │  ├── CoreError        - Status machine and domain errors               │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pharmadash-db errors (separate crate)                                 │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - Dashboard orchestration failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError / ServiceError → caller  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Aggregation never fails, so the only error native to the reporting
//! logic is [`CoreError::InvalidStatus`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Requested sale status is not one of the enumerated states.
    ///
    /// ## When This Occurs
    /// - A form posts a status value the dashboard never offered
    /// - A stored row carries a legacy literal and is fed back unchanged
    ///
    /// No state is changed when this is returned.
    #[error("Invalid sale status: '{0}' (expected pending, confirmed, delivered or cancelled)")]
    InvalidStatus(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Derived value doesn't match its components.
    #[error("{field} is {actual}, expected {expected}")]
    Mismatch {
        field: String,
        expected: i64,
        actual: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
