//! # pharmadash-db: Database Layer for PharmaDash
//!
//! SQLite storage for sales and product stock, plus the dashboard service
//! that feeds stored sales to `pharmadash-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        PharmaDash Data Flow                             │
//! │                                                                         │
//! │  Display layer (sales page)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pharmadash-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ DashboardSvc  │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │ (service.rs)  │───►│ SaleRepo      │    │  (embedded)  │  │   │
//! │  │   │ SalesGateway  │    │ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           ▼                    ▼                               │   │
//! │  │    pharmadash-core      Database (pool.rs)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (PHARMADASH_DB_PATH or platform data dir)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Sale and product repositories
//! - [`config`] - Dashboard settings from the environment
//! - [`service`] - Dashboard orchestration over a [`SalesGateway`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pharmadash_db::{Database, DbConfig, DashboardConfig, DashboardService};
//!
//! let config = DashboardConfig::from_env()?;
//! let db = Database::new(DbConfig::from(&config)).await?;
//!
//! let service = DashboardService::new(db, &config);
//! let overview = service.overview(chrono::Local::now()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DashboardConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use service::{
    DashboardOverview, DashboardService, DynSalesGateway, SalesGateway, ServiceError,
    ServiceResult,
};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::{SaleFilter, SaleRepository};

use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,pharmadash=debug,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=pharmadash_db=trace` - Trace this crate only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// A later call leaves the first subscriber in place and logs that at
/// debug level.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Err(err) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        tracing::debug!(%err, "Tracing subscriber already installed");
    }
}
