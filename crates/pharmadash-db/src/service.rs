//! # Dashboard Service
//!
//! Orchestrates the sales dashboard: loads sales through a [`SalesGateway`],
//! hands them to the pure functions in `pharmadash-core`, and writes status
//! changes and deletions back.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Dashboard Request Flow                               │
//! │                                                                         │
//! │  overview(now)                                                         │
//! │       │                                                                 │
//! │       ├── gateway.fetch_sales(this month, no cap) ──► compute_stats    │
//! │       │                                            └──► status counts  │
//! │       ├── gateway.fetch_recent_sales(recent_limit, all)                │
//! │       └── gateway.fetch_products() ─────────────────► count_low_stock  │
//! │                                                                         │
//! │  change_status(id, current, "delivered")                               │
//! │       │                                                                 │
//! │       ├── apply_transition() ── Err(InvalidStatus) ─► returned as-is   │
//! │       └── gateway.persist_status(id, Delivered)                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gateway is injected; nothing here reaches for a global connection.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;

use crate::config::DashboardConfig;
use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::sale::SaleFilter;
use pharmadash_core::{
    apply_transition, compute_stats, compute_status_counts, count_low_stock, CoreError,
    PeriodBounds, PeriodStats, ProductStock, SaleRecord, SaleStatus, StatusCount,
};

// =============================================================================
// Gateway
// =============================================================================

/// Storage operations the dashboard needs.
#[async_trait]
pub trait SalesGateway: Send + Sync {
    /// Newest sales first, at most `limit`, matching `filter`.
    async fn fetch_recent_sales(&self, limit: u32, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>>;

    /// Every sale matching `filter`, without a row cap.
    async fn fetch_sales(&self, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>>;

    /// Stores a status already checked by [`apply_transition`].
    async fn persist_status(&self, sale_id: &str, status: SaleStatus) -> DbResult<()>;

    /// Removes a sale together with its line items.
    async fn delete_sale(&self, sale_id: &str) -> DbResult<()>;

    async fn fetch_products(&self) -> DbResult<Vec<ProductStock>>;
}

/// Shared, type-erased gateway.
pub type DynSalesGateway = Arc<dyn SalesGateway>;

#[async_trait]
impl<G: SalesGateway + ?Sized> SalesGateway for Arc<G> {
    async fn fetch_recent_sales(&self, limit: u32, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        (**self).fetch_recent_sales(limit, filter).await
    }

    async fn fetch_sales(&self, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        (**self).fetch_sales(filter).await
    }

    async fn persist_status(&self, sale_id: &str, status: SaleStatus) -> DbResult<()> {
        (**self).persist_status(sale_id, status).await
    }

    async fn delete_sale(&self, sale_id: &str) -> DbResult<()> {
        (**self).delete_sale(sale_id).await
    }

    async fn fetch_products(&self) -> DbResult<Vec<ProductStock>> {
        (**self).fetch_products().await
    }
}

#[async_trait]
impl SalesGateway for Database {
    async fn fetch_recent_sales(&self, limit: u32, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        self.sales().fetch_recent(limit, filter).await
    }

    async fn fetch_sales(&self, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        self.sales().fetch_all(filter).await
    }

    async fn persist_status(&self, sale_id: &str, status: SaleStatus) -> DbResult<()> {
        self.sales().persist_status(sale_id, status).await
    }

    async fn delete_sale(&self, sale_id: &str) -> DbResult<()> {
        self.sales().delete(sale_id).await.map(|_| ())
    }

    async fn fetch_products(&self) -> DbResult<Vec<ProductStock>> {
        self.products().list_all().await
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced to the display layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl ServiceError {
    /// Whether the target sale no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Db(err) if err.is_not_found())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Overview
// =============================================================================

/// Everything the dashboard page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    /// Computed over every sale of the current month.
    pub stats: PeriodStats,
    /// Month sales per status; the four known statuses are always present.
    pub status_counts: StatusCount,
    /// Newest sales regardless of period.
    pub recent: Vec<SaleRecord>,
    pub low_stock_count: usize,
}

// =============================================================================
// Service
// =============================================================================

/// Dashboard orchestration over an injected gateway.
///
/// ## Usage
/// ```rust,ignore
/// let service = DashboardService::new(db.clone(), &config);
/// let overview = service.overview(Local::now()).await?;
/// let next = service.change_status(&sale.id, SaleStatus::Pending, "confirmed").await?;
/// ```
#[derive(Debug, Clone)]
pub struct DashboardService<G> {
    gateway: G,
    recent_limit: u32,
    low_stock_threshold: i64,
}

impl<G: SalesGateway> DashboardService<G> {
    pub fn new(gateway: G, config: &DashboardConfig) -> Self {
        DashboardService {
            gateway,
            recent_limit: config.recent_limit,
            low_stock_threshold: config.low_stock_threshold,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Builds the dashboard overview as of `now`.
    ///
    /// Periods are calendar periods in the timezone of `now`. Every sale of
    /// the month is loaded, however many there are.
    pub async fn overview<Tz: TimeZone>(&self, now: DateTime<Tz>) -> ServiceResult<DashboardOverview> {
        let tz = now.timezone();
        let month = PeriodBounds::month(&now);
        let filter = match month.utc_range(&tz) {
            Some((since, before)) => SaleFilter::between(since, before),
            // Month edge falls in a DST gap
            None => SaleFilter::default(),
        };

        let mut month_sales = self.gateway.fetch_sales(&filter).await?;
        month_sales.retain(|sale| sale.created_at.is_some_and(|at| month.contains(&at, &tz)));

        let recent = self
            .gateway
            .fetch_recent_sales(self.recent_limit, &SaleFilter::default())
            .await?;
        let products = self.gateway.fetch_products().await?;

        let status_counts = compute_status_counts(&month_sales).with_known_statuses();
        let stats = compute_stats(&month_sales, now);
        let low_stock_count = count_low_stock(&products, self.low_stock_threshold);

        debug!(
            month_sales = month_sales.len(),
            recent = recent.len(),
            low_stock_count,
            "Dashboard overview built"
        );

        Ok(DashboardOverview {
            stats,
            status_counts,
            recent,
            low_stock_count,
        })
    }

    /// Newest sales in one status.
    pub async fn sales_by_status(&self, status: SaleStatus) -> ServiceResult<Vec<SaleRecord>> {
        let sales = self
            .gateway
            .fetch_recent_sales(self.recent_limit, &SaleFilter::with_status(status))
            .await?;
        Ok(sales)
    }

    /// Moves a sale from `current` to the `requested` status literal.
    ///
    /// An unknown literal fails with `CoreError::InvalidStatus` and nothing is
    /// written.
    pub async fn change_status(
        &self,
        sale_id: &str,
        current: SaleStatus,
        requested: &str,
    ) -> ServiceResult<SaleStatus> {
        let next = apply_transition(current, requested)?;
        self.gateway.persist_status(sale_id, next).await?;

        info!(sale_id, from = %current, to = %next, "Sale status changed");
        Ok(next)
    }

    /// Deletes a sale and its line items. Any status may be deleted.
    pub async fn delete_sale(&self, sale_id: &str) -> ServiceResult<()> {
        self.gateway.delete_sale(sale_id).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
