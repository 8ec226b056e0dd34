//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sales Screen Operations                           │
//! │                                                                         │
//! │  1. LOAD                                                               │
//! │     ├── fetch_recent(limit, filter) → newest first, items attached     │
//! │     └── fetch_all(filter) → every match, no row cap (period stats)     │
//! │                                                                         │
//! │  2. CHANGE STATUS                                                      │
//! │     └── persist_status(id, status) → value from apply_transition()     │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── delete(id) → sale_items, then sales, in one transaction        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are built at runtime with `QueryBuilder` because the recent-sales
//! filter is dynamic.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use pharmadash_core::validation::{validate_limit, validate_sale};
use pharmadash_core::{LineItem, Money, SaleRecord, SaleStatus};

// =============================================================================
// Filter
// =============================================================================

/// Optional filters for [`SaleRepository::fetch_recent`] and
/// [`SaleRepository::fetch_all`].
///
/// The time range is half-open: `since <= created_at < before`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub since: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
}

impl SaleFilter {
    /// Only sales in `status`.
    pub fn with_status(status: SaleStatus) -> Self {
        SaleFilter {
            status: Some(status),
            ..SaleFilter::default()
        }
    }

    /// Only sales registered at or after `since` and strictly before `before`.
    pub fn between(since: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        SaleFilter {
            since: Some(since),
            before: Some(before),
            ..SaleFilter::default()
        }
    }

    /// Appends the filter as `AND` clauses on the `sales` table.
    ///
    /// Timestamps are stored as RFC 3339 UTC text. Fractional digits vary in
    /// length, but `+` sorts below every digit, so text order equals time order.
    fn push_conditions(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        if let Some(status) = self.status {
            query.push(" AND sales.status = ").push_bind(status);
        }
        if let Some(since) = self.since {
            query.push(" AND sales.created_at >= ").push_bind(since);
        }
        if let Some(before) = self.before {
            query.push(" AND sales.created_at < ").push_bind(before);
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    client_name: Option<String>,
    total_cents: Option<i64>,
    status: String,
    created_at: Option<DateTime<Utc>>,
}

impl SaleRow {
    fn into_record(self, items: Vec<LineItem>) -> SaleRecord {
        SaleRecord {
            id: self.id,
            created_at: self.created_at,
            total: self.total_cents.map(Money::from_cents),
            status: self.status,
            client_name: self.client_name,
            items,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    sale_id: String,
    product_id: String,
    quantity: i64,
    unit_price_cents: i64,
}

impl From<ItemRow> for LineItem {
    fn from(row: ItemRow) -> Self {
        LineItem::new(row.product_id, row.quantity, Money::from_cents(row.unit_price_cents))
    }
}

const SALE_COLUMNS: &str = "id, client_name, total_cents, status, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Loads the newest sales matching `filter`, line items attached.
    ///
    /// ## Arguments
    /// * `limit` - Maximum sales to return (1..=MAX_RECENT_SALES)
    /// * `filter` - Status and time-range filters
    ///
    /// Sales without a timestamp sort last.
    pub async fn fetch_recent(&self, limit: u32, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        validate_limit(limit)?;

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        query.push(SALE_COLUMNS).push(" FROM sales WHERE 1 = 1");
        filter.push_conditions(&mut query);

        query
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::from(limit));

        let rows: Vec<SaleRow> = query.build_query_as().fetch_all(&self.pool).await?;

        debug!(
            count = rows.len(),
            limit,
            status = ?filter.status,
            "Fetched recent sales"
        );

        self.attach_items(rows).await
    }

    /// Loads every sale matching `filter`, newest first, with no row cap.
    ///
    /// Line items come from a join on the same filter, so the number of
    /// sales isn't bounded by SQLite's bind-parameter limit.
    pub async fn fetch_all(&self, filter: &SaleFilter) -> DbResult<Vec<SaleRecord>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        query.push(SALE_COLUMNS).push(" FROM sales WHERE 1 = 1");
        filter.push_conditions(&mut query);
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<SaleRow> = query.build_query_as().fetch_all(&self.pool).await?;

        let mut items_query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT i.sale_id, i.product_id, i.quantity, i.unit_price_cents
            FROM sale_items i
            JOIN sales ON sales.id = i.sale_id
            WHERE 1 = 1"#,
        );
        filter.push_conditions(&mut items_query);
        items_query.push(" ORDER BY i.sale_id, i.position");

        let items: Vec<ItemRow> = items_query.build_query_as().fetch_all(&self.pool).await?;

        debug!(
            count = rows.len(),
            items = items.len(),
            status = ?filter.status,
            "Fetched all matching sales"
        );

        Ok(assemble(rows, items))
    }

    /// Gets a sale by ID, line items attached.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SaleRecord>> {
        let row: Option<SaleRow> =
            sqlx::query_as(&format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let items = self.get_items(id).await?;
                Ok(Some(row.into_record(items)))
            }
            None => Ok(None),
        }
    }

    /// Gets all line items of a sale, in entry order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<LineItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            r#"
            SELECT sale_id, product_id, quantity, unit_price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    /// Inserts a sale and its line items in one transaction.
    ///
    /// The record is validated first; nothing is written if it is invalid.
    pub async fn insert(&self, sale: &SaleRecord) -> DbResult<()> {
        validate_sale(sale)?;

        debug!(id = %sale.id, items = sale.items.len(), "Inserting sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, client_name, total_cents, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.client_name)
        .bind(sale.total.map(|total| total.cents()))
        .bind(&sale.status)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in sale.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, quantity, unit_price_cents, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price.cents())
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// Stores a new status for a sale.
    ///
    /// ## When To Call
    /// With the value [`pharmadash_core::apply_transition`] returned. This
    /// method doesn't re-check the transition.
    pub async fn persist_status(&self, sale_id: &str, status: SaleStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET status = ?2 WHERE id = ?1")
            .bind(sale_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        info!(sale_id, status = %status, "Sale status updated");
        Ok(())
    }

    /// Deletes a sale and its line items in one transaction.
    ///
    /// No status precondition. Returns the number of line items removed.
    /// If the sale doesn't exist the transaction is rolled back and
    /// `NotFound` is returned.
    pub async fn delete(&self, sale_id: &str) -> DbResult<u64> {
        let mut tx = self.pool.begin().await?;

        let items = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let sales = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if sales == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        tx.commit().await?;

        info!(sale_id, items, "Sale deleted");
        Ok(items)
    }

    /// Deletes only the line items of a sale.
    pub async fn delete_items(&self, sale_id: &str) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Counts all sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Loads the line items of `rows` in one query and assembles records.
    async fn attach_items(&self, rows: Vec<SaleRow>) -> DbResult<Vec<SaleRecord>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT sale_id, product_id, quantity, unit_price_cents FROM sale_items WHERE sale_id IN (",
        );
        let mut ids = query.separated(", ");
        for row in &rows {
            ids.push_bind(row.id.clone());
        }
        ids.push_unseparated(") ORDER BY sale_id, position");

        let items: Vec<ItemRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(assemble(rows, items))
    }
}

/// Groups item rows by sale and attaches them, keeping the order of `rows`.
fn assemble(rows: Vec<SaleRow>, items: Vec<ItemRow>) -> Vec<SaleRecord> {
    let mut by_sale: HashMap<String, Vec<LineItem>> = HashMap::new();
    for item in items {
        by_sale
            .entry(item.sale_id.clone())
            .or_default()
            .push(LineItem::from(item));
    }

    rows.into_iter()
        .map(|row| {
            let items = by_sale.remove(&row.id).unwrap_or_default();
            row.into_record(items)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, TimeZone};
    use pharmadash_core::{PeriodBounds, MAX_RECENT_SALES};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, day, hour, 0, 0).unwrap()
    }

    fn sale_with_items(day: u32) -> SaleRecord {
        SaleRecord::new(Money::from_cents(1150), at(day, 10))
            .with_client("Ana Torres")
            .with_items(vec![
                LineItem::new("prod-ibuprofen", 2, Money::from_cents(400)),
                LineItem::new("prod-saline", 1, Money::from_cents(350)),
            ])
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        let sale = sale_with_items(3);
        db.sales().insert(&sale).await.unwrap();

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded, sale);
        assert!(db.sales().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_sale() {
        let db = test_db().await;
        let sale = SaleRecord {
            total: Some(Money::from_cents(1)),
            ..sale_with_items(3)
        };

        let err = db.sales().insert(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_recent_orders_newest_first() {
        let db = test_db().await;
        for day in [5, 1, 9, 3] {
            db.sales()
                .insert(&SaleRecord::new(Money::from_cents(day as i64 * 100), at(day, 12)))
                .await
                .unwrap();
        }

        let recent = db
            .sales()
            .fetch_recent(3, &SaleFilter::default())
            .await
            .unwrap();
        let totals: Vec<i64> = recent.iter().map(|s| s.revenue().cents()).collect();
        assert_eq!(totals, vec![900, 500, 300]);
    }

    #[tokio::test]
    async fn test_fetch_recent_filters() {
        let db = test_db().await;
        let confirmed = SaleRecord::new(Money::from_cents(100), at(2, 9))
            .with_status(SaleStatus::Confirmed);
        let pending = SaleRecord::new(Money::from_cents(200), at(4, 9));
        let later = SaleRecord::new(Money::from_cents(300), at(20, 9));
        for sale in [&confirmed, &pending, &later] {
            db.sales().insert(sale).await.unwrap();
        }

        let by_status = db
            .sales()
            .fetch_recent(50, &SaleFilter::with_status(SaleStatus::Confirmed))
            .await
            .unwrap();
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].id, confirmed.id);

        let range = SaleFilter::between(at(1, 0), at(4, 9));
        let exclusive = db.sales().fetch_recent(50, &range).await.unwrap();
        assert_eq!(exclusive.len(), 1);
        assert_eq!(exclusive[0].id, confirmed.id);

        let range = SaleFilter::between(at(1, 0), at(10, 0));
        let in_range = db.sales().fetch_recent(50, &range).await.unwrap();
        let ids: Vec<&str> = in_range.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![pending.id.as_str(), confirmed.id.as_str()]);
    }

    #[tokio::test]
    async fn test_fetch_recent_attaches_items() {
        let db = test_db().await;
        let with_items = sale_with_items(6);
        let without = SaleRecord::new(Money::from_cents(50), at(7, 8));
        db.sales().insert(&with_items).await.unwrap();
        db.sales().insert(&without).await.unwrap();

        let recent = db
            .sales()
            .fetch_recent(10, &SaleFilter::default())
            .await
            .unwrap();
        assert_eq!(recent[0].id, without.id);
        assert!(recent[0].items.is_empty());
        assert_eq!(recent[1].items, with_items.items);
    }

    #[tokio::test]
    async fn test_month_range_keeps_last_sub_millisecond() {
        let db = test_db().await;
        let now = at(15, 12);
        let last_instant = at(30, 23) + Duration::nanoseconds(3_599_999_500_000);
        let first_instant = at(1, 0);
        let next_month = Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap();
        let previous = first_instant - Duration::nanoseconds(500_000);

        let last = sale_with_items(1);
        let last = SaleRecord {
            created_at: Some(last_instant),
            ..last
        };
        let first = SaleRecord::new(Money::from_cents(100), first_instant);
        for sale in [
            &last,
            &first,
            &SaleRecord::new(Money::from_cents(200), next_month),
            &SaleRecord::new(Money::from_cents(300), previous),
        ] {
            db.sales().insert(sale).await.unwrap();
        }

        let month = PeriodBounds::month(&now);
        assert!(month.contains(&last_instant, &Utc));
        let (since, before) = month.utc_range(&Utc).unwrap();
        let filter = SaleFilter::between(since, before);

        let all = db.sales().fetch_all(&filter).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![last.id.as_str(), first.id.as_str()]);
        assert_eq!(all[0].created_at, Some(last_instant));
        assert_eq!(all[0].items, last.items);

        let recent = db.sales().fetch_recent(50, &filter).await.unwrap();
        assert_eq!(recent, all);
    }

    #[tokio::test]
    async fn test_fetch_all_has_no_row_cap() {
        let db = test_db().await;
        sqlx::query(
            r#"
            WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < 10050)
            INSERT INTO sales (id, total_cents, status, created_at)
            SELECT 'bulk-' || i, 100, 'pending', '2026-04-10T12:00:00+00:00' FROM n
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let all = db.sales().fetch_all(&SaleFilter::default()).await.unwrap();
        assert_eq!(all.len(), 10_050);

        let capped = db
            .sales()
            .fetch_recent(MAX_RECENT_SALES, &SaleFilter::default())
            .await
            .unwrap();
        assert_eq!(capped.len(), MAX_RECENT_SALES as usize);
    }

    #[tokio::test]
    async fn test_fetch_recent_rejects_zero_limit() {
        let db = test_db().await;
        let err = db
            .sales()
            .fetch_recent(0, &SaleFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_rows_with_missing_fields_still_load() {
        let db = test_db().await;
        sqlx::query("INSERT INTO sales (id, status) VALUES ('legacy-1', 'on_hold')")
            .execute(db.pool())
            .await
            .unwrap();

        let loaded = db.sales().get_by_id("legacy-1").await.unwrap().unwrap();
        assert_eq!(loaded.status, "on_hold");
        assert!(loaded.total.is_none());
        assert!(loaded.created_at.is_none());
        assert!(loaded.parsed_status().is_none());
    }

    #[tokio::test]
    async fn test_persist_status() {
        let db = test_db().await;
        let sale = sale_with_items(3);
        db.sales().insert(&sale).await.unwrap();

        db.sales()
            .persist_status(&sale.id, SaleStatus::Delivered)
            .await
            .unwrap();
        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.parsed_status(), Some(SaleStatus::Delivered));

        let err = db
            .sales()
            .persist_status("missing", SaleStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_line_items() {
        let db = test_db().await;
        let sale = sale_with_items(3);
        let other = sale_with_items(4);
        db.sales().insert(&sale).await.unwrap();
        db.sales().insert(&other).await.unwrap();

        let removed = db.sales().delete(&sale.id).await.unwrap();
        assert_eq!(removed, 2);
        assert!(db.sales().get_by_id(&sale.id).await.unwrap().is_none());
        assert!(db.sales().get_items(&sale.id).await.unwrap().is_empty());
        assert_eq!(db.sales().get_items(&other.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_missing_sale_is_not_found() {
        let db = test_db().await;
        let err = db.sales().delete("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_items_only() {
        let db = test_db().await;
        let sale = sale_with_items(3);
        db.sales().insert(&sale).await.unwrap();

        assert_eq!(db.sales().delete_items(&sale.id).await.unwrap(), 2);
        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert!(loaded.items.is_empty());
    }
}
