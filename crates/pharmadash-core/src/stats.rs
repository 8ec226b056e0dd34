//! # Sales Statistics
//!
//! Period statistics and status buckets for the sales dashboard.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  data layer: fetch sales ──► &[SaleRecord]                              │
//! │                                   │                                     │
//! │                 ┌─────────────────┴──────────────────┐                  │
//! │                 ▼                                    ▼                  │
//! │   compute_stats(records, now)          compute_status_counts(records)   │
//! │                 │                                    │                  │
//! │                 ▼                                    ▼                  │
//! │   PeriodStats {                        StatusCount {                    │
//! │     total_count, today_count,            "pending"   → 4,               │
//! │     today_revenue, month_revenue,        "delivered" → 7,               │
//! │     average_ticket                       ...                            │
//! │   }                                    }                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Period Boundaries
//! "Today" and "this month" are calendar periods in the timezone of `now`.
//! Both ends are inclusive: a sale at 23:59:59.999 belongs to the day, a
//! sale at 00:00:00.000 the next day does not. Membership is decided on the
//! local calendar date, so sub-millisecond timestamps can't fall between
//! two periods.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{SaleRecord, SaleStatus};

// =============================================================================
// Period Bounds
// =============================================================================

/// An inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodBounds {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl PeriodBounds {
    /// The calendar day containing `now`.
    pub fn day<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        PeriodBounds {
            first_day: today,
            last_day: today,
        }
    }

    /// The calendar month containing `now`.
    pub fn month<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();
        let first_day = today.with_day(1).unwrap_or(today);
        let last_day = first_day
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        PeriodBounds {
            first_day,
            last_day,
        }
    }

    /// First instant of the period, local wall-clock time.
    pub fn start(&self) -> NaiveDateTime {
        self.first_day.and_time(NaiveTime::MIN)
    }

    /// Last millisecond of the period, local wall-clock time.
    pub fn end(&self) -> NaiveDateTime {
        let end_of_day =
            NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        self.last_day.and_time(end_of_day)
    }

    /// Whether `instant`, seen in `tz`, falls on a day of this period.
    pub fn contains<Tz: TimeZone>(&self, instant: &DateTime<Utc>, tz: &Tz) -> bool {
        let day = instant.with_timezone(tz).date_naive();
        self.first_day <= day && day <= self.last_day
    }

    /// First instant after the period, local wall-clock time.
    pub fn next_start(&self) -> Option<NaiveDateTime> {
        self.last_day.succ_opt().map(|day| day.and_time(NaiveTime::MIN))
    }

    /// The period as a half-open UTC range `[start, next_start)`, for range
    /// queries against storage.
    ///
    /// The exclusive upper bound keeps every sub-millisecond instant of the
    /// last day inside the range, matching [`PeriodBounds::contains`].
    /// Returns `None` when a boundary doesn't exist in `tz` (a DST gap at
    /// midnight). Ambiguous boundaries resolve outward.
    pub fn utc_range<Tz: TimeZone>(&self, tz: &Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = tz.from_local_datetime(&self.start()).earliest()?;
        let next = tz.from_local_datetime(&self.next_start()?).latest()?;
        Some((start.with_timezone(&Utc), next.with_timezone(&Utc)))
    }
}

// =============================================================================
// Period Stats
// =============================================================================

/// Statistics block shown at the top of the sales dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodStats {
    /// Number of records passed in.
    pub total_count: u64,
    /// Records registered today.
    pub today_count: u64,
    /// Revenue registered today.
    pub today_revenue: Money,
    /// Revenue registered this month.
    pub month_revenue: Money,
    /// `month_revenue / total_count`, zero when there are no records.
    pub average_ticket: Money,
}

/// Single-pass accumulator behind [`compute_stats`].
///
/// Useful when records are streamed from storage instead of collected.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use pharmadash_core::money::Money;
/// use pharmadash_core::stats::SalesAggregator;
/// use pharmadash_core::types::SaleRecord;
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap();
/// let mut agg = SalesAggregator::new(now);
/// agg.push(&SaleRecord::new(Money::from_cents(1250), now));
/// let stats = agg.finish();
/// assert_eq!(stats.today_revenue.cents(), 1250);
/// ```
#[derive(Debug, Clone)]
pub struct SalesAggregator<Tz: TimeZone> {
    tz: Tz,
    today: PeriodBounds,
    month: PeriodBounds,
    stats: PeriodStats,
}

impl<Tz: TimeZone> SalesAggregator<Tz> {
    /// Creates an aggregator whose periods are anchored at `now`.
    pub fn new(now: DateTime<Tz>) -> Self {
        SalesAggregator {
            today: PeriodBounds::day(&now),
            month: PeriodBounds::month(&now),
            tz: now.timezone(),
            stats: PeriodStats::default(),
        }
    }

    /// Folds one record into the running totals.
    pub fn push(&mut self, record: &SaleRecord) {
        self.stats.total_count += 1;

        let Some(created_at) = record.created_at else {
            return;
        };
        let revenue = record.revenue();

        if self.today.contains(&created_at, &self.tz) {
            self.stats.today_count += 1;
            self.stats.today_revenue += revenue;
        }
        if self.month.contains(&created_at, &self.tz) {
            self.stats.month_revenue += revenue;
        }
    }

    /// Finishes the fold, deriving the average ticket.
    pub fn finish(self) -> PeriodStats {
        PeriodStats {
            average_ticket: self.stats.month_revenue.divide_rounded(self.stats.total_count),
            ..self.stats
        }
    }
}

/// Computes period statistics for `records` relative to `now`.
///
/// Pure and infallible: records with an absent timestamp count toward
/// `total_count` only, and absent or negative totals add nothing.
pub fn compute_stats<Tz: TimeZone>(records: &[SaleRecord], now: DateTime<Tz>) -> PeriodStats {
    let mut aggregator = SalesAggregator::new(now);
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}

// =============================================================================
// Status Count
// =============================================================================

/// Number of records per observed status literal.
///
/// Only observed literals are present. Enumeration order is not part of the
/// contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusCount(BTreeMap<String, u64>);

impl StatusCount {
    /// Count for an arbitrary literal, zero when absent.
    pub fn get(&self, literal: &str) -> u64 {
        self.0.get(literal).copied().unwrap_or(0)
    }

    /// Count for a known status, zero when absent.
    pub fn count_for(&self, status: SaleStatus) -> u64 {
        self.get(status.as_str())
    }

    /// Copy with every known status present, zero-filled.
    pub fn with_known_statuses(&self) -> StatusCount {
        let mut filled = self.0.clone();
        for status in SaleStatus::ALL {
            filled.entry(status.as_str().to_string()).or_insert(0);
        }
        StatusCount(filled)
    }

    /// Sum of all buckets.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of buckets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(literal, count)| (literal.as_str(), *count))
    }
}

/// Counts records per status literal.
///
/// Unknown literals get their own bucket; they are data, not errors.
pub fn compute_status_counts(records: &[SaleRecord]) -> StatusCount {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.clone()).or_insert(0) += 1;
    }
    StatusCount(counts)
}

/// Records whose status literal is `status`, in their original order.
pub fn filter_by_status(records: &[SaleRecord], status: SaleStatus) -> Vec<&SaleRecord> {
    records
        .iter()
        .filter(|record| record.status == status.as_str())
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
