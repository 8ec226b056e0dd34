//! Property-based tests for the sales statistics and status machine.

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use pharmadash_core::{
    apply_transition, compute_stats, compute_status_counts, CoreError, Money, SaleRecord,
    SaleStatus,
};
use proptest::prelude::*;

fn reference_now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 5, 15, 13, 45, 0)
        .unwrap()
}

prop_compose! {
    fn arbitrary_status()(variant in 0..5u8) -> String {
        match variant {
            0 => "pending".to_string(),
            1 => "confirmed".to_string(),
            2 => "delivered".to_string(),
            3 => "cancelled".to_string(),
            _ => "legacy".to_string(),
        }
    }
}

prop_compose! {
    // Sales spread over roughly two months either side of the reference instant
    fn arbitrary_sale()(
        offset_ms in -5_000_000_000i64..5_000_000_000i64,
        cents in proptest::option::of(-1_000i64..1_000_000),
        has_timestamp in proptest::bool::weighted(0.9),
        status in arbitrary_status(),
    ) -> SaleRecord {
        let at = reference_now().with_timezone(&Utc) + Duration::milliseconds(offset_ms);
        SaleRecord {
            id: format!("sale-{offset_ms}"),
            created_at: has_timestamp.then_some(at),
            total: cents.map(Money::from_cents),
            status,
            client_name: None,
            items: Vec::new(),
        }
    }
}

proptest! {
    #[test]
    fn today_revenue_never_exceeds_month_revenue(
        records in proptest::collection::vec(arbitrary_sale(), 0..200)
    ) {
        let stats = compute_stats(&records, reference_now());
        prop_assert!(stats.today_revenue <= stats.month_revenue);
        prop_assert!(stats.today_count <= stats.total_count);
    }

    #[test]
    fn stats_are_non_negative(
        records in proptest::collection::vec(arbitrary_sale(), 0..200)
    ) {
        let stats = compute_stats(&records, reference_now());
        prop_assert!(!stats.today_revenue.is_negative());
        prop_assert!(!stats.month_revenue.is_negative());
        prop_assert!(!stats.average_ticket.is_negative());
        prop_assert_eq!(stats.total_count, records.len() as u64);
    }

    #[test]
    fn status_counts_sum_to_record_count(
        records in proptest::collection::vec(arbitrary_sale(), 0..200)
    ) {
        let counts = compute_status_counts(&records);
        prop_assert_eq!(counts.total(), records.len() as u64);
        prop_assert!(counts.iter().all(|(_, count)| count > 0));
    }

    #[test]
    fn stats_ignore_record_order(
        mut records in proptest::collection::vec(arbitrary_sale(), 0..100)
    ) {
        let forward = compute_stats(&records, reference_now());
        records.reverse();
        prop_assert_eq!(compute_stats(&records, reference_now()), forward);
    }

    #[test]
    fn every_known_status_is_reachable_from_every_status(
        from in 0..4usize,
        to in 0..4usize,
    ) {
        let from = SaleStatus::ALL[from];
        let to = SaleStatus::ALL[to];
        prop_assert_eq!(apply_transition(from, to.as_str()), Ok(to));
    }

    #[test]
    fn unknown_literals_are_rejected(requested in "[a-z]{1,12}") {
        prop_assume!(requested.parse::<SaleStatus>().is_err());
        prop_assert_eq!(
            apply_transition(SaleStatus::Pending, &requested),
            Err(CoreError::InvalidStatus(requested.clone()))
        );
    }

    #[test]
    fn padded_known_literals_are_rejected(
        status in 0..4usize,
        left in "[ \t\n]{0,2}",
        right in "[ \t\n]{0,2}",
    ) {
        prop_assume!(!left.is_empty() || !right.is_empty());
        let requested = format!("{left}{}{right}", SaleStatus::ALL[status].as_str());
        prop_assert_eq!(
            apply_transition(SaleStatus::Pending, &requested),
            Err(CoreError::InvalidStatus(requested.clone()))
        );
    }
}

#[test]
fn boundary_millisecond_belongs_to_today() {
    let now = reference_now();
    let tz = now.timezone();
    let last_ms = tz.with_ymd_and_hms(2026, 5, 15, 23, 59, 59).unwrap() + Duration::milliseconds(999);
    let next_day = tz.with_ymd_and_hms(2026, 5, 16, 0, 0, 0).unwrap();

    let records = vec![
        SaleRecord::new(Money::from_cents(700), last_ms.with_timezone(&Utc)),
        SaleRecord::new(Money::from_cents(300), next_day.with_timezone(&Utc)),
    ];

    let stats = compute_stats(&records, now);
    assert_eq!(stats.today_count, 1);
    assert_eq!(stats.today_revenue.cents(), 700);
    assert_eq!(stats.month_revenue.cents(), 1000);
}
