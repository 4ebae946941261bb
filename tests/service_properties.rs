//! Property tests for the measurement lifecycle
//!
//! Exercise the service against fresh in-memory SQLite stores with generated
//! inputs and insertion orders.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use speed_monitor::{
    error::AppError,
    models::{Decimal2, NewMeasurement, SpeedTestInput},
    producer::SimulatedProducer,
    service::SpeedTestService,
    store::{MeasurementStore, SqliteStore},
};
use std::sync::Arc;

fn fresh_service() -> SpeedTestService {
    SpeedTestService::new(
        Arc::new(SqliteStore::open_in_memory().unwrap()),
        Arc::new(SimulatedProducer::new()),
    )
}

/// Expected stored value: hundredths rounded half away from zero
fn expected_hundredths(value: f64) -> i64 {
    Decimal2::from_f64(value).unwrap().hundredths()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn valid_inputs_round_trip(
        download in 0.01f64..10_000.0,
        upload in 0.01f64..10_000.0,
        ping in 0.0f64..5_000.0,
    ) {
        let service = fresh_service();
        let stored = tokio_test::block_on(
            service.save_speed_test(SpeedTestInput::new(download, upload, ping))
        ).unwrap();

        prop_assert_eq!(stored.download_speed.hundredths(), expected_hundredths(download));
        prop_assert_eq!(stored.upload_speed.hundredths(), expected_hundredths(upload));
        prop_assert_eq!(stored.ping.hundredths(), expected_hundredths(ping));
        prop_assert_eq!(service.store().get(stored.id).unwrap(), stored);
    }

    #[test]
    fn invalid_inputs_leave_store_unchanged(
        download in -1_000.0f64..=0.0,
        upload in 0.01f64..100.0,
        bad_upload in -1_000.0f64..=0.0,
        ping in -1_000.0f64..-0.001,
        which in 0usize..3,
    ) {
        let service = fresh_service();
        service.store().insert(NewMeasurement::new(
            Decimal2::from_f64(1.0).unwrap(),
            Decimal2::from_f64(1.0).unwrap(),
            Decimal2::ZERO,
        )).unwrap();

        let (input, field) = match which {
            0 => (SpeedTestInput::new(download, upload, 10.0), "download_speed"),
            1 => (SpeedTestInput::new(10.0, bad_upload, 10.0), "upload_speed"),
            _ => (SpeedTestInput::new(10.0, upload, ping), "ping"),
        };

        let error = tokio_test::block_on(service.save_speed_test(input)).unwrap_err();
        let is_validation = matches!(error, AppError::Validation { .. });
        prop_assert!(is_validation);
        prop_assert_eq!(error.field(), Some(field));
        prop_assert_eq!(service.store().count().unwrap(), 1);
    }

    #[test]
    fn most_recent_is_latest_timestamp(offsets in proptest::collection::vec(0i64..100_000, 1..20)) {
        let service = fresh_service();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        for (i, offset) in offsets.iter().enumerate() {
            let value = Decimal2::from_f64(i as f64 + 1.0).unwrap();
            service.store().insert(
                NewMeasurement::new(value, value, value).at(base + Duration::seconds(*offset))
            ).unwrap();
        }

        let latest = offsets.iter().max().copied().unwrap_or_default();
        // Among rows sharing the latest timestamp, the last inserted wins
        let winner = offsets.iter().rposition(|offset| *offset == latest).unwrap_or_default();

        let current = tokio_test::block_on(service.get_current_speeds()).unwrap();
        prop_assert_eq!(current.last_updated, base + Duration::seconds(latest));
        prop_assert_eq!(current.download_speed, winner as f64 + 1.0);
    }
}

#[test]
fn empty_store_reports_no_data() {
    let service = fresh_service();
    let error = tokio_test::block_on(service.get_current_speeds()).unwrap_err();
    assert!(error.is_expected_empty());
    assert_eq!(error.exit_code(), 3);
}

#[test]
fn runs_are_positive_with_distinct_ids() {
    let service = fresh_service();
    let mut ids = Vec::new();

    for _ in 0..25 {
        let result = tokio_test::block_on(service.run_speed_test()).unwrap();
        assert!(result.download_mbps() > 0.0);
        assert!(result.upload_mbps() > 0.0);
        assert!(result.ping_ms() >= 0.0);
        ids.push(result.id);
    }

    let mut unique = ids.clone();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn scenario_three_rows_out_of_order() {
    let service = fresh_service();
    let at = |hour| Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap();
    let d = |text: &str| text.parse::<Decimal2>().unwrap();

    for (download, upload, ping, hour) in [
        ("25.50", "5.25", "15.00", 10),
        ("30.75", "6.50", "12.25", 12),
        ("28.00", "5.75", "18.50", 8),
    ] {
        service.store().insert(NewMeasurement::new(d(download), d(upload), d(ping)).at(at(hour))).unwrap();
    }

    let current = tokio_test::block_on(service.get_current_speeds()).unwrap();
    assert_eq!(current.download_speed, 30.75);
    assert_eq!(current.upload_speed, 6.5);
    assert_eq!(current.ping, 12.25);
    assert_eq!(current.last_updated, at(12));
}
