//! Unit tests for the dashboard monitor and alarm log.
//!
//! Run with: cargo test --test dashboard_unit_test

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use firewatch::monitor::{AlarmLog, AlarmNotice, AlarmSource, DashboardMonitor, StatusOverview};
use firewatch::series::{DeviceSnapshot, DeviceStatus, SensorField};

fn device(id: &str, status: DeviceStatus) -> DeviceSnapshot {
    DeviceSnapshot {
        location: Some(format!("Room {id}")),
        temperature: Some(25.0),
        smoke_level: Some(10.0),
        flame: Some(1500.0),
        status,
        ..DeviceSnapshot::new(id)
    }
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
}

fn notice(device_id: &str, raised_at: DateTime<Utc>) -> AlarmNotice {
    AlarmNotice::live(&DeviceSnapshot::new(device_id), raised_at)
}

#[test]
fn zero_window_capacity_is_rejected() {
    assert!(DashboardMonitor::new(0, 50).is_err());
}

#[test]
fn overview_counts_statuses() {
    let overview = StatusOverview::from_snapshots(&[
        device("a", DeviceStatus::Normal),
        device("b", DeviceStatus::Normal),
        device("c", DeviceStatus::Warning),
        device("d", DeviceStatus::Alarm),
        device("e", DeviceStatus::Unknown),
    ]);

    assert_eq!(overview.total, 5);
    assert_eq!(overview.normal, 2);
    assert_eq!(overview.warning, 1);
    assert_eq!(overview.alarm, 1);
    assert_eq!(overview.unknown, 1);
    assert!(overview.alarm_active());
    assert!(!StatusOverview::default().alarm_active());
}

#[test]
fn alarm_is_raised_once_per_entry() {
    let mut monitor = DashboardMonitor::new(20, 50).unwrap();

    let first = monitor.apply_batch(&[device("a", DeviceStatus::Alarm)], "t1", at(1));
    assert_eq!(first.raised.len(), 1);
    assert_eq!(first.raised[0].device_id, "a");
    assert_eq!(first.raised[0].message, "Room a detected fire risk!");
    assert_eq!(first.raised[0].source, AlarmSource::Live);

    // Still in alarm: no new notice
    let second = monitor.apply_batch(&[device("a", DeviceStatus::Alarm)], "t2", at(2));
    assert!(second.raised.is_empty());

    // Leaves and re-enters alarm
    monitor.apply_batch(&[device("a", DeviceStatus::Normal)], "t3", at(3));
    let fourth = monitor.apply_batch(&[device("a", DeviceStatus::Alarm)], "t4", at(4));
    assert_eq!(fourth.raised.len(), 1);

    let log = monitor.alarm_log(10);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].raised_at, at(4));
    assert_eq!(log[1].raised_at, at(1));
}

#[test]
fn duplicate_device_in_batch_raises_once() {
    let mut monitor = DashboardMonitor::new(20, 50).unwrap();
    let outcome = monitor.apply_batch(
        &[device("a", DeviceStatus::Alarm), device("a", DeviceStatus::Alarm)],
        "t1",
        at(1),
    );
    assert_eq!(outcome.raised.len(), 1);
}

#[test]
fn batch_replaces_device_table() {
    let mut monitor = DashboardMonitor::new(20, 50).unwrap();
    monitor.apply_batch(
        &[device("b", DeviceStatus::Normal), device("a", DeviceStatus::Warning)],
        "t1",
        at(1),
    );

    let ids: Vec<_> = monitor.devices().into_iter().map(|d| d.device_id).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(monitor.device("a").unwrap().status, DeviceStatus::Warning);

    monitor.apply_batch(&[device("c", DeviceStatus::Normal)], "t2", at(2));
    assert!(monitor.device("a").is_none());
    assert_eq!(monitor.devices().len(), 1);
    assert_eq!(monitor.overview().total, 1);
    assert_eq!(monitor.last_batch_at(), Some(at(2)));
}

#[test]
fn every_batch_feeds_the_chart_window() {
    let mut monitor = DashboardMonitor::new(2, 50).unwrap();
    monitor.apply_batch(&[device("a", DeviceStatus::Normal)], "t1", at(1));
    monitor.apply_batch(&[], "t2", at(2));
    monitor.apply_batch(&[device("a", DeviceStatus::Normal)], "t3", at(3));

    let aggregator = monitor.aggregator();
    assert_eq!(aggregator.labels(), ["t2", "t3"]);
    assert_eq!(aggregator.raw_series(SensorField::Temperature), [0.0, 25.0]);
}

#[test]
fn alarm_log_is_bounded_newest_first() {
    let mut log = AlarmLog::new(3);
    for hour in 1..=5 {
        log.record(notice("a", at(hour)));
    }

    assert_eq!(log.len(), 3);
    let recent = log.recent(10);
    let hours: Vec<_> = recent.iter().map(|n| n.raised_at).collect();
    assert_eq!(hours, [at(5), at(4), at(3)]);
    assert_eq!(log.recent(1)[0].raised_at, at(5));
}

#[test]
fn seeded_history_is_merged_in_time_order() {
    let mut monitor = DashboardMonitor::new(20, 3).unwrap();
    monitor.apply_batch(&[device("a", DeviceStatus::Alarm)], "t1", at(10));

    monitor.seed_history(vec![notice("x", at(2)), notice("y", at(12)), notice("z", at(1))]);

    let log = monitor.alarm_log(10);
    let order: Vec<_> = log.iter().map(|n| n.device_id.as_str()).collect();
    assert_eq!(order, ["y", "a", "x"]);
}

#[test]
fn alarms_are_counted_per_day() {
    let mut log = AlarmLog::default();
    log.record(notice("a", at(1)));
    log.record(notice("b", at(23)));
    log.record(notice("c", at(23) + Duration::hours(2)));

    let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    assert_eq!(log.count_on(day, &Utc), 2);

    // Shifted into UTC+2, the 23:00 notice falls on the next day
    let plus_two = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
    assert_eq!(log.count_on(day, &plus_two), 1);
}

#[test]
fn snapshots_without_id_are_averaged_but_not_listed() {
    let mut monitor = DashboardMonitor::new(20, 50).unwrap();
    let anonymous = DeviceSnapshot {
        temperature: Some(35.0),
        ..device("", DeviceStatus::Alarm)
    };

    let outcome = monitor.apply_batch(&[device("a", DeviceStatus::Normal), anonymous], "t1", at(1));

    assert_eq!(outcome.sample.contributors, 2);
    assert_eq!(outcome.sample.avg_temperature_c, 30.0);
    assert!(outcome.raised.is_empty());
    assert_eq!(monitor.devices().len(), 1);
}
