//! Unit tests for the series window, aggregator and risk normalization.
//!
//! Run with: cargo test --test series_unit_test

use firewatch::series::risk::{flame_risk, smoke_risk, temperature_risk};
use firewatch::series::{
    AggregatedSample, ChartProjection, ChartView, DeviceSnapshot, SensorField,
    SensorSeriesAggregator, SeriesError, SeriesWindow, ViewSelector,
};
use tokio_test::{assert_err, assert_ok};

fn reading(id: &str, temperature: f64, smoke: f64, flame: f64) -> DeviceSnapshot {
    DeviceSnapshot {
        temperature: Some(temperature),
        smoke_level: Some(smoke),
        flame: Some(flame),
        ..DeviceSnapshot::new(id)
    }
}

fn assert_all_finite(sample: &AggregatedSample) {
    for field in SensorField::ALL {
        assert!(
            field.value_of(sample).is_finite(),
            "{field} is not finite: {sample:?}"
        );
    }
}

#[test]
fn zero_capacity_is_rejected() {
    assert_eq!(
        SeriesWindow::with_capacity(0).unwrap_err(),
        SeriesError::InvalidCapacity
    );
    assert_err!(SensorSeriesAggregator::with_capacity(0));
    assert_ok!(SensorSeriesAggregator::with_capacity(1));
}

#[test]
fn default_window_keeps_twenty_samples() {
    let aggregator = SensorSeriesAggregator::default();
    assert_eq!(aggregator.capacity(), 20);
    assert!(aggregator.is_empty());
}

#[test]
fn window_evicts_oldest_first() {
    let mut window = SeriesWindow::with_capacity(3).unwrap();
    for label in ["a", "b", "c"] {
        assert!(window.push(AggregatedSample::empty(label)).is_none());
    }
    assert!(window.is_full());

    let evicted = window.push(AggregatedSample::empty("d")).unwrap();
    assert_eq!(evicted.label, "a");

    let labels: Vec<_> = window.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["b", "c", "d"]);
    assert_eq!(window.latest().unwrap().label, "d");
}

#[test]
fn two_batch_scenario_with_capacity_two() {
    let mut aggregator = SensorSeriesAggregator::with_capacity(2).unwrap();
    aggregator.ingest(&[reading("d1", 20.0, 10.0, 1500.0)], "t1");
    aggregator.ingest(&[reading("d1", 40.0, 100.0, 800.0)], "t2");

    assert_eq!(aggregator.raw_series(SensorField::Temperature), [20.0, 40.0]);
    assert_eq!(aggregator.combined_risk_series().flame, [0, 100]);
    assert_eq!(aggregator.combined_risk_series().smoke, [5, 50]);
    assert_eq!(aggregator.labels(), ["t1", "t2"]);
}

#[test]
fn series_length_is_capped_after_many_batches() {
    let mut aggregator = SensorSeriesAggregator::with_capacity(4).unwrap();
    for i in 0..10 {
        let t = f64::from(i);
        aggregator.ingest(&[reading("d1", t, 0.0, 1500.0)], format!("t{i}"));
    }

    assert_eq!(aggregator.len(), 4);
    assert_eq!(
        aggregator.raw_series(SensorField::Temperature),
        [6.0, 7.0, 8.0, 9.0]
    );
    assert_eq!(aggregator.labels(), ["t6", "t7", "t8", "t9"]);
}

#[test]
fn batch_is_averaged_across_devices() {
    let mut aggregator = SensorSeriesAggregator::default();
    let mut a = reading("a", 20.0, 10.0, 1000.0);
    a.humidity = Some(40.0);
    a.light_level = Some(300.0);
    let mut b = reading("b", 30.0, 30.0, 1400.0);
    b.humidity = Some(60.0);

    let sample = aggregator.ingest(&[a, b], "t1");

    assert_eq!(sample.contributors, 2);
    assert_eq!(sample.avg_temperature_c, 25.0);
    assert_eq!(sample.avg_smoke, 20.0);
    assert_eq!(sample.avg_flame_raw, 1200.0);
    assert_eq!(sample.avg_humidity_pct, 50.0);
    // Missing light on one contributor counts as zero
    assert_eq!(sample.avg_light, 150.0);
}

#[test]
fn empty_batch_produces_all_zero_sample() {
    let mut aggregator = SensorSeriesAggregator::default();
    let sample = aggregator.ingest(&[], "t1");

    assert_eq!(sample, AggregatedSample::empty("t1"));
    assert_eq!(sample.contributors, 0);
    assert_eq!(aggregator.len(), 1);
}

#[test]
fn devices_without_core_readings_are_excluded() {
    let mut aggregator = SensorSeriesAggregator::default();
    let missing_smoke = DeviceSnapshot {
        temperature: Some(99.0),
        ..DeviceSnapshot::new("x")
    };
    let nan_temperature = reading("y", f64::NAN, 10.0, 1000.0);
    let infinite_smoke = reading("z", 10.0, f64::INFINITY, 1000.0);
    let valid = reading("ok", 24.0, 12.0, 1300.0);

    let sample = aggregator.ingest(
        &[missing_smoke, nan_temperature, infinite_smoke, valid],
        "t1",
    );

    assert_eq!(sample.contributors, 1);
    assert_eq!(sample.avg_temperature_c, 24.0);
    assert_eq!(sample.avg_smoke, 12.0);
    assert_all_finite(&sample);
}

#[test]
fn only_invalid_devices_produce_zero_sample() {
    let mut aggregator = SensorSeriesAggregator::default();
    let sample = aggregator.ingest(&[DeviceSnapshot::new("a"), DeviceSnapshot::new("b")], "t1");

    assert_eq!(sample.contributors, 0);
    assert_eq!(sample.avg_temperature_c, 0.0);
    assert_eq!(sample.avg_flame_raw, 0.0);
}

#[test]
fn non_finite_optional_channels_count_as_zero() {
    let mut aggregator = SensorSeriesAggregator::default();
    let mut device = reading("a", 20.0, 10.0, f64::NAN);
    device.humidity = Some(f64::NEG_INFINITY);

    let sample = aggregator.ingest(&[device], "t1");

    assert_eq!(sample.contributors, 1);
    assert_eq!(sample.avg_flame_raw, 0.0);
    assert_eq!(sample.avg_humidity_pct, 0.0);
    assert_all_finite(&sample);
}

#[test]
fn extreme_readings_average_to_their_true_mean() {
    let mut aggregator = SensorSeriesAggregator::default();
    let sample = aggregator.ingest(
        &[reading("a", 1e308, 1.0, 1.0), reading("b", 1e308, 3.0, 1.0)],
        "t1",
    );
    assert_eq!(sample.avg_temperature_c, 1e308);
    assert_eq!(sample.avg_smoke, 2.0);

    let sample = aggregator.ingest(
        &[reading("a", f64::MAX, 1.0, 1.0), reading("b", f64::MAX, 1.0, 1.0)],
        "t2",
    );
    assert_eq!(sample.avg_temperature_c, f64::MAX);

    let sample = aggregator.ingest(
        &[reading("a", 1e308, 1.0, 1.0), reading("b", -1e308, 1.0, 1.0)],
        "t3",
    );
    assert_eq!(sample.avg_temperature_c, 0.0);
    assert_all_finite(&sample);
}

#[test]
fn mean_of_three_contributors() {
    let mut aggregator = SensorSeriesAggregator::default();
    let sample = aggregator.ingest(
        &[
            reading("a", 10.0, 4.0, 900.0),
            reading("b", 20.0, 8.0, 1200.0),
            reading("c", 30.0, 12.0, 1500.0),
        ],
        "t1",
    );
    assert_eq!(sample.contributors, 3);
    assert!((sample.avg_temperature_c - 20.0).abs() < 1e-9);
    assert!((sample.avg_smoke - 8.0).abs() < 1e-9);
    assert!((sample.avg_flame_raw - 1200.0).abs() < 1e-9);
}

#[test]
fn flame_risk_is_inverted_and_saturates() {
    assert_eq!(flame_risk(800.0), 100);
    assert_eq!(flame_risk(1500.0), 0);
    assert_eq!(flame_risk(1150.0), 50);
    assert_eq!(flame_risk(2000.0), 0);
    assert_eq!(flame_risk(100.0), 100);
}

#[test]
fn temperature_and_smoke_risk_saturate() {
    assert_eq!(temperature_risk(30.0), 50);
    assert_eq!(temperature_risk(90.0), 100);
    assert_eq!(temperature_risk(-10.0), 0);
    assert_eq!(smoke_risk(100.0), 50);
    assert_eq!(smoke_risk(1000.0), 100);
}

#[test]
fn risk_of_non_finite_input_is_defined() {
    assert_eq!(temperature_risk(f64::NAN), 0);
    assert_eq!(smoke_risk(f64::INFINITY), 0);
    // Non-finite flame is read as 0, the strongest flame signal
    assert_eq!(flame_risk(f64::NAN), 100);
}

#[test]
fn risk_rounds_to_nearest_integer() {
    // 1.62 / 60 * 100 = 2.7, 1.44 / 60 * 100 = 2.4
    assert_eq!(temperature_risk(1.62), 3);
    assert_eq!(temperature_risk(1.44), 2);
    // (1500 - 1493) / 700 * 100 = 1
    assert_eq!(flame_risk(1493.0), 1);
}

#[test]
fn switching_views_preserves_raw_series() {
    let mut aggregator = SensorSeriesAggregator::default();
    aggregator.ingest(&[reading("a", 21.37, 13.3, 1234.5)], "t1");
    aggregator.ingest(&[reading("a", 22.11, 14.9, 1111.1)], "t2");

    let before = aggregator.project(ChartView::Temperature);
    let combined = aggregator.project(ChartView::Combined);
    let after = aggregator.project(ChartView::Temperature);

    assert!(matches!(combined, ChartProjection::Combined { .. }));
    assert_eq!(before, after);
    match after {
        ChartProjection::Raw { field, values, .. } => {
            assert_eq!(field, SensorField::Temperature);
            assert_eq!(values, [21.37, 22.11]);
        }
        other => panic!("expected raw projection, got {other:?}"),
    }
}

#[test]
fn every_projection_shares_window_labels() {
    let mut aggregator = SensorSeriesAggregator::default();
    aggregator.ingest(&[reading("a", 20.0, 10.0, 1500.0)], "10:00:00");
    aggregator.ingest(&[], "10:00:10");

    for view in ChartView::ALL {
        assert_eq!(aggregator.project(view).labels(), ["10:00:00", "10:00:10"]);
    }
}

#[test]
fn view_selector_reaches_every_view_from_every_view() {
    let mut selector = ViewSelector::default();
    assert_eq!(selector.current(), ChartView::Combined);

    for from in ChartView::ALL {
        for to in ChartView::ALL {
            selector.select(from);
            assert_eq!(selector.select(to), from);
            assert_eq!(selector.current(), to);
        }
    }
}

#[test]
fn view_and_field_names_parse() {
    assert_eq!("combined".parse::<ChartView>().unwrap(), ChartView::Combined);
    assert_eq!(" Light ".parse::<ChartView>().unwrap(), ChartView::Light);
    assert_eq!(
        "pressure".parse::<ChartView>().unwrap_err(),
        SeriesError::UnknownView("pressure".to_string())
    );

    assert_eq!("SMOKE".parse::<SensorField>().unwrap(), SensorField::Smoke);
    assert!(matches!(
        "co2".parse::<SensorField>(),
        Err(SeriesError::UnknownField(_))
    ));
}

#[test]
fn axis_metadata_per_view() {
    assert_eq!(ChartView::Combined.axis().max, 100.0);
    assert_eq!(ChartView::Temperature.axis().max, 60.0);
    assert_eq!(ChartView::Smoke.axis().max, 2000.0);
    assert_eq!(ChartView::Flame.axis().max, 2000.0);
    assert_eq!(ChartView::Humidity.axis().max, 100.0);
    assert_eq!(ChartView::Light.axis().max, 5000.0);
    assert_eq!(ChartView::Combined.raw_field(), None);
    assert_eq!(ChartView::Flame.raw_field(), Some(SensorField::Flame));
}

#[test]
fn returned_series_are_copies() {
    let mut aggregator = SensorSeriesAggregator::default();
    aggregator.ingest(&[reading("a", 20.0, 10.0, 1500.0)], "t1");

    let mut values = aggregator.raw_series(SensorField::Temperature);
    values[0] = 999.0;
    let mut samples = aggregator.samples();
    samples.clear();

    assert_eq!(aggregator.raw_series(SensorField::Temperature), [20.0]);
    assert_eq!(aggregator.len(), 1);
}
