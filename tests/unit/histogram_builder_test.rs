//! Unit tests for the time-bucket histogram builder.

use rstest::rstest;

use trackerlens::services::histogram_builder::{
    bucket_label, build_histogram, BucketPlan, DAY_MS, FOUR_HOURS_MS, HOUR_MS, WEEK_MS,
};
use trackerlens::types::errors::HistogramError;
use trackerlens::types::event::TabId;
use trackerlens::types::log::NetworkRequestEntry;

fn entry_at(ts: i64) -> NetworkRequestEntry {
    NetworkRequestEntry {
        id: format!("req-{}", ts),
        url: "https://cdn.example.com/a.js".to_string(),
        resource_type: "script".to_string(),
        initiator: None,
        tab_id: TabId(1),
        timestamp: ts,
        is_third_party: false,
        tracker_info: None,
    }
}

fn entries(timestamps: &[i64]) -> Vec<NetworkRequestEntry> {
    timestamps.iter().copied().map(entry_at).collect()
}

#[rstest]
#[case(0, BucketPlan::Hourly)]
#[case(2 * HOUR_MS, BucketPlan::Hourly)]
#[case(FOUR_HOURS_MS, BucketPlan::Hourly)]
#[case(5 * HOUR_MS, BucketPlan::FourHourly)]
#[case(DAY_MS, BucketPlan::FourHourly)]
#[case(3 * DAY_MS, BucketPlan::Daily)]
#[case(WEEK_MS, BucketPlan::Daily)]
#[case(30 * DAY_MS, BucketPlan::LastWeek)]
fn test_plan_for_duration(#[case] duration: i64, #[case] expected: BucketPlan) {
    assert_eq!(BucketPlan::for_duration(duration), expected);
}

#[test]
fn test_two_hour_span_uses_hourly_buckets() {
    let log = entries(&[0, 30 * 60 * 1000, HOUR_MS + 1, 2 * HOUR_MS]);
    let histogram = build_histogram(&log, 2 * HOUR_MS).unwrap();

    assert_eq!(histogram.bucket_width_ms, HOUR_MS);
    assert!(histogram.counts.len() >= 2);
    assert_eq!(histogram.counts, vec![2, 1, 1]);
    assert_eq!(histogram.labels, vec!["00:00", "01:00", "02:00"]);
    assert_eq!(histogram.total(), 4);
}

#[test]
fn test_start_is_aligned_down_to_width() {
    let start = 3 * HOUR_MS + 17 * 60 * 1000;
    let log = entries(&[start]);
    let histogram = build_histogram(&log, start + 10 * 60 * 1000).unwrap();
    assert_eq!(histogram.start, 3 * HOUR_MS);
    assert_eq!(histogram.labels, vec!["03:00"]);
}

#[test]
fn test_four_hour_buckets_within_a_day() {
    let log = entries(&[0, 5 * HOUR_MS, 9 * HOUR_MS]);
    let histogram = build_histogram(&log, 10 * HOUR_MS).unwrap();
    assert_eq!(histogram.bucket_width_ms, FOUR_HOURS_MS);
    assert_eq!(histogram.counts, vec![1, 1, 1]);
    assert_eq!(histogram.labels, vec!["00:00", "04:00", "08:00"]);
}

#[test]
fn test_daily_buckets_use_month_day_labels() {
    let log = entries(&[0, DAY_MS + 5, 3 * DAY_MS]);
    let histogram = build_histogram(&log, 3 * DAY_MS).unwrap();
    assert_eq!(histogram.bucket_width_ms, DAY_MS);
    assert_eq!(histogram.labels, vec!["1/1", "1/2", "1/3", "1/4"]);
    assert_eq!(histogram.counts, vec![1, 1, 0, 1]);
}

#[test]
fn test_spans_over_a_week_clamp_into_first_bucket() {
    let now = 10 * DAY_MS + 5 * HOUR_MS;
    let log = entries(&[0, 2 * DAY_MS, 9 * DAY_MS, now]);
    let histogram = build_histogram(&log, now).unwrap();

    assert_eq!(histogram.counts.len(), 7);
    assert_eq!(histogram.start, 4 * DAY_MS);
    assert_eq!(histogram.labels[0], "1/5");
    assert_eq!(histogram.labels[6], "1/11");
    assert_eq!(histogram.counts[0], 2);
    assert_eq!(histogram.counts[5], 1);
    assert_eq!(histogram.counts[6], 1);
    assert_eq!(histogram.total(), 4);
}

#[test]
fn test_empty_log_covers_the_last_hour() {
    let now = 5 * HOUR_MS + 30 * 60 * 1000;
    let histogram = build_histogram::<NetworkRequestEntry>(&[], now).unwrap();
    assert_eq!(histogram.bucket_width_ms, HOUR_MS);
    assert_eq!(histogram.counts, vec![0, 0]);
    assert_eq!(histogram.total(), 0);
}

#[test]
fn test_future_timestamps_land_in_last_bucket() {
    let log = entries(&[0, 5 * HOUR_MS]);
    let histogram = build_histogram(&log, HOUR_MS).unwrap();
    assert_eq!(histogram.counts, vec![1, 1]);
}

#[test]
fn test_unrepresentable_instant_is_an_error() {
    let result = build_histogram::<NetworkRequestEntry>(&[], i64::MAX);
    assert!(matches!(result, Err(HistogramError::TimestampOutOfRange(_))));
}

#[test]
fn test_bucket_label_formats() {
    assert_eq!(bucket_label(13 * HOUR_MS, HOUR_MS).unwrap(), "13:00");
    assert_eq!(bucket_label(40 * DAY_MS, DAY_MS).unwrap(), "2/10");
}
