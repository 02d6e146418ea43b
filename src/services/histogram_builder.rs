//! Time-bucket histogram for the per-tab request activity chart.
//!
//! The bucket width follows the observed span: hourly for short sessions,
//! four-hourly within a day, daily within a week. Spans beyond a week use a
//! fixed seven daily buckets ending today, and anything older is clamped
//! into the first bucket. Bucket starts are aligned to multiples of the
//! width so boundaries stay stable between refreshes.

use chrono::{DateTime, Utc};

use crate::types::errors::HistogramError;
use crate::types::log::LogEntry;
use crate::types::view::Histogram;

pub const HOUR_MS: i64 = 60 * 60 * 1000;
pub const FOUR_HOURS_MS: i64 = 4 * HOUR_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Number of daily buckets used once the span exceeds a week.
pub const OVERFLOW_BUCKETS: usize = 7;

/// Bucket width chosen for a given span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPlan {
    Hourly,
    FourHourly,
    Daily,
    /// Fixed seven daily buckets ending with the current day.
    LastWeek,
}

impl BucketPlan {
    /// Picks the plan for a span of `duration_ms`.
    pub fn for_duration(duration_ms: i64) -> Self {
        if duration_ms <= FOUR_HOURS_MS {
            BucketPlan::Hourly
        } else if duration_ms <= DAY_MS {
            BucketPlan::FourHourly
        } else if duration_ms <= WEEK_MS {
            BucketPlan::Daily
        } else {
            BucketPlan::LastWeek
        }
    }

    pub fn width_ms(&self) -> i64 {
        match self {
            BucketPlan::Hourly => HOUR_MS,
            BucketPlan::FourHourly => FOUR_HOURS_MS,
            BucketPlan::Daily | BucketPlan::LastWeek => DAY_MS,
        }
    }
}

fn align_down(ts: i64, width: i64) -> Result<i64, HistogramError> {
    ts.div_euclid(width)
        .checked_mul(width)
        .ok_or(HistogramError::TimestampOutOfRange(ts))
}

/// Formats the label of a bucket starting at `start`.
///
/// Sub-day buckets show the time of day (`HH:MM`, 24h), daily buckets the
/// month and day (`M/D`). Times are rendered in UTC.
pub fn bucket_label(start: i64, width: i64) -> Result<String, HistogramError> {
    let instant =
        DateTime::<Utc>::from_timestamp_millis(start).ok_or(HistogramError::TimestampOutOfRange(start))?;
    let label = if width < DAY_MS {
        instant.format("%H:%M").to_string()
    } else {
        instant.format("%-m/%-d").to_string()
    };
    Ok(label)
}

/// Buckets `entries` by timestamp relative to `now`.
///
/// Every entry lands in exactly one bucket, so the bucket counts always sum
/// to `entries.len()`.
pub fn build_histogram<T: LogEntry>(entries: &[T], now: i64) -> Result<Histogram, HistogramError> {
    let earliest = entries
        .iter()
        .map(LogEntry::timestamp)
        .min()
        .unwrap_or_else(|| now.saturating_sub(HOUR_MS));
    let plan = BucketPlan::for_duration(now.saturating_sub(earliest));
    let width = plan.width_ms();

    let (start, bucket_count) = match plan {
        BucketPlan::LastWeek => {
            let today = align_down(now, width)?;
            let start = today
                .checked_sub((OVERFLOW_BUCKETS as i64 - 1) * width)
                .ok_or(HistogramError::TimestampOutOfRange(now))?;
            (start, OVERFLOW_BUCKETS)
        }
        _ => {
            let start = align_down(earliest, width)?;
            let span = now.saturating_sub(start);
            let count = span.div_euclid(width).saturating_add(1).max(1);
            (start, count as usize)
        }
    };

    let mut counts = vec![0u64; bucket_count];
    let last = bucket_count as i64 - 1;
    for entry in entries {
        let offset = entry.timestamp().saturating_sub(start);
        let index = offset.div_euclid(width).clamp(0, last);
        counts[index as usize] += 1;
    }

    let labels = (0..bucket_count as i64)
        .map(|i| {
            let bucket_start = i
                .checked_mul(width)
                .and_then(|o| start.checked_add(o))
                .ok_or(HistogramError::TimestampOutOfRange(start))?;
            bucket_label(bucket_start, width)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Histogram {
        counts,
        labels,
        bucket_width_ms: width,
        start,
    })
}
