use serde::{Deserialize, Serialize};

use super::tracker::TrackerCategory;

/// Request counts bucketed over time for the activity bar chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Histogram {
    pub counts: Vec<u64>,
    pub labels: Vec<String>,
    pub bucket_width_ms: i64,
    /// Start instant of the first bucket, aligned to the bucket width.
    pub start: i64,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Severity shown next to a per-tab count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Nothing observed.
    Safe,
    /// Observed, but below the warning threshold.
    Neutral,
    Warning,
    Alert,
}

/// A per-tab count together with its severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountLevel {
    pub count: u64,
    pub severity: Severity,
}

/// Per-tab counts for every log category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabCounts {
    pub requests: CountLevel,
    pub cookies: CountLevel,
    pub third_party_cookies: CountLevel,
    pub geolocation: CountLevel,
    pub forms: CountLevel,
    pub fingerprinting: CountLevel,
}

/// How serious an advisory is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryLevel {
    Danger,
    Warning,
    Info,
}

/// What an advisory is about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Fingerprinting,
    InsecureConnection,
    Geolocation,
    ThirdPartyCookies,
    TrackerSummary,
    HighRequestVolume,
    FormMonitoring,
}

/// A human-readable privacy advisory for the current tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub level: AdvisoryLevel,
    pub text: String,
}

/// A tracker detected on the current tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DetectedTracker {
    pub name: String,
    pub category: TrackerCategory,
}

/// Everything the popup shows for one tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PopupSummary {
    pub current_site: Option<String>,
    pub counts: TabCounts,
    /// First few detected trackers, in detection order.
    pub tracker_preview: Vec<DetectedTracker>,
    pub total_trackers: usize,
    pub advisories: Vec<Advisory>,
    /// `None` when the histogram could not be built; the section is hidden.
    pub histogram: Option<Histogram>,
}

/// One row of the report tracker list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerRow {
    pub domain: String,
    pub category: TrackerCategory,
    pub count: u64,
    pub sites: usize,
    pub is_known: bool,
    pub first_seen: i64,
    pub last_seen: i64,
}

/// Projection of the global statistics for the report page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_trackers: usize,
    pub total_trackers_display: String,
    pub percent_sites_tracked: u32,
    pub total_requests: u64,
    pub total_requests_display: String,
    pub total_cookies: u64,
    pub total_cookies_display: String,
    pub top_tracker: Option<TrackerRow>,
    /// Every tracker, sorted by site reach descending then domain ascending.
    pub trackers: Vec<TrackerRow>,
}

impl ReportSummary {
    /// The first `limit` rows of the tracker list.
    pub fn top(&self, limit: usize) -> &[TrackerRow] {
        &self.trackers[..self.trackers.len().min(limit)]
    }
}
