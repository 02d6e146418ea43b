use serde::{Deserialize, Serialize};

/// Top-level monitor settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MonitorSettings {
    #[serde(default)]
    pub limits: LogLimits,
    #[serde(default)]
    pub debounce: DebounceWindows,
    #[serde(default)]
    pub thresholds: SeverityThresholds,
    #[serde(default)]
    pub advisories: AdvisorySettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Maximum retained length of each log category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogLimits {
    pub network_requests: usize,
    pub cookies: usize,
    pub geolocation_attempts: usize,
    pub fingerprinting_attempts: usize,
    pub form_data: usize,
}

impl Default for LogLimits {
    fn default() -> Self {
        Self {
            network_requests: 500,
            cookies: 500,
            geolocation_attempts: 500,
            fingerprinting_attempts: 500,
            form_data: 200,
        }
    }
}

/// Debounce windows in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebounceWindows {
    /// Per tab, regardless of method.
    pub geolocation_ms: i64,
    /// Per tab and method.
    pub fingerprint_ms: i64,
    /// Per tab, `input` actions only.
    pub form_input_ms: i64,
}

impl Default for DebounceWindows {
    fn default() -> Self {
        Self {
            geolocation_ms: 5_000,
            fingerprint_ms: 2_000,
            form_input_ms: 5_000,
        }
    }
}

/// Warning/alert pair for one count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Threshold {
    pub warning: u64,
    pub alert: u64,
}

impl Threshold {
    pub const fn new(warning: u64, alert: u64) -> Self {
        Self { warning, alert }
    }
}

/// Severity thresholds for the per-tab counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeverityThresholds {
    pub requests: Threshold,
    pub cookies: Threshold,
    pub third_party_cookies: Threshold,
    pub geolocation: Threshold,
    pub forms: Threshold,
    pub fingerprinting: Threshold,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            requests: Threshold::new(100, 200),
            cookies: Threshold::new(10, 30),
            third_party_cookies: Threshold::new(3, 10),
            geolocation: Threshold::new(1, 1),
            forms: Threshold::new(5, 10),
            fingerprinting: Threshold::new(1, 3),
        }
    }
}

/// Counts above which volume advisories are raised.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdvisorySettings {
    pub third_party_cookies_above: usize,
    pub third_party_requests_above: usize,
}

impl Default for AdvisorySettings {
    fn default() -> Self {
        Self {
            third_party_cookies_above: 5,
            third_party_requests_above: 50,
        }
    }
}

/// Presentation settings for the popup and report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    pub tracker_preview_limit: usize,
    pub report_top_limit: usize,
    /// Refresh cadence expected from polling clients.
    pub poll_interval_ms: u64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            tracker_preview_limit: 4,
            report_top_limit: 10,
            poll_interval_ms: 2_000,
        }
    }
}
