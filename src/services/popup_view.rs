//! Popup view: per-tab counts, severity levels, advisories and the
//! activity histogram for the tab the user is looking at.

use tracing::warn;

use super::histogram_builder::build_histogram;
use super::third_party_detector::host_from_url;
use crate::types::event::FormAction;
use crate::types::log::PerTabLog;
use crate::types::settings::{MonitorSettings, Threshold};
use crate::types::tracker::TrackerCategory;
use crate::types::view::{
    Advisory, AdvisoryKind, AdvisoryLevel, CountLevel, DetectedTracker, PopupSummary, Severity,
    TabCounts,
};

/// Severity of `count` against `threshold`.
///
/// The alert threshold is checked first, so a threshold with equal warning
/// and alert values jumps straight to [`Severity::Alert`].
pub fn severity(count: u64, threshold: Threshold) -> Severity {
    if count >= threshold.alert {
        Severity::Alert
    } else if count >= threshold.warning {
        Severity::Warning
    } else if count == 0 {
        Severity::Safe
    } else {
        Severity::Neutral
    }
}

fn level(count: usize, threshold: Threshold) -> CountLevel {
    let count = count as u64;
    CountLevel {
        count,
        severity: severity(count, threshold),
    }
}

/// Known trackers among the tab's third-party requests, unique by name, in
/// the order they were first seen.
pub fn detected_trackers(log: &PerTabLog) -> Vec<DetectedTracker> {
    let mut detected: Vec<DetectedTracker> = Vec::new();
    for info in log
        .network_requests
        .iter()
        .filter(|r| r.is_third_party)
        .filter_map(|r| r.tracker_info.as_ref())
    {
        if !detected.iter().any(|d| d.name == info.name) {
            detected.push(DetectedTracker {
                name: info.name.clone(),
                category: info.category,
            });
        }
    }
    detected
}

/// Per-tab counts with their severity levels.
pub fn tab_counts(log: &PerTabLog, settings: &MonitorSettings) -> TabCounts {
    let t = &settings.thresholds;
    let third_party_cookies = log.cookies.iter().filter(|c| c.is_third_party).count();
    TabCounts {
        requests: level(log.network_requests.len(), t.requests),
        cookies: level(log.cookies.len(), t.cookies),
        third_party_cookies: level(third_party_cookies, t.third_party_cookies),
        geolocation: level(log.geolocation_attempts.len(), t.geolocation),
        forms: level(log.form_data.len(), t.forms),
        fingerprinting: level(log.fingerprinting_attempts.len(), t.fingerprinting),
    }
}

fn category_summary(trackers: &[DetectedTracker]) -> String {
    let mut counts: Vec<(TrackerCategory, usize)> = Vec::new();
    for tracker in trackers {
        match counts.iter_mut().find(|(category, _)| *category == tracker.category) {
            Some((_, n)) => *n += 1,
            None => counts.push((tracker.category, 1)),
        }
    }
    counts
        .iter()
        .map(|(category, n)| format!("{} {}", n, category))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Advisory messages for the tab, most severe first.
pub fn advisories(
    log: &PerTabLog,
    trackers: &[DetectedTracker],
    current_url: Option<&str>,
    settings: &MonitorSettings,
) -> Vec<Advisory> {
    let mut out = Vec::new();
    let mut push = |kind, level, text: String| out.push(Advisory { kind, level, text });

    if !log.fingerprinting_attempts.is_empty() {
        let mut methods: Vec<&str> = Vec::new();
        for attempt in &log.fingerprinting_attempts {
            if !methods.contains(&attempt.method.as_str()) {
                methods.push(&attempt.method);
            }
        }
        push(
            AdvisoryKind::Fingerprinting,
            AdvisoryLevel::Danger,
            format!(
                "Fingerprinting detected ({}). This site may be creating a unique identifier for your device without cookies.",
                methods.join(", ")
            ),
        );
    }

    if current_url.is_some_and(|url| url.starts_with("http:")) {
        push(
            AdvisoryKind::InsecureConnection,
            AdvisoryLevel::Danger,
            "Insecure connection (HTTP). Your data is not encrypted and could be intercepted.".to_string(),
        );
    }

    if !log.geolocation_attempts.is_empty() {
        push(
            AdvisoryKind::Geolocation,
            AdvisoryLevel::Warning,
            "This site requested your location. It now knows your approximate physical address.".to_string(),
        );
    }

    let third_party_cookies = log.cookies.iter().filter(|c| c.is_third_party).count();
    if third_party_cookies > settings.advisories.third_party_cookies_above {
        push(
            AdvisoryKind::ThirdPartyCookies,
            AdvisoryLevel::Warning,
            format!(
                "{} third-party cookies detected. These can track you across different websites.",
                third_party_cookies
            ),
        );
    }

    if !trackers.is_empty() {
        push(
            AdvisoryKind::TrackerSummary,
            AdvisoryLevel::Info,
            format!(
                "Detected trackers: {}. These companies may share data about your browsing habits.",
                category_summary(trackers)
            ),
        );
    }

    let third_party_requests = log.network_requests.iter().filter(|r| r.is_third_party).count();
    if third_party_requests > settings.advisories.third_party_requests_above {
        push(
            AdvisoryKind::HighRequestVolume,
            AdvisoryLevel::Info,
            format!(
                "{} third-party requests. High background activity often indicates extensive analytics or ad networks.",
                third_party_requests
            ),
        );
    }

    if log.form_data.iter().any(|f| f.action == FormAction::Input) {
        push(
            AdvisoryKind::FormMonitoring,
            AdvisoryLevel::Info,
            "Form input monitoring detected. The site may be tracking what you type, even before submitting.".to_string(),
        );
    }

    out
}

/// Builds the popup summary for one tab's log.
///
/// A histogram that cannot be built is logged and left out; the rest of the
/// summary is still produced.
pub fn build_popup_summary(
    log: &PerTabLog,
    current_url: Option<&str>,
    settings: &MonitorSettings,
    now: i64,
) -> PopupSummary {
    let trackers = detected_trackers(log);
    let histogram = match build_histogram(&log.network_requests, now) {
        Ok(histogram) => Some(histogram),
        Err(e) => {
            warn!(error = %e, "hiding activity histogram");
            None
        }
    };
    let preview_limit = settings.display.tracker_preview_limit;

    PopupSummary {
        current_site: current_url.and_then(host_from_url),
        counts: tab_counts(log, settings),
        tracker_preview: trackers.iter().take(preview_limit).cloned().collect(),
        total_trackers: trackers.len(),
        advisories: advisories(log, &trackers, current_url, settings),
        histogram,
    }
}
