//! Report view over the global statistics.

use std::collections::BTreeSet;

use super::domain_classifier::category_of;
use crate::types::stats::GlobalStats;
use crate::types::view::{ReportSummary, TrackerRow};

/// Formats a total for display: `1.2M`, `3.4K` or the plain integer.
pub fn format_number(value: u64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

/// Percentage of visited sites on which at least one tracker was seen,
/// rounded to the nearest integer. Zero when no site was visited.
pub fn percent_sites_tracked(stats: &GlobalStats) -> u32 {
    let visited = stats.websites_visited.len();
    if visited == 0 {
        return 0;
    }
    let tracked: BTreeSet<&str> = stats
        .trackers
        .values()
        .flat_map(|record| record.sites.iter().map(String::as_str))
        .collect();
    ((tracked.len() as f64 / visited as f64) * 100.0).round() as u32
}

/// Tracker rows sorted by site reach, most widespread first. Ties are
/// broken by domain name so the order is reproducible.
pub fn ranked_trackers(stats: &GlobalStats) -> Vec<TrackerRow> {
    let mut rows: Vec<TrackerRow> = stats
        .trackers
        .iter()
        .map(|(domain, record)| TrackerRow {
            domain: domain.clone(),
            category: category_of(domain),
            count: record.count,
            sites: record.sites.len(),
            is_known: record.is_known,
            first_seen: record.first_seen,
            last_seen: record.last_seen,
        })
        .collect();
    rows.sort_by(|a, b| b.sites.cmp(&a.sites).then_with(|| a.domain.cmp(&b.domain)));
    rows
}

/// Builds the full report projection.
pub fn build_report(stats: &GlobalStats) -> ReportSummary {
    let trackers = ranked_trackers(stats);
    let total_trackers = trackers.len();
    ReportSummary {
        total_trackers,
        total_trackers_display: format_number(total_trackers as u64),
        percent_sites_tracked: percent_sites_tracked(stats),
        total_requests: stats.total_requests,
        total_requests_display: format_number(stats.total_requests),
        total_cookies: stats.total_cookies,
        total_cookies_display: format_number(stats.total_cookies),
        top_tracker: trackers.first().cloned(),
        trackers,
    }
}
