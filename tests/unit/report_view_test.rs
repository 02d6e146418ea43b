//! Unit tests for the report aggregation view.

use rstest::rstest;

use trackerlens::managers::global_stats_manager::GlobalStatsManager;
use trackerlens::services::report_view::{build_report, format_number, percent_sites_tracked, ranked_trackers};
use trackerlens::types::stats::GlobalStats;
use trackerlens::types::tracker::TrackerCategory;

fn stats_with(sightings: &[(&str, &str, bool)]) -> GlobalStats {
    let mut stats = GlobalStats::default();
    for (i, (tracker, site, known)) in sightings.iter().enumerate() {
        GlobalStatsManager::apply_sighting(&mut stats, tracker, site, *known, i as i64);
    }
    stats
}

#[rstest]
#[case(0, "0")]
#[case(999, "999")]
#[case(1_000, "1.0K")]
#[case(1_260, "1.3K")]
#[case(45_600, "45.6K")]
#[case(999_999, "1000.0K")]
#[case(1_000_000, "1.0M")]
#[case(2_345_678, "2.3M")]
fn test_format_number(#[case] value: u64, #[case] expected: &str) {
    assert_eq!(format_number(value), expected);
}

#[test]
fn test_empty_stats_report() {
    let report = build_report(&GlobalStats::default());
    assert_eq!(report.total_trackers, 0);
    assert_eq!(report.percent_sites_tracked, 0);
    assert_eq!(report.total_requests_display, "0");
    assert!(report.top_tracker.is_none());
    assert!(report.trackers.is_empty());
}

#[test]
fn test_ranking_by_site_reach_then_domain() {
    let stats = stats_with(&[
        ("b-tracker.io", "one.com", false),
        ("a-tracker.io", "one.com", false),
        ("ad.doubleclick.net", "one.com", true),
        ("ad.doubleclick.net", "two.com", true),
        ("ad.doubleclick.net", "two.com", true),
    ]);
    let rows = ranked_trackers(&stats);
    let domains: Vec<&str> = rows.iter().map(|r| r.domain.as_str()).collect();
    assert_eq!(domains, vec!["ad.doubleclick.net", "a-tracker.io", "b-tracker.io"]);
    assert_eq!(rows[0].sites, 2);
    assert_eq!(rows[0].count, 3);
    assert_eq!(rows[0].category, TrackerCategory::Advertising);
    assert!(rows[0].is_known);
    assert_eq!(rows[1].category, TrackerCategory::Unknown);
}

#[test]
fn test_top_tracker_is_widest_reach() {
    let stats = stats_with(&[
        ("connect.facebook.net", "a.com", true),
        ("connect.facebook.net", "b.com", true),
        ("static.hotjar.com", "a.com", true),
    ]);
    let report = build_report(&stats);
    assert_eq!(report.top_tracker.unwrap().domain, "connect.facebook.net");
    assert_eq!(report.total_trackers, 2);
}

#[test]
fn test_percent_sites_tracked() {
    let mut stats = stats_with(&[("t.io", "a.com", false)]);
    stats.websites_visited.insert("b.com".to_string());
    stats.websites_visited.insert("c.com".to_string());
    assert_eq!(percent_sites_tracked(&stats), 33);

    stats.websites_visited.insert("d.com".to_string());
    assert_eq!(percent_sites_tracked(&stats), 25);
}

#[test]
fn test_report_formats_totals() {
    let mut stats = GlobalStats::default();
    stats.total_requests = 12_345;
    stats.total_cookies = 7;
    let report = build_report(&stats);
    assert_eq!(report.total_requests_display, "12.3K");
    assert_eq!(report.total_cookies_display, "7");
}

#[test]
fn test_top_limits_rows() {
    let sightings: Vec<(String, &str, bool)> = (0..15)
        .map(|i| (format!("t{:02}.io", i), "a.com", false))
        .collect();
    let borrowed: Vec<(&str, &str, bool)> =
        sightings.iter().map(|(t, s, k)| (t.as_str(), *s, *k)).collect();
    let report = build_report(&stats_with(&borrowed));
    assert_eq!(report.top(10).len(), 10);
    assert_eq!(report.top(100).len(), 15);
    assert_eq!(report.top(10)[0].domain, "t00.io");
}
