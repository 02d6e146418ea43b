//! Unit tests for root-domain reduction, allow-listing and registry classification.

use rstest::rstest;

use trackerlens::services::domain_classifier::{
    category_of, classify, is_allow_listed, lookup, root_domain, TRACKER_REGISTRY,
};
use trackerlens::types::tracker::TrackerCategory;

#[rstest]
#[case("a.b.co.uk", "b.co.uk")]
#[case("example.com", "example.com")]
#[case("x", "x")]
#[case("www.example.com", "example.com")]
#[case("deep.sub.example.org", "example.org")]
#[case("shop.example.com.au", "example.com.au")]
#[case("a.b.gov.br", "b.gov.br")]
#[case("", "")]
fn test_root_domain(#[case] host: &str, #[case] expected: &str) {
    assert_eq!(root_domain(host), expected);
}

#[test]
fn test_root_domain_heuristic_keeps_three_labels_for_com_second_level() {
    // "com" as the second-to-last label always keeps three labels.
    assert_eq!(root_domain("tracker.com.evil"), "tracker.com.evil");
}

#[test]
fn test_classify_google_analytics() {
    let info = classify("foo.google-analytics.com").expect("should classify");
    assert_eq!(info.name, "Google Analytics");
    assert_eq!(info.category, TrackerCategory::Analytics);
}

#[test]
fn test_classify_allow_listed_is_none() {
    assert!(classify("fonts.gstatic.com").is_none());
    assert!(classify("www.gstatic.com").is_none());
    assert!(classify("github.githubassets.com").is_none());
}

#[rstest]
#[case("ad.doubleclick.net", "Google Ads", TrackerCategory::Advertising)]
#[case("pagead2.googlesyndication.com", "Google Ads", TrackerCategory::Advertising)]
#[case("connect.facebook.net", "Facebook Pixel", TrackerCategory::Social)]
#[case("www.facebook.com", "Facebook", TrackerCategory::Social)]
#[case("cdn.segment.com", "Segment", TrackerCategory::Analytics)]
#[case("api.segment.io", "Segment", TrackerCategory::Analytics)]
#[case("bat.bing.com", "Bing Ads", TrackerCategory::Advertising)]
#[case("static.hotjar.com", "Hotjar", TrackerCategory::Analytics)]
fn test_classify_known_trackers(
    #[case] host: &str,
    #[case] name: &str,
    #[case] category: TrackerCategory,
) {
    let info = classify(host).unwrap_or_else(|| panic!("{} should classify", host));
    assert_eq!(info.name, name);
    assert_eq!(info.category, category);
}

#[test]
fn test_classify_is_substring_based() {
    // Containment, not suffix matching: a lookalike host still matches.
    let info = classify("hotjar.com.example.net").unwrap();
    assert_eq!(info.name, "Hotjar");
}

#[test]
fn test_first_registry_match_wins() {
    // Contains both "statcounter.com" and "hotjar.com"; statcounter is listed first.
    let entry = lookup("statcounter.com.hotjar.com").unwrap();
    assert_eq!(entry.name, "StatCounter");
}

#[test]
fn test_classify_unknown_and_empty_hosts() {
    assert!(classify("cdn.example.com").is_none());
    assert!(classify("").is_none());
}

#[test]
fn test_classify_is_case_insensitive() {
    assert_eq!(classify("AD.DOUBLECLICK.NET").unwrap().name, "Google Ads");
}

#[test]
fn test_allow_list_suffix_rules() {
    assert!(is_allow_listed("fonts.gstatic.com"));
    assert!(is_allow_listed("a.fonts.gstatic.com"));
    assert!(!is_allow_listed("gstatic.com"));
    assert!(!is_allow_listed("notgithub.githubassets.com"));
}

#[test]
fn test_category_of_falls_back_to_unknown() {
    assert_eq!(category_of("ad.doubleclick.net"), TrackerCategory::Advertising);
    assert_eq!(category_of("unlisted.example"), TrackerCategory::Unknown);
}

#[test]
fn test_registry_order_and_size() {
    assert_eq!(TRACKER_REGISTRY.len(), 36);
    assert_eq!(TRACKER_REGISTRY[0].match_domain, "statcounter.com");
    assert_eq!(TRACKER_REGISTRY[35].match_domain, "bing.com");
}
