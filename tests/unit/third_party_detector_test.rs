//! Unit tests for third-party detection and URL host resolution.

use rstest::rstest;

use trackerlens::services::third_party_detector::{host_from_url, is_third_party, PartyContext};

#[rstest]
#[case("ads.example.com", Some("shop.example.com"), false)]
#[case("tracker.io", Some("shop.example.com"), true)]
#[case("example.com", Some("example.com"), false)]
#[case("cdn.b.co.uk", Some("www.b.co.uk"), false)]
#[case("cdn.a.co.uk", Some("www.b.co.uk"), true)]
#[case("tracker.io", None, false)]
#[case("tracker.io", Some(""), false)]
fn test_is_third_party(#[case] resource: &str, #[case] initiator: Option<&str>, #[case] expected: bool) {
    assert_eq!(is_third_party(resource, initiator), expected);
}

#[test]
fn test_host_from_url_lowercases() {
    assert_eq!(
        host_from_url("https://Ad.DoubleClick.NET/pixel?x=1"),
        Some("ad.doubleclick.net".to_string())
    );
}

#[rstest]
#[case("not a url")]
#[case("")]
#[case("about:blank")]
#[case("data:text/plain,hello")]
fn test_host_from_url_without_host(#[case] url: &str) {
    assert_eq!(host_from_url(url), None);
}

#[test]
fn test_party_context_third_party() {
    let party = PartyContext::resolve(
        "https://ad.doubleclick.net/x",
        Some("https://news.example.com/article"),
    );
    assert_eq!(party.resource_host.as_deref(), Some("ad.doubleclick.net"));
    assert_eq!(party.initiator_host.as_deref(), Some("news.example.com"));
    assert!(party.is_third_party);
}

#[test]
fn test_party_context_malformed_urls_degrade() {
    let party = PartyContext::resolve("::garbage::", Some("https://news.example.com"));
    assert_eq!(party.resource_host, None);
    assert!(!party.is_third_party);

    let party = PartyContext::resolve("https://tracker.io/a", Some("::garbage::"));
    assert_eq!(party.initiator_host, None);
    assert!(!party.is_third_party);
}
