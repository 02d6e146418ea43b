//! Domain classification for TrackerLens.
//!
//! Reduces hostnames to a heuristic registrable root domain and matches them
//! against the static tracker registry, honoring the allow-list.

use crate::types::tracker::{TrackerCategory, TrackerInfo, TrackerRegistryEntry};

use crate::types::tracker::TrackerCategory::{Advertising, Analytics, Social};

const fn entry(
    match_domain: &'static str,
    name: &'static str,
    category: TrackerCategory,
) -> TrackerRegistryEntry {
    TrackerRegistryEntry {
        match_domain,
        name,
        category,
    }
}

/// Known tracking services. Order matters: the first substring match wins,
/// so overlapping entries resolve by position.
pub const TRACKER_REGISTRY: &[TrackerRegistryEntry] = &[
    // Analytics
    entry("statcounter.com", "StatCounter", Analytics),
    entry("matomo.org", "Matomo", Analytics),
    entry("snowplowanalytics.com", "Snowplow", Analytics),
    entry("kissmetrics.com", "Kissmetrics", Analytics),
    entry("heap.io", "Heap Analytics", Analytics),
    entry("fullstory.com", "FullStory", Analytics),
    entry("mouseflow.com", "Mouseflow", Analytics),
    entry("smartlook.com", "Smartlook", Analytics),
    entry("google-analytics.com", "Google Analytics", Analytics),
    entry("googletagmanager.com", "Google Tag Manager", Analytics),
    entry("hotjar.com", "Hotjar", Analytics),
    entry("mixpanel.com", "Mixpanel", Analytics),
    entry("segment.io", "Segment", Analytics),
    entry("segment.com", "Segment", Analytics),
    entry("clarity.ms", "Microsoft Clarity", Analytics),
    entry("omtrdc.net", "Adobe Analytics", Analytics),
    entry("quantserve.com", "Quantcast", Analytics),
    entry("newrelic.com", "New Relic", Analytics),
    entry("sentry.io", "Sentry", Analytics),
    entry("crazyegg.com", "Crazy Egg", Analytics),
    // Social
    entry("facebook.net", "Facebook Pixel", Social),
    entry("facebook.com", "Facebook", Social),
    entry("linkedin.com", "LinkedIn Insight Tag", Social),
    entry("twitter.com", "Twitter/X Pixel", Social),
    entry("tiktok.com", "TikTok Pixel", Social),
    entry("snapchat.com", "Snapchat Pixel", Social),
    entry("pinterest.com", "Pinterest Tag", Social),
    entry("reddit.com", "Reddit Pixel", Social),
    // Advertising
    entry("doubleclick.net", "Google Ads", Advertising),
    entry("googlesyndication.com", "Google Ads", Advertising),
    entry("amazon-adsystem.com", "Amazon Ads", Advertising),
    entry("criteo.com", "Criteo", Advertising),
    entry("adsrvr.org", "The Trade Desk", Advertising),
    entry("taboola.com", "Taboola", Advertising),
    entry("outbrain.com", "Outbrain", Advertising),
    entry("bing.com", "Bing Ads", Advertising),
];

/// Hosts never reported as trackers (static assets and font CDNs).
pub const ALLOW_LIST: &[&str] = &[
    "fonts.gstatic.com",
    "www.gstatic.com",
    "github.githubassets.com",
];

/// Second-level labels that usually form a compound public suffix (`co.uk`).
const COMPOUND_SECOND_LEVEL: &[&str] = &["co", "com", "net", "org", "gov", "edu"];

/// Returns the registrable root of `hostname`.
///
/// Hostnames with at most two labels are returned unchanged. Longer ones keep
/// the last three labels when the second-to-last is a compound suffix
/// indicator, otherwise the last two. This is a heuristic, not a public
/// suffix list: `www.example.co` resolves to `www.example.co`.
pub fn root_domain(hostname: &str) -> String {
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        return hostname.to_string();
    }
    let keep = if COMPOUND_SECOND_LEVEL.contains(&labels[labels.len() - 2]) {
        3
    } else {
        2
    };
    labels[labels.len() - keep..].join(".")
}

/// Whether `hostname` is exempt from tracker classification.
pub fn is_allow_listed(hostname: &str) -> bool {
    let host = hostname.to_lowercase();
    ALLOW_LIST.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Returns the first registry entry matching `hostname`, ignoring the allow-list.
pub fn lookup(hostname: &str) -> Option<&'static TrackerRegistryEntry> {
    let host = hostname.to_lowercase();
    TRACKER_REGISTRY
        .iter()
        .find(|entry| host.contains(entry.match_domain))
}

/// Classifies `hostname` as a known tracker.
///
/// Returns `None` for allow-listed hosts and hosts with no registry match.
pub fn classify(hostname: &str) -> Option<TrackerInfo> {
    if hostname.is_empty() || is_allow_listed(hostname) {
        return None;
    }
    lookup(hostname).map(TrackerInfo::from)
}

/// Category of `hostname`, or [`TrackerCategory::Unknown`] when unclassified.
pub fn category_of(hostname: &str) -> TrackerCategory {
    classify(hostname)
        .map(|info| info.category)
        .unwrap_or(TrackerCategory::Unknown)
}
