//! TrackerLens demo: replays a short synthetic browsing session through an
//! in-memory monitor and prints the popup summary and the global report.
//!
//! The long-running process the extension talks to is `trackerlens-rpc`.

use trackerlens::app::{now_millis, App};
use trackerlens::types::event::{
    CookieSetEvent, FingerprintEvent, FormAction, FormEvent, GeolocationEvent, NetworkRequestEvent,
    ObservationEvent, TabId, TabLifecycleEvent,
};
use trackerlens::types::view::Severity;

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

fn request(tab: TabId, ts: i64, url: &str, page: &str) -> ObservationEvent {
    ObservationEvent::NetworkRequest(NetworkRequestEvent {
        tab_id: tab,
        timestamp: ts,
        url: url.to_string(),
        initiator: Some(page.to_string()),
        resource_type: "script".to_string(),
    })
}

fn severity_mark(severity: Severity) -> &'static str {
    match severity {
        Severity::Safe => "safe",
        Severity::Neutral => "-",
        Severity::Warning => "warning",
        Severity::Alert => "ALERT",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  TrackerLens v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!();

    let app = App::in_memory(None);
    let tab = TabId(1);
    let page = "https://news.example.com/today";
    let start = now_millis() - 90 * 60 * 1000;

    section("Replaying observation events");
    let mut events = vec![
        request(tab, start, "https://cdn.example.com/app.js", page),
        request(tab, start + 1_000, "https://www.google-analytics.com/analytics.js", page),
        request(tab, start + 2_000, "https://ad.doubleclick.net/pixel", page),
        request(tab, start + 3_000, "https://connect.facebook.net/en_US/fbevents.js", page),
        request(tab, start + 60 * 60 * 1000, "https://beacon.unlisted-tracker.io/b", page),
    ];
    events.push(ObservationEvent::CookieSet(CookieSetEvent {
        tab_id: tab,
        timestamp: start + 4_000,
        url: "https://ad.doubleclick.net/pixel".to_string(),
        initiator: Some(page.to_string()),
        header_value: "IDE=abc; Secure; HttpOnly; SameSite=None".to_string(),
    }));
    events.push(ObservationEvent::Fingerprint(FingerprintEvent {
        tab_id: tab,
        timestamp: start + 5_000,
        page_url: page.to_string(),
        method: "canvas.toDataURL".to_string(),
    }));
    events.push(ObservationEvent::Geolocation(GeolocationEvent {
        tab_id: tab,
        timestamp: start + 6_000,
        page_url: page.to_string(),
        method: "getCurrentPosition".to_string(),
    }));
    events.push(ObservationEvent::Form(FormEvent {
        tab_id: tab,
        timestamp: start + 7_000,
        page_url: page.to_string(),
        action: FormAction::Input,
        field_type: "email".to_string(),
    }));

    for event in &events {
        let outcome = app.ingest(event)?;
        println!("  {:<12} {:?}", event.kind(), outcome);
    }

    section("Popup summary (tab 1)");
    let summary = app.popup_summary(tab, Some(page), now_millis())?;
    let c = &summary.counts;
    for (label, level) in [
        ("requests", c.requests),
        ("cookies", c.cookies),
        ("3p cookies", c.third_party_cookies),
        ("geolocation", c.geolocation),
        ("forms", c.forms),
        ("fingerprint", c.fingerprinting),
    ] {
        println!("  {:<12} {:>4}  {}", label, level.count, severity_mark(level.severity));
    }
    println!("  trackers: {} detected", summary.total_trackers);
    for tracker in &summary.tracker_preview {
        println!("    - {} ({})", tracker.name, tracker.category);
    }
    for advisory in &summary.advisories {
        println!("  [{:?}] {}", advisory.level, advisory.text);
    }
    if let Some(histogram) = &summary.histogram {
        for (label, count) in histogram.labels.iter().zip(&histogram.counts) {
            println!("  {:>5} {}", label, "#".repeat(*count as usize));
        }
    }

    section("Tab closed");
    let removed = app.handle_lifecycle(&TabLifecycleEvent::Closed { tab_id: tab })?;
    println!("  removed {} per-tab entries", removed);

    section("Global report");
    let report = app.report()?;
    println!("  trackers:        {}", report.total_trackers_display);
    println!("  requests:        {}", report.total_requests_display);
    println!("  cookies:         {}", report.total_cookies_display);
    println!("  sites tracked:   {}%", report.percent_sites_tracked);
    for row in report.top(app.settings().display.report_top_limit) {
        println!("  {:<28} {:<12} hits {:>3}  sites {}", row.domain, row.category, row.count, row.sites);
    }

    Ok(())
}
