//! Unit tests for the global statistics manager.

use trackerlens::database::MemoryStore;
use trackerlens::managers::global_stats_manager::{GlobalStatsManager, GlobalStatsManagerTrait};
use trackerlens::types::stats::GlobalStats;

#[test]
fn test_record_sighting_twice_same_pair() {
    let store = MemoryStore::new();
    let mut mgr = GlobalStatsManager::new(&store);

    assert!(mgr.record_sighting("tracker.io", "shop.example.com", false, 100).unwrap());
    assert!(mgr.record_sighting("tracker.io", "shop.example.com", false, 200).unwrap());

    let stats = mgr.stats().unwrap();
    let record = &stats.trackers["tracker.io"];
    assert_eq!(record.count, 2);
    assert_eq!(record.sites.len(), 1);
    assert_eq!(record.first_seen, 100);
    assert_eq!(record.last_seen, 200);
}

#[test]
fn test_record_sighting_grows_site_reach() {
    let store = MemoryStore::new();
    let mut mgr = GlobalStatsManager::new(&store);

    mgr.record_sighting("tracker.io", "a.example.com", true, 1).unwrap();
    mgr.record_sighting("tracker.io", "b.example.org", true, 2).unwrap();

    let stats = mgr.stats().unwrap();
    assert_eq!(stats.trackers["tracker.io"].sites.len(), 2);
    assert_eq!(stats.websites_visited.len(), 2);
}

#[test]
fn test_record_sighting_ignores_empty_or_equal_hosts() {
    let store = MemoryStore::new();
    let mut mgr = GlobalStatsManager::new(&store);

    assert!(!mgr.record_sighting("", "site.com", true, 1).unwrap());
    assert!(!mgr.record_sighting("tracker.io", "", true, 1).unwrap());
    assert!(!mgr.record_sighting("same.com", "same.com", true, 1).unwrap());
    assert_eq!(mgr.stats().unwrap(), GlobalStats::default());
}

#[test]
fn test_known_flag_is_fixed_at_creation() {
    let mut stats = GlobalStats::default();
    GlobalStatsManager::apply_sighting(&mut stats, "t.io", "a.com", true, 1);
    GlobalStatsManager::apply_sighting(&mut stats, "t.io", "a.com", false, 2);
    assert!(stats.trackers["t.io"].is_known);
}

#[test]
fn test_totals_increment() {
    let store = MemoryStore::new();
    let mut mgr = GlobalStatsManager::new(&store);

    mgr.record_request().unwrap();
    mgr.record_request().unwrap();
    mgr.record_cookie().unwrap();

    let stats = mgr.stats().unwrap();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.total_cookies, 1);
}

#[test]
fn test_reset_zeroes_everything() {
    let store = MemoryStore::new();
    let mut mgr = GlobalStatsManager::new(&store);
    mgr.record_sighting("tracker.io", "a.com", false, 1).unwrap();
    mgr.record_request().unwrap();

    mgr.reset().unwrap();
    assert_eq!(mgr.stats().unwrap(), GlobalStats::default());
}

#[test]
fn test_stats_persist_across_managers() {
    let store = MemoryStore::new();
    GlobalStatsManager::new(&store)
        .record_sighting("tracker.io", "a.com", false, 1)
        .unwrap();
    let stats = GlobalStatsManager::new(&store).stats().unwrap();
    assert_eq!(stats.trackers["tracker.io"].count, 1);
}
