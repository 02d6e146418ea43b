//! Unit tests for the TrackerLens database layer (migrations, key-value store, backups).

use serde_json::json;
use tempfile::TempDir;

use trackerlens::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use trackerlens::database::store::StateStoreExt;
use trackerlens::database::{MemoryStore, SqliteStore, StateStore, StoreKey};
use trackerlens::managers::global_stats_manager::{GlobalStatsManager, GlobalStatsManagerTrait};
use trackerlens::types::stats::GlobalStats;

#[test]
fn test_open_in_memory_succeeds() {
    let store = SqliteStore::open_in_memory();
    assert!(store.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_kv_table() {
    let store = SqliteStore::open_in_memory().expect("open_in_memory failed");
    let exists: bool = store
        .connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "kv_store should exist after migrations");
}

#[test]
fn test_schema_version_is_current() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(get_schema_version(store.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_reopening_does_not_rerun_migrations() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        store.set(StoreKey::Cookies, json!([])).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    let versions: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, 1);
}

#[test]
fn test_missing_key_is_none() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.get(StoreKey::GlobalStats).unwrap(), None);
}

#[test]
fn test_set_overwrites_previous_value() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set(StoreKey::FormData, json!([1])).unwrap();
    store.set(StoreKey::FormData, json!([1, 2])).unwrap();
    assert_eq!(store.get(StoreKey::FormData).unwrap(), Some(json!([1, 2])));
}

#[test]
fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.db");
    {
        let store = SqliteStore::open(&path).unwrap();
        let mut stats = GlobalStats::default();
        stats.total_requests = 42;
        store.save(StoreKey::GlobalStats, &stats).unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    let stats: GlobalStats = store.load(StoreKey::GlobalStats).unwrap();
    assert_eq!(stats.total_requests, 42);
}

#[test]
fn test_stored_under_original_key_names() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.set(StoreKey::NetworkRequests, json!([])).unwrap();
    let key: String = store
        .connection()
        .query_row("SELECT key FROM kv_store", [], |row| row.get(0))
        .unwrap();
    assert_eq!(key, "networkRequests");
}

#[test]
fn test_clear_removes_every_key() {
    for store in [
        Box::new(SqliteStore::open_in_memory().unwrap()) as Box<dyn StateStore>,
        Box::new(MemoryStore::new()) as Box<dyn StateStore>,
    ] {
        for key in StoreKey::ALL {
            store.set(key, json!({"x": 1})).unwrap();
        }
        store.clear().unwrap();
        for key in StoreKey::ALL {
            assert_eq!(store.get(key).unwrap(), None, "{} should be cleared", key.as_str());
        }
    }
}

#[test]
fn test_load_missing_global_stats_is_zeroed() {
    let store = MemoryStore::new();
    let stats: GlobalStats = store.load(StoreKey::GlobalStats).unwrap();
    assert_eq!(stats, GlobalStats::default());
}

#[test]
fn test_partial_global_stats_fill_defaults() {
    let store = MemoryStore::new();
    store.set(StoreKey::GlobalStats, json!({"total_cookies": 3})).unwrap();
    let stats: GlobalStats = store.load(StoreKey::GlobalStats).unwrap();
    assert_eq!(stats.total_cookies, 3);
    assert!(stats.trackers.is_empty());
}

/// Stats that no longer decode survive the next write in the backup slot.
#[test]
fn test_undecodable_stats_are_backed_up_before_overwrite() {
    let store = SqliteStore::open_in_memory().unwrap();
    let history = json!({"total_requests": "many", "trackers": {"ad.doubleclick.net": 3}});
    store.set(StoreKey::GlobalStats, history.clone()).unwrap();

    let mut manager = GlobalStatsManager::new(&store);
    manager.record_request().unwrap();

    let stats: GlobalStats = store.load(StoreKey::GlobalStats).unwrap();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(store.get_backup(StoreKey::GlobalStats).unwrap(), Some(history));

    let name: String = store
        .connection()
        .query_row(
            "SELECT key FROM kv_store WHERE key LIKE '%.unreadable'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "globalStats.unreadable");
}

#[test]
fn test_non_json_text_is_backed_up() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES ('cookies', 'not json', 0)",
            [],
        )
        .unwrap();

    assert_eq!(store.get(StoreKey::Cookies).unwrap(), None);
    assert_eq!(store.get_backup(StoreKey::Cookies).unwrap(), Some(json!("not json")));
}

#[test]
fn test_clear_drops_backups() {
    let store = MemoryStore::new();
    store.set_backup(StoreKey::FormData, json!(["x"])).unwrap();
    store.clear().unwrap();
    assert_eq!(store.get_backup(StoreKey::FormData).unwrap(), None);
}
