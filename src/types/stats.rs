use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Cumulative record for a single third-party host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerRecord {
    /// Number of sightings. Only ever increases.
    pub count: u64,
    /// First-party sites this host was seen on. Only ever grows.
    pub sites: BTreeSet<String>,
    /// Whether the host matched the tracker registry when first seen.
    pub is_known: bool,
    pub first_seen: i64,
    pub last_seen: i64,
}

impl TrackerRecord {
    pub fn new(is_known: bool, now: i64) -> Self {
        Self {
            count: 0,
            sites: BTreeSet::new(),
            is_known,
            first_seen: now,
            last_seen: now,
        }
    }
}

/// Cross-tab, cross-session aggregate of tracker activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GlobalStats {
    #[serde(default)]
    pub trackers: BTreeMap<String, TrackerRecord>,
    #[serde(default)]
    pub websites_visited: BTreeSet<String>,
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub total_cookies: u64,
}
