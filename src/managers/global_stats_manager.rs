//! Global Stats Manager for TrackerLens.
//!
//! Folds third-party sightings into the cumulative tracker map and keeps the
//! running request and cookie totals. Nothing here is ever pruned by tab
//! lifecycle; only an explicit reset clears it.

use tracing::debug;

use crate::database::store::{StateStore, StateStoreExt, StoreKey};
use crate::types::errors::StoreError;
use crate::types::stats::{GlobalStats, TrackerRecord};

/// Trait defining global aggregation operations.
pub trait GlobalStatsManagerTrait {
    /// Records that `tracker_host` was loaded by `site_host`. Returns `false`
    /// when the sighting was ignored (empty or identical hosts).
    fn record_sighting(
        &mut self,
        tracker_host: &str,
        site_host: &str,
        is_known: bool,
        now: i64,
    ) -> Result<bool, StoreError>;
    fn record_request(&mut self) -> Result<(), StoreError>;
    fn record_cookie(&mut self) -> Result<(), StoreError>;
    fn stats(&self) -> Result<GlobalStats, StoreError>;
    fn reset(&mut self) -> Result<(), StoreError>;
}

/// Global statistics manager backed by a state store.
pub struct GlobalStatsManager<'a> {
    store: &'a dyn StateStore,
}

impl<'a> GlobalStatsManager<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store }
    }

    /// Applies one sighting to `stats` in memory.
    pub fn apply_sighting(
        stats: &mut GlobalStats,
        tracker_host: &str,
        site_host: &str,
        is_known: bool,
        now: i64,
    ) -> bool {
        if tracker_host.is_empty() || site_host.is_empty() || tracker_host == site_host {
            return false;
        }
        let record = stats
            .trackers
            .entry(tracker_host.to_string())
            .or_insert_with(|| TrackerRecord::new(is_known, now));
        record.count += 1;
        record.last_seen = now;
        record.sites.insert(site_host.to_string());
        stats.websites_visited.insert(site_host.to_string());
        true
    }

    fn update(&self, apply: impl FnOnce(&mut GlobalStats) -> bool) -> Result<bool, StoreError> {
        let mut stats: GlobalStats = self.store.load(StoreKey::GlobalStats)?;
        let changed = apply(&mut stats);
        if changed {
            self.store.save(StoreKey::GlobalStats, &stats)?;
        }
        Ok(changed)
    }
}

impl<'a> GlobalStatsManagerTrait for GlobalStatsManager<'a> {
    fn record_sighting(
        &mut self,
        tracker_host: &str,
        site_host: &str,
        is_known: bool,
        now: i64,
    ) -> Result<bool, StoreError> {
        let recorded = self.update(|stats| {
            Self::apply_sighting(stats, tracker_host, site_host, is_known, now)
        })?;
        if recorded {
            debug!(tracker = tracker_host, site = site_host, is_known, "sighting recorded");
        }
        Ok(recorded)
    }

    fn record_request(&mut self) -> Result<(), StoreError> {
        self.update(|stats| {
            stats.total_requests += 1;
            true
        })?;
        Ok(())
    }

    fn record_cookie(&mut self) -> Result<(), StoreError> {
        self.update(|stats| {
            stats.total_cookies += 1;
            true
        })?;
        Ok(())
    }

    fn stats(&self) -> Result<GlobalStats, StoreError> {
        self.store.load(StoreKey::GlobalStats)
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        self.store.save(StoreKey::GlobalStats, &GlobalStats::default())
    }
}
