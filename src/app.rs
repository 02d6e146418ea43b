//! App Core for TrackerLens.
//!
//! Owns the state store and the settings, and exposes every operation of the
//! monitor: event ingestion, tab lifecycle, per-tab and global views, and the
//! clear-data actions. Managers borrow the store on demand.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::database::store::{MemoryStore, SqliteStore, StateStore, StateStoreExt, StoreKey};
use crate::managers::event_ingestor::{EventIngestor, IngestOutcome};
use crate::managers::global_stats_manager::{GlobalStatsManager, GlobalStatsManagerTrait};
use crate::managers::tab_lifecycle::TabLifecycleReconciler;
use crate::managers::tab_log_manager::{TabLogManager, TabLogManagerTrait};
use crate::services::histogram_builder::build_histogram;
use crate::services::popup_view::build_popup_summary;
use crate::services::report_view::build_report;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::MonitorError;
use crate::types::event::{ObservationEvent, TabId, TabLifecycleEvent};
use crate::types::log::PerTabLog;
use crate::types::settings::MonitorSettings;
use crate::types::stats::GlobalStats;
use crate::types::view::{Histogram, PopupSummary, ReportSummary};

/// Current wall-clock time in Unix milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Central application struct holding the store and the settings.
///
/// `TabLogManager`, `GlobalStatsManager` and `EventIngestor` borrow the store
/// with a lifetime parameter, so they are created per call.
pub struct App {
    store: Box<dyn StateStore>,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the SQLite state store at `db_path` and loads settings from
    /// `settings_path` (or the platform config directory).
    ///
    /// A settings file that cannot be read falls back to defaults.
    pub fn new<P: AsRef<Path>>(db_path: P, settings_path: Option<String>) -> Result<Self, MonitorError> {
        let store = SqliteStore::open(db_path)?;
        let mut settings_engine = SettingsEngine::new(settings_path);
        if let Err(e) = settings_engine.load() {
            warn!(error = %e, "using default settings");
        }
        Ok(Self::with_store(Box::new(store), settings_engine))
    }

    /// Builds an app over an existing store and settings engine.
    pub fn with_store(store: Box<dyn StateStore>, settings_engine: SettingsEngine) -> Self {
        Self {
            store,
            settings_engine,
        }
    }

    /// An app over a volatile store. Settings live at `settings_path` if
    /// given and are never loaded from the platform directory otherwise.
    pub fn in_memory(settings_path: Option<String>) -> Self {
        let mut settings_engine = SettingsEngine::new(settings_path.clone());
        if settings_path.is_some() {
            if let Err(e) = settings_engine.load() {
                warn!(error = %e, "using default settings");
            }
        }
        Self::with_store(Box::new(MemoryStore::new()), settings_engine)
    }

    pub fn settings(&self) -> &MonitorSettings {
        self.settings_engine.get_settings()
    }

    fn tab_log_manager(&self) -> TabLogManager<'_> {
        let settings = self.settings_engine.get_settings();
        TabLogManager::new(self.store.as_ref(), &settings.limits, &settings.debounce)
    }

    /// Ingests one observation event.
    pub fn ingest(&self, event: &ObservationEvent) -> Result<IngestOutcome, MonitorError> {
        let ingestor = EventIngestor::new(self.store.as_ref(), self.settings());
        Ok(ingestor.ingest(event)?)
    }

    /// Applies a tab lifecycle event; returns how many log entries were dropped.
    pub fn handle_lifecycle(&self, event: &TabLifecycleEvent) -> Result<usize, MonitorError> {
        let mut log = self.tab_log_manager();
        Ok(TabLifecycleReconciler::new(&mut log).reconcile(event)?)
    }

    pub fn tab_log(&self, tab_id: TabId) -> Result<PerTabLog, MonitorError> {
        Ok(self.tab_log_manager().tab_log(tab_id)?)
    }

    pub fn global_stats(&self) -> Result<GlobalStats, MonitorError> {
        Ok(GlobalStatsManager::new(self.store.as_ref()).stats()?)
    }

    /// Popup summary for `tab_id`, where `current_url` is the page the tab shows.
    pub fn popup_summary(
        &self,
        tab_id: TabId,
        current_url: Option<&str>,
        now: i64,
    ) -> Result<PopupSummary, MonitorError> {
        let log = self.tab_log(tab_id)?;
        Ok(build_popup_summary(&log, current_url, self.settings(), now))
    }

    /// Request activity histogram for `tab_id`.
    pub fn histogram(&self, tab_id: TabId, now: i64) -> Result<Histogram, MonitorError> {
        let log = self.tab_log(tab_id)?;
        Ok(build_histogram(&log.network_requests, now)?)
    }

    pub fn report(&self) -> Result<ReportSummary, MonitorError> {
        Ok(build_report(&self.global_stats()?))
    }

    /// Removes every per-tab entry of `tab_id`. Global statistics are kept.
    pub fn clear_tab(&self, tab_id: TabId) -> Result<usize, MonitorError> {
        let removed = self.tab_log_manager().purge_tab(tab_id)?;
        info!(tab = %tab_id, removed, "tab data cleared");
        Ok(removed)
    }

    /// Resets every persisted key to its empty state.
    pub fn clear_all(&self) -> Result<(), MonitorError> {
        self.store.clear()?;
        self.tab_log_manager().clear_all()?;
        self.store.save(StoreKey::GlobalStats, &GlobalStats::default())?;
        info!("all tracking data cleared");
        Ok(())
    }

    /// Updates one setting by dot path and persists it.
    pub fn set_setting(&mut self, key: &str, value: serde_json::Value) -> Result<(), MonitorError> {
        self.settings_engine.set_value(key, value)?;
        Ok(())
    }
}
