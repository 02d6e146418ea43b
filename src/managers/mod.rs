// TrackerLens state managers
// Managers own store-backed state: per-tab logs, global statistics, ingestion and tab lifecycle.

pub mod event_ingestor;
pub mod global_stats_manager;
pub mod tab_lifecycle;
pub mod tab_log_manager;
