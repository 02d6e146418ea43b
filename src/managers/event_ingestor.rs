//! Event ingestion for TrackerLens.
//!
//! Turns raw observation events into log entries: resolves hosts, decides
//! third-party status, classifies third-party hosts, offers the entry to the
//! bounded log and, once accepted, folds third-party sightings into the
//! global statistics.

use tracing::{debug, trace};
use uuid::Uuid;

use super::global_stats_manager::{GlobalStatsManager, GlobalStatsManagerTrait};
use super::tab_log_manager::{AppendOutcome, TabLogManager, TabLogManagerTrait};
use crate::database::store::StateStore;
use crate::services::domain_classifier;
use crate::services::third_party_detector::PartyContext;
use crate::types::errors::StoreError;
use crate::types::event::{
    CookieSetEvent, FingerprintEvent, FormEvent, GeolocationEvent, NetworkRequestEvent,
    ObservationEvent,
};
use crate::types::log::{
    CookieEntry, FingerprintEntry, FormEntry, GeolocationEntry, NetworkRequestEntry,
};
use crate::types::settings::MonitorSettings;
use crate::types::tracker::TrackerInfo;

/// What happened to an ingested event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Appended to the log (and counted, where applicable).
    Accepted,
    /// Suppressed by a debounce window.
    Debounced,
    /// Already present in the log.
    Duplicate,
    /// Not attributable to a tab, or carried nothing to record.
    Ignored,
}

impl IngestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestOutcome::Accepted => "accepted",
            IngestOutcome::Debounced => "debounced",
            IngestOutcome::Duplicate => "duplicate",
            IngestOutcome::Ignored => "ignored",
        }
    }
}

impl From<AppendOutcome> for IngestOutcome {
    fn from(outcome: AppendOutcome) -> Self {
        match outcome {
            AppendOutcome::Appended => IngestOutcome::Accepted,
            AppendOutcome::Debounced => IngestOutcome::Debounced,
            AppendOutcome::Duplicate => IngestOutcome::Duplicate,
        }
    }
}

/// Name and attributes of a `Set-Cookie` header. The value is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCookie {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: String,
}

/// Parses a raw `Set-Cookie` header value.
///
/// Returns `None` when the header has no cookie name.
pub fn parse_set_cookie(header_value: &str) -> Option<ParsedCookie> {
    let mut parts = header_value.split(';').map(str::trim);
    let name = parts.next()?.split('=').next()?.trim();
    if name.is_empty() {
        return None;
    }

    let mut cookie = ParsedCookie {
        name: name.to_string(),
        secure: false,
        http_only: false,
        same_site: "none specified".to_string(),
    };
    for attribute in parts {
        let (key, value) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (attribute, None),
        };
        match key.to_ascii_lowercase().as_str() {
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => {
                if let Some(v) = value.filter(|v| !v.is_empty()) {
                    cookie.same_site = v.to_string();
                }
            }
            _ => {}
        }
    }
    Some(cookie)
}

/// Ingests observation events into the store.
pub struct EventIngestor<'a> {
    store: &'a dyn StateStore,
    settings: &'a MonitorSettings,
}

impl<'a> EventIngestor<'a> {
    pub fn new(store: &'a dyn StateStore, settings: &'a MonitorSettings) -> Self {
        Self { store, settings }
    }

    fn tab_log(&self) -> TabLogManager<'a> {
        TabLogManager::new(self.store, &self.settings.limits, &self.settings.debounce)
    }

    fn global_stats(&self) -> GlobalStatsManager<'a> {
        GlobalStatsManager::new(self.store)
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Classifies the resource only when it is third-party.
    fn tracker_for(party: &PartyContext) -> Option<TrackerInfo> {
        if !party.is_third_party {
            return None;
        }
        party
            .resource_host
            .as_deref()
            .and_then(domain_classifier::classify)
    }

    /// Records a third-party sighting for an accepted entry.
    fn record_sighting(&self, party: &PartyContext, is_known: bool, now: i64) -> Result<(), StoreError> {
        if !party.is_third_party {
            return Ok(());
        }
        if let (Some(resource), Some(initiator)) = (&party.resource_host, &party.initiator_host) {
            self.global_stats()
                .record_sighting(resource, initiator, is_known, now)?;
        }
        Ok(())
    }

    /// Ingests one event.
    pub fn ingest(&self, event: &ObservationEvent) -> Result<IngestOutcome, StoreError> {
        if event.tab_id().is_background() {
            trace!(kind = event.kind(), "ignoring event outside any tab");
            return Ok(IngestOutcome::Ignored);
        }
        let outcome = match event {
            ObservationEvent::NetworkRequest(e) => self.ingest_network_request(e)?,
            ObservationEvent::CookieSet(e) => self.ingest_cookie(e)?,
            ObservationEvent::Geolocation(e) => self.ingest_geolocation(e)?,
            ObservationEvent::Fingerprint(e) => self.ingest_fingerprint(e)?,
            ObservationEvent::Form(e) => self.ingest_form(e)?,
        };
        debug!(kind = event.kind(), tab = %event.tab_id(), ?outcome, "event ingested");
        Ok(outcome)
    }

    fn ingest_network_request(&self, event: &NetworkRequestEvent) -> Result<IngestOutcome, StoreError> {
        let party = PartyContext::resolve(&event.url, event.initiator.as_deref());
        let tracker_info = Self::tracker_for(&party);
        let is_known = tracker_info.is_some();

        let entry = NetworkRequestEntry {
            id: Self::new_id(),
            url: event.url.clone(),
            resource_type: event.resource_type.clone(),
            initiator: event.initiator.clone(),
            tab_id: event.tab_id,
            timestamp: event.timestamp,
            is_third_party: party.is_third_party,
            tracker_info,
        };

        let outcome = self.tab_log().append_network_request(entry)?;
        if outcome.is_appended() {
            self.global_stats().record_request()?;
            self.record_sighting(&party, is_known, event.timestamp)?;
        }
        Ok(outcome.into())
    }

    fn ingest_cookie(&self, event: &CookieSetEvent) -> Result<IngestOutcome, StoreError> {
        let Some(cookie) = parse_set_cookie(&event.header_value) else {
            return Ok(IngestOutcome::Ignored);
        };
        let party = PartyContext::resolve(&event.url, event.initiator.as_deref());
        let tracker_info = Self::tracker_for(&party);
        let is_known = tracker_info.is_some();

        let entry = CookieEntry {
            id: Self::new_id(),
            url: event.url.clone(),
            domain: party.resource_host.clone().unwrap_or_default(),
            cookie: cookie.name,
            is_third_party: party.is_third_party,
            is_secure: cookie.secure,
            is_http_only: cookie.http_only,
            same_site: cookie.same_site,
            tab_id: event.tab_id,
            timestamp: event.timestamp,
            tracker_info,
        };

        let outcome = self.tab_log().append_cookie(entry)?;
        if outcome.is_appended() {
            self.global_stats().record_cookie()?;
            self.record_sighting(&party, is_known, event.timestamp)?;
        }
        Ok(outcome.into())
    }

    fn ingest_geolocation(&self, event: &GeolocationEvent) -> Result<IngestOutcome, StoreError> {
        let entry = GeolocationEntry {
            id: Self::new_id(),
            url: event.page_url.clone(),
            method: event.method.clone(),
            tab_id: event.tab_id,
            timestamp: event.timestamp,
        };
        Ok(self.tab_log().append_geolocation(entry)?.into())
    }

    fn ingest_fingerprint(&self, event: &FingerprintEvent) -> Result<IngestOutcome, StoreError> {
        let entry = FingerprintEntry {
            id: Self::new_id(),
            url: event.page_url.clone(),
            method: event.method.clone(),
            tab_id: event.tab_id,
            timestamp: event.timestamp,
        };
        Ok(self.tab_log().append_fingerprint(entry)?.into())
    }

    fn ingest_form(&self, event: &FormEvent) -> Result<IngestOutcome, StoreError> {
        let entry = FormEntry {
            id: Self::new_id(),
            url: event.page_url.clone(),
            action: event.action,
            field_type: event.field_type.clone(),
            tab_id: event.tab_id,
            timestamp: event.timestamp,
        };
        Ok(self.tab_log().append_form(entry)?.into())
    }
}
