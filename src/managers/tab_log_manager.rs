//! Tab Log Manager for TrackerLens.
//!
//! Appends observation entries to the bounded per-category logs held in the
//! state store, applying per-category debounce and cookie deduplication, and
//! filters entries out when a tab goes away.

use tracing::debug;

use crate::database::store::{StateStore, StateStoreExt, StoreKey};
use crate::types::errors::StoreError;
use crate::types::event::{FormAction, TabId};
use crate::types::log::{
    CookieEntry, FingerprintEntry, FormEntry, GeolocationEntry, LogEntry, NetworkRequestEntry,
    PerTabLog,
};
use crate::types::settings::{DebounceWindows, LogLimits};

/// Result of offering an entry to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// An equivalent entry was logged inside the debounce window.
    Debounced,
    /// The exact entry is already present.
    Duplicate,
}

impl AppendOutcome {
    pub fn is_appended(&self) -> bool {
        matches!(self, AppendOutcome::Appended)
    }
}

/// Trait defining per-tab log operations.
pub trait TabLogManagerTrait {
    fn append_network_request(&mut self, entry: NetworkRequestEntry) -> Result<AppendOutcome, StoreError>;
    fn append_cookie(&mut self, entry: CookieEntry) -> Result<AppendOutcome, StoreError>;
    fn append_geolocation(&mut self, entry: GeolocationEntry) -> Result<AppendOutcome, StoreError>;
    fn append_fingerprint(&mut self, entry: FingerprintEntry) -> Result<AppendOutcome, StoreError>;
    fn append_form(&mut self, entry: FormEntry) -> Result<AppendOutcome, StoreError>;
    fn tab_log(&self, tab_id: TabId) -> Result<PerTabLog, StoreError>;
    fn full_log(&self) -> Result<PerTabLog, StoreError>;
    /// Removes every entry of `tab_id` from every category; returns how many were removed.
    fn purge_tab(&mut self, tab_id: TabId) -> Result<usize, StoreError>;
    fn clear_all(&mut self) -> Result<(), StoreError>;
}

/// Per-tab log manager backed by a state store.
pub struct TabLogManager<'a> {
    store: &'a dyn StateStore,
    limits: &'a LogLimits,
    debounce: &'a DebounceWindows,
}

impl<'a> TabLogManager<'a> {
    /// Creates a new `TabLogManager` over `store`.
    pub fn new(store: &'a dyn StateStore, limits: &'a LogLimits, debounce: &'a DebounceWindows) -> Self {
        Self {
            store,
            limits,
            debounce,
        }
    }

    /// Pushes `entry`, evicting the oldest entries beyond `limit`.
    pub fn push_bounded<T>(log: &mut Vec<T>, entry: T, limit: usize) {
        log.push(entry);
        if log.len() > limit {
            let excess = log.len() - limit;
            log.drain(..excess);
        }
    }

    /// Whether any entry matching `same` for `tab_id` was logged less than
    /// `window_ms` before `now`.
    fn logged_within<T: LogEntry>(
        log: &[T],
        tab_id: TabId,
        now: i64,
        window_ms: i64,
        same: impl Fn(&T) -> bool,
    ) -> bool {
        log.iter()
            .any(|e| e.tab_id() == tab_id && now.saturating_sub(e.timestamp()) < window_ms && same(e))
    }

    fn append_with<T>(
        &mut self,
        key: StoreKey,
        entry: T,
        limit: usize,
        reject: impl Fn(&[T], &T) -> Option<AppendOutcome>,
    ) -> Result<AppendOutcome, StoreError>
    where
        T: LogEntry + serde::Serialize + serde::de::DeserializeOwned,
    {
        let mut log: Vec<T> = self.store.load(key)?;
        if let Some(outcome) = reject(&log, &entry) {
            debug!(key = key.as_str(), tab = %entry.tab_id(), ?outcome, "log entry rejected");
            return Ok(outcome);
        }
        Self::push_bounded(&mut log, entry, limit);
        self.store.save(key, &log)?;
        Ok(AppendOutcome::Appended)
    }

    fn purge_key<T>(&self, key: StoreKey, tab_id: TabId) -> Result<usize, StoreError>
    where
        T: LogEntry + serde::Serialize + serde::de::DeserializeOwned,
    {
        let mut log: Vec<T> = self.store.load(key)?;
        let before = log.len();
        log.retain(|e| e.tab_id() != tab_id);
        let removed = before - log.len();
        if removed > 0 {
            self.store.save(key, &log)?;
        }
        Ok(removed)
    }

    fn load_for_tab<T>(&self, key: StoreKey, tab_id: TabId) -> Result<Vec<T>, StoreError>
    where
        T: LogEntry + serde::de::DeserializeOwned,
    {
        let mut log: Vec<T> = self.store.load(key)?;
        log.retain(|e| e.tab_id() == tab_id);
        Ok(log)
    }
}

impl<'a> TabLogManagerTrait for TabLogManager<'a> {
    /// Network requests are never debounced.
    fn append_network_request(&mut self, entry: NetworkRequestEntry) -> Result<AppendOutcome, StoreError> {
        let limit = self.limits.network_requests;
        self.append_with(StoreKey::NetworkRequests, entry, limit, |_, _| None)
    }

    /// Cookies are deduplicated on (domain, name, tab).
    fn append_cookie(&mut self, entry: CookieEntry) -> Result<AppendOutcome, StoreError> {
        let limit = self.limits.cookies;
        self.append_with(StoreKey::Cookies, entry, limit, |log, new| {
            log.iter()
                .any(|c| c.domain == new.domain && c.cookie == new.cookie && c.tab_id == new.tab_id)
                .then_some(AppendOutcome::Duplicate)
        })
    }

    /// One geolocation entry per tab per window, whatever the method.
    fn append_geolocation(&mut self, entry: GeolocationEntry) -> Result<AppendOutcome, StoreError> {
        let limit = self.limits.geolocation_attempts;
        let window = self.debounce.geolocation_ms;
        self.append_with(StoreKey::GeolocationAttempts, entry, limit, |log, new| {
            Self::logged_within(log, new.tab_id, new.timestamp, window, |_| true)
                .then_some(AppendOutcome::Debounced)
        })
    }

    /// One fingerprint entry per tab and method per window.
    fn append_fingerprint(&mut self, entry: FingerprintEntry) -> Result<AppendOutcome, StoreError> {
        let limit = self.limits.fingerprinting_attempts;
        let window = self.debounce.fingerprint_ms;
        self.append_with(StoreKey::FingerprintingAttempts, entry, limit, |log, new| {
            Self::logged_within(log, new.tab_id, new.timestamp, window, |e| e.method == new.method)
                .then_some(AppendOutcome::Debounced)
        })
    }

    /// `input` actions are debounced per tab; submissions always go through.
    fn append_form(&mut self, entry: FormEntry) -> Result<AppendOutcome, StoreError> {
        let limit = self.limits.form_data;
        let window = self.debounce.form_input_ms;
        self.append_with(StoreKey::FormData, entry, limit, |log, new| {
            if new.action != FormAction::Input {
                return None;
            }
            Self::logged_within(log, new.tab_id, new.timestamp, window, |e| {
                e.action == FormAction::Input
            })
            .then_some(AppendOutcome::Debounced)
        })
    }

    fn tab_log(&self, tab_id: TabId) -> Result<PerTabLog, StoreError> {
        Ok(PerTabLog {
            network_requests: self.load_for_tab(StoreKey::NetworkRequests, tab_id)?,
            cookies: self.load_for_tab(StoreKey::Cookies, tab_id)?,
            geolocation_attempts: self.load_for_tab(StoreKey::GeolocationAttempts, tab_id)?,
            fingerprinting_attempts: self.load_for_tab(StoreKey::FingerprintingAttempts, tab_id)?,
            form_data: self.load_for_tab(StoreKey::FormData, tab_id)?,
        })
    }

    fn full_log(&self) -> Result<PerTabLog, StoreError> {
        Ok(PerTabLog {
            network_requests: self.store.load(StoreKey::NetworkRequests)?,
            cookies: self.store.load(StoreKey::Cookies)?,
            geolocation_attempts: self.store.load(StoreKey::GeolocationAttempts)?,
            fingerprinting_attempts: self.store.load(StoreKey::FingerprintingAttempts)?,
            form_data: self.store.load(StoreKey::FormData)?,
        })
    }

    fn purge_tab(&mut self, tab_id: TabId) -> Result<usize, StoreError> {
        let removed = self.purge_key::<NetworkRequestEntry>(StoreKey::NetworkRequests, tab_id)?
            + self.purge_key::<CookieEntry>(StoreKey::Cookies, tab_id)?
            + self.purge_key::<GeolocationEntry>(StoreKey::GeolocationAttempts, tab_id)?
            + self.purge_key::<FingerprintEntry>(StoreKey::FingerprintingAttempts, tab_id)?
            + self.purge_key::<FormEntry>(StoreKey::FormData, tab_id)?;
        Ok(removed)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        let empty: Vec<serde_json::Value> = Vec::new();
        for key in StoreKey::TAB_LOGS {
            self.store.save(key, &empty)?;
        }
        Ok(())
    }
}
