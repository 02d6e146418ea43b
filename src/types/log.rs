use serde::{Deserialize, Serialize};

use super::event::{FormAction, TabId};
use super::tracker::TrackerInfo;

/// Common accessors shared by every per-tab log entry.
pub trait LogEntry {
    fn tab_id(&self) -> TabId;
    fn timestamp(&self) -> i64;
}

/// A recorded network request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkRequestEntry {
    pub id: String,
    pub url: String,
    pub resource_type: String,
    pub initiator: Option<String>,
    pub tab_id: TabId,
    pub timestamp: i64,
    pub is_third_party: bool,
    pub tracker_info: Option<TrackerInfo>,
}

/// A recorded cookie. Only the cookie name is kept, never its value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookieEntry {
    pub id: String,
    pub url: String,
    pub domain: String,
    pub cookie: String,
    pub is_third_party: bool,
    pub is_secure: bool,
    pub is_http_only: bool,
    pub same_site: String,
    pub tab_id: TabId,
    pub timestamp: i64,
    #[serde(default)]
    pub tracker_info: Option<TrackerInfo>,
}

/// A recorded geolocation API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeolocationEntry {
    pub id: String,
    pub url: String,
    pub method: String,
    pub tab_id: TabId,
    pub timestamp: i64,
}

/// A recorded fingerprinting API call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintEntry {
    pub id: String,
    pub url: String,
    pub method: String,
    pub tab_id: TabId,
    pub timestamp: i64,
}

/// A recorded form interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormEntry {
    pub id: String,
    pub url: String,
    pub action: FormAction,
    pub field_type: String,
    pub tab_id: TabId,
    pub timestamp: i64,
}

macro_rules! impl_log_entry {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl LogEntry for $ty {
                fn tab_id(&self) -> TabId {
                    self.tab_id
                }

                fn timestamp(&self) -> i64 {
                    self.timestamp
                }
            }
        )+
    };
}

impl_log_entry!(
    NetworkRequestEntry,
    CookieEntry,
    GeolocationEntry,
    FingerprintEntry,
    FormEntry,
);

/// Snapshot of every log category, usually filtered to one tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PerTabLog {
    pub network_requests: Vec<NetworkRequestEntry>,
    pub cookies: Vec<CookieEntry>,
    pub geolocation_attempts: Vec<GeolocationEntry>,
    pub fingerprinting_attempts: Vec<FingerprintEntry>,
    pub form_data: Vec<FormEntry>,
}

impl PerTabLog {
    pub fn is_empty(&self) -> bool {
        self.network_requests.is_empty()
            && self.cookies.is_empty()
            && self.geolocation_attempts.is_empty()
            && self.fingerprinting_attempts.is_empty()
            && self.form_data.is_empty()
    }

    /// Total number of entries across all categories.
    pub fn len(&self) -> usize {
        self.network_requests.len()
            + self.cookies.len()
            + self.geolocation_attempts.len()
            + self.fingerprinting_attempts.len()
            + self.form_data.len()
    }
}
