use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a browser tab.
///
/// Negative ids mark requests that do not belong to any tab (service
/// workers, extension background pages).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl TabId {
    /// Id used by the browser for requests issued outside any tab.
    pub const BACKGROUND: TabId = TabId(-1);

    pub fn is_background(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A network request seen by the request observer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkRequestEvent {
    pub tab_id: TabId,
    pub timestamp: i64,
    pub url: String,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
}

/// A `Set-Cookie` response header seen on a request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookieSetEvent {
    pub tab_id: TabId,
    pub timestamp: i64,
    pub url: String,
    #[serde(default)]
    pub initiator: Option<String>,
    /// Raw header value, e.g. `id=abc; Secure; SameSite=Lax`.
    pub header_value: String,
}

/// A call to one of the geolocation APIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeolocationEvent {
    pub tab_id: TabId,
    pub timestamp: i64,
    pub page_url: String,
    #[serde(default = "default_unknown")]
    pub method: String,
}

/// A call to an API commonly used for device fingerprinting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FingerprintEvent {
    pub tab_id: TabId,
    pub timestamp: i64,
    pub page_url: String,
    pub method: String,
}

/// What the user did with a form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FormAction {
    Submit,
    Input,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Submit => "submit",
            FormAction::Input => "input",
        }
    }
}

/// A form submission or typing activity inside a form field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormEvent {
    pub tab_id: TabId,
    pub timestamp: i64,
    pub page_url: String,
    pub action: FormAction,
    #[serde(default = "default_unknown")]
    pub field_type: String,
}

/// One message from the observation feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ObservationEvent {
    #[serde(rename = "NETWORK_REQUEST")]
    NetworkRequest(NetworkRequestEvent),
    #[serde(rename = "COOKIE_SET")]
    CookieSet(CookieSetEvent),
    #[serde(rename = "GEOLOCATION_ATTEMPT")]
    Geolocation(GeolocationEvent),
    #[serde(rename = "FINGERPRINTING_ATTEMPT")]
    Fingerprint(FingerprintEvent),
    #[serde(rename = "FORM_SUBMISSION")]
    Form(FormEvent),
}

impl ObservationEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            ObservationEvent::NetworkRequest(e) => e.tab_id,
            ObservationEvent::CookieSet(e) => e.tab_id,
            ObservationEvent::Geolocation(e) => e.tab_id,
            ObservationEvent::Fingerprint(e) => e.tab_id,
            ObservationEvent::Form(e) => e.tab_id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            ObservationEvent::NetworkRequest(e) => e.timestamp,
            ObservationEvent::CookieSet(e) => e.timestamp,
            ObservationEvent::Geolocation(e) => e.timestamp,
            ObservationEvent::Fingerprint(e) => e.timestamp,
            ObservationEvent::Form(e) => e.timestamp,
        }
    }

    /// Short kind name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            ObservationEvent::NetworkRequest(_) => "network_request",
            ObservationEvent::CookieSet(_) => "cookie_set",
            ObservationEvent::Geolocation(_) => "geolocation",
            ObservationEvent::Fingerprint(_) => "fingerprint",
            ObservationEvent::Form(_) => "form",
        }
    }
}

/// Tab lifecycle notifications that prune the per-tab log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabLifecycleEvent {
    /// The tab started loading a new top-level URL.
    NavigationStarted { tab_id: TabId, url: String },
    /// The tab was closed.
    Closed { tab_id: TabId },
}

impl TabLifecycleEvent {
    pub fn tab_id(&self) -> TabId {
        match self {
            TabLifecycleEvent::NavigationStarted { tab_id, .. } => *tab_id,
            TabLifecycleEvent::Closed { tab_id } => *tab_id,
        }
    }
}

fn default_unknown() -> String {
    "unknown".to_string()
}

fn default_resource_type() -> String {
    "other".to_string()
}
