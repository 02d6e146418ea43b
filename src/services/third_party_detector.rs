//! Third-party detection for TrackerLens.
//!
//! A resource is third-party when its root domain differs from the root
//! domain of the page that initiated it. Unparseable input never flags.

use url::Url;

use super::domain_classifier::root_domain;

/// Extracts the lowercase hostname from `url`, or `None` if it cannot be parsed
/// or has no host (`data:`, `about:blank`).
pub fn host_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .host_str()
        .filter(|host| !host.is_empty())
        .map(|host| host.to_lowercase())
}

/// Whether `resource_host` is third-party relative to `initiator_host`.
///
/// Returns `false` when the initiator is unknown so that missing context
/// never produces a false positive.
pub fn is_third_party(resource_host: &str, initiator_host: Option<&str>) -> bool {
    let Some(initiator_host) = initiator_host else {
        return false;
    };
    if resource_host.is_empty() || initiator_host.is_empty() {
        return false;
    }
    if resource_host.eq_ignore_ascii_case(initiator_host) {
        return false;
    }
    root_domain(resource_host) != root_domain(initiator_host)
}

/// Resolved hosts for an observed resource load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyContext {
    pub resource_host: Option<String>,
    pub initiator_host: Option<String>,
    pub is_third_party: bool,
}

impl PartyContext {
    /// Resolves both URLs and evaluates third-party status.
    pub fn resolve(resource_url: &str, initiator_url: Option<&str>) -> Self {
        let resource_host = host_from_url(resource_url);
        let initiator_host = initiator_url.and_then(host_from_url);
        let is_third_party = match &resource_host {
            Some(host) => is_third_party(host, initiator_host.as_deref()),
            None => false,
        };
        Self {
            resource_host,
            initiator_host,
            is_third_party,
        }
    }
}
