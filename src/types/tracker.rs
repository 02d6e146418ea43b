use serde::{Deserialize, Serialize};
use std::fmt;

/// Category a known tracking service belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackerCategory {
    Analytics,
    Social,
    Advertising,
    Unknown,
}

impl TrackerCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackerCategory::Analytics => "analytics",
            TrackerCategory::Social => "social",
            TrackerCategory::Advertising => "advertising",
            TrackerCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TrackerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the static tracker registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerRegistryEntry {
    /// Substring matched against candidate hostnames.
    pub match_domain: &'static str,
    pub name: &'static str,
    pub category: TrackerCategory,
}

/// Identity of a classified tracker, as stored on log entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerInfo {
    pub name: String,
    pub category: TrackerCategory,
}

impl From<&TrackerRegistryEntry> for TrackerInfo {
    fn from(entry: &TrackerRegistryEntry) -> Self {
        Self {
            name: entry.name.to_string(),
            category: entry.category,
        }
    }
}
