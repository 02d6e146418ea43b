// TrackerLens Settings Engine
// Holds the monitor settings and keeps the settings file in step with them.
// Every value that reaches the engine, from disk or from `set_value`, is
// checked against the monitor's rules before it replaces the current one.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::{MonitorSettings, Threshold};

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<MonitorSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &MonitorSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Checks the rules the monitor relies on: every log keeps at least one
/// entry, debounce windows are not negative, each warning level is at most
/// its alert level and clients poll at a non-zero interval.
pub fn validate(settings: &MonitorSettings) -> Result<(), SettingsError> {
    let limits = &settings.limits;
    for (name, limit) in [
        ("limits.network_requests", limits.network_requests),
        ("limits.cookies", limits.cookies),
        ("limits.geolocation_attempts", limits.geolocation_attempts),
        ("limits.fingerprinting_attempts", limits.fingerprinting_attempts),
        ("limits.form_data", limits.form_data),
    ] {
        if limit == 0 {
            return Err(SettingsError::InvalidValue(format!("{} must be at least 1", name)));
        }
    }

    let debounce = &settings.debounce;
    for (name, window) in [
        ("debounce.geolocation_ms", debounce.geolocation_ms),
        ("debounce.fingerprint_ms", debounce.fingerprint_ms),
        ("debounce.form_input_ms", debounce.form_input_ms),
    ] {
        if window < 0 {
            return Err(SettingsError::InvalidValue(format!(
                "{} must not be negative, got {}",
                name, window
            )));
        }
    }

    let t = &settings.thresholds;
    let pairs: [(&str, Threshold); 6] = [
        ("thresholds.requests", t.requests),
        ("thresholds.cookies", t.cookies),
        ("thresholds.third_party_cookies", t.third_party_cookies),
        ("thresholds.geolocation", t.geolocation),
        ("thresholds.forms", t.forms),
        ("thresholds.fingerprinting", t.fingerprinting),
    ];
    for (name, threshold) in pairs {
        if threshold.warning > threshold.alert {
            return Err(SettingsError::InvalidValue(format!(
                "{}: warning {} is above alert {}",
                name, threshold.warning, threshold.alert
            )));
        }
    }

    if settings.display.poll_interval_ms == 0 {
        return Err(SettingsError::InvalidValue(
            "display.poll_interval_ms must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// JSON pointer to the object holding the last segment of a dot path, plus
/// that segment.
fn split_key(key: &str) -> (String, &str) {
    let escape = |segment: &str| segment.replace('~', "~0").replace('/', "~1");
    match key.rsplit_once('.') {
        Some((parent, leaf)) => {
            let pointer = parent
                .split('.')
                .map(|segment| format!("/{}", escape(segment)))
                .collect::<String>();
            (pointer, leaf)
        }
        None => (String::new(), key),
    }
}

/// Settings engine persisting [`MonitorSettings`] as a JSON file.
pub struct SettingsEngine {
    config_path: String,
    settings: MonitorSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, else `settings.json` in the platform
    /// config directory. Nothing is read until [`SettingsEngineTrait::load`].
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .into_owned()
        });
        Self {
            config_path,
            settings: MonitorSettings::default(),
        }
    }

    /// Validates `candidate` and makes it current, persisting it when `persist`.
    fn replace(&mut self, candidate: MonitorSettings, persist: bool) -> Result<(), SettingsError> {
        validate(&candidate)?;
        self.settings = candidate;
        if persist {
            self.save()?;
        }
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Reads the settings file. A missing file means defaults. A file that
    /// does not parse, or holds values the monitor cannot run with, is an
    /// error and leaves the current settings untouched.
    fn load(&mut self) -> Result<MonitorSettings, SettingsError> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.config_path, "no settings file, using defaults");
                self.settings = MonitorSettings::default();
                return Ok(self.settings.clone());
            }
            Err(e) => {
                return Err(SettingsError::IoError(format!(
                    "cannot read {}: {}",
                    self.config_path, e
                )))
            }
        };

        let candidate: MonitorSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("cannot parse {}: {}", self.config_path, e))
        })?;
        self.replace(candidate, false)?;
        debug!(path = %self.config_path, "settings loaded");
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| SettingsError::IoError(format!("cannot create {}: {}", dir.display(), e)))?;
        }
        let body = serde_json::to_vec_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        fs::write(path, body)
            .map_err(|e| SettingsError::IoError(format!("cannot write {}: {}", self.config_path, e)))
    }

    fn get_settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Replaces the value at a dot path such as `limits.cookies` or
    /// `thresholds.forms.alert`, then validates and saves the result.
    /// Only existing keys can be set.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let mut document = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;

        let (parent, leaf) = split_key(key);
        let slot = document
            .pointer_mut(&parent)
            .and_then(Value::as_object_mut)
            .and_then(|section| section.get_mut(leaf))
            .ok_or_else(|| SettingsError::InvalidKey(format!("no setting named '{}'", key)))?;
        *slot = value;

        let candidate: MonitorSettings = serde_json::from_value(document)
            .map_err(|e| SettingsError::InvalidValue(format!("'{}': {}", key, e)))?;
        self.replace(candidate, true)?;
        info!(key, "setting updated");
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.replace(MonitorSettings::default(), true)?;
        info!("settings reset to defaults");
        Ok(())
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
