//! Key-value state store used by the monitor core.
//!
//! Values are JSON documents addressed by a fixed set of keys. There are no
//! transactions: callers read a key, compute the new value and write it back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::migrations;
use crate::types::errors::StoreError;

/// Keys held in the state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    NetworkRequests,
    Cookies,
    GeolocationAttempts,
    FingerprintingAttempts,
    FormData,
    GlobalStats,
}

impl StoreKey {
    pub const ALL: [StoreKey; 6] = [
        StoreKey::NetworkRequests,
        StoreKey::Cookies,
        StoreKey::GeolocationAttempts,
        StoreKey::FingerprintingAttempts,
        StoreKey::FormData,
        StoreKey::GlobalStats,
    ];

    /// The per-tab log keys, i.e. every key except the global statistics.
    pub const TAB_LOGS: [StoreKey; 5] = [
        StoreKey::NetworkRequests,
        StoreKey::Cookies,
        StoreKey::GeolocationAttempts,
        StoreKey::FingerprintingAttempts,
        StoreKey::FormData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::NetworkRequests => "networkRequests",
            StoreKey::Cookies => "cookies",
            StoreKey::GeolocationAttempts => "geolocationAttempts",
            StoreKey::FingerprintingAttempts => "fingerprintingAttempts",
            StoreKey::FormData => "formData",
            StoreKey::GlobalStats => "globalStats",
        }
    }

    /// Name of the slot that keeps the last unreadable value of this key.
    pub fn backup_name(&self) -> String {
        format!("{}.unreadable", self.as_str())
    }
}

/// Trait defining the persisted store interface.
pub trait StateStore: Send {
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;
    fn set(&self, key: StoreKey, value: Value) -> Result<(), StoreError>;
    /// Removes every key and every backup.
    fn clear(&self) -> Result<(), StoreError>;
    /// Keeps `value` aside for `key`, replacing any earlier backup.
    fn set_backup(&self, key: StoreKey, value: Value) -> Result<(), StoreError>;
    fn get_backup(&self, key: StoreKey) -> Result<Option<Value>, StoreError>;
}

/// Typed helpers layered over [`StateStore`].
pub trait StateStoreExt: StateStore {
    /// Reads and decodes `key`.
    ///
    /// A missing key yields `T::default()`. A value that no longer decodes
    /// is copied to the key's backup slot and then treated as empty, so that
    /// observation keeps working and the next write cannot destroy it.
    fn load<T: DeserializeOwned + Default>(&self, key: StoreKey) -> Result<T, StoreError> {
        let Some(value) = self.get(key)? else {
            return Ok(T::default());
        };
        match T::deserialize(&value) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                warn!(
                    key = key.as_str(),
                    backup = %key.backup_name(),
                    error = %e,
                    "stored value does not decode, keeping a backup"
                );
                self.set_backup(key, value)?;
                Ok(T::default())
            }
        }
    }

    /// Encodes `value` and writes it under `key`.
    fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let encoded = serde_json::to_value(value)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.set(key, encoded)
    }
}

impl<S: StateStore + ?Sized> StateStoreExt for S {}

/// State store backed by the `kv_store` SQLite table.
///
/// Opening runs any pending schema migrations.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::migrated(Connection::open(path)?)
    }

    /// Opens a store that lives only as long as the returned value.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn read_raw(&self, name: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1", params![name], |row| row.get(0))
            .optional()?)
    }

    fn write_raw(&self, name: &str, text: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, text, Self::now()],
        )?;
        Ok(())
    }
}

fn encode(value: &Value) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::SerializationError(e.to_string()))
}

impl StateStore for SqliteStore {
    /// Text that is not JSON at all is moved to the backup slot and reads as missing.
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let Some(text) = self.read_raw(key.as_str())? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "stored value is not valid JSON, keeping a backup");
                self.set_backup(key, Value::String(text))?;
                Ok(None)
            }
        }
    }

    fn set(&self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        self.write_raw(key.as_str(), &encode(&value)?)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM kv_store", [])?;
        Ok(())
    }

    fn set_backup(&self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        self.write_raw(&key.backup_name(), &encode(&value)?)
    }

    fn get_backup(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        self.read_raw(&key.backup_name())?
            .map(|text| serde_json::from_str(&text).map_err(|e| StoreError::SerializationError(e.to_string())))
            .transpose()
    }
}

/// Volatile state store, used by tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StoreKey, Value>>,
    backups: Mutex<HashMap<StoreKey, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(values.get(&key).cloned())
    }

    fn set(&self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::LockPoisoned)?;
        values.insert(key, value);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.values.lock().map_err(|_| StoreError::LockPoisoned)?.clear();
        self.backups.lock().map_err(|_| StoreError::LockPoisoned)?.clear();
        Ok(())
    }

    fn set_backup(&self, key: StoreKey, value: Value) -> Result<(), StoreError> {
        let mut backups = self.backups.lock().map_err(|_| StoreError::LockPoisoned)?;
        backups.insert(key, value);
        Ok(())
    }

    fn get_backup(&self, key: StoreKey) -> Result<Option<Value>, StoreError> {
        let backups = self.backups.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(backups.get(&key).cloned())
    }
}
