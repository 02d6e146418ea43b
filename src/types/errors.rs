use thiserror::Error;

// === StoreError ===

/// Errors raised by the persisted key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database operation failed.
    #[error("Store database error: {0}")]
    DatabaseError(String),
    /// A value could not be serialized for storage.
    #[error("Store serialization error: {0}")]
    SerializationError(String),
    /// The in-memory store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to monitor settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === HistogramError ===

/// Errors produced while bucketing a request log for display.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HistogramError {
    /// A bucket start instant is outside the representable calendar range.
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),
}

// === MonitorError ===

/// Errors returned by the monitor core and its actor handle.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Reading or writing the persisted state failed.
    #[error("Monitor store error: {0}")]
    Store(#[from] StoreError),
    /// Reading or updating the settings failed.
    #[error("Monitor settings error: {0}")]
    Settings(#[from] SettingsError),
    /// The activity histogram could not be built.
    #[error("Monitor histogram error: {0}")]
    Histogram(#[from] HistogramError),
    /// The monitor task has stopped and no longer accepts messages.
    #[error("Monitor task is not running")]
    ChannelClosed,
    /// The monitor task dropped the reply before answering.
    #[error("Monitor task dropped the reply")]
    ReplyDropped,
}
