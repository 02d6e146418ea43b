use trackerlens::types::errors::*;

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::DatabaseError("disk full".to_string()).to_string(),
        "Store database error: disk full"
    );
    assert_eq!(
        StoreError::SerializationError("bad float".to_string()).to_string(),
        "Store serialization error: bad float"
    );
    assert_eq!(StoreError::LockPoisoned.to_string(), "Store lock poisoned");
}

#[test]
fn store_error_from_rusqlite() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
    assert_eq!(
        SettingsError::SerializationError("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
    assert_eq!(
        SettingsError::InvalidKey("limits.nope".to_string()).to_string(),
        "Invalid settings key: limits.nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("not a number".to_string()).to_string(),
        "Invalid settings value: not a number"
    );
}

// === HistogramError Tests ===

#[test]
fn histogram_error_display() {
    assert_eq!(
        HistogramError::TimestampOutOfRange(i64::MAX).to_string(),
        format!("Timestamp out of range: {}", i64::MAX)
    );
}

// === MonitorError Tests ===

#[test]
fn monitor_error_wraps_store_error() {
    let err: MonitorError = StoreError::LockPoisoned.into();
    assert_eq!(err.to_string(), "Monitor store error: Store lock poisoned");
}

#[test]
fn monitor_error_wraps_settings_error() {
    let err: MonitorError = SettingsError::InvalidKey("x".to_string()).into();
    assert!(matches!(err, MonitorError::Settings(_)));
}

#[test]
fn monitor_error_channel_variants() {
    assert_eq!(MonitorError::ChannelClosed.to_string(), "Monitor task is not running");
    assert_eq!(MonitorError::ReplyDropped.to_string(), "Monitor task dropped the reply");
}

#[test]
fn monitor_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(MonitorError::ChannelClosed);
    assert!(err.source().is_none());
}
