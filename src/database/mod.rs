//! TrackerLens persistence layer.
//!
//! Schema migrations and the key-value [`StateStore`] the monitor core
//! reads and writes, backed by SQLite or by memory.
//!
//! # Usage
//!
//! ```no_run
//! use trackerlens::database::{SqliteStore, StateStore, StoreKey};
//!
//! // Open a persistent store
//! let store = SqliteStore::open("trackerlens.db").expect("failed to open store");
//!
//! // Missing keys read back as `None`
//! let stats = store.get(StoreKey::GlobalStats).expect("read failed");
//! assert!(stats.is_none());
//! ```

pub mod migrations;
pub mod store;

pub use store::{MemoryStore, SqliteStore, StateStore, StoreKey};
