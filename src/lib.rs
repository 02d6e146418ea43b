//! TrackerLens — passive tracker classification and privacy statistics for browser tabs.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod app;
pub mod database;
pub mod event_loop;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
