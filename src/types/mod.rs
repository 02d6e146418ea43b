// TrackerLens shared type definitions
// Each submodule defines types used across the monitor core and its views.

pub mod errors;
pub mod event;
pub mod log;
pub mod settings;
pub mod stats;
pub mod tracker;
pub mod view;
