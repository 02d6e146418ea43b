// TrackerLens platform abstraction
// Provides platform-specific config and data paths for Windows, macOS, and Linux.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Directory name used under the platform roots.
pub const APP_DIR_NAME: &str = "trackerlens";

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/trackerlens` (or `$XDG_CONFIG_HOME/trackerlens`)
/// - **macOS**: `~/Library/Application Support/TrackerLens`
/// - **Windows**: `%APPDATA%/TrackerLens`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the platform-specific data directory, where the state database lives.
///
/// - **Linux**: `~/.local/share/trackerlens` (or `$XDG_DATA_HOME/trackerlens`)
/// - **macOS**: `~/Library/Application Support/TrackerLens`
/// - **Windows**: `%APPDATA%/TrackerLens`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
