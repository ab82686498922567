//! Platform-specific configuration and data paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/birbybot/`
/// - macOS: `~/Library/Application Support/birbybot/`
/// - Windows: `%APPDATA%\birbybot\`
pub fn config_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the data directory holding the image cache and record store.
///
/// - Linux: `~/.local/share/birbybot/`
pub fn data_dir() -> Result<PathBuf> {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(Error::DataDirNotFound)
}
