// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawSettingsFile, Settings};
use crate::errors::Result;
use crate::fs::FileSystem;

/// File name of the optional settings file inside the plan directory.
pub const SETTINGS_FILE_NAME: &str = "studyplan.toml";

/// Load a settings file and return the raw `RawSettingsFile`.
///
/// This only performs TOML deserialization; use [`load_and_validate`] for the
/// value checks. A missing file yields the defaults.
pub fn load_from_path(fs: &dyn FileSystem, path: &Path) -> Result<RawSettingsFile> {
    if !fs.is_file(path) {
        debug!(path = %path.display(), "no settings file; using defaults");
        return Ok(RawSettingsFile::default());
    }

    let contents = fs.read_to_string(path)?;
    let raw: RawSettingsFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), "loaded settings file");

    Ok(raw)
}

/// Load a settings file from path and validate it.
pub fn load_and_validate(fs: &dyn FileSystem, path: &Path) -> Result<Settings> {
    let raw = load_from_path(fs, path)?;
    Settings::try_from(raw)
}

/// Default settings path for a plan directory: `<root>/studyplan.toml`.
pub fn default_settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}
