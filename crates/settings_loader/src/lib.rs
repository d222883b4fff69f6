//! # Settings Loader
//!
//! Loads the optional `settings.json` that tunes a batch run: the unit factor
//! between hundred-million display units and the ledger's thousand unit, the
//! prefix used to normalize market-data codes, the market tags that mark
//! company rows, and the yearly ROE cutoff year.
//!
//! Every field has a default, so a partial file only overrides what it names.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // Defaults when no path is given
//! let path: Option<PathBuf> = None;
//! let settings = settings_loader::load_optional_settings(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?settings, "settings loaded");
    Ok(settings)
}

/// Loads settings from an optional path, returning the defaults if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(settings_path) => load_settings(settings_path),
        None => Ok(Settings::default()),
    }
}
