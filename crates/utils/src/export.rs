use anyhow::{Context, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

/// Writes `value` as pretty JSON to `path`, creating missing parent
/// directories.
pub fn write_export<P: AsRef<Path>>(path: P, value: &serde_json::Value) -> Result<PathBuf> {
    let path = path.as_ref().to_path_buf();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory {}", parent.display()))?;
        }
    }

    let mut file = File::create(&path)
        .with_context(|| format!("Cannot create export file at {}", path.display()))?;

    let formatted = serde_json::to_string_pretty(value)?;
    file.write_all(formatted.as_bytes())?;

    Ok(path)
}
