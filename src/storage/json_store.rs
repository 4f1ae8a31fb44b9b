use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::ScanResult;
use crate::errors::ScanOutcome;

pub(crate) fn ensure_parent(path: &Path) -> ScanOutcome<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Pretty JSON with a trailing newline; parent directories are created.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ScanOutcome<()> {
    ensure_parent(path)?;
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    fs::write(path, content)?;
    Ok(())
}

pub fn write_scan_json(path: &Path, result: &ScanResult) -> ScanOutcome<()> {
    write_json(path, result)
}

/// Load a scan written by [`write_scan_json`]; missing or null fields take defaults.
pub fn read_scan_json(path: &Path) -> ScanOutcome<ScanResult> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
