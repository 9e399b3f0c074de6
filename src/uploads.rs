//! Persisting uploaded and downloaded reports under the upload directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File name used for every URL download; each fetch overwrites it.
pub const FETCHED_REPORT_NAME: &str = "incident_report.pdf";

const FALLBACK_NAME: &str = "upload.pdf";

/// Reduce a client-supplied file name to a safe basename.
///
/// Directory components are discarded and characters outside
/// `[A-Za-z0-9._-]` are dropped (whitespace becomes `_`). Leading dots are
/// stripped so the result is never hidden or a relative path.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Write `bytes` to `dir/<sanitized name>`, creating `dir` if needed.
pub fn save(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create upload directory: {}", dir.display()))?;
    let path = dir.join(sanitize_filename(name));
    std::fs::write(&path, bytes)
        .with_context(|| format!("Failed to write upload: {}", path.display()))?;
    Ok(path)
}
