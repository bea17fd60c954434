// JSON output: update payloads and pre-upload backups

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use lokal_recon::UploadItem;
use serde::Serialize;

/// Serialize the update payload exactly as it would be POSTed.
pub fn payload_to_string(items: &[UploadItem]) -> Result<String, String> {
    serde_json::to_string(items).map_err(|e| e.to_string())
}

/// Write the update payload to `path` (single-line JSON array).
pub fn write_payload(path: &Path, items: &[UploadItem]) -> Result<(), String> {
    let body = payload_to_string(items)?;
    std::fs::write(path, body).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Save the remote state of a category before it is overwritten.
///
/// `records` are the service records as returned, so ids and modification
/// stamps survive. Creates `dir` if needed and returns the path of the
/// written file, `<category>-<YYYYMMDDTHHMMSSZ>.json`.
pub fn write_backup(dir: &Path, category: &str, records: &[serde_json::Value]) -> Result<PathBuf, String> {
    write_backup_at(dir, category, records, Utc::now())
}

fn write_backup_at(
    dir: &Path,
    category: &str,
    records: &[serde_json::Value],
    at: DateTime<Utc>,
) -> Result<PathBuf, String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("Failed to create backup directory {}: {}", dir.display(), e))?;

    let path = dir.join(format!("{}-{}.json", category, at.format("%Y%m%dT%H%M%SZ")));
    write_pretty(&path, records)?;
    Ok(path)
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).map_err(|e| e.to_string())
}
