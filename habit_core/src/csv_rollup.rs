//! CSV rollup for archiving WAL log entries.
//!
//! The CSV is fsynced before the WAL is renamed, so a crash mid-rollup can
//! at worst leave the same entries in both files; readers deduplicate by id.

use crate::{format_day, LogEntry, Result};
use std::fs::OpenOptions;
use std::path::Path;

/// A row in the CSV archive
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    habit_id: String,
    date: String,
    value: f64,
    logged_at: String,
}

impl From<&LogEntry> for CsvRow {
    fn from(entry: &LogEntry) -> Self {
        CsvRow {
            id: entry.id.to_string(),
            habit_id: entry.habit_id.to_string(),
            date: format_day(entry.date),
            value: entry.value,
            logged_at: entry.logged_at.to_rfc3339(),
        }
    }
}

/// Roll up WAL entries into the CSV archive and archive the WAL
///
/// 1. Reads all entries from the WAL
/// 2. Appends them to the CSV (writing headers only for a new file)
/// 3. Syncs the CSV to disk
/// 4. Renames the WAL to `.wal.processed`
///
/// Returns the number of entries rolled up.
pub fn wal_to_csv_and_archive(wal_path: &Path, csv_path: &Path) -> Result<usize> {
    let entries = crate::wal::read_entries(wal_path)?;

    if entries.is_empty() {
        tracing::info!("No log entries in WAL to roll up");
        return Ok(0);
    }

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    for entry in &entries {
        writer.serialize(CsvRow::from(entry))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Wrote {} log entries to CSV", entries.len());

    let processed_path = wal_path.with_extension("wal.processed");
    std::fs::rename(wal_path, &processed_path)?;

    tracing::info!("Archived WAL to {:?}", processed_path);

    Ok(entries.len())
}

/// Remove all `.processed` WAL files in a directory
pub fn cleanup_processed_wals(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.extension().is_some_and(|ext| ext == "processed") {
            std::fs::remove_file(&path)?;
            tracing::debug!("Removed processed WAL: {:?}", path);
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!("Cleaned up {} processed WAL files", count);
    }

    Ok(count)
}
