//! Load the full log history from the WAL and the CSV archive.

use crate::{parse_day, Error, LogEntry, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

/// CSV row format for reading archived entries
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    habit_id: String,
    date: String,
    value: f64,
    logged_at: String,
}

impl TryFrom<CsvRow> for LogEntry {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| Error::Other(format!("Invalid UUID: {}", e)))?;
        let habit_id = Uuid::parse_str(&row.habit_id)
            .map_err(|e| Error::Other(format!("Invalid habit UUID: {}", e)))?;
        let date = parse_day(&row.date)?;
        if !row.value.is_finite() {
            return Err(Error::Other(format!("Non-finite value: {}", row.value)));
        }
        let logged_at = DateTime::parse_from_rfc3339(&row.logged_at)
            .map_err(|e| Error::Other(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(LogEntry {
            id,
            habit_id,
            date,
            value: row.value,
            logged_at,
        })
    }
}

/// Load every log entry from both sources.
///
/// Entries present in both the WAL and the CSV (an interrupted rollup) are
/// kept once. The result is sorted by day, then by recording time.
pub fn load_entries(wal_path: &Path, csv_path: &Path) -> Result<Vec<LogEntry>> {
    let mut entries = Vec::new();
    let mut seen_ids = HashSet::new();

    for entry in crate::wal::read_entries(wal_path)? {
        if seen_ids.insert(entry.id) {
            entries.push(entry);
        }
    }

    if csv_path.exists() {
        let mut csv_count = 0;
        for entry in load_entries_from_csv(csv_path)? {
            if seen_ids.insert(entry.id) {
                entries.push(entry);
                csv_count += 1;
            }
        }
        tracing::debug!("Loaded {} log entries from CSV", csv_count);
    }

    entries.sort_by(|a, b| a.date.cmp(&b.date).then(a.logged_at.cmp(&b.logged_at)));

    tracing::debug!("Loaded {} log entries in total", entries.len());
    Ok(entries)
}

fn load_entries_from_csv(path: &Path) -> Result<Vec<LogEntry>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match LogEntry::try_from(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!("Failed to parse CSV row: {}", e),
            },
            Err(e) => tracing::warn!("Failed to deserialize CSV row: {}", e),
        }
    }

    Ok(entries)
}
