//! Write-Ahead Log (WAL) for habit log entries.
//!
//! Entries are appended to a JSONL (JSON Lines) file with file locking
//! so that concurrent `log` invocations never interleave partial lines.
//!
//! Only finite values are written or read back: JSON has no encoding for
//! NaN or infinity, and a non-finite total would poison every day it
//! is summed into.

use crate::{Error, LogEntry, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Destination for newly recorded log entries
pub trait LogSink {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
}

/// JSONL-based log sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl LogSink for JsonlSink {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        if !entry.value.is_finite() {
            return Err(Error::Other(format!(
                "log value must be a finite number, got {}",
                entry.value
            )));
        }
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(entry)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended log entry {} to WAL", entry.id);
        Ok(())
    }
}

/// Read all log entries from a WAL file.
///
/// Lines that fail to parse or carry a non-finite value are skipped with a
/// warning.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut entries = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<LogEntry>(&line) {
            Ok(entry) if entry.value.is_finite() => entries.push(entry),
            Ok(entry) => {
                tracing::warn!(
                    "Skipping log entry {} at line {}: non-finite value {}",
                    entry.id,
                    line_num + 1,
                    entry.value
                );
            }
            Err(e) => {
                tracing::warn!("Failed to parse log entry at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} log entries from WAL", entries.len());
    Ok(entries)
}
