//! Append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{CalendarError, CalendarResult};
use crate::models::{MonthPeriod, Transfer};

use super::entry::{AuditEntry, Operation};

/// Handles writing audit entries to the audit log file (JSONL)
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_for_append(&self) -> CalendarResult<File> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalendarError::Io(format!("Failed to create audit log directory: {}", e))
            })?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| CalendarError::Io(format!("Failed to open audit log: {}", e)))
    }

    /// Append one entry
    pub fn log(&self, entry: &AuditEntry) -> CalendarResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush
    pub fn log_batch(&self, entries: &[AuditEntry]) -> CalendarResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;
        for entry in entries {
            let json = serde_json::to_string(entry).map_err(|e| {
                CalendarError::Json(format!("Failed to serialize audit entry: {}", e))
            })?;

            writeln!(file, "{}", json)
                .map_err(|e| CalendarError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        file.flush()
            .map_err(|e| CalendarError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub fn read_all(&self) -> CalendarResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| CalendarError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                CalendarError::Io(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                CalendarError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Transfers recorded for one user's calendar, oldest first
    pub fn transfers_for(&self, user: &str, period: &MonthPeriod) -> CalendarResult<Vec<Transfer>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.operation == Operation::Transfer && e.user.as_deref() == Some(user))
            .filter_map(|e| e.after)
            .filter_map(|value| serde_json::from_value::<Transfer>(value).ok())
            .filter(|t| period.contains(t.to_date))
            .collect())
    }

    /// Every entry touching one user's calendar for `period`, oldest first
    pub fn history_for(&self, user: &str, period: &MonthPeriod) -> CalendarResult<Vec<AuditEntry>> {
        let calendar_id = format!("{}/{}", user, period);
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.user.as_deref() == Some(user))
            .filter(|e| match e.operation {
                Operation::Transfer => e
                    .after
                    .clone()
                    .and_then(|value| serde_json::from_value::<Transfer>(value).ok())
                    .is_some_and(|t| period.contains(t.to_date)),
                _ => e.entity_id == calendar_id,
            })
            .collect())
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }
}
