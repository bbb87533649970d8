//! File I/O utilities with atomic writes
//!
//! Calendars and settings are written through a temp file that is synced and
//! renamed over the target, so a crash leaves either the old or the new file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CalendarError;

/// Read JSON from a file, returning `None` if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<Option<T>, CalendarError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    read_json_required(path).map(Some)
}

/// Read JSON from a file, returning an error if the file doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, CalendarError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        CalendarError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| CalendarError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Read a JSON or YAML document, chosen by file extension
///
/// `.yaml` and `.yml` are parsed as YAML; anything else as JSON.
pub fn read_document<T, P>(path: P) -> Result<T, CalendarError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if !is_yaml {
        return read_json_required(path);
    }

    let file = File::open(path).map_err(|e| {
        CalendarError::Storage(format!("Failed to open {}: {}", path.display(), e))
    })?;
    serde_yaml::from_reader(BufReader::new(file))
        .map_err(|e| CalendarError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), CalendarError>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CalendarError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target, so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| CalendarError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| CalendarError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| CalendarError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| CalendarError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        CalendarError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        cents: i64,
    }

    fn sample() -> Sample {
        Sample {
            name: "dining".to_string(),
            cents: 12693,
        }
    }

    #[test]
    fn test_read_missing_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Sample> = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
        assert!(read_json_required::<Sample, _>(temp_dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.json");

        write_json_atomic(&path, &sample()).unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("sample.json.tmp").exists());
        assert_eq!(read_json::<Sample, _>(&path).unwrap(), Some(sample()));
    }

    #[test]
    fn test_read_document_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let yaml = temp_dir.path().join("plan.yml");
        let json = temp_dir.path().join("plan.json");
        fs::write(&yaml, "name: dining\ncents: 12693\n").unwrap();
        fs::write(&json, r#"{"name": "dining", "cents": 12693}"#).unwrap();

        assert_eq!(read_document::<Sample, _>(&yaml).unwrap(), sample());
        assert_eq!(read_document::<Sample, _>(&json).unwrap(), sample());
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();
        let err = read_json::<Sample, _>(&path).unwrap_err();
        assert!(matches!(err, CalendarError::Storage(_)));
    }
}
