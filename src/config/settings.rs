//! User settings for the budget calendar
//!
//! Display preferences, the category catalog plans are validated against, the
//! default user, and whether operations are written to the audit log.

use serde::{Deserialize, Serialize};

use super::paths::CalendarPaths;
use crate::error::CalendarError;
use crate::models::CategoryCatalog;
use crate::storage::file_io::write_json_atomic;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when rendering amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format), also the default CSV date
    /// format for spending imports
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Categories a plan may allocate to
    #[serde(default)]
    pub categories: CategoryCatalog,

    /// User whose calendars are used when a command names none
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Whether builds and transfers are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            categories: CategoryCatalog::default(),
            default_user: default_user(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.categories
    }

    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &CalendarPaths) -> Result<Self, CalendarError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                CalendarError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                CalendarError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CalendarPaths) -> Result<(), CalendarError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CategoryKey;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_user, "default");
        assert!(settings.audit_enabled);
        assert!(settings
            .catalog()
            .contains(&CategoryKey::new("dining").unwrap()));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CalendarPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.default_user = "alex".into();
        settings.categories = CategoryCatalog::from_names(["dining", "pets"]).unwrap();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_user, "alex");
        assert_eq!(loaded.categories.len(), 2);
        assert!(loaded.catalog().contains(&CategoryKey::new("pets").unwrap()));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.schema_version, 1);
        assert!(!settings.categories.is_empty());
    }
}
