//! Path management for the budget calendar
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_CALENDAR_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/budget-calendar` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::CalendarError;
use crate::models::MonthPeriod;

/// Environment variable overriding the base directory
pub const DIR_ENV_VAR: &str = "BUDGET_CALENDAR_DIR";

/// Manages all paths used by the budget calendar
#[derive(Debug, Clone)]
pub struct CalendarPaths {
    base_dir: PathBuf,
}

impl CalendarPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CalendarError> {
        let base_dir = match std::env::var_os(DIR_ENV_VAR) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "budget-calendar")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    CalendarError::Config("Could not determine a home directory".into())
                })?,
        };
        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// `<base>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// `<base>/data/calendars/`
    pub fn calendars_dir(&self) -> PathBuf {
        self.data_dir().join("calendars")
    }

    /// Directory holding one user's calendars
    pub fn user_dir(&self, user: &str) -> PathBuf {
        self.calendars_dir().join(user)
    }

    /// `<base>/data/calendars/<user>/<YYYY-MM>.json`
    pub fn calendar_file(&self, user: &str, period: &MonthPeriod) -> PathBuf {
        self.user_dir(user).join(format!("{}.json", period))
    }

    /// Ensure the base and calendar directories exist
    pub fn ensure_directories(&self) -> Result<(), CalendarError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| CalendarError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.calendars_dir()).map_err(|e| {
            CalendarError::Io(format!("Failed to create calendars directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if the budget calendar has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
