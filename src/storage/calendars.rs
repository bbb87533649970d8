//! Calendar repository
//!
//! One JSON file per user and month at
//! `<base>/data/calendars/<user>/<YYYY-MM>.json`, holding the ordered days.

use std::path::PathBuf;

use tracing::debug;

use super::file_io::{read_json, write_json_atomic};
use crate::config::paths::CalendarPaths;
use crate::error::{CalendarError, CalendarResult};
use crate::models::{CalendarDay, MonthPeriod};

/// Stores built calendars keyed by (user, month)
#[derive(Debug, Clone)]
pub struct CalendarStore {
    paths: CalendarPaths,
}

impl CalendarStore {
    pub fn new(paths: CalendarPaths) -> Self {
        Self { paths }
    }

    /// Save a calendar, replacing any stored calendar for the same month.
    ///
    /// Returns the file written.
    pub fn save(&self, user: &str, days: &[CalendarDay]) -> CalendarResult<PathBuf> {
        validate_user(user)?;
        let first = days
            .first()
            .ok_or_else(|| CalendarError::Validation("cannot save an empty calendar".into()))?;
        let period = MonthPeriod::containing(first.date);
        if days.iter().any(|d| !period.contains(d.date)) {
            return Err(CalendarError::Validation(format!(
                "calendar for {} contains days from another month",
                period
            )));
        }

        let path = self.paths.calendar_file(user, &period);
        write_json_atomic(&path, days)?;
        debug!(user, month = %period, path = %path.display(), "Saved calendar");
        Ok(path)
    }

    /// Load the calendar for `user` and `period`
    pub fn load(&self, user: &str, period: &MonthPeriod) -> CalendarResult<Vec<CalendarDay>> {
        validate_user(user)?;
        let path = self.paths.calendar_file(user, period);
        read_json(&path)?
            .ok_or_else(|| CalendarError::calendar_not_found(format!("{}/{}", user, period)))
    }

    pub fn exists(&self, user: &str, period: &MonthPeriod) -> bool {
        validate_user(user).is_ok() && self.paths.calendar_file(user, period).exists()
    }

    /// Months with a stored calendar for `user`, oldest first
    pub fn list(&self, user: &str) -> CalendarResult<Vec<MonthPeriod>> {
        validate_user(user)?;
        let dir = self.paths.user_dir(user);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| {
            CalendarError::Storage(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        let mut months: Vec<MonthPeriod> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let stem = name.to_str()?.strip_suffix(".json")?;
                MonthPeriod::parse(stem).ok()
            })
            .collect();
        months.sort();
        Ok(months)
    }
}

/// User names become directory names, so keep them to a safe alphabet
fn validate_user(user: &str) -> CalendarResult<()> {
    let valid = !user.is_empty()
        && user.len() <= 64
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        && !user.starts_with('.');
    if valid {
        Ok(())
    } else {
        Err(CalendarError::Validation(format!("invalid user name '{}'", user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CategoryCatalog, CategoryKey, DistributionStrategy, Money, MonthlyBudgetPlan,
    };
    use crate::services::CalendarBuilder;
    use tempfile::TempDir;

    fn store() -> (CalendarStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CalendarPaths::with_base_dir(temp_dir.path().to_path_buf());
        (CalendarStore::new(paths), temp_dir)
    }

    fn calendar(year: i32, month: u32) -> Vec<CalendarDay> {
        let plan = MonthlyBudgetPlan::new(Money::from_cents(31000)).with_category(
            CategoryKey::new("groceries").unwrap(),
            Money::from_cents(31000),
            DistributionStrategy::spread(None, Default::default()),
        );
        CalendarBuilder::new(CategoryCatalog::default())
            .build(&plan, year, month)
            .unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let (store, _temp) = store();
        let days = calendar(2025, 3);
        let path = store.save("alex", &days).unwrap();
        assert!(path.ends_with("alex/2025-03.json"));

        let period = MonthPeriod::new(2025, 3).unwrap();
        assert!(store.exists("alex", &period));
        assert_eq!(store.load("alex", &period).unwrap(), days);
    }

    #[test]
    fn test_missing_calendar_is_not_found() {
        let (store, _temp) = store();
        let err = store
            .load("alex", &MonthPeriod::new(2025, 3).unwrap())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_months() {
        let (store, _temp) = store();
        store.save("alex", &calendar(2025, 4)).unwrap();
        store.save("alex", &calendar(2025, 2)).unwrap();
        store.save("sam", &calendar(2025, 3)).unwrap();

        let months = store.list("alex").unwrap();
        assert_eq!(
            months,
            vec![
                MonthPeriod::new(2025, 2).unwrap(),
                MonthPeriod::new(2025, 4).unwrap()
            ]
        );
        assert!(store.list("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unsafe_user_names() {
        let (store, _temp) = store();
        assert!(store.save("../etc", &calendar(2025, 3)).is_err());
        assert!(store.save("", &calendar(2025, 3)).is_err());
        assert!(store.save("a/b", &calendar(2025, 3)).is_err());
    }

    #[test]
    fn test_rejects_empty_calendar() {
        let (store, _temp) = store();
        let err = store.save("alex", &[]).unwrap_err();
        assert!(matches!(err, CalendarError::Validation(_)));
    }
}
