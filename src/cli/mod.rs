//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the clap
//! argument parsing with the service layer.

pub mod build;
pub mod ledger;
pub mod rebalance;
pub mod show;
pub mod spending;

pub use build::{handle_build_command, BuildArgs};
pub use ledger::{handle_ledger_command, LedgerArgs};
pub use rebalance::{handle_rebalance_command, RebalanceArgs};
pub use show::{handle_show_command, ShowArgs};
pub use spending::{handle_import_command, handle_spend_command, ImportArgs, SpendArgs};

use chrono::{Local, NaiveDate};

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{CalendarPaths, Settings};
use crate::error::{CalendarError, CalendarResult};
use crate::models::MonthPeriod;
use crate::storage::CalendarStore;

/// Everything a command needs: settings, the calendar store and the audit log
pub struct Workspace {
    pub settings: Settings,
    pub store: CalendarStore,
    pub audit: AuditLogger,
}

impl Workspace {
    pub fn open(paths: CalendarPaths) -> CalendarResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        Ok(Self {
            store: CalendarStore::new(paths.clone()),
            audit: AuditLogger::new(paths.audit_log()),
            settings,
        })
    }

    /// The named user, or the configured default
    pub fn user(&self, user: Option<String>) -> String {
        user.unwrap_or_else(|| self.settings.default_user.clone())
    }

    pub fn symbol(&self) -> &str {
        &self.settings.currency_symbol
    }

    /// Append entries to the audit log unless auditing is switched off
    pub fn record(&self, entries: &[AuditEntry]) -> CalendarResult<()> {
        if self.settings.audit_enabled {
            self.audit.log_batch(entries)?;
        }
        Ok(())
    }
}

/// Parse "YYYY-MM", defaulting to the current month
pub fn parse_month(month: Option<&str>) -> CalendarResult<MonthPeriod> {
    match month {
        Some(raw) => MonthPeriod::parse(raw)
            .map_err(|e| CalendarError::InvalidDateRange(format!("'{}': {}", raw, e))),
        None => Ok(MonthPeriod::current()),
    }
}

/// Parse a date in the configured format, falling back to ISO 8601
pub fn parse_date(raw: &str, format: &str) -> CalendarResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, format)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .map_err(|_| CalendarError::Validation(format!("Could not parse date: '{}'", raw)))
}

/// Today, clamped into `period`
pub fn default_as_of(period: &MonthPeriod) -> NaiveDate {
    Local::now()
        .date_naive()
        .clamp(period.start_date(), period.end_date())
}
