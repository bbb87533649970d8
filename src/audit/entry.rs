//! Audit entry data structures
//!
//! One entry per build, spending batch, redistribution run, emitted transfer,
//! or aborted redistribution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CalendarDay, MonthPeriod, SpendingLedger, Transfer};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A calendar was built from a plan
    Build,
    /// Spending was recorded against a calendar
    Spend,
    /// A redistribution run completed
    Redistribute,
    /// Planned budget moved between days
    Transfer,
    /// A redistribution was rejected and nothing was saved
    Abort,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Build => write!(f, "BUILD"),
            Operation::Spend => write!(f, "SPEND"),
            Operation::Redistribute => write!(f, "REDISTRIBUTE"),
            Operation::Transfer => write!(f, "TRANSFER"),
            Operation::Abort => write!(f, "ABORT"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Calendar,
    Transfer,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Calendar => write!(f, "Calendar"),
            EntityType::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// `<user>/<YYYY-MM>` for calendars, the full UUID for transfers
    pub entity_id: String,

    /// User whose calendar was affected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// State before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// State after the operation, or the record emitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary of what changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

fn calendar_id(user: &str, period: &MonthPeriod) -> String {
    format!("{}/{}", user, period)
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: String, user: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            user: Some(user.to_string()),
            before: None,
            after: None,
            summary: None,
        }
    }

    /// A calendar was built (or rebuilt, replacing `previous`)
    pub fn build(
        user: &str,
        period: &MonthPeriod,
        previous: Option<&[CalendarDay]>,
        calendar: &[CalendarDay],
    ) -> Self {
        let mut entry = Self::new(
            Operation::Build,
            EntityType::Calendar,
            calendar_id(user, period),
            user,
        );
        entry.before = previous.and_then(|days| serde_json::to_value(days).ok());
        entry.after = serde_json::to_value(calendar).ok();
        entry.summary = previous.and_then(|days| super::diff::day_total_changes(days, calendar));
        entry
    }

    /// Spending was recorded against a calendar
    pub fn spend(user: &str, period: &MonthPeriod, ledger: &SpendingLedger) -> Self {
        let mut entry = Self::new(
            Operation::Spend,
            EntityType::Calendar,
            calendar_id(user, period),
            user,
        );
        entry.after = serde_json::to_value(ledger).ok();
        entry.summary = Some(format!("recorded {} of spending", ledger.total()));
        entry
    }

    /// A redistribution run changed `before` into `after`
    pub fn redistribute(
        user: &str,
        period: &MonthPeriod,
        before: &[CalendarDay],
        after: &[CalendarDay],
    ) -> Self {
        let mut entry = Self::new(
            Operation::Redistribute,
            EntityType::Calendar,
            calendar_id(user, period),
            user,
        );
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.summary = super::diff::day_total_changes(before, after);
        entry
    }

    /// One emitted transfer
    pub fn transfer(user: &str, transfer: &Transfer) -> Self {
        let mut entry = Self::new(
            Operation::Transfer,
            EntityType::Transfer,
            transfer.id.as_uuid().to_string(),
            user,
        );
        entry.after = serde_json::to_value(transfer).ok();
        entry.summary = Some(transfer.to_string());
        entry
    }

    /// A redistribution failed with `reason`; the stored calendar is unchanged
    pub fn abort(user: &str, period: &MonthPeriod, reason: &str) -> Self {
        let mut entry = Self::new(
            Operation::Abort,
            EntityType::Calendar,
            calendar_id(user, period),
            user,
        );
        entry.summary = Some(reason.to_string());
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(summary) = &self.summary {
            output.push_str(&format!("\n  {}", summary));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryKey, Money};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn period() -> MonthPeriod {
        MonthPeriod::new(2025, 3).unwrap()
    }

    fn day(d: u32, cents: i64) -> CalendarDay {
        let mut planned = BTreeMap::new();
        planned.insert(CategoryKey::new("dining").unwrap(), Money::from_cents(cents));
        CalendarDay::from_parts(
            NaiveDate::from_ymd_opt(2025, 3, d).unwrap(),
            planned,
            BTreeMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Build.to_string(), "BUILD");
        assert_eq!(Operation::Transfer.to_string(), "TRANSFER");
        assert_eq!(Operation::Abort.to_string(), "ABORT");
    }

    #[test]
    fn test_build_entry() {
        let entry = AuditEntry::build("alex", &period(), None, &[day(1, 100)]);
        assert_eq!(entry.operation, Operation::Build);
        assert_eq!(entry.entity_type, EntityType::Calendar);
        assert_eq!(entry.entity_id, "alex/2025-03");
        assert!(entry.before.is_none());
        assert!(entry.after.is_some());
        assert!(entry.summary.is_none());
    }

    #[test]
    fn test_redistribute_entry_summarizes_changes() {
        let before = [day(7, 10000), day(8, 11000)];
        let after = [day(7, 17000), day(8, 4000)];
        let entry = AuditEntry::redistribute("alex", &period(), &before, &after);
        let summary = entry.summary.unwrap();
        assert!(summary.contains("2025-03-07: $100.00 -> $170.00"));
        assert!(summary.contains("2025-03-08: $110.00 -> $40.00"));
    }

    #[test]
    fn test_abort_entry_serializes_without_state() {
        let entry = AuditEntry::abort("alex", &period(), "monthly total changed");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operation\":\"abort\""));
        assert!(!json.contains("\"before\""));

        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.operation, Operation::Abort);
        assert!(parsed
            .format_human_readable()
            .contains("ABORT Calendar alex/2025-03"));
    }
}
