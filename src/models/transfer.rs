//! Transfer records emitted by redistribution

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryKey;
use super::ids::TransferId;
use super::money::Money;

/// Why planned budget was moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferReason {
    /// Budget moved to cover a day where spending exceeded plan
    OverspendCoverage,
}

impl fmt::Display for TransferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferReason::OverspendCoverage => write!(f, "overspend coverage"),
        }
    }
}

/// An immutable record of planned budget moving between days
///
/// `source_category` is debited on `from_date`; `category` (the overspent
/// category being covered) is credited on `to_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: TransferId,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub category: CategoryKey,
    pub source_category: CategoryKey,
    pub amount: Money,
    pub reason: TransferReason,
}

impl Transfer {
    /// Create a coverage transfer.
    ///
    /// The ID is derived from `run` (a digest of the run's inputs), the
    /// record's `sequence` within that run, and its content. Identical runs
    /// reproduce identical IDs; runs over different inputs get distinct ones.
    pub(crate) fn coverage(
        run: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
        source_category: CategoryKey,
        category: CategoryKey,
        amount: Money,
        sequence: usize,
    ) -> Self {
        let id = TransferId::derive(&format!(
            "{}/{}:{}>{}:{}:{}:{}",
            run,
            from_date,
            source_category,
            to_date,
            category,
            amount.cents(),
            sequence
        ));
        Self {
            id,
            from_date,
            to_date,
            category,
            source_category,
            amount,
            reason: TransferReason::OverspendCoverage,
        }
    }

    /// Whether the transfer moves budget between two different categories
    pub fn crosses_categories(&self) -> bool {
        self.category != self.source_category
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}:{} -> {}:{} ({})",
            self.id,
            self.amount,
            self.from_date,
            self.source_category,
            self.to_date,
            self.category,
            self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_coverage_transfer_id_is_stable() {
        let dining = CategoryKey::new("dining").unwrap();
        let a = Transfer::coverage(
            "run-a",
            date(8),
            date(7),
            dining.clone(),
            dining.clone(),
            Money::from_cents(3500),
            0,
        );
        let b = Transfer::coverage(
            "run-a",
            date(8),
            date(7),
            dining.clone(),
            dining,
            Money::from_cents(3500),
            0,
        );
        assert_eq!(a, b);
        assert!(!a.crosses_categories());
        assert_eq!(a.reason, TransferReason::OverspendCoverage);
    }

    #[test]
    fn test_same_content_in_another_run_gets_another_id() {
        let dining = CategoryKey::new("dining").unwrap();
        let make = |run: &str| {
            Transfer::coverage(
                run,
                date(20),
                date(3),
                dining.clone(),
                dining.clone(),
                Money::from_cents(100),
                0,
            )
        };
        assert_ne!(make("run-a").id, make("run-b").id);
        assert_eq!(make("run-a").id, make("run-a").id);
    }

    #[test]
    fn test_reason_serializes_screaming() {
        let json = serde_json::to_string(&TransferReason::OverspendCoverage).unwrap();
        assert_eq!(json, "\"OVERSPEND_COVERAGE\"");
    }
}
