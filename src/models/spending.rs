//! Actual spending, per day and per category

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::CategoryKey;
use super::day::CalendarDay;
use super::money::Money;

/// Actual spending to date, keyed by day then category
///
/// This is the shape the redistributor consumes. It can be assembled
/// directly by a caller or extracted from the spent amounts already recorded
/// on calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpendingLedger {
    by_day: BTreeMap<NaiveDate, BTreeMap<CategoryKey, Money>>,
}

impl SpendingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the spent amounts recorded on a calendar
    pub fn from_calendar(days: &[CalendarDay]) -> Self {
        let by_day = days
            .iter()
            .filter(|day| !day.spent_by_category().is_empty())
            .map(|day| (day.date, day.spent_by_category().clone()))
            .collect();
        Self { by_day }
    }

    /// Add spending. Amounts for the same day and category accumulate.
    pub fn record(&mut self, date: NaiveDate, category: CategoryKey, amount: Money) {
        *self
            .by_day
            .entry(date)
            .or_default()
            .entry(category)
            .or_default() += amount;
    }

    /// Builder-style variant of [`record`](Self::record)
    pub fn with(mut self, date: NaiveDate, category: CategoryKey, amount: Money) -> Self {
        self.record(date, category, amount);
        self
    }

    /// Spending on one day, by category
    pub fn day(&self, date: NaiveDate) -> Option<&BTreeMap<CategoryKey, Money>> {
        self.by_day.get(&date)
    }

    pub fn spent_on(&self, date: NaiveDate, category: &CategoryKey) -> Money {
        self.by_day
            .get(&date)
            .and_then(|cats| cats.get(category))
            .copied()
            .unwrap_or_default()
    }

    pub fn day_total(&self, date: NaiveDate) -> Money {
        self.by_day
            .get(&date)
            .map(|cats| cats.values().sum())
            .unwrap_or_default()
    }

    /// Iterate `(date, category, amount)` entries in date then key order
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &CategoryKey, Money)> {
        self.by_day
            .iter()
            .flat_map(|(date, cats)| cats.iter().map(move |(k, m)| (*date, k, *m)))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.by_day.keys().copied()
    }

    pub fn total(&self) -> Money {
        self.entries().map(|(_, _, m)| m).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}
