//! A single day of the budget calendar

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::CategoryKey;
use super::money::Money;
use crate::error::{CalendarError, CalendarResult};

/// One day's planned and actual amounts
///
/// The day total is always derived from `planned_by_category`; there is no
/// stored total that could drift from its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDay")]
pub struct CalendarDay {
    pub date: NaiveDate,

    /// Planned budget per category (never negative)
    planned_by_category: BTreeMap<CategoryKey, Money>,

    /// Actual spending per category, written only by the spending ingestion
    /// service
    spent_by_category: BTreeMap<CategoryKey, Money>,
}

impl CalendarDay {
    /// Create an empty day
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            planned_by_category: BTreeMap::new(),
            spent_by_category: BTreeMap::new(),
        }
    }

    /// Reassemble a day from stored parts, rejecting negative amounts
    pub fn from_parts(
        date: NaiveDate,
        planned_by_category: BTreeMap<CategoryKey, Money>,
        spent_by_category: BTreeMap<CategoryKey, Money>,
    ) -> CalendarResult<Self> {
        for (key, amount) in planned_by_category.iter().chain(spent_by_category.iter()) {
            if amount.is_negative() {
                return Err(CalendarError::NegativeAmount {
                    context: format!("{} on {}", key, date),
                    amount: *amount,
                });
            }
        }
        Ok(Self {
            date,
            planned_by_category,
            spent_by_category,
        })
    }

    /// Sum of planned amounts across categories
    pub fn total(&self) -> Money {
        self.planned_by_category.values().sum()
    }

    /// Sum of recorded spending across categories
    pub fn spent_total(&self) -> Money {
        self.spent_by_category.values().sum()
    }

    pub fn planned(&self, category: &CategoryKey) -> Money {
        self.planned_by_category
            .get(category)
            .copied()
            .unwrap_or_default()
    }

    pub fn spent(&self, category: &CategoryKey) -> Money {
        self.spent_by_category
            .get(category)
            .copied()
            .unwrap_or_default()
    }

    pub fn planned_by_category(&self) -> &BTreeMap<CategoryKey, Money> {
        &self.planned_by_category
    }

    pub fn spent_by_category(&self) -> &BTreeMap<CategoryKey, Money> {
        &self.spent_by_category
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Add planned budget for a category. Contributions accumulate.
    pub(crate) fn credit(&mut self, category: &CategoryKey, amount: Money) {
        if amount.is_zero() {
            return;
        }
        *self
            .planned_by_category
            .entry(category.clone())
            .or_default() += amount;
    }

    /// Remove planned budget from a category, never going below zero.
    ///
    /// Returns the amount actually removed.
    pub(crate) fn debit(&mut self, category: &CategoryKey, amount: Money) -> Money {
        if !amount.is_positive() {
            return Money::zero();
        }
        let Some(planned) = self.planned_by_category.get_mut(category) else {
            return Money::zero();
        };
        let taken = if amount < *planned { amount } else { *planned };
        *planned -= taken;
        if planned.is_zero() {
            self.planned_by_category.remove(category);
        }
        taken
    }

    /// Add recorded spending for a category
    pub(crate) fn record_spent(&mut self, category: &CategoryKey, amount: Money) {
        *self
            .spent_by_category
            .entry(category.clone())
            .or_default() += amount;
    }

}

/// On-disk shape of a day, checked by [`CalendarDay::from_parts`] on load
#[derive(Deserialize)]
struct StoredDay {
    date: NaiveDate,
    #[serde(default)]
    planned_by_category: BTreeMap<CategoryKey, Money>,
    #[serde(default)]
    spent_by_category: BTreeMap<CategoryKey, Money>,
}

impl TryFrom<StoredDay> for CalendarDay {
    type Error = CalendarError;

    fn try_from(stored: StoredDay) -> Result<Self, Self::Error> {
        CalendarDay::from_parts(
            stored.date,
            stored.planned_by_category,
            stored.spent_by_category,
        )
    }
}

/// Sum of day totals across a calendar
pub fn calendar_total(days: &[CalendarDay]) -> Money {
    days.iter().map(CalendarDay::total).sum()
}
