//! Day-placement strategies
//!
//! A [`DistributionStrategy`] decides which days of a month receive a
//! category's monthly amount and how much each day gets. Placement is a pure
//! function of the amount, the month and the strategy parameters: the same
//! inputs always select the same days and put the remainder cents in the same
//! places.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;
use super::period::MonthPeriod;
use crate::error::{CalendarError, CalendarResult};

/// Day used by FIXED placement when none is given
pub const DEFAULT_FIXED_DAY: u32 = 1;

/// Number of days CLUSTERED placement targets when none is given
pub const DEFAULT_CLUSTER_DAYS: usize = 4;

/// Which days of the month a strategy may place money on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DayFilter {
    /// Every day of the month
    #[default]
    All,
    /// Monday through Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
    /// An explicit set of weekdays
    Only(Vec<Weekday>),
}

impl DayFilter {
    pub fn accepts(&self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Weekdays => !matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Self::Weekends => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            Self::Only(days) => days.contains(&date.weekday()),
        }
    }

    /// Eligible dates of `month` in chronological order
    pub fn dates(&self, month: &MonthPeriod) -> Vec<NaiveDate> {
        month.dates().filter(|d| self.accepts(*d)).collect()
    }

    fn clustered_default() -> Self {
        Self::Weekends
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all days"),
            Self::Weekdays => write!(f, "weekdays"),
            Self::Weekends => write!(f, "weekends"),
            Self::Only(days) => {
                let names: Vec<String> = days.iter().map(|d| d.to_string()).collect();
                write!(f, "{}", names.join("/"))
            }
        }
    }
}

/// Placement policy for a category's monthly amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistributionStrategy {
    /// Whole amount on a single day of the month
    Fixed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day: Option<u32>,
    },

    /// Even split over `days` eligible days chosen by even stride.
    /// `days: None` means every eligible day.
    Spread {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        days: Option<usize>,
        #[serde(default)]
        eligible: DayFilter,
    },

    /// Even split over a small number of days sharing a temporal property
    /// (weekends unless told otherwise). Days are picked with the same stride
    /// as SPREAD, `floor(i * n / k)` over the `n` eligible days, so four
    /// weekend days in March 2025 land on the 1st, 8th, 16th and 23rd.
    Clustered {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        days: Option<usize>,
        #[serde(default = "DayFilter::clustered_default")]
        eligible: DayFilter,
    },
}

impl DistributionStrategy {
    pub fn fixed(day: u32) -> Self {
        Self::Fixed { day: Some(day) }
    }

    pub fn spread(days: Option<usize>, eligible: DayFilter) -> Self {
        Self::Spread { days, eligible }
    }

    /// CLUSTERED with default parameters: four weekend days
    pub fn weekend_cluster() -> Self {
        Self::Clustered {
            days: None,
            eligible: DayFilter::Weekends,
        }
    }

    pub fn clustered(days: usize, eligible: DayFilter) -> Self {
        Self::Clustered {
            days: Some(days),
            eligible,
        }
    }

    /// Check month-independent parameters
    pub fn check(&self) -> CalendarResult<()> {
        match self {
            Self::Fixed { day: Some(0) } => Err(CalendarError::InvalidDateRange(
                "fixed day must be between 1 and 31".into(),
            )),
            Self::Fixed { day: Some(day) } if *day > 31 => Err(CalendarError::InvalidDateRange(
                format!("fixed day {} must be between 1 and 31", day),
            )),
            Self::Spread { days: Some(0), .. } | Self::Clustered { days: Some(0), .. } => Err(
                CalendarError::Validation("day count must be at least 1".into()),
            ),
            Self::Spread {
                eligible: DayFilter::Only(days),
                ..
            }
            | Self::Clustered {
                eligible: DayFilter::Only(days),
                ..
            } if days.is_empty() => Err(CalendarError::Validation(
                "explicit weekday list cannot be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Place `amount` onto days of `month`
    ///
    /// The returned placements sum to `amount` exactly and are all positive.
    /// A zero amount places nothing (but the parameters are still checked).
    pub fn place(
        &self,
        amount: Money,
        month: &MonthPeriod,
    ) -> CalendarResult<BTreeMap<NaiveDate, Money>> {
        if amount.is_negative() {
            return Err(CalendarError::NegativeAmount {
                context: format!("{} placement", self.name()),
                amount,
            });
        }
        self.check()?;

        match self {
            Self::Fixed { day } => {
                let day = day.unwrap_or(DEFAULT_FIXED_DAY);
                let date = month.date_of(day).ok_or_else(|| {
                    CalendarError::InvalidDateRange(format!(
                        "day {} is outside {} (1-{})",
                        day,
                        month,
                        month.days_in_month()
                    ))
                })?;
                let mut placed = BTreeMap::new();
                if amount.is_positive() {
                    placed.insert(date, amount);
                }
                Ok(placed)
            }
            Self::Spread { days, eligible } => {
                let dates = eligible.dates(month);
                let k = days.unwrap_or(dates.len());
                place_even(amount, &dates, k, eligible, month)
            }
            Self::Clustered { days, eligible } => {
                let dates = eligible.dates(month);
                let k = days.unwrap_or(DEFAULT_CLUSTER_DAYS);
                place_even(amount, &dates, k, eligible, month)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Fixed { .. } => "FIXED",
            Self::Spread { .. } => "SPREAD",
            Self::Clustered { .. } => "CLUSTERED",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Fixed { day } => format!("fixed on day {}", day.unwrap_or(DEFAULT_FIXED_DAY)),
            Self::Spread { days: None, eligible } => format!("spread over {}", eligible),
            Self::Spread {
                days: Some(k),
                eligible,
            } => format!("spread over {} of {}", k, eligible),
            Self::Clustered { days, eligible } => format!(
                "clustered on {} {}",
                days.unwrap_or(DEFAULT_CLUSTER_DAYS),
                eligible
            ),
        }
    }
}

impl fmt::Display for DistributionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Pick `k` of `eligible` so the gaps between picks are as equal as possible.
///
/// Index `i` of the selection is `floor(i * n / k)`; the first eligible day is
/// always selected. `k` must be between 1 and `eligible.len()`.
pub fn select_by_stride(eligible: &[NaiveDate], k: usize) -> Vec<NaiveDate> {
    let n = eligible.len();
    if k == 0 || n == 0 {
        return Vec::new();
    }
    let k = k.min(n);
    (0..k).map(|i| eligible[i * n / k]).collect()
}

fn place_even(
    amount: Money,
    eligible: &[NaiveDate],
    requested: usize,
    filter: &DayFilter,
    month: &MonthPeriod,
) -> CalendarResult<BTreeMap<NaiveDate, Money>> {
    let mut placed = BTreeMap::new();
    if amount.is_zero() {
        return Ok(placed);
    }
    if eligible.is_empty() {
        return Err(CalendarError::Validation(format!(
            "no eligible days ({}) in {}",
            filter, month
        )));
    }

    // Fewer cents than days would leave some selected days at zero
    let cents = usize::try_from(amount.cents()).unwrap_or(usize::MAX);
    let k = requested.min(eligible.len()).min(cents);

    let selected = select_by_stride(eligible, k);
    for (date, share) in selected.into_iter().zip(amount.split_even(k)) {
        placed.insert(date, share);
    }
    Ok(placed)
}
