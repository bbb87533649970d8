//! Mid-month budget redistribution
//!
//! When a day's actual spending exceeds its planned total, planned budget is
//! moved onto it from days that still have room. Each call runs three phases:
//!
//! 1. **Classification**: every day up to the as-of date is OVER, UNDER or
//!    BALANCED by comparing its planned total with what was spent.
//! 2. **Matching**: OVER days are handled oldest first. Donors are searched
//!    among future days (after the as-of date) before past UNDER days; within
//!    a tier the closest day wins, earliest date on ties.
//! 3. **Transfer execution**: the smaller of the remaining deficit and the
//!    donor's surplus is moved and recorded as a [`Transfer`].
//!
//! The monthly total never changes. The input calendar is borrowed and never
//! modified; the outcome carries a new calendar.

use std::cmp::Reverse;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{CalendarError, CalendarResult};
use crate::models::{
    calendar_total, CalendarDay, CategoryKey, Money, MonthPeriod, SpendingLedger, Transfer,
    TransferId,
};

/// Classification of a day relative to the as-of date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    /// Spent more than planned
    Over,
    /// Spent less than planned
    Under,
    /// Spent exactly the plan
    Balanced,
    /// After the as-of date; the whole plan is still available
    Upcoming,
}

/// Planned versus actual for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayClassification {
    pub date: NaiveDate,
    pub planned: Money,
    pub spent: Money,
    /// `planned - spent`; negative for OVER days
    pub delta: Money,
    pub status: DayStatus,
}

/// A deficit that could not be covered within the month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UncoveredDeficit {
    pub date: NaiveDate,
    pub amount: Money,
}

/// Result of a redistribution run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedistributionOutcome {
    pub calendar: Vec<CalendarDay>,
    pub transfers: Vec<Transfer>,
    /// OVER days whose deficit was only partly covered, oldest first
    pub uncovered: Vec<UncoveredDeficit>,
}

impl RedistributionOutcome {
    pub fn is_fully_covered(&self) -> bool {
        self.uncovered.is_empty()
    }

    pub fn uncovered_total(&self) -> Money {
        self.uncovered.iter().map(|u| u.amount).sum()
    }

    pub fn moved_total(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Stateless redistribution engine
#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetRedistributor;

impl BudgetRedistributor {
    pub fn new() -> Self {
        Self
    }

    /// Classify every day of the calendar as of `as_of`
    pub fn classify(
        &self,
        calendar: &[CalendarDay],
        spending: &SpendingLedger,
        as_of: NaiveDate,
    ) -> CalendarResult<Vec<DayClassification>> {
        validate_inputs(calendar, spending, as_of)?;
        Ok(calendar
            .iter()
            .map(|day| classify_day(day, spending, as_of))
            .collect())
    }

    /// Rebalance `calendar` against actual `spending` up to `as_of`
    pub fn redistribute(
        &self,
        calendar: &[CalendarDay],
        spending: &SpendingLedger,
        as_of: NaiveDate,
    ) -> CalendarResult<RedistributionOutcome> {
        let period = validate_inputs(calendar, spending, as_of)?;
        let before = calendar_total(calendar);
        let run = run_digest(calendar, spending, as_of);

        let mut days = calendar.to_vec();
        let mut transfers = Vec::new();
        let mut uncovered = Vec::new();

        let over_days: Vec<usize> = calendar
            .iter()
            .enumerate()
            .filter(|(_, day)| classify_day(day, spending, as_of).status == DayStatus::Over)
            .map(|(index, _)| index)
            .collect();

        for recipient in over_days {
            let remaining =
                cover_deficit(&mut days, recipient, spending, as_of, &run, &mut transfers);
            if remaining.is_positive() {
                let date = days[recipient].date;
                warn!(
                    date = %date,
                    uncovered = %remaining,
                    "Not enough budget left in the month to cover overspend"
                );
                uncovered.push(UncoveredDeficit {
                    date,
                    amount: remaining,
                });
            }
        }

        let after = calendar_total(&days);
        if before != after {
            error!(
                month = %period,
                as_of = %as_of,
                before = %before,
                after = %after,
                calendar_before = %serde_json::to_string(calendar).unwrap_or_default(),
                calendar_after = %serde_json::to_string(&days).unwrap_or_default(),
                "Redistribution changed the monthly total; aborting"
            );
            return Err(CalendarError::ConservationViolation {
                operation: "redistribute",
                before,
                after,
            });
        }

        let outcome = RedistributionOutcome {
            calendar: days,
            transfers,
            uncovered,
        };
        info!(
            month = %period,
            as_of = %as_of,
            transfers = outcome.transfers.len(),
            moved = %outcome.moved_total(),
            uncovered = %outcome.uncovered_total(),
            "Redistributed budget calendar"
        );
        Ok(outcome)
    }
}

/// Check the calendar shape, the as-of date and the spending entries.
/// Returns the calendar's month.
fn validate_inputs(
    calendar: &[CalendarDay],
    spending: &SpendingLedger,
    as_of: NaiveDate,
) -> CalendarResult<MonthPeriod> {
    let first = calendar
        .first()
        .ok_or_else(|| CalendarError::Validation("calendar has no days".into()))?;
    let period = MonthPeriod::containing(first.date);

    let contiguous = calendar.len() == period.days_in_month() as usize
        && calendar
            .iter()
            .zip(period.dates())
            .all(|(day, expected)| day.date == expected);
    if !contiguous {
        return Err(CalendarError::Validation(format!(
            "calendar must hold every day of {} in order",
            period
        )));
    }

    if !period.contains(as_of) {
        return Err(CalendarError::InvalidDateRange(format!(
            "as-of date {} is outside {}",
            as_of, period
        )));
    }

    for (date, category, amount) in spending.entries() {
        if !period.contains(date) {
            return Err(CalendarError::InvalidDateRange(format!(
                "spending on {} is outside {}",
                date, period
            )));
        }
        if amount.is_negative() {
            return Err(CalendarError::NegativeAmount {
                context: format!("{} spending on {}", category, date),
                amount,
            });
        }
    }

    Ok(period)
}

fn classify_day(day: &CalendarDay, spending: &SpendingLedger, as_of: NaiveDate) -> DayClassification {
    let planned = day.total();
    if day.date > as_of {
        return DayClassification {
            date: day.date,
            planned,
            spent: Money::zero(),
            delta: planned,
            status: DayStatus::Upcoming,
        };
    }

    let spent = spending.day_total(day.date);
    let delta = planned - spent;
    let status = if delta.is_negative() {
        DayStatus::Over
    } else if delta.is_positive() {
        DayStatus::Under
    } else {
        DayStatus::Balanced
    };
    DayClassification {
        date: day.date,
        planned,
        spent,
        delta,
        status,
    }
}

/// Digest of everything a run depends on: the as-of date, every planned
/// amount and every spending entry. Feeds the transfer IDs.
fn run_digest(calendar: &[CalendarDay], spending: &SpendingLedger, as_of: NaiveDate) -> String {
    let mut canonical = format!("as_of={}", as_of);
    for day in calendar {
        for (category, amount) in day.planned_by_category() {
            canonical.push_str(&format!(";p{}:{}={}", day.date, category, amount.cents()));
        }
    }
    for (date, category, amount) in spending.entries() {
        canonical.push_str(&format!(";s{}:{}={}", date, category, amount.cents()));
    }
    TransferId::derive(&canonical).as_uuid().simple().to_string()
}

/// Budget a donor day can still give up
fn surplus(day: &CalendarDay, spending: &SpendingLedger, as_of: NaiveDate) -> Money {
    if day.date > as_of {
        day.total()
    } else {
        (day.total() - spending.day_total(day.date)).positive_part()
    }
}

/// How much of `category` a donor can release without going below zero or,
/// for past days, below what was already spent in it
fn category_slack(
    day: &CalendarDay,
    category: &CategoryKey,
    spending: &SpendingLedger,
    as_of: NaiveDate,
) -> Money {
    let planned = day.planned(category);
    if day.date > as_of {
        planned
    } else {
        (planned - spending.spent_on(day.date, category)).positive_part()
    }
}

/// Donor indices for `recipient`, best first
fn donor_order(days: &[CalendarDay], recipient: usize, as_of: NaiveDate) -> Vec<usize> {
    let target = days[recipient].date;
    let mut donors: Vec<usize> = (0..days.len()).filter(|i| *i != recipient).collect();
    donors.sort_by_key(|i| {
        let date = days[*i].date;
        let tier = if date > as_of { 0 } else { 1 };
        (tier, (date - target).num_days().abs(), date)
    });
    donors
}

/// Overspent categories on the recipient, largest overspend first
fn recipient_needs(day: &CalendarDay, spending: &SpendingLedger) -> Vec<(CategoryKey, Money)> {
    let mut needs: Vec<(CategoryKey, Money)> = spending
        .day(day.date)
        .into_iter()
        .flatten()
        .map(|(category, spent)| (category.clone(), *spent - day.planned(category)))
        .filter(|(_, over)| over.is_positive())
        .collect();
    needs.sort_by_key(|(category, over)| (Reverse(*over), category.clone()));
    needs
}

/// Donor category to debit for `wanted`: the same category if it has slack,
/// otherwise the first category in key order that does
fn pick_source(
    day: &CalendarDay,
    wanted: &CategoryKey,
    spending: &SpendingLedger,
    as_of: NaiveDate,
) -> Option<(CategoryKey, Money)> {
    let same = category_slack(day, wanted, spending, as_of);
    if same.is_positive() {
        return Some((wanted.clone(), same));
    }
    day.planned_by_category()
        .keys()
        .map(|category| (category, category_slack(day, category, spending, as_of)))
        .find(|(_, slack)| slack.is_positive())
        .map(|(category, slack)| (category.clone(), slack))
}

/// Cover as much of the recipient's deficit as donors allow.
/// Returns the part left uncovered.
fn cover_deficit(
    days: &mut [CalendarDay],
    recipient: usize,
    spending: &SpendingLedger,
    as_of: NaiveDate,
    run: &str,
    transfers: &mut Vec<Transfer>,
) -> Money {
    let to_date = days[recipient].date;
    let mut deficit = spending.day_total(to_date) - days[recipient].total();
    let mut needs = recipient_needs(&days[recipient], spending);

    for donor in donor_order(days, recipient, as_of) {
        if !deficit.is_positive() {
            break;
        }
        let available = surplus(&days[donor], spending, as_of);
        if !available.is_positive() {
            continue;
        }

        let mut take = if deficit < available { deficit } else { available };
        let from_date = days[donor].date;

        while take.is_positive() {
            let Some(need) = needs.iter_mut().find(|(_, amount)| amount.is_positive()) else {
                break;
            };
            let Some((source, slack)) = pick_source(&days[donor], &need.0, spending, as_of)
            else {
                break;
            };

            let chunk = [take, need.1, slack]
                .into_iter()
                .min()
                .unwrap_or_default();
            let moved = days[donor].debit(&source, chunk);
            days[recipient].credit(&need.0, moved);

            need.1 -= moved;
            take -= moved;
            deficit -= moved;

            let transfer = Transfer::coverage(
                run,
                from_date,
                to_date,
                source,
                need.0.clone(),
                moved,
                transfers.len(),
            );
            debug!(transfer = %transfer, "Recorded transfer");
            transfers.push(transfer);
        }
    }

    deficit.positive_part()
}
