//! Calendar builder
//!
//! Turns a [`MonthlyBudgetPlan`] into one [`CalendarDay`] per day of the
//! month. Fixed expenses are placed first, then every category allocation
//! through its own strategy. The builder holds only its category catalog, so a
//! single instance can serve any number of concurrent builds.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, error, info};

use crate::error::{CalendarError, CalendarResult};
use crate::models::{
    calendar_total, CalendarDay, CategoryCatalog, CategoryKey, Money, MonthPeriod,
    MonthlyBudgetPlan,
};

/// Builds day-by-day calendars from monthly plans
#[derive(Debug, Clone, Default)]
pub struct CalendarBuilder {
    catalog: CategoryCatalog,
}

impl CalendarBuilder {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Build the calendar for `year`/`month`
    pub fn build(
        &self,
        plan: &MonthlyBudgetPlan,
        year: i32,
        month: u32,
    ) -> CalendarResult<Vec<CalendarDay>> {
        let period = MonthPeriod::new(year, month)
            .map_err(|e| CalendarError::InvalidDateRange(e.to_string()))?;
        self.build_for(plan, &period)
    }

    /// Build the calendar for an already-validated month
    pub fn build_for(
        &self,
        plan: &MonthlyBudgetPlan,
        period: &MonthPeriod,
    ) -> CalendarResult<Vec<CalendarDay>> {
        plan.validate(&self.catalog)?;

        let mut days: Vec<CalendarDay> = period.dates().map(CalendarDay::new).collect();

        for (name, expense) in &plan.fixed_expenses {
            let placed = expense.strategy().place(expense.amount, period)?;
            apply_placement(&mut days, name, placed)?;
        }

        for (category, allocation) in &plan.category_allocations {
            let placed = allocation.strategy.place(allocation.amount, period)?;
            debug!(
                category = %category,
                strategy = allocation.strategy.name(),
                days = placed.len(),
                amount = %allocation.amount,
                "Placed category allocation"
            );
            apply_placement(&mut days, category, placed)?;
        }

        let expected = plan.calendar_total();
        let actual = calendar_total(&days);
        if expected != actual {
            error!(
                month = %period,
                expected = %expected,
                actual = %actual,
                plan = %serde_json::to_string(plan).unwrap_or_default(),
                calendar = %serde_json::to_string(&days).unwrap_or_default(),
                "Built calendar does not conserve the plan total"
            );
            return Err(CalendarError::ConservationViolation {
                operation: "build",
                before: expected,
                after: actual,
            });
        }

        info!(
            month = %period,
            total = %actual,
            categories = plan.category_allocations.len(),
            fixed_expenses = plan.fixed_expenses.len(),
            "Built budget calendar"
        );
        Ok(days)
    }
}

fn apply_placement(
    days: &mut [CalendarDay],
    category: &CategoryKey,
    placed: BTreeMap<NaiveDate, Money>,
) -> CalendarResult<()> {
    for (date, amount) in placed {
        let index = date.day0() as usize;
        let day = days
            .get_mut(index)
            .filter(|d| d.date == date)
            .ok_or_else(|| {
                CalendarError::InvalidDateRange(format!("{} is not a day of this calendar", date))
            })?;
        day.credit(category, amount);
    }
    Ok(())
}
