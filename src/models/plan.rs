//! Monthly budget plan
//!
//! The plan is the already-resolved input to calendar construction: how much
//! discretionary money the month has, how it is split across categories, and
//! which fixed expenses fall on which day. The plan must balance before it is
//! built; the engine reports an imbalance and never corrects one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::{CategoryCatalog, CategoryKey};
use super::money::Money;
use super::strategy::DistributionStrategy;
use crate::error::{CalendarError, CalendarResult};

/// A category's monthly amount and how it is placed on days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub amount: Money,
    pub strategy: DistributionStrategy,
}

impl CategoryAllocation {
    pub fn new(amount: Money, strategy: DistributionStrategy) -> Self {
        Self { amount, strategy }
    }
}

/// An expense that always lands on a specific day (rent, phone bill, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedExpense {
    pub amount: Money,
    /// 1-based day of the month
    pub day: u32,
}

impl FixedExpense {
    pub fn new(amount: Money, day: u32) -> Self {
        Self { amount, day }
    }

    pub fn strategy(&self) -> DistributionStrategy {
        DistributionStrategy::fixed(self.day)
    }
}

/// Input to [`CalendarBuilder`](crate::services::CalendarBuilder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBudgetPlan {
    /// Income minus fixed expenses minus savings goal
    pub monthly_discretionary: Money,

    #[serde(default)]
    pub category_allocations: BTreeMap<CategoryKey, CategoryAllocation>,

    #[serde(default)]
    pub fixed_expenses: BTreeMap<CategoryKey, FixedExpense>,
}

impl MonthlyBudgetPlan {
    pub fn new(monthly_discretionary: Money) -> Self {
        Self {
            monthly_discretionary,
            category_allocations: BTreeMap::new(),
            fixed_expenses: BTreeMap::new(),
        }
    }

    /// Builder-style helper for adding a category allocation
    pub fn with_category(
        mut self,
        category: CategoryKey,
        amount: Money,
        strategy: DistributionStrategy,
    ) -> Self {
        self.category_allocations
            .insert(category, CategoryAllocation::new(amount, strategy));
        self
    }

    /// Builder-style helper for adding a fixed expense
    pub fn with_fixed_expense(mut self, name: CategoryKey, amount: Money, day: u32) -> Self {
        self.fixed_expenses
            .insert(name, FixedExpense::new(amount, day));
        self
    }

    /// Sum of category allocation amounts
    pub fn allocated_total(&self) -> Money {
        self.category_allocations.values().map(|a| a.amount).sum()
    }

    /// Sum of fixed expense amounts
    pub fn fixed_total(&self) -> Money {
        self.fixed_expenses.values().map(|e| e.amount).sum()
    }

    /// Total the built calendar must contain
    pub fn calendar_total(&self) -> Money {
        self.monthly_discretionary + self.fixed_total()
    }

    /// Validate the plan against a category catalog
    ///
    /// Checks, in order: no negative amounts, every key is in the catalog,
    /// strategy parameters are sane, and allocations plus fixed expenses
    /// balance to the discretionary amount plus fixed expenses.
    pub fn validate(&self, catalog: &CategoryCatalog) -> CalendarResult<()> {
        if self.monthly_discretionary.is_negative() {
            return Err(CalendarError::NegativeAmount {
                context: "monthly discretionary".into(),
                amount: self.monthly_discretionary,
            });
        }

        for (key, allocation) in &self.category_allocations {
            catalog.require(key)?;
            if allocation.amount.is_negative() {
                return Err(CalendarError::NegativeAmount {
                    context: format!("category '{}'", key),
                    amount: allocation.amount,
                });
            }
            allocation.strategy.check()?;
        }

        for (key, expense) in &self.fixed_expenses {
            catalog.require(key)?;
            if expense.amount.is_negative() {
                return Err(CalendarError::NegativeAmount {
                    context: format!("fixed expense '{}'", key),
                    amount: expense.amount,
                });
            }
            expense.strategy().check()?;
        }

        // Amounts are non-negative from here on, so checked sums bound every
        // later total built from this plan.
        let overflow =
            || CalendarError::Validation("plan amounts overflow the money range".into());
        let fixed = checked_sum(self.fixed_expenses.values().map(|e| e.amount))
            .ok_or_else(overflow)?;
        let allocations = checked_sum(self.category_allocations.values().map(|a| a.amount))
            .ok_or_else(overflow)?;
        let declared = self
            .monthly_discretionary
            .checked_add(fixed)
            .ok_or_else(overflow)?;
        let allocated = allocations.checked_add(fixed).ok_or_else(overflow)?;
        if allocated != declared {
            return Err(CalendarError::PlanImbalance {
                declared,
                allocated,
                delta: allocated - declared,
            });
        }

        Ok(())
    }
}

fn checked_sum(amounts: impl Iterator<Item = Money>) -> Option<Money> {
    amounts.fold(Some(Money::zero()), |acc, amount| acc?.checked_add(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::strategy::DayFilter;

    fn key(name: &str) -> CategoryKey {
        CategoryKey::new(name).unwrap()
    }

    fn balanced_plan() -> MonthlyBudgetPlan {
        MonthlyBudgetPlan::new(Money::from_cents(100000))
            .with_category(
                key("dining"),
                Money::from_cents(40000),
                DistributionStrategy::weekend_cluster(),
            )
            .with_category(
                key("groceries"),
                Money::from_cents(60000),
                DistributionStrategy::spread(None, DayFilter::All),
            )
            .with_fixed_expense(key("rent"), Money::from_cents(140000), 1)
    }

    #[test]
    fn test_balanced_plan_validates() {
        let plan = balanced_plan();
        assert!(plan.validate(&CategoryCatalog::default()).is_ok());
        assert_eq!(plan.calendar_total(), Money::from_cents(240000));
    }

    #[test]
    fn test_imbalance_reports_delta() {
        let mut plan = balanced_plan();
        plan.monthly_discretionary = Money::from_cents(100001);
        match plan.validate(&CategoryCatalog::default()) {
            Err(CalendarError::PlanImbalance {
                declared,
                allocated,
                delta,
            }) => {
                assert_eq!(declared, Money::from_cents(240001));
                assert_eq!(allocated, Money::from_cents(240000));
                assert_eq!(delta, Money::from_cents(-1));
            }
            other => panic!("expected PlanImbalance, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_category_rejected() {
        let plan = balanced_plan();
        let catalog = CategoryCatalog::from_names(["dining", "groceries"]).unwrap();
        assert!(matches!(
            plan.validate(&catalog),
            Err(CalendarError::UnknownCategory(ref k)) if k == "rent"
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let plan = MonthlyBudgetPlan::new(Money::zero())
            .with_category(
                key("dining"),
                Money::from_cents(-100),
                DistributionStrategy::weekend_cluster(),
            )
            .with_category(
                key("coffee"),
                Money::from_cents(100),
                DistributionStrategy::weekend_cluster(),
            );
        assert!(matches!(
            plan.validate(&CategoryCatalog::default()),
            Err(CalendarError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_fixed_day_out_of_range_rejected() {
        let plan = MonthlyBudgetPlan::new(Money::zero()).with_fixed_expense(
            key("rent"),
            Money::from_cents(100),
            32,
        );
        assert!(matches!(
            plan.validate(&CategoryCatalog::default()),
            Err(CalendarError::InvalidDateRange(_))
        ));
    }

    #[test]
    fn test_allocations_past_money_range_rejected() {
        let half = Money::from_cents(i64::MAX / 2 + 1);
        let plan = MonthlyBudgetPlan::new(Money::zero())
            .with_category(key("dining"), half, DistributionStrategy::weekend_cluster())
            .with_category(key("coffee"), half, DistributionStrategy::weekend_cluster());
        assert!(matches!(
            plan.validate(&CategoryCatalog::default()),
            Err(CalendarError::Validation(_))
        ));
    }

    #[test]
    fn test_discretionary_plus_fixed_past_money_range_rejected() {
        let plan = MonthlyBudgetPlan::new(Money::from_cents(i64::MAX)).with_fixed_expense(
            key("rent"),
            Money::from_cents(1),
            1,
        );
        assert!(matches!(
            plan.validate(&CategoryCatalog::default()),
            Err(CalendarError::Validation(_))
        ));
    }

    #[test]
    fn test_yaml_plan_parses() {
        let yaml = r#"
monthly_discretionary: "3300.00"
category_allocations:
  dining:
    amount: "507.72"
    strategy: { type: clustered, days: 4 }
  coffee:
    amount: "676.96"
    strategy: { type: spread, days: 12, eligible: weekdays }
  groceries:
    amount: "2115.32"
    strategy: { type: spread }
fixed_expenses:
  rent: { amount: "1400.00", day: 1 }
"#;
        let plan: MonthlyBudgetPlan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plan.monthly_discretionary, Money::from_cents(330000));
        assert_eq!(plan.category_allocations.len(), 3);
        assert_eq!(plan.fixed_expenses[&key("rent")].day, 1);
        assert!(plan.validate(&CategoryCatalog::default()).is_ok());
    }
}
