//! Core data models for the budget calendar
//!
//! Money, category keys, months, calendar days, placement strategies, the
//! monthly plan consumed by the builder, and the spending and transfer records
//! consumed and produced by redistribution.

pub mod category;
pub mod day;
pub mod ids;
pub mod money;
pub mod period;
pub mod plan;
pub mod spending;
pub mod strategy;
pub mod transfer;

pub use category::{parse_key, CategoryCatalog, CategoryKey, CategoryKeyError};
pub use day::{calendar_total, CalendarDay};
pub use ids::TransferId;
pub use money::{Money, MoneyParseError};
pub use period::{MonthPeriod, PeriodParseError};
pub use plan::{CategoryAllocation, FixedExpense, MonthlyBudgetPlan};
pub use spending::SpendingLedger;
pub use strategy::{DayFilter, DistributionStrategy};
pub use transfer::{Transfer, TransferReason};
