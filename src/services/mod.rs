//! Service layer for the budget calendar
//!
//! The services own the calendar's behavior: building it from a plan,
//! recording spending against it, and rebalancing it mid-month. None of them
//! hold mutable state; they operate on calendars supplied by the caller.

pub mod builder;
pub mod redistributor;
pub mod spending;

pub use builder::CalendarBuilder;
pub use redistributor::{
    BudgetRedistributor, DayClassification, DayStatus, RedistributionOutcome, UncoveredDeficit,
};
pub use spending::{ImportSummary, RowError, SpendingColumns, SpendingService};
