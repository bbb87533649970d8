//! Budget Calendar - day-by-day budgeting from a monthly plan
//!
//! This library turns a monthly discretionary budget and its per-category
//! allocations into a calendar of daily spending targets, then keeps that
//! calendar balanced as real spending comes in. Every operation preserves the
//! monthly total to the cent.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Money, categories, calendar days, strategies and plans
//! - `services`: Calendar building, spending ingestion and redistribution
//! - `storage`: JSON file storage for calendars
//! - `audit`: Append-only ledger of builds and transfers
//! - `config`: Configuration and path management
//! - `display`: Terminal rendering of calendars and transfers
//! - `cli`: Command handlers for the `budgetcal` binary
//! - `logging`: Tracing subscriber setup
//! - `error`: Custom error types
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_calendar::models::{CategoryCatalog, MonthlyBudgetPlan};
//! use budget_calendar::services::{BudgetRedistributor, CalendarBuilder};
//!
//! let calendar = CalendarBuilder::new(CategoryCatalog::default()).build(&plan, 2025, 3)?;
//! let outcome = BudgetRedistributor::new().redistribute(&calendar, &spending, as_of)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{CalendarError, CalendarResult};
