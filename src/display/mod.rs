//! Display formatting for terminal output
//!
//! Calendar tables, per-category summaries, and the human-readable messages
//! that explain each transfer.

pub mod calendar;
pub mod transfer;

pub use calendar::{format_calendar, format_category_summary, format_classification};
pub use transfer::{format_outcome, format_transfer_ledger, transfer_message, uncovered_message};

use chrono::NaiveDate;

/// Short date used in messages, e.g. "Sat Mar 8"
pub fn short_date(date: NaiveDate) -> String {
    date.format("%a %b %-d").to_string()
}
