//! Audit logging for the budget calendar
//!
//! Records builds, spending batches, redistribution runs, every emitted
//! transfer, and aborted redistributions in an append-only JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_calendar::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let mut entries = vec![AuditEntry::redistribute(user, &period, &before, &outcome.calendar)];
//! entries.extend(outcome.transfers.iter().map(|t| AuditEntry::transfer(user, t)));
//! logger.log_batch(&entries)?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::day_total_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
