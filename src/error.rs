//! Custom error types for the budget calendar
//!
//! This module defines the error hierarchy for the engine and its surrounding
//! storage and CLI layers using thiserror.

use thiserror::Error;

use crate::models::Money;

/// The main error type for budget calendar operations
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON/YAML serialization errors
    #[error("Serialization error: {0}")]
    Json(String),

    /// Generic validation errors for inputs
    #[error("Validation error: {0}")]
    Validation(String),

    /// The plan's declared allocations do not sum to its discretionary total
    #[error(
        "Plan imbalance: categories allocate {allocated} but discretionary is {declared} (delta {delta})"
    )]
    PlanImbalance {
        declared: Money,
        allocated: Money,
        delta: Money,
    },

    /// A day or date falls outside the target month
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Category key is well-formed but not part of the catalog
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Category key is malformed
    #[error("Invalid category key '{key}': {reason}")]
    InvalidCategory { key: String, reason: String },

    /// An amount that must be non-negative was negative
    #[error("Negative amount for {context}: {amount}")]
    NegativeAmount { context: String, amount: Money },

    /// The total planned budget changed across an operation. This is a defect
    /// in the engine, never a user error.
    #[error("Conservation violation in {operation}: total was {before}, became {after}")]
    ConservationViolation {
        operation: &'static str,
        before: Money,
        after: Money,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Spending import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CalendarError {
    /// Create a "not found" error for a stored calendar
    pub fn calendar_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Calendar",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from input validation.
    ///
    /// Validation errors are deterministic; retrying without fixing the input
    /// cannot succeed.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::PlanImbalance { .. }
                | Self::InvalidDateRange(_)
                | Self::UnknownCategory(_)
                | Self::InvalidCategory { .. }
                | Self::NegativeAmount { .. }
        )
    }

    /// Check if this error signals an engine defect
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConservationViolation { .. })
    }
}

impl From<std::io::Error> for CalendarError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CalendarError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for budget calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CalendarError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_plan_imbalance_display() {
        let err = CalendarError::PlanImbalance {
            declared: Money::from_cents(330000),
            allocated: Money::from_cents(329999),
            delta: Money::from_cents(-1),
        };
        assert_eq!(
            err.to_string(),
            "Plan imbalance: categories allocate $3299.99 but discretionary is $3300.00 (delta -$0.01)"
        );
        assert!(err.is_validation());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_conservation_violation_is_fatal() {
        let err = CalendarError::ConservationViolation {
            operation: "redistribute",
            before: Money::from_cents(100),
            after: Money::from_cents(99),
        };
        assert!(err.is_fatal());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_not_found_error() {
        let err = CalendarError::calendar_not_found("alice/2025-03");
        assert_eq!(err.to_string(), "Calendar not found: alice/2025-03");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CalendarError = io_err.into();
        assert!(matches!(err, CalendarError::Io(_)));
    }
}
