//! Configuration module for the budget calendar
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence, including the category catalog

pub mod paths;
pub mod settings;

pub use paths::CalendarPaths;
pub use settings::Settings;
