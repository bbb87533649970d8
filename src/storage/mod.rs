//! Storage layer for the budget calendar
//!
//! JSON file storage with atomic writes and automatic directory creation.

pub mod calendars;
pub mod file_io;

pub use calendars::CalendarStore;
pub use file_io::{read_document, read_json, read_json_required, write_json_atomic};
