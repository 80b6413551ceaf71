//! Application layer - use cases and orchestration.
//!
//! This layer owns the employee directory lifecycle and the formatting of
//! its state for display.

pub mod directory_sync;
pub mod documents;
pub mod formatter;

pub use directory_sync::{EmployeeDirectorySync, LoadOutcome};
pub use formatter::{
    format_banner, format_employees_json, format_employees_table, format_status_line,
    OutputFormat,
};
