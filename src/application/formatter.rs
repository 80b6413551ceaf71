//! Output formatting for the employee directory.
//!
//! Supports a table view and JSON, plus the banner and progress lines shown
//! around them.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Table};

use crate::domain::{EmployeeRecord, SyncState};

/// Text shown in place of rows when the directory is empty.
pub const EMPTY_STATE: &str = "No employees found.";

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Table,
    /// JSON format for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: table, json")),
        }
    }
}

/// Formats the employee table, with an empty-state row when there are none.
pub fn format_employees_table(employees: &[EmployeeRecord]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Email", "Position"]);

    if employees.is_empty() {
        table.add_row(vec![
            Cell::new(EMPTY_STATE).set_alignment(CellAlignment::Center),
            Cell::new(""),
            Cell::new(""),
        ]);
    }

    for emp in employees {
        table.add_row(vec![
            truncate(&emp.name, 30),
            truncate(&emp.email, 35),
            truncate(&emp.position, 25),
        ]);
    }

    table.to_string()
}

/// Formats employees as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_employees_json(employees: &[EmployeeRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(employees)
}

/// Formats the visible banner, if any.
pub fn format_banner(state: &SyncState) -> Option<String> {
    if !state.error_message.is_empty() {
        Some(format!("{} {}", "✗".red().bold(), state.error_message.red()))
    } else if !state.status_message.is_empty() {
        Some(format!("{} {}", "✓".green().bold(), state.status_message.green()))
    } else {
        None
    }
}

/// One-line summary of the lifecycle flags.
pub fn format_status_line(state: &SyncState) -> String {
    let activity = if state.is_submitting {
        "Adding...".yellow().to_string()
    } else if state.is_loading {
        "Loading...".yellow().to_string()
    } else {
        "Idle".dimmed().to_string()
    };

    let refreshed = state.last_refreshed.map_or_else(
        || "never".to_string(),
        |dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    format!(
        "{} employees | {} | refreshed {}",
        state.employees.len().to_string().cyan(),
        activity,
        refreshed
    )
}

/// Truncates a string to max length with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{cut}...")
    }
}
