//! Domain models for the employee directory.
//!
//! These models represent the records served by the GraphQL API and the
//! client-side state derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An employee as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Opaque server-assigned identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Job title.
    pub position: String,
}

/// The not-yet-submitted form values for a new employee.
///
/// Serializes to the `NewEmployee` GraphQL input type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEmployee {
    pub name: String,
    pub email: String,
    pub position: String,
}

impl DraftEmployee {
    /// Create a draft with all fields set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            position: position.into(),
        }
    }

    /// Replace exactly one field.
    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Name => &mut self.name,
            DraftField::Email => &mut self.email,
            DraftField::Position => &mut self.position,
        };
        *slot = value.into();
    }

    /// Read one field.
    #[must_use]
    pub fn get(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.name,
            DraftField::Email => &self.email,
            DraftField::Position => &self.position,
        }
    }
}

/// Editable field of a [`DraftEmployee`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Position,
}

impl DraftField {
    /// All fields in form order.
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Position];

    /// Field name as used by the form and the GraphQL input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Position => "position",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a renderer needs to draw the directory view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Employees in server order, replaced wholesale on each load.
    pub employees: Vec<EmployeeRecord>,

    /// Current form values.
    pub draft: DraftEmployee,

    /// True while at least one load request is outstanding.
    pub is_loading: bool,

    /// True while a create request (and its chained reload) is outstanding.
    pub is_submitting: bool,

    /// Transient success banner; empty when hidden.
    pub status_message: String,

    /// Transient failure banner; empty when hidden.
    pub error_message: String,

    /// When the employee list was last replaced.
    pub last_refreshed: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_touches_one_field() {
        let mut draft = DraftEmployee::new("Ada", "", "Engineer");
        draft.set(DraftField::Email, "ada@x.com");

        assert_eq!(draft, DraftEmployee::new("Ada", "ada@x.com", "Engineer"));
    }

    #[test]
    fn test_draft_serializes_as_input() {
        let draft = DraftEmployee::new("Ada", "ada@x.com", "Engineer");
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Ada", "email": "ada@x.com", "position": "Engineer"})
        );
    }
}
