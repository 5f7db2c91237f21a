//! Core entity types for the task tracker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar-date format used everywhere a due date crosses a boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user account. The `password_hash` field only ever holds the output of
/// the one-way hash, never a plaintext password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// A named role. Users reference roles many-to-many.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// A project that tasks may reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// A persisted task. `id` is assigned by the store at creation time and is
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub description: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub project_id: Option<i64>,
}

/// A task that has not been persisted yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub description: String,
    pub due_date: NaiveDate,
    pub status: String,
    pub project_id: Option<i64>,
}

/// Parse a due date in `YYYY-MM-DD` form.
pub fn parse_due_date(s: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|_| crate::error::Error::invalid_value("due_date", "expected YYYY-MM-DD"))
}

/// Parse the raw three-field task input: `description,due_date,status`.
///
/// Fields are comma-separated and trimmed. Missing or extra fields, empty
/// subfields, and an unparseable date all fail validation before anything
/// touches the store.
pub fn parse_task_input(raw: &str) -> crate::error::Result<TaskDraft> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() != 3 {
        return Err(crate::error::Error::invalid_value(
            "input",
            "expected 'description,due_date,status'",
        ));
    }

    let description = parts[0].trim();
    let due_date = parts[1].trim();
    let status = parts[2].trim();

    if description.is_empty() {
        return Err(crate::error::Error::empty_field("description"));
    }
    if due_date.is_empty() {
        return Err(crate::error::Error::empty_field("due_date"));
    }
    if status.is_empty() {
        return Err(crate::error::Error::empty_field("status"));
    }

    Ok(TaskDraft {
        description: description.to_string(),
        due_date: parse_due_date(due_date)?,
        status: status.to_string(),
        project_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_input() {
        let draft = parse_task_input("Write report, 2030-05-30 ,Pending").unwrap();
        assert_eq!(draft.description, "Write report");
        assert_eq!(draft.due_date.to_string(), "2030-05-30");
        assert_eq!(draft.status, "Pending");
        assert_eq!(draft.project_id, None);
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(parse_task_input("onlytwo,fields").unwrap_err().is_validation());
        assert!(parse_task_input("a,b,c,d").unwrap_err().is_validation());
    }

    #[test]
    fn rejects_empty_subfields() {
        assert!(parse_task_input(",2030-05-30,Pending").unwrap_err().is_validation());
        assert!(parse_task_input("desc,2030-05-30, ").unwrap_err().is_validation());
    }

    #[test]
    fn rejects_bad_dates() {
        assert!(parse_task_input("desc,30/05/2030,Pending").unwrap_err().is_validation());
        assert!(parse_task_input("desc,2030-13-99,Pending").unwrap_err().is_validation());
    }
}
