//! Task CRUD operations.

use super::Database;
use crate::error::{Error, Result};
use crate::types::{DATE_FORMAT, Task, TaskDraft};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let description: String = row.get(1)?;
    let due_raw: String = row.get(2)?;
    let status: String = row.get(3)?;
    let project_id: Option<i64> = row.get(4)?;

    let due_date = NaiveDate::parse_from_str(&due_raw, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Task {
        id,
        description,
        due_date,
        status,
        project_id,
    })
}

fn validate_fields(description: &str, status: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::empty_field("description"));
    }
    if status.trim().is_empty() {
        return Err(Error::empty_field("status"));
    }
    Ok(())
}

/// Reject a project reference that points at nothing, so the caller sees a
/// validation failure instead of a raw constraint violation.
fn check_project_ref(conn: &Connection, project_id: Option<i64>) -> Result<()> {
    if let Some(pid) = project_id {
        let exists: bool = conn
            .query_row(
                "SELECT 1 FROM proyectos WHERE id = ?1",
                params![pid],
                |_| Ok(true),
            )
            .unwrap_or(false);
        if !exists {
            return Err(Error::invalid_value(
                "project_id",
                format!("references no project: {}", pid),
            ));
        }
    }
    Ok(())
}

impl Database {
    /// Persist a new task. The store assigns the id; it is monotonically
    /// increasing but callers must not assume contiguity.
    pub fn add_task(&self, draft: &TaskDraft) -> Result<Task> {
        validate_fields(&draft.description, &draft.status)?;

        self.with_conn(|conn| {
            check_project_ref(conn, draft.project_id)?;

            conn.execute(
                "INSERT INTO tareas (descripcion, fecha_vencimiento, estado, proyecto_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    &draft.description,
                    draft.due_date.format(DATE_FORMAT).to_string(),
                    &draft.status,
                    draft.project_id,
                ],
            )?;

            Ok(Task {
                id: conn.last_insert_rowid(),
                description: draft.description.clone(),
                due_date: draft.due_date,
                status: draft.status.clone(),
                project_id: draft.project_id,
            })
        })
    }

    /// Replace all mutable fields of an existing task in one statement.
    pub fn update_task(&self, task: &Task) -> Result<()> {
        validate_fields(&task.description, &task.status)?;

        self.with_conn(|conn| {
            check_project_ref(conn, task.project_id)?;

            let updated = conn.execute(
                "UPDATE tareas SET descripcion = ?1, fecha_vencimiento = ?2, estado = ?3,
                 proyecto_id = ?4 WHERE id = ?5",
                params![
                    &task.description,
                    task.due_date.format(DATE_FORMAT).to_string(),
                    &task.status,
                    task.project_id,
                    task.id,
                ],
            )?;

            if updated == 0 {
                return Err(Error::task_not_found(task.id));
            }

            Ok(())
        })
    }

    /// Delete a task by id. Deleting an already-deleted id yields the same
    /// not-found outcome, not a crash.
    pub fn delete_task_row(&self, task_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM tareas WHERE id = ?1", params![task_id])?;

            if deleted == 0 {
                return Err(Error::task_not_found(task_id));
            }

            Ok(())
        })
    }

    /// Get a task by id.
    pub fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, descripcion, fecha_vencimiento, estado, proyecto_id
                 FROM tareas WHERE id = ?1",
            )?;

            let result = stmt.query_row(params![task_id], parse_task_row);

            match result {
                Ok(task) => Ok(Some(task)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all tasks ordered by store-assigned id ascending. Re-call to
    /// refresh; nothing is cached.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, descripcion, fecha_vencimiento, estado, proyecto_id
                 FROM tareas ORDER BY id",
            )?;

            let tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(tasks)
        })
    }
}
