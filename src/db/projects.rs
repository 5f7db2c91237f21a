//! Project persistence.
//!
//! Projects exist so tasks have something to reference; deletion (and any
//! cascade rule it would need) is deliberately not offered here.

use super::Database;
use crate::error::{Error, Result};
use crate::types::Project;
use rusqlite::params;

impl Database {
    /// Create a new project.
    pub fn create_project(&self, name: &str, description: &str) -> Result<Project> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::empty_field("project name"));
        }

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO proyectos (nombre, descripcion) VALUES (?1, ?2)",
                params![name, description],
            )?;

            Ok(Project {
                id: conn.last_insert_rowid(),
                name: name.to_string(),
                description: description.to_string(),
            })
        })
    }

    /// Get a project by id.
    pub fn get_project(&self, project_id: i64) -> Result<Option<Project>> {
        self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT id, nombre, descripcion FROM proyectos WHERE id = ?1",
                params![project_id],
                |row| {
                    Ok(Project {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                },
            );

            match result {
                Ok(project) => Ok(Some(project)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// List all projects, id ascending.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, nombre, descripcion FROM proyectos ORDER BY id")?;

            let projects = stmt
                .query_map([], |row| {
                    Ok(Project {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(projects)
        })
    }
}
