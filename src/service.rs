//! TaskService: the orchestrator the presentation layer talks to.
//!
//! A service goes `Unauthenticated -> Authenticated` exactly once, via a
//! successful credential check; there is no timeout or renewal here. Every
//! operation validates input first, then consults the access guard, and
//! only then touches the repository, so validation and permission failures
//! never reach the store. Operations return plain data; rendering is the
//! caller's problem.

use crate::auth::guard::{self, ADMIN_ROLE};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::types::{Task, parse_due_date, parse_task_input};
use tracing::{debug, info, warn};

/// Per-session authentication state.
#[derive(Debug, Clone)]
pub enum Session {
    Unauthenticated,
    Authenticated(crate::types::User),
}

/// Orchestrates validation, access gating, and task persistence.
pub struct TaskService {
    db: Database,
    session: Session,
}

impl TaskService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            session: Session::Unauthenticated,
        }
    }

    /// Authenticate this session.
    ///
    /// Failure is one undifferentiated invalid-credentials outcome whether
    /// the username or the password was wrong.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if !self.db.verify(username, password)? {
            warn!(username, "login rejected");
            return Err(Error::invalid_credentials());
        }

        let user = self
            .db
            .get_user_by_username(username)?
            .ok_or_else(Error::invalid_credentials)?;

        info!(username, user_id = user.id, "login accepted");
        self.session = Session::Authenticated(user);
        Ok(())
    }

    /// The authenticated user, if any.
    pub fn current_user(&self) -> Option<&crate::types::User> {
        match &self.session {
            Session::Authenticated(user) => Some(user),
            Session::Unauthenticated => None,
        }
    }

    fn require_user(&self) -> Result<&crate::types::User> {
        self.current_user().ok_or_else(Error::not_authenticated)
    }

    /// Short-circuit with `PermissionDenied` unless the authenticated user
    /// holds the role. Role membership is read live from the store.
    fn require_role(&self, role: &str) -> Result<()> {
        let user = self.require_user()?;
        if !guard::permits(&self.db, user.id, role)? {
            warn!(user_id = user.id, role, "mutation denied");
            return Err(Error::missing_role(role));
        }
        Ok(())
    }

    /// List all tasks, id ascending. Permitted for any authenticated user.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.require_user()?;
        self.db.list_tasks()
    }

    /// Add a task from the raw `description,due_date,status` input.
    pub fn add_task(&self, raw: &str) -> Result<Task> {
        // Validation strictly precedes the permission check and any store
        // write.
        let draft = parse_task_input(raw)?;
        self.require_role(ADMIN_ROLE)?;

        let task = self.db.add_task(&draft)?;
        info!(task_id = task.id, "task added");
        Ok(task)
    }

    /// Replace the description, due date, and status of an existing task.
    pub fn edit_task(
        &self,
        task_id: i64,
        description: &str,
        due_date: &str,
        status: &str,
    ) -> Result<Task> {
        if description.trim().is_empty() {
            return Err(Error::empty_field("description"));
        }
        if status.trim().is_empty() {
            return Err(Error::empty_field("status"));
        }
        let due_date = parse_due_date(due_date.trim())?;

        self.require_role(ADMIN_ROLE)?;

        let existing = self
            .db
            .get_task_by_id(task_id)?
            .ok_or_else(|| Error::task_not_found(task_id))?;

        let task = Task {
            id: existing.id,
            description: description.trim().to_string(),
            due_date,
            status: status.trim().to_string(),
            project_id: existing.project_id,
        };
        self.db.update_task(&task)?;

        debug!(task_id, "task updated");
        Ok(task)
    }

    /// Delete a task by id.
    pub fn delete_task(&self, task_id: i64) -> Result<()> {
        self.require_role(ADMIN_ROLE)?;
        self.db.delete_task_row(task_id)?;
        info!(task_id, "task deleted");
        Ok(())
    }
}
