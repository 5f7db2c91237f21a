//! Integration tests for the database layer.
//!
//! These tests run against an in-memory SQLite database (plus one on-disk
//! case for the open/migration path) and are organized by entity.

use taskdesk::config::AuthConfig;
use taskdesk::db::Database;
use taskdesk::types::{TaskDraft, parse_due_date};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

/// Cheap hash parameters so tests don't burn CPU on the work factor.
fn auth() -> AuthConfig {
    AuthConfig::fast_insecure()
}

fn draft(description: &str, due: &str, status: &str) -> TaskDraft {
    TaskDraft {
        description: description.to_string(),
        due_date: parse_due_date(due).unwrap(),
        status: status.to_string(),
        project_id: None,
    }
}

#[test]
fn open_on_disk_runs_migrations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskdesk.db");

    let db = Database::open(&path).expect("Failed to open database");
    assert!(db.list_tasks().unwrap().is_empty());

    // Re-open: migrations must be idempotent.
    drop(db);
    let db = Database::open(&path).expect("Failed to re-open database");
    assert!(db.list_users().unwrap().is_empty());
}

mod user_tests {
    use super::*;

    #[test]
    fn create_user_assigns_id_and_stores_hash() {
        let db = setup_db();

        let user = db.create_user("alice", "secret1", &auth()).unwrap();

        assert!(user.id > 0);
        assert_eq!(user.username, "alice");
        assert_ne!(user.password_hash, "secret1");
        assert!(!user.password_hash.contains("secret1"));
    }

    #[test]
    fn create_user_rejects_empty_username() {
        let db = setup_db();

        let err = db.create_user("  ", "secret1", &auth()).unwrap_err();

        assert!(err.is_validation());
    }

    #[test]
    fn create_user_rejects_duplicate_username() {
        let db = setup_db();
        db.create_user("alice", "secret1", &auth()).unwrap();

        let err = db.create_user("alice", "other", &auth()).unwrap_err();

        assert!(err.is_validation());
    }

    #[test]
    fn verify_accepts_correct_credentials() {
        let db = setup_db();
        db.create_user("alice", "secret1", &auth()).unwrap();

        assert!(db.verify("alice", "secret1").unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password_and_unknown_user() {
        let db = setup_db();
        db.create_user("alice", "secret1", &auth()).unwrap();

        assert!(!db.verify("alice", "wrong").unwrap());
        assert!(!db.verify("nosuchuser", "anything").unwrap());
    }

    #[test]
    fn stored_credential_never_contains_plaintext() {
        let db = setup_db();
        let user = db.create_user("u", "p", &auth()).unwrap();

        let fetched = db.get_user(user.id).unwrap().unwrap();
        assert_ne!(fetched.password_hash, "p");
        assert!(fetched.password_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn update_credentials_replaces_both_fields() {
        let db = setup_db();
        let user = db.create_user("alice", "secret1", &auth()).unwrap();

        db.update_credentials(user.id, "alicia", "secret2", &auth())
            .unwrap();

        assert!(db.get_user_by_username("alice").unwrap().is_none());
        assert!(!db.verify("alicia", "secret1").unwrap());
        assert!(db.verify("alicia", "secret2").unwrap());
    }

    #[test]
    fn update_credentials_fails_for_unknown_id() {
        let db = setup_db();

        let err = db
            .update_credentials(999, "ghost", "pw", &auth())
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn delete_user_removes_memberships_but_not_tasks() {
        let db = setup_db();
        let user = db.create_user("alice", "secret1", &auth()).unwrap();
        let role = db.create_role("admin").unwrap();
        db.assign_role(user.id, role.id).unwrap();
        let task = db.add_task(&draft("report", "2030-05-30", "Pending")).unwrap();

        db.delete_user(user.id).unwrap();

        assert!(db.get_user(user.id).unwrap().is_none());
        assert!(db.roles_of(user.id).unwrap().is_empty());
        // Tasks are not user-owned
        assert!(db.get_task_by_id(task.id).unwrap().is_some());
    }

    #[test]
    fn delete_user_fails_for_unknown_id() {
        let db = setup_db();

        assert!(db.delete_user(42).unwrap_err().is_not_found());
    }

    #[test]
    fn list_users_orders_by_id() {
        let db = setup_db();
        db.create_user("alice", "a", &auth()).unwrap();
        db.create_user("bob", "b", &auth()).unwrap();

        let users = db.list_users().unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "alice");
        assert_eq!(users[1].username, "bob");
    }
}

mod role_tests {
    use super::*;

    #[test]
    fn create_role_assigns_id() {
        let db = setup_db();

        let role = db.create_role("admin").unwrap();

        assert!(role.id > 0);
        assert_eq!(role.name, "admin");
    }

    #[test]
    fn create_role_rejects_empty_and_duplicate_names() {
        let db = setup_db();
        db.create_role("admin").unwrap();

        assert!(db.create_role("").unwrap_err().is_validation());
        assert!(db.create_role("admin").unwrap_err().is_validation());
    }

    #[test]
    fn assign_role_is_idempotent() {
        let db = setup_db();
        let user = db.create_user("alice", "secret1", &auth()).unwrap();
        let role = db.create_role("admin").unwrap();

        db.assign_role(user.id, role.id).unwrap();
        db.assign_role(user.id, role.id).unwrap();

        let roles = db.roles_of(user.id).unwrap();
        assert_eq!(roles.len(), 1);
    }

    #[test]
    fn assign_role_fails_for_unknown_user_or_role() {
        let db = setup_db();
        let user = db.create_user("alice", "secret1", &auth()).unwrap();
        let role = db.create_role("admin").unwrap();

        assert!(db.assign_role(999, role.id).unwrap_err().is_not_found());
        assert!(db.assign_role(user.id, 999).unwrap_err().is_not_found());
    }

    #[test]
    fn roles_of_is_empty_for_zero_roles_and_unknown_ids() {
        let db = setup_db();
        let user = db.create_user("bob", "pw", &auth()).unwrap();

        assert!(db.roles_of(user.id).unwrap().is_empty());
        assert!(db.roles_of(12345).unwrap().is_empty());
    }

    #[test]
    fn roles_of_returns_all_memberships() {
        let db = setup_db();
        let user = db.create_user("alice", "secret1", &auth()).unwrap();
        let admin = db.create_role("admin").unwrap();
        let viewer = db.create_role("viewer").unwrap();
        db.assign_role(user.id, admin.id).unwrap();
        db.assign_role(user.id, viewer.id).unwrap();

        let roles = db.roles_of(user.id).unwrap();

        assert_eq!(roles.len(), 2);
        assert!(roles.iter().any(|r| r.name == "admin"));
        assert!(roles.iter().any(|r| r.name == "viewer"));
    }

    #[test]
    fn all_roles_returns_every_definition() {
        let db = setup_db();
        db.create_role("admin").unwrap();
        db.create_role("viewer").unwrap();

        assert_eq!(db.all_roles().unwrap().len(), 2);
    }

    #[test]
    fn get_role_by_name_finds_existing_role() {
        let db = setup_db();
        let role = db.create_role("admin").unwrap();

        let found = db.get_role_by_name("admin").unwrap().unwrap();
        assert_eq!(found.id, role.id);
        assert!(db.get_role_by_name("missing").unwrap().is_none());
    }
}

mod project_tests {
    use super::*;

    #[test]
    fn create_project_assigns_id() {
        let db = setup_db();

        let project = db.create_project("Website", "relaunch").unwrap();

        assert!(project.id > 0);
        assert_eq!(project.name, "Website");
        assert_eq!(project.description, "relaunch");
    }

    #[test]
    fn create_project_rejects_empty_name() {
        let db = setup_db();

        assert!(db.create_project("", "x").unwrap_err().is_validation());
    }

    #[test]
    fn list_projects_orders_by_id() {
        let db = setup_db();
        db.create_project("A", "").unwrap();
        db.create_project("B", "").unwrap();

        let projects = db.list_projects().unwrap();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].name, "A");
        assert!(db.get_project(projects[1].id).unwrap().is_some());
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn add_then_get_round_trips_all_fields() {
        let db = setup_db();

        let added = db.add_task(&draft("Write report", "2030-05-30", "Pending")).unwrap();
        let fetched = db.get_task_by_id(added.id).unwrap().unwrap();

        assert_eq!(fetched, added);
        assert_eq!(fetched.description, "Write report");
        assert_eq!(fetched.due_date.to_string(), "2030-05-30");
        assert_eq!(fetched.status, "Pending");
    }

    #[test]
    fn add_task_rejects_empty_fields() {
        let db = setup_db();

        assert!(db
            .add_task(&draft("", "2030-05-30", "Pending"))
            .unwrap_err()
            .is_validation());
        assert!(db
            .add_task(&draft("desc", "2030-05-30", " "))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn add_task_rejects_dangling_project_reference() {
        let db = setup_db();
        let mut d = draft("desc", "2030-05-30", "Pending");
        d.project_id = Some(999);

        assert!(db.add_task(&d).unwrap_err().is_validation());
    }

    #[test]
    fn add_task_accepts_valid_project_reference() {
        let db = setup_db();
        let project = db.create_project("Website", "").unwrap();
        let mut d = draft("desc", "2030-05-30", "Pending");
        d.project_id = Some(project.id);

        let task = db.add_task(&d).unwrap();
        assert_eq!(task.project_id, Some(project.id));
    }

    #[test]
    fn ids_are_monotonically_increasing() {
        let db = setup_db();

        let a = db.add_task(&draft("a", "2030-01-01", "Pending")).unwrap();
        let b = db.add_task(&draft("b", "2030-01-02", "Pending")).unwrap();

        assert!(b.id > a.id);
    }

    #[test]
    fn update_replaces_all_mutable_fields() {
        let db = setup_db();
        let mut task = db.add_task(&draft("old", "2030-01-01", "Pending")).unwrap();

        task.description = "new".to_string();
        task.due_date = parse_due_date("2031-02-03").unwrap();
        task.status = "Done".to_string();
        db.update_task(&task).unwrap();

        let fetched = db.get_task_by_id(task.id).unwrap().unwrap();
        assert_eq!(fetched.description, "new");
        assert_eq!(fetched.due_date.to_string(), "2031-02-03");
        assert_eq!(fetched.status, "Done");
    }

    #[test]
    fn update_fails_for_unknown_id() {
        let db = setup_db();
        let mut task = db.add_task(&draft("x", "2030-01-01", "Pending")).unwrap();
        db.delete_task_row(task.id).unwrap();

        task.status = "Done".to_string();
        assert!(db.update_task(&task).unwrap_err().is_not_found());
    }

    #[test]
    fn delete_is_idempotent_via_not_found() {
        let db = setup_db();
        let task = db.add_task(&draft("x", "2030-01-01", "Pending")).unwrap();

        db.delete_task_row(task.id).unwrap();
        let second = db.delete_task_row(task.id).unwrap_err();

        assert!(second.is_not_found());
    }

    #[test]
    fn list_orders_by_id_ascending() {
        let db = setup_db();
        db.add_task(&draft("first", "2030-01-01", "Pending")).unwrap();
        db.add_task(&draft("second", "2030-01-02", "Pending")).unwrap();
        db.add_task(&draft("third", "2030-01-03", "Pending")).unwrap();

        let tasks = db.list_tasks().unwrap();

        assert_eq!(tasks.len(), 3);
        assert!(tasks.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(tasks[0].description, "first");
    }

    #[test]
    fn get_returns_none_for_unknown_id() {
        let db = setup_db();

        assert!(db.get_task_by_id(999).unwrap().is_none());
    }
}
