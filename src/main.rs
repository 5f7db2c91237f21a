//! Taskdesk CLI.
//!
//! Thin presentation layer over the service: parses arguments, renders the
//! plain data the core returns, and maps error kinds to exit codes. No
//! business logic lives here.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use taskdesk::config::Config;
use taskdesk::db::Database;
use taskdesk::error::Error;
use taskdesk::service::TaskService;
use taskdesk::types::Task;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Role-gated task tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Credentials for operations that require an authenticated session.
#[derive(Args, Debug)]
struct LoginArgs {
    /// Username to authenticate as
    #[arg(short, long)]
    user: String,

    /// Password for the user
    #[arg(short, long)]
    password: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a user account
    UserAdd { username: String, password: String },

    /// Replace a user's username and password
    UserPasswd {
        id: i64,
        username: String,
        password: String,
    },

    /// Delete a user (their role memberships go with them; tasks stay)
    UserRm { id: i64 },

    /// List user accounts
    UserList,

    /// Create a role
    RoleAdd { name: String },

    /// Assign a role to a user
    RoleAssign { username: String, role: String },

    /// List roles
    RoleList,

    /// Create a project
    ProjectAdd {
        name: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// List projects
    ProjectList,

    /// Add a task from 'description,due_date,status' input
    TaskAdd {
        #[command(flatten)]
        login: LoginArgs,
        input: String,
    },

    /// List tasks
    TaskList {
        #[command(flatten)]
        login: LoginArgs,
    },

    /// Replace a task's description, due date, and status
    TaskEdit {
        #[command(flatten)]
        login: LoginArgs,
        id: i64,
        description: String,
        due_date: String,
        status: String,
    },

    /// Delete a task
    TaskRm {
        #[command(flatten)]
        login: LoginArgs,
        id: i64,
    },
}

fn print_task(task: &Task, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(task)?);
    } else {
        println!(
            "{}\t{}\t{}\t{}",
            task.id, task.description, task.due_date, task.status
        );
    }
    Ok(())
}

fn login_service(db: Database, login: &LoginArgs) -> Result<TaskService, Error> {
    let mut service = TaskService::new(db);
    service.login(&login.user, &login.password)?;
    Ok(service)
}

fn run(cli: Cli, config: &Config, db: Database) -> Result<()> {
    let json = cli.json;

    match cli.command {
        Command::UserAdd { username, password } => {
            let user = db.create_user(&username, &password, &config.auth)?;
            println!("created user {} (id {})", user.username, user.id);
        }
        Command::UserPasswd {
            id,
            username,
            password,
        } => {
            db.update_credentials(id, &username, &password, &config.auth)?;
            println!("updated credentials for user {}", id);
        }
        Command::UserRm { id } => {
            db.delete_user(id)?;
            println!("deleted user {}", id);
        }
        Command::UserList => {
            for user in db.list_users()? {
                if json {
                    println!("{}", serde_json::to_string(&user)?);
                } else {
                    println!("{}\t{}", user.id, user.username);
                }
            }
        }
        Command::RoleAdd { name } => {
            let role = db.create_role(&name)?;
            println!("created role {} (id {})", role.name, role.id);
        }
        Command::RoleAssign { username, role } => {
            let user = db
                .get_user_by_username(&username)?
                .ok_or_else(|| Error::invalid_value("username", "no such user"))?;
            let role = db
                .get_role_by_name(&role)?
                .ok_or_else(|| Error::invalid_value("role", "no such role"))?;
            db.assign_role(user.id, role.id)?;
            println!("assigned role {} to {}", role.name, user.username);
        }
        Command::RoleList => {
            let mut roles: Vec<_> = db.all_roles()?.into_iter().collect();
            roles.sort_by_key(|r| r.id);
            for role in roles {
                println!("{}\t{}", role.id, role.name);
            }
        }
        Command::ProjectAdd { name, description } => {
            let project = db.create_project(&name, &description)?;
            println!("created project {} (id {})", project.name, project.id);
        }
        Command::ProjectList => {
            for project in db.list_projects()? {
                if json {
                    println!("{}", serde_json::to_string(&project)?);
                } else {
                    println!("{}\t{}\t{}", project.id, project.name, project.description);
                }
            }
        }
        Command::TaskAdd { login, input } => {
            let service = login_service(db, &login)?;
            let task = service.add_task(&input)?;
            print_task(&task, json)?;
        }
        Command::TaskList { login } => {
            let service = login_service(db, &login)?;
            for task in service.list_tasks()? {
                print_task(&task, json)?;
            }
        }
        Command::TaskEdit {
            login,
            id,
            description,
            due_date,
            status,
        } => {
            let service = login_service(db, &login)?;
            let task = service.edit_task(id, &description, &due_date, &status)?;
            print_task(&task, json)?;
        }
        Command::TaskRm { login, id } => {
            let service = login_service(db, &login)?;
            service.delete_task(id)?;
            println!("deleted task {}", id);
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let mut config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };

    if let Some(path) = &cli.database {
        config.store.db_path = path.into();
    }

    if let Err(e) = config.ensure_db_dir() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }

    let db = match Database::open(&config.store.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, &config, db) {
        let code = match e.downcast_ref::<Error>() {
            Some(Error::Validation { .. }) => 2,
            Some(Error::PermissionDenied(_)) => 3,
            Some(Error::NotFound { .. }) => 4,
            _ => 1,
        };
        eprintln!("error: {}", e);
        std::process::exit(code);
    }
}
