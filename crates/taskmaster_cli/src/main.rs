//! Operator CLI.
//!
//! # Responsibility
//! - Probe core linkage (`ping`).
//! - Seed demo accounts and tasks through the same services the API uses.
//! - Delete users administratively; their tasks go with them.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "taskmaster", version, about = "TaskMaster operator tools")]
struct Cli {
    /// Log level for stderr output.
    #[arg(long, global = true, default_value = "warn", env = "TASKMASTER_LOG_LEVEL")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core ping and version.
    Ping,
    /// Create the demo users and tasks.
    Seed {
        #[arg(long, env = "TASKMASTER_DB")]
        db: PathBuf,
        /// Delete all existing users and tasks first.
        #[arg(long)]
        reset: bool,
    },
    /// Delete a user and all of their tasks.
    DeleteUser {
        #[arg(long, env = "TASKMASTER_DB")]
        db: PathBuf,
        #[arg(long)]
        email: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    taskmaster_core::init_console_logging(&cli.log_level).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Ping => {
            println!("taskmaster_core ping={}", taskmaster_core::ping());
            println!("taskmaster_core version={}", taskmaster_core::core_version());
        }
        Command::Seed { db, reset } => {
            let mut conn = taskmaster_core::db::open_db(&db)?;
            let report = commands::seed(&mut conn, reset)?;
            println!(
                "seeded users={} tasks={} db={}",
                report.users,
                report.tasks,
                db.display()
            );
        }
        Command::DeleteUser { db, email } => {
            let conn = taskmaster_core::db::open_db(&db)?;
            let user_id = commands::delete_user(&conn, &email)?;
            println!("deleted user_id={user_id}");
        }
    }
    Ok(())
}
