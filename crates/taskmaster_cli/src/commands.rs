//! Command implementations, kept separate from argument parsing.

use anyhow::{bail, Context};
use log::info;
use rusqlite::Connection;
use taskmaster_core::{
    resolve_caller, AuthService, CredentialHasher, HashCost, SessionData, SignUpInput,
    SqliteTaskRepository, SqliteUserRepository, TaskDraft, TaskService, TaskStatus, UserId,
    UserRepository,
};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password";

struct DemoUser {
    name: &'static str,
    email: &'static str,
    tasks: &'static [(&'static str, &'static str, TaskStatus)],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        name: "Alice",
        email: "alice@example.com",
        tasks: &[
            ("Task 1", "Alice's first task", TaskStatus::Pending),
            ("Task 2", "Alice's second task", TaskStatus::InProgress),
        ],
    },
    DemoUser {
        name: "Bob",
        email: "bob@example.com",
        tasks: &[("Task 3", "Bob's first task", TaskStatus::Completed)],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub tasks: usize,
}

/// Creates the demo data in one transaction.
///
/// Without `reset`, fails when a demo email is already registered.
pub fn seed(conn: &mut Connection, reset: bool) -> anyhow::Result<SeedReport> {
    let hasher = CredentialHasher::new(HashCost::default())?;
    seed_with(conn, reset, &hasher)
}

fn seed_with(
    conn: &mut Connection,
    reset: bool,
    hasher: &CredentialHasher,
) -> anyhow::Result<SeedReport> {
    let tx = conn.transaction()?;
    if reset {
        tx.execute_batch(
            "DELETE FROM tasks;
             DELETE FROM users;
             DELETE FROM sqlite_sequence WHERE name IN ('users', 'tasks');",
        )?;
        info!("event=seed_reset module=cli status=ok");
    }

    let mut report = SeedReport { users: 0, tasks: 0 };
    {
        let auth = AuthService::new(SqliteUserRepository::new(&tx), hasher);
        let tasks = TaskService::new(SqliteTaskRepository::new(&tx));

        for demo in DEMO_USERS {
            let mut session = SessionData::default();
            auth.sign_up(
                &mut session,
                &SignUpInput {
                    name: demo.name.to_string(),
                    email: demo.email.to_string(),
                    password: DEMO_PASSWORD.to_string(),
                },
            )
            .with_context(|| format!("creating demo user {}", demo.name))?;
            report.users += 1;

            let caller = resolve_caller(&session);
            for (title, description, status) in demo.tasks {
                tasks.create_task(
                    caller,
                    &TaskDraft {
                        title: title.to_string(),
                        description: Some(description.to_string()),
                        status: Some(status.as_str().to_string()),
                    },
                )?;
                report.tasks += 1;
            }
        }
    }
    tx.commit()?;

    info!(
        "event=seed module=cli status=ok users={} tasks={}",
        report.users, report.tasks
    );
    Ok(report)
}

/// Deletes the user registered under exactly `email`.
pub fn delete_user(conn: &Connection, email: &str) -> anyhow::Result<UserId> {
    let repo = SqliteUserRepository::new(conn);
    let Some(credentials) = repo.find_credentials_by_email(email)? else {
        bail!("no user is registered under that email");
    };
    let user_id = credentials.user.id;
    repo.delete_user(user_id)?;
    info!("event=delete_user module=cli status=ok user_id={user_id}");
    Ok(user_id)
}
