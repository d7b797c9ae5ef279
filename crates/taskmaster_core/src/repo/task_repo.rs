//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every statement filters on `owner_id`; a row owned by another user is
//!   indistinguishable from a missing row.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::task::{NewTask, Task, TaskId, TaskStatus};
use crate::model::user::UserId;
use crate::repo::{constraint_kind, ConstraintKind, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    status,
    owner_id,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for owner-scoped task CRUD.
pub trait TaskRepository {
    /// Lists every task owned by `owner`, ascending by id.
    fn list_tasks(&self, owner: UserId) -> RepoResult<Vec<Task>>;
    /// Gets one task matching both `id` and `owner`.
    fn get_task(&self, id: TaskId, owner: UserId) -> RepoResult<Option<Task>>;
    /// Inserts a task for `owner` and returns the stored row.
    fn create_task(&self, owner: UserId, task: &NewTask) -> RepoResult<Task>;
    /// Persists mutable fields of `task`, matching on `(id, owner_id)`.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Deletes the task matching both `id` and `owner`.
    fn delete_task(&self, id: TaskId, owner: UserId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks(&self, owner: UserId) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query([owner])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn get_task(&self, id: TaskId, owner: UserId) -> RepoResult<Option<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1
               AND owner_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn create_task(&self, owner: UserId, task: &NewTask) -> RepoResult<Task> {
        let inserted = self.conn.execute(
            "INSERT INTO tasks (title, description, status, owner_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                owner,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::ForeignKey) => {
                return Err(RepoError::MissingReference(format!(
                    "task owner {owner} does not exist"
                )));
            }
            Err(err) => return Err(err.into()),
        }

        let id = self.conn.last_insert_rowid();
        self.get_task(id, owner)?.ok_or_else(|| {
            RepoError::InvalidData(format!("created task {id} not found in read-back"))
        })
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                status = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4
               AND owner_id = ?5;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.id,
                task.owner_id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "task",
                id: task.id,
            });
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId, owner: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2;",
            params![id, owner],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "task", id });
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        RepoError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

