//! User repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and look up user credential rows.
//! - Surface email uniqueness violations as `RepoError::Conflict`.
//!
//! # Invariants
//! - Email lookups are exact, byte-wise matches.
//! - Read paths never expose the password hash through `User`.

use crate::model::user::{User, UserCredentials, UserId};
use crate::repo::{constraint_kind, ConstraintKind, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for user persistence.
pub trait UserRepository {
    /// Inserts a user and returns the stored projection.
    fn create_user(&self, name: &str, email: &str, password_hash: &str) -> RepoResult<User>;
    /// Finds the credential row for an exact email.
    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Removes a user. Owned tasks are removed by the `ON DELETE CASCADE` rule.
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    fn count_users(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, name: &str, email: &str, password_hash: &str) -> RepoResult<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?1, ?2, ?3);",
            params![name, email, password_hash],
        );

        match inserted {
            Ok(_) => Ok(User {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
                email: email.to_string(),
            }),
            Err(err) if constraint_kind(&err) == Some(ConstraintKind::Unique) => Err(
                RepoError::Conflict("email is already registered".to_string()),
            ),
            Err(err) => Err(err.into()),
        }
    }

    fn find_credentials_by_email(&self, email: &str) -> RepoResult<Option<UserCredentials>> {
        let credentials = self
            .conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE email = ?1;",
                [email],
                |row| {
                    Ok(UserCredentials {
                        user: parse_user_row(row)?,
                        password_hash: row.get("password_hash")?,
                    })
                },
            )
            .optional()?;
        Ok(credentials)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "user", id });
        }
        Ok(())
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative user count `{count}`")))
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
