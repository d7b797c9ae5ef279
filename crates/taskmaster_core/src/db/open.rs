//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Build the shared connection pool used by the server.
//! - Configure connection pragmas required by core behavior.
//! - Trigger schema migrations before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - Returned connections (and pools) have migrations fully applied.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Pool of migrated SQLite connections shared across requests.
pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

/// Pool size used when the caller has no preference.
pub const DEFAULT_POOL_SIZE: u32 = 8;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a SQLite database file, creating it when missing, and migrates it.
///
/// Emits `db_open` events with mode, status and duration.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Opens an isolated in-memory database and migrates it.
///
/// Every call returns a fresh database, which makes this the entry point
/// for repository and service tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

/// Migrates the database file at `path` and builds a connection pool over it.
///
/// Migrations run once on a bootstrap connection; pooled connections only
/// receive per-connection pragmas. The file is switched to WAL journaling so
/// readers do not block the single writer.
///
/// # Side effects
/// - Creates the database file when missing.
/// - Emits `db_pool_open` logging events.
pub fn open_pool(path: impl AsRef<Path>, max_size: u32) -> DbResult<DbPool> {
    let path = path.as_ref();
    let started_at = Instant::now();

    {
        let conn = open_db(path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }

    let manager = SqliteConnectionManager::file(path).with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)
    });

    match r2d2::Pool::builder().max_size(max_size.max(1)).build(manager) {
        Ok(pool) => {
            info!(
                "event=db_pool_open module=db status=ok max_size={} duration_ms={}",
                pool.max_size(),
                started_at.elapsed().as_millis()
            );
            Ok(pool)
        }
        Err(err) => {
            error!(
                "event=db_pool_open module=db status=error duration_ms={} error_code=db_pool_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err.into())
        }
    }
}

fn open_with(
    mode: &'static str,
    open: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    let opened = open()
        .map_err(DbError::from)
        .and_then(|mut conn| bootstrap_connection(&mut conn).map(|()| conn));

    match &opened {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }
    opened
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
