use taskmaster_core::db::migrations::{latest_version, schema_version};
use taskmaster_core::db::{open_db, open_db_in_memory, open_pool, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "tasks");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskmaster.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    assert_table_exists(&conn_second, "tasks");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn pooled_connections_enforce_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let pool = open_pool(dir.path().join("pool.db"), 2).unwrap();
    let conn = pool.get().unwrap();

    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());

    let orphan = conn.execute(
        "INSERT INTO tasks (title, owner_id) VALUES ('orphan', 12345);",
        [],
    );
    assert!(orphan.is_err());
}

#[test]
fn status_column_rejects_values_outside_enumeration() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO users (name, email, password_hash) VALUES ('a', 'a@example.com', 'x');",
        [],
    )
    .unwrap();

    let result = conn.execute(
        "INSERT INTO tasks (title, status, owner_id) VALUES ('t', 'archived', 1);",
        [],
    );
    assert!(result.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
