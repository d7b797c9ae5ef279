use taskmaster_core::db::open_db_in_memory;
use taskmaster_core::{
    NewTask, RepoError, SqliteTaskRepository, SqliteUserRepository, TaskRepository, TaskStatus,
    UserRepository,
};

#[test]
fn create_and_lookup_by_email_and_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);

    let user = repo
        .create_user("Alice", "alice@example.com", "$argon2id$stub")
        .unwrap();
    assert!(user.id > 0);

    let credentials = repo
        .find_credentials_by_email("alice@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(credentials.user, user);
    assert_eq!(credentials.password_hash, "$argon2id$stub");

    assert_eq!(repo.get_user(user.id).unwrap(), Some(user));
    assert_eq!(repo.count_users().unwrap(), 1);
}

#[test]
fn duplicate_email_is_a_conflict_and_keeps_first_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);

    let first = repo.create_user("Alice", "dup@example.com", "h1").unwrap();
    let err = repo.create_user("Mallory", "dup@example.com", "h2").unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let stored = repo
        .find_credentials_by_email("dup@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(stored.user, first);
    assert_eq!(stored.password_hash, "h1");
    assert_eq!(repo.count_users().unwrap(), 1);
}

#[test]
fn email_lookup_is_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);

    repo.create_user("Alice", "Alice@Example.com", "h").unwrap();
    assert!(repo
        .find_credentials_by_email("alice@example.com")
        .unwrap()
        .is_none());

    repo.create_user("alice", "alice@example.com", "h").unwrap();
    assert_eq!(repo.count_users().unwrap(), 2);
}

#[test]
fn missing_user_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteUserRepository::new(&conn);

    assert!(repo.get_user(404).unwrap().is_none());
    assert!(repo
        .find_credentials_by_email("nobody@example.com")
        .unwrap()
        .is_none());
}

#[test]
fn deleting_user_cascades_to_their_tasks() {
    let conn = open_db_in_memory().unwrap();
    let users = SqliteUserRepository::new(&conn);
    let tasks = SqliteTaskRepository::new(&conn);

    let alice = users.create_user("Alice", "alice@example.com", "h").unwrap();
    let bob = users.create_user("Bob", "bob@example.com", "h").unwrap();
    let new_task = NewTask {
        title: "T".to_string(),
        description: String::new(),
        status: TaskStatus::Pending,
    };
    tasks.create_task(alice.id, &new_task).unwrap();
    tasks.create_task(alice.id, &new_task).unwrap();
    tasks.create_task(bob.id, &new_task).unwrap();

    users.delete_user(alice.id).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 1);
    assert_eq!(tasks.list_tasks(bob.id).unwrap().len(), 1);

    let err = users.delete_user(alice.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "user", .. }));
}
