use taskmaster_core::db::open_db_in_memory;
use taskmaster_core::{
    logout, resolve_caller, AuthService, Caller, CredentialHasher, HashCost, ServiceError,
    SessionData, SignUpInput, SqliteTaskRepository, SqliteUserRepository, TaskDraft, TaskService,
    UserRepository,
};

fn hasher() -> CredentialHasher {
    CredentialHasher::new(HashCost::insecure_fast()).unwrap()
}

fn sign_up_input(name: &str, email: &str, password: &str) -> SignUpInput {
    SignUpInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn sign_up_then_login_yields_same_identity() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    let mut session = SessionData::default();
    let created = service
        .sign_up(
            &mut session,
            &sign_up_input("Alice", "alice@example.com", "pw123456"),
        )
        .unwrap();
    assert_eq!(created.name, "Alice");
    assert_eq!(created.email, "alice@example.com");
    assert_eq!(session.user_id, Some(created.id));

    let mut fresh_session = SessionData::default();
    let logged_in = service
        .login(&mut fresh_session, "alice@example.com", "pw123456")
        .unwrap();
    assert_eq!(logged_in, created);
    assert_eq!(resolve_caller(&fresh_session), Caller::User(created.id));
}

#[test]
fn stored_password_is_hashed() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    service
        .sign_up(
            &mut SessionData::default(),
            &sign_up_input("Alice", "alice@example.com", "pw123456"),
        )
        .unwrap();

    let stored: String = conn
        .query_row(
            "SELECT password_hash FROM users WHERE email = 'alice@example.com';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_ne!(stored, "pw123456");
    assert!(hasher.verify("pw123456", &stored));
}

#[test]
fn duplicate_sign_up_is_conflict_and_leaves_session_untouched() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    let first = service
        .sign_up(
            &mut SessionData::default(),
            &sign_up_input("Alice", "alice@example.com", "pw123456"),
        )
        .unwrap();

    let mut session = SessionData::default();
    let err = service
        .sign_up(
            &mut session,
            &sign_up_input("Impostor", "alice@example.com", "other-password"),
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert!(!session.is_authenticated());

    let mut login_session = SessionData::default();
    let again = service
        .login(&mut login_session, "alice@example.com", "pw123456")
        .unwrap();
    assert_eq!(again, first);
}

#[test]
fn sign_up_requires_every_field() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    for input in [
        sign_up_input("", "a@example.com", "pw"),
        sign_up_input("A", "  ", "pw"),
        sign_up_input("A", "a@example.com", ""),
    ] {
        let mut session = SessionData::default();
        let err = service.sign_up(&mut session, &input).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(!session.is_authenticated());
    }
    assert_eq!(SqliteUserRepository::new(&conn).count_users().unwrap(), 0);
}

#[test]
fn wrong_password_and_unknown_email_fail_identically() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);
    service
        .sign_up(
            &mut SessionData::default(),
            &sign_up_input("Alice", "alice@example.com", "pw123456"),
        )
        .unwrap();

    let mut session = SessionData::default();
    let wrong_password = service
        .login(&mut session, "alice@example.com", "nope")
        .unwrap_err();
    let unknown_email = service
        .login(&mut session, "ghost@example.com", "pw123456")
        .unwrap_err();

    assert_eq!(wrong_password, ServiceError::InvalidCredentials);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(!session.is_authenticated());
}

#[test]
fn email_case_is_significant_for_registration_and_login() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let service = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    let mixed = service
        .sign_up(
            &mut SessionData::default(),
            &sign_up_input("Alice", "Alice@Example.com", "pw123456"),
        )
        .unwrap();
    let lower = service
        .sign_up(
            &mut SessionData::default(),
            &sign_up_input("alice", "alice@example.com", "pw123456"),
        )
        .unwrap();
    assert_ne!(mixed.id, lower.id);

    let mut session = SessionData::default();
    let err = service
        .login(&mut session, "ALICE@EXAMPLE.COM", "pw123456")
        .unwrap_err();
    assert_eq!(err, ServiceError::InvalidCredentials);

    let found = service
        .login(&mut session, "Alice@Example.com", "pw123456")
        .unwrap();
    assert_eq!(found.id, mixed.id);
}

#[test]
fn logout_clears_identity_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let auth = AuthService::new(SqliteUserRepository::new(&conn), &hasher);
    let tasks = TaskService::new(SqliteTaskRepository::new(&conn));

    let mut session = SessionData::default();
    auth.sign_up(
        &mut session,
        &sign_up_input("Alice", "alice@example.com", "pw123456"),
    )
    .unwrap();
    assert!(auth.me(resolve_caller(&session)).unwrap().is_some());

    assert!(logout(&mut session));
    assert!(logout(&mut session));

    let caller = resolve_caller(&session);
    assert_eq!(auth.me(caller).unwrap(), None);
    assert_eq!(
        tasks.list_tasks(caller).unwrap_err(),
        ServiceError::Unauthenticated
    );
    let draft = TaskDraft {
        title: "after logout".to_string(),
        ..TaskDraft::default()
    };
    assert_eq!(
        tasks.create_task(caller, &draft).unwrap_err(),
        ServiceError::Unauthenticated
    );
}

#[test]
fn me_for_deleted_user_is_none() {
    let conn = open_db_in_memory().unwrap();
    let hasher = hasher();
    let users = SqliteUserRepository::new(&conn);
    let auth = AuthService::new(SqliteUserRepository::new(&conn), &hasher);

    let mut session = SessionData::default();
    let user = auth
        .sign_up(
            &mut session,
            &sign_up_input("Alice", "alice@example.com", "pw123456"),
        )
        .unwrap();
    users.delete_user(user.id).unwrap();

    assert_eq!(auth.me(resolve_caller(&session)).unwrap(), None);
}
