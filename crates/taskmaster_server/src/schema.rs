//! GraphQL schema: objects, queries and mutations.
//!
//! # Invariants
//! - Resolvers never read identity from arguments; the caller comes from the
//!   request's [`RequestSession`].
//! - Every failure carries `extensions.code` from [`ServiceError::code`].
//! - A task id that is not an integer behaves like a missing task.

use crate::session::RequestSession;
use crate::state::AppState;
use async_graphql::{
    Context, EmptySubscription, Error, ErrorExtensions, Object, Result, Schema, SimpleObject, ID,
};
use log::error;
use std::sync::Arc;
use taskmaster_core::{
    authorize, AuthService, Caller, ServiceError, SignUpInput, SqliteTaskRepository, SqliteUserRepository, Task,
    TaskDraft, TaskId, TaskService, TaskUpdate, User,
};

pub type TaskMasterSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> TaskMasterSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Public projection of a user. The password hash has no field here.
#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: ID::from(user.id.to_string()),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
#[graphql(name = "Task")]
pub struct TaskObject {
    pub id: ID,
    pub title: String,
    pub description: String,
    /// One of `pending`, `in-progress`, `completed`.
    pub status: String,
    pub user_id: ID,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Task> for TaskObject {
    fn from(task: Task) -> Self {
        Self {
            id: ID::from(task.id.to_string()),
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_string(),
            user_id: ID::from(task.owner_id.to_string()),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

fn gql_error(err: ServiceError) -> Error {
    if matches!(
        err,
        ServiceError::StoreUnavailable(_) | ServiceError::Internal(_)
    ) {
        error!(
            "event=graphql_resolve module=server status=error error_code={} error={:?}",
            err.code(),
            err
        );
    }
    let code = err.code();
    Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}

fn parse_task_id(id: &ID) -> Result<TaskId> {
    id.parse::<TaskId>()
        .map_err(|_| gql_error(ServiceError::NotFound))
}

/// Rejects anonymous callers before a blocking worker is taken.
fn authenticated_caller(session: &RequestSession) -> Result<Caller> {
    let caller = session.caller();
    authorize(caller).map_err(gql_error)?;
    Ok(caller)
}

fn request_parts<'a>(ctx: &Context<'a>) -> Result<(&'a AppState, &'a Arc<RequestSession>)> {
    Ok((ctx.data::<AppState>()?, ctx.data::<Arc<RequestSession>>()?))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The signed-in user, or null.
    async fn me(&self, ctx: &Context<'_>) -> Result<Option<UserObject>> {
        let (state, session) = request_parts(ctx)?;
        let caller = session.caller();
        let user = state
            .with_store("me", move |conn, hasher| {
                AuthService::new(SqliteUserRepository::new(conn), hasher).me(caller)
            })
            .await
            .map_err(gql_error)?;
        Ok(user.map(UserObject::from))
    }

    /// All tasks owned by the caller.
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<TaskObject>> {
        let (state, session) = request_parts(ctx)?;
        let caller = authenticated_caller(session)?;
        let tasks = state
            .with_store("list_tasks", move |conn, _| {
                TaskService::new(SqliteTaskRepository::new(conn)).list_tasks(caller)
            })
            .await
            .map_err(gql_error)?;
        Ok(tasks.into_iter().map(TaskObject::from).collect())
    }

    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskObject>> {
        let (state, session) = request_parts(ctx)?;
        let caller = authenticated_caller(session)?;
        let id = parse_task_id(&id)?;
        let task = state
            .with_store("get_task", move |conn, _| {
                TaskService::new(SqliteTaskRepository::new(conn)).get_task(caller, id)
            })
            .await
            .map_err(gql_error)?;
        Ok(Some(task.into()))
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Registers a user and signs the session in.
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        name: String,
        email: String,
        password: String,
    ) -> Result<UserObject> {
        let (state, session) = request_parts(ctx)?;
        let mut data = session.current();
        let input = SignUpInput {
            name,
            email,
            password,
        };
        let (user, data) = state
            .with_store("sign_up", move |conn, hasher| {
                let user = AuthService::new(SqliteUserRepository::new(conn), hasher)
                    .sign_up(&mut data, &input)?;
                Ok((user, data))
            })
            .await
            .map_err(gql_error)?;
        session.replace(data);
        Ok(user.into())
    }

    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<UserObject> {
        let (state, session) = request_parts(ctx)?;
        let mut data = session.current();
        let (user, data) = state
            .with_store("login", move |conn, hasher| {
                let user = AuthService::new(SqliteUserRepository::new(conn), hasher)
                    .login(&mut data, &email, &password)?;
                Ok((user, data))
            })
            .await
            .map_err(gql_error)?;
        session.replace(data);
        Ok(user.into())
    }

    /// Destroys the session. Always true.
    async fn logout(&self, ctx: &Context<'_>) -> Result<bool> {
        let (_, session) = request_parts(ctx)?;
        Ok(session.sign_out())
    }

    async fn create_task(
        &self,
        ctx: &Context<'_>,
        title: String,
        description: Option<String>,
        status: Option<String>,
    ) -> Result<TaskObject> {
        let (state, session) = request_parts(ctx)?;
        let caller = authenticated_caller(session)?;
        let draft = TaskDraft {
            title,
            description,
            status,
        };
        let task = state
            .with_store("create_task", move |conn, _| {
                TaskService::new(SqliteTaskRepository::new(conn)).create_task(caller, &draft)
            })
            .await
            .map_err(gql_error)?;
        Ok(task.into())
    }

    /// Sparse update: omitted arguments keep their stored value.
    async fn update_task(
        &self,
        ctx: &Context<'_>,
        id: ID,
        title: Option<String>,
        description: Option<String>,
        status: Option<String>,
    ) -> Result<TaskObject> {
        let (state, session) = request_parts(ctx)?;
        let caller = authenticated_caller(session)?;
        let id = parse_task_id(&id)?;
        let update = TaskUpdate {
            title,
            description,
            status,
        };
        let task = state
            .with_store("update_task", move |conn, _| {
                TaskService::new(SqliteTaskRepository::new(conn)).update_task(caller, id, &update)
            })
            .await
            .map_err(gql_error)?;
        Ok(task.into())
    }

    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        let (state, session) = request_parts(ctx)?;
        let caller = authenticated_caller(session)?;
        let id = parse_task_id(&id)?;
        state
            .with_store("delete_task", move |conn, _| {
                TaskService::new(SqliteTaskRepository::new(conn)).delete_task(caller, id)
            })
            .await
            .map_err(gql_error)
    }
}
