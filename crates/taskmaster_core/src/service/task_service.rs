//! Task use-case service.
//!
//! # Responsibility
//! - Owner-scoped create/read/update/delete over the task repository.
//!
//! # Invariants
//! - Every entry point passes the gate before touching the repository.
//! - get/update/delete resolve the target through `fetch_owned`, so a task
//!   owned by someone else behaves exactly like a missing one.
//! - Updates are sparse: omitted fields keep their stored value.

use crate::auth::session::Caller;
use crate::model::task::{Task, TaskDraft, TaskId, TaskUpdate};
use crate::repo::task_repo::TaskRepository;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::gate::{authorize, Owner};
use log::debug;

/// Use-case service for a caller's own tasks.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the caller's tasks.
    pub fn list_tasks(&self, caller: Caller) -> ServiceResult<Vec<Task>> {
        let owner = authorize(caller)?;
        Ok(self.repo.list_tasks(owner.user_id())?)
    }

    pub fn get_task(&self, caller: Caller, id: TaskId) -> ServiceResult<Task> {
        let owner = authorize(caller)?;
        self.fetch_owned(id, owner)
    }

    /// Creates a task owned by the caller.
    ///
    /// # Contract
    /// - Blank title fails with `Validation`, and nothing is written.
    /// - Omitted status defaults to `pending`.
    pub fn create_task(&self, caller: Caller, draft: &TaskDraft) -> ServiceResult<Task> {
        let owner = authorize(caller)?;
        let new_task = draft.validate()?;
        let task = self.repo.create_task(owner.user_id(), &new_task)?;
        debug!(
            "event=task_create module=task status=ok user_id={} task_id={}",
            owner.user_id(),
            task.id
        );
        Ok(task)
    }

    /// Applies a sparse patch to one of the caller's tasks.
    pub fn update_task(
        &self,
        caller: Caller,
        id: TaskId,
        update: &TaskUpdate,
    ) -> ServiceResult<Task> {
        let owner = authorize(caller)?;
        let patch = update.validate()?;
        let mut task = self.fetch_owned(id, owner)?;
        if patch.is_empty() {
            return Ok(task);
        }

        patch.apply(&mut task);
        self.repo.update_task(&task)?;
        debug!(
            "event=task_update module=task status=ok user_id={} task_id={}",
            owner.user_id(),
            id
        );
        self.fetch_owned(id, owner)
    }

    /// Deletes one of the caller's tasks.
    pub fn delete_task(&self, caller: Caller, id: TaskId) -> ServiceResult<bool> {
        let owner = authorize(caller)?;
        self.fetch_owned(id, owner)?;
        self.repo.delete_task(id, owner.user_id())?;
        debug!(
            "event=task_delete module=task status=ok user_id={} task_id={}",
            owner.user_id(),
            id
        );
        Ok(true)
    }

    fn fetch_owned(&self, id: TaskId, owner: Owner) -> ServiceResult<Task> {
        self.repo
            .get_task(id, owner.user_id())?
            .ok_or(ServiceError::NotFound)
    }
}
