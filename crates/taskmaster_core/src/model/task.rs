//! Task domain model.
//!
//! # Responsibility
//! - Define the task record and its status lifecycle.
//! - Turn raw create/update input into validated values.
//!
//! # Invariants
//! - `title` is never blank.
//! - `status` is always one of `pending | in-progress | completed`.
//! - `owner_id` is fixed at creation.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned task identity.
pub type TaskId = i64;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created but not started.
    #[default]
    Pending,
    /// Work is in progress.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Stable string id used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    /// Parses an optional caller-supplied status.
    ///
    /// Absent or blank values mean "not supplied". Anything else must match
    /// one of the known ids exactly.
    pub fn parse_supplied(value: Option<&str>) -> Result<Option<Self>, TaskValidationError> {
        match value {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(TaskValidationError::UnknownStatus(other.to_string())),
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// May be empty; never null.
    pub description: String,
    pub status: TaskStatus,
    pub owner_id: UserId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, bumped on every update.
    pub updated_at: i64,
}

/// Raw create-task input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Validated create-task values, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Validates the draft, filling defaults for omitted fields.
    pub fn validate(&self) -> Result<NewTask, TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        let status = TaskStatus::parse_supplied(self.status.as_deref())?.unwrap_or_default();

        Ok(NewTask {
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            status,
        })
    }
}

/// Raw update-task input. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// Validated sparse patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// Validates only the supplied fields.
    pub fn validate(&self) -> Result<TaskPatch, TaskValidationError> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(TaskValidationError::EmptyTitle);
            }
        }

        Ok(TaskPatch {
            title: self.title.clone(),
            description: self.description.clone(),
            status: TaskStatus::parse_supplied(self.status.as_deref())?,
        })
    }
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Applies supplied fields onto `task`; omitted fields keep their value.
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
    }
}

/// Validation failures for task input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    UnknownStatus(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is required"),
            Self::UnknownStatus(value) => write!(
                f,
                "unknown task status `{value}`; expected pending|in-progress|completed"
            ),
        }
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::{Task, TaskDraft, TaskStatus, TaskUpdate, TaskValidationError};

    fn sample_task() -> Task {
        Task {
            id: 7,
            title: "T1".to_string(),
            description: "d".to_string(),
            status: TaskStatus::Pending,
            owner_id: 1,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn status_serializes_with_kebab_case_ids() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
    }

    #[test]
    fn status_parse_is_exact() {
        assert!("Pending".parse::<TaskStatus>().is_err());
        assert!("in_progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn padded_or_recased_status_is_rejected() {
        for raw in [" completed ", "completed\n", "Completed", "IN-PROGRESS"] {
            let draft = TaskDraft {
                title: "T1".to_string(),
                description: None,
                status: Some(raw.to_string()),
            };
            assert_eq!(
                draft.validate(),
                Err(TaskValidationError::UnknownStatus(raw.to_string())),
                "create status {raw:?}"
            );

            let update = TaskUpdate {
                status: Some(raw.to_string()),
                ..TaskUpdate::default()
            };
            assert_eq!(
                update.validate(),
                Err(TaskValidationError::UnknownStatus(raw.to_string())),
                "update status {raw:?}"
            );
        }
    }

    #[test]
    fn draft_defaults_status_and_description() {
        let draft = TaskDraft {
            title: "T1".to_string(),
            ..TaskDraft::default()
        };
        let new_task = draft.validate().unwrap();
        assert_eq!(new_task.status, TaskStatus::Pending);
        assert_eq!(new_task.description, "");
    }

    #[test]
    fn draft_treats_blank_status_as_absent() {
        let draft = TaskDraft {
            title: "T1".to_string(),
            description: None,
            status: Some("  ".to_string()),
        };
        assert_eq!(draft.validate().unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn draft_rejects_blank_title_and_unknown_status() {
        let blank = TaskDraft {
            title: " ".to_string(),
            ..TaskDraft::default()
        };
        assert_eq!(blank.validate(), Err(TaskValidationError::EmptyTitle));

        let bad_status = TaskDraft {
            title: "T1".to_string(),
            description: None,
            status: Some("archived".to_string()),
        };
        assert_eq!(
            bad_status.validate(),
            Err(TaskValidationError::UnknownStatus("archived".to_string()))
        );
    }

    #[test]
    fn patch_touches_only_supplied_fields() {
        let update = TaskUpdate {
            status: Some("completed".to_string()),
            ..TaskUpdate::default()
        };
        let patch = update.validate().unwrap();
        let mut task = sample_task();
        patch.apply(&mut task);

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.title, "T1");
        assert_eq!(task.description, "d");
    }

    #[test]
    fn patch_allows_clearing_description_but_not_title() {
        let clear = TaskUpdate {
            description: Some(String::new()),
            ..TaskUpdate::default()
        };
        let mut task = sample_task();
        clear.validate().unwrap().apply(&mut task);
        assert_eq!(task.description, "");

        let blank_title = TaskUpdate {
            title: Some(String::new()),
            ..TaskUpdate::default()
        };
        assert_eq!(
            blank_title.validate(),
            Err(TaskValidationError::EmptyTitle)
        );
    }

    #[test]
    fn empty_update_yields_empty_patch() {
        assert!(TaskUpdate::default().validate().unwrap().is_empty());
    }
}
