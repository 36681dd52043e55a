use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{Roster, Task, TaskPayload, TaskStatus};

pub const ADD_HEADING: &str = "Add Task";
pub const EDIT_HEADING: &str = "Edit Task";

/// Inline validation failures, checked in declaration order.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TaskFormError {
    #[error("Title is required.")]
    TitleRequired,
    #[error("Description is required.")]
    DescriptionRequired,
    #[error("Assigned user is required.")]
    AssigneeRequired,
    #[error("Deadline (date) is required.")]
    DeadlineRequired,
    #[error("Deadline must be a valid date (YYYY-MM-DD).")]
    DeadlineInvalid,
}

/// Whether the open form creates a task or updates one. `Edit` carries the
/// editing marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Add,
    Edit(i64),
}

/// Raw field values as submitted by the form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFormInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub assigned_user_id: String,
    #[serde(default)]
    pub status: TaskStatus,
}

/// A validated save waiting to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSave {
    pub target: FormMode,
    pub payload: TaskPayload,
}

impl PendingSave {
    /// `PUT /api/tasks/{id}` when editing, `POST /api/tasks` otherwise.
    /// The response body is not inspected.
    pub async fn send(&self, api: &ApiClient) -> Result<(), ApiError> {
        match self.target {
            FormMode::Edit(id) => api::update_task(api, id, &self.payload).await,
            FormMode::Add => api::create_task(api, &self.payload).await,
        }
    }
}

/// The create/edit task form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskForm {
    mode: FormMode,
    visible: bool,
    pub title: String,
    pub description: String,
    pub deadline: String,
    /// Value of the assignee select: the user id as text, empty for none.
    pub assigned_user_id: String,
    /// Read-only mirror of the selected user's name.
    pub assigned_name: String,
    pub status: TaskStatus,
    error: Option<String>,
}

impl TaskForm {
    /// Show a blank form that will create a task.
    pub fn open_add(&mut self) {
        *self = TaskForm {
            visible: true,
            ..TaskForm::default()
        };
    }

    /// Show the form pre-filled from `task`; saving will update it.
    pub fn open_edit(&mut self, task: &Task) {
        *self = TaskForm {
            mode: FormMode::Edit(task.id),
            visible: true,
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            deadline: task.deadline.clone().unwrap_or_default(),
            assigned_user_id: task.assigned_user_id.map(|id| id.to_string()).unwrap_or_default(),
            assigned_name: task.assigned_user_name.clone().unwrap_or_default(),
            status: task.status,
            error: None,
        };
    }

    /// Hide the form and forget the editing marker and every field value.
    pub fn cancel(&mut self) {
        *self = TaskForm::default();
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn editing_id(&self) -> Option<i64> {
        match self.mode {
            FormMode::Edit(id) => Some(id),
            FormMode::Add => None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Add => ADD_HEADING,
            FormMode::Edit(_) => EDIT_HEADING,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Change the assignee select and refresh the mirrored name.
    pub fn select_assignee(&mut self, value: &str, roster: &Roster) {
        self.assigned_user_id = value.trim().to_string();
        self.assigned_name = roster
            .lookup_value(&self.assigned_user_id)
            .map(|e| e.name.clone())
            .unwrap_or_default();
    }

    /// Copy submitted values into the form, keeping its mode.
    pub fn apply_input(&mut self, input: TaskFormInput, roster: &Roster) {
        self.visible = true;
        self.title = input.title;
        self.description = input.description;
        self.deadline = input.deadline;
        self.status = input.status;
        self.select_assignee(&input.assigned_user_id, roster);
    }

    pub fn validate(&self) -> Result<TaskPayload, TaskFormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskFormError::TitleRequired);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(TaskFormError::DescriptionRequired);
        }
        let assigned_user_id = self
            .assigned_user_id
            .trim()
            .parse::<i64>()
            .map_err(|_| TaskFormError::AssigneeRequired)?;
        let deadline = self.deadline.trim();
        if deadline.is_empty() {
            return Err(TaskFormError::DeadlineRequired);
        }
        if NaiveDate::parse_from_str(deadline, "%Y-%m-%d").is_err() {
            return Err(TaskFormError::DeadlineInvalid);
        }
        Ok(TaskPayload {
            title: title.to_string(),
            description: description.to_string(),
            deadline: deadline.to_string(),
            assigned_user_id,
            status: self.status,
        })
    }

    /// Clear the error box and validate. A failure is kept as the inline
    /// error and no request may be sent.
    pub fn prepare_save(&mut self) -> Result<PendingSave, TaskFormError> {
        self.error = None;
        match self.validate() {
            Ok(payload) => Ok(PendingSave {
                target: self.mode,
                payload,
            }),
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// The save went through: hide the form and reset it to defaults.
    pub fn finish_save(&mut self) {
        *self = TaskForm::default();
    }
}
