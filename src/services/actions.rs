use thiserror::Error;

use super::session::{reload_tasks, ReloadOutcome, SessionHandle};
use super::task_form::{FormMode, TaskFormError, TaskFormInput};
use crate::api::{self, ApiClient, ApiError};
use crate::models::{TaskAction, TaskStatus};

/// Why a user action on the task list did not go through.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Your role may not {}.", .0.label())]
    Forbidden(TaskAction),
    #[error("Task {0} is not in your task list.")]
    UnknownTask(i64),
    #[error(transparent)]
    Invalid(#[from] TaskFormError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ActionError {
    pub fn notice(&self) -> String {
        match self {
            ActionError::Api(e) => e.notice(),
            other => other.to_string(),
        }
    }
}

fn ensure(handle: &SessionHandle, action: TaskAction) -> Result<(), ActionError> {
    if handle.view().permits(action) {
        Ok(())
    } else {
        Err(ActionError::Forbidden(action))
    }
}

/// Reload after a successful mutation. A failed reload does not undo the
/// mutation, so it is reported as a notice instead of an error.
async fn reload_after_change(api: &ApiClient, handle: &SessionHandle) {
    match reload_tasks(api, handle).await {
        Ok(ReloadOutcome::Superseded) => tracing::debug!("Reload after change superseded by a newer one"),
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Reload after change failed");
            handle.notify(e.notice());
        }
    }
}

pub fn open_add_form(handle: &SessionHandle) -> Result<(), ActionError> {
    ensure(handle, TaskAction::CreateTask)?;
    handle.with(|s| s.form.open_add());
    Ok(())
}

/// Open the form pre-filled from the session's copy of task `task_id`.
pub fn open_edit_form(handle: &SessionHandle, task_id: i64) -> Result<(), ActionError> {
    ensure(handle, TaskAction::EditTask)?;
    handle.with(|s| {
        let task = s.task(task_id).cloned().ok_or(ActionError::UnknownTask(task_id))?;
        s.form.open_edit(&task);
        Ok(())
    })
}

pub fn cancel_form(handle: &SessionHandle) {
    handle.with(|s| s.form.cancel());
}

/// Validate and send the task form, then reload the list.
///
/// `input` carries freshly submitted field values; `None` saves the form
/// as it stands. On a validation failure the inline error is set and no
/// request is sent. On a transport failure the form keeps its values.
pub async fn save_form(
    api: &ApiClient,
    handle: &SessionHandle,
    input: Option<TaskFormInput>,
) -> Result<FormMode, ActionError> {
    let required = match handle.with(|s| s.form.mode()) {
        FormMode::Add => TaskAction::CreateTask,
        FormMode::Edit(_) => TaskAction::EditTask,
    };
    ensure(handle, required)?;

    let pending = handle.with(|s| {
        if let Some(input) = input {
            s.form.apply_input(input, &s.user.roster);
        }
        s.form.prepare_save()
    })?;

    pending.send(api).await?;
    tracing::info!(target_mode = ?pending.target, title = %pending.payload.title, "Task saved");

    handle.with(|s| s.form.finish_save());
    reload_after_change(api, handle).await;
    Ok(pending.target)
}

/// Delete a task. The caller is responsible for having asked for
/// confirmation first.
pub async fn delete_task(api: &ApiClient, handle: &SessionHandle, task_id: i64) -> Result<(), ActionError> {
    ensure(handle, TaskAction::DeleteTask)?;
    api::delete_task(api, task_id).await?;
    tracing::info!(task_id, "Task deleted");
    reload_after_change(api, handle).await;
    Ok(())
}

/// Send `{status}` for one of the session user's own tasks.
pub async fn change_status(
    api: &ApiClient,
    handle: &SessionHandle,
    task_id: i64,
    status: TaskStatus,
) -> Result<(), ActionError> {
    ensure(handle, TaskAction::ChangeStatus)?;
    let visible = handle.with(|s| s.task(task_id).map(|t| s.view.sees(t)).unwrap_or(false));
    if !visible {
        return Err(ActionError::UnknownTask(task_id));
    }
    api::update_task_status(api, task_id, status).await?;
    tracing::info!(task_id, %status, "Task status changed");
    reload_after_change(api, handle).await;
    Ok(())
}
