use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use serde::Deserialize;

use crate::models::{AppState, TaskAction, TaskStatus};
use crate::services::{self, ActionError, SessionHandle, TaskFormInput};
use crate::templates::{ConfirmationTemplate, TaskFormView, TasksPageTemplate};

use super::helpers::{action_response, build_template_globals, render_template, TemplateGlobals};

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: TaskStatus,
}

pub async fn tasks_get(State(state): State<AppState>, Extension(handle): Extension<SessionHandle>) -> Response {
    let TemplateGlobals {
        current_user,
        api_host,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, Some(&handle));
    let session = handle.snapshot();
    let list = session.task_list();
    render_template(TasksPageTemplate {
        current_user,
        api_host,
        flash_messages,
        has_flash_messages,
        is_pm: list.is_pm,
        rows: &list.rows,
        notice: &session.overdue,
        form: TaskFormView::new(&session.form, session.roster()),
        refresh_ms: u64::try_from(state.settings.refresh_interval.as_millis()).unwrap_or(u64::MAX),
    })
}

/// Table body only, polled by the main view.
pub async fn tasks_table(Extension(handle): Extension<SessionHandle>) -> Response {
    match handle.with(|s| s.task_list()).render_html() {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::error!(%e, "Task rows render error");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub async fn task_new(Extension(handle): Extension<SessionHandle>) -> Response {
    let result = services::open_add_form(&handle);
    action_response(&handle, result)
}

pub async fn task_edit(Extension(handle): Extension<SessionHandle>, Path(task_id): Path<i64>) -> Response {
    let result = services::open_edit_form(&handle, task_id);
    action_response(&handle, result)
}

pub async fn task_save(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Form(input): Form<TaskFormInput>,
) -> Response {
    let result = services::save_form(&state.api, &handle, Some(input)).await.map(|_| ());
    action_response(&handle, result)
}

pub async fn task_cancel(Extension(handle): Extension<SessionHandle>) -> Redirect {
    services::cancel_form(&handle);
    Redirect::to("/tasks")
}

pub async fn task_delete_confirm(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Path(task_id): Path<i64>,
) -> Response {
    if !handle.view().permits(TaskAction::DeleteTask) {
        return action_response(&handle, Err(ActionError::Forbidden(TaskAction::DeleteTask)));
    }
    let Some(title) = handle.with(|s| s.task(task_id).map(|t| t.title.clone())) else {
        return action_response(&handle, Err(ActionError::UnknownTask(task_id)));
    };
    let TemplateGlobals {
        current_user,
        api_host,
        flash_messages,
        has_flash_messages,
    } = build_template_globals(&state, Some(&handle));
    render_template(ConfirmationTemplate {
        current_user,
        api_host,
        flash_messages,
        has_flash_messages,
        title: "Delete Task".into(),
        message: format!("Delete task \"{}\"? This cannot be undone.", title),
        target_url: format!("/tasks/{}/delete", task_id),
        confirm_label: "Delete".into(),
        cancel_url: "/tasks".into(),
        button_class: "danger".into(),
    })
}

pub async fn task_delete(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Path(task_id): Path<i64>,
) -> Response {
    let result = services::delete_task(&state.api, &handle, task_id).await;
    action_response(&handle, result)
}

pub async fn task_status(
    State(state): State<AppState>,
    Extension(handle): Extension<SessionHandle>,
    Path(task_id): Path<i64>,
    Form(input): Form<StatusInput>,
) -> Response {
    let result = services::change_status(&state.api, &handle, task_id, input.status).await;
    action_response(&handle, result)
}
