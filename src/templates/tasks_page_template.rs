use askama::Template;

use crate::models::{CurrentUser, Roster, TaskStatus};
use crate::services::{OverdueNotice, TaskForm, TaskRow};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Task form fields flattened for the template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskFormView {
    pub visible: bool,
    pub heading: &'static str,
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub assigned_name: String,
    pub assignee_options: Vec<SelectOption>,
    pub status_options: Vec<SelectOption>,
    pub error: String,
    pub has_error: bool,
}

impl TaskFormView {
    pub fn new(form: &TaskForm, roster: &Roster) -> Self {
        let assignee_options = roster
            .entries()
            .iter()
            .map(|e| {
                let value = e.id.to_string();
                SelectOption {
                    selected: value == form.assigned_user_id,
                    value,
                    label: e.name.clone(),
                }
            })
            .collect();
        let status_options = TaskStatus::ALL
            .iter()
            .map(|s| SelectOption {
                value: s.as_str().to_string(),
                label: s.as_str().to_string(),
                selected: *s == form.status,
            })
            .collect();
        let error = form.error().unwrap_or_default().to_string();
        Self {
            visible: form.is_visible(),
            heading: form.heading(),
            title: form.title.clone(),
            description: form.description.clone(),
            deadline: form.deadline.clone(),
            assigned_name: form.assigned_name.clone(),
            assignee_options,
            status_options,
            has_error: !error.is_empty(),
            error,
        }
    }
}

/// The main view: role panel, optional task form, task table.
#[derive(Template)]
#[template(path = "tasks.html")]
pub struct TasksPageTemplate<'a> {
    pub current_user: Option<CurrentUser>,
    pub api_host: String,
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,

    pub is_pm: bool,
    pub rows: &'a [TaskRow],
    pub notice: &'a OverdueNotice,
    pub form: TaskFormView,
    pub refresh_ms: u64,
}

crate::impl_base_template!(TasksPageTemplate<'_>);
