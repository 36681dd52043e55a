use askama::Template;
use comfy_table::{modifiers, presets, ContentArrangement, Table};

use crate::models::{RoleView, Task, TaskAction, TaskStatus};
use crate::templates::TaskRowsTemplate;

/// Descriptions longer than this are cut in the table cell.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 120;
pub const ELLIPSIS: &str = "...";

/// Cut `text` to `max` characters, appending [`ELLIPSIS`] when shortened.
pub fn truncate_description(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusOption {
    pub value: &'static str,
    pub selected: bool,
}

/// One rendered row of the task table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    /// Full description, kept for the hover title.
    pub description: String,
    pub description_preview: String,
    pub assignee: String,
    pub deadline: String,
    pub status: TaskStatus,
    /// Edit and Delete controls.
    pub can_manage: bool,
    /// Status selector.
    pub can_change_status: bool,
    pub status_options: Vec<StatusOption>,
}

impl TaskRow {
    fn build(view: &RoleView, task: &Task) -> Self {
        let description = task.description.clone().unwrap_or_default();
        let description_preview = truncate_description(&description, DESCRIPTION_PREVIEW_CHARS);
        let can_change_status = view.permits(TaskAction::ChangeStatus);
        let status_options = if can_change_status {
            TaskStatus::ALL
                .iter()
                .map(|s| StatusOption {
                    value: s.as_str(),
                    selected: *s == task.status,
                })
                .collect()
        } else {
            Vec::new()
        };
        Self {
            id: task.id,
            title: task.title.clone(),
            description,
            description_preview,
            assignee: task.assigned_user_name.clone().unwrap_or_default(),
            deadline: task.deadline.clone().unwrap_or_default(),
            status: task.status,
            can_manage: view.permits(TaskAction::EditTask) && view.permits(TaskAction::DeleteTask),
            can_change_status,
            status_options,
        }
    }
}

/// The task table as seen by one role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
    pub is_pm: bool,
}

impl TaskListView {
    /// Keep the tasks `view` may see, in API order, and attach its actions.
    pub fn build(view: &RoleView, tasks: &[Task]) -> Self {
        Self {
            rows: view.visible(tasks).map(|t| TaskRow::build(view, t)).collect(),
            is_pm: view.is_project_manager(),
        }
    }

    /// The `<tr>` rows of the table body, every value HTML-escaped.
    pub fn render_html(&self) -> Result<String, askama::Error> {
        TaskRowsTemplate {
            rows: &self.rows,
            is_pm: self.is_pm,
        }
        .render()
    }

    pub fn to_table(&self, width: Option<u16>) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(w) = width {
            table.set_width(w);
        }
        table.set_header(vec!["ID", "Title", "Description", "Assigned", "Deadline", "Status"]);
        for row in &self.rows {
            table.add_row(vec![
                row.id.to_string(),
                row.title.clone(),
                row.description_preview.clone(),
                row.assignee.clone(),
                row.deadline.clone(),
                row.status.to_string(),
            ]);
        }
        table
    }
}
