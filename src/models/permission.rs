use serde::{Deserialize, Serialize};

/// Action a session may perform on tasks. Every web route and CLI command
/// maps to one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Open the task form in add mode and create a task.
    CreateTask,
    /// Open the task form in edit mode and update a task.
    EditTask,
    /// Delete a task after confirmation.
    DeleteTask,
    /// Change only the status of an assigned task.
    ChangeStatus,
    /// See the overdue notice.
    ViewOverdue,
}

impl TaskAction {
    pub fn label(&self) -> &'static str {
        match self {
            TaskAction::CreateTask => "create tasks",
            TaskAction::EditTask => "edit tasks",
            TaskAction::DeleteTask => "delete tasks",
            TaskAction::ChangeStatus => "change task status",
            TaskAction::ViewOverdue => "view overdue tasks",
        }
    }
}
