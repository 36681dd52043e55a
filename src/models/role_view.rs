use super::permission::TaskAction;
use super::role::Role;
use super::session_user::SessionUser;
use super::task::Task;

const PM_ACTIONS: &[TaskAction] = &[
    TaskAction::CreateTask,
    TaskAction::EditTask,
    TaskAction::DeleteTask,
    TaskAction::ViewOverdue,
];

const USER_ACTIONS: &[TaskAction] = &[TaskAction::ChangeStatus];

/// Per-role behaviour of the main view, chosen once at login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleView {
    /// Sees every task, manages them through the task form.
    ProjectManager,
    /// Sees only tasks assigned to `name` and may change their status.
    User { name: String },
}

impl RoleView {
    pub fn for_user(user: &SessionUser) -> Self {
        match user.role {
            Role::Pm => RoleView::ProjectManager,
            Role::User => RoleView::User { name: user.name.clone() },
        }
    }

    pub fn is_project_manager(&self) -> bool {
        matches!(self, RoleView::ProjectManager)
    }

    pub fn actions(&self) -> &'static [TaskAction] {
        match self {
            RoleView::ProjectManager => PM_ACTIONS,
            RoleView::User { .. } => USER_ACTIONS,
        }
    }

    pub fn permits(&self, action: TaskAction) -> bool {
        self.actions().contains(&action)
    }

    /// Whether `task` belongs in this view's task list.
    /// Filtering happens here; the API always returns every task.
    pub fn sees(&self, task: &Task) -> bool {
        match self {
            RoleView::ProjectManager => true,
            RoleView::User { name } => task.assigned_user_name.as_deref() == Some(name.as_str()),
        }
    }

    pub fn visible<'a>(&'a self, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> + 'a {
        tasks.iter().filter(move |t| self.sees(t))
    }
}
