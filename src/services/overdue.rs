use askama::Template;

use crate::api::{self, ApiClient, ApiError};
use crate::models::{OverdueTask, RoleView, TaskAction};
use crate::templates::OverdueNoticeTemplate;

pub const NO_OVERDUE_MESSAGE: &str = "No overdue tasks";
pub const UNASSIGNED_PLACEHOLDER: &str = "N/A";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverdueItem {
    pub title: String,
    pub assignee: String,
    pub deadline: String,
}

impl From<OverdueTask> for OverdueItem {
    fn from(task: OverdueTask) -> Self {
        Self {
            title: task.title,
            assignee: task
                .assigned_user
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNASSIGNED_PLACEHOLDER.to_string()),
            deadline: task.deadline.unwrap_or_default(),
        }
    }
}

/// Summary of overdue tasks shown to project managers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverdueNotice {
    /// False for roles that never see the notice.
    pub visible: bool,
    pub items: Vec<OverdueItem>,
}

impl OverdueNotice {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<OverdueTask>) -> Self {
        Self {
            visible: true,
            items: tasks.into_iter().map(OverdueItem::from).collect(),
        }
    }

    pub fn render_html(&self) -> Result<String, askama::Error> {
        OverdueNoticeTemplate { notice: self }.render()
    }

    /// Plain-text lines for the terminal.
    pub fn lines(&self) -> Vec<String> {
        if !self.visible {
            return Vec::new();
        }
        if self.items.is_empty() {
            return vec![NO_OVERDUE_MESSAGE.to_string()];
        }
        self.items
            .iter()
            .map(|i| format!("{} (assigned: {}) deadline: {}", i.title, i.assignee, i.deadline))
            .collect()
    }
}

/// Fetch the overdue notice for `view`; other roles get a hidden notice
/// without a request.
pub async fn check_overdue(api: &ApiClient, view: &RoleView) -> Result<OverdueNotice, ApiError> {
    if !view.permits(TaskAction::ViewOverdue) {
        return Ok(OverdueNotice::hidden());
    }
    let tasks = api::load_overdue(api).await?;
    tracing::debug!(count = tasks.len(), "Loaded overdue tasks");
    Ok(OverdueNotice::from_tasks(tasks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_notice_message() {
        let html = OverdueNotice::from_tasks(vec![]).render_html().unwrap();
        assert!(html.contains(NO_OVERDUE_MESSAGE));
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_missing_assignee_uses_placeholder() {
        let notice = OverdueNotice::from_tasks(vec![OverdueTask {
            id: Some(1),
            title: "X".into(),
            assigned_user: None,
            deadline: Some("2024-02-02".into()),
        }]);
        let html = notice.render_html().unwrap();
        assert!(html.contains("<li>X (assigned: N/A) deadline: 2024-02-02</li>"));
        assert_eq!(notice.lines(), vec!["X (assigned: N/A) deadline: 2024-02-02".to_string()]);
    }

    #[test]
    fn test_notice_escapes_titles() {
        let notice = OverdueNotice::from_tasks(vec![OverdueTask {
            id: None,
            title: "<b>late</b>".into(),
            assigned_user: Some("O'Hara".into()),
            deadline: Some("2024-02-02".into()),
        }]);
        let html = notice.render_html().unwrap();
        assert!(html.contains("&lt;b&gt;late&lt;/b&gt;"));
        assert!(!html.contains("O'Hara"));
    }

    #[test]
    fn test_hidden_notice_renders_nothing() {
        let notice = OverdueNotice::hidden();
        assert!(notice.render_html().unwrap().trim().is_empty());
        assert!(notice.lines().is_empty());
    }

    #[tokio::test]
    async fn test_user_role_skips_request() {
        let api = ApiClient::new("http://127.0.0.1:9", std::time::Duration::from_millis(200)).unwrap();
        let notice = check_overdue(&api, &RoleView::User { name: "bob".into() }).await.unwrap();
        assert_eq!(notice, OverdueNotice::hidden());
    }
}
