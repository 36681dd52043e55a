use askama::Template;

use crate::services::TaskRow;

/// Body rows of the task table; also served alone for periodic polling.
#[derive(Template)]
#[template(path = "task_rows.html")]
pub struct TaskRowsTemplate<'a> {
    pub rows: &'a [TaskRow],
    pub is_pm: bool,
}
