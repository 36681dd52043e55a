// Base template trait shared by full pages
pub mod base_template;
pub use base_template::BaseTemplate;

// Pages
pub mod confirmation_template;
pub mod login_template;
pub mod tasks_page_template;

// Fragments
pub mod overdue_notice_template;
pub mod task_rows_template;

pub use confirmation_template::ConfirmationTemplate;
pub use login_template::LoginTemplate;
pub use overdue_notice_template::OverdueNoticeTemplate;
pub use task_rows_template::TaskRowsTemplate;
pub use tasks_page_template::{SelectOption, TaskFormView, TasksPageTemplate};
