pub mod actions;
pub mod login;
pub mod overdue;
pub mod refresh;
pub mod reload;
pub mod session;
pub mod task_form;
pub mod task_list;

// Re-export commonly used functions
pub use actions::{cancel_form, change_status, delete_task, open_add_form, open_edit_form, save_form, ActionError};
pub use login::{LoginError, LoginForm, LoginValidation};
pub use overdue::{check_overdue, OverdueNotice};
pub use refresh::{refresh_active, spawn_refresh_driver, RefreshReport};
pub use reload::{ReloadSlot, Resource};
pub use session::{reload_overdue, reload_roster, reload_tasks, start_session, ReloadOutcome, SessionHandle, SessionStore};
pub use task_form::{FormMode, TaskForm, TaskFormError, TaskFormInput};
pub use task_list::{truncate_description, TaskListView, TaskRow};
