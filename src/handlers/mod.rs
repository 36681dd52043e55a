pub mod assets;
pub mod auth;
pub mod helpers;
pub mod middleware;
pub mod tasks;

pub use assets::styles_css;
pub use auth::{login_get, login_post, login_validate, root_get};
pub use middleware::auth_middleware;
pub use tasks::{
    task_cancel, task_delete, task_delete_confirm, task_edit, task_new, task_save, task_status, tasks_get,
    tasks_table,
};
