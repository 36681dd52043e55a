// Atomic API modules
pub mod auth;
pub mod client;
pub mod error;
pub mod overdue;
pub mod tasks;
pub mod users;

// Re-export commonly used functions
pub use auth::login;
pub use client::{set_silent, ApiClient};
pub use error::ApiError;
pub use overdue::load_overdue;
pub use tasks::{create_task, delete_task, load_tasks, update_task, update_task_status};
pub use users::load_users;
