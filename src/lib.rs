pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;

pub use api::{ApiClient, ApiError};
pub use config::Settings;
pub use models::{AppState, Role, RoleView, Task, TaskStatus};
pub use services::session::{Session, SessionHandle, SessionStore};
