pub mod app_state;
pub mod current_user;
pub mod overdue;
pub mod permission;
pub mod role;
pub mod role_view;
pub mod roster;
pub mod session_user;
pub mod task;

pub use app_state::AppState;
pub use current_user::CurrentUser;
pub use overdue::OverdueTask;
pub use permission::TaskAction;
pub use role::Role;
pub use role_view::RoleView;
pub use roster::{Roster, RosterEntry};
pub use session_user::{ApiUser, LoginRequest, LoginResponse, SessionUser};
pub use task::{StatusUpdate, Task, TaskPayload, TaskStatus};

