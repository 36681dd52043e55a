use serde::{Deserialize, Serialize};

use super::role::Role;
use super::roster::{Roster, RosterEntry};

/// Body of `POST /api/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub role: Role,
}

/// User object inside the login response.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ApiUser {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub role: Role,
}

/// Response of `POST /api/login`.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub user: Option<ApiUser>,
    #[serde(default)]
    pub users: Vec<RosterEntry>,
}

/// The person logged into a session, with the roster handed out at login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: Option<i64>,
    pub name: String,
    pub role: Role,
    pub roster: Roster,
}

impl SessionUser {
    pub fn from_login(user: ApiUser, users: Vec<RosterEntry>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
            roster: Roster::new(users),
        }
    }
}
