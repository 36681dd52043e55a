use serde::{Deserialize, Serialize};

/// Entry of `GET /api/overdue`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueTask {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub assigned_user: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}
