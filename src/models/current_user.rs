use serde::{Deserialize, Serialize};

use super::role::Role;

/// Who is logged in, as shown in page headers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn role_label(&self) -> &'static str {
        self.role.label()
    }
}
