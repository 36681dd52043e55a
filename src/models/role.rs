use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a person logs in with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Project manager: full task CRUD and the overdue notice.
    #[default]
    Pm,
    /// Regular user: sees and updates the status of their own tasks.
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pm => "pm",
            Role::User => "user",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Pm => "Project Manager",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pm" => Ok(Role::Pm),
            "user" => Ok(Role::User),
            other => Err(format!("unknown role '{}' (expected pm or user)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert_eq!("pm".parse::<Role>().unwrap(), Role::Pm);
        assert_eq!(" User ".parse::<Role>().unwrap(), Role::User);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Pm).unwrap(), "\"pm\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
