use serde::{Deserialize, Serialize};

/// A registered user that tasks can be assigned to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: i64,
    pub name: String,
}

/// Client-side cache of `GET /api/users`. Each load replaces it wholesale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(entries: Vec<RosterEntry>) -> Self {
        Self { entries }
    }

    pub fn replace(&mut self, entries: Vec<RosterEntry>) {
        self.entries = entries;
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn name_of(&self, id: i64) -> Option<&str> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.name.as_str())
    }

    /// Resolve the raw value of the assignee select (the id as text).
    pub fn lookup_value(&self, value: &str) -> Option<&RosterEntry> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.id.to_string() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster::new(vec![
            RosterEntry { id: 1, name: "alice".into() },
            RosterEntry { id: 2, name: "bob".into() },
        ])
    }

    #[test]
    fn test_lookup_value() {
        let r = roster();
        assert_eq!(r.lookup_value("2").map(|e| e.name.as_str()), Some("bob"));
        assert!(r.lookup_value("").is_none());
        assert!(r.lookup_value("9").is_none());
    }

    #[test]
    fn test_replace_does_not_merge() {
        let mut r = roster();
        r.replace(vec![RosterEntry { id: 3, name: "carol".into() }]);
        assert_eq!(r.entries().len(), 1);
        assert!(r.name_of(1).is_none());
        assert_eq!(r.name_of(3), Some("carol"));
    }
}
