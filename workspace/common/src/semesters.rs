use serde::{Deserialize, Serialize};

/// Hiring semesters as posted by clients.
///
/// The job form sends a list (`["Fall", "Spring"]`), older clients send a
/// string that is already joined. Both are stored in a single text column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HiringSemesters {
    List(Vec<String>),
    Joined(String),
}

impl HiringSemesters {
    /// Column representation: list entries joined with `,`, joined strings kept verbatim.
    pub fn to_column(&self) -> String {
        match self {
            HiringSemesters::List(semesters) => semesters
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(","),
            HiringSemesters::Joined(joined) => joined.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_column().trim().is_empty()
    }
}
