use std::fmt;

/// The account an access token belongs to.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

/// A group owning the issues of interest.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub full_path: String,
}

/// Lifecycle state of an issue as reported by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueState {
    Opened,
    Closed,
    Locked,
    Other(String),
}

impl IssueState {
    pub fn as_str(&self) -> &str {
        match self {
            IssueState::Opened => "opened",
            IssueState::Closed => "closed",
            IssueState::Locked => "locked",
            IssueState::Other(s) => s,
        }
    }
}

impl From<&str> for IssueState {
    fn from(s: &str) -> Self {
        match s {
            "opened" => IssueState::Opened,
            "closed" => IssueState::Closed,
            "locked" => IssueState::Locked,
            other => IssueState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Issue {
    /// Project-scoped id shown in the UI, not the global primary key.
    pub iid: u64,
    pub title: String,
    pub state: IssueState,
    /// Creation time exactly as the tracker sent it.
    pub created_at: String,
    pub web_url: String,
    pub labels: Vec<String>,
    pub description: Option<String>,
}

impl Issue {
    /// The description, if present and not blank.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}
