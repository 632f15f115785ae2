use chrono::DateTime;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::platform::types;

// Wire shapes of the GitLab v4 API; only the fields we read.

#[derive(Debug, Deserialize)]
pub struct ApiUser {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiGroup {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
    pub iid: u64,
    pub title: String,
    pub state: String,
    pub created_at: String,
    pub web_url: String,
    #[serde(default)]
    pub labels: Vec<String>,
    pub description: Option<String>,
}

pub fn map_user(user: ApiUser) -> types::CurrentUser {
    types::CurrentUser {
        username: user.username,
    }
}

pub fn map_group(group: ApiGroup) -> types::Group {
    types::Group {
        id: group.id,
        name: group.name,
        full_path: group.full_path,
    }
}

/// Map a GitLab issue payload to our platform Issue type.
///
/// The creation time is kept verbatim for the report but must be a valid
/// RFC 3339 timestamp.
pub fn map_issue(issue: ApiIssue) -> Result<types::Issue> {
    DateTime::parse_from_rfc3339(&issue.created_at).map_err(|e| {
        AppError::GitLabApi(format!(
            "Issue #{} has an invalid created_at '{}': {e}",
            issue.iid, issue.created_at
        ))
    })?;

    Ok(types::Issue {
        iid: issue.iid,
        title: issue.title,
        state: types::IssueState::from(issue.state.as_str()),
        created_at: issue.created_at,
        web_url: issue.web_url,
        labels: issue.labels,
        description: issue.description,
    })
}
