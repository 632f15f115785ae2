pub mod gitlab;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use types::*;

#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Verify the access token and return the account it belongs to.
    async fn authenticate(&self) -> Result<CurrentUser>;

    /// Fetch a group by its numeric id.
    async fn get_group(&self, group_id: u64) -> Result<Group>;

    /// List every issue of a group, in any state, following pagination
    /// until the last page.
    async fn list_group_issues(&self, group_id: u64) -> Result<Vec<Issue>>;
}
