use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::GitLabConfig;
use crate::error::{AppError, Result};
use crate::platform::types::*;
use crate::platform::IssueTracker;

use super::mapper::{self, ApiGroup, ApiIssue, ApiUser};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// GitLab REST v4 client authenticated with a personal access token.
pub struct GitLabPlatform {
    client: Client,
    api_base: String,
    token: String,
    per_page: u32,
}

impl GitLabPlatform {
    pub fn new(config: &GitLabConfig, token: &str) -> Result<Self> {
        let url = config.url.trim_end_matches('/');
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(AppError::Config(format!(
                "GitLab URL must start with http:// or https://, got: {url}"
            )));
        }
        if token.is_empty() {
            return Err(AppError::Validation("Access token is empty".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            api_base: format!("{url}/api/v4"),
            token: token.to_string(),
            per_page: config.per_page,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{path}", self.api_base);
        tracing::debug!(url = %url, "GitLab request");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AppError::Authentication(format!("GET {path} returned {status}: {body}"))
                }
                _ => AppError::GitLabApi(format!("GET {path} returned {status}: {body}")),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get(path, &[]).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Parse the `x-next-page` header; empty or missing means this was the last page.
fn next_page(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(NEXT_PAGE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl IssueTracker for GitLabPlatform {
    async fn authenticate(&self) -> Result<CurrentUser> {
        let user: ApiUser = self.get_json("/user").await?;
        Ok(mapper::map_user(user))
    }

    async fn get_group(&self, group_id: u64) -> Result<Group> {
        let group: ApiGroup = self.get_json(&format!("/groups/{group_id}")).await?;
        Ok(mapper::map_group(group))
    }

    async fn list_group_issues(&self, group_id: u64) -> Result<Vec<Issue>> {
        let path = format!("/groups/{group_id}/issues");
        let mut issues = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response = self
                .get(
                    &path,
                    &[
                        ("per_page", self.per_page.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            let next = next_page(response.headers());
            let batch = response.json::<Vec<ApiIssue>>().await?;
            tracing::debug!(group_id, page, count = batch.len(), "Fetched issue page");
            for issue in batch {
                issues.push(mapper::map_issue(issue)?);
            }

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }

        Ok(issues)
    }
}
