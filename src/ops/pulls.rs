use super::{repo_path, Query};
use crate::error::Result;
use crate::http::{GitHubClient, RequestDescriptor, GITHUB_DIFF};
use crate::types::Decoded;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPullRequestsInput {
    pub owner: String,
    pub repo: String,
    pub state: Option<String>,
    pub head: Option<String>,
    pub base: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn list_pull_requests_path(input: &ListPullRequestsInput) -> String {
    Query::new()
        .opt("state", input.state.as_deref())
        .opt("head", input.head.as_deref())
        .opt("base", input.base.as_deref())
        .opt("sort", input.sort.as_deref())
        .opt("direction", input.direction.as_deref())
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!("{}/pulls", repo_path(&input.owner, &input.repo)))
}

pub async fn list_pull_requests(
    client: &GitHubClient,
    input: ListPullRequestsInput,
) -> Result<Decoded> {
    client.get(&list_pull_requests_path(&input)).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PullRef {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
}

fn pull_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/pulls/{}", repo_path(owner, repo), number)
}

pub async fn get_pull_request(client: &GitHubClient, input: PullRef) -> Result<Decoded> {
    client
        .get(&pull_path(&input.owner, &input.repo, input.pull_number))
        .await
}

/// Unified diff as text, via the diff media type.
pub async fn get_pull_request_diff(client: &GitHubClient, input: PullRef) -> Result<Decoded> {
    let req = RequestDescriptor::get(pull_path(&input.owner, &input.repo, input.pull_number))
        .header(ACCEPT.as_str(), GITHUB_DIFF);
    client.execute(req).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListPullRequestFilesInput {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list_pull_request_files(
    client: &GitHubClient,
    input: ListPullRequestFilesInput,
) -> Result<Decoded> {
    let path = Query::new()
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!(
            "{}/files",
            pull_path(&input.owner, &input.repo, input.pull_number)
        ));
    client.get(&path).await
}

#[derive(Debug, Deserialize)]
pub struct CreatePullRequestInput {
    pub owner: String,
    pub repo: String,
    #[serde(flatten)]
    pub fields: CreatePullRequestFields,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePullRequestFields {
    pub title: String,
    pub head: String,
    pub base: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

pub async fn create_pull_request(
    client: &GitHubClient,
    input: CreatePullRequestInput,
) -> Result<Decoded> {
    let path = format!("{}/pulls", repo_path(&input.owner, &input.repo));
    client.post(&path, &input.fields).await
}

#[derive(Debug, Deserialize)]
pub struct UpdatePullRequestInput {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
    #[serde(flatten)]
    pub fields: UpdatePullRequestFields,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdatePullRequestFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainer_can_modify: Option<bool>,
}

pub async fn update_pull_request(
    client: &GitHubClient,
    input: UpdatePullRequestInput,
) -> Result<Decoded> {
    let path = pull_path(&input.owner, &input.repo, input.pull_number);
    client.patch(&path, &input.fields).await
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewComment {
    pub path: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_side: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReviewInput {
    pub owner: String,
    pub repo: String,
    pub pull_number: u64,
    #[serde(flatten)]
    pub fields: CreateReviewFields,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateReviewFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// `APPROVE`, `REQUEST_CHANGES` or `COMMENT`; omitted leaves the review pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<ReviewComment>>,
}

pub async fn create_pull_request_review(
    client: &GitHubClient,
    input: CreateReviewInput,
) -> Result<Decoded> {
    let path = format!(
        "{}/reviews",
        pull_path(&input.owner, &input.repo, input.pull_number)
    );
    client.post(&path, &input.fields).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_path_with_filters() {
        let input = ListPullRequestsInput {
            owner: "o".into(),
            repo: "r".into(),
            state: Some("open".into()),
            base: Some("main".into()),
            per_page: Some(50),
            ..Default::default()
        };
        assert_eq!(
            list_pull_requests_path(&input),
            "/repos/o/r/pulls?state=open&base=main&per_page=50"
        );
    }

    #[test]
    fn review_body_only_carries_present_fields() {
        let input: CreateReviewInput = serde_json::from_value(serde_json::json!({
            "owner": "o", "repo": "r", "pull_number": 4,
            "event": "COMMENT",
            "comments": [{"path": "src/lib.rs", "body": "nit", "line": 3}]
        }))
        .unwrap();
        assert_eq!(
            serde_json::to_value(&input.fields).unwrap(),
            serde_json::json!({
                "event": "COMMENT",
                "comments": [{"path": "src/lib.rs", "body": "nit", "line": 3}]
            })
        );
    }
}
