use super::{repo_path, Query};
use crate::error::Result;
use crate::http::GitHubClient;
use crate::types::Decoded;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListIssuesInput {
    pub owner: String,
    pub repo: String,
    pub state: Option<String>,
    pub labels: Option<Vec<String>>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub since: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn list_issues_path(input: &ListIssuesInput) -> String {
    Query::new()
        .opt("state", input.state.as_deref())
        .list("labels", input.labels.as_deref())
        .opt("sort", input.sort.as_deref())
        .opt("direction", input.direction.as_deref())
        .opt("since", input.since.as_deref())
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!("{}/issues", repo_path(&input.owner, &input.repo)))
}

pub async fn list_issues(client: &GitHubClient, input: ListIssuesInput) -> Result<Decoded> {
    client.get(&list_issues_path(&input)).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
}

fn issue_path(owner: &str, repo: &str, number: u64) -> String {
    format!("{}/issues/{}", repo_path(owner, repo), number)
}

pub async fn get_issue(client: &GitHubClient, input: IssueRef) -> Result<Decoded> {
    client
        .get(&issue_path(&input.owner, &input.repo, input.issue_number))
        .await
}

#[derive(Debug, Deserialize)]
pub struct CreateIssueInput {
    pub owner: String,
    pub repo: String,
    #[serde(flatten)]
    pub fields: CreateIssueFields,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateIssueFields {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

pub async fn create_issue(client: &GitHubClient, input: CreateIssueInput) -> Result<Decoded> {
    let path = format!("{}/issues", repo_path(&input.owner, &input.repo));
    client.post(&path, &input.fields).await
}

#[derive(Debug, Deserialize)]
pub struct UpdateIssueInput {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    #[serde(flatten)]
    pub fields: UpdateIssueFields,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateIssueFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<u64>,
}

pub async fn update_issue(client: &GitHubClient, input: UpdateIssueInput) -> Result<Decoded> {
    let path = issue_path(&input.owner, &input.repo, input.issue_number);
    client.patch(&path, &input.fields).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddIssueCommentInput {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub body: String,
}

pub async fn add_issue_comment(
    client: &GitHubClient,
    input: AddIssueCommentInput,
) -> Result<Decoded> {
    let path = format!(
        "{}/comments",
        issue_path(&input.owner, &input.repo, input.issue_number)
    );
    client
        .post(&path, &serde_json::json!({ "body": input.body }))
        .await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListIssueCommentsInput {
    pub owner: String,
    pub repo: String,
    pub issue_number: u64,
    pub since: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list_issue_comments(
    client: &GitHubClient,
    input: ListIssueCommentsInput,
) -> Result<Decoded> {
    let path = Query::new()
        .opt("since", input.since.as_deref())
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!(
            "{}/comments",
            issue_path(&input.owner, &input.repo, input.issue_number)
        ));
    client.get(&path).await
}
