use super::{encode_path_segment, repo_path, Query};
use crate::error::Result;
use crate::http::GitHubClient;
use crate::types::Decoded;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListCommitsInput {
    pub owner: String,
    pub repo: String,
    /// Branch name or commit SHA to start listing from.
    pub sha: Option<String>,
    pub path: Option<String>,
    pub author: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn list_commits_path(input: &ListCommitsInput) -> String {
    Query::new()
        .opt("sha", input.sha.as_deref())
        .opt("path", input.path.as_deref())
        .opt("author", input.author.as_deref())
        .opt("since", input.since.as_deref())
        .opt("until", input.until.as_deref())
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!("{}/commits", repo_path(&input.owner, &input.repo)))
}

pub async fn list_commits(client: &GitHubClient, input: ListCommitsInput) -> Result<Decoded> {
    client.get(&list_commits_path(&input)).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetCommitInput {
    pub owner: String,
    pub repo: String,
    /// SHA, branch or tag name.
    #[serde(rename = "ref")]
    pub git_ref: String,
}

pub async fn get_commit(client: &GitHubClient, input: GetCommitInput) -> Result<Decoded> {
    let path = format!(
        "{}/commits/{}",
        repo_path(&input.owner, &input.repo),
        encode_path_segment(&input.git_ref)
    );
    client.get(&path).await
}
