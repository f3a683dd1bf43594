use super::{encode_file_path, repo_path, Query};
use crate::error::{Error, Result};
use crate::http::GitHubClient;
use crate::types::Decoded;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListBranchesInput {
    pub owner: String,
    pub repo: String,
    pub protected: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn list_branches(client: &GitHubClient, input: ListBranchesInput) -> Result<Decoded> {
    let path = Query::new()
        .opt("protected", input.protected)
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!("{}/branches", repo_path(&input.owner, &input.repo)));
    client.get(&path).await
}

/// Head commit SHA of `branch`.
pub(crate) async fn branch_head_sha(
    client: &GitHubClient,
    owner: &str,
    repo: &str,
    branch: &str,
) -> Result<String> {
    let path = format!(
        "{}/git/ref/heads/{}",
        repo_path(owner, repo),
        encode_file_path(branch)
    );
    let reference = client.get(&path).await?;
    reference
        .str_at("/object/sha")
        .map(str::to_string)
        .ok_or_else(|| Error::UnexpectedResponse(format!("ref heads/{branch} has no object.sha")))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateBranchInput {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Defaults to the repository's default branch.
    pub from_branch: Option<String>,
}

pub async fn create_branch(client: &GitHubClient, input: CreateBranchInput) -> Result<Decoded> {
    let base = repo_path(&input.owner, &input.repo);
    let from = match input.from_branch {
        Some(b) => b,
        None => {
            let repo = client.get(&base).await?;
            repo.str_at("/default_branch")
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::UnexpectedResponse("repository has no default_branch".into())
                })?
        }
    };
    let sha = branch_head_sha(client, &input.owner, &input.repo, &from).await?;
    let body = serde_json::json!({
        "ref": format!("refs/heads/{}", input.branch),
        "sha": sha,
    });
    client.post(&format!("{base}/git/refs"), &body).await
}
