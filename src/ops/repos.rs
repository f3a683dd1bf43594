use super::{repo_path, Query};
use crate::error::Result;
use crate::http::GitHubClient;
use crate::types::Decoded;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchRepositoriesInput {
    pub q: String,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn search_repositories(
    client: &GitHubClient,
    input: SearchRepositoriesInput,
) -> Result<Decoded> {
    let q = Query::new()
        .req("q", &input.q)
        .opt("page", input.page)
        .opt("per_page", input.per_page);
    client.get(&q.apply("/search/repositories".into())).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoInput {
    pub owner: String,
    pub repo: String,
}

pub async fn get_repository(client: &GitHubClient, input: RepoInput) -> Result<Decoded> {
    client.get(&repo_path(&input.owner, &input.repo)).await
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CreateRepositoryInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_init: Option<bool>,
}

/// Create a repository owned by the authenticated user.
pub async fn create_repository(
    client: &GitHubClient,
    input: CreateRepositoryInput,
) -> Result<Decoded> {
    client.post("/user/repos", &input).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForkRepositoryInput {
    pub owner: String,
    pub repo: String,
    pub organization: Option<String>,
}

#[derive(Serialize)]
struct ForkBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<&'a str>,
}

pub async fn fork_repository(client: &GitHubClient, input: ForkRepositoryInput) -> Result<Decoded> {
    let path = format!("{}/forks", repo_path(&input.owner, &input.repo));
    let body = ForkBody {
        organization: input.organization.as_deref(),
    };
    client.post(&path, &body).await
}
