use super::Query;
use crate::error::Result;
use crate::http::GitHubClient;
use crate::types::Decoded;
use serde::Deserialize;

/// Shared input for the code, issue and user search endpoints.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchInput {
    pub q: String,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

fn search_path(kind: &str, input: &SearchInput) -> String {
    Query::new()
        .req("q", &input.q)
        .opt("sort", input.sort.as_deref())
        .opt("order", input.order.as_deref())
        .opt("page", input.page)
        .opt("per_page", input.per_page)
        .apply(format!("/search/{kind}"))
}

pub async fn search_code(client: &GitHubClient, input: SearchInput) -> Result<Decoded> {
    client.get(&search_path("code", &input)).await
}

/// Issues and pull requests share one search index.
pub async fn search_issues(client: &GitHubClient, input: SearchInput) -> Result<Decoded> {
    client.get(&search_path("issues", &input)).await
}

pub async fn search_users(client: &GitHubClient, input: SearchInput) -> Result<Decoded> {
    client.get(&search_path("users", &input)).await
}
