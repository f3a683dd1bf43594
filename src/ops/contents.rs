use super::branches::branch_head_sha;
use super::{encode_file_path, repo_path, Query};
use crate::error::{Error, Result};
use crate::http::GitHubClient;
use crate::types::Decoded;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GetFileContentsInput {
    pub owner: String,
    pub repo: String,
    pub path: String,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

/// File metadata plus base64 content, or a directory listing.
pub async fn get_file_contents(
    client: &GitHubClient,
    input: GetFileContentsInput,
) -> Result<Decoded> {
    let path = Query::new().opt("ref", input.git_ref.as_deref()).apply(format!(
        "{}/contents/{}",
        repo_path(&input.owner, &input.repo),
        encode_file_path(&input.path)
    ));
    client.get(&path).await
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushFilesInput {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub message: String,
    pub files: Vec<FileChange>,
}

#[derive(Serialize)]
struct TreeEntry<'a> {
    path: &'a str,
    mode: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

/// Commit several files to `branch` in one commit through the git data API:
/// read the ref and its commit, create a tree on top, commit it and move the ref.
pub async fn push_files(client: &GitHubClient, input: PushFilesInput) -> Result<Decoded> {
    let base = repo_path(&input.owner, &input.repo);
    let parent = branch_head_sha(client, &input.owner, &input.repo, &input.branch).await?;

    let commit = client
        .get(&format!("{base}/git/commits/{}", parent))
        .await?;
    let base_tree = commit
        .str_at("/tree/sha")
        .ok_or_else(|| Error::UnexpectedResponse(format!("commit {parent} has no tree.sha")))?
        .to_string();

    let entries: Vec<TreeEntry<'_>> = input
        .files
        .iter()
        .map(|f| TreeEntry {
            path: f.path.trim_start_matches('/'),
            mode: "100644",
            kind: "blob",
            content: &f.content,
        })
        .collect();
    let tree = client
        .post(
            &format!("{base}/git/trees"),
            &serde_json::json!({ "base_tree": base_tree, "tree": entries }),
        )
        .await?;
    let tree_sha = tree
        .str_at("/sha")
        .ok_or_else(|| Error::UnexpectedResponse("created tree has no sha".into()))?
        .to_string();

    let new_commit = client
        .post(
            &format!("{base}/git/commits"),
            &serde_json::json!({
                "message": input.message,
                "tree": tree_sha,
                "parents": [parent],
            }),
        )
        .await?;
    let commit_sha = new_commit
        .str_at("/sha")
        .ok_or_else(|| Error::UnexpectedResponse("created commit has no sha".into()))?
        .to_string();
    debug!(
        "pushing {} file(s) to {} as {}",
        input.files.len(),
        input.branch,
        commit_sha
    );

    client
        .patch(
            &format!("{base}/git/refs/heads/{}", encode_file_path(&input.branch)),
            &serde_json::json!({ "sha": commit_sha, "force": false }),
        )
        .await
}
