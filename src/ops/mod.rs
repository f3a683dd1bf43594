//! Resource operations: typed inputs mapped onto REST paths, queries and bodies.
//!
//! Every function here takes the shared [`GitHubClient`](crate::http::GitHubClient)
//! by reference and returns the decoded response untouched.

pub mod branches;
pub mod commits;
pub mod contents;
pub mod issues;
pub mod pulls;
pub mod query;
pub mod repos;
pub mod search;

pub use query::{encode_file_path, encode_path_segment, Query};

/// `/repos/{owner}/{repo}` with both segments encoded.
pub fn repo_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}",
        encode_path_segment(owner),
        encode_path_segment(repo)
    )
}
