use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn tool(name: &str, description: &str, input_schema: Value) -> ToolDescriptor {
    ToolDescriptor {
        name: name.into(),
        description: description.into(),
        input_schema,
    }
}

fn owner_repo() -> Value {
    json!({
        "owner": {"type": "string", "description": "Repository owner (user or organization)"},
        "repo": {"type": "string", "description": "Repository name"}
    })
}

// Merge extra properties into the shared owner/repo pair.
fn repo_props(extra: Value) -> Value {
    let mut props = owner_repo();
    if let (Some(base), Value::Object(more)) = (props.as_object_mut(), extra) {
        base.extend(more);
    }
    props
}

fn paging() -> Value {
    json!({
        "page": {"type": "integer", "minimum": 1},
        "per_page": {"type": "integer", "minimum": 1, "maximum": 100}
    })
}

fn with_paging(extra: Value) -> Value {
    let mut props = extra;
    if let (Some(base), Value::Object(more)) = (props.as_object_mut(), paging()) {
        base.extend(more);
    }
    props
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties,
        "required": required,
    })
}

fn search_schema() -> Value {
    object(
        with_paging(json!({
            "q": {"type": "string", "description": "GitHub search syntax"},
            "sort": {"type": "string"},
            "order": {"type": "string", "enum": ["asc", "desc"]}
        })),
        &["q"],
    )
}

/// Check tool arguments against the subset of JSON Schema the descriptors use:
/// `type`, `properties`, `required`, `additionalProperties: false`, `enum`,
/// `minimum`/`maximum` and array `items`. An optional property sent as `null`
/// counts as absent.
pub fn validate_arguments(schema: &Value, args: &Value) -> Result<(), String> {
    check_value("arguments", schema, args)
}

fn check_value(at: &str, schema: &Value, value: &Value) -> Result<(), String> {
    let ty = schema.get("type").and_then(Value::as_str);
    let type_ok = match ty {
        Some("object") => value.is_object(),
        Some("array") => value.is_array(),
        Some("string") => value.is_string(),
        Some("integer") => value.is_i64() || value.is_u64(),
        Some("boolean") => value.is_boolean(),
        _ => true,
    };
    if !type_ok {
        return Err(format!("{at} must be of type {}", ty.unwrap_or("any")));
    }

    if let Some(allowed) = schema.get("enum").and_then(Value::as_array) {
        if !allowed.contains(value) {
            return Err(format!("{at} must be one of {}", Value::Array(allowed.clone())));
        }
    }
    if let Some(n) = value.as_i64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_i64) {
            if n < min {
                return Err(format!("{at} must be >= {min}"));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_i64) {
            if n > max {
                return Err(format!("{at} must be <= {max}"));
            }
        }
    }

    match value {
        Value::Object(map) => {
            let props = schema.get("properties").and_then(Value::as_object);
            let closed = schema.get("additionalProperties") == Some(&Value::Bool(false));
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for key in required.iter().filter_map(Value::as_str) {
                    if map.get(key).map_or(true, Value::is_null) {
                        return Err(format!("missing required argument `{key}` in {at}"));
                    }
                }
            }
            for (key, v) in map {
                match props.and_then(|p| p.get(key)) {
                    Some(_) if v.is_null() => {}
                    Some(sub) => check_value(key, sub, v)?,
                    None if closed => return Err(format!("unknown argument `{key}`")),
                    None => {}
                }
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    check_value(&format!("{at}[{i}]"), item_schema, item)?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    let string_list = json!({"type": "array", "items": {"type": "string"}});

    vec![
        // Repositories
        tool(
            "search_repositories",
            "Search for GitHub repositories",
            object(
                with_paging(json!({"q": {"type": "string", "description": "GitHub search syntax"}})),
                &["q"],
            ),
        ),
        tool(
            "get_repository",
            "Get repository metadata",
            object(owner_repo(), &["owner", "repo"]),
        ),
        tool(
            "create_repository",
            "Create a new repository for the authenticated user",
            object(
                json!({
                    "name": {"type": "string"},
                    "description": {"type": "string"},
                    "private": {"type": "boolean"},
                    "auto_init": {"type": "boolean", "description": "Initialize with a README"}
                }),
                &["name"],
            ),
        ),
        tool(
            "fork_repository",
            "Fork a repository to the authenticated user or an organization",
            object(
                repo_props(json!({"organization": {"type": "string"}})),
                &["owner", "repo"],
            ),
        ),
        // Issues
        tool(
            "list_issues",
            "List issues in a repository",
            object(
                repo_props(with_paging(json!({
                    "state": {"type": "string", "enum": ["open", "closed", "all"]},
                    "labels": string_list,
                    "sort": {"type": "string", "enum": ["created", "updated", "comments"]},
                    "direction": {"type": "string", "enum": ["asc", "desc"]},
                    "since": {"type": "string", "description": "ISO 8601 timestamp"}
                }))),
                &["owner", "repo"],
            ),
        ),
        tool(
            "get_issue",
            "Get a single issue by number",
            object(
                repo_props(json!({"issue_number": {"type": "integer"}})),
                &["owner", "repo", "issue_number"],
            ),
        ),
        tool(
            "create_issue",
            "Create a new issue",
            object(
                repo_props(json!({
                    "title": {"type": "string"},
                    "body": {"type": "string"},
                    "assignees": string_list,
                    "labels": string_list,
                    "milestone": {"type": "integer"}
                })),
                &["owner", "repo", "title"],
            ),
        ),
        tool(
            "update_issue",
            "Update an existing issue",
            object(
                repo_props(json!({
                    "issue_number": {"type": "integer"},
                    "title": {"type": "string"},
                    "body": {"type": "string"},
                    "state": {"type": "string", "enum": ["open", "closed"]},
                    "labels": string_list,
                    "assignees": string_list,
                    "milestone": {"type": "integer"}
                })),
                &["owner", "repo", "issue_number"],
            ),
        ),
        tool(
            "add_issue_comment",
            "Add a comment to an issue or pull request",
            object(
                repo_props(json!({
                    "issue_number": {"type": "integer"},
                    "body": {"type": "string"}
                })),
                &["owner", "repo", "issue_number", "body"],
            ),
        ),
        tool(
            "list_issue_comments",
            "List comments on an issue or pull request",
            object(
                repo_props(with_paging(json!({
                    "issue_number": {"type": "integer"},
                    "since": {"type": "string"}
                }))),
                &["owner", "repo", "issue_number"],
            ),
        ),
        // Pull requests
        tool(
            "list_pull_requests",
            "List pull requests",
            object(
                repo_props(with_paging(json!({
                    "state": {"type": "string", "enum": ["open", "closed", "all"]},
                    "head": {"type": "string", "description": "user:ref-name"},
                    "base": {"type": "string"},
                    "sort": {"type": "string", "enum": ["created", "updated", "popularity", "long-running"]},
                    "direction": {"type": "string", "enum": ["asc", "desc"]}
                }))),
                &["owner", "repo"],
            ),
        ),
        tool(
            "get_pull_request",
            "Get a single pull request",
            object(
                repo_props(json!({"pull_number": {"type": "integer"}})),
                &["owner", "repo", "pull_number"],
            ),
        ),
        tool(
            "create_pull_request",
            "Open a new pull request",
            object(
                repo_props(json!({
                    "title": {"type": "string"},
                    "head": {"type": "string"},
                    "base": {"type": "string"},
                    "body": {"type": "string"},
                    "draft": {"type": "boolean"},
                    "maintainer_can_modify": {"type": "boolean"}
                })),
                &["owner", "repo", "title", "head", "base"],
            ),
        ),
        tool(
            "update_pull_request",
            "Update a pull request",
            object(
                repo_props(json!({
                    "pull_number": {"type": "integer"},
                    "title": {"type": "string"},
                    "body": {"type": "string"},
                    "state": {"type": "string", "enum": ["open", "closed"]},
                    "base": {"type": "string"},
                    "maintainer_can_modify": {"type": "boolean"}
                })),
                &["owner", "repo", "pull_number"],
            ),
        ),
        tool(
            "list_pull_request_files",
            "List files changed in a pull request",
            object(
                repo_props(with_paging(json!({"pull_number": {"type": "integer"}}))),
                &["owner", "repo", "pull_number"],
            ),
        ),
        tool(
            "get_pull_request_diff",
            "Get the unified diff of a pull request",
            object(
                repo_props(json!({"pull_number": {"type": "integer"}})),
                &["owner", "repo", "pull_number"],
            ),
        ),
        tool(
            "create_pull_request_review",
            "Submit a review on a pull request",
            object(
                repo_props(json!({
                    "pull_number": {"type": "integer"},
                    "body": {"type": "string"},
                    "event": {"type": "string", "enum": ["APPROVE", "REQUEST_CHANGES", "COMMENT"]},
                    "commit_id": {"type": "string"},
                    "comments": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "path": {"type": "string"},
                                "body": {"type": "string"},
                                "line": {"type": "integer"},
                                "side": {"type": "string", "enum": ["LEFT", "RIGHT"]},
                                "start_line": {"type": "integer"},
                                "start_side": {"type": "string", "enum": ["LEFT", "RIGHT"]}
                            },
                            "required": ["path", "body"]
                        }
                    }
                })),
                &["owner", "repo", "pull_number"],
            ),
        ),
        // Branches
        tool(
            "list_branches",
            "List branches in a repository",
            object(
                repo_props(with_paging(json!({"protected": {"type": "boolean"}}))),
                &["owner", "repo"],
            ),
        ),
        tool(
            "create_branch",
            "Create a branch from another branch (default branch when omitted)",
            object(
                repo_props(json!({
                    "branch": {"type": "string"},
                    "from_branch": {"type": "string"}
                })),
                &["owner", "repo", "branch"],
            ),
        ),
        // Contents
        tool(
            "get_file_contents",
            "Get the contents of a file or directory",
            object(
                repo_props(json!({
                    "path": {"type": "string"},
                    "ref": {"type": "string", "description": "Branch, tag or commit SHA"}
                })),
                &["owner", "repo", "path"],
            ),
        ),
        tool(
            "push_files",
            "Commit multiple files to a branch in a single commit",
            object(
                repo_props(json!({
                    "branch": {"type": "string"},
                    "message": {"type": "string"},
                    "files": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "path": {"type": "string"},
                                "content": {"type": "string"}
                            },
                            "required": ["path", "content"]
                        }
                    }
                })),
                &["owner", "repo", "branch", "message", "files"],
            ),
        ),
        // Commits
        tool(
            "list_commits",
            "List commits on a branch or path",
            object(
                repo_props(with_paging(json!({
                    "sha": {"type": "string"},
                    "path": {"type": "string"},
                    "author": {"type": "string"},
                    "since": {"type": "string"},
                    "until": {"type": "string"}
                }))),
                &["owner", "repo"],
            ),
        ),
        tool(
            "get_commit",
            "Get a single commit",
            object(
                repo_props(json!({"ref": {"type": "string"}})),
                &["owner", "repo", "ref"],
            ),
        ),
        // Search
        tool("search_code", "Search code across repositories", search_schema()),
        tool("search_issues", "Search issues and pull requests", search_schema()),
        tool("search_users", "Search users", search_schema()),
        // Introspection
        tool(
            "get_rate_limit_status",
            "Report the most recently observed REST quota (no network call)",
            object(json!({}), &[]),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema_of(name: &str) -> Value {
        tool_descriptors()
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| t.input_schema)
            .unwrap()
    }

    #[test]
    fn every_tool_has_a_closed_object_schema() {
        let tools = tool_descriptors();
        assert_eq!(tools.len(), 27);
        for t in &tools {
            assert_eq!(t.input_schema["type"], "object", "{}", t.name);
            assert_eq!(t.input_schema["additionalProperties"], false, "{}", t.name);
        }
    }

    #[test]
    fn valid_arguments_pass() {
        let args = json!({"owner": "o", "repo": "r", "state": "open", "labels": ["bug"], "per_page": 100});
        assert_eq!(validate_arguments(&schema_of("list_issues"), &args), Ok(()));
        let args = json!({"owner": "o", "repo": "r", "since": null});
        assert_eq!(validate_arguments(&schema_of("list_issues"), &args), Ok(()));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = validate_arguments(
            &schema_of("list_issues"),
            &json!({"owner": "o", "repo": "r", "per_pge": 5}),
        )
        .unwrap_err();
        assert!(err.contains("per_pge"), "{err}");
    }

    #[test]
    fn enums_and_ranges_are_enforced() {
        let schema = schema_of("list_issues");
        let err = validate_arguments(&schema, &json!({"owner": "o", "repo": "r", "state": "bogus"}))
            .unwrap_err();
        assert!(err.starts_with("state must be one of"), "{err}");
        for bad in [0, 101] {
            let err =
                validate_arguments(&schema, &json!({"owner": "o", "repo": "r", "per_page": bad}))
                    .unwrap_err();
            assert!(err.starts_with("per_page"), "{err}");
        }
        let err = validate_arguments(&schema, &json!({"owner": "o", "repo": "r", "page": 0}))
            .unwrap_err();
        assert_eq!(err, "page must be >= 1");
    }

    #[test]
    fn types_required_and_nested_items_are_checked() {
        let err = validate_arguments(&schema_of("get_issue"), &json!({"owner": "o", "repo": "r", "issue_number": "7"}))
            .unwrap_err();
        assert_eq!(err, "issue_number must be of type integer");
        let err = validate_arguments(&schema_of("get_issue"), &json!({"owner": "o", "repo": "r"}))
            .unwrap_err();
        assert!(err.contains("issue_number"), "{err}");
        let err = validate_arguments(
            &schema_of("push_files"),
            &json!({"owner": "o", "repo": "r", "branch": "b", "message": "m", "files": [{"path": "a"}]}),
        )
        .unwrap_err();
        assert!(err.contains("content") && err.contains("files[0]"), "{err}");
    }
}
