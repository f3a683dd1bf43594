use crate::error::Error;
use crate::types::Decoded;
use serde_json::{json, Value};

// Build an MCP-compliant result envelope for tools/call outputs.
// - content: always a single text block so clients can render something.
// - structuredContent: always an object.
// - isError: included only when true to keep payloads small.
pub fn mcp_wrap(structured: Value, text_opt: Option<String>, is_error: bool) -> Value {
    let text = match text_opt {
        Some(s) => s,
        None => serde_json::to_string(&structured).unwrap_or_else(|_| "{}".to_string()),
    };
    let mut obj = json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": structured,
    });
    if is_error {
        if let Some(map) = obj.as_object_mut() {
            map.insert("isError".to_string(), Value::Bool(true));
        }
    }
    obj
}

/// Successful tool output: text rendering plus the decoded body.
pub fn wrap_decoded(decoded: Decoded) -> Value {
    let text = decoded.to_text();
    let structured = match decoded {
        Decoded::Json(Value::Object(map)) => Value::Object(map),
        Decoded::Json(other) => json!({ "result": other }),
        Decoded::Text(s) => json!({ "text": s }),
    };
    mcp_wrap(structured, Some(text), false)
}

/// Failed tool output; failures stay inside the tool result, never JSON-RPC errors.
pub fn wrap_error(err: &Error) -> Value {
    let mut error = json!({
        "code": err.code(),
        "message": err.to_string(),
        "retriable": err.retriable(),
    });
    if let (Some(status), Some(map)) = (err.status(), error.as_object_mut()) {
        map.insert("status".to_string(), json!(status));
    }
    mcp_wrap(json!({ "error": error }), Some(err.to_string()), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiFailure;

    #[test]
    fn object_results_pass_through() {
        let v = wrap_decoded(Decoded::Json(json!({"id": 1})));
        assert_eq!(v["structuredContent"], json!({"id": 1}));
        assert_eq!(v["content"][0]["type"], "text");
        assert!(v.get("isError").is_none());
    }

    #[test]
    fn arrays_and_text_are_boxed() {
        let v = wrap_decoded(Decoded::Json(json!([1, 2])));
        assert_eq!(v["structuredContent"], json!({"result": [1, 2]}));
        let v = wrap_decoded(Decoded::Text("diff --git a b".into()));
        assert_eq!(v["structuredContent"]["text"], "diff --git a b");
        assert_eq!(v["content"][0]["text"], "diff --git a b");
    }

    #[test]
    fn errors_carry_status_and_flag() {
        let err = Error::Api(ApiFailure {
            status: 404,
            message: "Not Found".into(),
        });
        let v = wrap_error(&err);
        assert_eq!(v["isError"], true);
        assert_eq!(v["structuredContent"]["error"]["code"], "not_found");
        assert_eq!(v["structuredContent"]["error"]["status"], 404);
        let text = v["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("404") && text.contains("Not Found"));
    }
}
