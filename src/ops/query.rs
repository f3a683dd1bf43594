use std::fmt::Display;

/// Percent-encode a single path segment (`/` included).
pub fn encode_path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Encode a repository file path segment by segment, keeping the separators.
pub fn encode_file_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(encode_path_segment)
        .collect::<Vec<_>>()
        .join("/")
}

/// Query-string assembly from optional parameters; absent ones never appear.
#[derive(Debug, Default, Clone)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opt<T: Display>(mut self, key: &'static str, value: Option<T>) -> Self {
        if let Some(v) = value {
            self.pairs.push((key, v.to_string()));
        }
        self
    }

    pub fn req<T: Display>(mut self, key: &'static str, value: T) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    /// Comma-joined list, skipped when absent.
    pub fn list(mut self, key: &'static str, values: Option<&[String]>) -> Self {
        if let Some(vs) = values {
            self.pairs.push((key, vs.join(",")));
        }
        self
    }

    /// `""` when empty, else `?k=v&...`.
    pub fn to_suffix(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.pairs {
            ser.append_pair(k, v);
        }
        format!("?{}", ser.finish())
    }

    /// Append to a path.
    pub fn apply(&self, path: String) -> String {
        path + &self.to_suffix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_are_omitted() {
        let q = Query::new()
            .opt("state", None::<&str>)
            .opt("page", Some(2))
            .opt("per_page", None::<u32>)
            .list("labels", None);
        assert_eq!(q.to_suffix(), "?page=2");
    }

    #[test]
    fn empty_query_has_no_question_mark() {
        assert_eq!(Query::new().apply("/repos/o/r".into()), "/repos/o/r");
        assert_eq!(Query::new().opt("x", None::<i64>).to_suffix(), "");
    }

    #[test]
    fn values_are_form_encoded() {
        let labels = vec!["bug".to_string(), "help wanted".to_string()];
        let q = Query::new()
            .req("q", "repo:o/r is:open")
            .list("labels", Some(&labels));
        assert_eq!(q.to_suffix(), "?q=repo%3Ao%2Fr+is%3Aopen&labels=bug%2Chelp+wanted");
    }

    #[test]
    fn url_path_segment_encoding() {
        assert_eq!(encode_path_segment("Prod Env/Blue%"), "Prod%20Env%2FBlue%25");
        assert_eq!(encode_path_segment("abc-._~123"), "abc-._~123");
    }

    #[test]
    fn file_paths_keep_separators() {
        assert_eq!(encode_file_path("docs/my file.md"), "docs/my%20file.md");
        assert_eq!(encode_file_path("/src/lib.rs/"), "src/lib.rs");
    }
}
