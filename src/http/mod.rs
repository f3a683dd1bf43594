mod errors;
mod quota;
mod rate_limit;

pub use errors::{classify, map_status_to_code, ApiFailure};
pub use quota::{extract_quota, QuotaTracker, LIMIT_HEADER, REMAINING_HEADER, RESET_HEADER};
pub use rate_limit::RateLimiter;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Decoded, QuotaSnapshot};
use log::{debug, warn};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT,
};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

pub const GITHUB_JSON: &str = "application/vnd.github+json";
pub const GITHUB_DIFF: &str = "application/vnd.github.diff";
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// One logical call: method, path (query already encoded), optional JSON body
/// and header overrides layered on top of the defaults.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub fn build_client(cfg: &Config) -> reqwest::Result<Client> {
    let mut default_headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(&cfg.user_agent) {
        default_headers.insert(USER_AGENT, ua);
    }
    // Authorization is injected per request alongside the other defaults.
    let mut builder = Client::builder()
        .default_headers(default_headers)
        .use_rustls_tls();
    if let Some(secs) = cfg.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| {
            let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Authenticated, paced, quota-tracking REST client.
///
/// One instance per identity; pass it by reference to every operation.
#[derive(Debug)]
pub struct GitHubClient {
    http: Client,
    cfg: Config,
    limiter: RateLimiter,
    quota: QuotaTracker,
}

impl GitHubClient {
    pub fn new(cfg: Config) -> Result<Self> {
        let limiter = RateLimiter::new(cfg.requests_per_second)?;
        let http = build_client(&cfg)?;
        Ok(Self {
            http,
            cfg,
            limiter,
            quota: QuotaTracker::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Quota envelope from the most recent response that carried one.
    pub fn quota(&self) -> Option<QuotaSnapshot> {
        self.quota.snapshot()
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.cfg.token)).map_err(|_| {
            Error::InvalidHeader {
                name: AUTHORIZATION.to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        let version =
            HeaderValue::from_str(&self.cfg.api_version).map_err(|_| Error::InvalidHeader {
                name: API_VERSION_HEADER.to_string(),
            })?;
        headers.insert(API_VERSION_HEADER, version);
        Ok(headers)
    }

    pub async fn execute(&self, req: RequestDescriptor) -> Result<Decoded> {
        self.limiter.throttle().await;

        let url = format!("{}{}", self.cfg.api_url, req.path);
        let mut headers = self.default_headers()?;
        let body = match &req.body {
            Some(v) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Some(serde_json::to_vec(v)?)
            }
            None => None,
        };
        // Overrides replace same-named defaults; every other default survives.
        for (raw_name, raw_value) in &req.headers {
            let invalid = || Error::InvalidHeader {
                name: raw_name.clone(),
            };
            let name = HeaderName::from_bytes(raw_name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(raw_value).map_err(|_| invalid())?;
            headers.insert(name, value);
        }

        debug!("{} {}", req.method, url);
        let mut builder = self.http.request(req.method.clone(), &url).headers(headers);
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }
        let res = builder.send().await.map_err(|e| {
            warn!("{} {} failed to send: {}", req.method, url, e);
            Error::Transport(e)
        })?;

        let status = res.status();
        let resp_headers = res.headers().clone();
        self.quota.record_from_headers(&resp_headers);
        if !status.is_success() {
            // A body that never fully arrives still leaves the status to report.
            let text = res.text().await.unwrap_or_default();
            let failure = classify(status, &text);
            warn!("{} {} -> {}", req.method, url, failure);
            return Err(Error::Api(failure));
        }

        let text = res.text().await?;

        if is_json_content_type(&resp_headers) {
            Ok(Decoded::Json(serde_json::from_str(&text)?))
        } else {
            Ok(Decoded::Text(text))
        }
    }

    pub async fn get(&self, path: &str) -> Result<Decoded> {
        self.execute(RequestDescriptor::get(path)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Decoded> {
        self.execute(RequestDescriptor::post(path).json(body)?).await
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<Decoded> {
        self.execute(RequestDescriptor::patch(path).json(body)?).await
    }
}
