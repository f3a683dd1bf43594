use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_API_VERSION: &str = "2022-11-28";
pub const DEFAULT_REQUESTS_PER_SECOND: f64 = 10.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing GITHUB_TOKEN or GH_TOKEN")]
    MissingToken,
    #[error("invalid API URL {url:?}: {reason}")]
    InvalidApiUrl { url: String, reason: String },
    #[error("requests per second must be positive with a representable interval, got {0}")]
    InvalidRate(String),
    #[error("invalid HTTP timeout {0:?}")]
    InvalidTimeout(String),
}

/// Runtime configuration for the GitHub REST client.
/// Immutable once built; every client owns its own copy.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub requests_per_second: f64,
    /// `None` leaves the transport's own defaults in charge.
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Explicit values win over the environment; the environment wins over defaults.
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    token: Option<String>,
    api_url: Option<String>,
    api_version: Option<String>,
    user_agent: Option<String>,
    requests_per_second: Option<f64>,
    timeout_secs: Option<u64>,
}

impl ConfigBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    pub fn requests_per_second(mut self, rps: f64) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Resolve against the process environment.
    ///
    /// Env vars:
    /// - GITHUB_TOKEN (or GH_TOKEN) [required]
    /// - GITHUB_API_URL (default: https://api.github.com)
    /// - GITHUB_API_VERSION (default: 2022-11-28)
    /// - GITHUB_RATE_LIMIT_RPS (default: 10)
    /// - GITHUB_HTTP_TIMEOUT_SECS (default: unset)
    /// - GITHUB_USER_AGENT (default: gh-rest-mcp/<version>)
    pub fn build(self) -> Result<Config, ConfigError> {
        self.build_with(|key| env::var(key).ok())
    }

    /// Resolve against an arbitrary variable source instead of the process environment.
    pub fn build_with<F>(self, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Tokens pasted from files often carry a trailing newline.
        let usable = |t: String| Some(t.trim().to_string()).filter(|t| !t.is_empty());
        let token = self
            .token
            .and_then(usable)
            .or_else(|| lookup("GITHUB_TOKEN").and_then(usable))
            .or_else(|| lookup("GH_TOKEN").and_then(usable))
            .ok_or(ConfigError::MissingToken)?;

        let raw_url = self
            .api_url
            .or_else(|| lookup("GITHUB_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = raw_url.trim_end_matches('/').to_string();
        url::Url::parse(&api_url).map_err(|e| ConfigError::InvalidApiUrl {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;

        let api_version = self
            .api_version
            .or_else(|| lookup("GITHUB_API_VERSION"))
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let requests_per_second = match self.requests_per_second {
            Some(rps) => rps,
            None => match lookup("GITHUB_RATE_LIMIT_RPS") {
                Some(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidRate(s.clone()))?,
                None => DEFAULT_REQUESTS_PER_SECOND,
            },
        };
        pacing_interval(requests_per_second)?;

        let timeout_secs = match self.timeout_secs {
            Some(secs) => Some(secs),
            None => lookup("GITHUB_HTTP_TIMEOUT_SECS")
                .map(|s| {
                    s.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidTimeout(s.clone()))
                })
                .transpose()?,
        };

        let default_ua = format!("gh-rest-mcp/{}", env!("CARGO_PKG_VERSION"));
        let user_agent = self
            .user_agent
            .or_else(|| lookup("GITHUB_USER_AGENT"))
            .unwrap_or(default_ua);

        Ok(Config {
            token,
            api_url,
            api_version,
            user_agent,
            requests_per_second,
            timeout_secs,
        })
    }
}

/// Spacing between dispatches for a ceiling of `rps` requests per second.
pub(crate) fn pacing_interval(rps: f64) -> Result<Duration, ConfigError> {
    let invalid = || ConfigError::InvalidRate(rps.to_string());
    if !(rps.is_finite() && rps > 0.0) {
        return Err(invalid());
    }
    // Tiny rates overflow Duration (or divide to infinity when subnormal).
    Duration::try_from_secs_f64(1.0 / rps).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = ConfigBuilder::default().build_with(vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let err = Config::builder()
            .token("  ")
            .build_with(vars(&[("GH_TOKEN", "")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingToken);
    }

    #[test]
    fn explicit_token_wins_over_env() {
        let cfg = Config::builder()
            .token("explicit")
            .build_with(vars(&[("GITHUB_TOKEN", "from-env")]))
            .unwrap();
        assert_eq!(cfg.token, "explicit");
    }

    #[test]
    fn token_whitespace_is_trimmed() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "abc\n")]))
            .unwrap();
        assert_eq!(cfg.token, "abc");
        let cfg = Config::builder()
            .token("  xyz \r\n")
            .build_with(vars(&[]))
            .unwrap();
        assert_eq!(cfg.token, "xyz");
    }

    #[test]
    fn gh_token_is_a_fallback() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[("GH_TOKEN", "gh")]))
            .unwrap();
        assert_eq!(cfg.token, "gh");
    }

    #[test]
    fn defaults_apply() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "t")]))
            .unwrap();
        assert_eq!(cfg.api_url, DEFAULT_API_URL);
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
        assert_eq!(cfg.requests_per_second, 10.0);
        assert_eq!(cfg.timeout_secs, None);
        assert!(cfg.user_agent.starts_with("gh-rest-mcp/"));
    }

    #[test]
    fn api_url_trailing_slash_trimmed() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[
                ("GITHUB_TOKEN", "t"),
                ("GITHUB_API_URL", "https://ghe.example.com/api/v3/"),
            ]))
            .unwrap();
        assert_eq!(cfg.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn invalid_api_url_rejected() {
        let err = Config::builder()
            .token("t")
            .api_url("not a url")
            .build_with(vars(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidApiUrl { .. }));
    }

    #[test]
    fn non_positive_rates_rejected() {
        for bad in ["0", "-1", "abc", "NaN", "inf"] {
            let err = ConfigBuilder::default()
                .build_with(vars(&[("GITHUB_TOKEN", "t"), ("GITHUB_RATE_LIMIT_RPS", bad)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRate(_)), "{bad}");
        }
        let err = Config::builder()
            .token("t")
            .requests_per_second(0.0)
            .build_with(vars(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate(_)));
    }

    #[test]
    fn rates_too_small_to_pace_rejected() {
        for tiny in [1e-20, f64::MIN_POSITIVE, 5e-324] {
            let err = Config::builder()
                .token("t")
                .requests_per_second(tiny)
                .build_with(vars(&[]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRate(_)), "{tiny}");
        }
        let err = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "t"), ("GITHUB_RATE_LIMIT_RPS", "1e-20")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRate(_)));
    }

    #[test]
    fn fractional_rate_accepted() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "t"), ("GITHUB_RATE_LIMIT_RPS", "0.5")]))
            .unwrap();
        assert_eq!(cfg.requests_per_second, 0.5);
    }

    #[test]
    fn timeout_parsed_when_present() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "t"), ("GITHUB_HTTP_TIMEOUT_SECS", "15")]))
            .unwrap();
        assert_eq!(cfg.timeout_secs, Some(15));
        let err = ConfigBuilder::default()
            .build_with(vars(&[("GITHUB_TOKEN", "t"), ("GITHUB_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn explicit_settings_win_over_env() {
        let cfg = Config::builder()
            .token("t")
            .api_version("2023-01-01")
            .user_agent("acme-bot/1.0")
            .timeout_secs(5)
            .build_with(vars(&[
                ("GITHUB_API_VERSION", "2022-11-28"),
                ("GITHUB_USER_AGENT", "env-agent"),
                ("GITHUB_HTTP_TIMEOUT_SECS", "60"),
            ]))
            .unwrap();
        assert_eq!(cfg.api_version, "2023-01-01");
        assert_eq!(cfg.user_agent, "acme-bot/1.0");
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    #[test]
    fn env_overrides_version_and_agent() {
        let cfg = ConfigBuilder::default()
            .build_with(vars(&[
                ("GITHUB_TOKEN", "t"),
                ("GITHUB_API_VERSION", "2099-01-01"),
                ("GITHUB_USER_AGENT", "env-agent"),
            ]))
            .unwrap();
        assert_eq!(cfg.api_version, "2099-01-01");
        assert_eq!(cfg.user_agent, "env-agent");
    }
}
